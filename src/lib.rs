//! Restaurant Rush - real-time restaurant management simulation core
//!
//! Customers arrive, order, wait and pay; tickets move through prep, cook and
//! drink stations; hired staff claim, cook and deliver under a small AI. The
//! core is headless: a renderer reads [`Simulation::snapshot`] and drains
//! events, and the player acts through the command methods.

pub mod catalog;
pub mod command;
pub mod core;
pub mod entity;
pub mod flavor;
pub mod kitchen;
pub mod persistence;
pub mod simulation;
pub mod staff;

pub use crate::catalog::{Catalog, StationKind};
pub use crate::command::UpgradeKind;
pub use crate::core::{CommandError, Result, SimError, SimulationConfig};
pub use crate::simulation::{SimSnapshot, Simulation, SimulationEvent};
