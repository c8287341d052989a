//! Staff behaviour: worker state machine, work lists, AI, manager mode and
//! leveling

pub mod ai;
pub mod cache;
pub mod leveling;
pub mod manager;
pub mod phase;

pub use cache::{AiStats, WorkCache};
pub use manager::ManagerState;
pub use phase::{WorkTask, WorkerEvent, WorkerPhase};
