pub mod calendar;
pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use calendar::{DayClock, DayPhase};
pub use config::SimulationConfig;
pub use error::{CommandError, Result, SimError};
pub use rng::SimRng;
