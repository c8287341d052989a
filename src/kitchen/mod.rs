//! Kitchen: ticket lifecycle and the station scheduler

pub mod scheduler;
pub mod tickets;

pub use tickets::JobPace;
