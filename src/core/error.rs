use thiserror::Error;

use crate::core::types::{CustomerId, EmployeeId, TicketId};

/// Faults that stop the simulation loop, plus I/O and parsing failures
/// surfaced by loaders and stores.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Illegal worker transition: {from} on {event}")]
    IllegalTransition { from: String, event: String },

    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Unexpected panic during tick: {0}")]
    Panic(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Rejected command. Returned to callers instead of panicking; the
/// simulation state is untouched whenever one of these is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Unknown employee archetype: {0}")]
    UnknownArchetype(String),

    #[error("Archetype already hired: {0}")]
    AlreadyHired(String),

    #[error("Need ${need}, have ${have}")]
    InsufficientFunds { need: i64, have: i64 },

    #[error("Unknown station: {0}")]
    UnknownStation(String),

    #[error("Ticket not found: {0}")]
    TicketNotFound(TicketId),

    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    #[error("Employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    #[error("Employee {employee} cannot take work for {station}")]
    EmployeeUnavailable { employee: EmployeeId, station: String },

    #[error("Ticket {ticket} is not ready")]
    TicketNotReady { ticket: TicketId },

    #[error("Ticket {ticket} belongs to {owner}, not {customer}")]
    CustomerMismatch {
        ticket: TicketId,
        owner: CustomerId,
        customer: CustomerId,
    },

    #[error("Customer {0} is not waiting for food")]
    CustomerNotWaiting(CustomerId),

    #[error("Ticket {ticket} cannot be moved while {state}")]
    TicketBusy { ticket: TicketId, state: String },

    #[error("Ticket {ticket} current step is not for station {station}")]
    StepMismatch { ticket: TicketId, station: String },

    #[error("Station {0} has no free slot")]
    StationFull(String),

    #[error("Game over - reset to play again")]
    GameOver,

    #[error("Simulation is frozen after a fault - reset required")]
    Frozen,

    #[error("Nothing to resume")]
    NoResumeOffer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_messages() {
        let e = CommandError::InsufficientFunds { need: 60, have: 50 };
        assert_eq!(e.to_string(), "Need $60, have $50");

        let e = CommandError::StationFull("cook".into());
        assert_eq!(e.to_string(), "Station cook has no free slot");
    }

    #[test]
    fn test_sim_error_from_json() {
        let bad: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: SimError = bad.unwrap_err().into();
        assert!(matches!(err, SimError::SerdeError(_)));
    }
}
