//! Station worker state machine
//!
//! A station worker is always in exactly one phase. Phases change only
//! through [`WorkerPhase::apply`], which checks the event against the
//! transition table and reports anything else as a fault.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{CustomerId, TicketId};

/// The ticket a worker is handling, plus the customer it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkTask {
    pub ticket_id: TicketId,
    pub customer_id: CustomerId,
}

/// Phase of a station worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkerPhase {
    #[default]
    Idle,
    /// Walking to the customer's table to pick up the ticket
    ToCustomer(WorkTask),
    /// Walking back to the home station with the ticket
    ToStation(WorkTask),
    /// Running a job on the station
    Working(WorkTask),
}

/// Inputs to the worker state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerEvent {
    /// Took a ticket from the work cache
    Claim(WorkTask),
    ReachedCustomer,
    /// A slot accepted the job
    JobPlaced,
    /// The job this worker was running completed
    JobFinished,
    /// Task abandoned (stale, cascade, reset)
    Release,
}

impl WorkerPhase {
    pub fn name(&self) -> &'static str {
        match self {
            WorkerPhase::Idle => "idle",
            WorkerPhase::ToCustomer(_) => "to_customer",
            WorkerPhase::ToStation(_) => "to_station",
            WorkerPhase::Working(_) => "working",
        }
    }

    pub fn task(&self) -> Option<WorkTask> {
        match self {
            WorkerPhase::Idle => None,
            WorkerPhase::ToCustomer(t) | WorkerPhase::ToStation(t) | WorkerPhase::Working(t) => {
                Some(*t)
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, WorkerPhase::Idle)
    }

    /// Apply an event, returning the next phase
    ///
    /// | from       | event           | to         |
    /// |------------|-----------------|------------|
    /// | Idle       | Claim(task)     | ToCustomer |
    /// | ToCustomer | ReachedCustomer | ToStation  |
    /// | ToStation  | JobPlaced       | Working    |
    /// | Working    | JobFinished     | Idle       |
    /// | any        | Release         | Idle       |
    pub fn apply(self, event: WorkerEvent) -> Result<WorkerPhase> {
        match (self, event) {
            (WorkerPhase::Idle, WorkerEvent::Claim(task)) => Ok(WorkerPhase::ToCustomer(task)),
            (WorkerPhase::ToCustomer(task), WorkerEvent::ReachedCustomer) => {
                Ok(WorkerPhase::ToStation(task))
            }
            (WorkerPhase::ToStation(task), WorkerEvent::JobPlaced) => Ok(WorkerPhase::Working(task)),
            (WorkerPhase::Working(_), WorkerEvent::JobFinished) => Ok(WorkerPhase::Idle),
            (_, WorkerEvent::Release) => Ok(WorkerPhase::Idle),
            (from, event) => Err(SimError::IllegalTransition {
                from: from.name().to_string(),
                event: format!("{:?}", event),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> WorkTask {
        WorkTask {
            ticket_id: TicketId(3),
            customer_id: CustomerId(2),
        }
    }

    #[test]
    fn test_full_cycle() {
        let p = WorkerPhase::Idle;
        let p = p.apply(WorkerEvent::Claim(task())).unwrap();
        assert_eq!(p, WorkerPhase::ToCustomer(task()));
        let p = p.apply(WorkerEvent::ReachedCustomer).unwrap();
        assert_eq!(p, WorkerPhase::ToStation(task()));
        let p = p.apply(WorkerEvent::JobPlaced).unwrap();
        assert_eq!(p, WorkerPhase::Working(task()));
        let p = p.apply(WorkerEvent::JobFinished).unwrap();
        assert!(p.is_idle());
    }

    #[test]
    fn test_release_from_any_phase() {
        for p in [
            WorkerPhase::Idle,
            WorkerPhase::ToCustomer(task()),
            WorkerPhase::ToStation(task()),
            WorkerPhase::Working(task()),
        ] {
            assert_eq!(p.apply(WorkerEvent::Release).unwrap(), WorkerPhase::Idle);
        }
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        let err = WorkerPhase::Idle.apply(WorkerEvent::JobFinished).unwrap_err();
        assert!(matches!(err, SimError::IllegalTransition { .. }));

        let working = WorkerPhase::Working(task());
        assert!(working.apply(WorkerEvent::Claim(task())).is_err());
        assert!(WorkerPhase::ToCustomer(task()).apply(WorkerEvent::JobPlaced).is_err());
    }

    #[test]
    fn test_task_accessor() {
        assert_eq!(WorkerPhase::Idle.task(), None);
        assert_eq!(WorkerPhase::ToStation(task()).task(), Some(task()));
    }
}
