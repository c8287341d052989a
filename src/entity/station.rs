//! Stations and their job slots

use serde::{Deserialize, Serialize};

use crate::catalog::{StationKind, StationType};
use crate::core::types::{EmployeeId, Millis, TicketId};

/// A running preparation step occupying one slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub ticket_id: TicketId,
    pub step_index: usize,
    pub remaining_ms: Millis,
    /// Starting value of `remaining_ms`, for progress bars
    pub total_ms: Millis,
    /// Employee running the job; None when the player dropped it in
    pub employee: Option<EmployeeId>,
}

impl Job {
    pub fn progress(&self) -> f64 {
        if self.total_ms <= 0.0 {
            1.0
        } else {
            (1.0 - self.remaining_ms / self.total_ms).clamp(0.0, 1.0)
        }
    }
}

/// One work position on a station; holds at most one job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub job: Option<Job>,
}

/// A station on the line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub kind: StationKind,
    pub label: String,
    pub base_capacity: usize,
    pub slots: Vec<Slot>,
}

impl Station {
    /// Build a station with `base_capacity + extra_capacity` empty slots
    pub fn new(station_type: &StationType, extra_capacity: usize) -> Self {
        Self {
            kind: station_type.kind,
            label: station_type.label.clone(),
            base_capacity: station_type.base_capacity,
            slots: vec![Slot::default(); station_type.base_capacity + extra_capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn busy_count(&self) -> usize {
        self.slots.iter().filter(|s| s.job.is_some()).count()
    }

    /// First free slot; no balancing across slots
    pub fn free_slot_index(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.job.is_none())
    }

    pub fn has_free_slot(&self) -> bool {
        self.free_slot_index().is_some()
    }

    pub fn add_slot(&mut self) {
        self.slots.push(Slot::default());
    }

    /// Empty every slot and resize to `base_capacity + extra_capacity`
    pub fn reset_slots(&mut self, extra_capacity: usize) {
        self.slots = vec![Slot::default(); self.base_capacity + extra_capacity];
    }

    pub fn slot_of_ticket(&self, ticket: TicketId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.job.as_ref().map(|j| j.ticket_id) == Some(ticket))
    }

    /// Remove every job of `ticket`, returning the employees that ran them
    pub fn clear_ticket(&mut self, ticket: TicketId) -> Vec<EmployeeId> {
        let mut freed = Vec::new();
        for slot in &mut self.slots {
            if slot.job.as_ref().map(|j| j.ticket_id) == Some(ticket) {
                if let Some(job) = slot.job.take() {
                    freed.extend(job.employee);
                }
            }
        }
        freed
    }
}
