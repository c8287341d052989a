//! Order tickets and their recipe progress

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::catalog::{MenuItem, RecipeStep, StationKind};
use crate::core::types::{CustomerId, EmployeeId, Millis, TicketId};

/// Lifecycle state of a ticket
///
/// `Tray`, `Claimed` and `InStation` all mean "steps remain"; `Ready` means
/// every step is done. Dragging is tracked separately on [`Ticket::dragging`]
/// so this relationship always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketState {
    Tray,
    Claimed,
    InStation,
    Ready,
}

impl TicketState {
    pub fn label(&self) -> &'static str {
        match self {
            TicketState::Tray => "tray",
            TicketState::Claimed => "claimed",
            TicketState::InStation => "in_station",
            TicketState::Ready => "ready",
        }
    }
}

/// One customer's order working its way through the stations
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: TicketId,
    pub customer_id: CustomerId,
    /// Index into the catalog menu
    pub item: usize,
    /// Private copy of the item's recipe
    pub recipe: Vec<RecipeStep>,
    /// Next step to run; only ever increases
    pub step_index: usize,
    pub state: TicketState,
    /// Held by the player's pointer
    pub dragging: bool,
    /// Employee currently claiming the ticket
    pub assigned_to: Option<EmployeeId>,
    /// Employees who ran at least one step
    pub helpers: AHashSet<EmployeeId>,
    pub created_at_ms: Millis,
}

impl Ticket {
    pub fn new(
        id: TicketId,
        customer_id: CustomerId,
        item_index: usize,
        item: &MenuItem,
        now_ms: Millis,
    ) -> Self {
        Self {
            id,
            customer_id,
            item: item_index,
            recipe: item.recipe.clone(),
            step_index: 0,
            state: TicketState::Tray,
            dragging: false,
            assigned_to: None,
            helpers: AHashSet::new(),
            created_at_ms: now_ms,
        }
    }

    pub fn current_step(&self) -> Option<&RecipeStep> {
        self.recipe.get(self.step_index)
    }

    pub fn is_complete(&self) -> bool {
        self.step_index >= self.recipe.len()
    }

    /// Whether the next step runs on `station`
    pub fn needs_station(&self, station: StationKind) -> bool {
        self.current_step().map(|s| s.station) == Some(station)
    }

    /// State a ticket falls back to when nobody holds it
    pub fn resting_state(&self) -> TicketState {
        if self.is_complete() {
            TicketState::Ready
        } else {
            TicketState::Tray
        }
    }

    /// Mark the current step done and fall back to the resting state.
    /// Returns true when this finished the last step.
    pub fn finish_step(&mut self) -> bool {
        if !self.is_complete() {
            self.step_index += 1;
        }
        self.state = self.resting_state();
        self.assigned_to = None;
        self.is_complete()
    }

    /// Drop any claim, returning to Tray or Ready
    pub fn release(&mut self) {
        self.assigned_to = None;
        self.state = self.resting_state();
    }

    /// Ready iff every step is done
    pub fn invariant_holds(&self) -> bool {
        (self.state == TicketState::Ready) == (self.step_index == self.recipe.len())
    }
}
