//! Customers: arrive, order, wait, pay, leave

use serde::{Deserialize, Serialize};

use crate::core::types::{CustomerId, Millis, SeatRef, Vec2};

/// Where a customer is in their visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerState {
    /// Walking from the entrance to the reserved seat
    Queuing,
    /// Seated, placing the order
    Ordering,
    /// Order placed, waiting for food
    Waiting,
    /// Food received, walking to the register
    ToRegisterPay,
    /// Paying at the register
    Paying,
    /// Paid, walking out happy
    Served,
    /// Walking out unhappy
    Leaving,
    /// Off the floor; removed at the end of the tick
    Gone,
}

impl CustomerState {
    /// Counts towards the waiting-customer cap
    pub fn is_waiting_for_food(&self) -> bool {
        matches!(
            self,
            CustomerState::Queuing | CustomerState::Ordering | CustomerState::Waiting
        )
    }

    /// Patience decays in these states
    pub fn loses_patience(&self) -> bool {
        matches!(self, CustomerState::Ordering | CustomerState::Waiting)
    }
}

/// A customer on the floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub pos: Vec2,
    /// Walking speed (px / ms)
    pub walk_speed: f32,
    pub state: CustomerState,
    pub patience: f32,
    /// Patience at spawn, for HUD bars
    pub patience_max: f32,
    /// Index into the catalog menu; fixed for the whole visit
    pub order: usize,
    pub vip: bool,
    /// Reserved chair, held from spawn until delivery or unhappy exit
    pub seat: Option<SeatRef>,
    /// Amount owed at the register
    pub due: i64,
    /// Countdown for Ordering and Paying
    pub timer_ms: Millis,
    /// Cosmetic bump when staff visit the table
    pub bump_ms: Millis,
    pub spawned_at_ms: Millis,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        order: usize,
        vip: bool,
        patience: f32,
        seat: SeatRef,
        pos: Vec2,
        walk_speed: f32,
        now_ms: Millis,
    ) -> Self {
        Self {
            id,
            pos,
            walk_speed,
            state: CustomerState::Queuing,
            patience,
            patience_max: patience,
            order,
            vip,
            seat: Some(seat),
            due: 0,
            timer_ms: 0.0,
            bump_ms: 0.0,
            spawned_at_ms: now_ms,
        }
    }

    /// Patience as a 0..=1 fraction of the starting value
    pub fn patience_fraction(&self) -> f32 {
        if self.patience_max <= 0.0 {
            0.0
        } else {
            (self.patience / self.patience_max).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TableId;

    fn sample() -> Customer {
        Customer::new(
            CustomerId(1),
            0,
            false,
            10.0,
            SeatRef { table: TableId(0), chair: 0 },
            Vec2::new(-60.0, 300.0),
            0.25,
            0.0,
        )
    }

    #[test]
    fn test_new_customer_is_queuing_with_seat() {
        let c = sample();
        assert_eq!(c.state, CustomerState::Queuing);
        assert!(c.seat.is_some());
        assert_eq!(c.due, 0);
        assert_eq!(c.patience_fraction(), 1.0);
    }

    #[test]
    fn test_waiting_for_food_states() {
        assert!(CustomerState::Queuing.is_waiting_for_food());
        assert!(CustomerState::Waiting.is_waiting_for_food());
        assert!(!CustomerState::Paying.is_waiting_for_food());
        assert!(!CustomerState::Leaving.is_waiting_for_food());
    }

    #[test]
    fn test_patience_fraction_clamped() {
        let mut c = sample();
        c.patience = -3.0;
        assert_eq!(c.patience_fraction(), 0.0);
    }
}
