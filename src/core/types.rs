//! Core type definitions used throughout the codebase

use derive_more::{Add, Display, Mul, Sub};
use serde::{Deserialize, Serialize};

/// Simulation time in milliseconds
pub type Millis = f64;

/// Unique identifier for customers
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display(fmt = "c{}", _0)]
pub struct CustomerId(pub u64);

/// Unique identifier for order tickets
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display(fmt = "t{}", _0)]
pub struct TicketId(pub u64);

/// Unique identifier for employees (hired staff and manager minions)
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display(fmt = "e{}", _0)]
pub struct EmployeeId(pub u64);

/// Unique identifier for tables
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display(fmt = "table{}", _0)]
pub struct TableId(pub u32);

/// Address of a single chair: table plus chair index within that table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatRef {
    pub table: TableId,
    pub chair: usize,
}

/// Monotonic id allocator owned by one simulation instance
///
/// All entity kinds share one counter so ids never collide across kinds
/// in logs and crash reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdGen {
    next: u64,
}

impl IdGen {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    fn bump(&mut self) -> u64 {
        let id = self.next.max(1);
        self.next = id + 1;
        id
    }

    pub fn customer(&mut self) -> CustomerId {
        CustomerId(self.bump())
    }

    pub fn ticket(&mut self) -> TicketId {
        TicketId(self.bump())
    }

    pub fn employee(&mut self) -> EmployeeId {
        EmployeeId(self.bump())
    }
}

/// 2D position on the restaurant floor (pixels)
#[derive(Debug, Clone, Copy, Default, PartialEq, Add, Sub, Mul, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    /// Unit vector in the same direction; zero stays zero
    pub fn normalize(&self) -> Self {
        match self.length() {
            len if len > 1e-4 => *self * (1.0 / len),
            _ => Self::default(),
        }
    }

    /// Move at most `max_dist` towards `target`.
    ///
    /// Returns the new position and whether the target was reached; on
    /// arrival the position snaps exactly onto the target.
    pub fn step_towards(&self, target: Vec2, max_dist: f32) -> (Vec2, bool) {
        let d = self.distance(&target);
        if d <= max_dist {
            return (target, true);
        }
        let dir = (target - *self).normalize();
        (*self + dir * max_dist, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_gen_is_monotonic_across_kinds() {
        let mut ids = IdGen::new();
        let c = ids.customer();
        let t = ids.ticket();
        let e = ids.employee();
        assert!(c.0 < t.0 && t.0 < e.0);
    }

    #[test]
    fn test_default_id_gen_never_hands_out_zero() {
        let mut ids = IdGen::default();
        assert_eq!(ids.customer(), CustomerId(1));
        assert_eq!(ids.customer(), CustomerId(2));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(CustomerId(7).to_string(), "c7");
        assert_eq!(TicketId(3).to_string(), "t3");
        assert_eq!(EmployeeId(12).to_string(), "e12");
    }

    #[test]
    fn test_step_towards_arrives_and_snaps() {
        let start = Vec2::new(0.0, 0.0);
        let (pos, arrived) = start.step_towards(Vec2::new(3.0, 4.0), 10.0);
        assert!(arrived);
        assert_eq!(pos, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_step_towards_partial_move() {
        let start = Vec2::new(0.0, 0.0);
        let (pos, arrived) = start.step_towards(Vec2::new(10.0, 0.0), 4.0);
        assert!(!arrived);
        assert!((pos.x - 4.0).abs() < 1e-4, "moved 4 units, got {}", pos.x);
        assert!(pos.y.abs() < 1e-4);
    }
}
