//! Day clock for the restaurant
//!
//! Tracks the current day number and how far into the day the simulation
//! is. Days never cap: `end_day` always moves on to the next one.

use serde::{Deserialize, Serialize};

use crate::core::types::Millis;

/// Coarse phase of the working day, used for log lines and the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPhase {
    Opening,
    Lunch,
    Afternoon,
    Closing,
}

impl DayPhase {
    pub fn from_fraction(fraction: f64) -> Self {
        match fraction {
            f if f < 0.25 => DayPhase::Opening,
            f if f < 0.5 => DayPhase::Lunch,
            f if f < 0.85 => DayPhase::Afternoon,
            _ => DayPhase::Closing,
        }
    }
}

/// Calendar tracks the day number and elapsed time within the day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayClock {
    day: u32,
    elapsed_ms: Millis,
    total_ms: Millis,
    day_duration_ms: Millis,
}

impl DayClock {
    pub fn new(day_duration_ms: Millis) -> Self {
        Self {
            day: 1,
            elapsed_ms: 0.0,
            total_ms: 0.0,
            day_duration_ms,
        }
    }

    pub fn advance(&mut self, dt: Millis) {
        self.elapsed_ms += dt;
        self.total_ms += dt;
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Jump to a specific day (resume), restarting the in-day timer
    pub fn set_day(&mut self, day: u32) {
        self.day = day.max(1);
        self.elapsed_ms = 0.0;
    }

    pub fn elapsed_ms(&self) -> Millis {
        self.elapsed_ms
    }

    /// Simulation time since construction or the last reset
    pub fn total_ms(&self) -> Millis {
        self.total_ms
    }

    pub fn day_duration_ms(&self) -> Millis {
        self.day_duration_ms
    }

    pub fn fraction(&self) -> f64 {
        (self.elapsed_ms / self.day_duration_ms).clamp(0.0, 1.0)
    }

    pub fn phase(&self) -> DayPhase {
        DayPhase::from_fraction(self.fraction())
    }

    pub fn day_finished(&self) -> bool {
        self.elapsed_ms >= self.day_duration_ms
    }

    /// Move to the next day and restart the in-day timer
    pub fn end_day(&mut self) {
        self.day += 1;
        self.elapsed_ms = 0.0;
    }

    /// Restart the in-day timer without changing the day
    pub fn restart_day(&mut self) {
        self.elapsed_ms = 0.0;
    }

    /// Back to day 1 at time zero
    pub fn reset(&mut self) {
        self.day = 1;
        self.elapsed_ms = 0.0;
        self.total_ms = 0.0;
    }
}

impl Default for DayClock {
    fn default() -> Self {
        Self::new(60_000.0)
    }
}
