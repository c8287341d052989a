//! Rush hour: a burst of arrivals once per day

use serde::Serialize;

use crate::core::config::SimulationConfig;
use crate::core::types::Millis;

/// Rush state changes reported by [`RushState::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RushChange {
    Started,
    Ended,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RushState {
    /// Time left in the current rush; zero when inactive
    remaining_ms: Millis,
    triggered_today: bool,
}

impl RushState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }

    pub fn remaining_ms(&self) -> Millis {
        self.remaining_ms
    }

    /// Advance the rush timer; starts the rush once the day passes the
    /// configured fraction
    pub fn update(
        &mut self,
        day_fraction: f64,
        dt: Millis,
        config: &SimulationConfig,
    ) -> Option<RushChange> {
        if self.is_active() {
            self.remaining_ms -= dt;
            if self.remaining_ms <= 0.0 {
                self.remaining_ms = 0.0;
                return Some(RushChange::Ended);
            }
            return None;
        }
        if !self.triggered_today
            && config.rush_start_fraction < 1.0
            && day_fraction >= config.rush_start_fraction
        {
            self.triggered_today = true;
            self.remaining_ms = config.rush_duration_ms;
            return Some(RushChange::Started);
        }
        None
    }

    /// Multiplier on the spawn interval
    pub fn spawn_factor(&self, config: &SimulationConfig) -> f64 {
        if self.is_active() {
            config.rush_spawn_factor
        } else {
            1.0
        }
    }

    /// Extra room on the waiting-customer cap
    pub fn cap_bonus(&self, config: &SimulationConfig) -> usize {
        if self.is_active() {
            config.rush_cap_bonus
        } else {
            0
        }
    }

    /// New day: rush can trigger again
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rush_triggers_once_per_day() {
        let config = SimulationConfig::default();
        let mut rush = RushState::new();
        assert_eq!(rush.update(0.2, 16.0, &config), None);
        assert_eq!(rush.update(0.5, 16.0, &config), Some(RushChange::Started));
        assert!(rush.is_active());
        assert_eq!(rush.spawn_factor(&config), config.rush_spawn_factor);
        assert_eq!(rush.cap_bonus(&config), config.rush_cap_bonus);

        assert_eq!(
            rush.update(0.6, config.rush_duration_ms, &config),
            Some(RushChange::Ended)
        );
        assert!(!rush.is_active());
        assert_eq!(rush.update(0.7, 16.0, &config), None, "no second rush");

        rush.reset();
        assert_eq!(rush.update(0.9, 16.0, &config), Some(RushChange::Started));
    }

    #[test]
    fn test_rush_disabled_at_full_fraction() {
        let config = SimulationConfig {
            rush_start_fraction: 1.0,
            ..SimulationConfig::default()
        };
        let mut rush = RushState::new();
        assert_eq!(rush.update(0.99, 16.0, &config), None);
        assert_eq!(rush.spawn_factor(&config), 1.0);
    }
}
