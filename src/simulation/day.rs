//! Day transitions
//!
//! A day ends when the clock runs out. Difficulty rises by a fixed step, the
//! base spawn interval shrinks towards its floor, and the floor is cleared
//! for the next day. Staff, upgrades, cash and reputation carry over.

use crate::core::config::SimulationConfig;
use crate::core::types::Millis;
use crate::entity::CustomerState;
use crate::simulation::customers::collect_payment;
use crate::simulation::{DayStats, Simulation, SimulationEvent};

/// Difficulty in effect on `day`
pub fn difficulty_for_day(day: u32, config: &SimulationConfig) -> f64 {
    day.saturating_sub(1) as f64 * config.difficulty_per_day
}

/// Base spawn interval in effect on `day`
pub fn base_spawn_for_day(day: u32, config: &SimulationConfig) -> Millis {
    let reduced = config.base_spawn_ms - day.saturating_sub(1) as f64 * config.base_spawn_day_step_ms;
    reduced.max(config.base_spawn_floor_ms)
}

/// Customers already at or walking to the register pay before closing
pub(crate) fn settle_register_payments(sim: &mut Simulation) {
    for idx in 0..sim.customers.len() {
        if matches!(
            sim.customers[idx].state,
            CustomerState::ToRegisterPay | CustomerState::Paying
        ) {
            collect_payment(sim, idx);
        }
    }
}

/// Clear the floor for a fresh day; hired staff and upgrades stay
pub(crate) fn reset_day_state(sim: &mut Simulation) {
    sim.customers.clear();
    sim.tickets.clear();
    sim.seating.clear();

    let extra = sim.economy.capacity_level as usize;
    for station in &mut sim.stations {
        station.reset_slots(extra);
    }

    sim.employees.retain(|e| !e.is_minion());
    for employee in &mut sim.employees {
        employee.drop_work();
        employee.pos = employee.home;
        employee.think_cd_ms = 0.0;
    }

    sim.manager.clear_work();
    sim.cache.invalidate();
    sim.rush.reset();
    sim.fx.clear();
    sim.spawn_timer_ms = 0.0;
    sim.economy.combo = 0;
    sim.economy.last_serve_ms = None;
    sim.day_stats = DayStats::default();
    sim.clock.restart_day();
}

/// Close the current day and open the next one
pub(crate) fn end_day(sim: &mut Simulation) {
    settle_register_payments(sim);

    let finished = sim.clock.day();
    let stats = sim.day_stats;
    tracing::info!(
        "Day {} closed: served {}, lost {}, earned ${}",
        finished,
        stats.served,
        stats.lost,
        stats.earned
    );
    sim.emit(SimulationEvent::DayEnded {
        day: finished,
        served: stats.served,
        lost: stats.lost,
        earned: stats.earned,
    });

    sim.clock.end_day();
    sim.resume_offer = None;
    let day = sim.clock.day();
    sim.difficulty += sim.config.difficulty_per_day;
    sim.base_spawn_ms =
        (sim.base_spawn_ms - sim.config.base_spawn_day_step_ms).max(sim.config.base_spawn_floor_ms);

    if day > sim.highest_day {
        sim.highest_day = day;
        if let Err(e) = sim.store.save(day) {
            tracing::warn!("Could not save highest day {}: {}", day, e);
        }
        sim.emit(SimulationEvent::NewRecord { day });
    }

    reset_day_state(sim);
    tracing::info!(
        "Day {} opens: difficulty {:.2}, base spawn {:.0}ms",
        day,
        sim.difficulty,
        sim.base_spawn_ms
    );
    sim.emit(SimulationEvent::DayStarted { day });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_formulas() {
        let config = SimulationConfig::default();
        assert_eq!(difficulty_for_day(1, &config), 0.0);
        assert_eq!(difficulty_for_day(5, &config), 1.0);
        assert_eq!(base_spawn_for_day(1, &config), 7000.0);
        assert_eq!(base_spawn_for_day(3, &config), 6000.0);
        assert_eq!(base_spawn_for_day(40, &config), 2000.0);
    }

    #[test]
    fn test_end_day_advances_and_records() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        sim.day_stats.served = 4;
        end_day(&mut sim);

        assert_eq!(sim.day(), 2);
        assert_eq!(sim.difficulty(), 0.25);
        assert_eq!(sim.base_spawn_ms(), 6500.0);
        assert_eq!(sim.highest_day(), 2);
        assert_eq!(sim.store.load().unwrap(), 2);
        assert_eq!(sim.day_stats(), DayStats::default());

        let events = sim.drain_events();
        assert_eq!(
            events[0],
            SimulationEvent::DayEnded {
                day: 1,
                served: 4,
                lost: 0,
                earned: 0
            }
        );
        assert!(events.contains(&SimulationEvent::NewRecord { day: 2 }));
        assert_eq!(events.last(), Some(&SimulationEvent::DayStarted { day: 2 }));
    }
}
