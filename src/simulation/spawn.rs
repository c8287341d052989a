//! Customer arrivals
//!
//! Arrivals speed up through the day and from day to day:
//! `interval = max(floor, base * (1 - ramp * min(1, elapsed / ramp_ms)) - difficulty * step)`.
//! A customer only arrives when the interval has passed, fewer customers than
//! the cap are waiting for food, and a chair is free.

use crate::core::config::SimulationConfig;
use crate::core::rng::SimRng;
use crate::core::types::{CustomerId, Millis, Vec2};
use crate::entity::Customer;
use crate::simulation::{Simulation, SimulationEvent};

/// Time between arrivals right now
pub fn spawn_interval(
    base_spawn_ms: Millis,
    elapsed_ms: Millis,
    difficulty: f64,
    config: &SimulationConfig,
) -> Millis {
    let time_factor = (elapsed_ms / config.in_day_ramp_ms).min(1.0);
    let dynamic_base = base_spawn_ms * (1.0 - config.in_day_ramp * time_factor);
    (dynamic_base - difficulty * config.difficulty_spawn_step_ms).max(config.spawn_floor_ms)
}

/// Most customers allowed to wait for food at once
pub fn waiting_cap(difficulty: f64, config: &SimulationConfig) -> usize {
    let extra = (difficulty * config.waiting_cap_per_difficulty).floor().max(0.0) as usize;
    (config.base_waiting_cap + extra).min(config.max_waiting_cap)
}

/// Starting patience for a new customer
pub fn roll_patience(rng: &mut SimRng, rep_level: u32, vip: bool, config: &SimulationConfig) -> f32 {
    let jitter = rng.below(config.patience_jitter) as f32;
    let decor = rep_level.min(config.max_rep_patience_bonus) as f32;
    let vip_bonus = if vip { config.vip_patience_bonus } else { 0.0 };
    config.base_patience + jitter + decor + vip_bonus
}

/// Spawn a customer if the timer, the cap and the seating allow it
pub fn maybe_spawn(sim: &mut Simulation) -> Option<CustomerId> {
    let interval = spawn_interval(
        sim.base_spawn_ms,
        sim.clock.elapsed_ms(),
        sim.difficulty,
        &sim.config,
    ) * sim.rush.spawn_factor(&sim.config);
    if sim.spawn_timer_ms <= interval {
        return None;
    }

    let cap = waiting_cap(sim.difficulty, &sim.config) + sim.rush.cap_bonus(&sim.config);
    let waiting = sim
        .customers
        .iter()
        .filter(|c| c.state.is_waiting_for_food())
        .count();
    if waiting >= cap || sim.seating.free_count() == 0 {
        return None;
    }

    sim.spawn_timer_ms = 0.0;
    spawn_customer(sim)
}

/// Bring in one customer now; declines silently when no chair is free
pub fn spawn_customer(sim: &mut Simulation) -> Option<CustomerId> {
    if sim.seating.free_count() == 0 || sim.catalog.menu().is_empty() {
        return None;
    }
    let id = sim.ids.customer();
    let seat = sim.seating.reserve(id)?;

    let order = sim.rng.index(sim.catalog.menu().len());
    let vip = sim.rng.chance(sim.config.vip_chance);
    let patience = roll_patience(&mut sim.rng, sim.economy.rep_level, vip, &sim.config);
    let lane = sim.rng.below(120) as f32 - 60.0;
    let pos = sim.floor.entrance + Vec2::new(0.0, lane);

    let customer = Customer::new(
        id,
        order,
        vip,
        patience,
        seat,
        pos,
        sim.config.customer_walk_speed,
        sim.clock.total_ms(),
    );
    sim.customers.push(customer);

    let item = sim
        .catalog
        .menu_item(order)
        .map(|m| m.name.clone())
        .unwrap_or_default();
    tracing::debug!(
        "{} arrived for {}{} (patience {:.1}, seat {}:{})",
        id,
        item,
        if vip { " [VIP]" } else { "" },
        patience,
        seat.table,
        seat.chair
    );
    sim.emit(SimulationEvent::CustomerArrived {
        customer: id,
        item,
        vip,
    });
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_interval_day_one_start() {
        let config = SimulationConfig::default();
        assert_eq!(spawn_interval(7000.0, 0.0, 0.0, &config), 7000.0);
    }

    #[test]
    fn test_spawn_interval_ramps_within_day() {
        let config = SimulationConfig::default();
        // after a full minute: 7000 * 0.6
        let late = spawn_interval(7000.0, 60_000.0, 0.0, &config);
        assert!((late - 4200.0).abs() < 1e-9);
        let later = spawn_interval(7000.0, 120_000.0, 0.0, &config);
        assert_eq!(late, later, "ramp saturates");
    }

    #[test]
    fn test_spawn_interval_floor() {
        let config = SimulationConfig::default();
        assert_eq!(spawn_interval(2000.0, 60_000.0, 10.0, &config), 1000.0);
    }

    #[test]
    fn test_waiting_cap_scales_and_caps() {
        let config = SimulationConfig::default();
        assert_eq!(waiting_cap(0.0, &config), 4);
        assert_eq!(waiting_cap(1.0, &config), 5);
        assert_eq!(waiting_cap(2.0, &config), 7);
        assert_eq!(waiting_cap(100.0, &config), 12);
    }

    #[test]
    fn test_roll_patience_bounds() {
        let config = SimulationConfig::default();
        let mut rng = SimRng::new(1);
        for _ in 0..100 {
            let p = roll_patience(&mut rng, 0, false, &config);
            assert!((9.0..14.0).contains(&p), "patience {} out of range", p);
        }
        let vip = roll_patience(&mut rng, 5, true, &config);
        assert!(vip >= 9.0 + 3.0 + 3.0, "decor bonus capped at 3 plus VIP 3");
    }
}
