//! Experience and level-ups

use crate::core::config::SimulationConfig;
use crate::core::types::Millis;
use crate::entity::Employee;

/// XP for finishing a step that took `step_time_ms` on the recipe
pub fn step_xp(step_time_ms: Millis, config: &SimulationConfig) -> u32 {
    config.xp_per_step + (step_time_ms / config.xp_step_time_divisor).max(0.0).floor() as u32
}

/// XP needed to go from `level` to the next one
pub fn xp_for_level(level: u32, config: &SimulationConfig) -> u32 {
    config.xp_base + config.xp_growth * level.saturating_sub(1)
}

/// Add XP, applying any level-ups. Returns the new level if it changed.
/// Minions never level.
pub fn award_xp(employee: &mut Employee, amount: u32, config: &SimulationConfig) -> Option<u32> {
    if employee.is_minion() || amount == 0 {
        return None;
    }

    let start = employee.leveling.level;
    employee.leveling.xp += amount;
    while employee.leveling.xp >= employee.leveling.xp_to_next {
        employee.leveling.xp -= employee.leveling.xp_to_next;
        employee.leveling.level += 1;
        employee.leveling.xp_to_next = xp_for_level(employee.leveling.level, config);
    }

    if employee.leveling.level != start {
        employee.refresh_stats(config);
        tracing::debug!(
            "{} ({}) reached level {}",
            employee.name,
            employee.id,
            employee.leveling.level
        );
        Some(employee.leveling.level)
    } else {
        None
    }
}
