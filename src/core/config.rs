//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. A config can be loaded from a TOML
//! file; any field left out keeps its default.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Configuration for the restaurant simulation
///
/// These values reproduce the pacing of the original browser game.
/// Changing them will affect difficulty and feel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === RNG ===
    /// Seed for the deterministic random stream
    pub seed: u64,

    // === CLOCK ===
    /// Largest frame delta accepted by `advance` (ms)
    ///
    /// Slow frames are clamped to this to avoid a spiral of death where a
    /// long frame spawns a burst of customers and expires everybody's
    /// patience at once.
    pub max_frame_dt_ms: f64,

    /// Length of one in-game day (ms)
    pub day_duration_ms: f64,

    // === ECONOMY ===
    /// Starting and maximum health; each unhappy customer costs one
    pub health_max: u32,

    /// Cash at the start of a fresh game
    pub starting_cash: i64,

    /// Reputation lost when a customer walks out unhappy
    pub unhappy_rep_penalty: i64,

    /// Window in which consecutive serves grow the combo (ms)
    pub combo_window_ms: f64,

    /// Extra tip for a delivery made by the player by hand
    pub manual_tip: i64,

    // === SPAWNING ===
    /// Spawn interval at the start of day 1 (ms)
    pub base_spawn_ms: f64,

    /// Per-day reduction of the base spawn interval (ms)
    pub base_spawn_day_step_ms: f64,

    /// Lowest value the base spawn interval can reach through day ramping (ms)
    pub base_spawn_floor_ms: f64,

    /// Fraction by which the interval shrinks over the first minute of a day
    ///
    /// At 0.4 the interval is 60% of the base once `in_day_ramp_ms` has passed.
    pub in_day_ramp: f64,

    /// Time over which the in-day ramp reaches full strength (ms)
    pub in_day_ramp_ms: f64,

    /// Interval reduction per point of difficulty (ms)
    pub difficulty_spawn_step_ms: f64,

    /// Absolute lower bound of the effective spawn interval (ms)
    pub spawn_floor_ms: f64,

    /// Waiting-customer cap at difficulty 0
    pub base_waiting_cap: usize,

    /// Additional cap per point of difficulty (floored)
    pub waiting_cap_per_difficulty: f64,

    /// Hard upper bound of the waiting-customer cap
    pub max_waiting_cap: usize,

    /// Chance that a new customer is a VIP
    pub vip_chance: f64,

    // === DIFFICULTY ===
    /// Difficulty gained at each day transition
    pub difficulty_per_day: f64,

    /// Global station speed at difficulty 0
    ///
    /// Stations start slow (0.7) and speed up as difficulty grows, so early
    /// days leave room for manual play.
    pub base_global_speed: f64,

    /// Global station speed gained per point of difficulty
    pub global_speed_per_difficulty: f64,

    // === CUSTOMERS ===
    /// Patience before the random jitter is added
    pub base_patience: f32,

    /// Random patience jitter range, exclusive upper bound (whole units)
    pub patience_jitter: u32,

    /// Patience units lost per millisecond of waiting (1 / 1200)
    pub patience_decay_per_ms: f32,

    /// Extra patience given to VIPs
    pub vip_patience_bonus: f32,

    /// Highest patience bonus the reputation upgrade can grant
    pub max_rep_patience_bonus: u32,

    /// Walking speed of customers (px / ms)
    pub customer_walk_speed: f32,

    /// Time a seated customer spends ordering before the ticket prints (ms)
    pub ordering_ms: f64,

    /// Time spent paying at the register (ms)
    pub paying_ms: f64,

    /// Duration of the cosmetic bump when staff visit a table (ms)
    pub bump_ms: f64,

    // === PAYOUTS ===
    /// Payout multiplier for VIP orders
    pub vip_payout_multiplier: f64,

    /// Tip per helper level above 1 for regular customers
    pub tip_per_level: i64,

    /// Tip per helper level above 1 for VIPs
    pub vip_tip_per_level: i64,

    /// Flat bonus per special stack of the employee finishing an order
    pub special_stack_bonus: i64,

    // === STATIONS ===
    /// Speed bonus per speed-upgrade level
    pub speed_upgrade_step: f64,

    /// Built-in speed bonus of the drink station
    pub drink_station_bonus: f64,

    /// Shortest job an employee can be assigned, regardless of speed (ms)
    pub min_job_ms: f64,

    // === STAFF AI ===
    /// How often the prioritized work queues are rebuilt (ms)
    ///
    /// A full tickets x stations rescan every frame is wasteful; 150ms keeps
    /// queues close to current patience ordering. Consumers re-validate every
    /// entry before acting on it.
    pub ai_cache_rebuild_ms: f64,

    /// Lower bound of an employee's think cooldown (ms)
    pub think_cooldown_min_ms: f64,

    /// Upper bound (exclusive) of an employee's think cooldown (ms)
    pub think_cooldown_max_ms: f64,

    /// Base employee walking speed (px / ms), scaled by `0.9 + 0.2 * speed`
    pub employee_walk_speed: f32,

    /// Runner carry time at speed 1.0 (ms)
    pub runner_carry_ms: f64,

    // === LEVELING ===
    /// XP for finishing one station step, before the time bonus
    pub xp_per_step: u32,

    /// One extra XP per this many ms of step time
    pub xp_step_time_divisor: f64,

    /// XP for one runner delivery
    pub xp_per_delivery: u32,

    /// XP needed to reach level 2; grows by `xp_growth` per level
    pub xp_base: u32,

    /// Additional XP needed per level
    pub xp_growth: u32,

    /// Speed multiplier gained per level
    pub speed_per_level: f32,

    /// Quality multiplier gained per level
    pub quality_per_level: f32,

    /// Levels per special stack
    pub levels_per_special: u32,

    // === MANAGER ===
    /// Manager think interval (ms)
    pub manager_think_ms: f64,

    /// Manager work and carry speed
    pub manager_speed: f64,

    /// Minion spawn check interval (ms)
    pub minion_interval_ms: f64,

    /// Minion lifespan (ms)
    pub minion_lifespan_ms: f64,

    /// Minion runner speed
    pub minion_speed: f32,

    /// Most minions alive at once
    pub max_minions: usize,

    // === RUSH HOUR ===
    /// Fraction of the day at which rush hour begins; 1.0 or more disables it
    pub rush_start_fraction: f64,

    /// Rush hour length (ms)
    pub rush_duration_ms: f64,

    /// Spawn interval multiplier during rush hour
    pub rush_spawn_factor: f64,

    /// Waiting cap bonus during rush hour
    pub rush_cap_bonus: usize,

    // === FLOOR ===
    /// Number of tables
    pub table_count: usize,

    /// Chairs per table
    pub seats_per_table: usize,

    // === EFFECTS & DIAGNOSTICS ===
    /// Lifetime of floating text effects (ms)
    pub fx_ttl_ms: f64,

    /// Breadcrumb ring size
    pub breadcrumb_capacity: usize,

    /// Collections in crash reports are trimmed to this many entries
    pub crash_preview_limit: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED_CAFE,

            max_frame_dt_ms: 50.0,
            day_duration_ms: 60_000.0,

            health_max: 10,
            starting_cash: 0,
            unhappy_rep_penalty: 2,
            combo_window_ms: 3_000.0,
            manual_tip: 1,

            base_spawn_ms: 7_000.0,
            base_spawn_day_step_ms: 500.0,
            base_spawn_floor_ms: 2_000.0,
            in_day_ramp: 0.4,
            in_day_ramp_ms: 60_000.0,
            difficulty_spawn_step_ms: 250.0,
            spawn_floor_ms: 1_000.0,
            base_waiting_cap: 4,
            waiting_cap_per_difficulty: 1.5,
            max_waiting_cap: 12,
            vip_chance: 0.12,

            difficulty_per_day: 0.25,
            base_global_speed: 0.7,
            global_speed_per_difficulty: 0.15,

            base_patience: 9.0,
            patience_jitter: 5,
            patience_decay_per_ms: 1.0 / 1_200.0,
            vip_patience_bonus: 3.0,
            max_rep_patience_bonus: 3,
            customer_walk_speed: 0.25,
            ordering_ms: 600.0,
            paying_ms: 500.0,
            bump_ms: 200.0,

            vip_payout_multiplier: 1.5,
            tip_per_level: 1,
            vip_tip_per_level: 2,
            special_stack_bonus: 3,

            speed_upgrade_step: 0.3,
            drink_station_bonus: 0.2,
            min_job_ms: 200.0,

            ai_cache_rebuild_ms: 150.0,
            think_cooldown_min_ms: 120.0,
            think_cooldown_max_ms: 300.0,
            employee_walk_speed: 0.25,
            runner_carry_ms: 300.0,

            xp_per_step: 10,
            xp_step_time_divisor: 500.0,
            xp_per_delivery: 8,
            xp_base: 60,
            xp_growth: 20,
            speed_per_level: 0.04,
            quality_per_level: 0.02,
            levels_per_special: 10,

            manager_think_ms: 250.0,
            manager_speed: 1.5,
            minion_interval_ms: 6_000.0,
            minion_lifespan_ms: 12_000.0,
            minion_speed: 2.5,
            max_minions: 2,

            rush_start_fraction: 0.5,
            rush_duration_ms: 8_000.0,
            rush_spawn_factor: 0.5,
            rush_cap_bonus: 2,

            table_count: 6,
            seats_per_table: 2,

            fx_ttl_ms: 900.0,
            breadcrumb_capacity: 200,
            crash_preview_limit: 50,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing fields keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate().map_err(SimError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_frame_dt_ms <= 0.0 || self.day_duration_ms <= 0.0 {
            return Err("Frame clamp and day duration must be positive".into());
        }

        if self.think_cooldown_min_ms >= self.think_cooldown_max_ms {
            return Err(format!(
                "think_cooldown_min_ms ({}) should be < think_cooldown_max_ms ({})",
                self.think_cooldown_min_ms, self.think_cooldown_max_ms
            ));
        }

        if self.spawn_floor_ms <= 0.0 || self.base_spawn_floor_ms < self.spawn_floor_ms {
            return Err(format!(
                "base_spawn_floor_ms ({}) should be >= spawn_floor_ms ({}) > 0",
                self.base_spawn_floor_ms, self.spawn_floor_ms
            ));
        }

        if !(0.0..=1.0).contains(&self.vip_chance) {
            return Err(format!("vip_chance ({}) must be within 0..=1", self.vip_chance));
        }

        if self.table_count == 0 || self.seats_per_table == 0 {
            return Err("The floor needs at least one seat".into());
        }

        if self.health_max == 0 {
            return Err("health_max must be positive".into());
        }

        if self.levels_per_special == 0 {
            return Err("levels_per_special must be positive".into());
        }

        // Level thresholds of 0 would level up forever
        if self.xp_base == 0 {
            return Err("xp_base must be at least 1".into());
        }

        // Divisors
        for (name, value) in [
            ("in_day_ramp_ms", self.in_day_ramp_ms),
            ("xp_step_time_divisor", self.xp_step_time_divisor),
            ("manager_speed", self.manager_speed),
            ("base_global_speed", self.base_global_speed),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(format!("{} ({}) must be positive", name, value));
            }
        }

        for (name, value) in [
            ("customer_walk_speed", self.customer_walk_speed),
            ("employee_walk_speed", self.employee_walk_speed),
            ("minion_speed", self.minion_speed),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(format!("{} ({}) must be positive", name, value));
            }
        }

        for (name, value) in [
            ("runner_carry_ms", self.runner_carry_ms),
            ("min_job_ms", self.min_job_ms),
            ("ordering_ms", self.ordering_ms),
            ("paying_ms", self.paying_ms),
        ] {
            if value < 0.0 {
                return Err(format!("{} ({}) must not be negative", name, value));
            }
        }

        Ok(())
    }

    /// Total seats on the floor
    pub fn seat_count(&self) -> usize {
        self.table_count * self.seats_per_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_seats_cover_max_cap() {
        let config = SimulationConfig::default();
        assert!(config.seat_count() >= config.max_waiting_cap);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
seed = 42
day_duration_ms = 30000.0
"#,
        )
        .expect("partial config should parse");
        assert_eq!(config.seed, 42);
        assert_eq!(config.day_duration_ms, 30_000.0);
        assert_eq!(config.health_max, 10, "untouched fields keep defaults");
    }

    #[test]
    fn test_invalid_cooldowns_rejected() {
        let result = SimulationConfig::from_toml_str(
            r#"
think_cooldown_min_ms = 500.0
think_cooldown_max_ms = 100.0
"#,
        );
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    fn rejected(toml: &str) -> bool {
        matches!(
            SimulationConfig::from_toml_str(toml),
            Err(SimError::InvalidConfig(_))
        )
    }

    #[test]
    fn test_zero_level_threshold_rejected() {
        assert!(rejected("xp_base = 0\nxp_growth = 0\n"));
        assert!(rejected("xp_base = 0\n"), "xp_base alone must be at least 1");
        assert!(!rejected("xp_base = 1\nxp_growth = 0\n"));
    }

    #[test]
    fn test_zero_or_negative_divisors_rejected() {
        assert!(rejected("manager_speed = 0.0\n"));
        assert!(rejected("manager_speed = -1.5\n"));
        assert!(rejected("in_day_ramp_ms = 0.0\n"));
        assert!(rejected("in_day_ramp_ms = -10.0\n"));
        assert!(rejected("xp_step_time_divisor = 0.0\n"));
        assert!(rejected("xp_step_time_divisor = -500.0\n"));
        assert!(rejected("base_global_speed = 0.0\n"));
    }

    #[test]
    fn test_nan_divisor_rejected() {
        let config = SimulationConfig {
            manager_speed: f64::NAN,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_walk_speeds_rejected() {
        assert!(rejected("customer_walk_speed = 0.0\n"));
        assert!(rejected("employee_walk_speed = -0.25\n"));
        assert!(rejected("minion_speed = 0.0\n"));
    }

    #[test]
    fn test_negative_durations_rejected() {
        assert!(rejected("runner_carry_ms = -1.0\n"));
        assert!(rejected("min_job_ms = -200.0\n"));
        assert!(!rejected("runner_carry_ms = 0.0\n"), "instant hand-off is allowed");
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let result = SimulationConfig::from_toml_str("seed = [");
        assert!(matches!(result, Err(SimError::TomlError(_))));
    }
}
