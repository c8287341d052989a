//! Employees: hired staff and manager minions

use serde::{Deserialize, Serialize};

use crate::catalog::{ArchetypeRole, EmployeeArchetype, StationKind};
use crate::core::config::SimulationConfig;
use crate::core::types::{CustomerId, EmployeeId, Millis, TicketId, Vec2};
use crate::staff::phase::WorkerPhase;

/// A ready order a runner is carrying
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Carry {
    pub ticket_id: TicketId,
    pub customer_id: CustomerId,
    /// Time left until the runner arrives at the table
    pub eta_ms: Millis,
}

/// What an employee does
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Duty {
    Station {
        station: StationKind,
        phase: WorkerPhase,
    },
    Runner {
        carrying: Option<Carry>,
    },
}

/// Experience and level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leveling {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    /// Bonus payout stacks; one per `levels_per_special` levels
    pub special_stacks: u32,
}

impl Leveling {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next: config.xp_base,
            special_stacks: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    /// Archetype key; minions use "minion"
    pub archetype: String,
    pub name: String,
    pub duty: Duty,
    pub pos: Vec2,
    /// Post where the employee waits when idle
    pub home: Vec2,
    pub base_speed: f32,
    pub base_quality: f32,
    /// Derived from base speed and level
    pub speed: f32,
    /// Derived from base quality and level
    pub quality: f32,
    pub leveling: Leveling,
    pub think_cd_ms: Millis,
    /// Remaining life for manager minions; None for hires
    pub lifespan_ms: Option<Millis>,
}

impl Employee {
    /// Build a hire from its archetype
    pub fn hire(
        id: EmployeeId,
        archetype: &EmployeeArchetype,
        home: Vec2,
        config: &SimulationConfig,
    ) -> Self {
        let duty = match archetype.role {
            ArchetypeRole::Station(station) => Duty::Station {
                station,
                phase: WorkerPhase::Idle,
            },
            ArchetypeRole::Runner => Duty::Runner { carrying: None },
        };
        Self {
            id,
            archetype: archetype.key.clone(),
            name: archetype.name.clone(),
            duty,
            pos: home,
            home,
            base_speed: archetype.speed,
            base_quality: archetype.quality,
            speed: archetype.speed,
            quality: archetype.quality,
            leveling: Leveling::new(config),
            think_cd_ms: 0.0,
            lifespan_ms: None,
        }
    }

    /// Short-lived runner summoned by the manager
    pub fn minion(id: EmployeeId, home: Vec2, config: &SimulationConfig) -> Self {
        Self {
            id,
            archetype: "minion".into(),
            name: "Minion".into(),
            duty: Duty::Runner { carrying: None },
            pos: home,
            home,
            base_speed: config.minion_speed,
            base_quality: 1.0,
            speed: config.minion_speed,
            quality: 1.0,
            leveling: Leveling::new(config),
            think_cd_ms: 0.0,
            lifespan_ms: Some(config.minion_lifespan_ms),
        }
    }

    pub fn is_minion(&self) -> bool {
        self.lifespan_ms.is_some()
    }

    pub fn station(&self) -> Option<StationKind> {
        match self.duty {
            Duty::Station { station, .. } => Some(station),
            Duty::Runner { .. } => None,
        }
    }

    pub fn is_station_worker(&self) -> bool {
        self.station().is_some()
    }

    pub fn is_runner(&self) -> bool {
        matches!(self.duty, Duty::Runner { .. })
    }

    pub fn phase(&self) -> Option<WorkerPhase> {
        match self.duty {
            Duty::Station { phase, .. } => Some(phase),
            Duty::Runner { .. } => None,
        }
    }

    pub fn carrying(&self) -> Option<Carry> {
        match self.duty {
            Duty::Runner { carrying } => carrying,
            Duty::Station { .. } => None,
        }
    }

    /// Ticket the employee currently holds a reference to, if any
    pub fn held_ticket(&self) -> Option<TicketId> {
        match self.duty {
            Duty::Station { phase, .. } => phase.task().map(|t| t.ticket_id),
            Duty::Runner { carrying } => carrying.map(|c| c.ticket_id),
        }
    }

    /// Free to pick up new work
    pub fn is_free(&self) -> bool {
        match self.duty {
            Duty::Station { phase, .. } => phase.is_idle(),
            Duty::Runner { carrying } => carrying.is_none(),
        }
    }

    /// Drop any task or carry, back to idle
    pub fn drop_work(&mut self) {
        match &mut self.duty {
            Duty::Station { phase, .. } => *phase = WorkerPhase::Idle,
            Duty::Runner { carrying } => *carrying = None,
        }
    }

    /// Recompute derived stats after a level change
    pub fn refresh_stats(&mut self, config: &SimulationConfig) {
        let bonus = self.leveling.level.saturating_sub(1) as f32;
        self.speed = self.base_speed * (1.0 + bonus * config.speed_per_level);
        self.quality = self.base_quality * (1.0 + bonus * config.quality_per_level);
        self.leveling.special_stacks = self.leveling.level / config.levels_per_special;
    }

    /// Distance covered in `dt` when walking
    pub fn walk_distance(&self, dt: Millis, config: &SimulationConfig) -> f32 {
        config.employee_walk_speed * dt as f32 * (0.9 + 0.2 * self.speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::staff::default_archetypes;
    use crate::staff::phase::WorkTask;

    fn archetype(key: &str) -> EmployeeArchetype {
        default_archetypes()
            .into_iter()
            .find(|a| a.key == key)
            .unwrap()
    }

    #[test]
    fn test_hire_station_worker() {
        let config = SimulationConfig::default();
        let e = Employee::hire(EmployeeId(1), &archetype("cook"), Vec2::default(), &config);
        assert_eq!(e.station(), Some(StationKind::Cook));
        assert_eq!(e.phase(), Some(WorkerPhase::Idle));
        assert!(!e.is_minion());
        assert!(e.is_free());
        assert_eq!(e.leveling.xp_to_next, config.xp_base);
    }

    #[test]
    fn test_minion_is_runner_with_lifespan() {
        let config = SimulationConfig::default();
        let m = Employee::minion(EmployeeId(9), Vec2::default(), &config);
        assert!(m.is_minion());
        assert!(m.is_runner());
        assert_eq!(m.speed, config.minion_speed);
    }

    #[test]
    fn test_held_ticket_and_drop_work() {
        let config = SimulationConfig::default();
        let mut e = Employee::hire(EmployeeId(1), &archetype("junior"), Vec2::default(), &config);
        let task = WorkTask {
            ticket_id: TicketId(5),
            customer_id: CustomerId(4),
        };
        e.duty = Duty::Station {
            station: StationKind::Prep,
            phase: WorkerPhase::ToStation(task),
        };
        assert_eq!(e.held_ticket(), Some(TicketId(5)));
        e.drop_work();
        assert_eq!(e.held_ticket(), None);
        assert!(e.is_free());
    }

    #[test]
    fn test_refresh_stats_scales_with_level() {
        let config = SimulationConfig::default();
        let mut e = Employee::hire(EmployeeId(1), &archetype("cook"), Vec2::default(), &config);
        e.leveling.level = 11;
        e.refresh_stats(&config);
        assert!((e.speed - 1.4).abs() < 1e-5, "speed was {}", e.speed);
        assert!((e.quality - 1.2).abs() < 1e-5, "quality was {}", e.quality);
        assert_eq!(e.leveling.special_stacks, 1);
    }

    #[test]
    fn test_walk_distance_matches_formula() {
        let config = SimulationConfig::default();
        let e = Employee::hire(EmployeeId(1), &archetype("cook"), Vec2::default(), &config);
        // 0.25 * 16 * (0.9 + 0.2 * 1.0)
        assert!((e.walk_distance(16.0, &config) - 4.4).abs() < 1e-5);
    }
}
