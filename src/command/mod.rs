//! Command surface
//!
//! Everything the player (or a script) can do to a running simulation.
//! Commands validate before they mutate: a rejected command returns a
//! [`CommandError`], logs a warning and leaves the state exactly as it was.

use serde::{Deserialize, Serialize};

use crate::catalog::{ArchetypeRole, StationKind};
use crate::core::error::CommandError;
use crate::core::types::{CustomerId, EmployeeId, IdGen, TicketId};
use crate::core::SimRng;
use crate::entity::{Duty, Employee, TicketState};
use crate::kitchen::tickets::{self, JobPace};
use crate::simulation::day::{base_spawn_for_day, difficulty_for_day, reset_day_state};
use crate::simulation::fx::FxKind;
use crate::simulation::{DeliverySource, Simulation, SimulationEvent};
use crate::staff::phase::{WorkTask, WorkerEvent};

/// Purchasable upgrades; each has its own level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeKind {
    /// Faster stations
    Speed,
    /// One more slot on every station
    Capacity,
    /// Decor: more reputation per serve and more patient customers
    Reputation,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 3] = [
        UpgradeKind::Speed,
        UpgradeKind::Capacity,
        UpgradeKind::Reputation,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            UpgradeKind::Speed => "speed",
            UpgradeKind::Capacity => "capacity",
            UpgradeKind::Reputation => "reputation",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "speed" => Some(UpgradeKind::Speed),
            "capacity" | "cap" => Some(UpgradeKind::Capacity),
            "reputation" | "rep" | "decor" => Some(UpgradeKind::Reputation),
            _ => None,
        }
    }

    /// Price of the next level when `level` levels are owned
    pub fn cost(&self, level: u32) -> i64 {
        let level = level as i64;
        match self {
            UpgradeKind::Speed => 50 + 30 * level,
            UpgradeKind::Capacity => 75 + 40 * level,
            UpgradeKind::Reputation => 40 + 25 * level,
        }
    }
}

/// Log a rejected command and pass the result through
fn logged<T>(command: &str, result: Result<T, CommandError>) -> Result<T, CommandError> {
    if let Err(e) = &result {
        tracing::warn!("{} rejected: {}", command, e);
    }
    result
}

impl Simulation {
    fn ensure_playable(&self) -> Result<(), CommandError> {
        if self.frozen {
            return Err(CommandError::Frozen);
        }
        if self.game_over {
            return Err(CommandError::GameOver);
        }
        Ok(())
    }

    fn upgrade_level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Speed => self.economy.speed_level,
            UpgradeKind::Capacity => self.economy.capacity_level,
            UpgradeKind::Reputation => self.economy.rep_level,
        }
    }

    fn charge(&mut self, cost: i64) -> Result<(), CommandError> {
        if self.economy.cash < cost {
            return Err(CommandError::InsufficientFunds {
                need: cost,
                have: self.economy.cash,
            });
        }
        self.economy.cash -= cost;
        Ok(())
    }

    /// Hire one employee of archetype `key`; each archetype at most once
    pub fn hire(&mut self, key: &str) -> Result<EmployeeId, CommandError> {
        logged("hire", self.try_hire(key))
    }

    fn try_hire(&mut self, key: &str) -> Result<EmployeeId, CommandError> {
        self.ensure_playable()?;
        let archetype = self
            .catalog
            .archetype(key)
            .cloned()
            .ok_or_else(|| CommandError::UnknownArchetype(key.to_string()))?;
        if self
            .employees
            .iter()
            .any(|e| !e.is_minion() && e.archetype == archetype.key)
        {
            return Err(CommandError::AlreadyHired(archetype.key));
        }
        self.charge(archetype.cost)?;

        let home = match archetype.role {
            ArchetypeRole::Station(kind) => self.floor.station_anchor(kind),
            ArchetypeRole::Runner => self.floor.staff_room,
        };
        let id = self.ids.employee();
        let mut employee = Employee::hire(id, &archetype, home, &self.config);
        employee.pos = self.floor.staff_room;
        self.employees.push(employee);

        tracing::info!(
            "Hired {} ({}) for ${}, cash left ${}",
            archetype.name,
            id,
            archetype.cost,
            self.economy.cash
        );
        self.emit(SimulationEvent::EmployeeHired {
            employee: id,
            archetype: archetype.key,
        });
        Ok(id)
    }

    /// Buy the next level of an upgrade; returns the new level
    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> Result<u32, CommandError> {
        logged("upgrade", self.try_purchase_upgrade(kind))
    }

    fn try_purchase_upgrade(&mut self, kind: UpgradeKind) -> Result<u32, CommandError> {
        self.ensure_playable()?;
        let cost = kind.cost(self.upgrade_level(kind));
        self.charge(cost)?;

        let level = match kind {
            UpgradeKind::Speed => {
                self.economy.speed_level += 1;
                self.economy.speed_level
            }
            UpgradeKind::Capacity => {
                self.economy.capacity_level += 1;
                for station in &mut self.stations {
                    station.add_slot();
                }
                self.economy.capacity_level
            }
            UpgradeKind::Reputation => {
                self.economy.rep_level += 1;
                self.economy.rep_level
            }
        };

        tracing::info!("Upgraded {} to level {} for ${}", kind.key(), level, cost);
        self.emit(SimulationEvent::UpgradePurchased { kind, level, cost });
        Ok(level)
    }

    /// Drop a ticket on a station. With `employee` set, that station worker
    /// takes the job at their own pace; otherwise it runs unattended.
    pub fn place_ticket_on_station(
        &mut self,
        ticket: TicketId,
        station: StationKind,
        employee: Option<EmployeeId>,
    ) -> Result<usize, CommandError> {
        logged("place", self.try_place(ticket, station, employee))
    }

    fn try_place(
        &mut self,
        ticket_id: TicketId,
        station: StationKind,
        employee: Option<EmployeeId>,
    ) -> Result<usize, CommandError> {
        self.ensure_playable()?;
        tickets::check_placement(self, ticket_id, station, JobPace::Unattended)?;

        let Some(employee_id) = employee else {
            return tickets::place_ticket(self, ticket_id, station, JobPace::Unattended);
        };

        let idx = self
            .employee_index(employee_id)
            .ok_or(CommandError::EmployeeNotFound(employee_id))?;
        let available = match self.employees[idx].duty {
            Duty::Station { station: own, phase } => own == station && phase.is_idle(),
            Duty::Runner { .. } => false,
        };
        if !available {
            return Err(CommandError::EmployeeUnavailable {
                employee: employee_id,
                station: station.key().to_string(),
            });
        }
        let customer_id = self
            .ticket(ticket_id)
            .map(|t| t.customer_id)
            .ok_or(CommandError::TicketNotFound(ticket_id))?;

        let task = WorkTask {
            ticket_id,
            customer_id,
        };
        let Some(phase) = self.employees[idx].phase() else {
            return Err(CommandError::EmployeeUnavailable {
                employee: employee_id,
                station: station.key().to_string(),
            });
        };
        let working = phase
            .apply(WorkerEvent::Claim(task))
            .and_then(|p| p.apply(WorkerEvent::ReachedCustomer))
            .and_then(|p| p.apply(WorkerEvent::JobPlaced))
            .map_err(|e| {
                tracing::error!("Hand-off to {} failed: {}", employee_id, e);
                CommandError::EmployeeUnavailable {
                    employee: employee_id,
                    station: station.key().to_string(),
                }
            })?;

        // The worker takes the ticket straight from the player's hand
        if let Some(ticket) = self.ticket_mut(ticket_id) {
            ticket.state = TicketState::Claimed;
            ticket.assigned_to = Some(employee_id);
        }
        if let Duty::Station { phase, .. } = &mut self.employees[idx].duty {
            *phase = working;
        }
        self.employees[idx].pos = self.floor.station_anchor(station);
        tickets::place_ticket(self, ticket_id, station, JobPace::Worker(employee_id))
    }

    /// Hand a ready order to its customer; returns the tip
    pub fn deliver_ticket(
        &mut self,
        ticket: TicketId,
        customer: CustomerId,
    ) -> Result<i64, CommandError> {
        let result = self
            .ensure_playable()
            .and_then(|_| tickets::deliver_ticket(self, ticket, customer, DeliverySource::Player));
        logged("deliver", result)
    }

    /// Pick up a tray or ready ticket; the staff leave it alone meanwhile
    pub fn begin_drag(&mut self, ticket: TicketId) -> Result<(), CommandError> {
        let result = self
            .ensure_playable()
            .and_then(|_| tickets::begin_drag(self, ticket));
        logged("drag", result)
    }

    pub fn end_drag(&mut self, ticket: TicketId) -> Result<(), CommandError> {
        logged("drop", tickets::end_drag(self, ticket))
    }

    /// Open the restaurant. Does nothing if a day is already running.
    pub fn start_day(&mut self) -> Result<(), CommandError> {
        logged("start", self.try_start_day())
    }

    fn try_start_day(&mut self) -> Result<(), CommandError> {
        self.ensure_playable()?;
        if self.running {
            return Ok(());
        }

        let day = self.clock.day();
        self.economy.health = self.economy.health_max;
        self.difficulty = difficulty_for_day(day, &self.config);
        self.base_spawn_ms = base_spawn_for_day(day, &self.config);
        reset_day_state(self);
        self.running = true;
        self.paused = false;

        if day == 1 {
            match self.store.load() {
                Ok(record) => self.highest_day = self.highest_day.max(record),
                Err(e) => tracing::warn!("Could not load highest day: {}", e),
            }
            if self.highest_day > 1 {
                self.resume_offer = Some(self.highest_day);
                self.emit(SimulationEvent::ResumeOffered {
                    day: self.highest_day,
                });
            }
        }

        tracing::info!(
            "Day {} started (difficulty {:.2}, health {})",
            day,
            self.difficulty,
            self.economy.health
        );
        self.emit(SimulationEvent::DayStarted { day });
        Ok(())
    }

    /// Jump to the recorded highest day instead of playing from day 1
    pub fn accept_resume(&mut self) -> Result<u32, CommandError> {
        logged("resume", self.try_accept_resume())
    }

    fn try_accept_resume(&mut self) -> Result<u32, CommandError> {
        self.ensure_playable()?;
        let day = self.resume_offer.take().ok_or(CommandError::NoResumeOffer)?;

        self.clock.set_day(day);
        self.difficulty = difficulty_for_day(day, &self.config);
        self.base_spawn_ms = base_spawn_for_day(day, &self.config);
        reset_day_state(self);

        tracing::info!("Resumed at day {}", day);
        self.emit(SimulationEvent::DayStarted { day });
        Ok(day)
    }

    /// Returns the new paused flag
    pub fn toggle_pause(&mut self) -> Result<bool, CommandError> {
        logged("pause", self.try_toggle_pause())
    }

    fn try_toggle_pause(&mut self) -> Result<bool, CommandError> {
        self.ensure_playable()?;
        self.paused = !self.paused;
        tracing::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        self.emit(SimulationEvent::PauseToggled {
            paused: self.paused,
        });
        Ok(self.paused)
    }

    /// Returns the new manager flag
    pub fn toggle_manager(&mut self) -> Result<bool, CommandError> {
        logged("manager", self.try_toggle_manager())
    }

    fn try_toggle_manager(&mut self) -> Result<bool, CommandError> {
        self.ensure_playable()?;
        self.manager.enabled = !self.manager.enabled;
        if !self.manager.enabled {
            self.manager.clear_work();
        }

        let line = self.flavor.manager_line();
        tracing::info!(
            "Manager mode {}: \"{}\"",
            if self.manager.enabled { "on" } else { "off" },
            line
        );
        let ttl = self.config.fx_ttl_ms;
        let pos = self.floor.staff_room;
        self.fx.push(line, pos, FxKind::Quip, ttl);
        self.emit(SimulationEvent::ManagerToggled {
            enabled: self.manager.enabled,
        });
        Ok(self.manager.enabled)
    }

    /// Back to a fresh day 1. Config, catalog and the pluggable store, sink
    /// and flavor table are kept; so is the loaded highest-day record.
    pub fn reset_game(&mut self) {
        let highest_day = self.highest_day;
        self.rng = SimRng::new(self.config.seed);
        self.ids = IdGen::new();
        self.clock.reset();
        self.employees.clear();
        self.economy = crate::simulation::Economy {
            cash: self.config.starting_cash,
            health: self.config.health_max,
            health_max: self.config.health_max,
            ..Default::default()
        };
        self.difficulty = 0.0;
        self.base_spawn_ms = self.config.base_spawn_ms;
        reset_day_state(self);

        self.running = false;
        self.paused = false;
        self.game_over = false;
        self.frozen = false;
        self.manager = Default::default();
        self.ai_stats = Default::default();
        self.events.clear();
        self.breadcrumbs.clear();
        self.crash = None;
        self.resume_offer = None;
        self.highest_day = highest_day;
        tracing::info!("Game reset");
    }
}
