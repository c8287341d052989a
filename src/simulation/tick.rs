//! Tick system - orchestrates simulation updates
//!
//! One call to [`Simulation::advance`] runs the phases in a fixed order:
//! timers -> effects -> work cache -> rush and manager -> spawning ->
//! staff AI -> stations -> customers -> day end.
//!
//! A phase may fail with a [`SimError`] or panic outright. Either way the
//! loop stops, a [`CrashReport`] is captured and handed to the diagnostics
//! sink, and the simulation stays frozen until `reset_game`.

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::Serialize;

use crate::core::error::{Result, SimError};
use crate::core::types::Millis;
use crate::kitchen::scheduler::advance_stations;
use crate::simulation::customers::update_customers;
use crate::simulation::day::end_day;
use crate::simulation::rush::RushChange;
use crate::simulation::spawn::maybe_spawn;
use crate::simulation::{CrashReport, Simulation, SimulationEvent};
use crate::staff::ai::run_staff;
use crate::staff::manager::run_manager;

/// Phase the tick loop is in; recorded in crash reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TickPhase {
    #[default]
    Idle,
    Timers,
    Fx,
    Cache,
    SpecialModes,
    Spawn,
    Staff,
    Stations,
    Customers,
    DayEnd,
}

impl TickPhase {
    pub fn name(&self) -> &'static str {
        match self {
            TickPhase::Idle => "idle",
            TickPhase::Timers => "timers",
            TickPhase::Fx => "fx",
            TickPhase::Cache => "cache",
            TickPhase::SpecialModes => "special_modes",
            TickPhase::Spawn => "spawn",
            TickPhase::Staff => "staff",
            TickPhase::Stations => "stations",
            TickPhase::Customers => "customers",
            TickPhase::DayEnd => "day_end",
        }
    }
}

impl Simulation {
    /// Advance the simulation by one frame of `raw_dt` milliseconds and
    /// return the events it produced.
    ///
    /// The delta is clamped to `max_frame_dt_ms`. Nothing moves while the
    /// simulation is stopped, paused, over or frozen; events raised by
    /// commands since the last call are still returned.
    pub fn advance(&mut self, raw_dt: Millis) -> Vec<SimulationEvent> {
        let dt = raw_dt.clamp(0.0, self.config.max_frame_dt_ms);
        self.last_frame_dt_ms = dt;

        if self.running && !self.paused && !self.frozen && !self.game_over {
            let outcome = catch_unwind(AssertUnwindSafe(|| run_phases(self, dt)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => self.fault("error", &e.to_string()),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    self.fault("panic", &SimError::Panic(message).to_string());
                }
            }
            self.phase = TickPhase::Idle;
        }

        self.drain_events()
    }

    /// Stop the loop and record what went wrong
    fn fault(&mut self, kind: &str, message: &str) {
        self.running = false;
        self.paused = true;
        self.frozen = true;

        let report = CrashReport::capture(self, kind, message);
        tracing::error!(
            "Simulation fault in {} phase on day {}: {}",
            self.phase.name(),
            self.clock.day(),
            message
        );
        self.sink.report(&report);
        self.crash = Some(report);
        self.emit(SimulationEvent::Fault {
            message: message.to_string(),
        });
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn run_phases(sim: &mut Simulation, dt: Millis) -> Result<()> {
    sim.phase = TickPhase::Timers;
    sim.clock.advance(dt);
    sim.spawn_timer_ms += dt;

    sim.phase = TickPhase::Fx;
    sim.fx.expire(dt);

    sim.phase = TickPhase::Cache;
    if sim.cache.due(dt, &sim.config) {
        sim.cache.rebuild(&sim.tickets, &sim.customers);
        sim.ai_stats.cache_rebuilds += 1;
    }

    sim.phase = TickPhase::SpecialModes;
    match sim.rush.update(sim.clock.fraction(), dt, &sim.config) {
        Some(RushChange::Started) => {
            tracing::info!("Rush hour on day {}", sim.clock.day());
            sim.emit(SimulationEvent::RushStarted);
        }
        Some(RushChange::Ended) => {
            tracing::info!("Rush hour over");
            sim.emit(SimulationEvent::RushEnded);
        }
        None => {}
    }
    run_manager(sim, dt)?;

    sim.phase = TickPhase::Spawn;
    maybe_spawn(sim);

    sim.phase = TickPhase::Staff;
    run_staff(sim, dt)?;

    sim.phase = TickPhase::Stations;
    advance_stations(sim, dt)?;

    sim.phase = TickPhase::Customers;
    update_customers(sim, dt);

    sim.phase = TickPhase::DayEnd;
    if sim.clock.day_finished() && !sim.game_over {
        end_day(sim);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::kitchen::tickets::{create_ticket, place_ticket, JobPace};
    use crate::simulation::spawn::spawn_customer;

    fn running_sim() -> Simulation {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        sim.start_day().unwrap();
        sim.drain_events();
        sim
    }

    #[test]
    fn test_advance_does_nothing_before_start() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        sim.advance(16.0);
        assert_eq!(sim.clock().total_ms(), 0.0);
    }

    #[test]
    fn test_advance_clamps_long_frames() {
        let mut sim = running_sim();
        sim.advance(5_000.0);
        assert_eq!(sim.clock().total_ms(), 50.0);
    }

    #[test]
    fn test_paused_simulation_holds_still() {
        let mut sim = running_sim();
        sim.toggle_pause().unwrap();
        sim.advance(16.0);
        assert_eq!(sim.clock().total_ms(), 0.0);
    }

    #[test]
    fn test_phase_names_unique() {
        let phases = [
            TickPhase::Idle,
            TickPhase::Timers,
            TickPhase::Fx,
            TickPhase::Cache,
            TickPhase::SpecialModes,
            TickPhase::Spawn,
            TickPhase::Staff,
            TickPhase::Stations,
            TickPhase::Customers,
            TickPhase::DayEnd,
        ];
        let mut names: Vec<_> = phases.iter().map(|p| p.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), phases.len());
    }

    #[test]
    fn test_corrupted_job_freezes_simulation() {
        let mut sim = running_sim();
        let customer = spawn_customer(&mut sim).unwrap();
        sim.customer_mut(customer).unwrap().state = crate::entity::CustomerState::Waiting;
        let ticket = create_ticket(&mut sim, customer).unwrap();
        let kind = sim.ticket(ticket).unwrap().current_step().unwrap().station;
        place_ticket(&mut sim, ticket, kind, JobPace::Unattended).unwrap();

        // Job and ticket now disagree about which step is running
        sim.ticket_mut(ticket).unwrap().step_index += 1;

        let mut fault = None;
        for _ in 0..2_000 {
            let events = sim.advance(16.0);
            if let Some(e) = events
                .into_iter()
                .find(|e| matches!(e, SimulationEvent::Fault { .. }))
            {
                fault = Some(e);
                break;
            }
        }

        assert!(fault.is_some(), "fault event expected");
        assert!(sim.is_frozen());
        assert!(!sim.is_running());
        let report = sim.crash_report().unwrap();
        assert_eq!(report.meta.phase, "stations");
        assert_eq!(report.error.kind, "error");

        let before = sim.clock().total_ms();
        sim.advance(16.0);
        assert_eq!(sim.clock().total_ms(), before, "frozen simulation stays put");
    }
}
