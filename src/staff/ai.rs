//! Staff AI - per-tick decisions for hired staff and minions
//!
//! Station workers loop through Idle -> ToCustomer -> ToStation -> Working.
//! Runners pick the most urgent ready order and carry it over. Any task
//! whose ticket changed underneath it is dropped without fuss.

use crate::catalog::StationKind;
use crate::core::error::{CommandError, Result, SimError};
use crate::core::types::{Millis, Vec2};
use crate::entity::{Carry, CustomerState, Duty, TicketState};
use crate::kitchen::tickets::{check_placement, deliver_ticket, place_ticket, JobPace};
use crate::simulation::{DeliverySource, Simulation, SimulationEvent};
use crate::staff::phase::{WorkTask, WorkerEvent, WorkerPhase};

/// Run one tick of decisions for every employee
pub fn run_staff(sim: &mut Simulation, dt: Millis) -> Result<()> {
    for idx in 0..sim.employees.len() {
        sim.employees[idx].think_cd_ms -= dt;
        match sim.employees[idx].duty {
            Duty::Station { station, phase } => step_station_worker(sim, idx, station, phase, dt)?,
            Duty::Runner { carrying } => step_runner(sim, idx, carrying, dt),
        }
    }
    Ok(())
}

/// Re-arm the think cooldown with a little jitter
fn rearm_think(sim: &mut Simulation, idx: usize) {
    let cd = sim
        .rng
        .range_f64(sim.config.think_cooldown_min_ms, sim.config.think_cooldown_max_ms);
    sim.employees[idx].think_cd_ms = cd;
}

/// Walk towards `target`; true on arrival
fn walk(sim: &mut Simulation, idx: usize, target: Vec2, dt: Millis) -> bool {
    let employee = &mut sim.employees[idx];
    let max_dist = employee.walk_distance(dt, &sim.config);
    let (pos, arrived) = employee.pos.step_towards(target, max_dist);
    employee.pos = pos;
    arrived
}

fn set_phase(sim: &mut Simulation, idx: usize, event: WorkerEvent) -> Result<()> {
    if let Duty::Station { phase, .. } = &mut sim.employees[idx].duty {
        *phase = phase.apply(event)?;
    }
    Ok(())
}

/// The worker still holds the claim and the customer is still waiting
fn task_still_held(sim: &Simulation, idx: usize, task: WorkTask) -> bool {
    let me = sim.employees[idx].id;
    let ticket_ok = sim
        .ticket(task.ticket_id)
        .map(|t| t.state == TicketState::Claimed && t.assigned_to == Some(me))
        .unwrap_or(false);
    let customer_ok = sim
        .customer(task.customer_id)
        .map(|c| c.state == CustomerState::Waiting)
        .unwrap_or(false);
    ticket_ok && customer_ok
}

/// Give up a task: the ticket (if still ours) goes back to rest
fn release_task(sim: &mut Simulation, idx: usize, task: WorkTask) -> Result<()> {
    let me = sim.employees[idx].id;
    if let Some(ticket) = sim.ticket_mut(task.ticket_id) {
        if ticket.assigned_to == Some(me) {
            ticket.release();
        }
    }
    set_phase(sim, idx, WorkerEvent::Release)?;
    sim.ai_stats.stale_releases += 1;
    tracing::debug!("{} dropped stale task on {}", me, task.ticket_id);
    Ok(())
}

fn step_station_worker(
    sim: &mut Simulation,
    idx: usize,
    station: StationKind,
    phase: WorkerPhase,
    dt: Millis,
) -> Result<()> {
    let me = sim.employees[idx].id;
    match phase {
        WorkerPhase::Idle => {
            let home = sim.floor.station_anchor(station);
            walk(sim, idx, home, dt);
            if sim.employees[idx].think_cd_ms > 0.0 {
                return Ok(());
            }
            rearm_think(sim, idx);

            let task = sim
                .cache
                .take_queued(station, &sim.tickets, &sim.customers, &mut sim.ai_stats);
            if let Some(task) = task {
                if let Some(ticket) = sim.ticket_mut(task.ticket_id) {
                    ticket.state = TicketState::Claimed;
                    ticket.assigned_to = Some(me);
                }
                set_phase(sim, idx, WorkerEvent::Claim(task))?;
                sim.ai_stats.claims += 1;
                tracing::debug!("{} claimed {} for {}", me, task.ticket_id, station);
                sim.emit(SimulationEvent::TicketClaimed {
                    ticket: task.ticket_id,
                    employee: me,
                });
            }
        }
        WorkerPhase::ToCustomer(task) => {
            if !task_still_held(sim, idx, task) {
                return release_task(sim, idx, task);
            }
            let Some(target) = sim.customer(task.customer_id).map(|c| c.pos) else {
                return release_task(sim, idx, task);
            };
            if walk(sim, idx, target, dt) {
                let bump = sim.config.bump_ms;
                if let Some(customer) = sim.customer_mut(task.customer_id) {
                    customer.bump_ms = bump;
                }
                set_phase(sim, idx, WorkerEvent::ReachedCustomer)?;
            }
        }
        WorkerPhase::ToStation(task) => {
            if !task_still_held(sim, idx, task) {
                return release_task(sim, idx, task);
            }
            let home = sim.floor.station_anchor(station);
            if !walk(sim, idx, home, dt) {
                return Ok(());
            }
            match check_placement(sim, task.ticket_id, station, JobPace::Worker(me)) {
                Ok(_) => {
                    place_ticket(sim, task.ticket_id, station, JobPace::Worker(me))
                        .map_err(|e| SimError::Invariant(e.to_string()))?;
                    set_phase(sim, idx, WorkerEvent::JobPlaced)?;
                }
                // Wait at the station until a slot frees up
                Err(CommandError::StationFull(_)) => {}
                Err(_) => release_task(sim, idx, task)?,
            }
        }
        WorkerPhase::Working(task) => {
            let running = sim.stations.iter().any(|s| {
                s.slots.iter().any(|slot| {
                    slot.job
                        .as_ref()
                        .map(|j| j.ticket_id == task.ticket_id && j.employee == Some(me))
                        .unwrap_or(false)
                })
            });
            if !running {
                set_phase(sim, idx, WorkerEvent::Release)?;
                sim.ai_stats.stale_releases += 1;
            }
        }
    }
    Ok(())
}

fn step_runner(sim: &mut Simulation, idx: usize, carrying: Option<Carry>, dt: Millis) {
    let me = sim.employees[idx].id;
    match carrying {
        Some(mut carry) => {
            if let Some(target) = sim.customer(carry.customer_id).map(|c| c.pos) {
                walk(sim, idx, target, dt);
            }
            carry.eta_ms -= dt;
            if carry.eta_ms > 0.0 {
                sim.employees[idx].duty = Duty::Runner {
                    carrying: Some(carry),
                };
                return;
            }
            sim.employees[idx].duty = Duty::Runner { carrying: None };
            // Another runner or the player may have got there first
            if let Err(e) = deliver_ticket(
                sim,
                carry.ticket_id,
                carry.customer_id,
                DeliverySource::Runner(me),
            ) {
                sim.ai_stats.dropped_carries += 1;
                tracing::debug!("{} dropped carry of {}: {}", me, carry.ticket_id, e);
            }
        }
        None => {
            let home = sim.employees[idx].home;
            walk(sim, idx, home, dt);
            if sim.employees[idx].think_cd_ms > 0.0 {
                return;
            }
            rearm_think(sim, idx);

            let entry = sim
                .cache
                .peek_ready(&sim.tickets, &sim.customers, &mut sim.ai_stats);
            if let Some(entry) = entry {
                let speed = sim.employees[idx].speed.max(0.01) as f64;
                sim.employees[idx].duty = Duty::Runner {
                    carrying: Some(Carry {
                        ticket_id: entry.ticket_id,
                        customer_id: entry.customer_id,
                        eta_ms: sim.config.runner_carry_ms / speed,
                    }),
                };
                sim.ai_stats.runner_pickups += 1;
                tracing::debug!("{} carrying {} to {}", me, entry.ticket_id, entry.customer_id);
            }
        }
    }
}
