//! Station scheduler - runs the jobs sitting in station slots
//!
//! Each tick every occupied slot loses `dt * speed_multiplier` of remaining
//! time. A job reaching zero completes atomically:
//! - the ticket's step advances (Tray, or Ready when no steps remain)
//! - a finished order books its payout onto the customer's bill
//! - the finisher earns XP and goes back to idle
//! - the slot frees up
//!
//! Completions run in station order, then slot order.

use crate::catalog::StationKind;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::Millis;
use crate::entity::Duty;
use crate::simulation::fx::FxKind;
use crate::simulation::{Simulation, SimulationEvent};
use crate::staff::leveling::{award_xp, step_xp};
use crate::staff::phase::WorkerEvent;

/// Speed from difficulty alone; starts slow and ramps up
pub fn global_speed(difficulty: f64, config: &SimulationConfig) -> f64 {
    config.base_global_speed + difficulty * config.global_speed_per_difficulty
}

/// How fast jobs on `station` count down
pub fn speed_multiplier(
    station: StationKind,
    speed_level: u32,
    difficulty: f64,
    config: &SimulationConfig,
) -> f64 {
    let drink_bonus = if station == StationKind::Drink {
        config.drink_station_bonus
    } else {
        0.0
    };
    (1.0 + speed_level as f64 * config.speed_upgrade_step + drink_bonus)
        * global_speed(difficulty, config)
}

/// Advance every job by `dt`, completing the ones that run out
pub fn advance_stations(sim: &mut Simulation, dt: Millis) -> Result<()> {
    let mut finished = Vec::new();

    for (station_idx, station) in sim.stations.iter_mut().enumerate() {
        let mult = speed_multiplier(
            station.kind,
            sim.economy.speed_level,
            sim.difficulty,
            &sim.config,
        );
        for (slot_idx, slot) in station.slots.iter_mut().enumerate() {
            if let Some(job) = slot.job.as_mut() {
                job.remaining_ms -= dt * mult;
                if job.remaining_ms <= 0.0 {
                    finished.push((station_idx, slot_idx));
                }
            }
        }
    }

    for (station_idx, slot_idx) in finished {
        complete_job(sim, station_idx, slot_idx)?;
    }
    Ok(())
}

fn complete_job(sim: &mut Simulation, station_idx: usize, slot_idx: usize) -> Result<()> {
    let Some(job) = sim.stations[station_idx].slots[slot_idx].job.take() else {
        return Ok(());
    };
    let station = sim.stations[station_idx].kind;

    let Some(ticket_idx) = sim.ticket_index(job.ticket_id) else {
        // Ticket left with its customer; the cascade should have cleared this
        tracing::debug!("Job for missing ticket {} dropped", job.ticket_id);
        if let Some(id) = job.employee {
            if let Some(e) = sim.employee_mut(id) {
                e.drop_work();
            }
        }
        return Ok(());
    };

    let ticket = &mut sim.tickets[ticket_idx];
    if ticket.step_index != job.step_index {
        return Err(SimError::Invariant(format!(
            "job for {} ran step {} but ticket is at step {}",
            ticket.id, job.step_index, ticket.step_index
        )));
    }
    let step_time = ticket.recipe[job.step_index].time_ms;
    let customer_id = ticket.customer_id;
    let item = ticket.item;
    let now_ready = ticket.finish_step();

    sim.emit(SimulationEvent::StepCompleted {
        ticket: job.ticket_id,
        station,
    });

    // Finisher goes back to idle and earns XP
    let mut special_stacks = 0;
    if let Some(employee_id) = job.employee {
        if let Some(idx) = sim.employee_index(employee_id) {
            let employee = &mut sim.employees[idx];
            if let Duty::Station { phase, .. } = &mut employee.duty {
                *phase = phase.apply(WorkerEvent::JobFinished)?;
            }
            special_stacks = employee.leveling.special_stacks;
            let xp = step_xp(step_time, &sim.config);
            if let Some(level) = award_xp(employee, xp, &sim.config) {
                sim.emit(SimulationEvent::LevelUp {
                    employee: employee_id,
                    level,
                });
            }
        }
    }

    if now_ready {
        let price = sim.catalog.menu_item(item).map(|m| m.price).unwrap_or(0);
        let ttl = sim.config.fx_ttl_ms;
        let anchor = sim.floor.station_anchor(station);
        let vip_multiplier = sim.config.vip_payout_multiplier;
        let stack_bonus = sim.config.special_stack_bonus;

        let mut payout = 0;
        if let Some(customer) = sim.customer_mut(customer_id) {
            let base = if customer.vip {
                (price as f64 * vip_multiplier).round() as i64
            } else {
                price
            };
            payout = base + special_stacks as i64 * stack_bonus;
            customer.due += payout;
        }

        sim.fx.push(format!("+${}", payout), anchor, FxKind::Cash, ttl);
        tracing::debug!("Order {} ready (+${} booked)", job.ticket_id, payout);
        sim.emit(SimulationEvent::OrderReady {
            ticket: job.ticket_id,
            customer: customer_id,
            payout,
        });
    }
    Ok(())
}
