//! Ticket lifecycle operations
//!
//! Tray -> Claimed -> InStation -> (Tray | Ready) -> delivered. Every
//! operation checks first and mutates second, so a rejected call leaves the
//! simulation untouched.

use crate::catalog::StationKind;
use crate::core::error::CommandError;
use crate::core::types::{CustomerId, EmployeeId, TicketId};
use crate::entity::{CustomerState, Job, Ticket, TicketState};
use crate::simulation::fx::FxKind;
use crate::simulation::{DeliverySource, Simulation, SimulationEvent};
use crate::staff::leveling::award_xp;

/// Who is putting a ticket on a station; decides the job duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPace {
    /// Player dropped it in; full step time
    Unattended,
    /// Station worker holding the claim
    Worker(EmployeeId),
    /// Manager placing directly
    Manager,
}

/// Create the ticket for a customer who just finished ordering
pub fn create_ticket(sim: &mut Simulation, customer_id: CustomerId) -> Option<TicketId> {
    let order = sim.customer(customer_id)?.order;
    let item = sim.catalog.menu_item(order)?.clone();
    let id = sim.ids.ticket();
    let now = sim.clock.total_ms();
    sim.tickets
        .push(Ticket::new(id, customer_id, order, &item, now));
    tracing::debug!("Ticket {} created for {}: {}", id, customer_id, item.name);
    sim.emit(SimulationEvent::OrderPlaced {
        customer: customer_id,
        ticket: id,
    });
    Some(id)
}

/// Check a placement without changing anything; returns (station index, slot)
pub fn check_placement(
    sim: &Simulation,
    ticket_id: TicketId,
    station: StationKind,
    pace: JobPace,
) -> Result<(usize, usize), CommandError> {
    let ticket = sim
        .ticket(ticket_id)
        .ok_or(CommandError::TicketNotFound(ticket_id))?;
    let station_idx = sim
        .station_index(station)
        .ok_or_else(|| CommandError::UnknownStation(station.key().to_string()))?;

    let holds_ticket = match pace {
        JobPace::Worker(employee) => {
            ticket.state == TicketState::Claimed && ticket.assigned_to == Some(employee)
        }
        JobPace::Unattended | JobPace::Manager => {
            ticket.state == TicketState::Tray && ticket.assigned_to.is_none()
        }
    };
    if !holds_ticket {
        return Err(CommandError::TicketBusy {
            ticket: ticket_id,
            state: ticket.state.label().to_string(),
        });
    }

    if !ticket.needs_station(station) {
        return Err(CommandError::StepMismatch {
            ticket: ticket_id,
            station: station.key().to_string(),
        });
    }

    let slot = sim.stations[station_idx]
        .free_slot_index()
        .ok_or_else(|| CommandError::StationFull(station.key().to_string()))?;
    Ok((station_idx, slot))
}

/// Put a ticket's current step on the first free slot of `station`
pub fn place_ticket(
    sim: &mut Simulation,
    ticket_id: TicketId,
    station: StationKind,
    pace: JobPace,
) -> Result<usize, CommandError> {
    let (station_idx, slot) = check_placement(sim, ticket_id, station, pace)?;

    let employee_speed = match pace {
        JobPace::Worker(id) => Some(
            sim.employee(id)
                .map(|e| e.speed as f64)
                .ok_or(CommandError::EmployeeNotFound(id))?,
        ),
        _ => None,
    };

    let ticket_idx = sim
        .ticket_index(ticket_id)
        .ok_or(CommandError::TicketNotFound(ticket_id))?;
    let ticket = &mut sim.tickets[ticket_idx];
    let step_index = ticket.step_index;
    let step_time = ticket
        .current_step()
        .map(|s| s.time_ms)
        .ok_or(CommandError::TicketNotReady { ticket: ticket_id })?;

    let remaining = match (pace, employee_speed) {
        (JobPace::Worker(_), Some(speed)) if speed > 0.0 => {
            (step_time / speed).max(sim.config.min_job_ms)
        }
        (JobPace::Manager, _) => step_time / sim.config.manager_speed,
        _ => step_time,
    };

    let employee = match pace {
        JobPace::Worker(id) => Some(id),
        _ => None,
    };
    ticket.state = TicketState::InStation;
    ticket.dragging = false;
    ticket.assigned_to = employee;
    if let Some(id) = employee {
        ticket.helpers.insert(id);
    }

    sim.stations[station_idx].slots[slot].job = Some(Job {
        ticket_id,
        step_index,
        remaining_ms: remaining,
        total_ms: remaining,
        employee,
    });

    tracing::debug!(
        "Ticket {} on {} slot {} ({:.0}ms)",
        ticket_id,
        station,
        slot,
        remaining
    );
    sim.emit(SimulationEvent::JobStarted {
        ticket: ticket_id,
        station,
        slot,
        employee,
    });
    Ok(slot)
}

/// Check a delivery without changing anything
pub fn check_delivery(
    sim: &Simulation,
    ticket_id: TicketId,
    customer_id: CustomerId,
) -> Result<(), CommandError> {
    let ticket = sim
        .ticket(ticket_id)
        .ok_or(CommandError::TicketNotFound(ticket_id))?;
    let customer = sim
        .customer(customer_id)
        .ok_or(CommandError::CustomerNotFound(customer_id))?;
    if ticket.state != TicketState::Ready {
        return Err(CommandError::TicketNotReady { ticket: ticket_id });
    }
    if ticket.customer_id != customer_id {
        return Err(CommandError::CustomerMismatch {
            ticket: ticket_id,
            owner: ticket.customer_id,
            customer: customer_id,
        });
    }
    if customer.state != CustomerState::Waiting {
        return Err(CommandError::CustomerNotWaiting(customer_id));
    }
    Ok(())
}

/// Hand a ready order to its customer. Returns the tip.
///
/// The customer gives up their seat and heads to the register with the
/// tip and bonuses added to what they owe.
pub fn deliver_ticket(
    sim: &mut Simulation,
    ticket_id: TicketId,
    customer_id: CustomerId,
    by: DeliverySource,
) -> Result<i64, CommandError> {
    check_delivery(sim, ticket_id, customer_id)?;

    let ticket_idx = sim
        .ticket_index(ticket_id)
        .ok_or(CommandError::TicketNotFound(ticket_id))?;
    let ticket = sim.tickets.remove(ticket_idx);
    sim.cache.forget_ready(ticket_id);

    let now = sim.clock.total_ms();
    let combo = match sim.economy.last_serve_ms {
        Some(last) if now - last < sim.config.combo_window_ms => sim.economy.combo + 1,
        _ => 1,
    };
    sim.economy.combo = combo;
    sim.economy.last_serve_ms = Some(now);

    // Helpers who ran steps on this order shape the tip
    let helpers: Vec<_> = sim
        .employees
        .iter()
        .filter(|e| ticket.helpers.contains(&e.id))
        .collect();
    let best_quality = helpers
        .iter()
        .map(|e| e.quality)
        .fold(None, |best: Option<f32>, q| Some(best.map_or(q, |b| b.max(q))))
        .unwrap_or(1.0);

    let Some(customer_idx) = sim.customer_index(customer_id) else {
        return Err(CommandError::CustomerNotFound(customer_id));
    };
    let vip = sim.customers[customer_idx].vip;
    let per_level = if vip {
        sim.config.vip_tip_per_level
    } else {
        sim.config.tip_per_level
    };
    let level_bonus: i64 = helpers
        .iter()
        .map(|e| e.leveling.level.saturating_sub(1) as i64 * per_level)
        .sum();
    let patience = sim.customers[customer_idx].patience.max(0.0);
    let tip = (patience * best_quality).floor() as i64 + level_bonus;

    let manual = if by == DeliverySource::Player {
        sim.config.manual_tip
    } else {
        0
    };
    let combo_bonus = if combo >= 2 { combo as i64 } else { 0 };

    let rep_gain = 1
        + sim.economy.rep_level as i64
        + if combo >= 3 { 1 } else { 0 }
        + if vip { 1 } else { 0 };
    sim.economy.reputation += rep_gain;

    let price = sim
        .catalog
        .menu_item(ticket.item)
        .map(|m| m.price)
        .unwrap_or(0);

    let customer = &mut sim.customers[customer_idx];
    if customer.due == 0 {
        customer.due = price;
    }
    customer.due += tip + manual + combo_bonus;
    customer.state = CustomerState::ToRegisterPay;
    customer.bump_ms = sim.config.bump_ms;
    let seat = customer.seat.take();
    let pos = customer.pos;
    if let Some(seat) = seat {
        sim.seating.release(seat, customer_id);
    }
    sim.day_stats.served += 1;

    if let DeliverySource::Runner(runner) = by {
        if let Some(idx) = sim.employee_index(runner) {
            if let Some(level) = award_xp(&mut sim.employees[idx], sim.config.xp_per_delivery, &sim.config) {
                sim.emit(SimulationEvent::LevelUp {
                    employee: runner,
                    level,
                });
            }
        }
    }

    let ttl = sim.config.fx_ttl_ms;
    let tip_text = if combo_bonus > 0 {
        format!("+${} tip x{}", tip + manual, combo)
    } else {
        format!("+${} tip", tip + manual)
    };
    sim.fx.push(tip_text, pos, FxKind::Tip, ttl);

    tracing::debug!(
        "Delivered {} to {} (tip {}, combo {}, rep +{})",
        ticket_id,
        customer_id,
        tip,
        combo,
        rep_gain
    );
    sim.emit(SimulationEvent::OrderDelivered {
        ticket: ticket_id,
        customer: customer_id,
        tip: tip + manual,
        combo,
        by,
    });
    Ok(tip + manual)
}

/// Remove a departing customer's ticket and every reference to it
///
/// Clears station jobs running it, releases any employee claim or task,
/// drops runner and manager carries. Safe to call when no ticket exists.
pub fn remove_ticket_for_customer(sim: &mut Simulation, customer_id: CustomerId) {
    let Some(idx) = sim.tickets.iter().position(|t| t.customer_id == customer_id) else {
        return;
    };
    let ticket = sim.tickets.remove(idx);

    let mut freed = Vec::new();
    for station in &mut sim.stations {
        freed.extend(station.clear_ticket(ticket.id));
    }
    for employee in &mut sim.employees {
        if freed.contains(&employee.id) || employee.held_ticket() == Some(ticket.id) {
            employee.drop_work();
        }
    }
    sim.manager.drop_carry_of(ticket.id);
    sim.cache.forget_ready(ticket.id);

    tracing::debug!(
        "Removed ticket {} with departing {} ({} staff freed)",
        ticket.id,
        customer_id,
        freed.len()
    );
}

/// Pick up a ticket with the pointer
pub fn begin_drag(sim: &mut Simulation, ticket_id: TicketId) -> Result<(), CommandError> {
    let ticket = sim
        .ticket_mut(ticket_id)
        .ok_or(CommandError::TicketNotFound(ticket_id))?;
    let free = matches!(ticket.state, TicketState::Tray | TicketState::Ready)
        && ticket.assigned_to.is_none()
        && !ticket.dragging;
    if !free {
        let state = if ticket.dragging {
            "dragging".to_string()
        } else {
            ticket.state.label().to_string()
        };
        return Err(CommandError::TicketBusy {
            ticket: ticket_id,
            state,
        });
    }
    ticket.dragging = true;
    Ok(())
}

/// Let go of a dragged ticket; it stays where it was
pub fn end_drag(sim: &mut Simulation, ticket_id: TicketId) -> Result<(), CommandError> {
    let ticket = sim
        .ticket_mut(ticket_id)
        .ok_or(CommandError::TicketNotFound(ticket_id))?;
    ticket.dragging = false;
    Ok(())
}
