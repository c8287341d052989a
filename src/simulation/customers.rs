//! Customer movement, ordering, patience and payment

use crate::core::types::{CustomerId, Millis};
use crate::entity::CustomerState;
use crate::kitchen::tickets::{create_ticket, remove_ticket_for_customer};
use crate::simulation::fx::FxKind;
use crate::simulation::{Simulation, SimulationEvent};

/// Advance every customer by `dt`, then drop the ones that are gone
pub fn update_customers(sim: &mut Simulation, dt: Millis) {
    for idx in 0..sim.customers.len() {
        let decay = sim.config.patience_decay_per_ms * dt as f32;
        let customer = &mut sim.customers[idx];
        customer.bump_ms = (customer.bump_ms - dt).max(0.0);
        let id = customer.id;
        let step = customer.walk_speed * dt as f32;

        match customer.state {
            CustomerState::Queuing => {
                let Some(target) = customer.seat.and_then(|s| sim.seating.seat_position(s)) else {
                    continue;
                };
                let (pos, arrived) = customer.pos.step_towards(target, step);
                customer.pos = pos;
                if arrived {
                    customer.state = CustomerState::Ordering;
                    customer.timer_ms = sim.config.ordering_ms;
                }
            }
            CustomerState::Ordering => {
                customer.timer_ms -= dt;
                customer.patience -= decay;
                if customer.patience <= 0.0 {
                    leave_unhappy(sim, id);
                } else if customer.timer_ms <= 0.0 {
                    customer.state = CustomerState::Waiting;
                    create_ticket(sim, id);
                }
            }
            CustomerState::Waiting => {
                customer.patience -= decay;
                if customer.patience <= 0.0 {
                    leave_unhappy(sim, id);
                }
            }
            CustomerState::ToRegisterPay => {
                let (pos, arrived) = customer.pos.step_towards(sim.floor.register, step);
                customer.pos = pos;
                if arrived {
                    customer.state = CustomerState::Paying;
                    customer.timer_ms = sim.config.paying_ms;
                }
            }
            CustomerState::Paying => {
                customer.timer_ms -= dt;
                if customer.timer_ms <= 0.0 {
                    collect_payment(sim, idx);
                }
            }
            CustomerState::Served => {
                let (pos, arrived) = customer.pos.step_towards(sim.floor.exit, step);
                customer.pos = pos;
                if arrived {
                    customer.state = CustomerState::Gone;
                }
            }
            CustomerState::Leaving => {
                let (pos, arrived) = customer.pos.step_towards(sim.floor.entrance, step);
                customer.pos = pos;
                if arrived {
                    customer.state = CustomerState::Gone;
                }
            }
            CustomerState::Gone => {}
        }
    }

    sim.customers.retain(|c| c.state != CustomerState::Gone);
}

/// Take the customer's money at the register; they walk out afterwards
pub(crate) fn collect_payment(sim: &mut Simulation, idx: usize) {
    let customer = &mut sim.customers[idx];
    let amount = customer.due;
    let id = customer.id;
    let pos = customer.pos;
    customer.due = 0;
    customer.state = CustomerState::Served;

    sim.economy.cash += amount;
    sim.day_stats.earned += amount;
    let ttl = sim.config.fx_ttl_ms;
    sim.fx.push(format!("+${}", amount), pos, FxKind::Cash, ttl);
    tracing::debug!("{} paid ${}", id, amount);
    sim.emit(SimulationEvent::PaymentReceived {
        customer: id,
        amount,
    });
}

/// Patience ran out: the customer storms off and takes their ticket along
pub(crate) fn leave_unhappy(sim: &mut Simulation, id: CustomerId) {
    let Some(idx) = sim.customer_index(id) else {
        return;
    };
    let customer = &mut sim.customers[idx];
    customer.state = CustomerState::Leaving;
    customer.due = 0;
    let seat = customer.seat.take();
    let pos = customer.pos;
    if let Some(seat) = seat {
        sim.seating.release(seat, id);
    }
    remove_ticket_for_customer(sim, id);

    sim.economy.reputation = (sim.economy.reputation - sim.config.unhappy_rep_penalty).max(0);
    sim.economy.health = sim.economy.health.saturating_sub(1);
    sim.economy.combo = 0;
    sim.day_stats.lost += 1;

    let line = sim.flavor.unhappy_line();
    let ttl = sim.config.fx_ttl_ms;
    sim.fx.push(line, pos, FxKind::Unhappy, ttl);
    tracing::info!(
        "Customer {} left unhappy (health {}/{})",
        id,
        sim.economy.health,
        sim.economy.health_max
    );
    sim.emit(SimulationEvent::CustomerLeftUnhappy { customer: id });

    if sim.economy.health == 0 && !sim.game_over {
        sim.game_over = true;
        sim.running = false;
        tracing::info!("Game over on day {}", sim.clock.day());
        sim.emit(SimulationEvent::GameOver {
            day: sim.clock.day(),
        });
    }
}
