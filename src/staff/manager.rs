//! Manager mode
//!
//! With manager mode on and no regular station workers hired, a virtual
//! manager keeps the kitchen from stalling: it carries ready orders and puts
//! queued tickets straight onto stations. It also summons short-lived runner
//! minions while orders sit ready with nobody on the line.

use serde::Serialize;

use crate::catalog::StationKind;
use crate::core::error::Result;
use crate::core::types::{Millis, TicketId};
use crate::entity::{Carry, Employee};
use crate::kitchen::tickets::{deliver_ticket, place_ticket, JobPace};
use crate::simulation::fx::FxKind;
use crate::simulation::{DeliverySource, Simulation, SimulationEvent};
use crate::staff::cache::ready_ticket_valid;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ManagerState {
    pub enabled: bool,
    think_ms: Millis,
    minion_timer_ms: Millis,
    carrying: Option<Carry>,
    pub deliveries: u64,
    pub placements: u64,
    pub minions_summoned: u64,
}

impl ManagerState {
    pub fn carrying(&self) -> Option<Carry> {
        self.carrying
    }

    /// Forget a carry whose ticket went away
    pub fn drop_carry_of(&mut self, ticket: TicketId) {
        if self.carrying.map(|c| c.ticket_id) == Some(ticket) {
            self.carrying = None;
        }
    }

    /// Drop in-flight work and timers; the toggle stays as it is
    pub fn clear_work(&mut self) {
        self.carrying = None;
        self.think_ms = 0.0;
        self.minion_timer_ms = 0.0;
    }
}

/// Whether the manager is stepping in right now
pub fn manager_active(sim: &Simulation) -> bool {
    sim.manager.enabled && !sim.has_station_staff()
}

/// Any ready order with its customer still waiting
fn ready_delivery_exists(sim: &Simulation) -> bool {
    sim.tickets
        .iter()
        .any(|t| ready_ticket_valid(t.id, t.customer_id, &sim.tickets, &sim.customers))
}

/// Manager, minion and lifespan timers for one tick
pub fn run_manager(sim: &mut Simulation, dt: Millis) -> Result<()> {
    expire_minions(sim, dt);
    if !sim.manager.enabled {
        return Ok(());
    }

    sim.manager.minion_timer_ms += dt;
    if sim.manager.minion_timer_ms >= sim.config.minion_interval_ms {
        sim.manager.minion_timer_ms = 0.0;
        maybe_summon_minion(sim);
    }

    if let Some(mut carry) = sim.manager.carrying {
        carry.eta_ms -= dt;
        if carry.eta_ms > 0.0 {
            sim.manager.carrying = Some(carry);
            return Ok(());
        }
        sim.manager.carrying = None;
        match deliver_ticket(sim, carry.ticket_id, carry.customer_id, DeliverySource::Manager) {
            Ok(_) => sim.manager.deliveries += 1,
            Err(e) => {
                sim.ai_stats.dropped_carries += 1;
                tracing::debug!("Manager dropped carry of {}: {}", carry.ticket_id, e);
            }
        }
        return Ok(());
    }

    if sim.has_station_staff() {
        return Ok(());
    }

    sim.manager.think_ms -= dt;
    if sim.manager.think_ms > 0.0 {
        return Ok(());
    }
    sim.manager.think_ms = sim.config.manager_think_ms;

    // Deliveries first: a ready order is money on the counter
    let ready = sim
        .cache
        .peek_ready(&sim.tickets, &sim.customers, &mut sim.ai_stats);
    if let Some(entry) = ready {
        sim.manager.carrying = Some(Carry {
            ticket_id: entry.ticket_id,
            customer_id: entry.customer_id,
            eta_ms: sim.config.runner_carry_ms / sim.config.manager_speed,
        });
        tracing::debug!("Manager carrying {} to {}", entry.ticket_id, entry.customer_id);
        return Ok(());
    }

    // Otherwise the most urgent queued ticket whose station has room
    let mut best: Option<(StationKind, TicketId, f32)> = None;
    let kinds: Vec<StationKind> = sim.stations.iter().map(|s| s.kind).collect();
    for kind in kinds {
        let has_room = sim
            .station(kind)
            .map(|s| s.has_free_slot())
            .unwrap_or(false);
        if !has_room {
            continue;
        }
        let entry = sim
            .cache
            .peek_queued(kind, &sim.tickets, &sim.customers, &mut sim.ai_stats);
        if let Some(entry) = entry {
            if best.map_or(true, |(_, _, p)| entry.patience < p) {
                best = Some((kind, entry.ticket_id, entry.patience));
            }
        }
    }

    if let Some((kind, ticket, _)) = best {
        sim.cache.remove_queued(kind, ticket);
        match place_ticket(sim, ticket, kind, JobPace::Manager) {
            Ok(_) => sim.manager.placements += 1,
            Err(e) => tracing::debug!("Manager could not place {}: {}", ticket, e),
        }
    }
    Ok(())
}

fn maybe_summon_minion(sim: &mut Simulation) {
    let minions = sim.employees.iter().filter(|e| e.is_minion()).count();
    if minions >= sim.config.max_minions || sim.has_station_staff() || !ready_delivery_exists(sim) {
        return;
    }

    let id = sim.ids.employee();
    let home = sim.floor.staff_room;
    let minion = Employee::minion(id, home, &sim.config);
    sim.employees.push(minion);
    sim.manager.minions_summoned += 1;

    let line = sim.flavor.manager_line();
    tracing::info!("Manager summoned minion {}: \"{}\"", id, line);
    let ttl = sim.config.fx_ttl_ms;
    sim.fx.push(line, home, FxKind::Quip, ttl);
    sim.emit(SimulationEvent::MinionSummoned { employee: id });
}

/// Count down minion lifespans; expired minions vanish with whatever they carry
fn expire_minions(sim: &mut Simulation, dt: Millis) {
    let mut expired = Vec::new();
    for employee in &mut sim.employees {
        if let Some(life) = employee.lifespan_ms.as_mut() {
            *life -= dt;
            if *life <= 0.0 {
                expired.push(employee.id);
            }
        }
    }
    if expired.is_empty() {
        return;
    }
    sim.employees.retain(|e| !expired.contains(&e.id));
    for id in expired {
        tracing::debug!("Minion {} expired", id);
        sim.emit(SimulationEvent::MinionExpired { employee: id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::CustomerId;

    #[test]
    fn test_drop_carry_of_matching_ticket() {
        let mut state = ManagerState {
            carrying: Some(Carry {
                ticket_id: TicketId(4),
                customer_id: CustomerId(3),
                eta_ms: 100.0,
            }),
            ..ManagerState::default()
        };
        state.drop_carry_of(TicketId(5));
        assert!(state.carrying().is_some());
        state.drop_carry_of(TicketId(4));
        assert!(state.carrying().is_none());
    }

    #[test]
    fn test_minions_expire() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let id = sim.ids.employee();
        let minion = Employee::minion(id, sim.floor.staff_room, &sim.config);
        sim.employees.push(minion);

        expire_minions(&mut sim, 11_000.0);
        assert_eq!(sim.employees.len(), 1);
        expire_minions(&mut sim, 1_000.0);
        assert!(sim.employees.is_empty());
        assert!(sim
            .drain_events()
            .contains(&SimulationEvent::MinionExpired { employee: id }));
    }

    #[test]
    fn test_manager_inactive_when_disabled() {
        let sim = Simulation::new(SimulationConfig::default()).unwrap();
        assert!(!manager_active(&sim));
    }
}
