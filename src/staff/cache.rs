//! Periodically rebuilt work lists for the staff AI
//!
//! Rebuilding every tick would scan every ticket for every worker, so the
//! lists are refreshed on a fixed interval instead. Between rebuilds they can
//! go stale: tickets get claimed, delivered or removed with their customer.
//! Every entry is therefore re-checked against live state when consumed;
//! failed checks are skipped and counted in [`AiStats::stale_skips`].

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::catalog::StationKind;
use crate::core::config::SimulationConfig;
use crate::core::types::{CustomerId, Millis, TicketId};
use crate::entity::{Customer, CustomerState, Ticket, TicketState};
use crate::staff::phase::WorkTask;

/// Counters for the staff AI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AiStats {
    pub cache_rebuilds: u64,
    pub claims: u64,
    pub runner_pickups: u64,
    /// Cache entries that no longer held when consumed
    pub stale_skips: u64,
    /// Tasks abandoned mid-way because the ticket changed underneath
    pub stale_releases: u64,
    /// Carries that found nothing to deliver on arrival
    pub dropped_carries: u64,
}

/// Queued ticket waiting for a station worker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueueEntry {
    pub ticket_id: TicketId,
    pub customer_id: CustomerId,
    /// Customer patience at rebuild time
    pub patience: f32,
}

/// Ready ticket waiting for a runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyEntry {
    pub ticket_id: TicketId,
    pub customer_id: CustomerId,
}

#[derive(Debug, Clone, Default)]
pub struct WorkCache {
    queues: AHashMap<StationKind, Vec<QueueEntry>>,
    ready: Vec<ReadyEntry>,
    since_rebuild_ms: Millis,
    built: bool,
}

impl WorkCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the rebuild timer; true when a rebuild is due
    pub fn due(&mut self, dt: Millis, config: &SimulationConfig) -> bool {
        self.since_rebuild_ms += dt;
        if !self.built || self.since_rebuild_ms >= config.ai_cache_rebuild_ms {
            self.since_rebuild_ms = 0.0;
            return true;
        }
        false
    }

    /// Force a rebuild on the next tick
    pub fn invalidate(&mut self) {
        self.built = false;
        self.queues.clear();
        self.ready.clear();
    }

    pub fn rebuild(&mut self, tickets: &[Ticket], customers: &[Customer]) {
        self.queues.clear();
        self.ready.clear();

        let mut queued: Vec<(StationKind, QueueEntry, Millis)> = Vec::new();
        let mut ready: Vec<(f32, ReadyEntry)> = Vec::new();

        for ticket in tickets {
            if ticket.dragging {
                continue;
            }
            let customer = match find_customer(customers, ticket.customer_id) {
                Some(c) if c.state == CustomerState::Waiting => c,
                _ => continue,
            };
            match ticket.state {
                TicketState::Tray if ticket.assigned_to.is_none() => {
                    if let Some(step) = ticket.current_step() {
                        queued.push((
                            step.station,
                            QueueEntry {
                                ticket_id: ticket.id,
                                customer_id: customer.id,
                                patience: customer.patience,
                            },
                            ticket.created_at_ms,
                        ));
                    }
                }
                TicketState::Ready => ready.push((
                    customer.patience,
                    ReadyEntry {
                        ticket_id: ticket.id,
                        customer_id: customer.id,
                    },
                )),
                _ => {}
            }
        }

        // Most impatient first, then oldest
        queued.sort_by_key(|(_, e, created)| (OrderedFloat(e.patience), OrderedFloat(*created)));
        for (station, entry, _) in queued {
            self.queues.entry(station).or_default().push(entry);
        }

        ready.sort_by_key(|(patience, _)| OrderedFloat(*patience));
        self.ready = ready.into_iter().map(|(_, e)| e).collect();
        self.built = true;
    }

    pub fn queue(&self, station: StationKind) -> &[QueueEntry] {
        self.queues.get(&station).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn ready(&self) -> &[ReadyEntry] {
        &self.ready
    }

    /// Remove and return the first still-valid entry for `station`
    pub fn take_queued(
        &mut self,
        station: StationKind,
        tickets: &[Ticket],
        customers: &[Customer],
        stats: &mut AiStats,
    ) -> Option<WorkTask> {
        let queue = self.queues.get_mut(&station)?;
        while !queue.is_empty() {
            let entry = queue.remove(0);
            if queued_ticket_valid(entry.ticket_id, station, tickets, customers) {
                return Some(WorkTask {
                    ticket_id: entry.ticket_id,
                    customer_id: entry.customer_id,
                });
            }
            stats.stale_skips += 1;
        }
        None
    }

    /// First still-valid entry for `station`, left in place. Stale entries
    /// in front of it are dropped.
    pub fn peek_queued(
        &mut self,
        station: StationKind,
        tickets: &[Ticket],
        customers: &[Customer],
        stats: &mut AiStats,
    ) -> Option<QueueEntry> {
        let queue = self.queues.get_mut(&station)?;
        while let Some(entry) = queue.first().copied() {
            if queued_ticket_valid(entry.ticket_id, station, tickets, customers) {
                return Some(entry);
            }
            queue.remove(0);
            stats.stale_skips += 1;
        }
        None
    }

    /// Drop a queued entry that was handled outside the queue
    pub fn remove_queued(&mut self, station: StationKind, ticket: TicketId) {
        if let Some(queue) = self.queues.get_mut(&station) {
            queue.retain(|e| e.ticket_id != ticket);
        }
    }

    /// First still-valid ready entry. Stale entries are dropped; the valid
    /// one stays listed, so several runners can go for the same order.
    pub fn peek_ready(
        &mut self,
        tickets: &[Ticket],
        customers: &[Customer],
        stats: &mut AiStats,
    ) -> Option<ReadyEntry> {
        while let Some(entry) = self.ready.first().copied() {
            if ready_ticket_valid(entry.ticket_id, entry.customer_id, tickets, customers) {
                return Some(entry);
            }
            self.ready.remove(0);
            stats.stale_skips += 1;
        }
        None
    }

    /// Drop a ready entry once it has been delivered
    pub fn forget_ready(&mut self, ticket: TicketId) {
        self.ready.retain(|e| e.ticket_id != ticket);
    }
}

fn find_customer(customers: &[Customer], id: CustomerId) -> Option<&Customer> {
    customers.iter().find(|c| c.id == id)
}

/// Ticket can still be claimed for `station`
pub fn queued_ticket_valid(
    ticket_id: TicketId,
    station: StationKind,
    tickets: &[Ticket],
    customers: &[Customer],
) -> bool {
    let Some(ticket) = tickets.iter().find(|t| t.id == ticket_id) else {
        return false;
    };
    ticket.state == TicketState::Tray
        && ticket.assigned_to.is_none()
        && !ticket.dragging
        && ticket.needs_station(station)
        && find_customer(customers, ticket.customer_id)
            .map(|c| c.state == CustomerState::Waiting)
            .unwrap_or(false)
}

/// Ticket can still be delivered to `customer_id`
pub fn ready_ticket_valid(
    ticket_id: TicketId,
    customer_id: CustomerId,
    tickets: &[Ticket],
    customers: &[Customer],
) -> bool {
    let Some(ticket) = tickets.iter().find(|t| t.id == ticket_id) else {
        return false;
    };
    ticket.state == TicketState::Ready
        && !ticket.dragging
        && ticket.customer_id == customer_id
        && find_customer(customers, customer_id)
            .map(|c| c.state == CustomerState::Waiting)
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::menu::default_menu;
    use crate::core::types::{SeatRef, TableId, Vec2};

    fn customer(id: u64, patience: f32) -> Customer {
        let mut c = Customer::new(
            CustomerId(id),
            0,
            false,
            patience,
            SeatRef {
                table: TableId(0),
                chair: 0,
            },
            Vec2::default(),
            0.25,
            0.0,
        );
        c.state = CustomerState::Waiting;
        c
    }

    fn ticket(id: u64, customer: u64, item: usize, created: f64) -> Ticket {
        let menu = default_menu();
        Ticket::new(TicketId(id), CustomerId(customer), item, &menu[item], created)
    }

    #[test]
    fn test_rebuild_sorts_by_patience_then_age() {
        let customers = vec![customer(1, 8.0), customer(2, 3.0), customer(3, 8.0)];
        // Soup (index 0) is a single cook step
        let tickets = vec![
            ticket(10, 1, 0, 200.0),
            ticket(11, 2, 0, 300.0),
            ticket(12, 3, 0, 100.0),
        ];
        let mut cache = WorkCache::new();
        cache.rebuild(&tickets, &customers);

        let order: Vec<_> = cache
            .queue(StationKind::Cook)
            .iter()
            .map(|e| e.ticket_id.0)
            .collect();
        assert_eq!(order, vec![11, 12, 10]);
        assert!(cache.queue(StationKind::Prep).is_empty());
    }

    #[test]
    fn test_rebuild_skips_dragged_and_claimed() {
        let customers = vec![customer(1, 8.0), customer(2, 8.0)];
        let mut tickets = vec![ticket(10, 1, 0, 0.0), ticket(11, 2, 0, 0.0)];
        tickets[0].dragging = true;
        tickets[1].state = TicketState::Claimed;
        let mut cache = WorkCache::new();
        cache.rebuild(&tickets, &customers);
        assert!(cache.queue(StationKind::Cook).is_empty());
    }

    #[test]
    fn test_take_queued_skips_stale_entries() {
        let customers = vec![customer(1, 2.0), customer(2, 5.0)];
        let mut tickets = vec![ticket(10, 1, 0, 0.0), ticket(11, 2, 0, 0.0)];
        let mut cache = WorkCache::new();
        cache.rebuild(&tickets, &customers);

        // Ticket 10 gets claimed after the rebuild
        tickets[0].state = TicketState::Claimed;
        let mut stats = AiStats::default();
        let task = cache
            .take_queued(StationKind::Cook, &tickets, &customers, &mut stats)
            .unwrap();
        assert_eq!(task.ticket_id, TicketId(11));
        assert_eq!(stats.stale_skips, 1);
        assert!(cache
            .take_queued(StationKind::Cook, &tickets, &customers, &mut stats)
            .is_none());
    }

    #[test]
    fn test_peek_ready_keeps_valid_entry() {
        let customers = vec![customer(1, 4.0)];
        let mut tickets = vec![ticket(10, 1, 0, 0.0)];
        tickets[0].step_index = 1;
        tickets[0].state = TicketState::Ready;
        let mut cache = WorkCache::new();
        cache.rebuild(&tickets, &customers);

        let mut stats = AiStats::default();
        let first = cache.peek_ready(&tickets, &customers, &mut stats);
        let second = cache.peek_ready(&tickets, &customers, &mut stats);
        assert_eq!(first, second, "peeking does not reserve");

        tickets.clear();
        assert!(cache.peek_ready(&tickets, &customers, &mut stats).is_none());
        assert_eq!(stats.stale_skips, 1);
    }

    #[test]
    fn test_due_on_interval() {
        let config = SimulationConfig::default();
        let mut cache = WorkCache::new();
        assert!(cache.due(16.0, &config), "first tick always rebuilds");
        cache.rebuild(&[], &[]);
        assert!(!cache.due(100.0, &config));
        assert!(cache.due(50.0, &config));
    }
}
