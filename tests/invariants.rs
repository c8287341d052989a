//! Property tests: random command/tick sequences keep the floor consistent

mod common;

use ahash::AHashMap;
use proptest::prelude::*;

use common::*;
use restaurant_rush::catalog::Catalog;
use restaurant_rush::entity::TicketState;
use restaurant_rush::simulation::spawn::spawn_customer;
use restaurant_rush::simulation::Simulation;
use restaurant_rush::{SimulationConfig, UpgradeKind};

const HIRES: [&str; 5] = ["junior", "cook", "barista", "runner", "pro"];

#[derive(Debug, Clone)]
enum Op {
    Spawn,
    Advance(u32),
    PlaceFirstTray,
    DeliverFirstReady,
    Hire(usize),
    Upgrade(usize),
    DragFirstTray,
    DropDragged,
    ToggleManager,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Spawn),
        6 => (1u32..200).prop_map(Op::Advance),
        2 => Just(Op::PlaceFirstTray),
        2 => Just(Op::DeliverFirstReady),
        1 => (0usize..HIRES.len()).prop_map(Op::Hire),
        1 => (0usize..UpgradeKind::ALL.len()).prop_map(Op::Upgrade),
        1 => Just(Op::DragFirstTray),
        1 => Just(Op::DropDragged),
        1 => Just(Op::ToggleManager),
    ]
}

fn apply(sim: &mut Simulation, op: &Op) {
    // Rejections are fine; only the resulting state matters
    match op {
        Op::Spawn => {
            spawn_customer(sim);
        }
        Op::Advance(ms) => {
            let mut left = *ms as f64;
            while left > 0.0 {
                let dt = left.min(FRAME_MS);
                sim.advance(dt);
                left -= dt;
            }
        }
        Op::PlaceFirstTray => {
            let target = sim
                .tickets()
                .iter()
                .find(|t| t.state == TicketState::Tray && !t.dragging)
                .and_then(|t| t.current_step().map(|step| (t.id, step.station)));
            if let Some((ticket, station)) = target {
                let _ = sim.place_ticket_on_station(ticket, station, None);
            }
        }
        Op::DeliverFirstReady => {
            let target = sim
                .tickets()
                .iter()
                .find(|t| t.state == TicketState::Ready)
                .map(|t| (t.id, t.customer_id));
            if let Some((ticket, customer)) = target {
                let _ = sim.deliver_ticket(ticket, customer);
            }
        }
        Op::Hire(i) => {
            let _ = sim.hire(HIRES[*i]);
        }
        Op::Upgrade(i) => {
            let _ = sim.purchase_upgrade(UpgradeKind::ALL[*i]);
        }
        Op::DragFirstTray => {
            let target = sim
                .tickets()
                .iter()
                .find(|t| t.state == TicketState::Tray && !t.dragging)
                .map(|t| t.id);
            if let Some(ticket) = target {
                let _ = sim.begin_drag(ticket);
            }
        }
        Op::DropDragged => {
            let target = sim.tickets().iter().find(|t| t.dragging).map(|t| t.id);
            if let Some(ticket) = target {
                let _ = sim.end_drag(ticket);
            }
        }
        Op::ToggleManager => {
            let _ = sim.toggle_manager();
        }
    }
}

fn check_consistency(sim: &Simulation) -> Result<(), TestCaseError> {
    prop_assert!(!sim.is_frozen(), "fault: {:?}", sim.crash_report());

    // Seats
    for customer in sim.customers() {
        match customer.seat {
            Some(seat) => {
                prop_assert_eq!(sim.seating().occupant(seat), Some(customer.id));
                prop_assert_eq!(sim.seating().held_by(customer.id), 1);
            }
            None => prop_assert_eq!(sim.seating().held_by(customer.id), 0),
        }
    }

    // Tickets
    let mut per_customer: AHashMap<_, usize> = AHashMap::new();
    for ticket in sim.tickets() {
        prop_assert!(ticket.invariant_holds(), "ticket {:?}", ticket);
        *per_customer.entry(ticket.customer_id).or_default() += 1;
        prop_assert!(
            sim.customer(ticket.customer_id).is_some(),
            "ticket {} outlived its customer",
            ticket.id
        );
    }
    prop_assert!(per_customer.values().all(|&n| n == 1));

    // Slots
    let mut slot_count: AHashMap<_, usize> = AHashMap::new();
    for station in sim.stations() {
        for slot in &station.slots {
            if let Some(job) = &slot.job {
                prop_assert!(
                    sim.ticket(job.ticket_id).is_some(),
                    "job for missing ticket {}",
                    job.ticket_id
                );
                *slot_count.entry(job.ticket_id).or_default() += 1;
            }
        }
    }
    prop_assert!(slot_count.values().all(|&n| n == 1));
    for ticket in sim.tickets() {
        let in_slots = slot_count.get(&ticket.id).copied().unwrap_or(0);
        if ticket.state == TicketState::InStation {
            prop_assert_eq!(in_slots, 1, "ticket {} in station without a slot", ticket.id);
        } else {
            prop_assert_eq!(in_slots, 0);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_random_play_keeps_floor_consistent(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..120),
    ) {
        let config = SimulationConfig {
            seed,
            starting_cash: 2_000,
            ..SimulationConfig::default()
        };
        let mut sim = started(config, Catalog::with_defaults());
        for op in &ops {
            apply(&mut sim, op);
            check_consistency(&sim)?;
        }
    }
}
