//! Shared helpers for integration tests

#![allow(dead_code)]

use restaurant_rush::catalog::{Catalog, MenuItem, RecipeStep, StationKind};
use restaurant_rush::core::types::{CustomerId, TicketId};
use restaurant_rush::entity::CustomerState;
use restaurant_rush::simulation::spawn::spawn_customer;
use restaurant_rush::simulation::Simulation;
use restaurant_rush::SimulationConfig;

pub const FRAME_MS: f64 = 16.0;

/// No random arrivals; customers only come in when a test spawns them
pub fn quiet_config() -> SimulationConfig {
    SimulationConfig {
        base_spawn_ms: 1.0e9,
        ..SimulationConfig::default()
    }
}

/// Catalog whose only dish is a single 3500ms cook step
pub fn soup_only_catalog() -> Catalog {
    let defaults = Catalog::with_defaults();
    Catalog::from_parts(
        vec![MenuItem::new(
            "Soup",
            8,
            vec![RecipeStep::new(StationKind::Cook, 3_500.0)],
        )],
        defaults.stations().to_vec(),
        defaults.archetypes().to_vec(),
    )
    .expect("soup catalog is consistent")
}

pub fn started(config: SimulationConfig, catalog: Catalog) -> Simulation {
    let mut sim = Simulation::with_catalog(config, catalog).expect("valid config");
    sim.start_day().expect("fresh game starts");
    sim.drain_events();
    sim
}

/// Advance frame by frame until `done` holds; false if `max_ms` runs out
pub fn advance_until(
    sim: &mut Simulation,
    max_ms: f64,
    mut done: impl FnMut(&Simulation) -> bool,
) -> bool {
    let mut elapsed = 0.0;
    while elapsed < max_ms {
        if done(sim) {
            return true;
        }
        sim.advance(FRAME_MS);
        elapsed += FRAME_MS;
    }
    done(sim)
}

/// Spawn a customer and wait for their ticket to print
pub fn customer_with_ticket(sim: &mut Simulation) -> (CustomerId, TicketId) {
    let customer = spawn_customer(sim).expect("a seat is free");
    let ordered = advance_until(sim, 10_000.0, |s| {
        s.customer(customer)
            .map(|c| c.state == CustomerState::Waiting)
            .unwrap_or(false)
    });
    assert!(ordered, "customer should sit down and order");
    let ticket = sim
        .ticket_for_customer(customer)
        .map(|t| t.id)
        .expect("ticket printed on order");
    (customer, ticket)
}
