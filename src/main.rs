//! Restaurant Rush - Entry Point
//!
//! Interactive console for the simulation core. Time only moves when asked:
//! `tick` advances one 16ms frame, `run <ms>` advances many frames at once.

use std::io::{self, Write};

use restaurant_rush::catalog::StationKind;
use restaurant_rush::core::error::Result;
use restaurant_rush::core::types::{EmployeeId, TicketId};
use restaurant_rush::simulation::{Simulation, SimulationEvent};
use restaurant_rush::{SimulationConfig, UpgradeKind};
use tracing_subscriber::EnvFilter;

const FRAME_MS: f64 = 16.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("restaurant_rush=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(std::path::Path::new(&path))?,
        None => SimulationConfig::default(),
    };
    let mut sim = Simulation::new(config)?;
    tracing::info!("Restaurant Rush starting (seed {})", sim.config().seed);

    println!("\n=== RESTAURANT RUSH ===");
    println!();
    println!("Commands:");
    println!("  start                       - Open the restaurant");
    println!("  tick / t                    - Advance one frame");
    println!("  run <ms>                    - Advance <ms> of game time");
    println!("  pause / p                   - Toggle pause");
    println!("  hire <key>                  - Hire junior|cook|barista|runner|pro");
    println!("  upgrade <kind>              - Buy speed|capacity|reputation");
    println!("  place <ticket> <station> [employee] - Put a ticket on prep|cook|drink");
    println!("  deliver <ticket>            - Hand a ready order to its customer");
    println!("  manager / m                 - Toggle manager mode");
    println!("  resume                      - Jump to the recorded highest day");
    println!("  reset                       - Start over");
    println!("  status / s                  - Show detailed status");
    println!("  quit / q                    - Exit");
    println!();

    loop {
        display_status(&sim);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let words: Vec<&str> = input.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            continue;
        };

        match command {
            "quit" | "q" => break,
            "tick" | "t" => print_events(&sim.advance(FRAME_MS)),
            "run" => match args.first().and_then(|a| a.parse::<f64>().ok()) {
                Some(ms) => {
                    let mut left = ms;
                    while left > 0.0 {
                        print_events(&sim.advance(left.min(FRAME_MS)));
                        left -= FRAME_MS;
                    }
                }
                None => println!("Usage: run <ms>"),
            },
            "start" => report(sim.start_day()),
            "pause" | "p" => report(sim.toggle_pause()),
            "manager" | "m" => report(sim.toggle_manager()),
            "resume" => report(sim.accept_resume()),
            "reset" => {
                sim.reset_game();
                println!("Fresh game.");
            }
            "hire" => match args.first() {
                Some(key) => report(sim.hire(key)),
                None => println!("Usage: hire <key>"),
            },
            "upgrade" => match args.first().and_then(|k| UpgradeKind::from_key(k)) {
                Some(kind) => report(sim.purchase_upgrade(kind)),
                None => println!("Usage: upgrade speed|capacity|reputation"),
            },
            "place" => {
                let ticket = args.first().and_then(|a| parse_id(a, 't'));
                let station = args.get(1).and_then(|k| StationKind::from_key(k));
                let employee = args.get(2).and_then(|a| parse_id(a, 'e')).map(EmployeeId);
                match (ticket, station) {
                    (Some(ticket), Some(station)) => {
                        report(sim.place_ticket_on_station(TicketId(ticket), station, employee))
                    }
                    _ => println!("Usage: place <ticket> <station> [employee]"),
                }
            }
            "deliver" => match args.first().and_then(|a| parse_id(a, 't')) {
                Some(ticket) => {
                    let ticket = TicketId(ticket);
                    match sim.ticket(ticket).map(|t| t.customer_id) {
                        Some(customer) => report(sim.deliver_ticket(ticket, customer)),
                        None => println!("No ticket {}", ticket),
                    }
                }
                None => println!("Usage: deliver <ticket>"),
            },
            "status" | "s" => display_detailed_status(&sim),
            other => println!("Unknown command: {}", other),
        }

        print_events(&sim.drain_events());
    }

    tracing::info!("Closing after day {}", sim.day());
    Ok(())
}

/// Accept both `7` and `t7`
fn parse_id(text: &str, prefix: char) -> Option<u64> {
    text.strip_prefix(prefix).unwrap_or(text).parse().ok()
}

fn report<T: std::fmt::Debug, E: std::fmt::Display>(result: std::result::Result<T, E>) {
    match result {
        Ok(value) => println!("OK {:?}", value),
        Err(e) => println!("Rejected: {}", e),
    }
}

fn print_events(events: &[SimulationEvent]) {
    for event in events {
        match event {
            SimulationEvent::CustomerArrived { .. }
            | SimulationEvent::TicketClaimed { .. }
            | SimulationEvent::JobStarted { .. }
            | SimulationEvent::StepCompleted { .. } => {}
            other => println!("  * {:?}", other),
        }
    }
}

fn display_status(sim: &Simulation) {
    let economy = sim.economy();
    let clock = sim.clock();
    println!(
        "\n[Day {} {:>3.0}% {:?}] cash ${} rep {} health {}/{} combo {} | customers {} tickets {} staff {}{}{}",
        clock.day(),
        clock.fraction() * 100.0,
        clock.phase(),
        economy.cash,
        economy.reputation,
        economy.health,
        economy.health_max,
        economy.combo,
        sim.customers().len(),
        sim.tickets().len(),
        sim.employees().len(),
        if sim.is_paused() { " PAUSED" } else { "" },
        if sim.is_game_over() { " GAME OVER" } else { "" },
    );
}

fn display_detailed_status(sim: &Simulation) {
    println!("\n=== CUSTOMERS ===");
    for c in sim.customers() {
        println!(
            "  {} {:?} patience {:.1}/{:.1}{} due ${}",
            c.id,
            c.state,
            c.patience,
            c.patience_max,
            if c.vip { " VIP" } else { "" },
            c.due
        );
    }

    println!("\n=== TICKETS ===");
    for t in sim.tickets() {
        let item = sim
            .catalog()
            .menu_item(t.item)
            .map(|m| m.name.as_str())
            .unwrap_or("?");
        println!(
            "  {} for {}: {} step {}/{} {}",
            t.id,
            t.customer_id,
            item,
            t.step_index,
            t.recipe.len(),
            t.state.label()
        );
    }

    println!("\n=== STATIONS ===");
    for s in sim.stations() {
        let jobs: Vec<String> = s
            .slots
            .iter()
            .map(|slot| match &slot.job {
                Some(job) => format!("{} {:.0}%", job.ticket_id, job.progress() * 100.0),
                None => "free".to_string(),
            })
            .collect();
        println!("  {}: [{}]", s.label, jobs.join(", "));
    }

    println!("\n=== STAFF ===");
    for e in sim.employees() {
        println!(
            "  {} {} lvl {} ({} xp) speed {:.2} {:?}",
            e.id, e.name, e.leveling.level, e.leveling.xp, e.speed, e.duty
        );
    }

    let stats = sim.ai_stats();
    println!(
        "\nAI: {} rebuilds, {} claims, {} pickups, {} stale skips, {} releases",
        stats.cache_rebuilds, stats.claims, stats.runner_pickups, stats.stale_skips, stats.stale_releases
    );
}
