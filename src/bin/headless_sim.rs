//! Headless Simulation Runner
//!
//! Plays a deterministic run with a simple hiring and upgrade policy and
//! prints a summary. Same seed and flags, same result.

use std::path::PathBuf;

use clap::Parser;
use restaurant_rush::simulation::{Simulation, SimulationEvent};
use restaurant_rush::staff::AiStats;
use restaurant_rush::{SimulationConfig, UpgradeKind};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const FRAME_MS: f64 = 16.0;
/// How often the policy looks at the books (ms of game time)
const POLICY_INTERVAL_MS: f64 = 1_000.0;

/// Headless Simulation Runner - scripted runs for balancing
#[derive(Parser, Debug)]
#[command(name = "headless_sim")]
#[command(about = "Run the restaurant simulation without a renderer and print a summary")]
struct Args {
    /// Random seed; overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Number of days to play
    #[arg(long, default_value_t = 3)]
    days: u32,

    /// Archetypes to hire as soon as they are affordable, in order
    #[arg(long, value_delimiter = ',')]
    hire: Vec<String>,

    /// Turn manager mode on at the start
    #[arg(long)]
    manager: bool,

    /// Never buy upgrades
    #[arg(long)]
    no_upgrades: bool,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Log simulation internals to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct DayResult {
    day: u32,
    served: u32,
    lost: u32,
    earned: i64,
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    days_played: usize,
    final_day: u32,
    highest_day: u32,
    game_over: bool,
    frozen: bool,
    cash: i64,
    reputation: i64,
    health: u32,
    hires: Vec<String>,
    upgrades: Vec<String>,
    days: Vec<DayResult>,
    ai: AiStats,
    manager_deliveries: u64,
    manager_placements: u64,
    minions_summoned: u64,
}

fn main() -> restaurant_rush::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "restaurant_rush=debug"
    } else {
        "restaurant_rush=warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let seed = config.seed;

    let mut sim = Simulation::new(config)?;
    if args.manager {
        let _ = sim.toggle_manager();
    }
    let _ = sim.start_day();

    let mut hires = Vec::new();
    let mut upgrades = Vec::new();
    let mut days = Vec::new();
    let mut pending_hires: Vec<String> = args.hire.clone();
    let mut policy_timer = 0.0;

    // Generous bound in case the day never ends (paused by a fault, etc.)
    let frame_budget = (args.days as f64 * sim.config().day_duration_ms / FRAME_MS) as u64 + 10_000;
    for _ in 0..frame_budget {
        if days.len() >= args.days as usize || !sim.is_running() {
            break;
        }

        for event in sim.advance(FRAME_MS) {
            if let SimulationEvent::DayEnded {
                day,
                served,
                lost,
                earned,
            } = event
            {
                days.push(DayResult {
                    day,
                    served,
                    lost,
                    earned,
                });
            }
        }

        policy_timer += FRAME_MS;
        if policy_timer >= POLICY_INTERVAL_MS {
            policy_timer = 0.0;
            run_policy(&mut sim, &mut pending_hires, &mut hires, &mut upgrades, args.no_upgrades);
        }
    }

    let economy = sim.economy();
    let summary = RunSummary {
        seed,
        days_played: days.len(),
        final_day: sim.day(),
        highest_day: sim.highest_day(),
        game_over: sim.is_game_over(),
        frozen: sim.is_frozen(),
        cash: economy.cash,
        reputation: economy.reputation,
        health: economy.health,
        hires,
        upgrades,
        days,
        ai: sim.ai_stats().clone(),
        manager_deliveries: sim.manager().deliveries,
        manager_placements: sim.manager().placements,
        minions_summoned: sim.manager().minions_summoned,
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_text(&summary);
    }
    Ok(())
}

/// Hire in the requested order first; spare cash goes into the cheapest upgrade
fn run_policy(
    sim: &mut Simulation,
    pending_hires: &mut Vec<String>,
    hires: &mut Vec<String>,
    upgrades: &mut Vec<String>,
    no_upgrades: bool,
) {
    if let Some(key) = pending_hires.first().cloned() {
        let Some(cost) = sim.catalog().archetype(&key).map(|a| a.cost) else {
            pending_hires.remove(0);
            return;
        };
        if sim.economy().cash >= cost {
            if sim.hire(&key).is_ok() {
                hires.push(key);
            }
            pending_hires.remove(0);
        }
        return;
    }

    if no_upgrades {
        return;
    }
    let economy = sim.economy();
    let cheapest = UpgradeKind::ALL
        .iter()
        .map(|&kind| {
            let level = match kind {
                UpgradeKind::Speed => economy.speed_level,
                UpgradeKind::Capacity => economy.capacity_level,
                UpgradeKind::Reputation => economy.rep_level,
            };
            (kind, kind.cost(level))
        })
        .min_by_key(|&(_, cost)| cost);
    // Keep a reserve so a bad stretch does not leave the till empty
    if let Some((kind, cost)) = cheapest {
        if economy.cash >= cost * 2 && sim.purchase_upgrade(kind).is_ok() {
            upgrades.push(kind.key().to_string());
        }
    }
}

fn print_text(summary: &RunSummary) {
    println!("=== HEADLESS RUN (seed {}) ===", summary.seed);
    for day in &summary.days {
        println!(
            "Day {:>3}: served {:>3}, lost {:>3}, earned ${}",
            day.day, day.served, day.lost, day.earned
        );
    }
    println!();
    println!(
        "Final day {} (record {}), cash ${}, rep {}, health {}",
        summary.final_day, summary.highest_day, summary.cash, summary.reputation, summary.health
    );
    if summary.game_over {
        println!("GAME OVER");
    }
    if summary.frozen {
        println!("Stopped by a fault");
    }
    println!("Hires: {}", summary.hires.join(", "));
    println!("Upgrades: {}", summary.upgrades.join(", "));
    println!(
        "AI: {} claims, {} runner pickups, {} stale skips",
        summary.ai.claims, summary.ai.runner_pickups, summary.ai.stale_skips
    );
}
