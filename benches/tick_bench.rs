//! Tick throughput with a busy kitchen

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use restaurant_rush::simulation::Simulation;
use restaurant_rush::SimulationConfig;

/// Fully staffed restaurant some way into day 3
fn busy_sim() -> Simulation {
    let config = SimulationConfig {
        starting_cash: 10_000,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(config).expect("default config is valid");
    for key in ["junior", "cook", "barista", "runner", "pro"] {
        sim.hire(key).expect("enough cash for every hire");
    }
    sim.start_day().expect("fresh game starts");
    sim.accept_resume().ok();
    for _ in 0..2_000 {
        sim.advance(16.0);
    }
    sim
}

fn bench_tick(c: &mut Criterion) {
    c.bench_function("advance_16ms_busy", |b| {
        b.iter_batched_ref(
            busy_sim,
            |sim| {
                for _ in 0..100 {
                    black_box(sim.advance(16.0));
                }
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("snapshot_busy", |b| {
        let sim = busy_sim();
        b.iter(|| black_box(sim.snapshot()))
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
