//! Breadcrumbs and crash reports
//!
//! Every emitted event leaves a breadcrumb in a fixed-size ring. When the
//! loop faults, a [`CrashReport`] is captured from the live state and handed
//! to the configured [`DiagnosticsSink`].

use std::collections::VecDeque;

use serde::Serialize;

use crate::core::types::Millis;
use crate::simulation::Simulation;

/// Breadcrumbs kept in a crash report
const REPORT_BREADCRUMBS: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct Breadcrumb {
    pub at_ms: Millis,
    pub kind: String,
    pub details: String,
}

/// Ring of recent breadcrumbs; oldest dropped first
#[derive(Debug, Clone)]
pub struct Breadcrumbs {
    ring: VecDeque<Breadcrumb>,
    capacity: usize,
}

impl Breadcrumbs {
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, at_ms: Millis, kind: &str, details: String) {
        if self.capacity == 0 {
            return;
        }
        if self.ring.len() >= self.capacity {
            self.ring.pop_front();
        }
        self.ring.push_back(Breadcrumb {
            at_ms,
            kind: kind.to_string(),
            details,
        });
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Breadcrumb> {
        self.ring.iter()
    }

    /// The newest `n` breadcrumbs, oldest first
    pub fn tail(&self, n: usize) -> Vec<Breadcrumb> {
        let skip = self.ring.len().saturating_sub(n);
        self.ring.iter().skip(skip).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.ring.clear();
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CrashMeta {
    pub seed: u64,
    pub last_frame_dt_ms: Millis,
    /// Tick phase that was running when the fault happened
    pub phase: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrashError {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrashState {
    pub day: u32,
    pub cash: i64,
    pub reputation: i64,
    pub health: u32,
    pub health_max: u32,
    pub elapsed_ms: Millis,
    pub spawn_timer_ms: Millis,
    pub difficulty: f64,
    pub base_spawn_ms: Millis,
    pub combo: u32,
    pub last_serve_ms: Option<Millis>,
    pub customers_count: usize,
    pub tickets_count: usize,
    pub stations_count: usize,
    pub employees_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerPreview {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub state: String,
    pub patience: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketPreview {
    pub id: String,
    pub customer_id: String,
    pub item: String,
    pub state: String,
    pub step_index: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationPreview {
    pub key: String,
    pub capacity: usize,
    pub busy: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeePreview {
    pub id: String,
    pub archetype: String,
    pub station: Option<String>,
    pub phase: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrashPreview {
    pub customers: Vec<CustomerPreview>,
    pub tickets: Vec<TicketPreview>,
    pub stations: Vec<StationPreview>,
    pub employees: Vec<EmployeePreview>,
    pub breadcrumbs: Vec<Breadcrumb>,
}

/// Structured description of a fault and the state around it
#[derive(Debug, Clone, Serialize)]
pub struct CrashReport {
    pub meta: CrashMeta,
    pub error: CrashError,
    pub state: CrashState,
    pub preview: CrashPreview,
}

impl CrashReport {
    /// Capture a report from the live simulation
    pub fn capture(sim: &Simulation, kind: &str, message: &str) -> Self {
        let limit = sim.config.crash_preview_limit;

        let customers = sim
            .customers
            .iter()
            .take(limit)
            .map(|c| CustomerPreview {
                id: c.id.to_string(),
                x: c.pos.x.round() as i32,
                y: c.pos.y.round() as i32,
                state: format!("{:?}", c.state),
                patience: (c.patience * 100.0).round() / 100.0,
            })
            .collect();

        let tickets = sim
            .tickets
            .iter()
            .take(limit)
            .map(|t| TicketPreview {
                id: t.id.to_string(),
                customer_id: t.customer_id.to_string(),
                item: sim
                    .catalog
                    .menu_item(t.item)
                    .map(|m| m.name.clone())
                    .unwrap_or_default(),
                state: t.state.label().to_string(),
                step_index: t.step_index,
            })
            .collect();

        let stations = sim
            .stations
            .iter()
            .map(|s| StationPreview {
                key: s.kind.key().to_string(),
                capacity: s.capacity(),
                busy: s.busy_count(),
            })
            .collect();

        let employees = sim
            .employees
            .iter()
            .take(limit)
            .map(|e| EmployeePreview {
                id: e.id.to_string(),
                archetype: e.archetype.clone(),
                station: e.station().map(|s| s.key().to_string()),
                phase: match e.phase() {
                    Some(p) => p.name().to_string(),
                    None if e.carrying().is_some() => "carrying".to_string(),
                    None => "idle".to_string(),
                },
            })
            .collect();

        Self {
            meta: CrashMeta {
                seed: sim.config.seed,
                last_frame_dt_ms: sim.last_frame_dt_ms,
                phase: sim.phase.name().to_string(),
            },
            error: CrashError {
                kind: kind.to_string(),
                message: message.to_string(),
            },
            state: CrashState {
                day: sim.clock.day(),
                cash: sim.economy.cash,
                reputation: sim.economy.reputation,
                health: sim.economy.health,
                health_max: sim.economy.health_max,
                elapsed_ms: sim.clock.elapsed_ms(),
                spawn_timer_ms: sim.spawn_timer_ms,
                difficulty: sim.difficulty,
                base_spawn_ms: sim.base_spawn_ms,
                combo: sim.economy.combo,
                last_serve_ms: sim.economy.last_serve_ms,
                customers_count: sim.customers.len(),
                tickets_count: sim.tickets.len(),
                stations_count: sim.stations.len(),
                employees_count: sim.employees.len(),
            },
            preview: CrashPreview {
                customers,
                tickets,
                stations,
                employees,
                breadcrumbs: sim.breadcrumbs.tail(REPORT_BREADCRUMBS),
            },
        }
    }
}

/// Receiver for crash reports
pub trait DiagnosticsSink: Send {
    fn report(&mut self, report: &CrashReport);
}

/// Logs crash reports as JSON through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&mut self, report: &CrashReport) {
        match serde_json::to_string(report) {
            Ok(json) => tracing::error!(report = %json, "Crash captured"),
            Err(e) => tracing::error!("Crash captured but report failed to serialize: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;

    #[test]
    fn test_breadcrumb_ring_drops_oldest() {
        let mut crumbs = Breadcrumbs::new(3);
        for i in 0..5 {
            crumbs.push(i as f64, "loop", format!("{}", i));
        }
        assert_eq!(crumbs.len(), 3);
        let details: Vec<_> = crumbs.iter().map(|b| b.details.clone()).collect();
        assert_eq!(details, vec!["2", "3", "4"]);
    }

    #[test]
    fn test_tail_returns_newest() {
        let mut crumbs = Breadcrumbs::new(200);
        for i in 0..150 {
            crumbs.push(i as f64, "loop", format!("{}", i));
        }
        let tail = crumbs.tail(100);
        assert_eq!(tail.len(), 100);
        assert_eq!(tail[0].details, "50");
        assert_eq!(tail[99].details, "149");
    }

    #[test]
    fn test_capture_serializes() {
        let sim = Simulation::new(SimulationConfig::default()).unwrap();
        let report = CrashReport::capture(&sim, "Invariant", "boom");
        assert_eq!(report.state.day, 1);
        assert_eq!(report.preview.stations.len(), 3);
        let json = serde_json::to_string(&report).expect("report serializes");
        assert!(json.contains("boom"));
    }
}
