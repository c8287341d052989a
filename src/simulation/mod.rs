//! Simulation context and update loop
//!
//! [`Simulation`] owns every piece of mutable game state. There are no
//! globals, so several simulations can run side by side (tests do).
//! Time only moves through [`Simulation::advance`]; the player acts through
//! the command methods in [`crate::command`].

pub mod customers;
pub mod day;
pub mod diagnostics;
pub mod events;
pub mod fx;
pub mod layout;
pub mod rush;
pub mod snapshot;
pub mod spawn;
pub mod tick;

pub use diagnostics::{Breadcrumb, CrashReport, DiagnosticsSink, TracingSink};
pub use events::{DeliverySource, SimulationEvent};
pub use fx::{FloatingText, FxKind};
pub use layout::FloorPlan;
pub use snapshot::SimSnapshot;
pub use tick::TickPhase;

use serde::Serialize;

use crate::catalog::{Catalog, StationKind};
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{CustomerId, EmployeeId, IdGen, Millis, TicketId};
use crate::core::{DayClock, SimRng};
use crate::entity::{Customer, Employee, Seating, Station, Ticket};
use crate::flavor::{DefaultFlavor, FlavorText};
use crate::persistence::{HighestDayStore, MemoryStore};
use crate::staff::cache::{AiStats, WorkCache};
use crate::staff::manager::ManagerState;

use diagnostics::Breadcrumbs;
use fx::FxList;
use rush::RushState;

/// Money, reputation, health and purchased upgrades
#[derive(Debug, Clone, Default, Serialize)]
pub struct Economy {
    pub cash: i64,
    pub reputation: i64,
    pub health: u32,
    pub health_max: u32,
    /// Kitchen speed upgrade level
    pub speed_level: u32,
    /// Extra slots on every station
    pub capacity_level: u32,
    /// Decor level; raises reputation gain and patience
    pub rep_level: u32,
    pub combo: u32,
    pub last_serve_ms: Option<Millis>,
}

/// Per-day counters, reset when a day starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayStats {
    pub served: u32,
    pub lost: u32,
    pub earned: i64,
}

/// Complete simulation state
pub struct Simulation {
    pub(crate) config: SimulationConfig,
    pub(crate) catalog: Catalog,
    pub(crate) rng: SimRng,
    pub(crate) ids: IdGen,
    pub(crate) clock: DayClock,
    pub(crate) floor: FloorPlan,

    pub(crate) customers: Vec<Customer>,
    pub(crate) tickets: Vec<Ticket>,
    pub(crate) stations: Vec<Station>,
    pub(crate) employees: Vec<Employee>,
    pub(crate) seating: Seating,

    pub(crate) economy: Economy,
    pub(crate) day_stats: DayStats,
    pub(crate) difficulty: f64,
    pub(crate) base_spawn_ms: Millis,
    pub(crate) spawn_timer_ms: Millis,

    pub(crate) running: bool,
    pub(crate) paused: bool,
    pub(crate) game_over: bool,
    pub(crate) frozen: bool,

    pub(crate) cache: WorkCache,
    pub(crate) ai_stats: AiStats,
    pub(crate) manager: ManagerState,
    pub(crate) rush: RushState,
    pub(crate) fx: FxList,

    pub(crate) events: Vec<SimulationEvent>,
    pub(crate) breadcrumbs: Breadcrumbs,
    pub(crate) crash: Option<CrashReport>,
    pub(crate) phase: TickPhase,
    pub(crate) last_frame_dt_ms: Millis,

    pub(crate) highest_day: u32,
    pub(crate) resume_offer: Option<u32>,

    pub(crate) store: Box<dyn HighestDayStore>,
    pub(crate) sink: Box<dyn DiagnosticsSink>,
    pub(crate) flavor: Box<dyn FlavorText>,
}

impl Simulation {
    /// New simulation with the default catalog
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::with_catalog(config, Catalog::with_defaults())
    }

    /// New simulation with a custom catalog
    pub fn with_catalog(config: SimulationConfig, catalog: Catalog) -> Result<Self> {
        config.validate().map_err(SimError::InvalidConfig)?;

        let floor = FloorPlan::new(catalog.stations(), config.table_count);
        let seating = Seating::new(&floor.tables, config.seats_per_table);
        let stations = catalog
            .stations()
            .iter()
            .map(|st| Station::new(st, 0))
            .collect();

        Ok(Self {
            rng: SimRng::new(config.seed),
            ids: IdGen::new(),
            clock: DayClock::new(config.day_duration_ms),
            floor,
            customers: Vec::new(),
            tickets: Vec::new(),
            stations,
            employees: Vec::new(),
            seating,
            economy: Economy {
                cash: config.starting_cash,
                health: config.health_max,
                health_max: config.health_max,
                ..Economy::default()
            },
            day_stats: DayStats::default(),
            difficulty: 0.0,
            base_spawn_ms: config.base_spawn_ms,
            spawn_timer_ms: 0.0,
            running: false,
            paused: false,
            game_over: false,
            frozen: false,
            cache: WorkCache::new(),
            ai_stats: AiStats::default(),
            manager: ManagerState::default(),
            rush: RushState::new(),
            fx: FxList::new(),
            events: Vec::new(),
            breadcrumbs: Breadcrumbs::new(config.breadcrumb_capacity),
            crash: None,
            phase: TickPhase::Idle,
            last_frame_dt_ms: 0.0,
            highest_day: 0,
            resume_offer: None,
            store: Box::new(MemoryStore::new()),
            sink: Box::new(TracingSink),
            flavor: Box::new(DefaultFlavor::new()),
            catalog,
            config,
        })
    }

    /// Use a different highest-day store
    pub fn with_store(mut self, store: Box<dyn HighestDayStore>) -> Self {
        self.store = store;
        self
    }

    /// Use a different crash report sink
    pub fn with_sink(mut self, sink: Box<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Use a different flavor text table
    pub fn with_flavor(mut self, flavor: Box<dyn FlavorText>) -> Self {
        self.flavor = flavor;
        self
    }

    // === ACCESSORS ===

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn floor(&self) -> &FloorPlan {
        &self.floor
    }

    pub fn clock(&self) -> &DayClock {
        &self.clock
    }

    pub fn day(&self) -> u32 {
        self.clock.day()
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn base_spawn_ms(&self) -> Millis {
        self.base_spawn_ms
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn day_stats(&self) -> DayStats {
        self.day_stats
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn seating(&self) -> &Seating {
        &self.seating
    }

    pub fn ai_stats(&self) -> &AiStats {
        &self.ai_stats
    }

    pub fn manager(&self) -> &ManagerState {
        &self.manager
    }

    pub fn rush_active(&self) -> bool {
        self.rush.is_active()
    }

    pub fn fx(&self) -> &[FloatingText] {
        self.fx.items()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Stopped after an unrecoverable fault; only `reset_game` recovers
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn crash_report(&self) -> Option<&CrashReport> {
        self.crash.as_ref()
    }

    pub fn highest_day(&self) -> u32 {
        self.highest_day
    }

    pub fn resume_offer(&self) -> Option<u32> {
        self.resume_offer
    }

    pub fn breadcrumbs(&self) -> impl Iterator<Item = &Breadcrumb> {
        self.breadcrumbs.iter()
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn ticket(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn station(&self, kind: StationKind) -> Option<&Station> {
        self.stations.iter().find(|s| s.kind == kind)
    }

    /// Ticket belonging to a customer
    pub fn ticket_for_customer(&self, customer: CustomerId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.customer_id == customer)
    }

    /// Hand over every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        std::mem::take(&mut self.events)
    }

    // === INTERNAL HELPERS ===

    pub(crate) fn emit(&mut self, event: SimulationEvent) {
        self.breadcrumbs
            .push(self.clock.total_ms(), event.kind(), format!("{:?}", event));
        self.events.push(event);
    }

    pub(crate) fn customer_index(&self, id: CustomerId) -> Option<usize> {
        self.customers.iter().position(|c| c.id == id)
    }

    pub(crate) fn ticket_index(&self, id: TicketId) -> Option<usize> {
        self.tickets.iter().position(|t| t.id == id)
    }

    pub(crate) fn employee_index(&self, id: EmployeeId) -> Option<usize> {
        self.employees.iter().position(|e| e.id == id)
    }

    pub(crate) fn station_index(&self, kind: StationKind) -> Option<usize> {
        self.stations.iter().position(|s| s.kind == kind)
    }

    pub(crate) fn customer_mut(&mut self, id: CustomerId) -> Option<&mut Customer> {
        self.customers.iter_mut().find(|c| c.id == id)
    }

    pub(crate) fn ticket_mut(&mut self, id: TicketId) -> Option<&mut Ticket> {
        self.tickets.iter_mut().find(|t| t.id == id)
    }

    pub(crate) fn employee_mut(&mut self, id: EmployeeId) -> Option<&mut Employee> {
        self.employees.iter_mut().find(|e| e.id == id)
    }

    /// Any regular (non-minion) station worker on staff
    pub(crate) fn has_station_staff(&self) -> bool {
        self.employees
            .iter()
            .any(|e| e.is_station_worker() && !e.is_minion())
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("day", &self.clock.day())
            .field("running", &self.running)
            .field("paused", &self.paused)
            .field("game_over", &self.game_over)
            .field("frozen", &self.frozen)
            .field("customers", &self.customers.len())
            .field("tickets", &self.tickets.len())
            .field("employees", &self.employees.len())
            .finish()
    }
}
