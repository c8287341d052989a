//! Read-only view of the whole simulation for renderers and tooling

use serde::Serialize;

use crate::core::calendar::DayPhase;
use crate::core::types::{CustomerId, EmployeeId, Millis, TicketId};
use crate::entity::{Customer, Employee, Station, Table, TicketState};
use crate::simulation::{DayStats, Economy, FloatingText, Simulation};
use crate::staff::cache::AiStats;

#[derive(Debug, Clone, Serialize)]
pub struct TicketView {
    pub id: TicketId,
    pub customer_id: CustomerId,
    pub item: String,
    pub state: TicketState,
    pub step_index: usize,
    pub steps: usize,
    pub dragging: bool,
    pub assigned_to: Option<EmployeeId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClockView {
    pub day: u32,
    pub elapsed_ms: Millis,
    pub fraction: f64,
    pub phase: DayPhase,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlagsView {
    pub running: bool,
    pub paused: bool,
    pub game_over: bool,
    pub frozen: bool,
    pub manager_enabled: bool,
    pub rush_active: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct SimSnapshot {
    pub clock: ClockView,
    pub flags: FlagsView,
    pub economy: Economy,
    pub day_stats: DayStats,
    pub difficulty: f64,
    pub highest_day: u32,
    pub resume_offer: Option<u32>,
    pub customers: Vec<Customer>,
    pub tickets: Vec<TicketView>,
    pub stations: Vec<Station>,
    pub employees: Vec<Employee>,
    pub tables: Vec<Table>,
    pub fx: Vec<FloatingText>,
    pub ai_stats: AiStats,
}

impl Simulation {
    pub fn snapshot(&self) -> SimSnapshot {
        let tickets = self
            .tickets
            .iter()
            .map(|t| TicketView {
                id: t.id,
                customer_id: t.customer_id,
                item: self
                    .catalog
                    .menu_item(t.item)
                    .map(|m| m.name.clone())
                    .unwrap_or_default(),
                state: t.state,
                step_index: t.step_index,
                steps: t.recipe.len(),
                dragging: t.dragging,
                assigned_to: t.assigned_to,
            })
            .collect();

        SimSnapshot {
            clock: ClockView {
                day: self.clock.day(),
                elapsed_ms: self.clock.elapsed_ms(),
                fraction: self.clock.fraction(),
                phase: self.clock.phase(),
            },
            flags: FlagsView {
                running: self.running,
                paused: self.paused,
                game_over: self.game_over,
                frozen: self.frozen,
                manager_enabled: self.manager.enabled,
                rush_active: self.rush.is_active(),
            },
            economy: self.economy.clone(),
            day_stats: self.day_stats,
            difficulty: self.difficulty,
            highest_day: self.highest_day,
            resume_offer: self.resume_offer,
            customers: self.customers.clone(),
            tickets,
            stations: self.stations.clone(),
            employees: self.employees.clone(),
            tables: self.seating.tables().to_vec(),
            fx: self.fx.items().to_vec(),
            ai_stats: self.ai_stats.clone(),
        }
    }
}
