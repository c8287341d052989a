//! Events produced by ticks and commands
//!
//! Audio cues, HUD log lines and headless summaries are driven from these.
//! The simulation buffers them until the caller drains them.

use serde::Serialize;

use crate::catalog::StationKind;
use crate::command::UpgradeKind;
use crate::core::types::{CustomerId, EmployeeId, TicketId};

/// Who handed a ready order to its customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeliverySource {
    Player,
    Runner(EmployeeId),
    Manager,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimulationEvent {
    DayStarted {
        day: u32,
    },
    DayEnded {
        day: u32,
        served: u32,
        lost: u32,
        earned: i64,
    },
    /// A new highest day was stored
    NewRecord {
        day: u32,
    },
    /// Highest day on record is ahead of the current day
    ResumeOffered {
        day: u32,
    },
    CustomerArrived {
        customer: CustomerId,
        item: String,
        vip: bool,
    },
    OrderPlaced {
        customer: CustomerId,
        ticket: TicketId,
    },
    CustomerLeftUnhappy {
        customer: CustomerId,
    },
    TicketClaimed {
        ticket: TicketId,
        employee: EmployeeId,
    },
    JobStarted {
        ticket: TicketId,
        station: StationKind,
        slot: usize,
        employee: Option<EmployeeId>,
    },
    StepCompleted {
        ticket: TicketId,
        station: StationKind,
    },
    OrderReady {
        ticket: TicketId,
        customer: CustomerId,
        payout: i64,
    },
    OrderDelivered {
        ticket: TicketId,
        customer: CustomerId,
        tip: i64,
        combo: u32,
        by: DeliverySource,
    },
    PaymentReceived {
        customer: CustomerId,
        amount: i64,
    },
    EmployeeHired {
        employee: EmployeeId,
        archetype: String,
    },
    LevelUp {
        employee: EmployeeId,
        level: u32,
    },
    UpgradePurchased {
        kind: UpgradeKind,
        level: u32,
        cost: i64,
    },
    ManagerToggled {
        enabled: bool,
    },
    MinionSummoned {
        employee: EmployeeId,
    },
    MinionExpired {
        employee: EmployeeId,
    },
    RushStarted,
    RushEnded,
    PauseToggled {
        paused: bool,
    },
    GameOver {
        day: u32,
    },
    /// The loop stopped on an unrecoverable error
    Fault {
        message: String,
    },
}

impl SimulationEvent {
    /// Short tag used for breadcrumbs
    pub fn kind(&self) -> &'static str {
        match self {
            SimulationEvent::DayStarted { .. } => "day_started",
            SimulationEvent::DayEnded { .. } => "day_ended",
            SimulationEvent::NewRecord { .. } => "new_record",
            SimulationEvent::ResumeOffered { .. } => "resume_offered",
            SimulationEvent::CustomerArrived { .. } => "customer_arrived",
            SimulationEvent::OrderPlaced { .. } => "order_placed",
            SimulationEvent::CustomerLeftUnhappy { .. } => "customer_left_unhappy",
            SimulationEvent::TicketClaimed { .. } => "ticket_claimed",
            SimulationEvent::JobStarted { .. } => "job_started",
            SimulationEvent::StepCompleted { .. } => "step_completed",
            SimulationEvent::OrderReady { .. } => "order_ready",
            SimulationEvent::OrderDelivered { .. } => "order_delivered",
            SimulationEvent::PaymentReceived { .. } => "payment_received",
            SimulationEvent::EmployeeHired { .. } => "employee_hired",
            SimulationEvent::LevelUp { .. } => "level_up",
            SimulationEvent::UpgradePurchased { .. } => "upgrade_purchased",
            SimulationEvent::ManagerToggled { .. } => "manager_toggled",
            SimulationEvent::MinionSummoned { .. } => "minion_summoned",
            SimulationEvent::MinionExpired { .. } => "minion_expired",
            SimulationEvent::RushStarted => "rush_started",
            SimulationEvent::RushEnded => "rush_ended",
            SimulationEvent::PauseToggled { .. } => "pause_toggled",
            SimulationEvent::GameOver { .. } => "game_over",
            SimulationEvent::Fault { .. } => "fault",
        }
    }
}
