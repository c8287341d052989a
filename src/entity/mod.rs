pub mod customer;
pub mod employee;
pub mod seating;
pub mod station;
pub mod ticket;

pub use customer::{Customer, CustomerState};
pub use employee::{Carry, Duty, Employee, Leveling};
pub use seating::{Seat, Seating, Table};
pub use station::{Job, Slot, Station};
pub use ticket::{Ticket, TicketState};
