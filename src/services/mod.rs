//! Services Layer
//!
//! Business logic behind the HTTP handlers. Services take a database
//! connection and the calling [`Actor`](permissions::Actor); they know nothing
//! about axum.

pub mod checklist;
pub mod contract_service;
pub mod kpi_service;
pub mod permissions;
pub mod reminders;
pub mod status;

pub use contract_service::{ContractDetails, ContractFilter};
pub use permissions::Actor;
pub use reminders::{LogNotifier, ReminderNotifier};
