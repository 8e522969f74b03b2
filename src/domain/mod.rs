//! Domain layer - Pure business abstractions
//!
//! Trait definitions, input payloads and domain error types. No Axum here.

pub mod contract;
pub mod errors;
pub mod repositories;

pub use contract::{CreateContractInput, UpdateContractInput, UpdateKpiValueInput};
pub use errors::DomainError;
pub use repositories::*;
