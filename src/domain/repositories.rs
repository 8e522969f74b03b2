//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DomainError;
use crate::history::format_stored;
use crate::models::kpi_type::KPI_DATA_TYPES;
use crate::models::{ContractHistory, ContractType, KpiType, User, UserSummary};

/// Input for creating a contract type
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContractTypeInput {
    pub name: String,
    pub color: Option<String>,
}

/// Input for creating a KPI type
#[derive(Debug, Clone, Deserialize)]
pub struct CreateKpiTypeInput {
    pub name: String,
    pub data_type: String,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

pub const DEFAULT_COLOR: &str = "#3b82f6";

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn check_color(color: Option<&str>) -> Result<(), DomainError> {
    match color {
        Some(c) if !is_hex_color(c) => Err(DomainError::Validation(format!(
            "invalid color code '{}'",
            c
        ))),
        _ => Ok(()),
    }
}

impl CreateContractTypeInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("name is required".into()));
        }
        check_color(self.color.as_deref())
    }
}

impl CreateKpiTypeInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("name is required".into()));
        }
        if !KPI_DATA_TYPES.contains(&self.data_type.as_str()) {
            return Err(DomainError::Validation(format!(
                "unknown data_type '{}'",
                self.data_type
            )));
        }
        check_color(self.color.as_deref())
    }
}

/// KPI type with the number of contract KPIs using it
#[derive(Debug, Clone, Serialize)]
pub struct KpiTypeWithUsage {
    #[serde(flatten)]
    pub kpi_type: KpiType,
    pub usage_count: u64,
}

/// Formatted old/new values of a history entry
#[derive(Debug, Clone, Serialize)]
pub struct HistoryDisplay {
    pub old_value: String,
    pub new_value: String,
}

/// One audit trail entry as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: i32,
    pub contract_id: i32,
    pub field_name: String,
    pub field_label: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub change_type: String,
    pub changed_at: DateTime<Utc>,
    pub changed_by: Option<UserSummary>,
    pub display: HistoryDisplay,
}

impl HistoryEntry {
    pub fn new(row: ContractHistory, actor: Option<&User>) -> Self {
        let display = HistoryDisplay {
            old_value: format_stored(row.old_value.as_deref(), &row.field_name),
            new_value: format_stored(row.new_value.as_deref(), &row.field_name),
        };
        Self {
            id: row.id,
            contract_id: row.contract_id,
            field_name: row.field_name,
            field_label: row.field_label,
            old_value: row.old_value,
            new_value: row.new_value,
            change_type: row.change_type,
            changed_at: row.changed_at,
            changed_by: actor.map(UserSummary::from),
            display,
        }
    }
}

/// Repository trait for contract types
#[async_trait]
pub trait ContractTypeRepository: Send + Sync {
    /// All types ordered by name
    async fn find_all(&self) -> Result<Vec<ContractType>, DomainError>;

    /// Create a type; the name must be unique
    async fn create(&self, input: CreateContractTypeInput) -> Result<ContractType, DomainError>;
}

/// Repository trait for KPI types
#[async_trait]
pub trait KpiTypeRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<KpiTypeWithUsage>, DomainError>;

    async fn create(&self, input: CreateKpiTypeInput) -> Result<KpiType, DomainError>;
}

/// Read side of the contract audit trail
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Newest entries first, at most `limit`
    async fn find_for_contract(
        &self,
        contract_id: i32,
        limit: u64,
    ) -> Result<Vec<HistoryEntry>, DomainError>;
}

/// Repository trait for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_must_be_six_digit_hex() {
        assert!(is_hex_color("#3b82f6"));
        assert!(is_hex_color("#ABCDEF"));
        assert!(!is_hex_color("3b82f6"));
        assert!(!is_hex_color("#3b82f"));
        assert!(!is_hex_color("#3b82fg"));
    }

    #[test]
    fn kpi_type_needs_known_data_type() {
        let input = CreateKpiTypeInput {
            name: "Teilnehmende".into(),
            data_type: "TEXT".into(),
            unit: None,
            description: None,
            color: None,
        };
        assert!(matches!(input.validate(), Err(DomainError::Validation(_))));
    }
}
