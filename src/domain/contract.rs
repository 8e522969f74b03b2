//! Contract input payloads and their validation
//!
//! Dates arrive as strings (`2025-03-01`, RFC 3339 or `01.03.2025`) and are
//! parsed during validation so later steps can rely on them.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::DomainError;
use crate::history::value::parse_date_input;
use crate::models::contract::CONTRACT_STATUSES;
use crate::models::deadline::DEADLINE_TYPES;
use crate::services::checklist::CHECKLIST_CATEGORY_IDS;

fn default_reminder_days() -> i32 {
    30
}

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "EUR".to_owned()
}

fn default_status() -> String {
    "ACTIVE".to_owned()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeadlineInput {
    #[serde(rename = "type")]
    pub deadline_type: String,
    pub custom_label: Option<String>,
    pub due_date: String,
    #[serde(default = "default_reminder_days")]
    pub reminder_days: i32,
    pub notify_email: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KpiInput {
    pub kpi_type_id: i32,
    pub target_value: f64,
    #[serde(default)]
    pub current_value: f64,
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevenuePlanInput {
    pub label: String,
    #[serde(default)]
    pub year2024: f64,
    #[serde(default)]
    pub year2025: f64,
    #[serde(default)]
    pub year2026: f64,
    #[serde(default)]
    pub year2027: f64,
    #[serde(default)]
    pub year2028: f64,
    #[serde(default)]
    pub year2029: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportDutyInput {
    pub report_type: String,
    pub year2024: Option<String>,
    pub year2025: Option<String>,
    pub year2026: Option<String>,
    pub year2027: Option<String>,
    pub year2028: Option<String>,
    pub year2029: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProofOfUseInput {
    pub sequence_number: i32,
    pub due_date: String,
    pub proof_type: String,
    #[serde(default)]
    pub auditor_required: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChecklistItemInput {
    pub category: String,
    pub label: String,
    pub assignee: Option<String>,
    pub remark: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

/// Payload for creating a contract
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContractInput {
    pub contract_number: String,
    pub title: String,
    pub title_short: Option<String>,
    pub partner: String,
    pub description: Option<String>,
    pub esf_number: Option<String>,
    pub client: Option<String>,
    pub project_lead: Option<String>,
    pub company: Option<String>,
    pub cost_center: Option<String>,
    pub basis_document: Option<String>,
    #[serde(default = "default_true")]
    pub data_matches_contract: bool,
    pub type_id: i32,
    pub start_date: String,
    pub end_date: Option<String>,
    pub termination_date: Option<String>,
    #[serde(default = "default_reminder_days")]
    pub notice_period_days: i32,
    pub value: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub payment_interval: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub auto_renewal: bool,
    pub revenue_net: Option<f64>,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub revenue_plan: Vec<RevenuePlanInput>,
    #[serde(default)]
    pub reports_linked_to_payment: bool,
    pub additional_obligations: Option<String>,
    pub refund_deadline: Option<String>,
    #[serde(default)]
    pub report_duties: Vec<ReportDutyInput>,
    #[serde(default)]
    pub proof_of_use_required: bool,
    pub proof_of_use_remarks: Option<String>,
    #[serde(default)]
    pub proof_of_use_items: Vec<ProofOfUseInput>,
    pub notes: Option<String>,
    #[serde(default = "default_reminder_days")]
    pub reminder_days: i32,
    #[serde(default)]
    pub deadlines: Vec<DeadlineInput>,
    #[serde(default)]
    pub kpis: Vec<KpiInput>,
    /// `None` seeds the standard end-of-project checklist
    pub checklist_items: Option<Vec<ChecklistItemInput>>,
}

/// Partial update; absent fields stay untouched, absent lists are kept,
/// supplied lists replace the stored ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContractInput {
    pub title: Option<String>,
    pub title_short: Option<String>,
    pub partner: Option<String>,
    pub description: Option<String>,
    pub esf_number: Option<String>,
    pub client: Option<String>,
    pub project_lead: Option<String>,
    pub company: Option<String>,
    pub cost_center: Option<String>,
    pub basis_document: Option<String>,
    pub data_matches_contract: Option<bool>,
    pub type_id: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub termination_date: Option<String>,
    pub notice_period_days: Option<i32>,
    pub value: Option<f64>,
    pub currency: Option<String>,
    pub payment_interval: Option<String>,
    pub status: Option<String>,
    pub auto_renewal: Option<bool>,
    pub revenue_net: Option<f64>,
    pub payment_method: Option<String>,
    pub revenue_plan: Option<Vec<RevenuePlanInput>>,
    pub reports_linked_to_payment: Option<bool>,
    pub additional_obligations: Option<String>,
    pub refund_deadline: Option<String>,
    pub report_duties: Option<Vec<ReportDutyInput>>,
    pub proof_of_use_required: Option<bool>,
    pub proof_of_use_remarks: Option<String>,
    pub proof_of_use_items: Option<Vec<ProofOfUseInput>>,
    pub notes: Option<String>,
    pub reminder_days: Option<i32>,
    pub deadlines: Option<Vec<DeadlineInput>>,
    pub kpis: Option<Vec<KpiInput>>,
    pub checklist_items: Option<Vec<ChecklistItemInput>>,
}

/// New current value for a contract KPI
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateKpiValueInput {
    pub current_value: f64,
    pub note: Option<String>,
    pub changed_by: Option<String>,
}

impl UpdateKpiValueInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.current_value.is_finite() {
            return Err(DomainError::Validation("current_value must be a number".into()));
        }
        Ok(())
    }
}

/// Empty or whitespace-only text is stored as null
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Zero is stored as null for optional amounts
pub fn normalize_amount(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Parse a required date
pub fn require_date(field: &str, raw: &str) -> Result<DateTime<Utc>, DomainError> {
    parse_date_input(raw.trim())
        .ok_or_else(|| DomainError::Validation(format!("{}: invalid date '{}'", field, raw)))
}

/// Parse an optional date; empty input means null
pub fn optional_date(field: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, DomainError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => require_date(field, s).map(Some),
    }
}

fn require_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: i32) -> Result<(), DomainError> {
    if value < 0 {
        return Err(DomainError::Validation(format!("{} must not be negative", field)));
    }
    Ok(())
}

fn check_status(status: &str) -> Result<(), DomainError> {
    if !CONTRACT_STATUSES.contains(&status) {
        return Err(DomainError::Validation(format!("unknown status '{}'", status)));
    }
    Ok(())
}

impl DeadlineInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !DEADLINE_TYPES.contains(&self.deadline_type.as_str()) {
            return Err(DomainError::Validation(format!(
                "unknown deadline type '{}'",
                self.deadline_type
            )));
        }
        require_text("deadline due_date", &self.due_date)?;
        require_date("deadline due_date", &self.due_date)?;
        require_non_negative("deadline reminder_days", self.reminder_days)?;
        if let Some(email) = self.notify_email.as_deref()
            && !email.trim().is_empty()
            && !email.contains('@')
        {
            return Err(DomainError::Validation(format!(
                "invalid notify_email '{}'",
                email
            )));
        }
        Ok(())
    }
}

impl KpiInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        optional_date("kpi due_date", self.due_date.as_deref())?;
        Ok(())
    }
}

impl ProofOfUseInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_date("proof_of_use due_date", &self.due_date)?;
        Ok(())
    }
}

impl ChecklistItemInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !CHECKLIST_CATEGORY_IDS.contains(&self.category.as_str()) {
            return Err(DomainError::Validation(format!(
                "unknown checklist category '{}'",
                self.category
            )));
        }
        Ok(())
    }
}

fn validate_lists(
    deadlines: Option<&[DeadlineInput]>,
    kpis: Option<&[KpiInput]>,
    proof_of_use_items: Option<&[ProofOfUseInput]>,
    checklist_items: Option<&[ChecklistItemInput]>,
) -> Result<(), DomainError> {
    for deadline in deadlines.unwrap_or_default() {
        deadline.validate()?;
    }
    for kpi in kpis.unwrap_or_default() {
        kpi.validate()?;
    }
    for item in proof_of_use_items.unwrap_or_default() {
        item.validate()?;
    }
    for item in checklist_items.unwrap_or_default() {
        item.validate()?;
    }
    Ok(())
}

impl CreateContractInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_text("contract_number", &self.contract_number)?;
        require_text("title", &self.title)?;
        require_text("partner", &self.partner)?;
        require_text("start_date", &self.start_date)?;
        require_date("start_date", &self.start_date)?;
        optional_date("end_date", self.end_date.as_deref())?;
        optional_date("termination_date", self.termination_date.as_deref())?;
        optional_date("refund_deadline", self.refund_deadline.as_deref())?;
        require_non_negative("notice_period_days", self.notice_period_days)?;
        require_non_negative("reminder_days", self.reminder_days)?;
        check_status(&self.status)?;

        validate_lists(
            Some(&self.deadlines),
            Some(&self.kpis),
            Some(&self.proof_of_use_items),
            self.checklist_items.as_deref(),
        )
    }
}

impl UpdateContractInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(partner) = &self.partner {
            require_text("partner", partner)?;
        }
        if let Some(start) = &self.start_date {
            require_date("start_date", start)?;
        }
        optional_date("end_date", self.end_date.as_deref())?;
        optional_date("termination_date", self.termination_date.as_deref())?;
        optional_date("refund_deadline", self.refund_deadline.as_deref())?;
        if let Some(days) = self.notice_period_days {
            require_non_negative("notice_period_days", days)?;
        }
        if let Some(days) = self.reminder_days {
            require_non_negative("reminder_days", days)?;
        }
        if let Some(status) = &self.status {
            check_status(status)?;
        }

        validate_lists(
            self.deadlines.as_deref(),
            self.kpis.as_deref(),
            self.proof_of_use_items.as_deref(),
            self.checklist_items.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> CreateContractInput {
        serde_json::from_value(serde_json::json!({
            "contract_number": "VT-2025-0001",
            "title": "Büroräume",
            "partner": "Stadt Köln",
            "type_id": 1,
            "start_date": "2025-01-01"
        }))
        .unwrap()
    }

    #[test]
    fn defaults_follow_the_form() {
        let input = minimal();
        assert!(input.data_matches_contract);
        assert_eq!(input.notice_period_days, 30);
        assert_eq!(input.reminder_days, 30);
        assert_eq!(input.currency, "EUR");
        assert_eq!(input.status, "ACTIVE");
        assert!(input.checklist_items.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut input = minimal();
        input.title = "  ".into();
        assert!(matches!(input.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut input = minimal();
        input.status = "ARCHIVED".into();
        assert!(matches!(input.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn bad_deadline_date_is_rejected() {
        let mut input = minimal();
        input.deadlines.push(DeadlineInput {
            deadline_type: "KUENDIGUNG".into(),
            custom_label: None,
            due_date: "bald".into(),
            reminder_days: 30,
            notify_email: None,
            is_completed: false,
        });
        assert!(matches!(input.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn update_accepts_empty_dates_as_clear() {
        let update = UpdateContractInput {
            end_date: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        assert_eq!(optional_date("end_date", update.end_date.as_deref()).unwrap(), None);
    }

    #[test]
    fn normalizers() {
        assert_eq!(normalize_text(Some(" ".into())), None);
        assert_eq!(normalize_text(Some("x".into())), Some("x".into()));
        assert_eq!(normalize_amount(Some(0.0)), None);
        assert_eq!(normalize_amount(Some(12.5)), Some(12.5));
    }
}
