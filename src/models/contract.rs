use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::history::Snapshot;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub contract_number: String,

    // Stammdaten
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
    pub data_matches_contract: bool,
    pub type_id: i32,
    pub start_date: DateTimeUtc,
    pub end_date: Option<DateTimeUtc>,
    pub termination_date: Option<DateTimeUtc>,
    pub notice_period_days: i32,

    // Umsatzplanung & Finanzen
    pub revenue_net: Option<f64>,
    pub revenue_tax: Option<f64>,
    pub revenue_gross: Option<f64>,
    pub payment_method: Option<String>,
    pub value: Option<f64>,
    pub currency: String,
    pub payment_interval: Option<String>,
    pub status: String, // ACTIVE, TERMINATED, EXPIRED, DRAFT
    pub auto_renewal: bool,

    // Berichtspflichten
    pub reports_linked_to_payment: bool,
    pub additional_obligations: Option<String>,
    pub refund_deadline: Option<DateTimeUtc>,

    // Verwendungsnachweis
    pub proof_of_use_required: bool,
    pub proof_of_use_remarks: Option<String>,

    pub notes: Option<String>,
    pub document_path: Option<String>,
    pub reminder_days: i32,
    pub reminder_sent: bool,
    pub created_by_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contract_type::Entity",
        from = "Column::TypeId",
        to = "super::contract_type::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    ContractType,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedById",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    CreatedBy,
    #[sea_orm(has_many = "super::deadline::Entity")]
    Deadlines,
    #[sea_orm(has_many = "super::contract_kpi::Entity")]
    Kpis,
    #[sea_orm(has_many = "super::revenue_plan_entry::Entity")]
    RevenuePlan,
    #[sea_orm(has_many = "super::report_duty::Entity")]
    ReportDuties,
    #[sea_orm(has_many = "super::proof_of_use_item::Entity")]
    ProofOfUseItems,
    #[sea_orm(has_many = "super::checklist_item::Entity")]
    ChecklistItems,
    #[sea_orm(has_many = "super::contract_history::Entity")]
    History,
}

impl Related<super::contract_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContractType.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedBy.def()
    }
}

impl Related<super::deadline::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deadlines.def()
    }
}

impl Related<super::contract_kpi::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Kpis.def()
    }
}

impl Related<super::revenue_plan_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RevenuePlan.def()
    }
}

impl Related<super::report_duty::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportDuties.def()
    }
}

impl Related<super::proof_of_use_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProofOfUseItems.def()
    }
}

impl Related<super::checklist_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChecklistItems.def()
    }
}

impl Related<super::contract_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const CONTRACT_STATUSES: [&str; 4] = ["ACTIVE", "TERMINATED", "EXPIRED", "DRAFT"];

/// German display text for a contract status
pub fn status_text(status: &str) -> &str {
    match status {
        "ACTIVE" => "Aktiv",
        "TERMINATED" => "Gekündigt",
        "EXPIRED" => "Abgelaufen",
        "DRAFT" => "Entwurf",
        other => other,
    }
}

impl Model {
    /// State of every audited field, for the change detector
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new()
            .with("title", self.title.clone())
            .with_opt("title_short", self.title_short.clone())
            .with("partner", self.partner.clone())
            .with_opt("description", self.description.clone())
            .with_opt("esf_number", self.esf_number.clone())
            .with_opt("client", self.client.clone())
            .with_opt("project_lead", self.project_lead.clone())
            .with_opt("company", self.company.clone())
            .with_opt("cost_center", self.cost_center.clone())
            .with_opt("basis_document", self.basis_document.clone())
            .with("data_matches_contract", self.data_matches_contract)
            .with("type_id", self.type_id)
            .with("start_date", self.start_date)
            .with_opt("end_date", self.end_date)
            .with_opt("termination_date", self.termination_date)
            .with("notice_period_days", self.notice_period_days)
            .with_opt("revenue_net", self.revenue_net)
            .with_opt("revenue_tax", self.revenue_tax)
            .with_opt("revenue_gross", self.revenue_gross)
            .with_opt("payment_method", self.payment_method.clone())
            .with_opt("value", self.value)
            .with("currency", self.currency.clone())
            .with_opt("payment_interval", self.payment_interval.clone())
            .with("reports_linked_to_payment", self.reports_linked_to_payment)
            .with_opt("additional_obligations", self.additional_obligations.clone())
            .with_opt("refund_deadline", self.refund_deadline)
            .with("proof_of_use_required", self.proof_of_use_required)
            .with_opt("proof_of_use_remarks", self.proof_of_use_remarks.clone())
            .with("status", self.status.clone())
            .with("auto_renewal", self.auto_renewal)
            .with_opt("notes", self.notes.clone())
            .with("reminder_days", self.reminder_days)
    }
}
