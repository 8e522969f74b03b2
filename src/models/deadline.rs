use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::history::{DeadlineItem, LooseDate};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deadlines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub contract_id: i32,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub deadline_type: String,
    pub custom_label: Option<String>,
    pub due_date: DateTimeUtc,
    pub reminder_days: i32,
    pub notify_email: Option<String>,
    pub is_completed: bool,
    pub completed_at: Option<DateTimeUtc>,
    pub reminder_sent: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contract::Entity",
        from = "Column::ContractId",
        to = "super::contract::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Contract,
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const DEADLINE_TYPES: [&str; 5] = [
    "KUENDIGUNG",
    "VERLAENGERUNG",
    "PRUEFUNG",
    "RECHNUNG",
    "SONSTIGES",
];

/// Label used for the deadline that mirrors a contract's refund date
pub const REFUND_DEADLINE_LABEL: &str = "Rückzahlung Mittel";

/// German display text for a deadline type code; unknown codes pass through
pub fn deadline_type_label(code: &str) -> &str {
    match code {
        "KUENDIGUNG" => "Kündigungsfrist",
        "VERLAENGERUNG" => "Verlängerungs-Deadline",
        "PRUEFUNG" => "Prüfungsintervall",
        "RECHNUNG" => "Rechnungslegung",
        "SONSTIGES" => "Sonstiges",
        other => other,
    }
}

impl From<&Model> for DeadlineItem {
    fn from(deadline: &Model) -> Self {
        DeadlineItem {
            custom_label: deadline.custom_label.clone(),
            deadline_type: deadline.deadline_type.clone(),
            due_date: Some(LooseDate::Native(deadline.due_date)),
        }
    }
}
