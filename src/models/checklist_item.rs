use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::history::ChecklistEntry;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "checklist_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub contract_id: i32,
    pub category: String, // MANAGEMENT, CONTROLLING, IT, QUALITAET, NACHHALTIGKEIT
    pub label: String,
    pub assignee: Option<String>,
    pub remark: Option<String>,
    pub is_completed: bool,
    pub completed_at: Option<DateTimeUtc>,
    pub sort_order: i32,
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

impl From<&Model> for ChecklistEntry {
    fn from(item: &Model) -> Self {
        ChecklistEntry {
            label: Some(item.label.clone()),
        }
    }
}
