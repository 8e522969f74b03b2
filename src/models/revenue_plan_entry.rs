use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::history::RevenuePlanItem;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "revenue_plan_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub contract_id: i32,
    pub label: String,
    pub year2024: f64,
    pub year2025: f64,
    pub year2026: f64,
    pub year2027: f64,
    pub year2028: f64,
    pub year2029: f64,
    pub sort_order: i32,
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

impl From<&Model> for RevenuePlanItem {
    fn from(entry: &Model) -> Self {
        RevenuePlanItem {
            label: Some(entry.label.clone()),
        }
    }
}
