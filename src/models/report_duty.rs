use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::history::ReportDutyItem;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report_duties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub contract_id: i32,
    pub report_type: String,
    pub year2024: Option<String>,
    pub year2025: Option<String>,
    pub year2026: Option<String>,
    pub year2027: Option<String>,
    pub year2028: Option<String>,
    pub year2029: Option<String>,
    pub remarks: Option<String>,
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

impl From<&Model> for ReportDutyItem {
    fn from(duty: &Model) -> Self {
        ReportDutyItem {
            report_type: Some(duty.report_type.clone()),
        }
    }
}
