use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kpi_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub contract_kpi_id: i32,
    pub previous_value: f64,
    pub new_value: f64,
    pub changed_at: DateTimeUtc,
    pub changed_by: Option<String>,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contract_kpi::Entity",
        from = "Column::ContractKpiId",
        to = "super::contract_kpi::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    ContractKpi,
}

impl Related<super::contract_kpi::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContractKpi.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
