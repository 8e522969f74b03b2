use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kpi_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub data_type: String, // NUMBER, PERCENT, CURRENCY
    pub unit: Option<String>,
    pub description: Option<String>,
    pub color: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::contract_kpi::Entity")]
    ContractKpis,
}

impl Related<super::contract_kpi::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContractKpis.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const KPI_DATA_TYPES: [&str; 3] = ["NUMBER", "PERCENT", "CURRENCY"];
