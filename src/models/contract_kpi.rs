use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contract_kpis")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub contract_id: i32,
    pub kpi_type_id: i32,
    pub target_value: f64,
    pub current_value: f64,
    pub due_date: Option<DateTimeUtc>,
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
    #[sea_orm(
        belongs_to = "super::kpi_type::Entity",
        from = "Column::KpiTypeId",
        to = "super::kpi_type::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    KpiType,
    #[sea_orm(has_many = "super::kpi_history::Entity")]
    History,
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl Related<super::kpi_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::KpiType.def()
    }
}

impl Related<super::kpi_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
