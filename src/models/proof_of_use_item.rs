use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::history::ProofOfUseEntry;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "proof_of_use_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub contract_id: i32,
    pub sequence_number: i32,
    pub due_date: DateTimeUtc,
    pub proof_type: String,
    pub auditor_required: bool,
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

impl From<&Model> for ProofOfUseEntry {
    fn from(item: &Model) -> Self {
        ProofOfUseEntry {
            sequence_number: Some(item.sequence_number),
            proof_type: Some(item.proof_type.clone()),
        }
    }
}
