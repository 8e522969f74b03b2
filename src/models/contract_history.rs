use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::history::ChangeRecord;

/// Append-only audit trail of contract changes
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contract_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub contract_id: i32,
    pub changed_by_id: i32,
    pub field_name: String,
    pub field_label: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub change_type: String, // CREATE, UPDATE, DELETE
    pub changed_at: DateTimeUtc,
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
        belongs_to = "super::user::Entity",
        from = "Column::ChangedById",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    ChangedBy,
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChangedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<ChangeRecord> for ActiveModel {
    fn from(record: ChangeRecord) -> Self {
        ActiveModel {
            contract_id: Set(record.contract_id),
            changed_by_id: Set(record.changed_by_id),
            field_name: Set(record.field_name),
            field_label: Set(record.field_label),
            old_value: Set(record.old_value),
            new_value: Set(record.new_value),
            change_type: Set(record.change_kind.as_str().to_owned()),
            changed_at: Set(record.changed_at),
            ..Default::default()
        }
    }
}
