//! SeaORM implementation of HistoryRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::domain::{DomainError, HistoryEntry, HistoryRepository};
use crate::models::contract_history::{self, Entity as HistoryEntity};
use crate::models::user;

pub struct SeaOrmHistoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmHistoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HistoryRepository for SeaOrmHistoryRepository {
    async fn find_for_contract(
        &self,
        contract_id: i32,
        limit: u64,
    ) -> Result<Vec<HistoryEntry>, DomainError> {
        // Records of one update share a timestamp; id keeps their insertion order.
        let rows = HistoryEntity::find()
            .filter(contract_history::Column::ContractId.eq(contract_id))
            .order_by_desc(contract_history::Column::ChangedAt)
            .order_by_asc(contract_history::Column::Id)
            .limit(limit)
            .find_also_related(user::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(row, actor)| HistoryEntry::new(row, actor.as_ref()))
            .collect())
    }
}
