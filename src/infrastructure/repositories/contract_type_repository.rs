//! SeaORM implementation of ContractTypeRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{ContractTypeRepository, CreateContractTypeInput, DEFAULT_COLOR, DomainError};
use crate::models::contract_type::{self, ActiveModel, Entity as ContractTypeEntity};
use crate::models::ContractType;

pub struct SeaOrmContractTypeRepository {
    db: DatabaseConnection,
}

impl SeaOrmContractTypeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContractTypeRepository for SeaOrmContractTypeRepository {
    async fn find_all(&self) -> Result<Vec<ContractType>, DomainError> {
        let types = ContractTypeEntity::find()
            .order_by_asc(contract_type::Column::Name)
            .all(&self.db)
            .await?;
        Ok(types)
    }

    async fn create(&self, input: CreateContractTypeInput) -> Result<ContractType, DomainError> {
        input.validate()?;
        let name = input.name.trim().to_owned();

        let existing = ContractTypeEntity::find()
            .filter(contract_type::Column::Name.eq(name.as_str()))
            .one(&self.db)
            .await?;
        let taken = |name: &str| format!("contract type '{}' already exists", name);
        if existing.is_some() {
            return Err(DomainError::Conflict(taken(&name)));
        }

        let model = ActiveModel {
            name: Set(name.clone()),
            color: Set(input.color.unwrap_or_else(|| DEFAULT_COLOR.to_owned())),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::from_write(e, || taken(&name)))
    }
}
