//! SeaORM implementation of KpiTypeRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::contract::normalize_text;
use crate::domain::{CreateKpiTypeInput, DEFAULT_COLOR, DomainError, KpiTypeRepository, KpiTypeWithUsage};
use crate::models::contract_kpi;
use crate::models::kpi_type::{self, ActiveModel, Entity as KpiTypeEntity};
use crate::models::KpiType;

pub struct SeaOrmKpiTypeRepository {
    db: DatabaseConnection,
}

impl SeaOrmKpiTypeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KpiTypeRepository for SeaOrmKpiTypeRepository {
    async fn find_all(&self) -> Result<Vec<KpiTypeWithUsage>, DomainError> {
        let types = KpiTypeEntity::find()
            .order_by_asc(kpi_type::Column::Name)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(types.len());
        for kpi_type in types {
            let usage_count = contract_kpi::Entity::find()
                .filter(contract_kpi::Column::KpiTypeId.eq(kpi_type.id))
                .count(&self.db)
                .await?;
            result.push(KpiTypeWithUsage {
                kpi_type,
                usage_count,
            });
        }

        Ok(result)
    }

    async fn create(&self, input: CreateKpiTypeInput) -> Result<KpiType, DomainError> {
        input.validate()?;
        let name = input.name.trim().to_owned();

        let existing = KpiTypeEntity::find()
            .filter(kpi_type::Column::Name.eq(name.as_str()))
            .one(&self.db)
            .await?;
        let taken = |name: &str| format!("KPI type '{}' already exists", name);
        if existing.is_some() {
            return Err(DomainError::Conflict(taken(&name)));
        }

        let now = chrono::Utc::now();
        let model = ActiveModel {
            name: Set(name.clone()),
            data_type: Set(input.data_type),
            unit: Set(normalize_text(input.unit)),
            description: Set(normalize_text(input.description)),
            color: Set(input.color.unwrap_or_else(|| DEFAULT_COLOR.to_owned())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::from_write(e, || taken(&name)))
    }
}
