//! Contract KPI reads and value updates

use chrono::Utc;
use sea_orm::*;

use crate::domain::DomainError;
use crate::domain::contract::{UpdateKpiValueInput, normalize_text};
use crate::models::{contract, contract_kpi, kpi_history, kpi_type, user};
use crate::services::contract_service::{KpiView, kpi_view};
use crate::services::permissions::Actor;

const UPDATE_HISTORY_PREVIEW: u64 = 10;

async fn load_kpi<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<(contract_kpi::Model, contract::Model), DomainError> {
    let kpi = contract_kpi::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(DomainError::NotFound)?;
    let contract = contract::Entity::find_by_id(kpi.contract_id)
        .one(conn)
        .await?
        .ok_or(DomainError::NotFound)?;
    Ok((kpi, contract))
}

async fn history<C: ConnectionTrait>(
    conn: &C,
    kpi_id: i32,
    limit: Option<u64>,
) -> Result<Vec<kpi_history::Model>, DbErr> {
    kpi_history::Entity::find()
        .filter(kpi_history::Column::ContractKpiId.eq(kpi_id))
        .order_by_desc(kpi_history::Column::ChangedAt)
        .order_by_desc(kpi_history::Column::Id)
        .limit(limit)
        .all(conn)
        .await
}

/// A single KPI with its type and complete value history, newest first
pub async fn get_kpi(db: &DatabaseConnection, actor: Actor, id: i32) -> Result<KpiView, DomainError> {
    let (kpi, contract) = load_kpi(db, id).await?;
    if !actor.can_view(contract.created_by_id) {
        return Err(DomainError::Forbidden);
    }

    let kpi_type = kpi_type::Entity::find_by_id(kpi.kpi_type_id).one(db).await?;
    let entries = history(db, kpi.id, None).await?;

    Ok(kpi_view(kpi, kpi_type, Some(entries), Utc::now().date_naive()))
}

/// Set the current value and log the previous one, atomically.
///
/// Without an explicit `changed_by` the caller's name (or email) is logged.
pub async fn update_kpi_value(
    db: &DatabaseConnection,
    actor: Actor,
    id: i32,
    input: UpdateKpiValueInput,
) -> Result<KpiView, DomainError> {
    input.validate()?;

    let txn = db.begin().await?;

    let (kpi, contract) = load_kpi(&txn, id).await?;
    if !actor.can_edit(contract.created_by_id) {
        return Err(DomainError::Forbidden);
    }

    let changed_by = match normalize_text(input.changed_by) {
        Some(name) => Some(name),
        None => user::Entity::find_by_id(actor.user_id)
            .one(&txn)
            .await?
            .map(|u| u.name.unwrap_or(u.email)),
    };

    let now = Utc::now();
    kpi_history::ActiveModel {
        contract_kpi_id: Set(kpi.id),
        previous_value: Set(kpi.current_value),
        new_value: Set(input.current_value),
        changed_at: Set(now),
        changed_by: Set(changed_by),
        note: Set(normalize_text(input.note)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut active: contract_kpi::ActiveModel = kpi.into();
    active.current_value = Set(input.current_value);
    active.updated_at = Set(now);
    let updated = active.update(&txn).await?;

    let kpi_type = kpi_type::Entity::find_by_id(updated.kpi_type_id).one(&txn).await?;
    let entries = history(&txn, updated.id, Some(UPDATE_HISTORY_PREVIEW)).await?;

    txn.commit().await?;

    tracing::info!(
        "KPI {} of contract {} set to {} by user {}",
        updated.id,
        updated.contract_id,
        updated.current_value,
        actor.user_id
    );

    Ok(kpi_view(updated, kpi_type, Some(entries), now.date_naive()))
}
