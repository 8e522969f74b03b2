//! Contract type and KPI type tables

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use crate::api::error::{ok, success};
use crate::domain::{CreateContractTypeInput, CreateKpiTypeInput, DomainError};
use crate::infrastructure::AppState;
use crate::services::Actor;
use crate::services::permissions::can_manage_settings;

#[utoipa::path(
    get,
    path = "/api/contract-types",
    responses((status = 200, description = "Contract types ordered by name"))
)]
pub async fn list_contract_types(State(state): State<AppState>, _actor: Actor) -> impl IntoResponse {
    match state.contract_type_repo.find_all().await {
        Ok(types) => ok(types),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/contract-types",
    responses(
        (status = 201, description = "Contract type created"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn create_contract_type(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<CreateContractTypeInput>,
) -> impl IntoResponse {
    if !can_manage_settings(actor.role) {
        return DomainError::Forbidden.into_response();
    }

    match state.contract_type_repo.create(payload).await {
        Ok(created) => success(StatusCode::CREATED, created),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/kpi-types",
    responses((status = 200, description = "KPI types with usage counts"))
)]
pub async fn list_kpi_types(State(state): State<AppState>, _actor: Actor) -> impl IntoResponse {
    match state.kpi_type_repo.find_all().await {
        Ok(types) => ok(types),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/kpi-types",
    responses(
        (status = 201, description = "KPI type created"),
        (status = 409, description = "Name already taken")
    )
)]
pub async fn create_kpi_type(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<CreateKpiTypeInput>,
) -> impl IntoResponse {
    if !can_manage_settings(actor.role) {
        return DomainError::Forbidden.into_response();
    }

    match state.kpi_type_repo.create(payload).await {
        Ok(created) => success(StatusCode::CREATED, created),
        Err(e) => e.into_response(),
    }
}
