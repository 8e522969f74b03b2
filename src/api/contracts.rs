use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::api::error::{ok, success};
use crate::domain::{CreateContractInput, UpdateContractInput};
use crate::services::contract_service;
use crate::services::{Actor, ContractFilter};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListContractsQuery {
    /// ACTIVE, TERMINATED, EXPIRED or DRAFT
    status: Option<String>,
    /// Contract type id
    type_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/contracts",
    params(ListContractsQuery),
    responses(
        (status = 200, description = "Contracts visible to the caller"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_contracts(
    State(db): State<DatabaseConnection>,
    actor: Actor,
    Query(query): Query<ListContractsQuery>,
) -> impl IntoResponse {
    let filter = ContractFilter {
        status: query.status.filter(|s| !s.is_empty()),
        type_id: query.type_id,
    };

    match contract_service::list_contracts(&db, actor, filter).await {
        Ok(contracts) => ok(contracts),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/contracts",
    responses(
        (status = 201, description = "Contract created"),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Contract number already taken")
    )
)]
pub async fn create_contract(
    State(db): State<DatabaseConnection>,
    actor: Actor,
    Json(payload): Json<CreateContractInput>,
) -> impl IntoResponse {
    match contract_service::create_contract(&db, actor, payload).await {
        Ok(contract) => success(StatusCode::CREATED, contract),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/contracts/{id}",
    params(("id" = i32, Path, description = "Contract id")),
    responses(
        (status = 200, description = "Contract with deadlines, KPIs and checklist"),
        (status = 403, description = "Not the caller's contract"),
        (status = 404, description = "Unknown contract")
    )
)]
pub async fn get_contract(
    State(db): State<DatabaseConnection>,
    actor: Actor,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match contract_service::get_contract(&db, actor, id).await {
        Ok(contract) => ok(contract),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/contracts/{id}",
    params(("id" = i32, Path, description = "Contract id")),
    responses(
        (status = 200, description = "Contract updated, changes recorded"),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Not the caller's contract"),
        (status = 404, description = "Unknown contract")
    )
)]
pub async fn update_contract(
    State(db): State<DatabaseConnection>,
    actor: Actor,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateContractInput>,
) -> impl IntoResponse {
    match contract_service::update_contract(&db, actor, id, payload).await {
        Ok(contract) => ok(contract),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/contracts/{id}",
    params(("id" = i32, Path, description = "Contract id")),
    responses(
        (status = 200, description = "Contract deleted"),
        (status = 403, description = "Not the caller's contract"),
        (status = 404, description = "Unknown contract")
    )
)]
pub async fn delete_contract(
    State(db): State<DatabaseConnection>,
    actor: Actor,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match contract_service::delete_contract(&db, actor, id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Vertrag gelöscht" })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
