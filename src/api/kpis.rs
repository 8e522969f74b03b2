use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;

use crate::api::error::ok;
use crate::domain::UpdateKpiValueInput;
use crate::services::Actor;
use crate::services::kpi_service;

#[utoipa::path(
    get,
    path = "/api/contract-kpis/{id}",
    params(("id" = i32, Path, description = "Contract KPI id")),
    responses(
        (status = 200, description = "KPI with type and full value history"),
        (status = 404, description = "Unknown KPI")
    )
)]
pub async fn get_kpi(
    State(db): State<DatabaseConnection>,
    actor: Actor,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match kpi_service::get_kpi(&db, actor, id).await {
        Ok(kpi) => ok(kpi),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/contract-kpis/{id}",
    params(("id" = i32, Path, description = "Contract KPI id")),
    responses(
        (status = 200, description = "Value updated, previous value logged"),
        (status = 404, description = "Unknown KPI")
    )
)]
pub async fn update_kpi(
    State(db): State<DatabaseConnection>,
    actor: Actor,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateKpiValueInput>,
) -> impl IntoResponse {
    match kpi_service::update_kpi_value(&db, actor, id, payload).await {
        Ok(kpi) => ok(kpi),
        Err(e) => e.into_response(),
    }
}
