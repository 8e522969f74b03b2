use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::api::error::ok;
use crate::infrastructure::AppState;
use crate::services::Actor;
use crate::services::contract_service::find_visible;

/// Entries returned per request
const HISTORY_LIMIT: u64 = 100;

#[utoipa::path(
    get,
    path = "/api/contracts/{id}/history",
    params(("id" = i32, Path, description = "Contract id")),
    responses(
        (status = 200, description = "Change history, newest first"),
        (status = 403, description = "Not the caller's contract"),
        (status = 404, description = "Unknown contract")
    )
)]
pub async fn get_history(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    if let Err(e) = find_visible(state.db(), actor, id).await {
        return e.into_response();
    }

    match state.history_repo.find_for_contract(id, HISTORY_LIMIT).await {
        Ok(entries) => ok(entries),
        Err(e) => e.into_response(),
    }
}
