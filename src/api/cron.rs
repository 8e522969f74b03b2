use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::infrastructure::AppState;
use crate::services::reminders::check_deadlines;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CronQuery {
    /// Shared cron secret
    secret: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/cron/check-deadlines",
    params(CronQuery),
    responses(
        (status = 200, description = "Reminders processed, expired contracts updated"),
        (status = 401, description = "Missing or wrong secret")
    )
)]
pub async fn check_deadlines_job(
    State(state): State<AppState>,
    Query(query): Query<CronQuery>,
) -> impl IntoResponse {
    let authorized = match (&state.cron_secret, &query.secret) {
        (Some(expected), Some(given)) => expected == given,
        _ => false,
    };
    if !authorized {
        tracing::warn!("Rejected cron call with missing or wrong secret");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "error": "Unauthorized" })),
        )
            .into_response();
    }

    let today = Utc::now().date_naive();
    match check_deadlines(state.db(), state.notifier.as_ref(), today).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": summary.message,
                "reminders": summary.reminders,
                "expired": summary.expired,
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
