use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::api::error::ok;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::{create_jwt, verify_password};
use crate::models::Role;
use crate::services::Actor;

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "error": "Invalid credentials" })),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    responses(
        (status = 200, description = "JWT issued"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    tracing::info!("Login attempt for {}", payload.email);

    let user = match state.user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            tracing::warn!("Unknown user: {}", payload.email);
            return invalid_credentials();
        }
        Err(e) => return e.into_response(),
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        _ => {
            tracing::warn!("Password verification failed for {}", user.email);
            return invalid_credentials();
        }
    }

    let Some(role) = Role::parse(&user.role) else {
        return DomainError::Internal(format!("user {} has unknown role {}", user.id, user.role))
            .into_response();
    };

    match create_jwt(user.id, &user.email, role) {
        Ok(token) => ok(json!({
            "token": token,
            "user": {
                "id": user.id,
                "email": user.email,
                "name": user.name,
                "role": role,
                "role_name": role.display_name(),
            }
        })),
        Err(e) => DomainError::Internal(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(State(state): State<AppState>, actor: Actor) -> impl IntoResponse {
    match state.user_repo.find_by_id(actor.user_id).await {
        Ok(Some(user)) => ok(json!({
            "id": user.id,
            "email": user.email,
            "name": user.name,
            "role": actor.role,
            "role_name": actor.role.display_name(),
        })),
        Ok(None) => DomainError::NotFound.into_response(),
        Err(e) => e.into_response(),
    }
}
