pub mod auth;
pub mod contracts;
pub mod cron;
pub mod error;
pub mod health;
pub mod history;
pub mod kpis;
pub mod lookups;

use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Contracts
        .route(
            "/contracts",
            get(contracts::list_contracts).post(contracts::create_contract),
        )
        .route(
            "/contracts/:id",
            get(contracts::get_contract)
                .put(contracts::update_contract)
                .delete(contracts::delete_contract),
        )
        .route("/contracts/:id/history", get(history::get_history))
        // Lookup tables
        .route(
            "/contract-types",
            get(lookups::list_contract_types).post(lookups::create_contract_type),
        )
        .route(
            "/kpi-types",
            get(lookups::list_kpi_types).post(lookups::create_kpi_type),
        )
        // KPI values
        .route(
            "/contract-kpis/:id",
            get(kpis::get_kpi).put(kpis::update_kpi),
        )
        // Scheduled jobs
        .route("/cron/check-deadlines", post(cron::check_deadlines_job))
        .with_state(state)
}
