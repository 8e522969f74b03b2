use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::login,
        api::auth::me,
        api::contracts::list_contracts,
        api::contracts::create_contract,
        api::contracts::get_contract,
        api::contracts::update_contract,
        api::contracts::delete_contract,
        api::history::get_history,
        api::lookups::list_contract_types,
        api::lookups::create_contract_type,
        api::lookups::list_kpi_types,
        api::lookups::create_kpi_type,
        api::kpis::get_kpi,
        api::kpis::update_kpi,
        api::cron::check_deadlines_job,
    ),
    tags(
        (name = "vertragscontrolling", description = "Vertragscontrolling API")
    )
)]
pub struct ApiDoc;
