//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{ContractTypeRepository, HistoryRepository, KpiTypeRepository, UserRepository};
use crate::infrastructure::config::Config;
use crate::infrastructure::{
    SeaOrmContractTypeRepository, SeaOrmHistoryRepository, SeaOrmKpiTypeRepository,
    SeaOrmUserRepository,
};
use crate::services::reminders::{LogNotifier, ReminderNotifier};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub contract_type_repo: Arc<dyn ContractTypeRepository>,
    pub kpi_type_repo: Arc<dyn KpiTypeRepository>,
    pub history_repo: Arc<dyn HistoryRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    /// Delivery channel for the deadline reminder job
    pub notifier: Arc<dyn ReminderNotifier>,
    /// Secret the cron caller must present; unset rejects every call
    pub cron_secret: Option<String>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        Self {
            contract_type_repo: Arc::new(SeaOrmContractTypeRepository::new(db.clone())),
            kpi_type_repo: Arc::new(SeaOrmKpiTypeRepository::new(db.clone())),
            history_repo: Arc::new(SeaOrmHistoryRepository::new(db.clone())),
            user_repo: Arc::new(SeaOrmUserRepository::new(db.clone())),
            notifier: Arc::new(LogNotifier),
            cron_secret: config.cron_secret.clone(),
            db,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
