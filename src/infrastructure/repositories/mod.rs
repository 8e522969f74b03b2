//! Repository implementations using SeaORM

pub mod contract_type_repository;
pub mod history_repository;
pub mod kpi_type_repository;
pub mod user_repository;

pub use contract_type_repository::SeaOrmContractTypeRepository;
pub use history_repository::SeaOrmHistoryRepository;
pub use kpi_type_repository::SeaOrmKpiTypeRepository;
pub use user_repository::SeaOrmUserRepository;
