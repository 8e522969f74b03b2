pub mod checklist_item;
pub mod contract;
pub mod contract_history;
pub mod contract_kpi;
pub mod contract_type;
pub mod deadline;
pub mod kpi_history;
pub mod kpi_type;
pub mod notification_log;
pub mod proof_of_use_item;
pub mod report_duty;
pub mod revenue_plan_entry;
pub mod user;

pub use contract::Model as Contract;
pub use contract_history::Model as ContractHistory;
pub use contract_type::Model as ContractType;
pub use kpi_type::Model as KpiType;
pub use user::{Model as User, Role, UserSummary};
