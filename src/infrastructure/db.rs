use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Child rows rely on ON DELETE CASCADE
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = ON".to_owned(),
    ))
    .await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        name TEXT,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'PROJEKTLEITUNG',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contract_types (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        color TEXT NOT NULL DEFAULT '#3b82f6',
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS kpi_types (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        data_type TEXT NOT NULL DEFAULT 'NUMBER',
        unit TEXT,
        description TEXT,
        color TEXT NOT NULL DEFAULT '#3b82f6',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contracts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        contract_number TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        title_short TEXT,
        partner TEXT NOT NULL,
        description TEXT,
        esf_number TEXT,
        client TEXT,
        project_lead TEXT,
        company TEXT,
        cost_center TEXT,
        basis_document TEXT,
        data_matches_contract BOOLEAN NOT NULL DEFAULT 1,
        type_id INTEGER NOT NULL REFERENCES contract_types(id),
        start_date TEXT NOT NULL,
        end_date TEXT,
        termination_date TEXT,
        notice_period_days INTEGER NOT NULL DEFAULT 30,
        revenue_net REAL,
        revenue_tax REAL,
        revenue_gross REAL,
        payment_method TEXT,
        value REAL,
        currency TEXT NOT NULL DEFAULT 'EUR',
        payment_interval TEXT,
        status TEXT NOT NULL DEFAULT 'ACTIVE',
        auto_renewal BOOLEAN NOT NULL DEFAULT 0,
        reports_linked_to_payment BOOLEAN NOT NULL DEFAULT 0,
        additional_obligations TEXT,
        refund_deadline TEXT,
        proof_of_use_required BOOLEAN NOT NULL DEFAULT 0,
        proof_of_use_remarks TEXT,
        notes TEXT,
        document_path TEXT,
        reminder_days INTEGER NOT NULL DEFAULT 30,
        reminder_sent BOOLEAN NOT NULL DEFAULT 0,
        created_by_id INTEGER NOT NULL REFERENCES users(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS deadlines (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        contract_id INTEGER NOT NULL REFERENCES contracts(id) ON DELETE CASCADE,
        type TEXT NOT NULL,
        custom_label TEXT,
        due_date TEXT NOT NULL,
        reminder_days INTEGER NOT NULL DEFAULT 30,
        notify_email TEXT,
        is_completed BOOLEAN NOT NULL DEFAULT 0,
        completed_at TEXT,
        reminder_sent BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contract_kpis (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        contract_id INTEGER NOT NULL REFERENCES contracts(id) ON DELETE CASCADE,
        kpi_type_id INTEGER NOT NULL REFERENCES kpi_types(id),
        target_value REAL NOT NULL,
        current_value REAL NOT NULL DEFAULT 0,
        due_date TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS kpi_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        contract_kpi_id INTEGER NOT NULL REFERENCES contract_kpis(id) ON DELETE CASCADE,
        previous_value REAL NOT NULL,
        new_value REAL NOT NULL,
        changed_at TEXT NOT NULL,
        changed_by TEXT,
        note TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS revenue_plan_entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        contract_id INTEGER NOT NULL REFERENCES contracts(id) ON DELETE CASCADE,
        label TEXT NOT NULL,
        year2024 REAL NOT NULL DEFAULT 0,
        year2025 REAL NOT NULL DEFAULT 0,
        year2026 REAL NOT NULL DEFAULT 0,
        year2027 REAL NOT NULL DEFAULT 0,
        year2028 REAL NOT NULL DEFAULT 0,
        year2029 REAL NOT NULL DEFAULT 0,
        sort_order INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS report_duties (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        contract_id INTEGER NOT NULL REFERENCES contracts(id) ON DELETE CASCADE,
        report_type TEXT NOT NULL,
        year2024 TEXT,
        year2025 TEXT,
        year2026 TEXT,
        year2027 TEXT,
        year2028 TEXT,
        year2029 TEXT,
        remarks TEXT,
        sort_order INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS proof_of_use_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        contract_id INTEGER NOT NULL REFERENCES contracts(id) ON DELETE CASCADE,
        sequence_number INTEGER NOT NULL,
        due_date TEXT NOT NULL,
        proof_type TEXT NOT NULL,
        auditor_required BOOLEAN NOT NULL DEFAULT 0,
        sort_order INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS checklist_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        contract_id INTEGER NOT NULL REFERENCES contracts(id) ON DELETE CASCADE,
        category TEXT NOT NULL,
        label TEXT NOT NULL,
        assignee TEXT,
        remark TEXT,
        is_completed BOOLEAN NOT NULL DEFAULT 0,
        completed_at TEXT,
        sort_order INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contract_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        contract_id INTEGER NOT NULL REFERENCES contracts(id) ON DELETE CASCADE,
        changed_by_id INTEGER NOT NULL REFERENCES users(id),
        field_name TEXT NOT NULL,
        field_label TEXT NOT NULL,
        old_value TEXT,
        new_value TEXT,
        change_type TEXT NOT NULL,
        changed_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notification_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        contract_id INTEGER NOT NULL REFERENCES contracts(id) ON DELETE CASCADE,
        type TEXT NOT NULL,
        recipient TEXT NOT NULL,
        success BOOLEAN NOT NULL,
        sent_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_contract_history_contract ON contract_history(contract_id, changed_at)",
    "CREATE INDEX IF NOT EXISTS idx_deadlines_contract ON deadlines(contract_id)",
    "CREATE INDEX IF NOT EXISTS idx_contracts_created_by ON contracts(created_by_id)",
];

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    for sql in SCHEMA {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            sql.to_string(),
        ))
        .await?;
    }

    tracing::debug!("Schema ready ({} statements)", SCHEMA.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_is_idempotent() {
        let db = init_db("sqlite::memory:").await.unwrap();
        run_migrations(&db).await.unwrap();
    }
}
