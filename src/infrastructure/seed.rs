//! Demo users and lookup tables, enabled with SEED_DEMO

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use crate::infrastructure::auth::hash_password;
use crate::models::{Role, contract_type, kpi_type, user};

pub const DEMO_PASSWORD: &str = "demo123";

const DEMO_USERS: [(&str, &str, Role); 3] = [
    ("admin@example.com", "Admin User", Role::Admin),
    ("manager@example.com", "Manager User", Role::Manager),
    ("projektleitung@example.com", "Projekt Leiter", Role::Projektleitung),
];

const DEMO_CONTRACT_TYPES: [(&str, &str); 3] = [
    ("Mietvertrag", "#3b82f6"),
    ("Instrumentenvertrag", "#8b5cf6"),
    ("Leasing", "#f59e0b"),
];

// name, data_type, unit, description, color
const DEMO_KPI_TYPES: [(&str, &str, &str, &str, &str); 3] = [
    ("Bindung", "PERCENT", "%", "Bindungsquote der Mittel", "#22c55e"),
    ("Bewilligung", "PERCENT", "%", "Bewilligungsquote", "#3b82f6"),
    ("Zahlung", "CURRENCY", "€", "Erhaltene Zahlungen", "#f59e0b"),
];

/// Insert demo rows; existing rows (matched by unique name/email) are kept
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = Utc::now();
    let password_hash = hash_password(DEMO_PASSWORD).map_err(DbErr::Custom)?;

    for (email, name, role) in DEMO_USERS {
        let row = user::ActiveModel {
            email: Set(email.to_owned()),
            name: Set(Some(name.to_owned())),
            password_hash: Set(password_hash.clone()),
            role: Set(role.as_str().to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        user::Entity::insert(row)
            .on_conflict(OnConflict::column(user::Column::Email).do_nothing().to_owned())
            .exec_without_returning(db)
            .await?;
        tracing::info!("Demo user {} ({})", email, role.display_name());
    }

    for (name, color) in DEMO_CONTRACT_TYPES {
        let row = contract_type::ActiveModel {
            name: Set(name.to_owned()),
            color: Set(color.to_owned()),
            created_at: Set(now),
            ..Default::default()
        };
        contract_type::Entity::insert(row)
            .on_conflict(
                OnConflict::column(contract_type::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    for (name, data_type, unit, description, color) in DEMO_KPI_TYPES {
        let row = kpi_type::ActiveModel {
            name: Set(name.to_owned()),
            data_type: Set(data_type.to_owned()),
            unit: Set(Some(unit.to_owned())),
            description: Set(Some(description.to_owned())),
            color: Set(color.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        kpi_type::Entity::insert(row)
            .on_conflict(OnConflict::column(kpi_type::Column::Name).do_nothing().to_owned())
            .exec_without_returning(db)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::init_db;

    #[tokio::test]
    async fn seeding_twice_keeps_one_row_each() {
        let db = init_db("sqlite::memory:").await.unwrap();
        seed_demo_data(&db).await.unwrap();
        seed_demo_data(&db).await.unwrap();

        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 3);
        assert_eq!(contract_type::Entity::find().count(&db).await.unwrap(), 3);
        assert_eq!(kpi_type::Entity::find().count(&db).await.unwrap(), 3);
    }
}
