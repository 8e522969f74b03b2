//! Daily deadline check: reminder notifications and contract expiry

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde::Serialize;

use crate::domain::DomainError;
use crate::models::{contract, notification_log, user};
use crate::services::status::days_until;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Termination,
    Expiry,
}

/// What a notifier needs to tell a contract owner
#[derive(Debug, Clone, PartialEq)]
pub struct ContractReminder {
    pub recipient: String,
    pub title: String,
    pub contract_number: String,
    pub days_until: i64,
    pub kind: ReminderKind,
}

/// Delivery channel for deadline reminders
#[async_trait]
pub trait ReminderNotifier: Send + Sync {
    /// Returns `true` when the reminder was delivered
    async fn send(&self, reminder: &ContractReminder) -> bool;
}

/// Writes reminders to the log instead of mailing them
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl ReminderNotifier for LogNotifier {
    async fn send(&self, reminder: &ContractReminder) -> bool {
        let what = match reminder.kind {
            ReminderKind::Termination => "Kündigungsfrist",
            ReminderKind::Expiry => "Vertragsende",
        };
        tracing::info!(
            "Reminder to {}: {} for {} ({}) in {} days",
            reminder.recipient,
            what,
            reminder.contract_number,
            reminder.title,
            reminder.days_until
        );
        true
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReminderOutcome {
    pub contract_number: String,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeadlineCheckSummary {
    pub message: String,
    pub reminders: Vec<ReminderOutcome>,
    pub expired: u64,
}

/// Notify owners of active contracts whose termination date (or, failing
/// that, end date) falls within their reminder window, then mark contracts
/// past their end date as EXPIRED.
///
/// A contract is reminded at most once; `reminder_sent` is only set after a
/// successful delivery.
pub async fn check_deadlines(
    db: &DatabaseConnection,
    notifier: &dyn ReminderNotifier,
    today: NaiveDate,
) -> Result<DeadlineCheckSummary, DomainError> {
    let candidates = contract::Entity::find()
        .filter(contract::Column::Status.eq("ACTIVE"))
        .filter(contract::Column::ReminderSent.eq(false))
        .filter(
            Condition::any()
                .add(contract::Column::TerminationDate.is_not_null())
                .add(contract::Column::EndDate.is_not_null()),
        )
        .find_also_related(user::Entity)
        .all(db)
        .await?;

    let mut reminders = Vec::new();

    for (c, creator) in candidates {
        let (relevant, kind) = match (c.termination_date, c.end_date) {
            (Some(date), _) => (date, ReminderKind::Termination),
            (None, Some(date)) => (date, ReminderKind::Expiry),
            (None, None) => continue,
        };

        let days = days_until(relevant, today);
        if days < 0 || days > i64::from(c.reminder_days) {
            continue;
        }

        let Some(creator) = creator else {
            tracing::warn!("Contract {} has no creator to remind", c.contract_number);
            continue;
        };

        let reminder = ContractReminder {
            recipient: creator.email.clone(),
            title: c.title.clone(),
            contract_number: c.contract_number.clone(),
            days_until: days,
            kind,
        };
        let success = notifier.send(&reminder).await;

        if success {
            let txn = db.begin().await?;
            contract::ActiveModel {
                id: Unchanged(c.id),
                reminder_sent: Set(true),
                ..Default::default()
            }
            .update(&txn)
            .await?;
            notification_log::ActiveModel {
                contract_id: Set(c.id),
                notification_type: Set("REMINDER".to_owned()),
                recipient: Set(creator.email),
                success: Set(true),
                sent_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            txn.commit().await?;
        } else {
            tracing::warn!("Reminder for contract {} could not be delivered", c.contract_number);
        }

        reminders.push(ReminderOutcome {
            contract_number: c.contract_number,
            success,
        });
    }

    let expired = expire_contracts(db, today).await?;

    tracing::info!(
        "Deadline check done: {} reminders, {} contracts expired",
        reminders.len(),
        expired
    );

    Ok(DeadlineCheckSummary {
        message: format!("{} Erinnerungen verarbeitet", reminders.len()),
        reminders,
        expired,
    })
}

/// Set ACTIVE contracts whose end date lies before `today` to EXPIRED
pub async fn expire_contracts(db: &DatabaseConnection, today: NaiveDate) -> Result<u64, DbErr> {
    let Some(midnight) = today.and_hms_opt(0, 0, 0).map(|d| d.and_utc()) else {
        return Ok(0);
    };

    let result = contract::Entity::update_many()
        .col_expr(contract::Column::Status, Expr::value("EXPIRED"))
        .col_expr(contract::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(contract::Column::Status.eq("ACTIVE"))
        .filter(contract::Column::EndDate.lt(midnight))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::init_db;
    use crate::models::contract_type;
    use chrono::{DateTime, Duration};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<ContractReminder>>,
    }

    #[async_trait]
    impl ReminderNotifier for RecordingNotifier {
        async fn send(&self, reminder: &ContractReminder) -> bool {
            self.sent.lock().unwrap().push(reminder.clone());
            true
        }
    }

    fn at(day: NaiveDate) -> DateTime<Utc> {
        day.and_hms_opt(0, 0, 0).unwrap().and_utc()
    }

    async fn setup() -> (DatabaseConnection, i32, i32) {
        let db = init_db("sqlite::memory:").await.unwrap();
        let now = Utc::now();
        let owner = user::ActiveModel {
            email: Set("pl@example.org".into()),
            name: Set(None),
            password_hash: Set("x".into()),
            role: Set("PROJEKTLEITUNG".into()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        let kind = contract_type::ActiveModel {
            name: Set("Mietvertrag".into()),
            color: Set("#3b82f6".into()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        (db, owner.id, kind.id)
    }

    async fn contract_with(
        db: &DatabaseConnection,
        owner: i32,
        type_id: i32,
        number: &str,
        end_date: Option<DateTime<Utc>>,
        termination_date: Option<DateTime<Utc>>,
    ) -> contract::Model {
        let now = Utc::now();
        contract::ActiveModel {
            contract_number: Set(number.into()),
            title: Set("Büroräume".into()),
            partner: Set("Stadt Köln".into()),
            data_matches_contract: Set(true),
            type_id: Set(type_id),
            start_date: Set(now - Duration::days(400)),
            end_date: Set(end_date),
            termination_date: Set(termination_date),
            notice_period_days: Set(30),
            currency: Set("EUR".into()),
            status: Set("ACTIVE".into()),
            auto_renewal: Set(false),
            reports_linked_to_payment: Set(false),
            proof_of_use_required: Set(false),
            reminder_days: Set(30),
            reminder_sent: Set(false),
            created_by_id: Set(owner),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn reminds_once_inside_window() {
        let (db, owner, type_id) = setup().await;
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let due = at(today + Duration::days(10));
        let c = contract_with(&db, owner, type_id, "VT-1", None, Some(due)).await;

        let notifier = RecordingNotifier::default();
        let summary = check_deadlines(&db, &notifier, today).await.unwrap();

        assert_eq!(summary.reminders.len(), 1);
        assert!(summary.reminders[0].success);
        {
            let sent = notifier.sent.lock().unwrap();
            assert_eq!(sent[0].recipient, "pl@example.org");
            assert_eq!(sent[0].days_until, 10);
            assert_eq!(sent[0].kind, ReminderKind::Termination);
        }

        let stored = contract::Entity::find_by_id(c.id).one(&db).await.unwrap().unwrap();
        assert!(stored.reminder_sent);
        let logs = notification_log::Entity::find().all(&db).await.unwrap();
        assert_eq!(logs.len(), 1);

        let again = check_deadlines(&db, &notifier, today).await.unwrap();
        assert!(again.reminders.is_empty());
    }

    #[tokio::test]
    async fn outside_window_is_skipped() {
        let (db, owner, type_id) = setup().await;
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        contract_with(&db, owner, type_id, "VT-2", Some(at(today + Duration::days(90))), None).await;

        let notifier = RecordingNotifier::default();
        let summary = check_deadlines(&db, &notifier, today).await.unwrap();
        assert!(summary.reminders.is_empty());
        assert_eq!(summary.message, "0 Erinnerungen verarbeitet");
    }

    #[tokio::test]
    async fn past_end_date_expires_contract() {
        let (db, owner, type_id) = setup().await;
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let c = contract_with(&db, owner, type_id, "VT-3", Some(at(today - Duration::days(1))), None).await;

        let summary = check_deadlines(&db, &LogNotifier, today).await.unwrap();
        assert_eq!(summary.expired, 1);

        let stored = contract::Entity::find_by_id(c.id).one(&db).await.unwrap().unwrap();
        assert_eq!(stored.status, "EXPIRED");
    }
}
