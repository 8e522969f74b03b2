//! Collects the change records of one contract update and persists them as a
//! single batch on whatever connection the caller holds.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait};

use super::diff::{ReferenceNames, diff_fields};
use super::record::{ChangeRecord, HistoryContext};
use super::relations::{Describe, diff_relation};
use super::value::Snapshot;
use crate::models::contract_history;

#[derive(Debug)]
pub struct HistoryRecorder {
    ctx: HistoryContext,
    records: Vec<ChangeRecord>,
}

impl HistoryRecorder {
    pub fn new(ctx: HistoryContext) -> Self {
        Self {
            ctx,
            records: Vec::new(),
        }
    }

    pub fn context(&self) -> &HistoryContext {
        &self.ctx
    }

    /// Append the scalar diff of two snapshots
    pub fn fields(&mut self, old: &Snapshot, new: &Snapshot, names: &ReferenceNames) -> &mut Self {
        let records = diff_fields(&self.ctx, old, new, names);
        self.records.extend(records);
        self
    }

    /// Append the diff of one child collection
    pub fn relation<T: Describe>(&mut self, old: &[T], new: &[T]) -> &mut Self {
        let records = diff_relation(&self.ctx, old, new);
        self.records.extend(records);
        self
    }

    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<ChangeRecord> {
        self.records
    }

    /// Insert all collected records in one statement. Returns how many were
    /// written. Pass the open transaction so a failure here aborts the
    /// contract update as well.
    pub async fn flush<C: ConnectionTrait>(self, conn: &C) -> Result<usize, DbErr> {
        persist(conn, self.records).await
    }
}

/// Batch-insert change records; an empty batch touches nothing.
pub async fn persist<C: ConnectionTrait>(conn: &C, records: Vec<ChangeRecord>) -> Result<usize, DbErr> {
    if records.is_empty() {
        return Ok(0);
    }

    let count = records.len();
    let rows = records.into_iter().map(contract_history::ActiveModel::from);
    contract_history::Entity::insert_many(rows).exec(conn).await?;

    tracing::debug!("Recorded {} history entries", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::relations::DeadlineItem;
    use crate::history::record::ChangeKind;
    use chrono::{TimeZone, Utc};

    #[test]
    fn scalar_records_precede_relation_records() {
        let ctx = HistoryContext::new(4, 2, Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap());
        let mut recorder = HistoryRecorder::new(ctx);

        let old = Snapshot::new().with("title", "Büroräume").with("status", "ACTIVE");
        let new = Snapshot::new()
            .with("title", "Büroräume Nord")
            .with("status", "ACTIVE");
        let added = DeadlineItem {
            custom_label: Some("Kündigungsfrist".into()),
            deadline_type: "KUENDIGUNG".into(),
            due_date: Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap().into()),
        };

        recorder
            .fields(&old, &new, &ReferenceNames::new())
            .relation::<DeadlineItem>(&[], &[added]);

        let records = recorder.into_records();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].field_name, "title");
        assert_eq!(records[0].change_kind, ChangeKind::Update);
        assert_eq!(records[0].old_value.as_deref(), Some("Büroräume"));
        assert_eq!(records[0].new_value.as_deref(), Some("Büroräume Nord"));

        assert_eq!(records[1].field_name, "deadlines");
        assert_eq!(records[1].change_kind, ChangeKind::Create);
        assert_eq!(
            records[1].new_value.as_deref(),
            Some("Kündigungsfrist (01.03.2025)")
        );
    }

    #[test]
    fn nothing_changed_leaves_recorder_empty() {
        let mut recorder = HistoryRecorder::new(HistoryContext::now(1, 1));
        let snapshot = Snapshot::new().with("title", "A");
        recorder
            .fields(&snapshot, &snapshot, &ReferenceNames::new())
            .relation::<DeadlineItem>(&[], &[]);
        assert!(recorder.is_empty());
    }
}
