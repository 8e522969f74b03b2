//! Scalar field diff over the tracked field table.

use std::collections::HashMap;

use super::fields::{FieldKind, TRACKED_FIELDS};
use super::record::{ChangeRecord, HistoryContext};
use super::value::{FieldValue, Snapshot, serialize_value, values_equal};

/// Display names for reference fields, keyed by field then raw identifier.
///
/// Used so the audit trail shows "Förderprojekt" instead of a bare type id.
#[derive(Debug, Clone, Default)]
pub struct ReferenceNames {
    tables: HashMap<String, HashMap<String, String>>,
}

impl ReferenceNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, id: impl ToString, name: impl Into<String>) {
        self.tables
            .entry(field.to_owned())
            .or_default()
            .insert(id.to_string(), name.into());
    }

    pub fn with_table<I, K, V>(mut self, field: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: ToString,
        V: Into<String>,
    {
        for (id, name) in entries {
            self.insert(field, id, name);
        }
        self
    }

    /// Replace a raw identifier by its display name; unknown ids stay raw.
    pub fn resolve(&self, field: &str, value: Option<&FieldValue>) -> Option<FieldValue> {
        let value = value?;
        let key = value.to_string();

        match self.tables.get(field).and_then(|t| t.get(&key)) {
            Some(name) => Some(FieldValue::Text(name.clone())),
            None => {
                tracing::debug!("No display name for {}={}, keeping raw id", field, key);
                Some(value.clone())
            }
        }
    }
}

/// Compare two snapshots over [`TRACKED_FIELDS`] and emit one record per
/// changed field, in table order. Fields outside the table are ignored.
pub fn diff_fields(
    ctx: &HistoryContext,
    old: &Snapshot,
    new: &Snapshot,
    names: &ReferenceNames,
) -> Vec<ChangeRecord> {
    let mut records = Vec::new();

    for field in TRACKED_FIELDS {
        if !old.contains(field.name) && !new.contains(field.name) {
            continue;
        }

        let old_value = old.get(field.name);
        let new_value = new.get(field.name);
        if values_equal(old_value, new_value) {
            continue;
        }

        let (old_display, new_display) = if field.kind == FieldKind::Reference {
            (
                names.resolve(field.name, old_value),
                names.resolve(field.name, new_value),
            )
        } else {
            (old_value.cloned(), new_value.cloned())
        };

        records.push(ChangeRecord::new(
            ctx,
            field.name,
            field.label,
            serialize_value(old_display.as_ref()),
            serialize_value(new_display.as_ref()),
        ));
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::record::ChangeKind;
    use chrono::{TimeZone, Utc};

    fn ctx() -> HistoryContext {
        HistoryContext::new(7, 3, Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap())
    }

    fn sample(i: usize) -> FieldValue {
        match TRACKED_FIELDS[i].kind {
            FieldKind::Text => FieldValue::Text(format!("text {}", i)),
            FieldKind::Integer | FieldKind::Days | FieldKind::Reference => {
                FieldValue::Integer(i as i64)
            }
            FieldKind::Number | FieldKind::Currency => FieldValue::Number(i as f64 + 0.5),
            FieldKind::Bool => FieldValue::Bool(i % 2 == 0),
            FieldKind::Date => FieldValue::Date(
                Utc.with_ymd_and_hms(2024, 1, 1 + i as u32 % 28, 0, 0, 0).unwrap(),
            ),
        }
    }

    fn changed(value: &FieldValue) -> FieldValue {
        match value {
            FieldValue::Text(s) => FieldValue::Text(format!("{} neu", s)),
            FieldValue::Integer(n) => FieldValue::Integer(n + 100),
            FieldValue::Number(n) => FieldValue::Number(n * 2.0),
            FieldValue::Bool(b) => FieldValue::Bool(!b),
            FieldValue::Date(d) => FieldValue::Date(*d + chrono::Duration::days(1)),
            FieldValue::Json(v) => FieldValue::Json(serde_json::json!([v])),
        }
    }

    fn full_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new();
        for (i, field) in TRACKED_FIELDS.iter().enumerate() {
            snapshot.set(field.name, Some(sample(i)));
        }
        snapshot
    }

    #[test]
    fn identical_snapshots_yield_nothing() {
        let snapshot = full_snapshot();
        let records = diff_fields(&ctx(), &snapshot, &snapshot.clone(), &ReferenceNames::new());
        assert!(records.is_empty());
    }

    #[test]
    fn every_field_is_detected_on_its_own() {
        let base = full_snapshot();
        for (i, field) in TRACKED_FIELDS.iter().enumerate() {
            let mut new = base.clone();
            new.set(field.name, Some(changed(&sample(i))));

            let records = diff_fields(&ctx(), &base, &new, &ReferenceNames::new());
            assert_eq!(records.len(), 1, "field {}", field.name);
            assert_eq!(records[0].field_name, field.name);
            assert_eq!(records[0].field_label, field.label);
            assert_eq!(records[0].change_kind, ChangeKind::Update);
        }
    }

    #[test]
    fn null_to_value_is_create_and_back_is_delete() {
        let empty = Snapshot::new().with_null("notes");
        let filled = Snapshot::new().with("notes", "x");

        let created = diff_fields(&ctx(), &empty, &filled, &ReferenceNames::new());
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].change_kind, ChangeKind::Create);
        assert_eq!(created[0].old_value, None);
        assert_eq!(created[0].new_value.as_deref(), Some("x"));

        let deleted = diff_fields(&ctx(), &filled, &empty, &ReferenceNames::new());
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].change_kind, ChangeKind::Delete);
        assert_eq!(deleted[0].old_value.as_deref(), Some("x"));
        assert_eq!(deleted[0].new_value, None);
    }

    #[test]
    fn absent_on_one_side_counts_as_null() {
        let old = Snapshot::new();
        let new = Snapshot::new().with("partner", "Stadt Köln");
        let records = diff_fields(&ctx(), &old, &new, &ReferenceNames::new());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].change_kind, ChangeKind::Create);
    }

    #[test]
    fn untracked_fields_are_ignored() {
        let old = Snapshot::new().with("contract_number", "VT-1");
        let new = Snapshot::new().with("contract_number", "VT-2");
        assert!(diff_fields(&ctx(), &old, &new, &ReferenceNames::new()).is_empty());
    }

    #[test]
    fn same_instant_dates_are_not_a_change() {
        let old = Snapshot::new().with(
            "start_date",
            crate::history::value::parse_date_input("2024-01-01").unwrap(),
        );
        let new = Snapshot::new().with("start_date", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert!(diff_fields(&ctx(), &old, &new, &ReferenceNames::new()).is_empty());
    }

    #[test]
    fn reference_ids_resolve_to_names() {
        let names = ReferenceNames::new().with_table("type_id", [(1, "Förderprojekt"), (2, "Dienstleistung")]);
        let old = Snapshot::new().with("type_id", 1);
        let new = Snapshot::new().with("type_id", 2);

        let records = diff_fields(&ctx(), &old, &new, &names);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].old_value.as_deref(), Some("Förderprojekt"));
        assert_eq!(records[0].new_value.as_deref(), Some("Dienstleistung"));
    }

    #[test]
    fn unknown_reference_falls_back_to_raw_id() {
        let names = ReferenceNames::new().with_table("type_id", [(1, "Förderprojekt")]);
        let old = Snapshot::new().with("type_id", 1);
        let new = Snapshot::new().with("type_id", 99);

        let records = diff_fields(&ctx(), &old, &new, &names);
        assert_eq!(records[0].old_value.as_deref(), Some("Förderprojekt"));
        assert_eq!(records[0].new_value.as_deref(), Some("99"));
    }

    #[test]
    fn records_follow_table_order_and_share_context() {
        let old = Snapshot::new().with("status", "ACTIVE").with("title", "A");
        let new = Snapshot::new().with("status", "TERMINATED").with("title", "B");

        let records = diff_fields(&ctx(), &old, &new, &ReferenceNames::new());
        let names: Vec<_> = records.iter().map(|r| r.field_name.as_str()).collect();
        assert_eq!(names, vec!["title", "status"]);
        assert!(records.iter().all(|r| r.contract_id == 7 && r.changed_by_id == 3));
        assert!(records.iter().all(|r| r.changed_at == ctx().at));
    }
}
