//! Relation-list diff.
//!
//! Child collections of a contract are replaced wholesale on update, so row
//! ids do not survive. Each item is reduced to a human-readable description
//! and the two description lists are compared by membership.
//!
//! Two distinct items with the same description are indistinguishable here:
//! editing one of them may show up as nothing, or as a remove plus an add.

use chrono::{DateTime, Utc};

use super::record::{ChangeRecord, HistoryContext};
use super::value::{parse_loose_date, truncate_raw};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Deadlines,
    Kpis,
    RevenuePlan,
    ReportDuties,
    ProofOfUseItems,
    ChecklistItems,
}

impl RelationKind {
    pub const ALL: [RelationKind; 6] = [
        RelationKind::Deadlines,
        RelationKind::Kpis,
        RelationKind::RevenuePlan,
        RelationKind::ReportDuties,
        RelationKind::ProofOfUseItems,
        RelationKind::ChecklistItems,
    ];

    /// Field name used for this relation in the audit trail
    pub fn field_name(self) -> &'static str {
        match self {
            RelationKind::Deadlines => "deadlines",
            RelationKind::Kpis => "kpis",
            RelationKind::RevenuePlan => "revenue_plan",
            RelationKind::ReportDuties => "report_duties",
            RelationKind::ProofOfUseItems => "proof_of_use_items",
            RelationKind::ChecklistItems => "checklist_items",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RelationKind::Deadlines => "Frist",
            RelationKind::Kpis => "Kennzahl",
            RelationKind::RevenuePlan => "Umsatzplanung",
            RelationKind::ReportDuties => "Berichtspflicht",
            RelationKind::ProofOfUseItems => "Verwendungsnachweis",
            RelationKind::ChecklistItems => "Checklist-Item",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.field_name() == name)
    }
}

/// Reduces a relation item to the string compared by [`diff_relation`]
pub trait Describe {
    const KIND: RelationKind;

    fn describe(&self) -> String;
}

/// A date as it may arrive from storage or from a form
#[derive(Debug, Clone, PartialEq)]
pub enum LooseDate {
    Native(DateTime<Utc>),
    Raw(String),
}

impl From<DateTime<Utc>> for LooseDate {
    fn from(value: DateTime<Utc>) -> Self {
        LooseDate::Native(value)
    }
}

impl From<&str> for LooseDate {
    fn from(value: &str) -> Self {
        LooseDate::Raw(value.to_owned())
    }
}

/// `dd.mm.yyyy`, or the (truncated) raw input when it is not a date
pub fn format_loose_date(value: Option<&LooseDate>) -> String {
    match value {
        None => "Kein Datum".to_owned(),
        Some(LooseDate::Native(dt)) => dt.format("%d.%m.%Y").to_string(),
        Some(LooseDate::Raw(raw)) if raw.trim().is_empty() => "Kein Datum".to_owned(),
        Some(LooseDate::Raw(raw)) => match parse_loose_date(raw) {
            Some(date) => date.format("%d.%m.%Y").to_string(),
            None => truncate_raw(raw),
        },
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeadlineItem {
    pub custom_label: Option<String>,
    pub deadline_type: String,
    pub due_date: Option<LooseDate>,
}

impl Describe for DeadlineItem {
    const KIND: RelationKind = RelationKind::Deadlines;

    fn describe(&self) -> String {
        let label = match non_empty(&self.custom_label) {
            Some(label) => label.to_owned(),
            None if self.deadline_type.is_empty() => "Unbekannt".to_owned(),
            None => self.deadline_type.clone(),
        };
        format!("{} ({})", label, format_loose_date(self.due_date.as_ref()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiItem {
    pub kpi_type_name: Option<String>,
    pub target_value: Option<f64>,
}

impl Describe for KpiItem {
    const KIND: RelationKind = RelationKind::Kpis;

    fn describe(&self) -> String {
        format!(
            "{} (Ziel: {})",
            non_empty(&self.kpi_type_name).unwrap_or("Unbekannt"),
            self.target_value.unwrap_or(0.0)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevenuePlanItem {
    pub label: Option<String>,
}

impl Describe for RevenuePlanItem {
    const KIND: RelationKind = RelationKind::RevenuePlan;

    fn describe(&self) -> String {
        non_empty(&self.label).unwrap_or("Unbenannt").to_owned()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDutyItem {
    pub report_type: Option<String>,
}

impl Describe for ReportDutyItem {
    const KIND: RelationKind = RelationKind::ReportDuties;

    fn describe(&self) -> String {
        non_empty(&self.report_type).unwrap_or("Unbenannt").to_owned()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProofOfUseEntry {
    pub sequence_number: Option<i32>,
    pub proof_type: Option<String>,
}

impl Describe for ProofOfUseEntry {
    const KIND: RelationKind = RelationKind::ProofOfUseItems;

    fn describe(&self) -> String {
        let seq = self
            .sequence_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_owned());
        format!(
            "#{}: {}",
            seq,
            non_empty(&self.proof_type).unwrap_or("Unbekannt")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistEntry {
    pub label: Option<String>,
}

impl Describe for ChecklistEntry {
    const KIND: RelationKind = RelationKind::ChecklistItems;

    fn describe(&self) -> String {
        non_empty(&self.label).unwrap_or("Unbenannt").to_owned()
    }
}

fn entries(count: usize) -> Option<String> {
    (count > 0).then(|| format!("{} Einträge", count))
}

/// Diff two versions of a child collection.
///
/// Removed descriptions come first, then added ones. When membership is
/// unchanged but the item count differs (duplicates added or dropped), a
/// single summary record compares the counts instead.
pub fn diff_relation<T: Describe>(ctx: &HistoryContext, old: &[T], new: &[T]) -> Vec<ChangeRecord> {
    let kind = T::KIND;
    let label = kind.label();
    let old_desc: Vec<String> = old.iter().map(Describe::describe).collect();
    let new_desc: Vec<String> = new.iter().map(Describe::describe).collect();

    let mut records = Vec::new();

    for desc in old_desc.iter().filter(|d| !new_desc.contains(*d)) {
        records.push(ChangeRecord::new(
            ctx,
            kind.field_name(),
            format!("{} entfernt", label),
            Some(desc.clone()),
            None,
        ));
    }

    for desc in new_desc.iter().filter(|d| !old_desc.contains(*d)) {
        records.push(ChangeRecord::new(
            ctx,
            kind.field_name(),
            format!("{} hinzugefügt", label),
            None,
            Some(desc.clone()),
        ));
    }

    if records.is_empty() && old.len() != new.len() {
        let suffix = if old.is_empty() {
            "hinzugefügt"
        } else if new.is_empty() {
            "entfernt"
        } else {
            "geändert"
        };
        records.push(ChangeRecord::new(
            ctx,
            kind.field_name(),
            format!("{} {}", label, suffix),
            entries(old.len()),
            entries(new.len()),
        ));
    }

    records
}
