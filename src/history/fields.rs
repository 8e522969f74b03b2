//! Tracked contract fields and their declared value kinds.
//!
//! Every field that takes part in the audit trail is listed in
//! [`TRACKED_FIELDS`] together with its German display label and the kind of
//! value it holds. Stored history values are decoded by this declared kind;
//! the name-based heuristics in [`infer_kind`] only apply to field names that
//! are not (or no longer) part of the table.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::relations::RelationKind;

/// Declared type of a tracked field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Number,
    /// Monetary amount, displayed as EUR
    Currency,
    Bool,
    Date,
    /// Day count, displayed as "<n> Tage"
    Days,
    /// Foreign key into a lookup table with a separate display name
    Reference,
}

#[derive(Debug, Clone, Copy)]
pub struct TrackedField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind) -> TrackedField {
    TrackedField { name, label, kind }
}

pub const TRACKED_FIELDS: &[TrackedField] = &[
    // Stammdaten
    field("title", "Projektbezeichnung", FieldKind::Text),
    field("title_short", "Abkürzung", FieldKind::Text),
    field("partner", "Vertragspartner", FieldKind::Text),
    field("description", "Beschreibung", FieldKind::Text),
    field("esf_number", "ESF-Nummer", FieldKind::Text),
    field("client", "Auftraggeber", FieldKind::Text),
    field("project_lead", "Projektleitung", FieldKind::Text),
    field("company", "Gesellschaft", FieldKind::Text),
    field("cost_center", "Kostenstelle", FieldKind::Text),
    field("basis_document", "Grundlage", FieldKind::Text),
    field(
        "data_matches_contract",
        "Daten entsprechen Vertrag",
        FieldKind::Bool,
    ),
    field("type_id", "Vertragsart", FieldKind::Reference),
    field("start_date", "Startdatum", FieldKind::Date),
    field("end_date", "Enddatum", FieldKind::Date),
    field("termination_date", "Kündigungsdatum", FieldKind::Date),
    field("notice_period_days", "Kündigungsfrist (Tage)", FieldKind::Days),
    // Umsatzplanung & Finanzen
    field("revenue_net", "Umsatz Netto", FieldKind::Currency),
    field("revenue_tax", "MwSt (19%)", FieldKind::Currency),
    field("revenue_gross", "Umsatz Brutto", FieldKind::Currency),
    field("payment_method", "Zahlungsart", FieldKind::Text),
    field("value", "Vertragswert", FieldKind::Currency),
    field("currency", "Währung", FieldKind::Text),
    field("payment_interval", "Zahlungsintervall", FieldKind::Text),
    // Berichtspflichten
    field(
        "reports_linked_to_payment",
        "Berichtspflichten mit Auszahlung gekoppelt",
        FieldKind::Bool,
    ),
    field(
        "additional_obligations",
        "Weitere Pflichten",
        FieldKind::Text,
    ),
    field("refund_deadline", "Rückzahlungsfrist", FieldKind::Date),
    // Verwendungsnachweis
    field(
        "proof_of_use_required",
        "Verwendungsnachweis erforderlich",
        FieldKind::Bool,
    ),
    field(
        "proof_of_use_remarks",
        "Bemerkungen zum Verwendungsnachweis",
        FieldKind::Text,
    ),
    // Sonstige
    field("status", "Status", FieldKind::Text),
    field("auto_renewal", "Automatische Verlängerung", FieldKind::Bool),
    field("notes", "Notizen", FieldKind::Text),
    field("reminder_days", "Erinnerungsfrist (Tage)", FieldKind::Days),
];

static FIELD_INDEX: Lazy<HashMap<&'static str, &'static TrackedField>> =
    Lazy::new(|| TRACKED_FIELDS.iter().map(|f| (f.name, f)).collect());

/// Look up a tracked field by its machine name
pub fn tracked_field(name: &str) -> Option<&'static TrackedField> {
    FIELD_INDEX.get(name).copied()
}

/// Display label for a field, falling back to the raw name
pub fn field_label(name: &str) -> &str {
    tracked_field(name).map(|f| f.label).unwrap_or(name)
}

/// Value kind used to decode a stored value of `name`.
///
/// Returns `None` when nothing is known about the field; callers then try a
/// JSON decode and fall back to the raw text.
pub fn kind_for(name: &str) -> Option<FieldKind> {
    if let Some(field) = tracked_field(name) {
        return Some(field.kind);
    }
    if RelationKind::from_field_name(name).is_some() {
        return Some(FieldKind::Text);
    }
    infer_kind(name)
}

/// Naming conventions for fields that are not declared in the table.
pub fn infer_kind(name: &str) -> Option<FieldKind> {
    let lower = name.to_ascii_lowercase();

    if lower.contains("date") || lower.contains("deadline") {
        return Some(FieldKind::Date);
    }
    if lower.contains("required")
        || lower.contains("linked")
        || lower.contains("matches")
        || lower == "auto_renewal"
    {
        return Some(FieldKind::Bool);
    }
    if lower.ends_with("days") {
        return Some(FieldKind::Days);
    }
    if lower.contains("revenue") || lower == "value" {
        return Some(FieldKind::Currency);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_are_unique() {
        assert_eq!(FIELD_INDEX.len(), TRACKED_FIELDS.len());
    }

    #[test]
    fn label_falls_back_to_name() {
        assert_eq!(field_label("title"), "Projektbezeichnung");
        assert_eq!(field_label("legacy_field"), "legacy_field");
    }

    #[test]
    fn declared_kind_wins_over_name_pattern() {
        // "refund_deadline" would match the date convention anyway, but
        // "status" has no pattern and must still resolve as text.
        assert_eq!(kind_for("refund_deadline"), Some(FieldKind::Date));
        assert_eq!(kind_for("status"), Some(FieldKind::Text));
        assert_eq!(kind_for("type_id"), Some(FieldKind::Reference));
    }

    #[test]
    fn relation_fields_decode_as_text() {
        // "deadlines" contains "deadline" but holds item descriptions
        assert_eq!(kind_for("deadlines"), Some(FieldKind::Text));
    }

    #[test]
    fn unknown_fields_use_naming_conventions() {
        assert_eq!(kind_for("archived_date"), Some(FieldKind::Date));
        assert_eq!(kind_for("audit_required"), Some(FieldKind::Bool));
        assert_eq!(kind_for("grace_days"), Some(FieldKind::Days));
        assert_eq!(kind_for("revenue_extra"), Some(FieldKind::Currency));
        assert_eq!(kind_for("colour"), None);
    }
}
