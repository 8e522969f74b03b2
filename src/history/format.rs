//! German display formatting for history values (read path).

use super::fields::{FieldKind, kind_for};
use super::value::{FieldValue, deserialize_value};

pub const EMPTY_PLACEHOLDER: &str = "(leer)";

/// Render a typed value for display
pub fn format_value(value: Option<&FieldValue>, field_name: &str) -> String {
    let Some(value) = value else {
        return EMPTY_PLACEHOLDER.to_owned();
    };

    match (value, kind_for(field_name)) {
        (FieldValue::Bool(b), _) => (if *b { "Ja" } else { "Nein" }).to_owned(),
        (FieldValue::Date(d), _) => d.format("%d.%m.%Y").to_string(),
        (FieldValue::Number(n), Some(FieldKind::Currency)) => format_currency(*n),
        (FieldValue::Integer(n), Some(FieldKind::Currency)) => format_currency(*n as f64),
        (other, Some(FieldKind::Days)) => format!("{} Tage", other),
        (other, _) => other.to_string(),
    }
}

/// Decode a stored history value and render it
pub fn format_stored(raw: Option<&str>, field_name: &str) -> String {
    format_value(deserialize_value(raw, field_name).as_ref(), field_name)
}

/// `1.234,56 €` (de-DE, EUR)
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let euros = (cents / 100).to_string();
    let rest = cents % 100;

    let mut grouped = String::with_capacity(euros.len() + euros.len() / 3);
    for (i, ch) in euros.chars().enumerate() {
        if i > 0 && (euros.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{},{:02}\u{a0}€", sign, grouped, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn empty_values_get_placeholder() {
        assert_eq!(format_value(None, "notes"), "(leer)");
        assert_eq!(format_stored(None, "end_date"), "(leer)");
    }

    #[test]
    fn booleans_are_localized() {
        assert_eq!(format_stored(Some("true"), "auto_renewal"), "Ja");
        assert_eq!(format_stored(Some("false"), "proof_of_use_required"), "Nein");
    }

    #[test]
    fn dates_use_day_first_format() {
        let value = FieldValue::Date(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(format_value(Some(&value), "end_date"), "01.03.2025");
        assert_eq!(
            format_stored(Some("2025-03-01T00:00:00.000Z"), "end_date"),
            "01.03.2025"
        );
    }

    #[test]
    fn currency_fields_use_euro_format() {
        assert_eq!(format_stored(Some("1234.5"), "revenue_net"), "1.234,50\u{a0}€");
        assert_eq!(format_stored(Some("250000"), "value"), "250.000,00\u{a0}€");
    }

    #[test]
    fn day_counts_get_unit() {
        assert_eq!(format_stored(Some("30"), "notice_period_days"), "30 Tage");
        assert_eq!(format_stored(Some("14"), "reminder_days"), "14 Tage");
    }

    #[test]
    fn unparsable_values_fall_back_to_raw_text() {
        assert_eq!(format_stored(Some("not-a-date"), "start_date"), "not-a-date");
        assert_eq!(format_stored(Some("viel"), "revenue_net"), "viel");
    }

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(0.0), "0,00\u{a0}€");
        assert_eq!(format_currency(999.999), "1.000,00\u{a0}€");
        assert_eq!(format_currency(1234567.891), "1.234.567,89\u{a0}€");
        assert_eq!(format_currency(-42.1), "-42,10\u{a0}€");
    }
}
