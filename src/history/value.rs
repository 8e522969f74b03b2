//! Typed field values, snapshots and their stored string form.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use super::fields::{FieldKind, kind_for};

/// A single field value as seen by the change detector
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Date(DateTime<Utc>),
    Json(serde_json::Value),
}

impl fmt::Display for FieldValue {
    /// Stored form: dates as RFC 3339 with milliseconds, JSON compact,
    /// everything else in its plain string form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Date(d) => f.write_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            FieldValue::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Date(value)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        FieldValue::Json(value)
    }
}

/// State of an entity at one point in time, keyed by field name.
///
/// A field can be absent, present with `None` (null), or present with a value.
/// Absent and null are treated alike by the change detector except that a
/// field absent from both snapshots is skipped entirely.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    fields: HashMap<String, Option<FieldValue>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<V: Into<FieldValue>>(mut self, name: &str, value: V) -> Self {
        self.fields.insert(name.to_owned(), Some(value.into()));
        self
    }

    pub fn with_opt<V: Into<FieldValue>>(mut self, name: &str, value: Option<V>) -> Self {
        self.fields.insert(name.to_owned(), value.map(Into::into));
        self
    }

    pub fn with_null(mut self, name: &str) -> Self {
        self.fields.insert(name.to_owned(), None);
        self
    }

    pub fn set(&mut self, name: &str, value: Option<FieldValue>) {
        self.fields.insert(name.to_owned(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Value of `name`, `None` when absent or null
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Type-aware equality: null equals null, dates compare by millisecond,
/// everything else by strict value without coercion between kinds.
pub fn values_equal(old: Option<&FieldValue>, new: Option<&FieldValue>) -> bool {
    match (old, new) {
        (None, None) => true,
        (None, Some(_)) | (Some(_), None) => false,
        (Some(FieldValue::Date(a)), Some(FieldValue::Date(b))) => {
            a.timestamp_millis() == b.timestamp_millis()
        }
        (Some(a), Some(b)) => a == b,
    }
}

pub fn serialize_value(value: Option<&FieldValue>) -> Option<String> {
    value.map(ToString::to_string)
}

/// Rebuild a typed value from its stored string form.
///
/// Never fails: anything that does not decode as the declared kind comes
/// back as text (dates additionally truncated, see [`truncate_raw`]).
pub fn deserialize_value(raw: Option<&str>, field_name: &str) -> Option<FieldValue> {
    let raw = raw?;

    match kind_for(field_name) {
        Some(FieldKind::Date) => Some(
            parse_date_input(raw)
                .map(FieldValue::Date)
                .unwrap_or_else(|| FieldValue::Text(truncate_raw(raw))),
        ),
        Some(FieldKind::Bool) => Some(FieldValue::Bool(raw == "true")),
        Some(FieldKind::Integer) | Some(FieldKind::Days) => Some(parse_number(raw, true)),
        Some(FieldKind::Number) | Some(FieldKind::Currency) => Some(parse_number(raw, false)),
        Some(FieldKind::Text) | Some(FieldKind::Reference) => Some(FieldValue::Text(raw.to_owned())),
        None => decode_json(raw),
    }
}

fn parse_number(raw: &str, prefer_integer: bool) -> FieldValue {
    let trimmed = raw.trim();
    if prefer_integer && let Ok(n) = trimmed.parse::<i64>() {
        return FieldValue::Integer(n);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => FieldValue::Number(n),
        _ => FieldValue::Text(raw.to_owned()),
    }
}

fn decode_json(raw: &str) -> Option<FieldValue> {
    use serde_json::Value;

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Null) => None,
        Ok(Value::String(s)) => Some(FieldValue::Text(s)),
        Ok(Value::Bool(b)) => Some(FieldValue::Bool(b)),
        Ok(Value::Number(n)) => Some(match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => FieldValue::Number(n.as_f64().unwrap_or_default()),
        }),
        Ok(other) => Some(FieldValue::Json(other)),
        Err(_) => Some(FieldValue::Text(raw.to_owned())),
    }
}

/// Parse a date as supplied by clients or stored in history.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD` (optionally followed by a time
/// part) and German `DD.MM.YYYY` / `DD/MM/YYYY` / `DD-MM-YY`. Date-only input
/// is taken as midnight UTC.
pub fn parse_date_input(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_loose_date(trimmed).and_then(|d| d.and_hms_opt(0, 0, 0)).map(|d| d.and_utc())
}

/// Calendar date from an ISO prefix or a German day-first string.
pub fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    if has_iso_date_prefix(trimmed) {
        return NaiveDate::parse_from_str(&trimmed[..10], "%Y-%m-%d").ok();
    }

    let normalized = trimmed.replace(['/', '-'], ".");
    let parts: Vec<&str> = normalized.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let year: i32 = match parts[2].len() {
        2 => 2000 + parts[2].parse::<i32>().ok()?,
        4 => parts[2].parse().ok()?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn has_iso_date_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
}

/// Cap a raw string at 20 characters, marking the cut with "..."
pub fn truncate_raw(raw: &str) -> String {
    const MAX_CHARS: usize = 20;

    if raw.chars().count() > MAX_CHARS {
        let head: String = raw.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        raw.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn null_and_absent_are_equal() {
        assert!(values_equal(None, None));
        assert!(!values_equal(None, Some(&FieldValue::from("x"))));
        assert!(!values_equal(Some(&FieldValue::from("x")), None));
    }

    #[test]
    fn dates_compare_by_instant() {
        let parsed = parse_date_input("2024-01-01").unwrap();
        let built = midnight(2024, 1, 1);
        assert!(values_equal(
            Some(&FieldValue::Date(parsed)),
            Some(&FieldValue::Date(built))
        ));

        let from_rfc = parse_date_input("2024-01-01T01:00:00+01:00").unwrap();
        assert!(values_equal(
            Some(&FieldValue::Date(from_rfc)),
            Some(&FieldValue::Date(built))
        ));
    }

    #[test]
    fn no_coercion_between_kinds() {
        assert!(!values_equal(
            Some(&FieldValue::Integer(30)),
            Some(&FieldValue::Text("30".into()))
        ));
        assert!(!values_equal(
            Some(&FieldValue::Integer(1)),
            Some(&FieldValue::Number(1.0))
        ));
        assert!(!values_equal(
            Some(&FieldValue::Bool(true)),
            Some(&FieldValue::Text("true".into()))
        ));
    }

    #[test]
    fn serializes_dates_like_iso_timestamps() {
        let value = FieldValue::Date(midnight(2025, 3, 1));
        assert_eq!(
            serialize_value(Some(&value)).as_deref(),
            Some("2025-03-01T00:00:00.000Z")
        );
    }

    #[test]
    fn serializes_scalars_in_plain_form() {
        assert_eq!(FieldValue::Number(1500.0).to_string(), "1500");
        assert_eq!(FieldValue::Number(285.5).to_string(), "285.5");
        assert_eq!(FieldValue::Bool(false).to_string(), "false");
        assert_eq!(
            FieldValue::Json(serde_json::json!({"a": 1})).to_string(),
            r#"{"a":1}"#
        );
        assert_eq!(serialize_value(None), None);
    }

    #[test]
    fn deserializes_by_declared_kind() {
        assert_eq!(
            deserialize_value(Some("2025-03-01T00:00:00.000Z"), "end_date"),
            Some(FieldValue::Date(midnight(2025, 3, 1)))
        );
        assert_eq!(
            deserialize_value(Some("true"), "auto_renewal"),
            Some(FieldValue::Bool(true))
        );
        assert_eq!(
            deserialize_value(Some("30"), "reminder_days"),
            Some(FieldValue::Integer(30))
        );
        assert_eq!(
            deserialize_value(Some("1500.5"), "revenue_net"),
            Some(FieldValue::Number(1500.5))
        );
        // "123" stays text for a text field, no JSON number sneaks in
        assert_eq!(
            deserialize_value(Some("123"), "cost_center"),
            Some(FieldValue::Text("123".into()))
        );
        assert_eq!(deserialize_value(None, "title"), None);
    }

    #[test]
    fn malformed_date_degrades_to_raw_text() {
        assert_eq!(
            deserialize_value(Some("not-a-date"), "start_date"),
            Some(FieldValue::Text("not-a-date".into()))
        );
        assert_eq!(
            deserialize_value(Some("definitely not a valid date"), "start_date"),
            Some(FieldValue::Text("definitely not a val...".into()))
        );
    }

    #[test]
    fn malformed_number_degrades_to_raw_text() {
        assert_eq!(
            deserialize_value(Some("viel"), "value"),
            Some(FieldValue::Text("viel".into()))
        );
    }

    #[test]
    fn unknown_fields_try_json_first() {
        assert_eq!(
            deserialize_value(Some(r#"{"x":1}"#), "extra"),
            Some(FieldValue::Json(serde_json::json!({"x": 1})))
        );
        assert_eq!(
            deserialize_value(Some("42"), "extra"),
            Some(FieldValue::Integer(42))
        );
        assert_eq!(
            deserialize_value(Some("plain words"), "extra"),
            Some(FieldValue::Text("plain words".into()))
        );
    }

    #[test]
    fn parses_german_and_iso_dates() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert_eq!(parse_loose_date("2025-03-01"), expected);
        assert_eq!(parse_loose_date("2025-03-01T12:00:00"), expected);
        assert_eq!(parse_loose_date("01.03.2025"), expected);
        assert_eq!(parse_loose_date("1/3/2025"), expected);
        assert_eq!(parse_loose_date("01.03.25"), expected);
        assert_eq!(parse_loose_date("31.02.2025"), None);
        assert_eq!(parse_loose_date("soon"), None);
    }

    #[test]
    fn truncation_is_char_aware() {
        assert_eq!(truncate_raw("kurz"), "kurz");
        let long = "ä".repeat(25);
        assert_eq!(truncate_raw(&long), format!("{}...", "ä".repeat(20)));
    }

    #[test]
    fn snapshot_tracks_presence_separately_from_null() {
        let snapshot = Snapshot::new().with("title", "A").with_null("notes");
        assert!(snapshot.contains("notes"));
        assert_eq!(snapshot.get("notes"), None);
        assert!(!snapshot.contains("partner"));
        assert_eq!(snapshot.len(), 2);
    }
}
