use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a single change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

impl ChangeKind {
    /// CREATE when nothing was there before, DELETE when nothing is left,
    /// UPDATE otherwise.
    pub fn from_presence(old_present: bool, new_present: bool) -> Self {
        if !old_present {
            ChangeKind::Create
        } else if !new_present {
            ChangeKind::Delete
        } else {
            ChangeKind::Update
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Create => "CREATE",
            ChangeKind::Update => "UPDATE",
            ChangeKind::Delete => "DELETE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATE" => Some(ChangeKind::Create),
            "UPDATE" => Some(ChangeKind::Update),
            "DELETE" => Some(ChangeKind::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who changed which contract, and when.
///
/// All records produced for one update share the same context so the batch
/// carries a single timestamp.
#[derive(Debug, Clone, Copy)]
pub struct HistoryContext {
    pub contract_id: i32,
    pub actor_id: i32,
    pub at: DateTime<Utc>,
}

impl HistoryContext {
    pub fn new(contract_id: i32, actor_id: i32, at: DateTime<Utc>) -> Self {
        Self {
            contract_id,
            actor_id,
            at,
        }
    }

    pub fn now(contract_id: i32, actor_id: i32) -> Self {
        Self::new(contract_id, actor_id, Utc::now())
    }
}

/// One detected change, ready to be appended to the audit trail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub contract_id: i32,
    pub changed_by_id: i32,
    pub field_name: String,
    pub field_label: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub change_kind: ChangeKind,
    pub changed_at: DateTime<Utc>,
}

impl ChangeRecord {
    /// The change kind is always derived from which side is present.
    pub fn new(
        ctx: &HistoryContext,
        field_name: impl Into<String>,
        field_label: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        let change_kind = ChangeKind::from_presence(old_value.is_some(), new_value.is_some());
        Self {
            contract_id: ctx.contract_id,
            changed_by_id: ctx.actor_id,
            field_name: field_name.into(),
            field_label: field_label.into(),
            old_value,
            new_value,
            change_kind,
            changed_at: ctx.at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_presence() {
        assert_eq!(ChangeKind::from_presence(false, true), ChangeKind::Create);
        assert_eq!(ChangeKind::from_presence(true, false), ChangeKind::Delete);
        assert_eq!(ChangeKind::from_presence(true, true), ChangeKind::Update);
    }

    #[test]
    fn kind_round_trips_through_storage_name() {
        for kind in [ChangeKind::Create, ChangeKind::Update, ChangeKind::Delete] {
            assert_eq!(ChangeKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ChangeKind::parse("RENAME"), None);
    }
}
