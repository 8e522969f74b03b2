//! Contract change history.
//!
//! Detects which audited fields and child collections changed between two
//! versions of a contract, turns each change into a [`ChangeRecord`], and
//! renders stored records back into German display text.

pub mod diff;
pub mod fields;
pub mod format;
pub mod record;
pub mod recorder;
pub mod relations;
pub mod value;

pub use diff::{ReferenceNames, diff_fields};
pub use fields::{FieldKind, TRACKED_FIELDS, TrackedField, field_label, kind_for};
pub use format::{EMPTY_PLACEHOLDER, format_currency, format_stored, format_value};
pub use record::{ChangeKind, ChangeRecord, HistoryContext};
pub use recorder::{HistoryRecorder, persist};
pub use relations::{
    ChecklistEntry, DeadlineItem, Describe, KpiItem, LooseDate, ProofOfUseEntry, RelationKind,
    ReportDutyItem, RevenuePlanItem, diff_relation,
};
pub use value::{FieldValue, Snapshot, deserialize_value, serialize_value, values_equal};
