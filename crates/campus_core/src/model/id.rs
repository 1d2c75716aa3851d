//! Opaque record identifiers.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier for students and colleges.
///
/// New identifiers are time-ordered UUIDs rendered as strings. Documents
/// written by older deployments carry millisecond timestamps as bare JSON
/// numbers; those are kept as-is so a load/save cycle does not rewrite them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Legacy(u64),
}

impl RecordId {
    /// Generates a fresh time-derived identifier.
    pub fn generate() -> Self {
        Self::Text(Uuid::now_v7().to_string())
    }

    /// Compares against a caller-supplied identifier by string form.
    ///
    /// A legacy id `1700000000000` matches the string `"1700000000000"`.
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            Self::Text(value) => value == raw,
            Self::Legacy(value) => value.to_string() == raw,
        }
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Legacy(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
