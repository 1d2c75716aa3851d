//! Student record.
//!
//! # Invariants
//! - `email` is the unique lookup and login key.
//! - `password` only ever holds a salted one-way hash (PHC or bcrypt string).
//! - `percentage` is always a finite number once loaded; older documents
//!   may carry it as a numeric string.

use super::id::RecordId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Persisted student entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    /// Password hash, never plaintext.
    pub password: String,
    #[serde(default, deserialize_with = "deserialize_percentage")]
    pub percentage: f64,
}

impl Student {
    /// Projects the fields that may leave the core.
    pub fn profile(&self) -> StudentProfile {
        StudentProfile {
            name: self.name.clone(),
            percentage: self.percentage,
        }
    }
}

/// Public student view returned by login and session checks.
///
/// Carries neither the identifier nor the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub name: String,
    pub percentage: f64,
}

/// Reads a percentage sent as a number or a numeric string.
///
/// Anything else (null, blank, non-numeric, non-finite) reads as 0.
pub fn deserialize_percentage<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_percentage(&Value::deserialize(deserializer)?))
}

/// Optional variant of [`deserialize_percentage`] for request bodies.
pub fn deserialize_optional_percentage<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok((!value.is_null()).then(|| lenient_percentage(&value)))
}

fn lenient_percentage(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|p| p.is_finite()).unwrap_or(0.0)
}
