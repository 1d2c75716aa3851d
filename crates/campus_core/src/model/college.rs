//! College record with nested staff and facility sequences.
//!
//! # Invariants
//! - `staff` and `facilities` are owned by containment; deleting a college
//!   drops both.
//! - Removing a nested entry shifts every later index down by one.

use super::id::RecordId;
use serde::{Deserialize, Serialize};

/// One staff member nested inside a college.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
}

impl StaffEntry {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}

/// Persisted college entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct College {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub staff: Vec<StaffEntry>,
    #[serde(default)]
    pub facilities: Vec<String>,
}

impl College {
    /// Creates a college with a fresh id and empty nested sequences.
    pub fn new(name: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            id: RecordId::generate(),
            name: name.into(),
            info: info.into(),
            staff: Vec::new(),
            facilities: Vec::new(),
        }
    }

    /// Removes the staff entry at `index`, or returns `None` when out of bounds.
    pub fn remove_staff_at(&mut self, index: usize) -> Option<StaffEntry> {
        (index < self.staff.len()).then(|| self.staff.remove(index))
    }

    /// Removes the facility at `index`, or returns `None` when out of bounds.
    pub fn remove_facility_at(&mut self, index: usize) -> Option<String> {
        (index < self.facilities.len()).then(|| self.facilities.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::{College, StaffEntry};

    #[test]
    fn remove_staff_shifts_later_entries() {
        let mut college = College::new("MIT", "");
        for name in ["A", "B", "C"] {
            college.staff.push(StaffEntry::new(name, "role"));
        }

        assert_eq!(college.remove_staff_at(1).unwrap().name, "B");
        let names: Vec<_> = college.staff.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);

        assert_eq!(college.remove_staff_at(1).unwrap().name, "C");
        assert_eq!(college.staff.len(), 1);
        assert!(college.remove_staff_at(1).is_none());
    }

    #[test]
    fn remove_facility_rejects_out_of_bounds() {
        let mut college = College::new("MIT", "");
        assert!(college.remove_facility_at(0).is_none());
        college.facilities.push("Library".to_string());
        assert_eq!(college.remove_facility_at(0).as_deref(), Some("Library"));
    }
}
