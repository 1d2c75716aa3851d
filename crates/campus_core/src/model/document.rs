//! The single persisted document.

use super::college::College;
use super::id::RecordId;
use super::student::Student;
use serde::{Deserialize, Serialize};

/// Whole-state document: every student and every college.
///
/// Both collections are always serialized, even when empty. A stored
/// document lacking one of them reads back as empty for that collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub colleges: Vec<College>,
}

impl Document {
    pub fn find_student_by_email(&self, email: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.email == email)
    }

    pub fn find_college(&self, id: &str) -> Option<&College> {
        self.colleges.iter().find(|college| college.id.matches(id))
    }

    pub fn find_college_mut(&mut self, id: &str) -> Option<&mut College> {
        self.colleges.iter_mut().find(|college| college.id.matches(id))
    }

    pub fn college_position(&self, id: &str) -> Option<usize> {
        self.colleges.iter().position(|college| college.id.matches(id))
    }

    /// Checks identifier uniqueness inside both collections.
    ///
    /// Returns the first duplicated id when the invariant is broken.
    pub fn duplicate_id(&self) -> Option<&RecordId> {
        first_duplicate(self.students.iter().map(|student| &student.id))
            .or_else(|| first_duplicate(self.colleges.iter().map(|college| &college.id)))
    }
}

fn first_duplicate<'a>(ids: impl Iterator<Item = &'a RecordId>) -> Option<&'a RecordId> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().find(|id| !seen.insert(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::Document;
    use crate::model::college::College;

    #[test]
    fn empty_document_serializes_both_collections() {
        let json = serde_json::to_value(Document::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "students": [], "colleges": [] }));
    }

    #[test]
    fn missing_collection_reads_as_empty() {
        let document: Document = serde_json::from_str(r#"{ "students": [] }"#).unwrap();
        assert!(document.colleges.is_empty());
    }

    #[test]
    fn duplicate_id_detects_repeated_college_ids() {
        let mut document = Document::default();
        let college = College::new("MIT", "");
        document.colleges.push(college.clone());
        assert!(document.duplicate_id().is_none());

        document.colleges.push(college);
        assert!(document.duplicate_id().is_some());
    }
}
