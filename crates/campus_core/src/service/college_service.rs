//! College directory use-case service.
//!
//! # Responsibility
//! - CRUD over colleges and their positional staff/facility sequences.
//!
//! # Invariants
//! - Every mutation is one locked load-mutate-save cycle.
//! - Nested entries are addressed by index; removal shifts later indices
//!   down by one and callers must re-read before removing again.

use super::{required, ServiceError, ServiceResult};
use crate::model::college::{College, StaffEntry};
use crate::store::RecordStore;
use log::info;

/// College directory service over a record store.
pub struct CollegeService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> CollegeService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists every college in document order.
    pub fn list(&self) -> ServiceResult<Vec<College>> {
        Ok(self.store.load()?.colleges)
    }

    /// Gets one college by identifier.
    pub fn get(&self, college_id: &str) -> ServiceResult<College> {
        self.store
            .load()?
            .find_college(college_id)
            .cloned()
            .ok_or_else(college_not_found)
    }

    /// Creates a college with empty staff and facilities.
    ///
    /// `info` defaults to an empty string.
    pub fn add_college(&self, name: Option<&str>, info: Option<&str>) -> ServiceResult<College> {
        let name = required(name).ok_or_else(|| ServiceError::missing("name"))?;
        let college = College::new(name, info.unwrap_or_default());

        let created = self.store.update(|document| -> ServiceResult<College> {
            document.colleges.push(college.clone());
            Ok(college)
        })?;
        info!("event=college_add module=college status=ok college_id={}", created.id);
        Ok(created)
    }

    /// Updates only the supplied fields. Empty strings are applied as given.
    pub fn edit_college(
        &self,
        college_id: &str,
        name: Option<&str>,
        info: Option<&str>,
    ) -> ServiceResult<College> {
        self.store.update(|document| -> ServiceResult<_> {
            let college = document
                .find_college_mut(college_id)
                .ok_or_else(college_not_found)?;
            if let Some(name) = name {
                college.name = name.to_string();
            }
            if let Some(info) = info {
                college.info = info.to_string();
            }
            Ok(college.clone())
        })
    }

    /// Removes a college together with its nested staff and facilities.
    pub fn delete_college(&self, college_id: &str) -> ServiceResult<College> {
        let removed = self.store.update(|document| -> ServiceResult<_> {
            let position = document
                .college_position(college_id)
                .ok_or_else(college_not_found)?;
            Ok(document.colleges.remove(position))
        })?;
        info!(
            "event=college_delete module=college status=ok college_id={} staff={} facilities={}",
            removed.id,
            removed.staff.len(),
            removed.facilities.len()
        );
        Ok(removed)
    }

    /// Appends a staff entry and returns its index.
    pub fn add_staff(&self, college_id: &str, entry: StaffEntry) -> ServiceResult<usize> {
        self.store.update(|document| -> ServiceResult<_> {
            let college = document
                .find_college_mut(college_id)
                .ok_or_else(college_not_found)?;
            college.staff.push(entry);
            Ok(college.staff.len() - 1)
        })
    }

    /// Removes the staff entry at `index`.
    ///
    /// # Errors
    /// - `NotFound` when the college is missing or `index` is out of bounds.
    pub fn remove_staff(&self, college_id: &str, index: usize) -> ServiceResult<StaffEntry> {
        self.store.update(|document| {
            document
                .find_college_mut(college_id)
                .and_then(|college| college.remove_staff_at(index))
                .ok_or_else(|| ServiceError::NotFound("staff".to_string()))
        })
    }

    /// Appends a facility and returns its index.
    pub fn add_facility(&self, college_id: &str, facility: &str) -> ServiceResult<usize> {
        self.store.update(|document| -> ServiceResult<_> {
            let college = document
                .find_college_mut(college_id)
                .ok_or_else(college_not_found)?;
            college.facilities.push(facility.to_string());
            Ok(college.facilities.len() - 1)
        })
    }

    /// Removes the facility at `index`.
    ///
    /// # Errors
    /// - `NotFound` when the college is missing or `index` is out of bounds.
    pub fn remove_facility(&self, college_id: &str, index: usize) -> ServiceResult<String> {
        self.store.update(|document| {
            document
                .find_college_mut(college_id)
                .and_then(|college| college.remove_facility_at(index))
                .ok_or_else(|| ServiceError::NotFound("facility".to_string()))
        })
    }
}

fn college_not_found() -> ServiceError {
    ServiceError::NotFound("college".to_string())
}
