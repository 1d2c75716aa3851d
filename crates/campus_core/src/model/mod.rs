//! Domain model for the campus record document.
//!
//! # Responsibility
//! - Define the persisted shapes for students, colleges and their nested
//!   staff/facility sequences.
//! - Keep the single-document layout (`students` + `colleges`) explicit.
//!
//! # Invariants
//! - Every student and college is identified by a `RecordId` unique within
//!   its collection.
//! - Staff entries and facilities have no identity of their own; they are
//!   addressed by position only.

pub mod college;
pub mod document;
pub mod id;
pub mod student;
