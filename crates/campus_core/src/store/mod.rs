//! Record Store: whole-document persistence.
//!
//! # Responsibility
//! - Load the single campus document, creating an empty one on first use.
//! - Overwrite the persisted document in full on every save.
//! - Serialize load-mutate-save cycles behind one write lock per store.
//!
//! # Invariants
//! - The persisted document always carries both `students` and `colleges`.
//! - `save` is last-writer-wins; there is no merge or delta log.
//! - Storage failures propagate to the caller, never recovered locally.

use crate::db::DbError;
use crate::model::document::Document;
use log::warn;
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod json_file;
mod sqlite;

pub use json_file::JsonFileStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure while reading or writing the persisted document.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "record storage I/O failed: {err}"),
            Self::Json(err) => write!(f, "record document is not valid JSON: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for the campus document.
pub trait RecordStore {
    /// Returns the current document, persisting an empty one if none exists.
    fn load(&self) -> StoreResult<Document>;

    /// Replaces the persisted document with `document`.
    fn save(&self, document: &Document) -> StoreResult<()>;

    /// Lock serializing every `update` cycle against this store.
    fn write_lock(&self) -> &Mutex<()>;

    /// Runs one load-mutate-save cycle under the store's write lock.
    ///
    /// The document is saved only when `mutate` returns `Ok`; an error
    /// leaves the persisted state untouched.
    fn update<T, E>(&self, mutate: impl FnOnce(&mut Document) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.write_lock().lock();
        let mut document = self.load()?;
        let value = mutate(&mut document)?;
        if let Some(id) = document.duplicate_id() {
            warn!("event=store_update module=store status=warn reason=duplicate_id id={id}");
        }
        self.save(&document)?;
        Ok(value)
    }
}

impl<S: RecordStore> RecordStore for &S {
    fn load(&self) -> StoreResult<Document> {
        (**self).load()
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        (**self).save(document)
    }

    fn write_lock(&self) -> &Mutex<()> {
        (**self).write_lock()
    }
}

impl<S: RecordStore> RecordStore for Arc<S> {
    fn load(&self) -> StoreResult<Document> {
        (**self).load()
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        (**self).save(document)
    }

    fn write_lock(&self) -> &Mutex<()> {
        (**self).write_lock()
    }
}

/// Backend chosen at runtime from configuration.
pub enum AnyStore {
    Json(JsonFileStore),
    Sqlite(SqliteStore),
}

impl RecordStore for AnyStore {
    fn load(&self) -> StoreResult<Document> {
        match self {
            Self::Json(store) => store.load(),
            Self::Sqlite(store) => store.load(),
        }
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        match self {
            Self::Json(store) => store.save(document),
            Self::Sqlite(store) => store.save(document),
        }
    }

    fn write_lock(&self) -> &Mutex<()> {
        match self {
            Self::Json(store) => store.write_lock(),
            Self::Sqlite(store) => store.write_lock(),
        }
    }
}
