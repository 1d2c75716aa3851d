//! Embedded SQLite backend keyed by document position.

use super::{RecordStore, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use crate::model::document::Document;
use crate::model::id::RecordId;
use log::error;
use parking_lot::Mutex;
use rusqlite::{params, Connection, Transaction};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Stores one row per student and per college.
///
/// The load/save contract is unchanged from the file backend: `save`
/// replaces both tables inside one transaction, and `position` keeps the
/// document order stable across round-trips. Rows are keyed by
/// `position`, so repeated ids survive exactly as the file backend keeps them.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    write_lock: Mutex<()>,
}

impl SqliteStore {
    /// Opens (or creates) the record database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            write_lock: Mutex::new(()),
        }
    }
}

impl RecordStore for SqliteStore {
    fn load(&self) -> StoreResult<Document> {
        let conn = self.conn.lock();
        Ok(Document {
            students: read_table(&conn, "students")?,
            colleges: read_table(&conn, "colleges")?,
        })
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        let mut conn = self.conn.lock();
        let result = (|| -> StoreResult<()> {
            let tx = conn.transaction()?;
            replace_table(&tx, "students", document.students.iter().map(|s| (&s.id, s)))?;
            replace_table(&tx, "colleges", document.colleges.iter().map(|c| (&c.id, c)))?;
            tx.commit()?;
            Ok(())
        })();

        if let Err(err) = &result {
            error!("event=store_save module=store status=error backend=sqlite error={err}");
        }
        result
    }

    fn write_lock(&self) -> &Mutex<()> {
        &self.write_lock
    }
}

fn read_table<T: DeserializeOwned>(conn: &Connection, table: &'static str) -> StoreResult<Vec<T>> {
    let mut stmt = conn.prepare(&format!("SELECT id, body FROM {table} ORDER BY position ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut items = Vec::new();

    while let Some(row) = rows.next()? {
        let id: String = row.get(0)?;
        let body: String = row.get(1)?;
        let item = serde_json::from_str(&body).map_err(|err| {
            StoreError::InvalidData(format!("invalid body for `{id}` in {table}.body: {err}"))
        })?;
        items.push(item);
    }

    Ok(items)
}

fn replace_table<'a, T: Serialize + 'a>(
    tx: &Transaction<'_>,
    table: &'static str,
    items: impl Iterator<Item = (&'a RecordId, &'a T)>,
) -> StoreResult<()> {
    tx.execute(&format!("DELETE FROM {table};"), [])?;
    let mut stmt = tx.prepare(&format!(
        "INSERT INTO {table} (id, position, body) VALUES (?1, ?2, ?3);"
    ))?;

    for (position, (id, item)) in items.enumerate() {
        let body = serde_json::to_string(item)?;
        stmt.execute(params![id.to_string(), position as i64, body])?;
    }

    Ok(())
}
