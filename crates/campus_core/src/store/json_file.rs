//! Single-file JSON backend.

use super::{RecordStore, StoreResult};
use crate::model::document::Document;
use log::{debug, error, info};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Stores the whole document as pretty-printed JSON in one file.
///
/// # Invariants
/// - Every save rewrites the full file (written to a sibling temp file,
///   then renamed over the target).
/// - A missing file is created holding an empty document on first load.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self, document: &Document) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(document)?;
        let temp_path = temp_path_for(&self.path);
        fs::write(&temp_path, serialized)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> StoreResult<Document> {
        let started_at = Instant::now();
        if !self.path.exists() {
            let empty = Document::default();
            self.write_document(&empty).inspect_err(|err| {
                error!("event=store_init module=store status=error backend=json error={err}");
            })?;
            info!("event=store_init module=store status=ok backend=json");
            return Ok(empty);
        }

        let raw = fs::read_to_string(&self.path)?;
        let document: Document = serde_json::from_str(&raw).inspect_err(|err| {
            error!(
                "event=store_load module=store status=error backend=json error_code=invalid_json error={err}"
            );
        })?;
        debug!(
            "event=store_load module=store status=ok backend=json students={} colleges={} duration_ms={}",
            document.students.len(),
            document.colleges.len(),
            started_at.elapsed().as_millis()
        );
        Ok(document)
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.write_document(document) {
            Ok(()) => {
                debug!(
                    "event=store_save module=store status=ok backend=json duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!("event=store_save module=store status=error backend=json error={err}");
                Err(err)
            }
        }
    }

    fn write_lock(&self) -> &Mutex<()> {
        &self.write_lock
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
