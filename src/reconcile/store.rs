//! Persistence of the snapshot as a CSV file.

use super::snapshot::{SNAPSHOT_COLUMNS, Snapshot, SnapshotRow};
use crate::error::AppError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read/write access to the persisted snapshot
pub trait SnapshotStore {
    /// Loads the snapshot.
    ///
    /// # Returns
    /// * `Ok(None)` - Nothing has been persisted yet
    /// * `Ok(Some(snapshot))` - The persisted snapshot
    /// * `Err(AppError::SnapshotRead)` - Something is persisted but unreadable
    fn load(&self) -> Result<Option<Snapshot>, AppError>;

    /// Replaces the persisted snapshot with `snapshot`
    fn save(&self, snapshot: &Snapshot) -> Result<(), AppError>;
}

/// Snapshot stored as a CSV file with a header row
#[derive(Debug, Clone)]
pub struct CsvSnapshotStore {
    path: PathBuf,
}

impl CsvSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn read_error(&self, message: impl Into<String>) -> AppError {
        AppError::snapshot_read(self.display_path(), message)
    }

    fn write_error(&self, message: impl Into<String>) -> AppError {
        AppError::snapshot_write(self.display_path(), message)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_rows(&self, path: &Path, rows: &[SnapshotRow]) -> Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(SNAPSHOT_COLUMNS)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl SnapshotStore for CsvSnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, AppError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}", self.display_path());
                return Ok(None);
            }
            Err(e) => return Err(self.read_error(e.to_string())),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| self.read_error(e.to_string()))?
            .clone();
        let missing: Vec<&str> = SNAPSHOT_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(self.read_error(format!(
                "missing columns: {}",
                missing.join(", ")
            )));
        }

        let mut rows = Vec::new();
        for (i, record) in reader.deserialize::<SnapshotRow>().enumerate() {
            let row = record.map_err(|e| self.read_error(format!("row {}: {e}", i + 1)))?;
            rows.push(row);
        }

        let snapshot = Snapshot::from_rows(rows);
        info!(
            "Loaded snapshot with {} rows from {}",
            snapshot.len(),
            self.display_path()
        );
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e.to_string()))?;
        }

        // Write next to the target, then swap in
        let temp = self.temp_path();
        if let Err(e) = self.write_rows(&temp, snapshot.rows()) {
            let _ = fs::remove_file(&temp);
            return Err(self.write_error(e.to_string()));
        }
        fs::rename(&temp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            self.write_error(e.to_string())
        })?;

        info!(
            "Saved snapshot with {} rows to {}",
            snapshot.len(),
            self.display_path()
        );
        Ok(())
    }
}
