//! Row source for the match history CSV.

use crate::constants::input_columns;
use crate::error::AppError;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// One raw input record: named text fields, as read from the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

const REQUIRED_COLUMNS: [&str; 4] = [
    input_columns::MATCH_ID,
    input_columns::TIMESTAMP,
    input_columns::TIME_AGO,
    input_columns::PLAYERS,
];

/// Reads every row of the CSV at `path`, preserving file order.
///
/// Missing required columns are only warned about here; each affected row
/// then fails individually during normalization.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, AppError> {
    let file = std::fs::File::open(path)
        .map_err(|e| AppError::input_read(path.display().to_string(), e.to_string()))?;
    read_rows_from_reader(file)
        .map_err(|e| AppError::input_read(path.display().to_string(), e.to_string()))
}

/// Reads rows from any CSV reader. The first record is the header.
pub fn read_rows_from_reader<R: Read>(reader: R) -> Result<Vec<RawRow>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            warn!("Input is missing column '{}'; affected rows will be skipped", column);
        }
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row: RawRow = headers.iter().zip(record.iter()).collect();
        rows.push(row);
    }

    debug!("Read {} input rows", rows.len());
    Ok(rows)
}
