// src/store/source.rs

use csv::{ReaderBuilder, Trim};
use serde_json::Value;
use std::{
    fmt,
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::mapper::RawRow;

/// Where the dataset comes from. Implementations read everything in one go
/// and return rows in source order.
pub trait RowSource: Send + Sync {
    /// Human-readable location, used in logs.
    fn describe(&self) -> String;

    fn read_rows(&self) -> Result<Vec<RawRow>, LoadError>;
}

/// Pick a reader from the file extension: `.json` is an array of objects,
/// anything else is CSV with a header row.
pub fn source_for_path(path: impl Into<PathBuf>) -> Box<dyn RowSource> {
    let path = path.into();
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        Box::new(JsonSource::new(path))
    } else {
        Box::new(CsvSource::new(path))
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })
}

/// Comma-separated file whose first line names the columns.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn malformed(&self, reason: impl fmt::Display) -> LoadError {
        LoadError::Malformed {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl RowSource for CsvSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_rows(&self) -> Result<Vec<RawRow>, LoadError> {
        let file = open(&self.path)?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // short rows just leave columns missing
            .trim(Trim::Headers)
            .from_reader(BufReader::new(file));

        let headers: Vec<String> = rdr
            .byte_headers()
            .map_err(|e| self.malformed(format!("reading header: {}", e)))?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(self.malformed("missing header row"));
        }
        debug!(columns = headers.len(), "parsed CSV header");

        let mut rows = Vec::new();
        for (idx, result) in rdr.byte_records().enumerate() {
            let record =
                result.map_err(|e| self.malformed(format!("record {}: {}", idx + 1, e)))?;
            if record.len() != headers.len() {
                warn!(
                    record = idx + 1,
                    expected = headers.len(),
                    found = record.len(),
                    "field count differs from header"
                );
            }
            let mut row = RawRow::new();
            for (name, cell) in headers.iter().zip(record.iter()) {
                row.insert_if_absent(
                    name.as_str(),
                    Value::String(String::from_utf8_lossy(cell).into_owned()),
                );
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

/// A JSON array of flat objects, one per row.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RowSource for JsonSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_rows(&self) -> Result<Vec<RawRow>, LoadError> {
        let file = open(&self.path)?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| LoadError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

/// Rows already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<RawRow>,
}

impl MemorySource {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }
}

impl RowSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} rows)", self.rows.len())
    }

    fn read_rows(&self) -> Result<Vec<RawRow>, LoadError> {
        Ok(self.rows.clone())
    }
}
