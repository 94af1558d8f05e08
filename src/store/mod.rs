// src/store/mod.rs

pub mod source;

use once_cell::sync::OnceCell;
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Instant,
};
use tracing::{error, info};

pub use source::{source_for_path, CsvSource, JsonSource, MemorySource, RowSource};

use crate::error::LoadError;
use crate::mapper::FieldMapper;
use crate::record::RecordSet;

/// Loads the dataset on first use and hands out the same immutable
/// [`RecordSet`] afterwards.
///
/// The first caller performs the read while concurrent callers block on the
/// same cell. Whatever that single attempt produced, records or a
/// [`LoadError`], is what every later caller receives.
pub struct RecordStore {
    source: Box<dyn RowSource>,
    mapper: FieldMapper,
    cell: OnceCell<Result<Arc<RecordSet>, LoadError>>,
    /// Physical reads performed; never exceeds 1.
    loads: AtomicUsize,
}

impl RecordStore {
    pub fn new(source: impl RowSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(source: Box<dyn RowSource>) -> Self {
        Self {
            source,
            mapper: FieldMapper::new(),
            cell: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Store backed by a file, CSV or JSON depending on its extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::from_boxed(source_for_path(path))
    }

    pub fn load(&self) -> Result<Arc<RecordSet>, LoadError> {
        self.cell.get_or_init(|| self.load_once()).clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    #[tracing::instrument(level = "info", skip(self), fields(source = %self.source.describe()))]
    fn load_once(&self) -> Result<Arc<RecordSet>, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let start = Instant::now();

        let rows = self.source.read_rows().map_err(|e| {
            error!("dataset load failed: {}", e);
            e
        })?;
        let records = rows.iter().map(|row| self.mapper.map(row)).collect();
        let set = RecordSet::new(records);

        info!(rows = set.len(), elapsed = ?start.elapsed(), "dataset loaded");
        Ok(Arc::new(set))
    }
}
