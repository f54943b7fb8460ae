pub mod table;

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;
use tokio::sync::Mutex;

pub use table::Table;

/// One submission flattened to `(column, cell)` pairs, in field order.
pub type Row = Vec<(String, String)>;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Csv(csv::Error),
    Corrupt(String),
    Task(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "I/O error: {err}"),
            StoreError::Csv(err) => write!(f, "CSV error: {err}"),
            StoreError::Corrupt(msg) => write!(f, "Corrupt row-store: {msg}"),
            StoreError::Task(msg) => write!(f, "Blocking task failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::Csv(err)
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Task(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendOutcome {
    pub rows: usize,
    pub columns: usize,
}

/// File-backed row-store. Every append rewrites the whole file; appends
/// within this process are serialised by `lock`, which stays held until the
/// blocking write finishes even if the caller's future is dropped.
pub struct RowStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl RowStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current table, append `row`, and write everything back.
    pub async fn append(&self, row: Row) -> Result<AppendOutcome, StoreError> {
        let guard = self.lock.clone().lock_owned().await;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            append_blocking(&path, row)
        })
        .await?
    }
}

fn append_blocking(path: &Path, row: Row) -> Result<AppendOutcome, StoreError> {
    let mut table = load(path)?;
    table.push_row(row);
    save(path, &table)?;

    Ok(AppendOutcome {
        rows: table.len(),
        columns: table.columns().len(),
    })
}

/// A missing file is an empty table.
pub fn load(path: &Path) -> Result<Table, StoreError> {
    match File::open(path) {
        Ok(file) => Table::read_from(BufReader::new(file)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Table::default()),
        Err(e) => Err(e.into()),
    }
}

/// Write to a uniquely named temp file beside `path`, then rename it over
/// `path`. The temp file is removed if anything fails before the rename.
pub fn save(path: &Path, table: &Table) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    table
        .write_to(BufWriter::new(tmp.as_file_mut()))?
        .into_inner()
        .map_err(|e| StoreError::Io(e.into_error()))?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}
