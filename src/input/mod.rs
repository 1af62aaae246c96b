//! src/input/mod.rs
use crate::error::{ParseError, StatisticsError};
use crate::order::OrderRecord;
use std::path::{Path, PathBuf};

mod json_array;
pub use json_array::{JsonArrayRecords, JsonArraySource};

/// Opens one input file as a lazy, single-pass sequence of orders.
///
/// The returned iterator owns the file handle, so the file is closed as soon
/// as the iterator is dropped.
pub trait RecordSource: Sync {
    type Records: Iterator<Item = Result<OrderRecord, ParseError>>;

    fn open(&self, path: &Path) -> Result<Self::Records, ParseError>;
}

/// Lists the regular files in `directory` whose extension matches `extension`,
/// ignoring case. The result is sorted by path.
#[tracing::instrument(name = "List input files", skip_all, fields(directory = %directory.display()))]
pub fn list_files(directory: &Path, extension: &str) -> Result<Vec<PathBuf>, StatisticsError> {
    if !directory.exists() {
        return Err(StatisticsError::DirectoryNotFound(directory.to_path_buf()));
    }
    if !directory.is_dir() {
        return Err(StatisticsError::NotADirectory(directory.to_path_buf()));
    }

    let extension = extension.trim_start_matches('.');
    let mut files = vec![];
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    tracing::debug!("found {} input files", files.len());
    Ok(files)
}
