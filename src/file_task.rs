//! src/file_task.rs
use crate::aggregator::Aggregator;
use crate::attribute::AttributeSelector;
use crate::error::{ParseError, UnknownAttribute};
use crate::input::RecordSource;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum FileOutcome {
    /// Every record of the file was counted.
    Success { records: usize },
    /// The file was abandoned at its first bad record. Records counted before
    /// the failure stay counted.
    RecordError(ParseError),
    /// The selector cannot be extracted from any record; the run must stop.
    FatalAttributeError(UnknownAttribute),
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Success { .. })
    }
}

/// The unit of work handed to a worker: one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    path: PathBuf,
}

impl FileTask {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    #[tracing::instrument(name = "Process file", skip_all, fields(file = %self.path.display()))]
    pub fn run<S: RecordSource>(
        &self,
        source: &S,
        selector: &AttributeSelector,
        aggregator: &Aggregator,
    ) -> FileOutcome {
        let records = match source.open(&self.path) {
            Ok(records) => records,
            Err(e) => return FileOutcome::RecordError(e),
        };

        let mut processed = 0;
        for record in records {
            let record = match record {
                Ok(record) => record,
                Err(e) => return FileOutcome::RecordError(e),
            };
            let values = match selector.extract(&record) {
                Ok(values) => values,
                Err(e) => return FileOutcome::FatalAttributeError(e),
            };
            for value in &values {
                aggregator.increment(value);
            }
            processed += 1;
        }
        FileOutcome::Success { records: processed }
    }
}
