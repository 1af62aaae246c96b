//! src/error.rs
use std::path::PathBuf;

pub fn error_chain_fmt(
    f: &mut std::fmt::Formatter<'_>,
    e: &impl std::error::Error,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

/// Raised when the configured attribute is not one the extractor knows.
///
/// This is a configuration error rather than a data error, so it aborts the
/// whole run instead of a single file.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown attribute: {0}")]
pub struct UnknownAttribute(pub String);

/// Failures while reading one input file.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Failed to read input file")]
    Io(#[from] std::io::Error),
    #[error("JSON must start with array")]
    NotAnArray,
    #[error("Malformed JSON array: {0}")]
    Syntax(String),
    #[error("Failed to deserialize element #{index}")]
    Deserialize {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(thiserror::Error)]
pub enum StatisticsError {
    #[error("Directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("No input files found to process")]
    NoInputFiles,
    #[error("Worker pool size must be greater than 0")]
    InvalidPoolSize,
    #[error("Statistics run aborted")]
    Aborted(#[from] UnknownAttribute),
    #[error("Worker {0} terminated unexpectedly")]
    WorkerLost(usize),
    #[error("I/O failure")]
    Io(#[from] std::io::Error),
    #[error("Failed to write statistics report")]
    ReportWrite(#[source] anyhow::Error),
}

impl std::fmt::Debug for StatisticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(f, self)
    }
}
