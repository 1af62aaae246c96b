//! src/worker_pool.rs
use crate::aggregator::Aggregator;
use crate::attribute::AttributeSelector;
use crate::error::{ParseError, StatisticsError, UnknownAttribute};
use crate::file_task::{FileOutcome, FileTask};
use crate::input::{JsonArraySource, RecordSource};
use crossbeam_channel::{Receiver, Sender};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Pool sizes above this still run, but are probably a typo.
pub const MAX_RECOMMENDED_POOL_SIZE: usize = 100;

pub const DEFAULT_POOL_SIZE: usize = 8;

/// Run-wide stop flag raised by the first fatal attribute error.
#[derive(Clone, Debug, Default)]
pub struct AbortSignal {
    flag: Arc<AtomicBool>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag. Returns `true` for the caller that raised it first.
    pub fn raise(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }

    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: ParseError,
}

#[derive(Debug)]
pub struct CompletedRun {
    pub statistics: Aggregator,
    pub processed: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

#[derive(Debug)]
pub struct AbortedRun {
    pub error: UnknownAttribute,
    /// Files that finished (successfully or not) before the pool stopped.
    pub finished: usize,
    /// Files that were never started because of the abort.
    pub skipped: Vec<PathBuf>,
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed(CompletedRun),
    Aborted(AbortedRun),
}

enum WorkerEvent {
    Finished { path: PathBuf, outcome: FileOutcome },
    Skipped(PathBuf),
}

struct Worker<'run, S> {
    id: usize,
    tasks: Receiver<FileTask>,
    events: Sender<WorkerEvent>,
    abort: AbortSignal,
    source: &'run S,
    selector: &'run AttributeSelector,
    aggregator: &'run Aggregator,
    span: tracing::Span,
}

impl<S: RecordSource> Worker<'_, S> {
    fn run(self) {
        let _entered = self.span.enter();
        while let Ok(task) = self.tasks.recv() {
            if self.abort.is_raised() {
                tracing::debug!(worker = self.id, "skipping {} after abort", task.path().display());
                if self.events.send(WorkerEvent::Skipped(task.into_path())).is_err() {
                    tracing::error!(worker = self.id, "Outcome channel closed");
                    return;
                }
                continue;
            }

            let outcome = task.run(self.source, self.selector, self.aggregator);
            match &outcome {
                FileOutcome::Success { records } => tracing::info!(
                    worker = self.id,
                    "Processed by '{}': {} ({} records)",
                    self.selector,
                    task.path().display(),
                    records
                ),
                FileOutcome::RecordError(e) => tracing::error!(
                    worker = self.id,
                    error.cause_chain = ?e,
                    "Error processing file {}: {}",
                    task.path().display(),
                    e
                ),
                FileOutcome::FatalAttributeError(e) => {
                    if self.abort.raise() {
                        tracing::error!(worker = self.id, "{e}; stopping the worker pool");
                    }
                }
            }
            let event = WorkerEvent::Finished {
                path: task.into_path(),
                outcome,
            };
            if self.events.send(event).is_err() {
                tracing::error!(worker = self.id, "Outcome channel closed");
                return;
            }
        }
    }
}

/// Fixed-size pool of worker threads that count one attribute over many files.
///
/// Each call to [`WorkerPool::run`] spawns its own scoped threads, so the pool
/// holds no threads between runs.
#[derive(Debug, Clone)]
pub struct WorkerPool<S = JsonArraySource> {
    size: usize,
    source: S,
}

impl WorkerPool<JsonArraySource> {
    pub fn new(size: usize) -> Result<Self, StatisticsError> {
        Self::with_source(size, JsonArraySource)
    }
}

impl<S: RecordSource> WorkerPool<S> {
    pub fn with_source(size: usize, source: S) -> Result<Self, StatisticsError> {
        if size < 1 {
            return Err(StatisticsError::InvalidPoolSize);
        }
        if size > MAX_RECOMMENDED_POOL_SIZE {
            tracing::warn!(
                "Worker pool size {} is very large (recommended at most {})",
                size,
                MAX_RECOMMENDED_POOL_SIZE
            );
        }
        Ok(Self { size, source })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Counts `selector` over `files` and blocks until every started file is
    /// done.
    ///
    /// A file is handed to a worker only when that worker is idle. Once any
    /// file reports a fatal attribute error no further file is started, and
    /// the run resolves to [`RunOutcome::Aborted`].
    #[tracing::instrument(
        name = "Run worker pool",
        skip_all,
        fields(files = files.len(), workers = self.size, attribute = %selector)
    )]
    pub fn run(
        &self,
        files: Vec<PathBuf>,
        selector: &AttributeSelector,
    ) -> Result<RunOutcome, StatisticsError> {
        if files.is_empty() {
            return Err(StatisticsError::NoInputFiles);
        }

        let aggregator = Aggregator::new();
        let abort = AbortSignal::new();
        let worker_count = self.size.min(files.len());
        let (event_tx, event_rx) = crossbeam_channel::unbounded();

        let mut skipped = thread::scope(|scope| -> Result<Vec<PathBuf>, StatisticsError> {
            // Rendezvous channel: a send completes only when a worker is idle.
            let (task_tx, task_rx) = crossbeam_channel::bounded::<FileTask>(0);

            let mut handles = Vec::with_capacity(worker_count);
            for id in 0..worker_count {
                let worker = Worker {
                    id,
                    tasks: task_rx.clone(),
                    events: event_tx.clone(),
                    abort: abort.clone(),
                    source: &self.source,
                    selector,
                    aggregator: &aggregator,
                    span: tracing::Span::current(),
                };
                let handle = thread::Builder::new()
                    .name(format!("stats-worker-{id}"))
                    .spawn_scoped(scope, move || worker.run())?;
                handles.push(handle);
            }
            drop(task_rx);

            let mut skipped = vec![];
            let mut pending = files.into_iter();
            for path in pending.by_ref() {
                if abort.is_raised() {
                    skipped.push(path);
                    break;
                }
                if let Err(returned) = task_tx.send(FileTask::new(path)) {
                    skipped.push(returned.into_inner().into_path());
                    break;
                }
            }
            skipped.extend(pending);
            drop(task_tx);

            // Every handle is joined, otherwise the scope re-panics on the rest.
            let mut lost = None;
            for (id, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() {
                    tracing::error!("Worker {} panicked", id);
                    lost.get_or_insert(id);
                }
            }
            match lost {
                Some(id) => Err(StatisticsError::WorkerLost(id)),
                None => Ok(skipped),
            }
        })?;
        drop(event_tx);

        let mut processed = vec![];
        let mut failures = vec![];
        let mut fatal = None;
        let mut finished = 0;
        for event in event_rx.try_iter() {
            match event {
                WorkerEvent::Skipped(path) => skipped.push(path),
                WorkerEvent::Finished { path, outcome } => {
                    finished += 1;
                    match outcome {
                        FileOutcome::Success { .. } => processed.push(path),
                        FileOutcome::RecordError(error) => {
                            failures.push(FileFailure { path, error })
                        }
                        FileOutcome::FatalAttributeError(error) => {
                            fatal.get_or_insert(error);
                        }
                    }
                }
            }
        }

        if let Some(error) = fatal {
            if !skipped.is_empty() {
                tracing::warn!("{} files were not started because of the abort", skipped.len());
            }
            return Ok(RunOutcome::Aborted(AbortedRun {
                error,
                finished,
                skipped,
            }));
        }

        tracing::info!(
            "All files processed: {} succeeded, {} failed",
            processed.len(),
            failures.len()
        );
        Ok(RunOutcome::Completed(CompletedRun {
            statistics: aggregator,
            processed,
            failures,
        }))
    }
}
