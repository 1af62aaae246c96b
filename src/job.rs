//! src/job.rs
use crate::attribute::AttributeSelector;
use crate::configuration::Settings;
use crate::error::{StatisticsError, UnknownAttribute};
use crate::input::list_files;
use crate::report::ReportBuilder;
use crate::worker_pool::{RunOutcome, WorkerPool};
use crate::writer::ReportWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// What a finished job produced.
#[derive(Debug, Clone)]
pub struct JobSummary {
    pub attribute: AttributeSelector,
    pub output: PathBuf,
    pub files_processed: usize,
    pub files_failed: usize,
    pub distinct_values: usize,
    pub elapsed: Duration,
}

/// One end-to-end statistics run: list inputs, count, write the report.
#[derive(Debug)]
pub struct StatisticsJob {
    job_id: Uuid,
    settings: Settings,
}

impl StatisticsJob {
    pub fn new(settings: Settings) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            settings,
        }
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    #[tracing::instrument(
        name = "Run statistics job",
        skip_all,
        fields(job_id = %self.job_id, attribute = %self.settings.job.attribute)
    )]
    pub fn run(&self) -> Result<JobSummary, StatisticsError> {
        let started = Instant::now();
        let Settings { input, output, job } = &self.settings;

        let files = list_files(&input.directory, &input.extension)?;
        if files.is_empty() {
            tracing::error!("No {} files found in {}", input.extension, input.directory.display());
            return Err(StatisticsError::NoInputFiles);
        }
        tracing::info!("Found {} files to process", files.len());

        if !job.attribute.is_known() {
            tracing::error!(
                "Unknown attribute '{}', none of {} files started. Available attributes: {}",
                job.attribute,
                files.len(),
                AttributeSelector::AVAILABLE.join(", ")
            );
            return Err(StatisticsError::Aborted(UnknownAttribute(
                job.attribute.name().to_string(),
            )));
        }

        let pool = WorkerPool::new(job.workers)?;
        let run = match pool.run(files, &job.attribute)? {
            RunOutcome::Completed(run) => run,
            RunOutcome::Aborted(aborted) => {
                for path in &aborted.skipped {
                    tracing::warn!("Skipped {}", path.display());
                }
                tracing::error!(
                    "{}. Available attributes: {}",
                    aborted.error,
                    AttributeSelector::AVAILABLE.join(", ")
                );
                return Err(StatisticsError::Aborted(aborted.error));
            }
        };

        let entries = ReportBuilder::build(&run.statistics);
        let writer = ReportWriter::new(&output.directory, output.format);
        let report = writer.write(job.attribute.name(), &entries)?;

        Ok(JobSummary {
            attribute: job.attribute.clone(),
            output: report,
            files_processed: run.processed.len(),
            files_failed: run.failures.len(),
            distinct_values: entries.len(),
            elapsed: started.elapsed(),
        })
    }
}
