//! src/main.rs
use anyhow::Context;
use order_stats::configuration::get_configuration;
use order_stats::job::StatisticsJob;
use order_stats::telemetry::init_tracing;

fn main() -> anyhow::Result<()> {
    init_tracing("info")?;
    let configuration = get_configuration().context("Failed to read configuration.")?;

    let job = StatisticsJob::new(configuration);
    let summary = job.run()?;

    tracing::info!(
        job_id = %job.job_id(),
        "Statistics by '{}': {} files processed, {} failed, {} distinct values in {:?}",
        summary.attribute,
        summary.files_processed,
        summary.files_failed,
        summary.distinct_values,
        summary.elapsed
    );
    tracing::info!("Report written to {}", summary.output.display());
    Ok(())
}
