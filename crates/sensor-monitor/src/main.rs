mod bootstrap;
mod report;

use anyhow::{Context, Result};
use sensor_core::settings::Settings;
use sensor_data::reader;
use sensor_runtime::batch_runner::BatchRunner;

use crate::report::Report;

#[tokio::main]
async fn main() -> Result<()> {
    let (settings, persist_failure) = Settings::load_with_saved();

    bootstrap::setup_logging(&settings.log_level)?;

    if let Some(e) = persist_failure {
        tracing::warn!("{}", e);
    }

    tracing::info!("Sensor Monitor v{} starting", env!("CARGO_PKG_VERSION"));

    if settings.inputs.is_empty() {
        if settings.clear {
            tracing::info!("Saved thresholds cleared");
            return Ok(());
        }
        anyhow::bail!("No input paths given; pass CSV files or directories");
    }

    let thresholds = settings.thresholds();
    tracing::info!(
        "Thresholds: temperature {}, strain {}",
        thresholds.temperature_threshold,
        thresholds.strain_threshold
    );

    let paths = reader::discover_inputs(&settings.inputs);
    if paths.is_empty() {
        tracing::warn!("No CSV files found under the given inputs");
    }
    let (tables, load_errors) = reader::load_tables(&paths);

    let runner = BatchRunner::new(settings.effective_workers());
    tracing::debug!(
        "Processing {} tables with {} workers",
        tables.len(),
        runner.workers()
    );
    let mut result = runner.run(tables, thresholds).await;
    result.record_load_errors(load_errors);

    let report = Report::build(result, thresholds, settings.max_readings);
    let json = report.to_json(settings.pretty)?;

    match &settings.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("writing report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
