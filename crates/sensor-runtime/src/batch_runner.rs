//! Concurrent batch runner.
//!
//! Processes tables on a bounded pool of blocking tasks, fans the outcomes in
//! over an `mpsc` channel and aggregates once every table has reported. No
//! state is shared between workers; the collector is owned by the receiving
//! side alone.

use std::sync::Arc;

use sensor_core::error::{IngestError, Result};
use sensor_core::models::ThresholdConfig;
use sensor_data::engine::{process_table, BatchCollector, BatchResult, TableOutput};
use sensor_data::table::SensorTable;
use tokio::sync::{mpsc, Semaphore};

/// Outcome of one table, tagged with its position in the input.
struct FileOutcome {
    index: usize,
    file_source: String,
    outcome: Result<TableOutput>,
}

// ── BatchRunner ───────────────────────────────────────────────────────────────

/// Runs the ingestion pipeline with up to `workers` tables in flight.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    workers: usize,
}

impl BatchRunner {
    /// Create a runner. A worker count of zero is treated as one.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Process `tables` concurrently and aggregate the combined result.
    ///
    /// The result is identical to [`sensor_data::engine::run`] on the same
    /// input: outcomes are restored to input order before collection.
    pub async fn run(&self, tables: Vec<SensorTable>, thresholds: ThresholdConfig) -> BatchResult {
        let total = tables.len();
        if total == 0 {
            return BatchCollector::new().finish();
        }

        let permits = Arc::new(Semaphore::new(self.workers.min(total)));
        let (tx, mut rx) = mpsc::channel::<FileOutcome>(total);

        for (index, table) in tables.into_iter().enumerate() {
            let tx = tx.clone();
            let permits = Arc::clone(&permits);

            tokio::spawn(async move {
                // Only fails on a closed semaphore; this one is never closed.
                let _permit = permits.acquire_owned().await.ok();
                let file_source = table.file_source.clone();

                let outcome =
                    match tokio::task::spawn_blocking(move || process_table(&table, &thresholds))
                        .await
                    {
                        Ok(outcome) => outcome,
                        Err(e) => Err(IngestError::malformed(format!("worker failed: {}", e))),
                    };

                if tx
                    .send(FileOutcome {
                        index,
                        file_source,
                        outcome,
                    })
                    .await
                    .is_err()
                {
                    tracing::debug!("batch receiver dropped; discarding outcome {}", index);
                }
            });
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }
        outcomes.sort_by_key(|o| o.index);

        tracing::debug!(
            "collected {} of {} table outcomes with {} workers",
            outcomes.len(),
            total,
            self.workers
        );

        let mut collector = BatchCollector::new();
        for o in outcomes {
            collector.push(&o.file_source, o.outcome);
        }
        collector.finish()
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
