//! Runtime layer for the sensor monitor.
//!
//! Runs the ingestion pipeline across many files concurrently on tokio.

pub mod batch_runner;

pub use sensor_core as core;
pub use sensor_data as data;
