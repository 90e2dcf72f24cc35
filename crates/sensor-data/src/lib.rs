//! Ingestion layer for the sensor monitor.
//!
//! Loads CSV exports into tables, reshapes them into long-form readings,
//! evaluates threshold alerts, builds daily aggregates and runs the batch
//! pipeline that ties these together.

pub mod aggregator;
pub mod alerts;
pub mod charts;
pub mod engine;
pub mod normalizer;
pub mod reader;
pub mod table;

pub use sensor_core as core;
