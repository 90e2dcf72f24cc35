//! Shared domain layer for the sensor monitor.
//!
//! Models, error taxonomy, column classification, cell parsing and CLI
//! settings used by every other crate in the workspace.

pub mod classifier;
pub mod data_processors;
pub mod error;
pub mod models;
pub mod settings;
