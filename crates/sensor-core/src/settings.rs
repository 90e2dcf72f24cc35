use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::models::ThresholdConfig;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Ingest temperature and strain sensor exports and report alerts and daily means
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sensor-monitor",
    about = "Ingest temperature and strain sensor exports and report alerts and daily means",
    version
)]
pub struct Settings {
    /// CSV files or directories to scan recursively
    #[arg(value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Temperature alert threshold (°C)
    #[arg(long, default_value = "50.0")]
    pub temp_threshold: f64,

    /// Strain alert threshold
    #[arg(long, default_value = "5000.0")]
    pub strain_threshold: f64,

    /// Maximum number of readings included in the report (0 = no cap)
    #[arg(long, default_value = "1000")]
    pub max_readings: usize,

    /// Number of files processed concurrently (defaults to available cores)
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub workers: Option<usize>,

    /// Write the JSON report to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved thresholds
    #[arg(long)]
    pub clear: bool,
}

// ── PersistError ───────────────────────────────────────────────────────────────

/// A failed update of the saved thresholds file. Never fatal to a run.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to clear {path}: {source}")]
    Clear {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save thresholds to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ── SavedThresholds ────────────────────────────────────────────────────────────

/// Last-used thresholds saved to `~/.sensor-monitor/thresholds.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct SavedThresholds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strain_threshold: Option<f64>,
}

impl SavedThresholds {
    /// Return the default path to the saved thresholds file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".sensor-monitor").join("thresholds.json")
    }

    /// Load saved thresholds from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write thresholds to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl From<&Settings> for SavedThresholds {
    fn from(s: &Settings) -> Self {
        SavedThresholds {
            temperature_threshold: Some(s.temp_threshold),
            strain_threshold: Some(s.strain_threshold),
        }
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, fill thresholds not given on the command line from
    /// the saved file, and save the resolved thresholds for the next run.
    ///
    /// Runs before logging is installed, so a failed save or clear is handed
    /// back to the caller instead of being logged here.
    pub fn load_with_saved() -> (Self, Option<PersistError>) {
        Self::load_with_saved_impl(std::env::args_os().collect(), &SavedThresholds::config_path())
    }

    /// Same as [`Settings::load_with_saved`] with explicit arguments and config
    /// path so tests can redirect to a temporary directory.
    pub fn load_with_saved_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> (Self, Option<PersistError>) {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        if settings.clear {
            let failure = SavedThresholds::clear_at(config_path)
                .err()
                .map(|source| PersistError::Clear {
                    path: config_path.to_path_buf(),
                    source,
                });
            return (settings, failure);
        }

        let saved = SavedThresholds::load_from(config_path);

        // clap stores the arg id using the field name, not the flag spelling.
        if !is_arg_explicitly_set(&matches, "temp_threshold") {
            if let Some(v) = saved.temperature_threshold {
                settings.temp_threshold = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "strain_threshold") {
            if let Some(v) = saved.strain_threshold {
                settings.strain_threshold = v;
            }
        }

        let failure = SavedThresholds::from(&settings)
            .save_to(config_path)
            .err()
            .map(|source| PersistError::Save {
                path: config_path.to_path_buf(),
                source,
            });

        (settings, failure)
    }

    /// Threshold configuration handed to the engine.
    pub fn thresholds(&self) -> ThresholdConfig {
        ThresholdConfig::new(self.temp_threshold, self.strain_threshold)
    }

    /// Worker count, falling back to the machine's available parallelism.
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
