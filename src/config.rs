//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! tide-tables.toml file. It names the three input files, where the outputs
//! go, and optionally the year of the tables.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "tide-tables.toml";

/// Application configuration loaded from tide-tables.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Input file locations
    pub input: InputConfig,
    /// Output location and print layout
    pub output: OutputConfig,
    /// Table options
    #[serde(default)]
    pub table: TableConfig,
}

/// Input files of a run
#[derive(Debug, Deserialize, Serialize)]
pub struct InputConfig {
    /// Annual prediction listing (e.g. "HL25023.LIS")
    pub feed: PathBuf,
    /// Station names table
    pub stations: PathBuf,
    /// Mean-low-water and meridian table
    pub baselines: PathBuf,
}

/// Output configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory receiving the .txt and .prn files
    pub directory: PathBuf,
    /// Characters per line of a printed page; lines are centered on it
    pub page_columns: usize,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TableConfig {
    /// Year of the tables; asked interactively when absent
    pub year: Option<i32>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: InputConfig {
                feed: PathBuf::from("HL25023.LIS"),
                stations: PathBuf::from("ESTACIONES.txt"),
                baselines: PathBuf::from("NBMI.txt"),
            },
            output: OutputConfig {
                directory: PathBuf::from("."),
                page_columns: 85, // Courier 10.5 pt across an A4 text width
            },
            table: TableConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from tide-tables.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(feed = %config.input.feed.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(error = %e, "invalid config file format, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!("no config file found, using default configuration");
                Self::default()
            }
        }
    }

    /// Save current configuration to `path`
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}
