//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section is optional; missing values fall back to defaults that
//! reproduce the lenient behaviour of the engine.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::engine::aggregator::SlotPolicy;
use crate::types::LedgerError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EngineConfig {
    /// What to do when two wagers of one group claim the same slot.
    #[serde(default)]
    pub slot_policy: SlotPolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Wager snapshot read when no path is given on the command line.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    /// Print per-counterparty statistics after the monthly table.
    #[serde(default)]
    pub show_counterparties: bool,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_snapshot_path() -> String {
    "wagers.json".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            snapshot_path: default_snapshot_path(),
            show_counterparties: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load the config file if it exists, otherwise use defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), LedgerError> {
        if self.report.snapshot_path.trim().is_empty() {
            return Err(LedgerError::Config("report.snapshot_path must not be empty".into()));
        }
        Ok(())
    }
}
