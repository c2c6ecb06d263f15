//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section and every field carries a default mirroring the
//! reference catalog constants, so a partial (or absent) file works.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub scoring: ScoringConfig,
    pub portfolio: PortfolioConfig,
    pub catalog: CatalogConfig,
    pub backtest: BacktestSection,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    /// Monte Carlo trials per asset.
    pub simulations: usize,
    /// Days per simulated path (the path holds this many prices).
    pub horizon_days: usize,
    /// How many ranked assets to return.
    pub top_n: usize,
    /// Watch-mode delay between analysis passes.
    pub analysis_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            simulations: 2000,
            horizon_days: 30,
            top_n: 10,
            analysis_interval_secs: 3600,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight profile name: "maximizer" or "predictor".
    pub profile: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            profile: "maximizer".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PortfolioConfig {
    /// Capital available to the position sizer, in USD.
    pub capital: f64,
    /// Hard cap per position, in USD.
    pub max_position_size: f64,
    /// Total order volume allowed per sizing pass, in USD.
    pub max_daily_volume: f64,
    /// Orders below this are dropped, in USD.
    pub min_trade_size: f64,
    /// Maximum number of simultaneous positions.
    pub max_positions: usize,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            capital: 1000.0,
            max_position_size: 100.0,
            max_daily_volume: 500.0,
            min_trade_size: 10.0,
            max_positions: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// Optional TOML catalog file; empty means the built-in table.
    pub path: String,
    /// Live quotes applied over catalog prices, keyed by asset name.
    pub price_overrides: HashMap<String, f64>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BacktestSection {
    /// Days of generated history per asset.
    pub days: usize,
    pub initial_capital: f64,
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for BacktestSection {
    fn default() -> Self {
        Self {
            days: 60,
            initial_capital: 10_000.0,
            short_window: 7,
            long_window: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    /// A malformed file is still an error.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            info!(path, "No config file found, using defaults");
            Ok(Self::default())
        }
    }
}
