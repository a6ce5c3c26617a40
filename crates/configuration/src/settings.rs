use crate::error::ConfigError;
use chrono::NaiveDate;
use core_types::{DateRange, Ticker};
use serde::Deserialize;
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub comparator: ComparatorConfig,
    pub heatmap: HeatmapConfig,
}

/// Where the dashboard server listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

/// Settings for the upstream financial-data API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the Yahoo Finance chart API.
    pub base_url: String,
    /// Sent as the `User-Agent` header; the API rejects anonymous clients.
    pub user_agent: String,
    /// When set, prices are read from this JSON file instead of the API.
    pub fixtures: Option<PathBuf>,
}

/// Controls the console and (optional) rolling file log output.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
    #[serde(default = "default_log_file_prefix")]
    pub file_prefix: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

/// Parameters for the pairwise comparator (time-series) dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct ComparatorConfig {
    /// The ticker universe offered by both dropdowns.
    pub tickers: Vec<Ticker>,
    pub default_first: Ticker,
    pub default_second: Ticker,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Parameters for the rolling correlation heatmap dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct HeatmapConfig {
    /// The tickers of the heatmap, in the order the axes are drawn.
    pub tickers: Vec<Ticker>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Length of the rolling window in calendar days.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    /// Step between consecutive windows. Only shown in the title.
    #[serde(default = "default_step_days")]
    pub step_days: u32,
    /// Period of the animation tick while the cursor is playing.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_log_file_prefix() -> String {
    "stockscope.log".to_string()
}
fn default_window_days() -> u32 {
    30
}
fn default_step_days() -> u32 {
    1
}
fn default_tick_interval_ms() -> u64 {
    1000
}

// --- Default Implementations ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            user_agent: concat!("stockscope/", env!("CARGO_PKG_VERSION")).to_string(),
            fixtures: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_prefix: default_log_file_prefix(),
            format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ComparatorConfig {
    pub fn range(&self) -> Result<DateRange, ConfigError> {
        DateRange::new(self.start_date, self.end_date)
            .map_err(|e| ConfigError::ValidationError(format!("comparator: {e}")))
    }
}

impl HeatmapConfig {
    pub fn range(&self) -> Result<DateRange, ConfigError> {
        DateRange::new(self.start_date, self.end_date)
            .map_err(|e| ConfigError::ValidationError(format!("heatmap: {e}")))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Config {
    /// Checks the cross-field invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_universe("comparator", &self.comparator.tickers)?;
        validate_universe("heatmap", &self.heatmap.tickers)?;

        let c = &self.comparator;
        if c.default_first == c.default_second {
            return Err(ConfigError::ValidationError(format!(
                "comparator: default tickers must differ, both are {}",
                c.default_first
            )));
        }
        for default in [&c.default_first, &c.default_second] {
            if !c.tickers.contains(default) {
                return Err(ConfigError::ValidationError(format!(
                    "comparator: default ticker {default} is not in the ticker list"
                )));
            }
        }
        if c.start_date >= c.end_date {
            return Err(ConfigError::ValidationError(
                "comparator: start_date must be before end_date".to_string(),
            ));
        }

        let h = &self.heatmap;
        if h.start_date >= h.end_date {
            return Err(ConfigError::ValidationError(
                "heatmap: start_date must be before end_date".to_string(),
            ));
        }
        if h.window_days < 2 {
            return Err(ConfigError::ValidationError(
                "heatmap: window_days must be at least 2".to_string(),
            ));
        }
        if h.step_days == 0 {
            return Err(ConfigError::ValidationError(
                "heatmap: step_days must be positive".to_string(),
            ));
        }
        if h.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "heatmap: tick_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_universe(section: &str, tickers: &[Ticker]) -> Result<(), ConfigError> {
    if tickers.len() < 2 {
        return Err(ConfigError::ValidationError(format!(
            "{section}: at least two tickers are required"
        )));
    }
    let mut seen = HashSet::new();
    if let Some(duplicate) = tickers.iter().find(|t| !seen.insert(*t)) {
        return Err(ConfigError::ValidationError(format!(
            "{section}: ticker {duplicate} is listed twice"
        )));
    }
    Ok(())
}
