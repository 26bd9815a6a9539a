// In crates/app-config/src/types.rs

use crate::error::{Error, Result};
use core_types::StrategyConfig;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Which scanner to run, with its raw `params` table.
    #[serde(default)]
    pub strategy: StrategyConfig,
    /// The symbols to scan and how far back to look.
    #[serde(default)]
    pub universe: UniverseSettings,
    /// Where price history comes from.
    #[serde(default)]
    pub market_data: MarketDataSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

impl Settings {
    /// Rejects values that deserialize fine but cannot drive a scan.
    pub fn validate(&self) -> Result<()> {
        if self.universe.lookback_days < 1 {
            return Err(Error::Invalid("universe.lookback_days must be at least 1".into()));
        }
        if self.universe.concurrency < 1 {
            return Err(Error::Invalid("universe.concurrency must be at least 1".into()));
        }
        if self.market_data.moving_average_period < 1 {
            return Err(Error::Invalid("market_data.moving_average_period must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UniverseSettings {
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
    /// Calendar days of history requested for each symbol.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
    /// Maximum number of symbols fetched at the same time.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for UniverseSettings {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            lookback_days: default_lookback_days(),
            concurrency: default_concurrency(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Offline generated prices.
    #[default]
    Synthetic,
    /// A Yahoo-Finance-compatible chart API.
    Yahoo,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MarketDataSettings {
    #[serde(default)]
    pub provider: ProviderKind,
    /// The base URL of the chart API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Appended to every symbol before it is requested (e.g., ".NS").
    #[serde(default)]
    pub symbol_suffix: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_moving_average_period")]
    pub moving_average_period: usize,
}

impl Default for MarketDataSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: default_base_url(),
            symbol_suffix: String::new(),
            timeout_secs: default_timeout_secs(),
            moving_average_period: default_moving_average_period(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Helper functions for serde defaults
fn default_symbols() -> Vec<String> {
    vec!["RELIANCE".into(), "INFY".into(), "ITC".into()]
}
fn default_lookback_days() -> i64 { 3 * 365 }
fn default_concurrency() -> usize { 4 }
fn default_base_url() -> String { "https://query1.finance.yahoo.com".into() }
fn default_timeout_secs() -> u64 { 10 }
fn default_moving_average_period() -> usize { 200 }
fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 5000 }
