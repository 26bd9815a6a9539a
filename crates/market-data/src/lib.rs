// In crates/market-data/src/lib.rs

use app_config::types::{MarketDataSettings, ProviderKind};
use async_trait::async_trait;
use core_types::{LookbackWindow, PriceSeries, Symbol};
use std::sync::Arc;

pub mod error;
pub mod indicators;
pub mod synthetic;
pub mod types;
pub mod yahoo;

// Re-export public types
pub use error::{Error, Result};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;

/// The universal interface for a source of daily price history.
///
/// A provider returns the points for `symbol` that fall inside `window`,
/// ascending by date with no duplicate days, with the moving average already
/// attached. Any failure is reported as an `Err`; callers decide whether a
/// failure is fatal.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// The name of the provider (e.g., "synthetic", "yahoo").
    fn name(&self) -> &'static str;

    async fn fetch(&self, symbol: &Symbol, window: &LookbackWindow) -> Result<PriceSeries>;
}

/// Builds the provider selected in the configuration.
pub fn from_settings(settings: &MarketDataSettings) -> Result<Arc<dyn PriceProvider>> {
    let provider: Arc<dyn PriceProvider> = match settings.provider {
        ProviderKind::Synthetic => Arc::new(SyntheticProvider::new(settings.moving_average_period)),
        ProviderKind::Yahoo => Arc::new(YahooProvider::new(settings)?),
    };
    tracing::info!(provider = provider.name(), "Market data provider ready.");
    Ok(provider)
}
