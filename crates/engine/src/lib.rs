// In crates/engine/src/lib.rs

pub mod aggregator;

use anyhow::Result;
use app_config::Settings;
use chrono::{Local, NaiveDate};
use core_types::{LookbackWindow, ResultSet, Symbol};
use market_data::PriceProvider;
use std::sync::Arc;
use strategies::SignalScanner;
use strategies::ranker::rank_result_set;

pub use aggregator::aggregate;

/// The batch orchestrator: fetch every symbol, scan, aggregate, rank.
///
/// The engine holds configuration and collaborators only. Every run starts
/// from scratch, so the same input always produces the same ranked output.
#[derive(Clone)]
pub struct Engine {
    universe: Vec<Symbol>,
    lookback_days: i64,
    concurrency: usize,
    provider: Arc<dyn PriceProvider>,
    scanner: Arc<dyn SignalScanner + Send + Sync>,
}

impl Engine {
    pub fn new(
        universe: Vec<Symbol>,
        lookback_days: i64,
        concurrency: usize,
        provider: Arc<dyn PriceProvider>,
        scanner: Arc<dyn SignalScanner + Send + Sync>,
    ) -> Result<Self> {
        anyhow::ensure!(lookback_days >= 1, "lookback_days must be at least 1, got {lookback_days}");
        anyhow::ensure!(concurrency >= 1, "concurrency must be at least 1");

        Ok(Self {
            universe,
            lookback_days,
            concurrency,
            provider,
            scanner,
        })
    }

    /// Wires up the provider and scanner named in the settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let provider = market_data::from_settings(&settings.market_data)?;
        let scanner: Arc<dyn SignalScanner + Send + Sync> =
            Arc::from(strategies::create_scanner(&settings.strategy)?);
        let universe = settings
            .universe
            .symbols
            .iter()
            .map(|s| Symbol(s.clone()))
            .collect();

        Self::new(
            universe,
            settings.universe.lookback_days,
            settings.universe.concurrency,
            provider,
            scanner,
        )
    }

    pub fn universe(&self) -> &[Symbol] {
        &self.universe
    }

    /// Scans the universe over the lookback window ending today.
    pub async fn run_strategy(&self) -> ResultSet {
        self.run_strategy_as_of(Local::now().date_naive()).await
    }

    /// Scans the universe over the lookback window ending on `today`.
    pub async fn run_strategy_as_of(&self, today: NaiveDate) -> ResultSet {
        let window = match LookbackWindow::ending_on(today, self.lookback_days) {
            Ok(window) => window,
            Err(e) => {
                tracing::error!(error = %e, "Cannot build lookback window.");
                return ResultSet::Empty;
            }
        };

        tracing::info!(
            scanner = self.scanner.name(),
            provider = self.provider.name(),
            symbols = self.universe.len(),
            start = %window.start,
            end = %window.end,
            "Running strategy."
        );

        let results = aggregate(
            &self.universe,
            self.provider.as_ref(),
            self.scanner.as_ref(),
            &window,
            self.concurrency,
        )
        .await;

        rank_result_set(results)
    }
}
