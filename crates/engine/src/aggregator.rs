// In crates/engine/src/aggregator.rs

use core_types::{LookbackWindow, ResultSet, SignalRecord, Symbol};
use futures::{FutureExt, StreamExt, stream};
use market_data::PriceProvider;
use std::panic::AssertUnwindSafe;
use strategies::SignalScanner;

/// What happened to one symbol during a scan.
#[derive(Debug)]
enum SymbolOutcome {
    Scanned(Vec<SignalRecord>),
    Skipped,
}

/// Runs `scanner` over every symbol of the universe and collects the signals.
///
/// Up to `concurrency` symbols are in flight at once, but results are joined
/// back in universe order, so the output never depends on which fetch
/// finished first. A symbol whose series cannot be fetched, or whose scan
/// fails, is skipped without affecting the others.
pub async fn aggregate(
    symbols: &[Symbol],
    provider: &dyn PriceProvider,
    scanner: &(dyn SignalScanner + Send + Sync),
    window: &LookbackWindow,
    concurrency: usize,
) -> ResultSet {
    let scans: Vec<_> = symbols
        .iter()
        .map(|symbol| scan_symbol(symbol, provider, scanner, window).boxed())
        .collect();
    let outcomes: Vec<SymbolOutcome> = stream::iter(scans)
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for outcome in outcomes {
        match outcome {
            SymbolOutcome::Scanned(signals) => records.extend(signals),
            SymbolOutcome::Skipped => skipped += 1,
        }
    }

    tracing::info!(
        symbols = symbols.len(),
        skipped,
        signals = records.len(),
        "Finished scanning universe."
    );

    ResultSet::from_records(records)
}

async fn scan_symbol(
    symbol: &Symbol,
    provider: &dyn PriceProvider,
    scanner: &(dyn SignalScanner + Send + Sync),
    window: &LookbackWindow,
) -> SymbolOutcome {
    let fetched = AssertUnwindSafe(provider.fetch(symbol, window))
        .catch_unwind()
        .await;

    let series = match fetched {
        Ok(Ok(series)) => series,
        Ok(Err(e)) => {
            tracing::warn!(%symbol, provider = provider.name(), error = %e, "Skipping symbol: price history unavailable.");
            return SymbolOutcome::Skipped;
        }
        Err(_) => {
            tracing::error!(%symbol, provider = provider.name(), "Skipping symbol: provider panicked.");
            return SymbolOutcome::Skipped;
        }
    };

    match std::panic::catch_unwind(AssertUnwindSafe(|| scanner.scan(&series))) {
        Ok(signals) => {
            tracing::debug!(%symbol, signals = signals.len(), "Scanned symbol.");
            SymbolOutcome::Scanned(signals)
        }
        Err(_) => {
            tracing::error!(%symbol, scanner = scanner.name(), "Skipping symbol: scanner panicked.");
            SymbolOutcome::Skipped
        }
    }
}
