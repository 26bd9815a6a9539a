// In crates/strategies/src/lib.rs

use core_types::{PriceSeries, SignalRecord};

pub mod error;
pub mod factory;
pub mod ranker;
pub mod types;
pub mod v20;

pub use error::{Error, Result};
pub use factory::create_scanner;
pub use ranker::rank;
pub use v20::V20Scanner;

/// The universal interface for a signal scanner.
///
/// A scanner looks at one symbol's complete history in a single pass and
/// reports every opportunity it finds. Scanners hold configuration only; no
/// state survives between calls, so one instance can serve many symbols.
pub trait SignalScanner {
    /// The name of the scanner.
    fn name(&self) -> &'static str;

    fn scan(&self, series: &PriceSeries) -> Vec<SignalRecord>;
}
