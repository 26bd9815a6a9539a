// In crates/strategies/src/types.rs

use serde::{Deserialize, Serialize};

/// The default minimum streak range, in percent.
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 20.0;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct V20Settings {
    /// Minimum `(high - low) / low * 100` a streak needs to produce a signal.
    #[serde(default = "default_threshold")]
    pub threshold_percent: f64,
}

impl Default for V20Settings {
    fn default() -> Self {
        Self {
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD_PERCENT
}
