// In crates/web-server/src/types.rs

use core_types::ResultSet;
use serde::Serialize;

/// The body of `GET /api/signals`.
#[derive(Debug, Serialize)]
pub struct SignalsResponse {
    pub count: usize,
    pub signals: ResultSet,
}

impl From<ResultSet> for SignalsResponse {
    fn from(signals: ResultSet) -> Self {
        Self {
            count: signals.len(),
            signals,
        }
    }
}
