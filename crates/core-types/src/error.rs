// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Lookback window must cover between one day and the calendar range, got {0}")]
    InvalidLookback(i64),

    #[error("Price series for {0} contains no points")]
    EmptySeries(String),
}

pub type Result<T> = std::result::Result<T, Error>;
