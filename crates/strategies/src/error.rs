// In crates/strategies/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Attempted to create unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Invalid strategy parameters: {0}")]
    InvalidSettings(#[from] toml::de::Error),

    #[error("Threshold percent must be a finite, non-negative number, got {0}")]
    InvalidThreshold(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
