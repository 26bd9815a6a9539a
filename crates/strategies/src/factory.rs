// In crates/strategies/src/factory.rs

use crate::error::{Error, Result};
use crate::types::V20Settings;
use crate::{SignalScanner, V20Scanner};
use core_types::StrategyConfig;

/// Builds the scanner named in the configuration, parsing its `params` table
/// into the matching typed settings.
pub fn create_scanner(config: &StrategyConfig) -> Result<Box<dyn SignalScanner + Send + Sync>> {
    let scanner: Box<dyn SignalScanner + Send + Sync> = match config.name.as_str() {
        "v20" => {
            let settings: V20Settings = config.params.clone().try_into()?;
            Box::new(V20Scanner::new(settings)?)
        }
        unknown => return Err(Error::UnknownStrategy(unknown.to_string())),
    };

    tracing::info!(strategy = scanner.name(), "Scanner created.");
    Ok(scanner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(name: &str, params: &str) -> StrategyConfig {
        StrategyConfig {
            name: name.to_string(),
            params: toml::from_str(params).unwrap(),
        }
    }

    #[test]
    fn builds_v20_with_params() {
        let scanner = create_scanner(&config("v20", "threshold_percent = 35.5")).unwrap();
        assert_eq!(scanner.name(), "V20");
    }

    #[test]
    fn missing_params_fall_back_to_defaults() {
        assert!(create_scanner(&config("v20", "")).is_ok());
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        let err = create_scanner(&config("v40", "")).err().unwrap();
        assert!(matches!(err, Error::UnknownStrategy(name) if name == "v40"));
    }

    #[test]
    fn malformed_params_are_an_error() {
        let err = create_scanner(&config("v20", "threshold_percent = \"high\"")).err().unwrap();
        assert!(matches!(err, Error::InvalidSettings(_)));
    }
}
