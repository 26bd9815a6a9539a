// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::Settings;

/// Loads the application settings from the `config/` directory of the
/// current working directory.
pub fn load_settings() -> Result<Settings> {
    load_settings_from("config")
}

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings_from(dir: impl AsRef<Path>) -> Result<Settings> {
    let dir = dir.as_ref();
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        // 1. Load the base configuration file.
        .add_source(File::from(dir.join("base")))
        // 2. Load the environment-specific configuration file.
        .add_source(File::from(dir.join(&environment)).required(false))
        // 3. Load settings from environment variables (e.g., `APP_UNIVERSE__LOOKBACK_DAYS=730`).
        // The prefix is `APP`, separator is `__`.
        .add_source(Environment::with_prefix("APP").separator("__").try_parsing(true))
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderKind;
    use std::fs;

    const BASE: &str = r#"
[app]
environment = "test"
log_level = "debug"

[strategy]
name = "v20"
params = { threshold_percent = 30.0 }

[universe]
symbols = ["AAA", "BBB"]
lookback_days = 400

[market_data]
provider = "yahoo"
symbol_suffix = ".NS"

[server]
host = "127.0.0.1"
port = 8080
"#;

    #[test]
    fn loads_base_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), BASE).unwrap();

        let settings = load_settings_from(dir.path()).unwrap();
        assert_eq!(settings.app.log_level, "debug");
        assert_eq!(settings.strategy.name, "v20");
        assert_eq!(
            settings.strategy.params.get("threshold_percent").and_then(|v| v.as_float()),
            Some(30.0)
        );
        assert_eq!(settings.universe.symbols, vec!["AAA", "BBB"]);
        assert_eq!(settings.universe.lookback_days, 400);
        assert_eq!(settings.universe.concurrency, 4);
        assert_eq!(settings.market_data.provider, ProviderKind::Yahoo);
        assert_eq!(settings.market_data.moving_average_period, 200);
        assert_eq!(settings.market_data.timeout_secs, 10);
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), "[app]\nenvironment = \"test\"\nlog_level = \"info\"\n").unwrap();

        let settings = load_settings_from(dir.path()).unwrap();
        assert_eq!(settings.strategy.name, "v20");
        assert_eq!(settings.universe.symbols, vec!["RELIANCE", "INFY", "ITC"]);
        assert_eq!(settings.universe.lookback_days, 3 * 365);
        assert_eq!(settings.market_data.provider, ProviderKind::Synthetic);
        assert_eq!(settings.server.port, 5000);
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!("{BASE}\n");
        let body = body.replace("lookback_days = 400", "lookback_days = 400\nconcurrency = 0");
        fs::write(dir.path().join("base.toml"), body).unwrap();

        assert!(matches!(load_settings_from(dir.path()), Err(Error::Invalid(_))));
    }
}
