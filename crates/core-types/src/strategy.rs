use serde::Deserialize;
use toml::Value;

#[derive(Deserialize, Debug, Clone)]
pub struct StrategyConfig {
    pub name: String,
    // This will hold the `params = { ... }` table from the TOML
    #[serde(default = "default_params")]
    pub params: Value,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            name: "v20".to_string(),
            params: default_params(),
        }
    }
}

fn default_params() -> Value {
    Value::Table(toml::map::Map::new())
}
