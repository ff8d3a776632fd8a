use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub order_api: OrderApiConfig,
    pub demo: DemoConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Credentials and endpoint for the external order-management system
#[derive(Debug, Deserialize, Clone)]
pub struct OrderApiConfig {
    pub base_url: String,
    /// Token refresh credential; finalization fails fast when unset
    #[serde(default)]
    pub refresh_credential: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DemoConfig {
    /// Pin the randomized demo quantities to a seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides; not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `TOURHUB_SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("TOURHUB").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
