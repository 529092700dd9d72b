use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use validator::Validate;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_EVENT_BUFFER: usize = 256;
const CONFIG_DIR: &str = "config";

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Deployment environment name ("development", "production", ...).
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Tracing filter directive, e.g. "info" or "baketrace=debug".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON instead of human-readable lines.
    #[serde(default)]
    pub log_json: bool,

    /// Capacity of the domain event channel.
    #[validate(range(min = 1, max = 65536))]
    #[serde(default = "default_event_buffer")]
    pub event_buffer_size: usize,
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_event_buffer() -> usize {
    DEFAULT_EVENT_BUFFER
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            event_buffer_size: default_event_buffer(),
        }
    }
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Loads configuration from layered sources: `config/default`, then
/// `config/{APP_ENV}`, then `BAKETRACE__*` environment variables. Missing
/// files are fine; every field has a default.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let run_env = env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let settings = Config::builder()
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("BAKETRACE").separator("__"))
        .set_default("environment", run_env)?
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    app_config
        .validate()
        .map_err(|e| ConfigError::Message(e.to_string()))?;

    Ok(app_config)
}
