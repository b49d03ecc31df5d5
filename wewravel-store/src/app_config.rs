use serde::Deserialize;
use std::env;

pub use config::ConfigError;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub payment: PaymentConfig,
    pub session: SessionConfig,
    pub support: SupportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    pub timeout_seconds: u64,
}

fn default_api_prefix() -> String { "/api".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentConfig {
    pub currency: String,
    pub merchant_name: String,
    pub image: Option<String>,
    pub theme_color: Option<String>,
    pub update_attempts: u32,
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub storage_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SupportConfig {
    pub helpline: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Self::defaults()?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `WEWRAVEL_BACKEND__BASE_URL=https://api.example.com`
            .add_source(config::Environment::with_prefix("WEWRAVEL").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Built-in values only; ignores files and the environment.
    pub fn from_defaults() -> Result<Self, ConfigError> {
        Self::defaults()?.build()?.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("backend.base_url", "http://localhost:8080")?
            .set_default("backend.api_prefix", "/api")?
            .set_default("backend.timeout_seconds", 30)?
            .set_default("payment.currency", "INR")?
            .set_default("payment.merchant_name", "WeWravel Experiences")?
            .set_default("payment.image", "/logo.png")?
            .set_default("payment.theme_color", "#facc15")?
            .set_default("payment.update_attempts", 3)?
            .set_default("payment.retry_backoff_ms", 500)?
            .set_default("session.storage_path", ".wewravel/session.json")?
            .set_default("support.helpline", "7355570155")
    }
}
