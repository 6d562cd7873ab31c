use serde::Deserialize;
use std::time::Duration;
use config::Config;
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub provider: ProviderConfig,
    pub price_store: PriceStoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    pub associate_tag: String,
    pub access_key: String,
    pub secret_key: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Overrides the host derived from `locale`. May carry an `http://` or
    /// `https://` scheme; https is assumed otherwise.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First backoff step between retries, doubled on each attempt.
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PriceStoreConfig {
    pub connection_string: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

fn default_locale() -> String {
    "US".to_string()
}

fn default_provider_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_base_ms() -> u64 {
    1000
}

fn default_database() -> String {
    "toriiShoppingDB".to_string()
}

fn default_collection() -> String {
    "productPrices".to_string()
}

fn default_store_timeout() -> u64 {
    3
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PriceStoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    pub fn new() -> Result<Self> {
        let builder = Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::from_sources(builder.build()?)
    }

    pub fn from_sources(config: Config) -> Result<Self> {
        let settings: Settings = config.try_deserialize()?;

        debug!(
            locale = %settings.provider.locale,
            endpoint = ?settings.provider.endpoint,
            database = %settings.price_store.database,
            collection = %settings.price_store.collection,
            "Loaded settings"
        );

        Ok(settings)
    }
}
