use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use config::{Config, ConfigError};
use tracing::debug;

pub const DEFAULT_URL: &str = "https://www.apple.com/ch-fr/shop/refurbished/mac/14-pouces-macbook-pro";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";
const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub source: SourceConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub headers: HashMap<String, String>,
    pub timeout_secs: u64,
    pub locator: LocatorKind,
}

/// Which fragment locator the extractor uses on the marker text.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocatorKind {
    #[default]
    Greedy,
    Balanced,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    S3,
    Local,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: Option<String>,
    pub prefix: String,
    pub write_timeout_secs: u64,
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub local_root: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for SourceConfig {
    fn default() -> Self {
        let headers = HashMap::from([
            ("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string()),
            ("Accept".to_string(), DEFAULT_ACCEPT.to_string()),
        ]);
        Self {
            url: DEFAULT_URL.to_string(),
            headers,
            timeout_secs: 30,
            locator: LocatorKind::Greedy,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            bucket: None,
            prefix: "dump".to_string(),
            write_timeout_secs: 60,
            endpoint: None,
            region: "us-east-1".to_string(),
            access_key: None,
            secret_key: None,
            local_root: "data".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl StorageConfig {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Build the configuration: optional file, then APP_ env overrides
        let builder = Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        // Missing keys fall back to the serde defaults
        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;

        debug!(
            url = %settings.source.url,
            headers = ?settings.source.headers.keys().collect::<Vec<_>>(),
            backend = ?settings.storage.backend,
            bucket = ?settings.storage.bucket,
            "Loaded settings"
        );

        Ok(settings)
    }
}
