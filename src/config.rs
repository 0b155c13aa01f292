use crate::profile::Profile;
use crate::session::SessionConfig;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub nats: NatsConfig,
    #[serde(default)]
    pub profile: Profile,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per finalized session
    pub sessions_path: String,
}

#[derive(Debug, Deserialize)]
pub struct NatsConfig {
    /// Use NATS services for generation, recognition and narration
    pub enabled: bool,
    pub url: String,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "nats://localhost:4222".to_string(),
        }
    }
}

impl Config {
    /// Load from `path` (any format the `config` crate reads, extension
    /// optional), then apply `DILSE__SECTION__KEY` environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("DILSE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
