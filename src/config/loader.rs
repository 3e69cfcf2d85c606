use config::{Config, Environment, File};
use serde::Deserialize;

use crate::config::CoreConfig;
use crate::error::{Error, Result};
use crate::feed::FeedSourceConfig;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub core: CoreConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub feeds: Vec<FeedSourceConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub bind_addr: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("NORDICFLOW"))
            .build()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        let app: AppConfig = config
            .try_deserialize()
            .map_err(|e| Error::ConfigError(e.to_string()))?;

        app.core.validate()?;
        for feed in &app.feeds {
            if feed.poll_interval.is_zero() {
                return Err(Error::ConfigError(format!(
                    "feed {} has zero poll_interval",
                    feed.source_id
                )));
            }
        }
        Ok(app)
    }
}
