use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::response::CorrelationTokens;
use crate::retry::RetryPolicy;

pub const DEFAULT_SKILL_NAME: &str = "Premium Facts Sample";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub skill_name: String,
    /// Replacement for the built-in fact table.
    pub facts_file: Option<PathBuf>,
    pub catalog: CatalogConfig,
    pub purchase: PurchaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skill_name: DEFAULT_SKILL_NAME.into(),
            facts_file: None,
            catalog: CatalogConfig::default(),
            purchase: PurchaseConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Overrides the API endpoint carried in each request envelope.
    pub endpoint: Option<String>,
    pub max_retries: usize,
    pub retry_delay_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            max_retries: 1,
            retry_delay_ms: 200,
        }
    }
}

impl CatalogConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_delay_ms))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PurchaseConfig {
    pub correlation_token: CorrelationTokens,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

/// Load a [`Config`] from a TOML file. Missing keys take their defaults.
///
/// # Examples
///
/// ```no_run
/// use premium_facts::config::load;
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let cfg = load("premium-facts.toml").await.unwrap();
/// println!("{}", cfg.skill_name);
/// # });
/// ```
pub async fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
    Config::from_toml(&text)
}
