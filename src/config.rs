//! Configuration Management
//!
//! Credentials and connection settings, read from a JSON file in the user
//! config directory and overridden by `INVOICIBLE_*` environment variables.

use crate::api::auth::OAuthCredentials;
use crate::api::client::DEFAULT_DOMAIN;
use crate::error::{Error, Result};
use crate::resource::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User configuration
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub consumer_key: Option<String>,
    #[serde(default)]
    pub consumer_secret: Option<String>,
    #[serde(default)]
    pub access_token_key: Option<String>,
    #[serde(default)]
    pub access_token_secret: Option<String>,
    /// Company domain, e.g. `mycompany.centrumfaktur.pl`
    #[serde(default)]
    pub domain: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Log declared fields missing from responses
    #[serde(default)]
    pub report_missing_fields: bool,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("invoicible").join("config.json"))
    }

    /// Load configuration from disk, then apply environment overrides
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            _ => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Override fields from `INVOICIBLE_*` variables found by `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let overrides: [(&str, &mut Option<String>); 5] = [
            ("INVOICIBLE_CONSUMER_KEY", &mut self.consumer_key),
            ("INVOICIBLE_CONSUMER_SECRET", &mut self.consumer_secret),
            ("INVOICIBLE_TOKEN_KEY", &mut self.access_token_key),
            ("INVOICIBLE_TOKEN_SECRET", &mut self.access_token_secret),
            ("INVOICIBLE_DOMAIN", &mut self.domain),
        ];

        for (key, slot) in overrides {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        }
    }

    /// Get effective domain (config > default)
    pub fn effective_domain(&self) -> &str {
        self.domain.as_deref().unwrap_or(DEFAULT_DOMAIN)
    }

    /// All four keys, or a configuration error naming the first missing one
    pub fn credentials(&self) -> Result<OAuthCredentials> {
        fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("{} is not configured", name)))
        }

        Ok(OAuthCredentials::new(
            required(&self.consumer_key, "consumer_key")?,
            required(&self.consumer_secret, "consumer_secret")?,
            required(&self.access_token_key, "access_token_key")?,
            required(&self.access_token_secret, "access_token_secret")?,
        ))
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            report_missing_fields: self.report_missing_fields,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
