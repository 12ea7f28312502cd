//! Remote mirror credentials, persisted next to the ledger.

use anyhow::Result;
use reqwest::Url;
use thiserror::Error;

use crate::db::{schema, Database};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ConfigError {
    #[error("Please fill in both the endpoint and the key")]
    Incomplete,

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RemoteConfig {
    pub(crate) endpoint: String,
    pub(crate) key: String,
}

impl RemoteConfig {
    /// Build a config from user input, trimming both fields.
    pub(crate) fn new(endpoint: &str, key: &str) -> Result<Self, ConfigError> {
        let endpoint = endpoint.trim().trim_end_matches('/');
        let key = key.trim();
        if endpoint.is_empty() || key.is_empty() {
            return Err(ConfigError::Incomplete);
        }
        let url =
            Url::parse(endpoint).map_err(|_| ConfigError::InvalidEndpoint(endpoint.into()))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::InvalidEndpoint(endpoint.into()));
        }
        Ok(Self {
            endpoint: endpoint.to_string(),
            key: key.to_string(),
        })
    }

    /// Stored config, or `None` when either entry is missing or blank.
    pub(crate) fn load(db: &Database) -> Result<Option<Self>> {
        let endpoint = db.get(schema::KEY_ENDPOINT)?;
        let key = db.get(schema::KEY_API_KEY)?;
        match (endpoint, key) {
            (Some(endpoint), Some(key)) => match Self::new(&endpoint, &key) {
                Ok(config) => Ok(Some(config)),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring stored remote config");
                    Ok(None)
                }
            },
            _ => Ok(None),
        }
    }

    pub(crate) fn save(&self, db: &mut Database) -> Result<()> {
        db.set_many(&[
            (schema::KEY_ENDPOINT, self.endpoint.as_str()),
            (schema::KEY_API_KEY, self.key.as_str()),
        ])?;
        tracing::info!(endpoint = %self.endpoint, "Saved remote config");
        Ok(())
    }

    pub(crate) fn clear(db: &Database) -> Result<()> {
        db.remove(schema::KEY_ENDPOINT)?;
        db.remove(schema::KEY_API_KEY)?;
        tracing::info!("Cleared remote config");
        Ok(())
    }

    /// The key with everything but the last four characters hidden.
    pub(crate) fn masked_key(&self) -> String {
        let chars: Vec<char> = self.key.chars().collect();
        let visible = chars.len().min(4);
        let tail: String = chars[chars.len() - visible..].iter().collect();
        format!("{}{tail}", "•".repeat(chars.len().saturating_sub(visible).min(12)))
    }
}
