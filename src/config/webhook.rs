//! Webhook INI config and URL construction.

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;
use tracing::error;

use crate::lib::errors::ConfigError;

/// Resolved webhook endpoint.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawWebhookSection {
    pub tstring: Option<String>,
    pub bstring: Option<String>,
    pub secret: Option<String>,
}

impl WebhookConfig {
    /// Load the webhook config from an INI file and pick one section.
    pub fn load_from_path(path: &Path, section: &str) -> Result<Self, ConfigError> {
        let source = config::File::from(path.to_path_buf()).format(config::FileFormat::Ini);
        let document = config::Config::builder()
            .add_source(source)
            .build()
            .map_err(|err| {
                let error = ConfigError::from_read_error(path.to_path_buf(), err);
                error!(
                    target: "devup::config",
                    path = %path.display(),
                    reason = %error,
                    "Failed to read webhook config file"
                );
                error
            })?;

        let raw: BTreeMap<String, RawWebhookSection> =
            document.try_deserialize().map_err(|err| {
                let error = ConfigError::from_parse_error(path.to_path_buf(), err);
                error!(
                    target: "devup::config",
                    path = %path.display(),
                    reason = %error,
                    "Failed to parse webhook config file"
                );
                error
            })?;

        let picked = raw
            .get(section)
            .ok_or_else(|| ConfigError::MissingSection {
                path: path.to_path_buf(),
                section: section.to_string(),
            })?;

        let tstring = require_key(picked.tstring.as_deref(), "tstring", path, section)?;
        let bstring = require_key(picked.bstring.as_deref(), "bstring", path, section)?;
        let secret = require_key(picked.secret.as_deref(), "secret", path, section)?;

        Ok(Self {
            url: webhook_url(&tstring, &bstring, &secret),
        })
    }
}

/// Fixed Slack services URL template.
pub fn webhook_url(tstring: &str, bstring: &str, secret: &str) -> String {
    format!("https://hooks.slack.com/services/{tstring}/{bstring}/{secret}")
}

fn require_key(
    value: Option<&str>,
    key: &'static str,
    path: &Path,
    section: &str,
) -> Result<String, ConfigError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::MissingKey {
            path: path.to_path_buf(),
            section: section.to_string(),
            key,
        })
}

#[cfg(test)]
mod tests {
    use super::webhook_url;

    #[test]
    fn url_follows_the_services_template() {
        assert_eq!(
            webhook_url("TAAAA", "BBBBB", "s3cret"),
            "https://hooks.slack.com/services/TAAAA/BBBBB/s3cret"
        );
    }
}
