//! Load and validate the JSON profile document.
use std::path::PathBuf;

use tracing::{error, info};

use crate::lib::errors::ConfigError;

pub mod profile;
pub mod telemetry;
pub mod webhook;

pub use profile::{resolve_params, RawProfileDoc, ResolvedParams};
pub use webhook::{webhook_url, WebhookConfig};

pub const AWS_JSON_ENV_KEY: &str = "DEVUP_AWS_JSON";
pub const DEFAULT_AWS_JSON_PATH: &str = "aws.json";

/// Profile document resolved for one named profile.
#[derive(Debug, Clone)]
pub struct ProfileDocument {
    pub params: ResolvedParams,
    pub source_path: PathBuf,
}

impl ProfileDocument {
    /// Load the profile document and resolve the named profile.
    pub fn load_from_path(path: PathBuf, profile_name: &str) -> Result<Self, ConfigError> {
        info!(
            target: "devup::config",
            path = %path.display(),
            profile = profile_name,
            "Starting profile document load"
        );

        let builder = config::Config::builder().add_source(config::File::from(path.clone()));
        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(path.clone(), err);
            error!(
                target: "devup::config",
                path = %path.display(),
                reason = %error,
                "Failed to read profile document"
            );
            error
        })?;

        let raw: RawProfileDoc = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "devup::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse profile document"
            );
            error
        })?;

        let params = resolve_params(&raw, profile_name, &path).map_err(|err| {
            error!(
                target: "devup::config",
                path = %path.display(),
                profile = profile_name,
                reason = %err,
                "Failed to resolve profile"
            );
            err
        })?;

        let document = Self {
            params,
            source_path: path,
        };
        telemetry::log_loaded(&document);
        Ok(document)
    }
}
