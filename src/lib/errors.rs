use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Errors that can occur while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to build (read) the configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize the document into a struct.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Required field is missing.
    #[error("Configuration file {path} is missing `{field}`")]
    MissingField { path: PathBuf, field: &'static str },
    /// Named profile is absent from the profile document.
    #[error("No profile named `{profile}` in {path}")]
    MissingProfile { path: PathBuf, profile: String },
    /// Instance type has no entry in the EC2 section.
    #[error("No EC2 entry for instance type `{instance_type}` in {path}")]
    MissingInstanceType {
        path: PathBuf,
        instance_type: String,
    },
    /// No AMI mapped for the resolved region/architecture pair.
    #[error("No AMI for region `{region}` and arch `{arch}` in {path}")]
    MissingAmi {
        path: PathBuf,
        region: String,
        arch: String,
    },
    /// A resolved field came back empty.
    #[error("Configuration file {path} resolved an empty `{field}`")]
    EmptyField { path: PathBuf, field: &'static str },
    /// Webhook INI file lacks the requested section.
    #[error("No [{section}] section in webhook config {path}")]
    MissingSection { path: PathBuf, section: String },
    /// Webhook INI section lacks a required key.
    #[error("Webhook config {path} section [{section}] is missing `{key}`")]
    MissingKey {
        path: PathBuf,
        section: String,
        key: &'static str,
    },
    /// Home directory could not be determined for `~` expansion.
    #[error("Cannot expand `~` in {path}: no home directory")]
    NoHomeDir { path: PathBuf },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }
}

/// Errors while staging or erasing the scoped credentials file.
#[derive(Debug, Error)]
pub enum CredsError {
    #[error("No such credentials file {path}")]
    SourceMissing { path: PathBuf },
    #[error("I/O failed for credentials file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No [{section}] section in credentials file {path}")]
    SectionNotFound { path: PathBuf, section: String },
    #[error("Credentials section [{section}] in {path}: expected `{expected} = ...`")]
    MalformedEntry {
        path: PathBuf,
        section: String,
        expected: &'static str,
    },
}

/// Errors while invoking the external vagrant tool.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O failed for run log {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed while streaming vagrant output: {source}")]
    Stream {
        #[source]
        source: io::Error,
    },
    #[error("Failed waiting for vagrant to exit: {source}")]
    Wait {
        #[source]
        source: io::Error,
    },
}

/// Errors while submitting the webhook notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to submit webhook notification: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
    #[error("Webhook endpoint rejected the notification with status {status}")]
    Rejected { status: reqwest::StatusCode },
}
