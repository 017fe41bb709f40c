//! LaunchProfile and path resolution.
use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use directories::UserDirs;

use crate::config::{AWS_JSON_ENV_KEY, DEFAULT_AWS_JSON_PATH};
use crate::lib::errors::ConfigError;

use super::args::SharedArgs;

pub const DEFAULT_SLACK_INI: &str = "~/.devup/slack.ini";

/// Which vagrant-facing action was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Run,
    Ssh,
    Destroy,
    Exports,
}

impl Action {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Action::Run => "run",
            Action::Ssh => "ssh",
            Action::Destroy => "destroy",
            Action::Exports => "exports",
        }
    }
}

/// Resolved launch profile.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    pub action: Action,
    pub aws_json: PathBuf,
    pub profile: String,
    pub slack_ini: PathBuf,
    pub slack_section: String,
    pub skip_slack: bool,
    pub keep_on_error: bool,
    pub stage_creds: bool,
    pub verbose: bool,
}

impl LaunchProfile {
    /// Resolve CLI flags and environment variables into a launch profile.
    pub fn build(action: Action, shared: SharedArgs) -> Result<Self> {
        let aws_json = resolve_aws_json_path(shared.aws_json)?;
        let slack_ini = resolve_slack_ini_path(shared.slack_ini)?;

        Ok(Self {
            action,
            aws_json,
            profile: shared.profile,
            slack_ini,
            slack_section: shared.slack_section,
            skip_slack: shared.skip_slack,
            keep_on_error: shared.no_destroy_on_error,
            stage_creds: !shared.no_creds_file,
            verbose: shared.debug,
        })
    }
}

/// Resolve the profile document path in the order: CLI override → env var → default.
pub fn resolve_aws_json_path(override_path: Option<PathBuf>) -> Result<PathBuf> {
    let from_env = override_path.is_none() && env::var_os(AWS_JSON_ENV_KEY).is_some();
    let path = override_path
        .or_else(|| env::var_os(AWS_JSON_ENV_KEY).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_AWS_JSON_PATH));
    crate::config::telemetry::log_env_source(&path, from_env);

    if path.is_absolute() {
        return Ok(path);
    }

    let cwd = env::current_dir().context("failed to obtain current directory")?;
    Ok(cwd.join(path))
}

/// Resolve the webhook INI path, expanding a leading `~`.
pub fn resolve_slack_ini_path(override_path: Option<PathBuf>) -> Result<PathBuf> {
    let path = override_path.unwrap_or_else(|| PathBuf::from(DEFAULT_SLACK_INI));
    Ok(expand_home(&path)?)
}

/// Expand a leading `~/` against the user's home directory.
pub fn expand_home(path: &Path) -> Result<PathBuf, ConfigError> {
    let Ok(stripped) = path.strip_prefix("~") else {
        return Ok(path.to_path_buf());
    };
    let home = UserDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| ConfigError::NoHomeDir {
            path: path.to_path_buf(),
        })?;
    Ok(home.join(stripped))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::expand_home;

    #[test]
    fn absolute_paths_pass_through_unexpanded() {
        let path = Path::new("/etc/devup/slack.ini");
        assert_eq!(expand_home(path).unwrap(), PathBuf::from(path));
    }

    #[test]
    fn tilde_prefix_is_replaced_with_home() {
        let expanded = expand_home(Path::new("~/.devup/slack.ini")).unwrap();
        assert!(!expanded.starts_with("~"));
        assert!(expanded.ends_with(".devup/slack.ini"));
    }
}
