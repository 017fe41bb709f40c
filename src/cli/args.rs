//! CLI argument definitions and `LaunchProfile` construction.
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use super::{Action, LaunchProfile};

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Launch, access, and tear down a Vagrant-provisioned AWS dev instance",
    long_about = None
)]
pub struct DevupArgs {
    #[command(subcommand)]
    pub command: DevupCommand,
}

/// Top-level subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum DevupCommand {
    /// Provision the instance, report the outcome, then tear it down.
    Run(SharedArgs),
    /// Open an interactive session to the running instance.
    Ssh(SharedArgs),
    /// Destroy the instance.
    Destroy(SharedArgs),
    /// Print `export NAME=value` lines for the resolved profile.
    Exports(SharedArgs),
}

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct SharedArgs {
    /// Path to the JSON profile document (overrides DEVUP_AWS_JSON).
    #[arg(long = "aws-json")]
    pub aws_json: Option<PathBuf>,
    /// Profile name to resolve from the document.
    #[arg(long = "profile", default_value = "jhu_ue1")]
    pub profile: String,
    /// INI file holding webhook tokens.
    #[arg(long = "slack-ini")]
    pub slack_ini: Option<PathBuf>,
    /// Section of the webhook INI file to use.
    #[arg(long = "slack-section", default_value = "slack")]
    pub slack_section: String,
    /// Don't send the outcome to the webhook.
    #[arg(long = "skip-slack", default_value_t = false)]
    pub skip_slack: bool,
    /// Keep the instance running on error.
    #[arg(long = "no-destroy-on-error", default_value_t = false)]
    pub no_destroy_on_error: bool,
    /// Don't stage an AWS credentials file for the instance.
    #[arg(long = "no-creds-file", default_value_t = false)]
    pub no_creds_file: bool,
    /// Pass --debug through to vagrant.
    #[arg(long = "debug", default_value_t = false)]
    pub debug: bool,
}

impl DevupArgs {
    /// Build a resolved `LaunchProfile` from CLI args and environment variables.
    pub fn into_profile(self) -> Result<LaunchProfile> {
        let (action, shared) = match self.command {
            DevupCommand::Run(shared) => (Action::Run, shared),
            DevupCommand::Ssh(shared) => (Action::Ssh, shared),
            DevupCommand::Destroy(shared) => (Action::Destroy, shared),
            DevupCommand::Exports(shared) => (Action::Exports, shared),
        };
        LaunchProfile::build(action, shared)
    }
}
