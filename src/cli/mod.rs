//! CLI entrypoint module structure.

pub mod args;
pub mod profile;

pub use args::{DevupArgs, DevupCommand, SharedArgs};
pub use profile::{
    expand_home, resolve_aws_json_path, resolve_slack_ini_path, Action, LaunchProfile,
    DEFAULT_SLACK_INI,
};
