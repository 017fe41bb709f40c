//! Action orchestration: config lookup, credential staging, vagrant
//! invocation, notification, teardown.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::warn;

use crate::{
    cli::{Action, LaunchProfile},
    config::{ProfileDocument, WebhookConfig},
    lib::telemetry::RunSpan,
};

pub mod creds;
pub mod exports;
pub mod notify;
pub mod vagrant;

pub use creds::{stage_credentials, STAGED_CREDS_FILE};
pub use exports::{environment_map, render_exports};
pub use notify::{scan_attachments, Attachment, HttpWebhookSink, WebhookSink};
pub use vagrant::{build_vagrant_command, VagrantAction, RUN_LOG_FILE};

/// Execute the selected action against the resolved profile.
pub async fn execute(profile: LaunchProfile) -> Result<()> {
    let document = ProfileDocument::load_from_path(profile.aws_json.clone(), &profile.profile)?;

    match profile.action {
        Action::Exports => {
            print!("{}", render_exports(&environment_map(&document.params, None)));
            Ok(())
        }
        Action::Ssh => {
            let env = environment_map(&document.params, None);
            let span = RunSpan::start("ssh");
            let command = build_vagrant_command(VagrantAction::Ssh, false, profile.verbose, &env);
            let exit_code = vagrant::run_interactive(command).await?;
            span.finish(status_of(exit_code), exit_code);
            Ok(())
        }
        Action::Destroy => {
            let env = environment_map(&document.params, None);
            let span = RunSpan::start("destroy");
            let command = build_vagrant_command(
                VagrantAction::Destroy { force: false },
                false,
                profile.verbose,
                &env,
            );
            let exit_code = vagrant::run_interactive(command).await?;
            span.finish(status_of(exit_code), exit_code);
            Ok(())
        }
        Action::Run => execute_run(&profile, &document).await,
    }
}

/// The full run action: stage credentials, `vagrant up` with a tee'd log,
/// erase credentials, notify, then tear down unless asked to keep the
/// instance.
async fn execute_run(profile: &LaunchProfile, document: &ProfileDocument) -> Result<()> {
    // Configuration failures must happen before any external side effect, so
    // the webhook config is resolved up front when notification is on.
    let webhook = if profile.skip_slack {
        None
    } else {
        Some(WebhookConfig::load_from_path(
            &profile.slack_ini,
            &profile.slack_section,
        )?)
    };

    let staged_creds = if profile.stage_creds {
        let source = creds::default_credentials_path()
            .ok_or_else(|| anyhow!("cannot locate the home directory for ~/.aws/credentials"))?;
        stage_credentials(
            &source,
            &document.params.aws_profile,
            Path::new(STAGED_CREDS_FILE),
        )?;
        Some(STAGED_CREDS_FILE)
    } else {
        None
    };

    let env = environment_map(&document.params, staged_creds);
    let span = RunSpan::start("up");
    let command = build_vagrant_command(VagrantAction::Up, profile.keep_on_error, profile.verbose, &env);
    let run_result = vagrant::run_with_tee(command, Path::new(RUN_LOG_FILE)).await;

    // The staged secrets come off disk no matter how the run went.
    if staged_creds.is_some() {
        creds::erase_staged(Path::new(STAGED_CREDS_FILE))?;
    }
    let exit_code = run_result?;
    span.finish(status_of(exit_code), exit_code);

    if exit_code != Some(0) {
        warn!(
            target: "devup::vagrant",
            exit_code = exit_code,
            "vagrant up did not exit cleanly; continuing to notification and teardown"
        );
    }

    let log_contents = std::fs::read_to_string(RUN_LOG_FILE)
        .with_context(|| format!("failed to read run log {RUN_LOG_FILE}"))?;

    if let Some(webhook) = &webhook {
        let display_name = notify::read_display_name(Path::new(notify::NAME_FILE));
        let sink = HttpWebhookSink::new();
        notify::maybe_notify(
            &sink,
            profile.skip_slack,
            &webhook.url,
            &log_contents,
            &display_name,
        )
        .await?;
    }

    if !profile.keep_on_error {
        let span = RunSpan::start("teardown");
        let command = build_vagrant_command(
            VagrantAction::Destroy { force: true },
            false,
            profile.verbose,
            &env,
        );
        let teardown_code = vagrant::run_interactive(command).await?;
        span.finish(status_of(teardown_code), teardown_code);
    }

    match exit_code {
        Some(0) => Ok(()),
        Some(code) => Err(anyhow!("vagrant up exited with status {code}")),
        None => Err(anyhow!("vagrant up was terminated by a signal")),
    }
}

fn status_of(exit_code: Option<i32>) -> &'static str {
    match exit_code {
        Some(0) => "succeeded",
        _ => "failed",
    }
}
