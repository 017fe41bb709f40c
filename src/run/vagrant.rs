//! Building and running vagrant commands.

use std::{
    collections::BTreeMap,
    io::{self, Write},
    path::Path,
    process::Stdio,
    sync::{Arc, Mutex},
};

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
};
use tracing::info;

use crate::lib::errors::RunnerError;

pub const VAGRANT_PROGRAM: &str = "vagrant";
/// Combined vagrant output lands here, next to the Vagrantfile.
pub const RUN_LOG_FILE: &str = "vagrant.log";

/// Vagrant subcommand to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VagrantAction {
    Up,
    Ssh,
    Destroy { force: bool },
}

/// Build a vagrant command with derived flags and the instance environment.
pub fn build_vagrant_command(
    action: VagrantAction,
    keep_on_error: bool,
    verbose: bool,
    env: &BTreeMap<String, String>,
) -> Command {
    let mut command = Command::new(VAGRANT_PROGRAM);
    command.kill_on_drop(true);
    command.envs(env);

    match action {
        VagrantAction::Up => {
            command.arg("up");
            if keep_on_error {
                command.arg("--no-destroy-on-error");
            }
            if verbose {
                command.arg("--debug");
            }
        }
        VagrantAction::Ssh => {
            command.arg("ssh");
        }
        VagrantAction::Destroy { force } => {
            command.arg("destroy");
            if force {
                command.arg("-f");
            }
        }
    }

    command
}

/// Run a vagrant command while teeing its combined output to `log_path`.
///
/// Returns the tool's exit code; a nonzero code is reported, not swallowed,
/// but the caller decides whether the run continues to teardown and
/// notification.
pub async fn run_with_tee(
    mut command: Command,
    log_path: &Path,
) -> Result<Option<i32>, RunnerError> {
    command.stdout(Stdio::piped()).stderr(Stdio::piped());
    let mut child = command.spawn().map_err(|err| RunnerError::Spawn {
        program: VAGRANT_PROGRAM.to_string(),
        source: err,
    })?;

    let log = std::fs::File::create(log_path).map_err(|err| RunnerError::LogFile {
        path: log_path.to_path_buf(),
        source: err,
    })?;
    let log = Arc::new(Mutex::new(log));

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let out_task = tokio::spawn(tee_lines(stdout, Arc::clone(&log), false));
    let err_task = tokio::spawn(tee_lines(stderr, Arc::clone(&log), true));

    let status = child.wait().await.map_err(|err| RunnerError::Wait { source: err })?;
    join_tee(out_task).await?;
    join_tee(err_task).await?;

    info!(
        target: "devup::vagrant",
        exit_code = status.code(),
        log = %log_path.display(),
        "vagrant exited"
    );
    Ok(status.code())
}

/// Run a vagrant command with inherited stdio, for interactive sessions.
pub async fn run_interactive(mut command: Command) -> Result<Option<i32>, RunnerError> {
    let status = command.status().await.map_err(|err| RunnerError::Spawn {
        program: VAGRANT_PROGRAM.to_string(),
        source: err,
    })?;
    Ok(status.code())
}

async fn tee_lines<R>(
    reader: Option<R>,
    log: Arc<Mutex<std::fs::File>>,
    to_stderr: bool,
) -> Result<(), RunnerError>
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return Ok(());
    };
    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|err| RunnerError::Stream { source: err })?
    {
        if to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
        let mut file = log.lock().map_err(|_| RunnerError::Stream {
            source: io::Error::other("log writer lock poisoned"),
        })?;
        writeln!(file, "{line}").map_err(|err| RunnerError::Stream { source: err })?;
    }
    Ok(())
}

async fn join_tee(
    task: tokio::task::JoinHandle<Result<(), RunnerError>>,
) -> Result<(), RunnerError> {
    task.await.map_err(|err| RunnerError::Stream {
        source: io::Error::other(err.to_string()),
    })?
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::ffi::OsStr;

    use super::*;

    fn args_of(command: &Command) -> Vec<String> {
        command
            .as_std()
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn up_command_derives_flags_from_booleans() {
        let env = BTreeMap::new();
        let plain = build_vagrant_command(VagrantAction::Up, false, false, &env);
        assert_eq!(args_of(&plain), vec!["up"]);

        let keep = build_vagrant_command(VagrantAction::Up, true, false, &env);
        assert_eq!(args_of(&keep), vec!["up", "--no-destroy-on-error"]);

        let both = build_vagrant_command(VagrantAction::Up, true, true, &env);
        assert_eq!(args_of(&both), vec!["up", "--no-destroy-on-error", "--debug"]);
    }

    #[test]
    fn destroy_command_forces_only_when_asked() {
        let env = BTreeMap::new();
        let forced = build_vagrant_command(VagrantAction::Destroy { force: true }, false, false, &env);
        assert_eq!(args_of(&forced), vec!["destroy", "-f"]);

        let plain = build_vagrant_command(VagrantAction::Destroy { force: false }, false, false, &env);
        assert_eq!(args_of(&plain), vec!["destroy"]);
    }

    #[test]
    fn environment_map_travels_with_the_command() {
        let mut env = BTreeMap::new();
        env.insert("VAGRANT_AWS_REGION".to_string(), "us-east-1".to_string());
        let command = build_vagrant_command(VagrantAction::Up, false, false, &env);

        let value = command
            .as_std()
            .get_envs()
            .find(|(key, _)| *key == OsStr::new("VAGRANT_AWS_REGION"))
            .and_then(|(_, value)| value)
            .map(|value| value.to_string_lossy().into_owned());
        assert_eq!(value.as_deref(), Some("us-east-1"));
    }
}
