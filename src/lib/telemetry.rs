//! Telemetry initialization and run span helpers.

use std::time::Instant;

use anyhow::Result;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Initialize `tracing` and format developer logs.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper to record start and finish of one vagrant invocation.
pub struct RunSpan {
    span: Span,
    started_at: Instant,
    run_id: Uuid,
}

impl RunSpan {
    /// Start a run span.
    pub fn start(action: &'static str) -> Self {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            target: "devup::vagrant",
            "vagrant_run",
            %run_id,
            action
        );
        Self {
            span,
            started_at: Instant::now(),
            run_id,
        }
    }

    /// Close the span while recording status and completion info.
    pub fn finish(self, status: &'static str, exit_code: Option<i32>) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "devup::vagrant",
            run_id = %self.run_id,
            status = status,
            exit_code = exit_code,
            elapsed_ms = elapsed_ms,
            "Completed vagrant invocation"
        );
    }
}
