//! Entry point for devup.
use std::process::ExitCode;

use clap::Parser;
use devup::{cli::DevupArgs, lib::telemetry, run};

#[tokio::main]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("devup: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn bootstrap() -> anyhow::Result<()> {
    telemetry::init_tracing()?;
    let args = DevupArgs::parse();
    let profile = args.into_profile()?;
    run::execute(profile).await
}
