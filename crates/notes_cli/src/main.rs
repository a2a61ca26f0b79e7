//! Terminal notes client.
//!
//! # Responsibility
//! - Wire configuration, logging, the HTTP remote and the sync controller.
//! - Hand control to the interactive loop once the initial load succeeded.

mod args;
mod repl;

use args::Args;
use clap::Parser;
use log::{error, info};
use notes_core::{init_logging, HttpNoteRemote, SyncController};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), String> {
    let level = args.log_level().map_err(|err| err.to_string())?;
    init_logging(level, &args.log_dir()).map_err(|err| err.to_string())?;

    let config = args.client_config().map_err(|err| err.to_string())?;
    let remote = HttpNoteRemote::new(&config).map_err(|err| err.to_string())?;
    let controller = Arc::new(SyncController::new(remote, &config));

    info!(
        "event=cli_start module=cli base_url={} importance={} core_version={}",
        config.base_url,
        config.importance,
        notes_core::core_version()
    );

    if let Err(err) = controller.load().await {
        error!("event=cli_abort module=cli reason=load_failed");
        return Err(err.to_string());
    }

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    repl::run(controller, input)
        .await
        .map_err(|err| format!("terminal i/o failed: {err}"))?;
    info!("event=cli_exit module=cli status=ok");
    Ok(())
}
