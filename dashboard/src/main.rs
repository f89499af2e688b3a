//! Release board client - Entry Point
//!
//! Command line front end for the release board backend: deployment
//! schedules, release notes and post-deployment reviews.

use std::process::ExitCode;

use anyhow::Context;
use tracing::{debug, error};

use relboard::app::options::AppOptions;
use relboard::app::state::AppState;
use relboard::logs::init_logging;
use relboard::shell::args::CliArgs;
use relboard::shell::commands;
use relboard::shell::render;
use relboard::storage::layout::StorageLayout;
use relboard::storage::settings::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse(std::env::args().skip(1));

    if args.has("help") || args.has("h") {
        println!("{}", commands::USAGE);
        return ExitCode::SUCCESS;
    }
    if args.has("version") {
        println!("relboard {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let (state, _log_guard) = match init(&args).await {
        Ok(initialized) => initialized,
        Err(e) => {
            eprintln!("relboard: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = commands::run(&state, &args).await;
    state.shutdown();

    if let Ok(output) = &result {
        print!("{}", output);
    }
    for notice in state.toasts.drain() {
        eprintln!("{}", render::notice(&notice));
    }

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Command failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn init(
    args: &CliArgs,
) -> anyhow::Result<(AppState, Option<tracing_appender::non_blocking::WorkerGuard>)> {
    let layout = StorageLayout::default();

    // Retrieve the settings file, defaults when there is none
    let settings_file = layout.settings_file();
    let settings = settings_file
        .read_json_opt::<Settings>()
        .await
        .with_context(|| format!("Unable to read {}", settings_file.path().display()))?
        .unwrap_or_default();

    let mut options = AppOptions::from_settings(layout, &settings)?;
    options.apply_overrides(args)?;

    // Initialize logging
    let guard = init_logging(options.logging.clone()).context("Failed to initialize logging")?;

    let state = AppState::init(&options).map_err(|e| {
        error!("Failed to initialize: {}", e);
        e
    })?;
    Ok((state, guard))
}
