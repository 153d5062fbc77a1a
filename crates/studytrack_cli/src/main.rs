//! `studytrack` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the selected store.
//! - Hand the parsed command to `commands::execute`.

mod args;
mod commands;
mod prompt;
mod render;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use log::{info, warn};
use std::io;
use std::process::ExitCode;
use studytrack_core::{
    init_logging, AppConfig, JsonFileStore, SnapshotCourseRepository, SqliteStore,
    StorageBackend, StudyService,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::resolve(cli.config_overrides());
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "failed to create data directory `{}`",
            config.data_dir.display()
        )
    })?;

    // Logging is diagnostics only; a broken log dir must not block study edits.
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok backend={} version={}",
        config.backend,
        studytrack_core::core_version()
    );

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    let store_path = config.store_path();

    let result = match config.backend {
        StorageBackend::Sqlite => {
            let store = SqliteStore::open(&store_path)
                .with_context(|| format!("failed to open `{}`", store_path.display()))?;
            let service = StudyService::new(SnapshotCourseRepository::new(store));
            commands::execute(&service, cli.command, &mut input, &mut out)
        }
        StorageBackend::Json => {
            let store = JsonFileStore::new(&store_path);
            let service = StudyService::new(SnapshotCourseRepository::new(store));
            commands::execute(&service, cli.command, &mut input, &mut out)
        }
    };

    if let Err(err) = &result {
        warn!("event=cli_command module=cli status=error error={err}");
    }
    result
}
