//! `cursus` command-line entry point.

mod cli;
mod commands;
mod error;

use clap::Parser;
use cli::Cli;
use cursus_core::{default_log_level, init_logging, init_stderr_logging};
use error::{CliError, CliResult};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = start_logging(cli.log_level.as_deref(), cli.log_dir.as_deref())
        .and_then(|()| commands::run(cli.command));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn start_logging(level: Option<&str>, log_dir: Option<&Path>) -> CliResult<()> {
    let level = level.unwrap_or_else(|| default_log_level());
    let started = match log_dir {
        Some(dir) => {
            let absolute = if dir.is_absolute() {
                dir.to_path_buf()
            } else {
                std::env::current_dir()
                    .map_err(|source| CliError::Io {
                        path: dir.to_path_buf(),
                        source,
                    })?
                    .join(dir)
            };
            init_logging(level, &absolute.to_string_lossy())
        }
        None => init_stderr_logging(level),
    };
    started.map_err(CliError::Logging)
}
