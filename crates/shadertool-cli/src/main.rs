//! Main entrypoint for the `shadertool` binary.

use std::process::ExitCode;

use clap::Parser as _;
use shadertool::{compile::CompileError, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level().as_str()),
    )
    .init();

    match cli.command.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// The process status for `err`, taken from the [`CompileError`] if there is one.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<CompileError>()
        .map_or(1, CompileError::exit_code)
        .try_into()
        .unwrap_or(1)
}
