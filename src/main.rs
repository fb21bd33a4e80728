use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod logging;
mod report;
mod runner;
mod runtime;
mod sandbox;
mod scenario;
mod validator;

use cli::RootArgs;
use config::HarnessConfig;

fn main() -> ExitCode {
    let args = match RootArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            // Usage errors exit 1 like any other failed run; --help/--version exit 0.
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    logging::init_subscriber(args.verbose);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("❌ {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &RootArgs) -> anyhow::Result<bool> {
    let config = HarnessConfig::from_args(args)?;
    tracing::debug!(
        language = %config.language,
        runtime = %config.runtime,
        mode = ?config.mode,
        scenarios_root = %config.scenarios_root.display(),
        "harness configured"
    );
    runner::run(&config)
}
