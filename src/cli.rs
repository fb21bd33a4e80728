//! CLI argument parsing for the acceptance harness.
//!
//! The positional surface matches the CI entrypoints: language, CLI location,
//! runtime. Everything else is optional and defaults to the CI behavior.
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "da-acceptance",
    version,
    about = "Run dependency analytics CLI acceptance scenarios for one runtime",
    after_help = concat!(
        "Examples:\n",
        "  da-acceptance java ./dist maven\n",
        "  da-acceptance javascript ./dist npm --scenarios-root ./scenarios\n",
        "  da-acceptance java ./dist python-3.11 --no-runtime"
    )
)]
pub struct RootArgs {
    /// Client flavour of the CLI under test (javascript or java)
    #[arg(value_name = "LANGUAGE")]
    pub language: String,

    /// Directory holding cli.tgz (javascript) or cli.jar (java)
    #[arg(value_name = "CLI_LOCATION")]
    pub cli_location: PathBuf,

    /// Runtime whose scenarios to run (maven, gradle-kotlin, npm, python-3.11, go, ...)
    #[arg(value_name = "RUNTIME")]
    pub runtime: String,

    /// Expect every command to fail because no package manager can be located
    #[arg(long)]
    pub no_runtime: bool,

    /// Root directory holding per-runtime scenario directories
    #[arg(long, value_name = "DIR")]
    pub scenarios_root: Option<PathBuf>,

    /// How runtime path variables are invalidated in --no-runtime mode
    #[arg(long, value_enum, default_value_t = EnvStrategy::Overlay, requires = "no_runtime")]
    pub env_strategy: EnvStrategy,

    /// Print the command matrix per scenario without executing it
    #[arg(long)]
    pub dry_run: bool,

    /// Emit debug diagnostics, including output and expected structures
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvStrategy {
    /// Pass invalid values to each child process only
    Overlay,
    /// Mutate the harness environment around each command, then restore it
    Process,
}
