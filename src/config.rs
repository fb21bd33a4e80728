//! Effective harness configuration.
use crate::cli::{EnvStrategy, RootArgs};
use crate::commands::Language;
use crate::error::HarnessError;
use std::path::{Path, PathBuf};

/// Environment fallback for `--scenarios-root`.
pub const SCENARIOS_ROOT_ENV: &str = "DA_ACCEPTANCE_SCENARIOS";
pub const DEFAULT_SCENARIOS_ROOT: &str = "scenarios";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Normal,
    NoRuntime,
}

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub language: Language,
    pub cli_location: PathBuf,
    pub runtime: String,
    pub mode: RunMode,
    pub scenarios_root: PathBuf,
    pub env_strategy: EnvStrategy,
    pub dry_run: bool,
    pub verbose: bool,
}

impl HarnessConfig {
    pub fn from_args(args: &RootArgs) -> Result<Self, HarnessError> {
        let language = args.language.parse::<Language>()?;
        let mode = if args.no_runtime {
            RunMode::NoRuntime
        } else {
            RunMode::Normal
        };
        let env_root = std::env::var(SCENARIOS_ROOT_ENV).ok();
        Ok(HarnessConfig {
            language,
            cli_location: args.cli_location.clone(),
            runtime: args.runtime.clone(),
            mode,
            scenarios_root: resolve_scenarios_root(args.scenarios_root.as_deref(), env_root),
            env_strategy: args.env_strategy,
            dry_run: args.dry_run,
            verbose: args.verbose,
        })
    }
}

/// Explicit flag > environment variable > `./scenarios`.
fn resolve_scenarios_root(explicit: Option<&Path>, env_value: Option<String>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| {
            env_value
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENARIOS_ROOT))
}
