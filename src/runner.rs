//! Scenario suite driver.
//!
//! Scenarios run one at a time and commands within a scenario run in matrix
//! order. The first failing scenario stops the run.
use crate::cli::EnvStrategy;
use crate::commands::{build_commands, normalize_path, PlannedCommand};
use crate::config::{HarnessConfig, RunMode};
use crate::exec::{classify, execute, CommandOutcome};
use crate::report;
use crate::runtime::{self, RuntimeDescriptor, RuntimeSupport};
use crate::sandbox::{runtime_env_var_names, with_invalidated_runtime_env, EnvOverlay};
use crate::scenario::{self, Scenario, SPEC_FILE_NAME};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Scenario directory used for no-runtime runs.
pub const NO_RUNTIME_SCENARIO: &str = "simple";

/// Returns `Ok(true)` when every scenario passed (or there was nothing to run).
/// Configuration and launch problems surface as errors.
pub fn run(config: &HarnessConfig) -> Result<bool> {
    let support = runtime::resolve(&config.runtime)?;
    tracing::debug!(
        runtime = %config.runtime,
        manifest = support.manifest_file_name(),
        package_manager = support.package_manager_id().unwrap_or("-"),
        "resolved runtime"
    );
    let descriptor = match support {
        RuntimeSupport::Supported(descriptor) => descriptor,
        RuntimeSupport::Pending { runtime_id } => {
            println!("Integration tests are not yet supported for {runtime_id}; skipping");
            return Ok(true);
        }
    };

    let base_dir = config.scenarios_root.join(&descriptor.scenario_base_dir);
    if !base_dir.is_dir() {
        println!("No scenarios found for runtime: {}", config.runtime);
        return Ok(true);
    }

    match config.mode {
        RunMode::Normal => run_suite(config, &descriptor, &base_dir),
        RunMode::NoRuntime => run_no_runtime(config, &descriptor, &base_dir),
    }
}

fn run_suite(
    config: &HarnessConfig,
    descriptor: &RuntimeDescriptor,
    base_dir: &Path,
) -> Result<bool> {
    let scenario_dirs = discover_scenarios(base_dir)?;
    tracing::info!(
        runtime = %descriptor.runtime_id,
        count = scenario_dirs.len(),
        base_dir = %base_dir.display(),
        "discovered scenarios"
    );

    for dir in scenario_dirs {
        let scenario = scenario::load(&normalize_path(&dir))?;
        if !run_scenario(config, descriptor, &scenario, None)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn run_no_runtime(
    config: &HarnessConfig,
    descriptor: &RuntimeDescriptor,
    base_dir: &Path,
) -> Result<bool> {
    let scenario_dir = base_dir.join(NO_RUNTIME_SCENARIO);
    if !scenario_dir.is_dir() {
        println!(
            "{} scenario not found for runtime: {}",
            NO_RUNTIME_SCENARIO, config.runtime
        );
        return Ok(true);
    }
    let scenario = Scenario::no_runtime(&normalize_path(&scenario_dir));
    run_scenario(config, descriptor, &scenario, Some(config.env_strategy))
}

/// Scenario directories under `base_dir` that carry a spec, in name order.
fn discover_scenarios(base_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(base_dir)
        .with_context(|| format!("read scenarios dir {}", base_dir.display()))?;
    let mut dirs = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("read entry in {}", base_dir.display()))?
            .path();
        if path.is_dir() && path.join(SPEC_FILE_NAME).is_file() {
            dirs.push(path);
        } else if path.is_dir() {
            tracing::debug!(dir = %path.display(), "skipping directory without spec");
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// `invalidate` is set for no-runtime runs and picks how runtime path
/// variables reach the child.
fn run_scenario(
    config: &HarnessConfig,
    descriptor: &RuntimeDescriptor,
    scenario: &Scenario,
    invalidate: Option<EnvStrategy>,
) -> Result<bool> {
    let manifest = scenario.path.join(&descriptor.manifest_file_name);
    report::scenario_header(scenario, &manifest);

    let commands = build_commands(
        config.language,
        &config.cli_location,
        &scenario.path,
        &descriptor.manifest_file_name,
    );

    for command in &commands {
        if config.dry_run {
            println!("Would execute: {}", command.command_line());
            continue;
        }
        report::executing(&command.command_line());
        let outcome = execute_with_strategy(command, descriptor, invalidate)?;
        match classify(&outcome, scenario, command.kind) {
            Ok(classification) => report::passed(&classification),
            Err(failure) => {
                tracing::warn!(command = %outcome.command, "assertion failed");
                report::failed(&failure, config.verbose);
                return Ok(false);
            }
        }
    }

    report::scenario_footer();
    Ok(true)
}

fn execute_with_strategy(
    command: &PlannedCommand,
    descriptor: &RuntimeDescriptor,
    invalidate: Option<EnvStrategy>,
) -> Result<CommandOutcome> {
    let outcome = match invalidate {
        None => execute(command, None)?,
        Some(EnvStrategy::Overlay) => {
            let overlay = EnvOverlay::invalidated(&runtime_env_var_names(descriptor));
            execute(command, Some(&overlay))?
        }
        Some(EnvStrategy::Process) => {
            with_invalidated_runtime_env(descriptor, || execute(command, None))?
        }
    };
    Ok(outcome)
}
