//! Command execution and outcome classification.
use crate::commands::{CommandKind, PlannedCommand};
use crate::error::{AssertionFailure, HarnessError};
use crate::sandbox::EnvOverlay;
use crate::scenario::Scenario;
use crate::validator::validate;
use serde_json::Value;
use std::process::Command;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// What a passing command demonstrated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    FailedAsExpected,
    ValidHtml,
    /// Structured output parsed; summary output is not compared further.
    ParsedOutput,
    Validated { analysis: &'static str },
}

/// Runs `command` directly (no shell), resolving the launcher on `PATH`.
pub fn execute(
    command: &PlannedCommand,
    overlay: Option<&EnvOverlay>,
) -> Result<CommandOutcome, HarnessError> {
    let command_line = command.command_line();
    let launch_error = |detail: String| HarnessError::ProcessLaunch {
        command: command_line.clone(),
        detail,
    };

    let program = which::which(&command.program)
        .map_err(|err| launch_error(format!("resolve {}: {err}", command.program)))?;
    let mut process = Command::new(&program);
    process.args(&command.args);
    if let Some(overlay) = overlay {
        overlay.apply(&mut process);
    }

    let start = Instant::now();
    let output = process
        .output()
        .map_err(|err| launch_error(err.to_string()))?;
    tracing::info!(
        program = %program.display(),
        overrides = overlay.map_or(0, |overlay| overlay.vars().len()),
        exit_code = ?output.status.code(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        stdout_bytes = output.stdout.len(),
        "command complete"
    );

    Ok(CommandOutcome {
        command: command_line,
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Applies the scenario's success polarity and routes successful output to
/// the HTML check or the structural validator.
pub fn classify(
    outcome: &CommandOutcome,
    scenario: &Scenario,
    kind: CommandKind,
) -> Result<Classification, AssertionFailure> {
    if outcome.succeeded() != scenario.expect_success {
        return Err(AssertionFailure::UnexpectedExitCode {
            expect_success: scenario.expect_success,
            exit_code: outcome.exit_code,
            stdout: outcome.stdout.clone(),
            stderr: outcome.stderr.clone(),
        });
    }
    if !scenario.expect_success {
        return Ok(Classification::FailedAsExpected);
    }

    if kind == CommandKind::StackHtml {
        check_html(&outcome.stdout).map_err(|detail| AssertionFailure::MalformedOutput {
            detail,
            stdout: outcome.stdout.clone(),
        })?;
        return Ok(Classification::ValidHtml);
    }

    let output: Value =
        serde_json::from_str(&outcome.stdout).map_err(|err| AssertionFailure::MalformedOutput {
            detail: format!("failed to parse command output as JSON: {err}"),
            stdout: outcome.stdout.clone(),
        })?;

    let Some(analysis) = kind.analysis_key() else {
        return Ok(Classification::ParsedOutput);
    };
    let Some(expected) = scenario.expectation(analysis) else {
        return Err(AssertionFailure::StructuralMismatch {
            analysis: analysis.to_string(),
            reasons: vec![format!("scenario declares no {analysis} expectation")],
        });
    };

    tracing::debug!(
        analysis,
        output = %serde_json::to_string_pretty(&output).unwrap_or_default(),
        "validating output structure"
    );
    tracing::debug!(
        analysis,
        expected = %serde_json::to_string_pretty(&expected.source).unwrap_or_default(),
        "expected structure"
    );

    let verdict = validate(&output, expected, analysis);
    if !verdict.passed() {
        return Err(AssertionFailure::StructuralMismatch {
            analysis: analysis.to_string(),
            reasons: verdict.reasons,
        });
    }
    Ok(Classification::Validated { analysis })
}

/// HTML sanity check: non-empty and opening with a doctype or `<html` tag.
pub fn check_html(output: &str) -> Result<(), String> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Err("HTML output is empty".to_string());
    }
    let head = trimmed.chars().take(16).collect::<String>().to_lowercase();
    if head.starts_with("<!doctype html") || head.starts_with("<html") {
        Ok(())
    } else {
        Err("output doesn't appear to be valid HTML".to_string())
    }
}
