//! Failure taxonomy for the harness.
//!
//! `HarnessError` covers configuration and process-level problems that abort a
//! scenario outright. `AssertionFailure` covers a CLI that ran but did not
//! behave as the scenario declares; those carry the diagnostic detail printed
//! in the report.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("unknown or unsupported runtime: {runtime}")]
    UnsupportedRuntime { runtime: String },
    #[error("unknown language: {language}")]
    UnsupportedLanguage { language: String },
    #[error("no spec.yaml found for scenario: {}", dir.display())]
    MissingSpec { dir: PathBuf },
    #[error("invalid spec {}: {detail}", path.display())]
    InvalidSpec { path: PathBuf, detail: String },
    #[error("failed to launch `{command}`: {detail}")]
    ProcessLaunch { command: String, detail: String },
}

#[derive(Debug, Error)]
pub enum AssertionFailure {
    #[error("malformed output: {detail}")]
    MalformedOutput { detail: String, stdout: String },
    #[error("{analysis} validation failed: {}", reasons.join("; "))]
    StructuralMismatch {
        analysis: String,
        reasons: Vec<String>,
    },
    #[error("{}", unexpected_exit_summary(*expect_success, *exit_code))]
    UnexpectedExitCode {
        expect_success: bool,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

fn unexpected_exit_summary(expect_success: bool, exit_code: Option<i32>) -> String {
    let observed = match exit_code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    };
    if expect_success {
        format!("expected success but command failed with {observed}")
    } else {
        "expected failure but command succeeded".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_exit_reads_as_polarity_violation() {
        let failure = AssertionFailure::UnexpectedExitCode {
            expect_success: true,
            exit_code: Some(3),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(
            failure.to_string(),
            "expected success but command failed with exit code 3"
        );

        let failure = AssertionFailure::UnexpectedExitCode {
            expect_success: false,
            exit_code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(failure.to_string(), "expected failure but command succeeded");
    }

    #[test]
    fn structural_mismatch_joins_every_reason() {
        let failure = AssertionFailure::StructuralMismatch {
            analysis: "stack_analysis".to_string(),
            reasons: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(failure.to_string(), "stack_analysis validation failed: a; b");
    }
}
