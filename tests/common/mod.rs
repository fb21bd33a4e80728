//! Shared test infrastructure for integration tests.
//!
//! Each fixture is a temp tree holding a scenarios root, a CLI location and a
//! `bin/` directory with a fake `java` launcher (and `npx` when a test adds
//! one). Launchers log their argv and replay canned responses, so the harness
//! can be driven end to end without a JVM, Node or the real CLI.
//!
//! `java -jar <jar>` and `npx --yes <archive>` both put the CLI subcommand in
//! `$3`, so one script serves either launcher.
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Launcher that fails like the real CLI when runtime detection is invalidated.
pub const RUNTIME_AWARE_LAUNCHER: &str = r#"#!/bin/sh
here="$(dirname "$0")"
echo "$*" >> "$here/invocations.log"
if [ "$EXHORT_MVN_PATH" = "INVALID" ] && [ "$TRUSTIFY_DA_MVN_PATH" = "INVALID" ]; then
  echo "Cannot find mvn executable" >&2
  exit 1
fi
responses="$here/responses"
case "$3" in
  component) cat "$responses/component.json" ;;
  stack)
    case "$5" in
      --summary) cat "$responses/summary.json" ;;
      --html) cat "$responses/report.html" ;;
      *) cat "$responses/stack.json" ;;
    esac
    ;;
  *)
    echo "unknown command $3" >&2
    exit 2
    ;;
esac
"#;

/// Launcher that succeeds no matter what the environment says.
pub const RUNTIME_BLIND_LAUNCHER: &str = r#"#!/bin/sh
here="$(dirname "$0")"
echo "$*" >> "$here/invocations.log"
echo '{}'
"#;

pub const SIMPLE_SPEC: &str = r#"title: Simple
description: Direct dependencies only
expect_success: true
component_analysis:
  scanned:
    total: 2
    direct: 2
    transitive: 0
  tpa:
    total: 1
    critical: 1
stack_analysis:
  scanned:
    total: 5
    direct: 2
    transitive: 3
  tpa:
    osv-github:
      total: 3
    redhat-csaf:
      total: 0
"#;

pub const COMPONENT_REPORT: &str = r#"{
  "scanned": { "total": 2, "direct": 2, "transitive": 0 },
  "providers": {
    "tpa": { "status": { "ok": true }, "summary": { "total": 1, "critical": 1, "high": 0 } }
  }
}"#;

pub const STACK_REPORT: &str = r#"{
  "scanned": { "total": 5, "direct": 2, "transitive": 3 },
  "providers": {
    "tpa": {
      "sources": {
        "osv-github": { "summary": { "total": 3, "direct": 1 } },
        "redhat-csaf": { "summary": { "total": 0 } }
      }
    }
  }
}"#;

pub const SUMMARY_REPORT: &str = r#"{ "tpa": { "osv-github": { "total": 3 } } }"#;

pub const HTML_REPORT: &str = "<!DOCTYPE html>\n<html><body>report</body></html>\n";

pub struct Fixture {
    pub root: TempDir,
}

impl Fixture {
    pub fn new(java_script: &str) -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let fixture = Fixture { root };
        fs::create_dir_all(fixture.cli_dir()).expect("create cli dir");
        fs::create_dir_all(fixture.scenarios_root()).expect("create scenarios root");
        fs::create_dir_all(fixture.bin_dir().join("responses")).expect("create responses dir");
        fixture.write_launcher("java", java_script);
        fixture.respond(COMPONENT_REPORT, STACK_REPORT, SUMMARY_REPORT, HTML_REPORT);
        fixture
    }

    pub fn cli_dir(&self) -> PathBuf {
        self.root.path().join("dist")
    }

    pub fn scenarios_root(&self) -> PathBuf {
        self.root.path().join("scenarios")
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    pub fn write_launcher(&self, name: &str, script: &str) {
        let path = self.bin_dir().join(name);
        fs::write(&path, script).expect("write launcher");
        let mut permissions = fs::metadata(&path).expect("launcher metadata").permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&path, permissions).expect("chmod launcher");
    }

    pub fn respond(&self, component: &str, stack: &str, summary: &str, html: &str) {
        let responses = self.bin_dir().join("responses");
        fs::write(responses.join("component.json"), component).expect("write component");
        fs::write(responses.join("stack.json"), stack).expect("write stack");
        fs::write(responses.join("summary.json"), summary).expect("write summary");
        fs::write(responses.join("report.html"), html).expect("write html");
    }

    /// Creates `<runtime_dir>/<name>` with a manifest and, if given, a spec.
    pub fn add_scenario(
        &self,
        runtime_dir: &str,
        name: &str,
        manifest: &str,
        spec: Option<&str>,
    ) -> PathBuf {
        let dir = self.scenarios_root().join(runtime_dir).join(name);
        fs::create_dir_all(&dir).expect("create scenario dir");
        fs::write(dir.join(manifest), "<project/>\n").expect("write manifest");
        if let Some(spec) = spec {
            fs::write(dir.join("spec.yaml"), spec).expect("write spec");
        }
        dir
    }

    pub fn invocations(&self) -> Vec<String> {
        match fs::read_to_string(self.bin_dir().join("invocations.log")) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Runs the harness with the fixture's `bin/` first on `PATH` and the
    /// runtime path variables cleared.
    pub fn run(&self, args: &[&str]) -> Output {
        let inherited = std::env::var_os("PATH").unwrap_or_default();
        let mut paths = vec![self.bin_dir()];
        paths.extend(std::env::split_paths(&inherited));
        let path = std::env::join_paths(paths).expect("join PATH");
        self.run_with_path(args, &path)
    }

    pub fn run_with_path(&self, args: &[&str], path: &std::ffi::OsStr) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_da-acceptance"));
        command
            .args(args)
            .env("PATH", path)
            .env_remove("RUST_LOG")
            .env_remove("DA_ACCEPTANCE_SCENARIOS");
        for prefix in ["EXHORT", "TRUSTIFY_DA"] {
            for pm in ["MVN", "NPM", "PIP", "GRADLE", "GO", "YARN", "PNPM"] {
                command.env_remove(format!("{prefix}_{pm}_PATH"));
            }
        }
        command.output().expect("run da-acceptance")
    }

    /// `java <cli> <runtime> --scenarios-root <root>` plus `extra`.
    pub fn run_java(&self, runtime: &str, extra: &[&str]) -> Output {
        self.run_language("java", runtime, extra)
    }

    /// Same as [`Fixture::run_java`] for the packaged javascript client.
    pub fn run_javascript(&self, runtime: &str, extra: &[&str]) -> Output {
        self.run_language("javascript", runtime, extra)
    }

    fn run_language(&self, language: &str, runtime: &str, extra: &[&str]) -> Output {
        let cli = self.cli_dir().display().to_string();
        let root = self.scenarios_root().display().to_string();
        let mut args = vec![
            language,
            cli.as_str(),
            runtime,
            "--scenarios-root",
            root.as_str(),
        ];
        args.extend_from_slice(extra);
        self.run(&args)
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn assert_exit(output: &Output, expected: i32) {
    assert_eq!(
        output.status.code(),
        Some(expected),
        "stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
}
