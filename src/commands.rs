//! Command matrix construction.
//!
//! Every scenario runs the same four CLI invocations in a fixed order. The
//! builder only assembles argv vectors from already-resolved inputs; nothing
//! here spawns processes.
use crate::error::HarnessError;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Client flavour of the CLI under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// Packaged `cli.tgz` executed through `npx`.
    JavaScript,
    /// `cli.jar` executed through `java -jar`.
    Java,
}

impl FromStr for Language {
    type Err = HarnessError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "javascript" => Ok(Language::JavaScript),
            "java" => Ok(Language::Java),
            other => Err(HarnessError::UnsupportedLanguage {
                language: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::JavaScript => f.write_str("javascript"),
            Language::Java => f.write_str("java"),
        }
    }
}

/// Which analysis an invocation performs, and in which output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Component,
    Stack,
    StackSummary,
    StackHtml,
}

impl CommandKind {
    pub const ALL: [CommandKind; 4] = [
        CommandKind::Component,
        CommandKind::Stack,
        CommandKind::StackSummary,
        CommandKind::StackHtml,
    ];

    fn cli_args(self) -> &'static [&'static str] {
        match self {
            CommandKind::Component => &["component"],
            CommandKind::Stack => &["stack"],
            CommandKind::StackSummary => &["stack"],
            CommandKind::StackHtml => &["stack"],
        }
    }

    fn trailing_flag(self) -> Option<&'static str> {
        match self {
            CommandKind::StackSummary => Some("--summary"),
            CommandKind::StackHtml => Some("--html"),
            CommandKind::Component | CommandKind::Stack => None,
        }
    }

    /// Expectation key used for structural validation, if the output is a
    /// full analysis report.
    pub fn analysis_key(self) -> Option<&'static str> {
        match self {
            CommandKind::Component => Some("component_analysis"),
            CommandKind::Stack => Some("stack_analysis"),
            CommandKind::StackSummary | CommandKind::StackHtml => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCommand {
    pub kind: CommandKind,
    pub program: String,
    pub args: Vec<String>,
}

impl PlannedCommand {
    /// Shell-invocable rendering, quoting only where needed.
    pub fn command_line(&self) -> String {
        shell_words::join(std::iter::once(&self.program).chain(self.args.iter()))
    }
}

pub fn build_commands(
    language: Language,
    cli_location: &Path,
    scenario_dir: &Path,
    manifest_file_name: &str,
) -> Vec<PlannedCommand> {
    let (cli_location, scenario_dir) = if cfg!(windows) {
        (drive_rooted(cli_location), drive_rooted(scenario_dir))
    } else {
        (cli_location.to_path_buf(), scenario_dir.to_path_buf())
    };
    let cli_path = normalize_path(&cli_location);
    let manifest_arg = native_path(&normalize_path(&scenario_dir).join(manifest_file_name));

    let (program, prefix) = match language {
        Language::JavaScript => ("npx", vec!["--yes".to_string(), archive_url(&cli_path)]),
        Language::Java => {
            let jar = native_path(&cli_path.join("cli.jar"));
            ("java", vec!["-jar".to_string(), jar])
        }
    };

    CommandKind::ALL
        .iter()
        .map(|&kind| {
            let mut args = prefix.clone();
            args.extend(kind.cli_args().iter().map(|arg| arg.to_string()));
            args.push(manifest_arg.clone());
            if let Some(flag) = kind.trailing_flag() {
                args.push(flag.to_string());
            }
            PlannedCommand {
                kind,
                program: program.to_string(),
                args,
            }
        })
        .collect()
}

/// Absolute form of `path`, resolving symlinks and `..` when it exists.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Platform-native display form without the Windows verbatim prefix.
fn native_path(path: &Path) -> String {
    let rendered = path.display().to_string();
    match rendered.strip_prefix(r"\\?\") {
        Some(stripped) => stripped.to_string(),
        None => rendered,
    }
}

/// Forward-slash form suitable for embedding in a `file://` URL.
pub fn url_path(path: &Path) -> String {
    native_path(path).replace('\\', "/")
}

/// `file:///` URL of the packaged CLI archive inside `cli_dir`.
fn archive_url(cli_dir: &Path) -> String {
    format!(
        "file:///{}/cli.tgz",
        url_path(cli_dir).trim_start_matches('/')
    )
}

/// Drive-letter form of a path given the MSYS way (`/c/Users/x`). Must run
/// before normalization, which would otherwise root it on the current drive.
pub fn drive_rooted(path: &Path) -> PathBuf {
    let forward = path.to_string_lossy().replace('\\', "/");
    match posix_root_to_drive(&forward) {
        Some(drive_form) => PathBuf::from(drive_form),
        None => path.to_path_buf(),
    }
}

/// Rewrites a POSIX-rooted drive path (`/c/Users/x`, as produced by MSYS-style
/// shells) to drive-letter form (`C:/Users/x`).
pub fn posix_root_to_drive(path: &str) -> Option<String> {
    let pattern = Regex::new(r"^/([A-Za-z])(/|$)").ok()?;
    let captures = pattern.captures(path)?;
    let drive = captures.get(1)?.as_str().to_ascii_uppercase();
    let rest = &path[captures.get(0)?.end()..];
    Some(format!("{drive}:/{rest}"))
}
