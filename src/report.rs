//! Human-readable scenario report printed to stdout.
use crate::error::AssertionFailure;
use crate::exec::Classification;
use crate::scenario::{Scenario, ScenarioOrigin};
use std::path::Path;

const SNIPPET_HEAD_LINES: usize = 40;
const SNIPPET_TAIL_LINES: usize = 40;
const SNIPPET_MAX_LINE_BYTES: usize = 2048;

pub fn scenario_header(scenario: &Scenario, manifest: &Path) {
    println!("---");
    println!("Scenario: {}", scenario.title);
    println!("Description: {}", scenario.description);
    println!("Manifest: {}", manifest.display());
    println!("{}", expectation_line(scenario));
}

fn expectation_line(scenario: &Scenario) -> &'static str {
    match (scenario.expect_success, scenario.origin) {
        (true, _) => "Expect success: true",
        (false, ScenarioOrigin::NoRuntime) => "Expecting failure (no runtime available)",
        (false, ScenarioOrigin::Document) => "Expecting failure (expect success: false)",
    }
}

pub fn scenario_footer() {
    println!("---");
}

pub fn executing(command_line: &str) {
    println!("Executing: {command_line}");
}

pub fn passed(classification: &Classification) {
    match classification {
        Classification::FailedAsExpected => println!("✅ Command failed as expected"),
        Classification::ValidHtml => println!("✅ HTML output appears valid"),
        Classification::ParsedOutput => println!("✅ Command succeeded as expected"),
        Classification::Validated { analysis } => {
            println!("✅ {} validation passed", analysis_label(analysis))
        }
    }
}

pub fn failed(failure: &AssertionFailure, verbose: bool) {
    match failure {
        AssertionFailure::StructuralMismatch { analysis, reasons } => {
            for reason in reasons {
                println!("❌ {reason}");
            }
            println!("❌ {} validation failed", analysis_label(analysis));
        }
        AssertionFailure::MalformedOutput { detail, stdout } => {
            println!("❌ {detail}");
            print_stream("Output", stdout, verbose);
        }
        AssertionFailure::UnexpectedExitCode { stdout, stderr, .. } => {
            println!("❌ {failure}");
            print_stream("stdout", stdout, verbose);
            print_stream("stderr", stderr, verbose);
        }
    }
}

fn analysis_label(analysis: &str) -> &str {
    match analysis {
        "component_analysis" => "Component analysis",
        "stack_analysis" => "Stack analysis",
        other => other,
    }
}

fn print_stream(label: &str, text: &str, verbose: bool) {
    if text.trim().is_empty() {
        return;
    }
    let body = if verbose {
        text.to_string()
    } else {
        elide_middle(text, SNIPPET_HEAD_LINES, SNIPPET_TAIL_LINES)
    };
    println!("{label}:");
    println!("{}", body.trim_end());
}

/// Keeps the first `head` and last `tail` lines of a CLI stream.
fn elide_middle(text: &str, head: usize, tail: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= head + tail {
        return lines.into_iter().map(clip_line).collect::<Vec<_>>().join("\n");
    }
    let elided = lines.len() - head - tail;
    let mut kept: Vec<String> = lines[..head].iter().copied().map(clip_line).collect();
    kept.push(format!("[... {elided} lines elided ...]"));
    kept.extend(lines[lines.len() - tail..].iter().copied().map(clip_line));
    kept.join("\n")
}

/// Minified JSON reports arrive as one long line; clip it on a char boundary.
fn clip_line(line: &str) -> String {
    if line.len() <= SNIPPET_MAX_LINE_BYTES {
        return line.to_string();
    }
    let mut end = SNIPPET_MAX_LINE_BYTES;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    format!("{} [... {} bytes clipped]", &line[..end], line.len() - end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_output_is_kept_whole() {
        assert_eq!(elide_middle("a\nb\n", 2, 2), "a\nb");
    }

    #[test]
    fn long_output_keeps_head_and_tail() {
        let text: String = (1..=10).map(|n| format!("line {n}\n")).collect();
        assert_eq!(
            elide_middle(&text, 2, 3),
            "line 1\nline 2\n[... 5 lines elided ...]\nline 8\nline 9\nline 10"
        );
    }

    #[test]
    fn long_lines_are_clipped_on_char_boundaries() {
        let line = format!("{}é tail", "x".repeat(SNIPPET_MAX_LINE_BYTES - 1));
        let clipped = clip_line(&line);
        assert!(clipped.starts_with(&"x".repeat(SNIPPET_MAX_LINE_BYTES - 1)));
        assert!(clipped.ends_with(&format!("[... {} bytes clipped]", 2 + " tail".len())));
    }

    #[test]
    fn no_runtime_scenario_announces_missing_runtime() {
        let scenario = Scenario::no_runtime(Path::new("/scenarios/maven/simple"));
        assert_eq!(
            expectation_line(&scenario),
            "Expecting failure (no runtime available)"
        );

        let mut declared = scenario.clone();
        declared.origin = ScenarioOrigin::Document;
        assert_eq!(
            expectation_line(&declared),
            "Expecting failure (expect success: false)"
        );
        declared.expect_success = true;
        assert_eq!(expectation_line(&declared), "Expect success: true");
    }
}
