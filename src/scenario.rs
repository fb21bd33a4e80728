//! Scenario expectation documents (`spec.yaml`).
//!
//! The document is read once per scenario directory. Provider expectations are
//! classified into single-source or multi-source shape here so the validator
//! never has to re-inspect raw YAML.
use crate::error::HarnessError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const SPEC_FILE_NAME: &str = "spec.yaml";
pub const SCANNED_KEY: &str = "scanned";

#[derive(Debug, Deserialize)]
struct SpecDocument {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    expect_success: bool,
    #[serde(default)]
    component_analysis: Option<Value>,
    #[serde(default)]
    stack_analysis: Option<Value>,
}

/// Where a scenario came from; decides how an expected failure is announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioOrigin {
    /// Loaded from a `spec.yaml` document.
    Document,
    /// Synthesized for a run with every package manager invalidated.
    NoRuntime,
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub path: PathBuf,
    pub origin: ScenarioOrigin,
    pub title: String,
    pub description: String,
    pub expect_success: bool,
    pub component_analysis: Option<ExpectationTree>,
    pub stack_analysis: Option<ExpectationTree>,
}

impl Scenario {
    /// Synthetic scenario for runs that must fail because no package manager
    /// can be located.
    pub fn no_runtime(path: &Path) -> Self {
        Scenario {
            path: path.to_path_buf(),
            origin: ScenarioOrigin::NoRuntime,
            title: "No runtime available".to_string(),
            description: "It fails when no runtime is available".to_string(),
            expect_success: false,
            component_analysis: None,
            stack_analysis: None,
        }
    }

    pub fn expectation(&self, analysis_key: &str) -> Option<&ExpectationTree> {
        match analysis_key {
            "component_analysis" => self.component_analysis.as_ref(),
            "stack_analysis" => self.stack_analysis.as_ref(),
            _ => None,
        }
    }
}

/// Expected analysis result: the `scanned` block plus provider expectations in
/// document order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationTree {
    /// Raw `scanned` entry; the validator reports it when absent or not a mapping.
    pub scanned: Option<Value>,
    pub providers: Vec<(String, ProviderExpectation)>,
    /// The tree as written, for diagnostics.
    pub source: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderExpectation {
    /// Fields expected directly under `providers.<name>.summary`.
    SingleSource(Vec<(String, Value)>),
    /// Per-source fields expected under `providers.<name>.sources.<source>.summary`.
    MultiSource(Vec<(String, Vec<(String, Value)>)>),
}

impl ExpectationTree {
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let entries = value
            .as_object()
            .ok_or_else(|| format!("expected a mapping, found {}", value_kind(value)))?;

        let mut scanned = None;
        let mut providers = Vec::new();
        for (name, entry) in entries {
            if name == SCANNED_KEY {
                scanned = Some(entry.clone());
                continue;
            }
            let provider = ProviderExpectation::from_value(entry)
                .map_err(|detail| format!("provider {name}: {detail}"))?;
            providers.push((name.clone(), provider));
        }
        Ok(ExpectationTree {
            scanned,
            providers,
            source: value.clone(),
        })
    }
}

impl ProviderExpectation {
    fn from_value(value: &Value) -> Result<Self, String> {
        let fields = value
            .as_object()
            .ok_or_else(|| format!("expected a mapping, found {}", value_kind(value)))?;

        if !fields.values().any(Value::is_object) {
            return Ok(ProviderExpectation::SingleSource(field_list(fields)));
        }

        let mut sources = Vec::with_capacity(fields.len());
        for (source_name, source) in fields {
            let source_fields = source.as_object().ok_or_else(|| {
                format!(
                    "source {source_name} must be a mapping when sibling sources are, found {}",
                    value_kind(source)
                )
            })?;
            sources.push((source_name.clone(), field_list(source_fields)));
        }
        Ok(ProviderExpectation::MultiSource(sources))
    }
}

fn field_list(fields: &Map<String, Value>) -> Vec<(String, Value)> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

pub fn load(scenario_dir: &Path) -> Result<Scenario, HarnessError> {
    let spec_path = scenario_dir.join(SPEC_FILE_NAME);
    if !spec_path.is_file() {
        return Err(HarnessError::MissingSpec {
            dir: scenario_dir.to_path_buf(),
        });
    }
    let invalid = |detail: String| HarnessError::InvalidSpec {
        path: spec_path.clone(),
        detail,
    };

    let content = std::fs::read_to_string(&spec_path).map_err(|err| invalid(err.to_string()))?;
    let document: SpecDocument =
        serde_yaml::from_str(&content).map_err(|err| invalid(err.to_string()))?;

    let component_analysis = document
        .component_analysis
        .as_ref()
        .map(ExpectationTree::from_value)
        .transpose()
        .map_err(|detail| invalid(format!("component_analysis: {detail}")))?;
    let stack_analysis = document
        .stack_analysis
        .as_ref()
        .map(ExpectationTree::from_value)
        .transpose()
        .map_err(|detail| invalid(format!("stack_analysis: {detail}")))?;

    Ok(Scenario {
        path: scenario_dir.to_path_buf(),
        origin: ScenarioOrigin::Document,
        title: document.title,
        description: document.description,
        expect_success: document.expect_success,
        component_analysis,
        stack_analysis,
    })
}
