//! Structural comparison of analysis reports against scenario expectations.
//!
//! The actual report is arbitrary JSON; only the paths named by the expectation
//! are inspected, so extra fields in the report never cause a failure. Every
//! mismatch is collected. A missing key only stops comparison of the subtree
//! that hangs below it.
use crate::scenario::{value_kind, ExpectationTree, ProviderExpectation};
use serde_json::{Map, Value};

pub const SCANNED_FIELDS: [&str; 3] = ["total", "direct", "transitive"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub reasons: Vec<String>,
}

impl ValidationVerdict {
    pub fn passed(&self) -> bool {
        self.reasons.is_empty()
    }
}

struct Check<'a> {
    analysis: &'a str,
    reasons: Vec<String>,
}

impl Check<'_> {
    fn fail(&mut self, detail: String) {
        self.reasons.push(format!("{} {detail}", self.analysis));
    }

    /// Looks up `key` as a mapping, recording a failure when it is absent or
    /// has another shape.
    fn mapping<'v>(
        &mut self,
        parent: &'v Map<String, Value>,
        key: &str,
        location: &str,
    ) -> Option<&'v Map<String, Value>> {
        match parent.get(key) {
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                self.fail(format!(
                    "{location} '{key}' is {}, not a mapping",
                    value_kind(other)
                ));
                None
            }
            None => {
                self.fail(format!(
                    "{location} missing '{key}' (available: {})",
                    key_list(parent)
                ));
                None
            }
        }
    }

    fn compare_fields(
        &mut self,
        summary: &Map<String, Value>,
        expected: &[(String, Value)],
        location: &str,
    ) {
        for (field, expected_value) in expected {
            match summary.get(field) {
                None => self.fail(format!("{location} missing field: {field}")),
                Some(actual_value) if !values_equal(actual_value, expected_value) => {
                    self.fail(format!(
                        "{location} {field} mismatch: expected {expected_value}, got {actual_value}"
                    ))
                }
                Some(_) => {}
            }
        }
    }
}

/// Compares `actual` with `expected`; `analysis` labels every diagnostic
/// (`component_analysis`, `stack_analysis`).
pub fn validate(actual: &Value, expected: &ExpectationTree, analysis: &str) -> ValidationVerdict {
    let mut check = Check {
        analysis,
        reasons: Vec::new(),
    };

    let root = match actual.as_object() {
        Some(root) if !root.is_empty() => root,
        _ => {
            check.fail("output is empty or not a mapping".to_string());
            return ValidationVerdict {
                reasons: check.reasons,
            };
        }
    };
    if root.len() == 1 && root.get("providers").is_some_and(is_empty_value) {
        check.fail("output is empty - only contains empty providers".to_string());
        return ValidationVerdict {
            reasons: check.reasons,
        };
    }

    validate_scanned(&mut check, root, expected.scanned.as_ref());

    let Some(providers) = check.mapping(root, "providers", "actual output") else {
        return ValidationVerdict {
            reasons: check.reasons,
        };
    };

    for (provider_name, provider_expectation) in &expected.providers {
        let Some(provider) = providers.get(provider_name) else {
            check.fail(format!(
                "missing provider: {provider_name} (available providers: {})",
                key_list(providers)
            ));
            continue;
        };
        let Some(provider) = provider.as_object() else {
            check.fail(format!(
                "provider {provider_name} is {}, not a mapping",
                value_kind(provider)
            ));
            continue;
        };

        let location = format!("provider {provider_name}");
        match provider_expectation {
            ProviderExpectation::SingleSource(fields) => {
                if let Some(summary) = check.mapping(provider, "summary", &location) {
                    check.compare_fields(summary, fields, &location);
                }
            }
            ProviderExpectation::MultiSource(sources) => {
                let Some(actual_sources) = check.mapping(provider, "sources", &location) else {
                    continue;
                };
                for (source_name, fields) in sources {
                    let Some(source) = actual_sources.get(source_name) else {
                        check.fail(format!(
                            "{location} missing source: {source_name} (available sources: {})",
                            key_list(actual_sources)
                        ));
                        continue;
                    };
                    let source_location = format!("{location} source {source_name}");
                    let Some(source) = source.as_object() else {
                        check.fail(format!(
                            "{source_location} is {}, not a mapping",
                            value_kind(source)
                        ));
                        continue;
                    };
                    if let Some(summary) = check.mapping(source, "summary", &source_location) {
                        check.compare_fields(summary, fields, &source_location);
                    }
                }
            }
        }
    }

    ValidationVerdict {
        reasons: check.reasons,
    }
}

fn validate_scanned(check: &mut Check<'_>, root: &Map<String, Value>, expected: Option<&Value>) {
    let actual = check.mapping(root, "scanned", "actual output");
    let expected = match expected {
        Some(Value::Object(map)) => Some(map),
        Some(other) => {
            check.fail(format!(
                "expected spec 'scanned' is {}, not a mapping",
                value_kind(other)
            ));
            None
        }
        None => {
            check.fail("expected spec missing 'scanned'".to_string());
            None
        }
    };
    let (Some(actual), Some(expected)) = (actual, expected) else {
        return;
    };

    for field in SCANNED_FIELDS {
        let actual_value = actual.get(field);
        let expected_value = expected.get(field);
        if actual_value.is_none() {
            check.fail(format!(
                "actual scanned missing field '{field}' (available: {})",
                key_list(actual)
            ));
        }
        if expected_value.is_none() {
            check.fail(format!(
                "expected scanned missing field '{field}' (available: {})",
                key_list(expected)
            ));
        }
        if let (Some(actual_value), Some(expected_value)) = (actual_value, expected_value) {
            if !values_equal(actual_value, expected_value) {
                check.fail(format!(
                    "scanned {field} mismatch: expected {expected_value}, got {actual_value}"
                ));
            }
        }
    }
}

/// Exact equality. Numbers compare by numeric value regardless of integer or
/// float encoding; no other coercion applies.
pub fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                a == b
            } else if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                a == b
            } else {
                match (a.as_f64(), b.as_f64()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| values_equal(a, b)))
        }
        _ => actual == expected,
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn key_list(map: &Map<String, Value>) -> String {
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    format!("{keys:?}")
}
