//! The schema validator for gated writes.
//!
//! `SchemaValidator::validate` checks a would-be file body in order:
//!
//! 1. **Parse**: the body must be JSON; otherwise the verdict fails at once.
//! 2. **Presence**: every required top-level field of the schema table.
//! 3. **Nested presence**: every required field of every nested object.
//! 4. **Shape**: value kinds, via a JSON Schema generated from the table.
//! 5. **Location**: the write target must resolve inside the output dir.
//!
//! Steps 2 to 5 accumulate, so one verdict reports every violation. The
//! validator holds no state and caches nothing.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use docgate_contracts::verdict::{ValidationVerdict, Violation};

use crate::{
    location,
    schema::{Container, Schema, SchemaTable},
};

/// Stateless checker for gated artifact payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate the raw file body `candidate` destined for `target`.
    ///
    /// `expected_output_dir` of `None` skips the location check.
    pub fn validate(
        &self,
        candidate: &str,
        schema: Schema,
        target: &Path,
        expected_output_dir: Option<&Path>,
    ) -> ValidationVerdict {
        match serde_json::from_str::<Value>(candidate) {
            Ok(value) => self.validate_value(&value, schema, target, expected_output_dir),
            Err(e) => {
                warn!(schema_id = schema.id(), target = %target.display(), error = %e, "candidate is not JSON");
                ValidationVerdict::from_violations(vec![Violation::Unparseable {
                    reason: e.to_string(),
                }])
            }
        }
    }

    /// Validate an already-parsed candidate. Same checks as `validate`,
    /// minus parsing.
    pub fn validate_value(
        &self,
        candidate: &Value,
        schema: Schema,
        target: &Path,
        expected_output_dir: Option<&Path>,
    ) -> ValidationVerdict {
        let table = schema.table();
        let mut violations = Vec::new();

        match candidate.as_object() {
            Some(_) => {
                check_presence(candidate, table, &mut violations);
                check_shapes(candidate, table, &mut violations);
            }
            None => violations.push(Violation::WrongShape {
                path: "$".to_string(),
                message: format!("expected a JSON object, got {}", kind_name(candidate)),
            }),
        }

        if let Some(dir) = expected_output_dir {
            if !location::is_within(target, dir) {
                violations.push(Violation::OutsideOutputDir {
                    target: location::resolve(target).display().to_string(),
                    output_dir: location::resolve(dir).display().to_string(),
                });
            }
        }

        let verdict = ValidationVerdict::from_violations(violations);
        debug!(
            schema_id = table.id,
            target = %target.display(),
            passed = verdict.passed,
            violation_count = verdict.violations.len(),
            "validation complete"
        );
        verdict
    }
}

/// Top-level presence, then nested presence table by table.
fn check_presence(candidate: &Value, table: &SchemaTable, violations: &mut Vec<Violation>) {
    for field in table.fields.iter().filter(|f| f.required) {
        if candidate.get(field.name).is_none() {
            violations.push(Violation::MissingField {
                path: field.name.to_string(),
            });
        }
    }

    for nested in table.nested {
        let Some(value) = candidate.get(nested.field) else {
            continue;
        };
        match (nested.container, value) {
            (Container::List, Value::Array(items)) => {
                for (idx, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{idx}]", nested.field);
                    if !item.is_object() {
                        violations.push(Violation::WrongShape {
                            path: item_path,
                            message: format!("expected an object, got {}", kind_name(item)),
                        });
                        continue;
                    }
                    missing_in(item, &item_path, nested.fields, violations);
                }
            }
            (Container::Object, Value::Object(_)) => {
                missing_in(value, nested.field, nested.fields, violations);
            }
            // Wrong container kind is reported by the shape check.
            _ => {}
        }
    }
}

fn missing_in(
    object: &Value,
    path: &str,
    fields: &[crate::schema::FieldSpec],
    violations: &mut Vec<Violation>,
) {
    for field in fields.iter().filter(|f| f.required) {
        if object.get(field.name).is_none() {
            violations.push(Violation::MissingField {
                path: format!("{path}.{}", field.name),
            });
        }
    }
}

fn check_shapes(candidate: &Value, table: &SchemaTable, violations: &mut Vec<Violation>) {
    let shape = table.shape_schema();
    let validator = match jsonschema::validator_for(&shape) {
        Ok(v) => v,
        Err(e) => {
            // The document is generated from a static table; surface a broken
            // table as a violation rather than letting the write through.
            warn!(schema_id = table.id, error = %e, "shape schema failed to compile");
            violations.push(Violation::WrongShape {
                path: "$".to_string(),
                message: format!("schema '{}' could not be compiled: {e}", table.id),
            });
            return;
        }
    };

    for error in validator.iter_errors(candidate) {
        let path = display_path(&error.instance_path.to_string());
        violations.push(Violation::WrongShape {
            path,
            message: error.to_string(),
        });
    }
}

/// Turn a JSON pointer (`/signatures/0/line`) into `signatures[0].line`.
fn display_path(pointer: &str) -> String {
    let mut out = String::new();
    for segment in pointer.split('/').filter(|s| !s.is_empty()) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if segment.chars().all(|c| c.is_ascii_digit()) {
            out.push_str(&format!("[{segment}]"));
        } else {
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(&segment);
        }
    }
    if out.is_empty() {
        "$".to_string()
    } else {
        out
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
