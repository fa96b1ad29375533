//! Schema-driven structural checks on arbitrary nested data.
//!
//! A schema maps field names to either a rule name (`alphanumeric`, `date`,
//! `int`, `float`) or a nested schema object, in which case validation
//! recurses. Error paths use dotted notation reflecting nesting depth.

use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;

/// Outcome of validating one data object against one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: BTreeMap<String, String>,
}

/// Validate `data` against `schema`. Absent or null fields are always
/// reported as missing, never silently accepted.
pub fn validate(data: &Value, schema: &Value) -> ValidationReport {
    let mut errors = BTreeMap::new();

    match (data.as_object(), schema.as_object()) {
        (Some(data), Some(schema)) => {
            validate_object(data, schema, "", &mut errors);
        }
        (None, _) => {
            errors.insert("error".into(), "Request must contain a 'data' object.".into());
        }
        (_, None) => {
            errors.insert("error".into(), "Request must contain a 'schema' object.".into());
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn validate_object(
    data: &serde_json::Map<String, Value>,
    schema: &serde_json::Map<String, Value>,
    path: &str,
    errors: &mut BTreeMap<String, String>,
) {
    for (key, rule) in schema {
        let field_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}.{key}")
        };

        let value = match data.get(key) {
            None | Some(Value::Null) => {
                errors.insert(field_path, "Missing required field.".into());
                continue;
            }
            Some(value) => value,
        };

        match rule {
            // Nested schema: recurse into the nested object.
            Value::Object(nested_schema) => match value.as_object() {
                Some(nested_data) => {
                    validate_object(nested_data, nested_schema, &field_path, errors);
                }
                None => {
                    errors.insert(field_path, "Should be an object.".into());
                }
            },
            Value::String(rule_name) => match rule_for(rule_name) {
                Some(check) if check(value) => {}
                Some(_) => {
                    errors.insert(field_path, format!("Invalid format. Expected {rule_name}."));
                }
                None => {
                    errors.insert(field_path, format!("No validator for rule: {rule_name}"));
                }
            },
            other => {
                errors.insert(field_path, format!("No validator for rule: {other}"));
            }
        }
    }
}

fn rule_for(name: &str) -> Option<fn(&Value) -> bool> {
    match name {
        "alphanumeric" => Some(is_alphanumeric),
        "date" => Some(is_valid_date),
        "int" => Some(is_integer),
        "float" => Some(is_float),
        _ => None,
    }
}

fn is_alphanumeric(value: &Value) -> bool {
    value.as_str().is_some_and(|s| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ')
    })
}

fn is_valid_date(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok())
}

fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

fn is_float(value: &Value) -> bool {
    // serde_json parses `1.0` as f64; integers are not floats here.
    value.is_f64()
}
