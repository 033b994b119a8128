//! Contact message model
//!
//! A contact submission is an opaque JSON object. The only structure the
//! service enforces is the [`ContactSchema`]: required fields must be present
//! as non-blank strings, and no string, however deeply nested, may exceed the
//! configured length.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ContactConfig;

/// Shape constraints applied to every contact submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSchema {
    /// Fields that must be present as non-blank strings
    pub required_fields: Vec<String>,
    /// Maximum length of any string field, in characters
    pub max_field_length: usize,
}

impl From<&ContactConfig> for ContactSchema {
    fn from(config: &ContactConfig) -> Self {
        Self {
            required_fields: config.required_fields.clone(),
            max_field_length: config.max_field_length,
        }
    }
}

impl Default for ContactSchema {
    fn default() -> Self {
        Self::from(&ContactConfig::default())
    }
}

/// Every problem found in a rejected submission
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .problems.join("; "))]
pub struct ContactValidationError {
    pub problems: Vec<String>,
}

impl ContactValidationError {
    fn single(problem: impl Into<String>) -> Self {
        Self {
            problems: vec![problem.into()],
        }
    }
}

/// A validated contact submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContactMessage(Map<String, Value>);

impl ContactMessage {
    /// Validate a raw payload against the schema
    pub fn from_value(value: Value, schema: &ContactSchema) -> Result<Self, ContactValidationError> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(ContactValidationError::single(format!(
                    "body: expected a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let mut problems = Vec::new();

        for name in &schema.required_fields {
            match fields.get(name) {
                None | Some(Value::Null) => problems.push(format!("{}: field required", name)),
                Some(Value::String(s)) if s.trim().is_empty() => {
                    problems.push(format!("{}: must not be blank", name))
                }
                Some(Value::String(_)) => {}
                Some(other) => problems.push(format!(
                    "{}: expected a string, got {}",
                    name,
                    json_type_name(other)
                )),
            }
        }

        for (name, value) in &fields {
            if name.chars().count() > schema.max_field_length {
                problems.push(format!(
                    "body: key must be at most {} characters",
                    schema.max_field_length
                ));
                continue;
            }
            check_lengths(name, value, schema.max_field_length, &mut problems);
        }

        if problems.is_empty() {
            Ok(Self(fields))
        } else {
            Err(ContactValidationError { problems })
        }
    }

    /// The submission as a JSON value, ready to be stored
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Report every string below `value` longer than `max` characters.
///
/// Nested values are reported by path (`note.body`, `tags[2]`); object keys
/// count as strings too.
fn check_lengths(path: &str, value: &Value, max: usize, problems: &mut Vec<String>) {
    match value {
        Value::String(s) if s.chars().count() > max => {
            problems.push(format!("{}: must be at most {} characters", path, max));
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                check_lengths(&format!("{}[{}]", path, i), item, max, problems);
            }
        }
        Value::Object(fields) => {
            for (key, item) in fields {
                if key.chars().count() > max {
                    problems.push(format!("{}: key must be at most {} characters", path, max));
                    continue;
                }
                check_lengths(&format!("{}.{}", path, key), item, max, problems);
            }
        }
        _ => {}
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
