use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::fmt;

use super::types::{FieldType, FormField, FormWithFields};

/// Payload errors raised at submission time. Validation is fail-fast: the
/// first violated field (in `ordered_fields` order) aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    RequiredFieldMissing(String),
    InvalidFieldValue { field_name: String, expected: &'static str },
    InvalidOptionValue(String),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::RequiredFieldMissing(name) => {
                write!(f, "field '{name}' is required")
            }
            PayloadError::InvalidFieldValue { field_name, expected } => {
                write!(f, "field '{field_name}' must be {expected}")
            }
            PayloadError::InvalidOptionValue(name) => {
                write!(f, "field '{name}' has a value outside its option list")
            }
        }
    }
}

/// Validate a submission payload against a form definition.
///
/// The accepted payload is stored exactly as submitted: no coercion, and
/// keys not defined on the form pass through unchanged. Missing keys, JSON
/// null, the empty string, and the empty array all count as absent.
pub fn validate_submission(
    form: &FormWithFields,
    payload: &Map<String, Value>,
) -> Result<(), PayloadError> {
    for field in form.ordered_fields() {
        let value = payload.get(&field.field_name);
        if is_absent(value) {
            if field.is_required {
                return Err(PayloadError::RequiredFieldMissing(field.field_name.clone()));
            }
            continue;
        }
        // is_absent returned false, so the key is present
        check_value(field, value.unwrap_or(&Value::Null))?;
    }
    Ok(())
}

fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn check_value(field: &FormField, value: &Value) -> Result<(), PayloadError> {
    match field.field_type {
        FieldType::Text | FieldType::Textarea => match value {
            Value::String(_) => Ok(()),
            _ => Err(PayloadError::InvalidFieldValue {
                field_name: field.field_name.clone(),
                expected: "a string",
            }),
        },
        FieldType::Number => {
            let ok = match value {
                Value::Number(_) => true,
                Value::String(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
                _ => false,
            };
            if ok {
                Ok(())
            } else {
                Err(PayloadError::InvalidFieldValue {
                    field_name: field.field_name.clone(),
                    expected: "a finite number",
                })
            }
        }
        FieldType::Date => {
            let ok = matches!(value, Value::String(s)
                if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok());
            if ok {
                Ok(())
            } else {
                Err(PayloadError::InvalidFieldValue {
                    field_name: field.field_name.clone(),
                    expected: "a YYYY-MM-DD date",
                })
            }
        }
        FieldType::Select | FieldType::Radio => {
            let ok = matches!(value, Value::String(s)
                if field.option_values().any(|v| v == s.as_str()));
            if ok {
                Ok(())
            } else {
                Err(PayloadError::InvalidOptionValue(field.field_name.clone()))
            }
        }
        // Checkbox accepts any subset of the option values. Duplicate
        // selections are allowed; only membership is checked.
        FieldType::Checkbox => {
            let ok = matches!(value, Value::Array(items) if items.iter().all(|item| {
                matches!(item, Value::String(s)
                    if field.option_values().any(|v| v == s.as_str()))
            }));
            if ok {
                Ok(())
            } else {
                Err(PayloadError::InvalidOptionValue(field.field_name.clone()))
            }
        }
    }
}
