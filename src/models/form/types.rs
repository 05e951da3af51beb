use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Supported field types. `select`, `radio`, and `checkbox` carry an option
/// list; the rest must not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Textarea,
    Date,
    Select,
    Radio,
    Checkbox,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Date => "date",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
        }
    }

    pub fn parse(s: &str) -> Option<FieldType> {
        match s {
            "text" => Some(FieldType::Text),
            "number" => Some(FieldType::Number),
            "textarea" => Some(FieldType::Textarea),
            "date" => Some(FieldType::Date),
            "select" => Some(FieldType::Select),
            "radio" => Some(FieldType::Radio),
            "checkbox" => Some(FieldType::Checkbox),
            _ => None,
        }
    }

    /// True exactly for the option-constrained types.
    pub fn requires_options(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio | FieldType::Checkbox)
    }
}

/// One (value, label) pair constraining select/radio/checkbox fields.
/// `value` is what submissions store; `label` is presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

/// Structural errors raised at form-authoring time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    InvalidFieldDefinition { field_name: String, reason: String },
    DuplicateOptionValue { field_name: String, value: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::InvalidFieldDefinition { field_name, reason } => {
                write!(f, "field '{field_name}': {reason}")
            }
            SchemaError::DuplicateOptionValue { field_name, value } => {
                write!(f, "field '{field_name}': duplicate option value '{value}'")
            }
        }
    }
}

/// Check one field definition: option list presence must match the type,
/// and option values must be unique within the field.
pub fn validate_field_definition(
    field_name: &str,
    field_type: FieldType,
    options: Option<&[FieldOption]>,
) -> Result<(), SchemaError> {
    match options {
        Some(opts) if field_type.requires_options() => {
            if opts.is_empty() {
                return Err(SchemaError::InvalidFieldDefinition {
                    field_name: field_name.to_string(),
                    reason: format!("{} fields require a non-empty option list", field_type.as_str()),
                });
            }
            let mut seen = HashSet::new();
            for opt in opts {
                if !seen.insert(opt.value.as_str()) {
                    return Err(SchemaError::DuplicateOptionValue {
                        field_name: field_name.to_string(),
                        value: opt.value.clone(),
                    });
                }
            }
            Ok(())
        }
        None if field_type.requires_options() => Err(SchemaError::InvalidFieldDefinition {
            field_name: field_name.to_string(),
            reason: format!("{} fields require a non-empty option list", field_type.as_str()),
        }),
        Some(_) => Err(SchemaError::InvalidFieldDefinition {
            field_name: field_name.to_string(),
            reason: format!("{} fields must not carry options", field_type.as_str()),
        }),
        None => Ok(()),
    }
}

/// One typed input slot within a form.
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub id: i64,
    pub form_id: i64,
    pub field_name: String,
    pub field_type: FieldType,
    pub is_required: bool,
    pub order: i64,
    pub options: Option<Vec<FieldOption>>,
    pub placeholder: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl FormField {
    pub fn validate_definition(&self) -> Result<(), SchemaError> {
        validate_field_definition(&self.field_name, self.field_type, self.options.as_deref())
    }

    /// Option values for membership checks. Empty for non-option types.
    pub fn option_values(&self) -> impl Iterator<Item = &str> {
        self.options
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|o| o.value.as_str())
    }
}

/// A named, ordered collection of fields that users submit data against.
#[derive(Debug, Clone, Serialize)]
pub struct Form {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_by_user_id: i64,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A form together with its field set, as loaded from the repository.
#[derive(Debug, Clone, Serialize)]
pub struct FormWithFields {
    #[serde(flatten)]
    pub form: Form,
    pub fields: Vec<FormField>,
}

impl FormWithFields {
    /// Check every field definition. Fail-fast on the first invalid field.
    pub fn validate_structure(&self) -> Result<(), SchemaError> {
        for field in &self.fields {
            field.validate_definition()?;
        }
        Ok(())
    }

    /// Fields ascending by `order`, stable: ties keep the stored (id) order.
    /// Returns a fresh iterator on every call.
    pub fn ordered_fields(&self) -> impl Iterator<Item = &FormField> {
        let mut ordered: Vec<&FormField> = self.fields.iter().collect();
        ordered.sort_by_key(|f| f.order);
        ordered.into_iter()
    }

    /// Inactive forms are excluded from the submittable set but stay
    /// readable and editable for authoring users.
    pub fn is_submittable(&self) -> bool {
        self.form.is_active
    }
}

// --- request DTOs -----------------------------------------------------------

/// Wraps any present value (explicit null included) in Some, so the serde
/// default covers only the absent case. Partial updates need the
/// distinction: absent keeps the stored value, null clears it.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct CreateFormInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Partial update. `Option<Option<_>>` distinguishes "leave untouched"
/// (absent) from "set to null" (explicit null).
#[derive(Debug, Deserialize)]
pub struct UpdateFormInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFieldInput {
    pub field_name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub is_required: bool,
    pub order: i64,
    #[serde(default)]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default)]
    pub placeholder: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFieldInput {
    #[serde(default)]
    pub field_name: Option<String>,
    #[serde(default)]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub is_required: Option<bool>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub options: Option<Option<Vec<FieldOption>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub placeholder: Option<Option<String>>,
}
