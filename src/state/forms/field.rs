//! Form field value objects and change events

use serde::{Deserialize, Serialize};

use crate::error::{json_kind, FormError};

/// Primitive value held by a form control
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Convert a JSON primitive into a field value
    pub fn from_json(field: &str, value: &serde_json::Value) -> Result<Self, FormError> {
        match value {
            serde_json::Value::Null => Ok(FieldValue::Null),
            serde_json::Value::Bool(b) => Ok(FieldValue::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(FieldValue::Number).ok_or_else(|| {
                FormError::UnsupportedInitialValue {
                    field: field.to_string(),
                    found: "number",
                }
            }),
            serde_json::Value::String(s) => Ok(FieldValue::Text(s.clone())),
            other => Err(FormError::UnsupportedInitialValue {
                field: field.to_string(),
                found: json_kind(other),
            }),
        }
    }

    /// Convert back into a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Get the text value (None for non-text values)
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the boolean value (None for non-boolean values)
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

/// Kind of control that produced a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Checkbox,
}

impl FieldKind {
    /// Map a UI input type string onto a field kind
    pub fn from_input_type(input_type: &str) -> Self {
        if input_type.eq_ignore_ascii_case("checkbox") {
            FieldKind::Checkbox
        } else {
            FieldKind::Text
        }
    }
}

/// A change event, built by the UI binding layer before it reaches the form
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field_name: String,
    pub field_kind: FieldKind,
    pub raw_value: String,
    pub raw_checked: bool,
}

impl FieldChange {
    /// Create a change from a text-like control
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            field_name: name.to_string(),
            field_kind: FieldKind::Text,
            raw_value: value.to_string(),
            raw_checked: false,
        }
    }

    /// Create a change from a checkbox
    pub fn checkbox(name: &str, checked: bool) -> Self {
        Self {
            field_name: name.to_string(),
            field_kind: FieldKind::Checkbox,
            raw_value: String::new(),
            raw_checked: checked,
        }
    }

    /// Create a change from the raw attributes of an input element
    pub fn from_input(name: &str, input_type: &str, value: &str, checked: bool) -> Self {
        Self {
            field_name: name.to_string(),
            field_kind: FieldKind::from_input_type(input_type),
            raw_value: value.to_string(),
            raw_checked: checked,
        }
    }

    /// The value to store for this change
    pub fn value(&self) -> FieldValue {
        match self.field_kind {
            FieldKind::Checkbox => FieldValue::Bool(self.raw_checked),
            FieldKind::Text => FieldValue::Text(self.raw_value.clone()),
        }
    }
}
