//! Error types for form construction

/// Configuration errors raised while building a form controller.
///
/// These signal misuse by the caller and are never produced by a validation
/// pass; validation failures are reported as data on the form state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// No validation schema was supplied.
    #[error("validationSchema is required")]
    MissingSchema,

    /// The validation schema is not a JSON object.
    #[error("validationSchema must be an object, got {found}")]
    SchemaNotObject { found: &'static str },

    /// Initial values were supplied but are not a JSON object.
    #[error("initialValues must be an object, got {found}")]
    InitialValuesNotObject { found: &'static str },

    /// An initial value is not a primitive a form control can hold.
    #[error("initial value for '{field}' must be a primitive, got {found}")]
    UnsupportedInitialValue { field: String, found: &'static str },

    /// The schema names a constraint the validator does not know.
    #[error("unknown constraint '{constraint}' for field '{field}'")]
    UnknownConstraint { field: String, constraint: String },

    /// A constraint's options could not be interpreted.
    #[error("invalid options for constraint '{constraint}' on field '{field}': {reason}")]
    InvalidConstraint {
        field: String,
        constraint: String,
        reason: String,
    },
}

impl FormError {
    /// Creates a new unknown constraint error.
    pub fn unknown_constraint(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::UnknownConstraint {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    /// Creates a new invalid constraint error.
    pub fn invalid_constraint(
        field: impl Into<String>,
        constraint: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConstraint {
            field: field.into(),
            constraint: constraint.into(),
            reason: reason.into(),
        }
    }
}

/// Short JSON type name used in error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_schema_message() {
        assert_eq!(
            FormError::MissingSchema.to_string(),
            "validationSchema is required"
        );
    }

    #[test]
    fn test_not_object_message_names_kind() {
        let err = FormError::InitialValuesNotObject {
            found: json_kind(&json!(42)),
        };
        assert_eq!(err.to_string(), "initialValues must be an object, got number");
    }

    #[test]
    fn test_unknown_constraint_constructor() {
        let err = FormError::unknown_constraint("email", "zipcode");
        assert_eq!(
            err,
            FormError::UnknownConstraint {
                field: "email".to_string(),
                constraint: "zipcode".to_string(),
            }
        );
        assert!(err.to_string().contains("zipcode"));
    }

    #[test]
    fn test_json_kind_covers_all_variants() {
        assert_eq!(json_kind(&json!(null)), "null");
        assert_eq!(json_kind(&json!(true)), "boolean");
        assert_eq!(json_kind(&json!(1.5)), "number");
        assert_eq!(json_kind(&json!("x")), "string");
        assert_eq!(json_kind(&json!([])), "array");
        assert_eq!(json_kind(&json!({})), "object");
    }
}
