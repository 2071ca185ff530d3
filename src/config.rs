//! Construction options for a form controller

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::error::{json_kind, FormError};
use crate::state::{FieldValue, FieldValues};

/// Declarative rule set handed verbatim to the validator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(Map<String, Value>);

impl Schema {
    pub fn new(rules: Map<String, Value>) -> Self {
        Self(rules)
    }

    /// Rules for a single field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Field names and their rules, in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, rules)| (name.as_str(), rules))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl TryFrom<Value> for Schema {
    type Error = FormError;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Object(rules) => Ok(Self(rules)),
            Value::Null => Err(FormError::MissingSchema),
            other => Err(FormError::SchemaNotObject {
                found: json_kind(&other),
            }),
        }
    }
}

/// User-facing form configuration, as written in code or a JSON document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    /// Rule set for the validator (required, must be an object)
    pub validation_schema: Option<Value>,
    /// Seed values (optional, must be an object of primitives)
    pub initial_values: Option<Value>,
}

impl FormConfig {
    /// Create a config with the given schema and no initial values
    pub fn new(validation_schema: Value) -> Self {
        Self {
            validation_schema: Some(validation_schema),
            initial_values: None,
        }
    }

    pub fn with_initial_values(mut self, initial_values: Value) -> Self {
        self.initial_values = Some(initial_values);
        self
    }

    /// Parse configuration from a JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse form configuration")
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read form configuration {}", path.display()))?;
        Self::from_json_str(&content)
    }
}

/// Checked configuration: a schema object and primitive initial values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormOptions {
    pub schema: Schema,
    pub initial_values: FieldValues,
}

impl TryFrom<FormConfig> for FormOptions {
    type Error = FormError;

    fn try_from(config: FormConfig) -> std::result::Result<Self, Self::Error> {
        let schema = Schema::try_from(config.validation_schema.unwrap_or(Value::Null))?;

        let initial_values = match config.initial_values {
            None | Some(Value::Null) => FieldValues::new(),
            Some(Value::Object(values)) => values
                .iter()
                .map(|(field, value)| Ok((field.clone(), FieldValue::from_json(field, value)?)))
                .collect::<std::result::Result<FieldValues, FormError>>()?,
            Some(other) => {
                return Err(FormError::InitialValuesNotObject {
                    found: json_kind(&other),
                })
            }
        };

        Ok(Self {
            schema,
            initial_values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    mod schema {
        use super::*;

        #[test]
        fn test_object_is_accepted() {
            let schema = Schema::try_from(json!({"email": {"presence": true}})).unwrap();
            assert_eq!(schema.get("email"), Some(&json!({"presence": true})));
        }

        #[test]
        fn test_null_is_missing() {
            assert_eq!(
                Schema::try_from(json!(null)).unwrap_err(),
                FormError::MissingSchema
            );
        }

        #[test]
        fn test_non_object_is_rejected() {
            assert_eq!(
                Schema::try_from(json!("rules")).unwrap_err(),
                FormError::SchemaNotObject { found: "string" }
            );
        }

        #[test]
        fn test_fields_keep_declaration_order() {
            let schema = Schema::try_from(json!({"zeta": {}, "alpha": {}})).unwrap();
            let names: Vec<&str> = schema.fields().map(|(name, _)| name).collect();
            assert_eq!(names, vec!["zeta", "alpha"]);
        }
    }

    mod form_config {
        use super::*;

        #[test]
        fn test_default_config() {
            let config = FormConfig::default();
            assert!(config.validation_schema.is_none());
            assert!(config.initial_values.is_none());
        }

        #[test]
        fn test_deserialize_camel_case_keys() {
            let config = FormConfig::from_json_str(
                r#"{"validationSchema": {"email": {"email": true}}, "initialValues": {"email": ""}}"#,
            )
            .unwrap();
            assert_eq!(
                config.validation_schema,
                Some(json!({"email": {"email": true}}))
            );
            assert_eq!(config.initial_values, Some(json!({"email": ""})));
        }

        #[test]
        fn test_deserialize_from_empty_json() {
            let config = FormConfig::from_json_str("{}").unwrap();
            assert_eq!(config, FormConfig::default());
        }

        #[test]
        fn test_invalid_json_is_an_error() {
            let err = FormConfig::from_json_str("{not json").unwrap_err();
            assert!(err.to_string().contains("form configuration"));
        }

        #[test]
        fn test_load_from_file() {
            let path = std::env::temp_dir().join(format!(
                "app-form-config-{}.json",
                std::process::id()
            ));
            let mut file = fs::File::create(&path).unwrap();
            write!(file, r#"{{"validationSchema": {{"name": {{"presence": true}}}}}}"#).unwrap();
            drop(file);

            let config = FormConfig::load(&path).unwrap();
            fs::remove_file(&path).unwrap();
            assert_eq!(
                config.validation_schema,
                Some(json!({"name": {"presence": true}}))
            );
        }

        #[test]
        fn test_load_missing_file_is_an_error() {
            let result = FormConfig::load("/nonexistent/app-form/config.json");
            assert!(result.is_err());
        }
    }

    mod form_options {
        use super::*;

        #[test]
        fn test_missing_schema_fails() {
            let err = FormOptions::try_from(FormConfig::default()).unwrap_err();
            assert_eq!(err, FormError::MissingSchema);
        }

        #[test]
        fn test_initial_values_default_to_empty() {
            let options = FormOptions::try_from(FormConfig::new(json!({}))).unwrap();
            assert!(options.initial_values.is_empty());
        }

        #[test]
        fn test_null_initial_values_match_absent_ones() {
            let built = FormConfig::new(json!({})).with_initial_values(json!(null));
            let parsed = FormConfig::from_json_str(
                r#"{"validationSchema": {}, "initialValues": null}"#,
            )
            .unwrap();
            let built = FormOptions::try_from(built).unwrap();
            let parsed = FormOptions::try_from(parsed).unwrap();
            assert!(built.initial_values.is_empty());
            assert_eq!(built, parsed);
        }

        #[test]
        fn test_initial_values_number_fails() {
            let config = FormConfig::new(json!({})).with_initial_values(json!(5));
            assert_eq!(
                FormOptions::try_from(config).unwrap_err(),
                FormError::InitialValuesNotObject { found: "number" }
            );
        }

        #[test]
        fn test_initial_values_nested_object_fails() {
            let config =
                FormConfig::new(json!({})).with_initial_values(json!({"address": {"zip": "1"}}));
            assert_eq!(
                FormOptions::try_from(config).unwrap_err(),
                FormError::UnsupportedInitialValue {
                    field: "address".to_string(),
                    found: "object",
                }
            );
        }

        #[test]
        fn test_initial_values_are_converted() {
            let config = FormConfig::new(json!({}))
                .with_initial_values(json!({"name": "Ada", "agree": false, "age": 36}));
            let options = FormOptions::try_from(config).unwrap();
            assert_eq!(options.initial_values["name"], FieldValue::from("Ada"));
            assert_eq!(options.initial_values["agree"], FieldValue::Bool(false));
            assert_eq!(options.initial_values["age"], FieldValue::Number(36.0));
        }
    }
}
