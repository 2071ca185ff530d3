//! Trait abstraction for the validation function to enable mocking in tests

use crate::config::Schema;
use crate::error::FormError;
use crate::state::{FieldErrors, FieldValues};

/// A pure validation function over form values and a declarative schema
#[cfg_attr(test, mockall::automock)]
pub trait Validate {
    /// Validate all values against the schema.
    ///
    /// Returns `None` when there are no errors. Must be deterministic for the
    /// same `(values, schema)` pair.
    fn validate(&self, values: &FieldValues, schema: &Schema) -> Option<FieldErrors>;

    /// Reject a schema this validator cannot interpret
    fn check_schema(&self, _schema: &Schema) -> Result<(), FormError> {
        Ok(())
    }
}

impl<F> Validate for F
where
    F: Fn(&FieldValues, &Schema) -> Option<FieldErrors>,
{
    fn validate(&self, values: &FieldValues, schema: &Schema) -> Option<FieldErrors> {
        self(values, schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldValue;

    #[test]
    fn test_closure_is_a_validator() {
        let validator = |values: &FieldValues, _: &Schema| {
            if values.contains_key("name") {
                None
            } else {
                let mut errors = FieldErrors::new();
                errors.insert("name".to_string(), vec!["Name can't be blank".to_string()]);
                Some(errors)
            }
        };

        let mut values = FieldValues::new();
        assert!(validator.validate(&values, &Schema::default()).is_some());
        values.insert("name".to_string(), FieldValue::from("Ada"));
        assert!(validator.validate(&values, &Schema::default()).is_none());
    }

    #[test]
    fn test_default_check_schema_accepts() {
        let validator = |_: &FieldValues, _: &Schema| -> Option<FieldErrors> { None };
        assert!(validator.check_schema(&Schema::default()).is_ok());
    }
}
