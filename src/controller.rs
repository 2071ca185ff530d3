//! Form controller: owns a form's state and keeps its validation current

use crate::config::{FormConfig, FormOptions, Schema};
use crate::error::FormError;
use crate::state::{form_get_error, form_has_error, FieldChange, FieldValues, FormState};
use crate::validation::{ConstraintValidator, Validate};

/// Build a controller with the built-in constraint validator
pub fn use_app_form(config: FormConfig) -> Result<AppForm, FormError> {
    AppForm::new(config)
}

/// Owns one form's state for the lifetime of the component using it.
///
/// Every call that can change `values` revalidates before returning, so
/// `is_valid` and `errors` always describe the current values.
#[derive(Debug)]
pub struct AppForm<V: Validate = ConstraintValidator> {
    schema: Schema,
    validator: V,
    state: FormState,
    /// Values the current `errors` were computed from
    validated: Option<FieldValues>,
}

impl AppForm<ConstraintValidator> {
    pub fn new(config: FormConfig) -> Result<Self, FormError> {
        Self::with_validator(config, ConstraintValidator::new())
    }
}

impl<V: Validate> AppForm<V> {
    /// Build a controller around any validation function
    pub fn with_validator(config: FormConfig, validator: V) -> Result<Self, FormError> {
        let options = FormOptions::try_from(config).inspect_err(|err| {
            tracing::warn!(%err, "rejected form configuration");
        })?;
        validator.check_schema(&options.schema).inspect_err(|err| {
            tracing::warn!(%err, "rejected validation schema");
        })?;

        let mut form = Self {
            schema: options.schema,
            validator,
            state: FormState::with_values(options.initial_values),
            validated: None,
        };
        form.revalidate();
        Ok(form)
    }

    /// Current state snapshot
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Replace the whole state; validation follows if the values changed.
    ///
    /// Errors kept for unchanged values are still normalized: empty lists are
    /// dropped and `is_valid` follows `errors`.
    pub fn set_form_state(&mut self, state: FormState) {
        self.state = state;
        self.revalidate();
    }

    /// Replace the state with one derived from the current snapshot
    pub fn update_form_state(&mut self, update: impl FnOnce(&FormState) -> FormState) {
        let next = update(&self.state);
        self.set_form_state(next);
    }

    /// Apply a change event: store its value, mark the field touched, revalidate
    pub fn on_field_change(&mut self, change: FieldChange) {
        tracing::trace!(
            field = %change.field_name,
            kind = ?change.field_kind,
            "field changed"
        );
        let next = self.state.apply_change(&change);
        self.set_form_state(next);
    }

    /// First error for a field, once it has been touched
    pub fn field_get_error(&self, field: &str) -> Option<&str> {
        form_get_error(&self.state, field)
    }

    pub fn field_has_error(&self, field: &str) -> bool {
        form_has_error(&self.state, field)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Swap the schema; the new result supersedes the previous one
    pub fn replace_schema(&mut self, schema: Schema) -> Result<(), FormError> {
        self.validator.check_schema(&schema)?;
        self.schema = schema;
        self.validated = None;
        self.revalidate();
        Ok(())
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    /// Recompute `errors` and `is_valid` unless they already match the values
    fn revalidate(&mut self) {
        if self.validated.as_ref() == Some(&self.state.values) {
            self.state.normalize_errors();
            return;
        }

        let result = self.validator.validate(&self.state.values, &self.schema);
        self.state.set_errors(result);
        self.validated = Some(self.state.values.clone());

        tracing::debug!(
            fields = self.state.values.len(),
            invalid_fields = self.state.errors.len(),
            is_valid = self.state.is_valid,
            "form revalidated"
        );
    }
}
