//! Form state snapshot and error queries

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::field::{FieldChange, FieldValue};

/// Current value of every field, by name
pub type FieldValues = BTreeMap<String, FieldValue>;

/// Ordered error messages per field, by name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Empty form state, before any values or validation
pub const DEFAULT_FORM_STATE: FormState = FormState {
    is_valid: false,
    values: BTreeMap::new(),
    touched: BTreeMap::new(),
    errors: BTreeMap::new(),
};

/// Snapshot of a form: values, touch flags, and the last validation result
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormState {
    /// True iff the last validation pass produced no errors
    pub is_valid: bool,
    pub values: FieldValues,
    /// Fields that received at least one change
    pub touched: BTreeMap<String, bool>,
    /// Absent key means no errors for that field
    pub errors: FieldErrors,
}

impl FormState {
    /// Create a state seeded with initial values
    pub fn with_values(values: FieldValues) -> Self {
        Self {
            values,
            ..DEFAULT_FORM_STATE
        }
    }

    /// Return a new snapshot with the change applied
    pub fn apply_change(&self, change: &FieldChange) -> Self {
        let mut next = self.clone();
        next.values
            .insert(change.field_name.clone(), change.value());
        next.touched.insert(change.field_name.clone(), true);
        next
    }

    /// Replace the validation result, dropping empty error lists
    pub fn set_errors(&mut self, errors: Option<FieldErrors>) {
        self.errors = errors
            .unwrap_or_default()
            .into_iter()
            .filter(|(_, messages)| !messages.is_empty())
            .collect();
        self.is_valid = self.errors.is_empty();
    }

    /// Drop empty error lists and bring `is_valid` in line with `errors`
    pub fn normalize_errors(&mut self) {
        let errors = std::mem::take(&mut self.errors);
        self.set_errors(Some(errors));
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.get(field).copied().unwrap_or(false)
    }
}

/// True iff the field was touched and has at least one error.
///
/// A missing state, or a state without the field, has no error.
pub fn form_has_error<'a>(state: impl Into<Option<&'a FormState>>, field: &str) -> bool {
    state.into().is_some_and(|state| {
        state.is_touched(field)
            && state
                .errors
                .get(field)
                .is_some_and(|messages| !messages.is_empty())
    })
}

/// First error for the field, if [`form_has_error`] holds.
pub fn form_get_error<'a>(state: impl Into<Option<&'a FormState>>, field: &str) -> Option<&'a str> {
    let state = state.into()?;
    if !form_has_error(state, field) {
        return None;
    }
    state
        .errors
        .get(field)
        .and_then(|messages| messages.first())
        .map(String::as_str)
}
