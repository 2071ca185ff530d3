//! Form domain layer
//!
//! Field values, change events and the form state snapshot, plus the pure
//! error queries over a snapshot.

mod event;
mod field;
mod form_state;

pub use event::{prevent_default, Cancelable};
pub use field::{FieldChange, FieldKind, FieldValue};
pub use form_state::{
    form_get_error, form_has_error, FieldErrors, FieldValues, FormState, DEFAULT_FORM_STATE,
};
