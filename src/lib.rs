//! app-form - form state controller with touch tracking and validation
//!
//! Binds a form's field values, touched flags and validation errors for a UI
//! layer. Validation runs synchronously after every change through a
//! [`Validate`] implementation; the built-in [`ConstraintValidator`] reads a
//! declarative JSON schema.
//!
//! ```
//! use app_form::{use_app_form, FieldChange, FormConfig, FormError};
//! use serde_json::json;
//!
//! fn main() -> Result<(), FormError> {
//!     let mut form = use_app_form(FormConfig::new(json!({
//!         "email": { "presence": true, "email": true }
//!     })))?;
//!     assert!(!form.state().is_valid);
//!
//!     form.on_field_change(FieldChange::text("email", "a@b.com"));
//!     assert!(form.state().is_valid);
//!     assert!(!form.field_has_error("email"));
//!     Ok(())
//! }
//! ```

mod config;
mod controller;
mod error;
mod state;
mod validation;

pub use config::{FormConfig, FormOptions, Schema};
pub use controller::{use_app_form, AppForm};
pub use error::FormError;
pub use state::*;
pub use validation::{ConstraintValidator, Validate};
