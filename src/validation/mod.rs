//! Validation seam and the built-in constraint validator

mod constraints;
mod traits;

pub use constraints::ConstraintValidator;
pub use traits::Validate;

#[cfg(test)]
pub use traits::MockValidate;
