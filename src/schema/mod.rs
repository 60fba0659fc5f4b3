//! Technology schema: the record type and its write-time validation.
//!
//! # Rules
//!
//! - `name` is required and at least three characters long
//! - `date` is required
//! - `description` is optional and unbounded
//! - `id` is assigned by storage and never changes

mod technology;
mod validator;

pub use technology::{Technology, TechnologyDraft, ENTITY_NAME};
pub use validator::{validate_technology, Constraint, FieldViolation, NAME_MIN_LENGTH};
