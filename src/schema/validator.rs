//! Field validation for technology writes
//!
//! Runs at the HTTP boundary before any storage call. Never fails: it
//! returns every violated constraint so the caller can report them all.

use serde::Serialize;

use super::technology::{TechnologyDraft, ENTITY_NAME};

/// Minimum length of `name`, in characters
pub const NAME_MIN_LENGTH: usize = 3;

/// Constraint kinds a field can violate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Constraint {
    /// Required value is absent
    NotNull,
    /// Value is shorter than allowed
    Size,
}

impl Constraint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Constraint::NotNull => "NotNull",
            Constraint::Size => "Size",
        }
    }
}

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    pub object_name: &'static str,
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldViolation {
    fn new(field: &'static str, constraint: Constraint) -> Self {
        Self {
            object_name: ENTITY_NAME,
            field,
            message: constraint.as_str(),
        }
    }
}

/// Validate a technology draft.
///
/// Checks that `name` is present with at least [`NAME_MIN_LENGTH`]
/// characters and that `date` is present. The id is not inspected here.
pub fn validate_technology(draft: &TechnologyDraft) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    match &draft.name {
        None => violations.push(FieldViolation::new("name", Constraint::NotNull)),
        Some(name) if name.chars().count() < NAME_MIN_LENGTH => {
            violations.push(FieldViolation::new("name", Constraint::Size))
        }
        Some(_) => {}
    }

    if draft.date.is_none() {
        violations.push(FieldViolation::new("date", Constraint::NotNull));
    }

    violations
}
