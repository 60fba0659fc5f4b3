//! Technology record
//!
//! The only persisted entity. Identity is carried by `id` alone: two records
//! compare equal iff both carry an id and the ids match.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Entity name used in alert headers and error bodies
pub const ENTITY_NAME: &str = "technology";

/// A persisted (or about to be persisted) technology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technology {
    /// Storage-assigned identifier, `None` until first save
    #[serde(default)]
    pub id: Option<i64>,

    /// Display name, at least three characters
    pub name: String,

    /// Free-form description of unbounded length
    #[serde(default)]
    pub description: Option<String>,

    /// Calendar date, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
}

impl Technology {
    /// Create an unsaved technology
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            date,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the identifier
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Whether this record has been assigned an identifier
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Identity comparison.
    ///
    /// Records without an id are never the same entity as anything,
    /// including themselves.
    pub fn same_identity(&self, other: &Technology) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Technology {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other)
    }
}

impl Hash for Technology {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Technology{{id=")?;
        match self.id {
            Some(id) => write!(f, "{}", id)?,
            None => write!(f, "null")?,
        }
        write!(
            f,
            ", name='{}', description='{}', date='{}'}}",
            self.name,
            self.description.as_deref().unwrap_or("null"),
            self.date
        )
    }
}

/// Incoming request body for create and update.
///
/// Every field is optional at this stage so that missing values surface as
/// validation violations instead of deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnologyDraft {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl TechnologyDraft {
    /// Check the draft and convert it into a record.
    pub fn into_technology(self) -> Result<Technology, Vec<super::FieldViolation>> {
        let violations = super::validate_technology(&self);
        match (self.name, self.date) {
            (Some(name), Some(date)) if violations.is_empty() => Ok(Technology {
                id: self.id,
                name,
                description: self.description,
                date,
            }),
            _ => Err(violations),
        }
    }
}
