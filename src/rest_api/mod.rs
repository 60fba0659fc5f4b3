//! # REST API Module
//!
//! HTTP endpoints for technology CRUD. Handlers validate at the boundary,
//! call the repository once, and shape the response with notification
//! headers.

pub mod alerts;
pub mod errors;
pub mod technology_resource;

pub use alerts::AlertHeaders;
pub use errors::{ApiError, ApiResult};
pub use technology_resource::{technology_routes, TechnologyState};
