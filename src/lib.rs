//! agrifarm - Technology registry REST service
//!
//! A single `Technology` entity persisted in a relational table and exposed
//! through five CRUD endpoints under `/api/technologies`.

pub mod cli;
pub mod config;
pub mod http_server;
pub mod observability;
pub mod rest_api;
pub mod schema;
pub mod storage;

pub use config::AppConfig;
pub use schema::{Technology, TechnologyDraft};
pub use storage::{InMemoryTechnologyRepository, SqliteTechnologyRepository, TechnologyRepository};
