//! # HTTP Server Module
//!
//! Axum server exposing the technology API.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/technologies` - Technology CRUD

pub mod config;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::{build_router, HttpServer, ServerError};
