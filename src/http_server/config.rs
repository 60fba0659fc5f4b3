//! Listener settings for the technology API
//!
//! The `server` section of the application config. `cors_origins` lists the
//! browser origins allowed to call `/api`; left empty, any origin may.

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// An entry of `cors_origins` that is not `http(s)://host[:port]`
#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{origin}' is not a valid CORS origin: {reason}")]
pub struct InvalidOrigin {
    pub origin: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Bind address (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Exact origins, e.g. `http://localhost:9000`
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parse every configured origin, failing on the first bad one.
    pub fn allowed_origins(&self) -> Result<Vec<HeaderValue>, InvalidOrigin> {
        self.cors_origins.iter().map(|o| parse_origin(o)).collect()
    }

    /// CORS policy for the API routes
    pub fn cors_layer(&self) -> Result<CorsLayer, InvalidOrigin> {
        let origins = if self.cors_origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::list(self.allowed_origins()?)
        };

        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any))
    }
}

fn parse_origin(origin: &str) -> Result<HeaderValue, InvalidOrigin> {
    let invalid = |reason| InvalidOrigin {
        origin: origin.to_string(),
        reason,
    };

    let authority = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
        .ok_or_else(|| invalid("scheme must be http or https"))?;

    if authority.is_empty() {
        return Err(invalid("missing host"));
    }
    if authority.contains('/') {
        return Err(invalid("must not contain a path"));
    }
    if authority.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }

    HeaderValue::from_str(origin).map_err(|_| invalid("not a valid header value"))
}
