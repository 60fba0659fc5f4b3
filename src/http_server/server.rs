//! # HTTP Server
//!
//! Combines the technology routes and the health endpoint into one Axum
//! router with CORS and request tracing.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::header::InvalidHeaderName;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::log_event;
use crate::observability::Event;
use crate::rest_api::{technology_routes, AlertHeaders, TechnologyState};
use crate::storage::TechnologyRepository;

use super::config::{HttpServerConfig, InvalidOrigin};
use super::observability_routes::health_routes;

/// Server startup and runtime errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid socket address '{0}'")]
    InvalidAddress(String),

    #[error("application name cannot be used in alert headers: {0}")]
    InvalidApplicationName(#[from] InvalidHeaderName),

    #[error(transparent)]
    InvalidCorsOrigin(#[from] InvalidOrigin),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP Server for the technology API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given repository
    pub fn new(
        config: &AppConfig,
        repository: Arc<dyn TechnologyRepository>,
    ) -> Result<Self, ServerError> {
        let alerts = AlertHeaders::new(&config.application_name)?;
        let state = Arc::new(TechnologyState::new(repository, alerts));
        let router = build_router(&config.server, state)?;
        Ok(Self {
            config: config.server.clone(),
            router,
        })
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), ServerError> {
        let addr_str = self.config.socket_addr();
        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|_| ServerError::InvalidAddress(addr_str.clone()))?;

        let listener = TcpListener::bind(addr).await?;
        log_event!(Event::ServerListening, addr = %addr_str);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event!(Event::ShutdownComplete);
        Ok(())
    }
}

/// Build the combined router
pub fn build_router(
    config: &HttpServerConfig,
    state: Arc<TechnologyState>,
) -> Result<Router, ServerError> {
    let cors = config.cors_layer()?;

    Ok(Router::new()
        .merge(health_routes())
        .nest("/api", technology_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    log_event!(Event::ShutdownStart);
}
