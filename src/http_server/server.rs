//! # HTTP Server
//!
//! Combines the dataset, query and observability routers into one axum app.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::api::InsightService;
use crate::observability::{log_event, log_event_with_fields, Event};

use super::config::HttpServerConfig;
use super::dataset_routes::dataset_routes;
use super::observability_routes::{health_routes, observability_routes};

pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, service: Arc<InsightService>) -> Self {
        let router = Self::build_router(&config, service);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, service: Arc<InsightService>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .merge(dataset_routes(Arc::clone(&service)))
            .nest("/observability", observability_routes(service))
            .layer(DefaultBodyLimit::max(config.max_body_bytes))
            .layer(cors)
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Binds and serves until the process is stopped
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        log_event_with_fields(Event::ServerStart, &[("addr", &addr.to_string())]);

        axum::serve(listener, self.router).await?;

        log_event(Event::ServerStop);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let server = HttpServer::new(
            HttpServerConfig::default(),
            Arc::new(InsightService::in_memory()),
        );
        assert_eq!(server.socket_addr(), "0.0.0.0:4321");
    }

    #[test]
    fn test_router_builds_with_any_origin() {
        let config = HttpServerConfig {
            cors_origins: Vec::new(),
            ..HttpServerConfig::with_port(8080)
        };
        let server = HttpServer::new(config, Arc::new(InsightService::in_memory()));
        let _router = server.router();
    }
}
