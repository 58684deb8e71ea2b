//! Server module for the Saucier serve crate

use crate::api::create_routes;
use crate::handlers::AppState;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use saucier_core::{ProxyConfig, Result, SaucierError};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Saucier HTTP server
pub struct ProxyServer {
    config: ProxyConfig,
    app: Router,
}

impl ProxyServer {
    /// Create a new server instance with async initialization
    pub async fn new(config: ProxyConfig) -> Result<Self> {
        let app = create_app(&config).await?;

        Ok(Self { config, app })
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| SaucierError::validation(format!("Invalid address {}: {}", addr, e)))?;

        tracing::info!("Starting Saucier proxy on {}", addr);
        tracing::info!("Proxying upstream API at {}", self.config.upstream_base_url);

        let listener = tokio::net::TcpListener::bind(socket_addr)
            .await
            .map_err(|e| SaucierError::network(format!("Failed to bind to {}: {}", addr, e)))?;

        axum::serve(listener, self.app)
            .await
            .map_err(|e| SaucierError::network(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server configuration
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Create the Axum application with middleware
async fn create_app(config: &ProxyConfig) -> Result<Router> {
    let state = AppState::new(config.clone()).await?;

    let mut app = create_routes().with_state(state);

    // Add middleware layers
    app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(config.max_request_size)),
    );

    // Add CORS if enabled
    if config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin("*".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE]);

        app = app.layer(cors);
    }

    Ok(app)
}

/// Server builder for configuration
pub struct ServerBuilder {
    config: ProxyConfig,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: ProxyConfig::default(),
        }
    }

    /// Set the host address
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the upstream API base URL
    pub fn upstream_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.upstream_base_url = url.into();
        self
    }

    /// Set the redis URL for the result cache
    pub fn redis_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.redis_url = url.into();
        self
    }

    /// Set the cache entry TTL in seconds
    pub fn cache_ttl(mut self, seconds: u64) -> Self {
        self.config.cache_ttl_seconds = seconds;
        self
    }

    /// Set the per-call upstream timeout in seconds
    pub fn request_timeout(mut self, seconds: u64) -> Self {
        self.config.request_timeout_seconds = seconds;
        self
    }

    /// Enable or disable CORS
    pub fn cors(mut self, enabled: bool) -> Self {
        self.config.cors_enabled = enabled;
        self
    }

    /// Set maximum request size
    pub fn max_request_size(mut self, size: usize) -> Self {
        self.config.max_request_size = size;
        self
    }

    /// Build the server with async initialization
    pub async fn build(self) -> Result<ProxyServer> {
        ProxyServer::new(self.config).await
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
