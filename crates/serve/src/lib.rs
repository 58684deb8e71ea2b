//! Saucier Serve Library
//!
//! HTTP surface for the Saucier caching proxy. Routes mirror the upstream
//! recipe-search API one-to-one so the proxy is a drop-in replacement.

pub mod api;
pub mod enhanced;
pub mod handlers;
pub mod server;

pub use handlers::AppState;
pub use server::{ProxyServer, ServerBuilder};

/// Server version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "Recipe Search Proxy API";
