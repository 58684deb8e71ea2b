//! Saucier Infrastructure Library
//!
//! Infrastructure components for the Saucier proxy: the upstream HTTP
//! client, the redis-backed result cache, and logging setup. Both clients
//! are constructed once at process start and injected into the components
//! that need them.

pub mod cache;
pub mod logger;
pub mod upstream;

pub use cache::{CacheConfig, CacheInfo, ResultCache};
pub use logger::{init_default_logger, init_logger, logger_config_from_env, LoggerConfig};
pub use upstream::{UpstreamClient, UpstreamConfig};
