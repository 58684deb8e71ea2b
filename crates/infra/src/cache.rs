//! Redis-backed result cache
//!
//! The cache is always optional. Connectivity is probed once at startup;
//! if redis is missing or goes away later the proxy degrades to
//! always-miss, and no cache error ever reaches a request handler.

use redis::aio::ConnectionManager;
use saucier_core::{Result, SaucierError};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub redis_url: String,
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            ttl_seconds: 3600,
        }
    }
}

/// Introspection snapshot of the cache store
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfo {
    pub connected_clients: u64,
    pub used_memory_human: String,
    pub keyspace_hits: u64,
    pub keyspace_misses: u64,
    pub ttl_seconds: u64,
}

/// Storage behind the cache: redis in production, a process-local map
/// for tests and redis-less local runs
#[derive(Clone)]
enum Backend {
    Redis(ConnectionManager),
    Memory(Arc<Mutex<HashMap<String, String>>>),
}

/// Read-through cache over an external redis key-value store
#[derive(Clone)]
pub struct ResultCache {
    backend: Option<Backend>,
    ttl_seconds: u64,
}

impl ResultCache {
    /// Connect to redis, degrading to a disabled cache on failure
    ///
    /// This is the single startup probe: a connection failure here is
    /// logged and the returned cache answers every `get` with a miss.
    pub async fn connect(config: CacheConfig) -> Self {
        let backend = match redis::Client::open(config.redis_url.as_str()) {
            Ok(client) => match ConnectionManager::new(client).await {
                Ok(mut conn) => match redis::cmd("PING").query_async::<_, String>(&mut conn).await
                {
                    Ok(_) => {
                        tracing::info!("Redis connected successfully");
                        Some(Backend::Redis(conn))
                    }
                    Err(e) => {
                        tracing::warn!("Redis ping failed: {}. Caching disabled.", e);
                        None
                    }
                },
                Err(e) => {
                    tracing::warn!("Redis connection failed: {}. Caching disabled.", e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Invalid redis URL: {}. Caching disabled.", e);
                None
            }
        };

        Self {
            backend,
            ttl_seconds: config.ttl_seconds,
        }
    }

    /// Build a cache that is permanently disabled
    pub fn disabled() -> Self {
        Self {
            backend: None,
            ttl_seconds: 0,
        }
    }

    /// Build a cache backed by a process-local map
    ///
    /// Entries never expire and nothing is shared across processes.
    /// Intended for tests and local runs without a redis instance.
    pub fn in_memory(ttl_seconds: u64) -> Self {
        Self {
            backend: Some(Backend::Memory(Arc::new(Mutex::new(HashMap::new())))),
            ttl_seconds,
        }
    }

    /// Whether the startup probe succeeded
    pub fn enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Configured entry TTL in seconds
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Fetch a cached value
    ///
    /// Returns `None` uniformly whether the key was never written, has
    /// expired, or the store is unreachable.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let raw = match self.backend.as_ref()? {
            Backend::Redis(conn) => {
                let mut conn = conn.clone();
                match redis::cmd("GET")
                    .arg(key)
                    .query_async::<_, Option<String>>(&mut conn)
                    .await
                {
                    Ok(raw) => raw,
                    Err(e) => {
                        tracing::warn!("Cache read error: {}", e);
                        None
                    }
                }
            }
            Backend::Memory(map) => map.lock().await.get(key).cloned(),
        }?;

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Cache entry for {} is not valid JSON: {}", key, e);
                None
            }
        }
    }

    /// Store a value with the configured TTL, best effort
    ///
    /// Write failures are logged and swallowed; they must never fail the
    /// request that produced the value.
    pub async fn set(&self, key: &str, value: &Value) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };

        let payload = value.to_string();
        match backend {
            Backend::Redis(conn) => {
                let mut conn = conn.clone();
                if let Err(e) = redis::cmd("SETEX")
                    .arg(key)
                    .arg(self.ttl_seconds)
                    .arg(payload)
                    .query_async::<_, ()>(&mut conn)
                    .await
                {
                    tracing::warn!("Cache write error: {}", e);
                }
            }
            Backend::Memory(map) => {
                map.lock().await.insert(key.to_string(), payload);
            }
        }
    }

    /// Purge all entries; returns whether the flush succeeded
    pub async fn clear(&self) -> bool {
        match self.backend.as_ref() {
            None => false,
            Some(Backend::Redis(conn)) => {
                let mut conn = conn.clone();
                match redis::cmd("FLUSHDB").query_async::<_, String>(&mut conn).await {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::warn!("Cache clear error: {}", e);
                        false
                    }
                }
            }
            Some(Backend::Memory(map)) => {
                map.lock().await.clear();
                true
            }
        }
    }

    /// Fetch store statistics from redis INFO
    pub async fn stats(&self) -> Result<CacheInfo> {
        match self.backend.as_ref() {
            None => Err(SaucierError::cache("cache is disabled")),
            Some(Backend::Redis(conn)) => {
                let mut conn = conn.clone();
                let raw: String = redis::cmd("INFO")
                    .query_async(&mut conn)
                    .await
                    .map_err(|e| SaucierError::cache(format!("INFO failed: {}", e)))?;

                Ok(parse_info(&raw, self.ttl_seconds))
            }
            Some(Backend::Memory(_)) => {
                Err(SaucierError::cache("statistics require a redis store"))
            }
        }
    }
}

/// Parse the fields we expose out of a redis INFO dump
fn parse_info(raw: &str, ttl_seconds: u64) -> CacheInfo {
    let mut info = CacheInfo {
        connected_clients: 0,
        used_memory_human: "unknown".to_string(),
        keyspace_hits: 0,
        keyspace_misses: 0,
        ttl_seconds,
    };

    for line in raw.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key {
            "connected_clients" => info.connected_clients = value.parse().unwrap_or(0),
            "used_memory_human" => info.used_memory_human = value.to_string(),
            "keyspace_hits" => info.keyspace_hits = value.parse().unwrap_or(0),
            "keyspace_misses" => info.keyspace_misses = value.parse().unwrap_or(0),
            _ => {}
        }
    }

    info
}
