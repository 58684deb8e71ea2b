//! HTTP handlers for the Saucier proxy
//!
//! Every cached search operation follows the same read-through flow:
//! derive the cache key, try the cache, on a miss call the upstream and
//! store the annotated result. Elapsed time is measured fresh on every
//! call, hits included.

use crate::enhanced::EnhancedSearchEngine;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use saucier_core::{
    derive_key, CuisineSearchRequest, DishSearchRequest, GeneralSearchRequest,
    IngredientSearchRequest, ProxyConfig, SaucierError, SearchOperation, SimilarParams,
};
use saucier_infra::{CacheConfig, ResultCache, UpstreamClient, UpstreamConfig};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Application state shared across handlers
///
/// The upstream client and the cache connection are created once at
/// startup and reused by all concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
    pub cache: Arc<ResultCache>,
    pub config: ProxyConfig,
}

impl AppState {
    /// Create application state, probing the cache store once
    pub async fn new(config: ProxyConfig) -> saucier_core::Result<Self> {
        config.validate()?;

        let upstream = UpstreamClient::new(UpstreamConfig {
            base_url: config.upstream_base_url.clone(),
            timeout: Duration::from_secs(config.request_timeout_seconds),
        });

        let cache = ResultCache::connect(CacheConfig {
            redis_url: config.redis_url.clone(),
            ttl_seconds: config.cache_ttl_seconds,
        })
        .await;

        Ok(Self {
            upstream: Arc::new(upstream),
            cache: Arc::new(cache),
            config,
        })
    }

    /// Create application state from existing clients (for testing)
    pub fn from_parts(
        config: ProxyConfig,
        upstream: Arc<UpstreamClient>,
        cache: Arc<ResultCache>,
    ) -> Self {
        Self {
            upstream,
            cache,
            config,
        }
    }
}

/// Structured error payload returned for every failure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

/// Wrapper turning a `SaucierError` into an HTTP response
pub struct ApiError(pub SaucierError);

impl From<SaucierError> for ApiError {
    fn from(err: SaucierError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        } else {
            tracing::warn!("Request rejected: {}", self.0);
        }

        let error = match &self.0 {
            SaucierError::Validation { message } => message.clone(),
            SaucierError::UpstreamStatus { message, .. } => message.clone(),
            SaucierError::UpstreamUnreachable { message } => message.clone(),
            other => other.to_string(),
        };

        // The short message above drops the variant prefix; the full
        // display goes into details
        (
            status,
            Json(ErrorResponse {
                error,
                details: Some(self.0.to_string()),
            }),
        )
            .into_response()
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Annotate a response object with cache metadata
fn annotate(result: &mut Value, cached: bool, start: Instant) {
    if let Some(obj) = result.as_object_mut() {
        obj.insert("cached".to_string(), Value::Bool(cached));
        obj.insert("response_time_ms".to_string(), json!(elapsed_ms(start)));
    }
}

/// Read-through flow shared by all cached search operations
async fn cached_search(
    state: &AppState,
    operation: SearchOperation,
    upstream_path: String,
    cache_params: &Value,
    upstream_payload: &Value,
) -> Result<Json<Value>, ApiError> {
    let start = Instant::now();
    let key = derive_key(operation.as_str(), cache_params);

    if let Some(mut hit) = state.cache.get(&key).await {
        tracing::debug!("Cache hit for {} search", operation);
        annotate(&mut hit, true, start);
        return Ok(Json(hit));
    }

    let mut result = state
        .upstream
        .post_json(&upstream_path, upstream_payload)
        .await?;
    annotate(&mut result, false, start);

    // Failed upstream calls never reach this point, so only successful
    // payloads are written back
    state.cache.set(&key, &result).await;

    Ok(Json(result))
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "service": crate::SERVICE_NAME,
        "status": "healthy",
        "laravel_api": state.upstream.base_url(),
        "cache_enabled": state.cache.enabled(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Proxy upstream search statistics, annotated with proxy metadata
pub async fn stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let start = Instant::now();

    let mut result = state.upstream.get_json("/search/stats").await?;
    if let Some(obj) = result.as_object_mut() {
        obj.insert(
            "proxy_info".to_string(),
            json!({
                "cache_enabled": state.cache.enabled(),
                "response_time_ms": elapsed_ms(start),
            }),
        );
    }

    Ok(Json(result))
}

/// Search recipes by ingredients, cached
pub async fn search_ingredients(
    State(state): State<AppState>,
    Json(request): Json<IngredientSearchRequest>,
) -> Result<Json<Value>, ApiError> {
    request.validate()?;
    cached_search(
        &state,
        SearchOperation::Ingredients,
        SearchOperation::Ingredients.upstream_path().to_string(),
        &request.cache_params(),
        &request.upstream_payload(),
    )
    .await
}

/// Search recipes by cuisine, cached
pub async fn search_cuisine(
    State(state): State<AppState>,
    Json(request): Json<CuisineSearchRequest>,
) -> Result<Json<Value>, ApiError> {
    request.validate()?;
    cached_search(
        &state,
        SearchOperation::Cuisine,
        SearchOperation::Cuisine.upstream_path().to_string(),
        &request.cache_params(),
        &request.upstream_payload(),
    )
    .await
}

/// Search recipes by dish name, cached
pub async fn search_dish(
    State(state): State<AppState>,
    Json(request): Json<DishSearchRequest>,
) -> Result<Json<Value>, ApiError> {
    request.validate()?;
    cached_search(
        &state,
        SearchOperation::Dish,
        SearchOperation::Dish.upstream_path().to_string(),
        &request.cache_params(),
        &request.upstream_payload(),
    )
    .await
}

/// General recipe search, cached
pub async fn search_general(
    State(state): State<AppState>,
    Json(request): Json<GeneralSearchRequest>,
) -> Result<Json<Value>, ApiError> {
    request.validate()?;
    cached_search(
        &state,
        SearchOperation::General,
        SearchOperation::General.upstream_path().to_string(),
        &request.cache_params(),
        &request.upstream_payload(),
    )
    .await
}

/// Hybrid recipe search, cached
pub async fn search_hybrid(
    State(state): State<AppState>,
    Json(request): Json<GeneralSearchRequest>,
) -> Result<Json<Value>, ApiError> {
    request.validate()?;
    cached_search(
        &state,
        SearchOperation::Hybrid,
        SearchOperation::Hybrid.upstream_path().to_string(),
        &request.cache_params(),
        &request.upstream_payload(),
    )
    .await
}

/// Find recipes similar to a given recipe, cached
pub async fn search_similar(
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
    Query(params): Query<SimilarParams>,
) -> Result<Json<Value>, ApiError> {
    params.validate()?;
    cached_search(
        &state,
        SearchOperation::Similar,
        format!("{}/{}", SearchOperation::Similar.upstream_path(), recipe_id),
        &params.cache_params(recipe_id),
        &params.upstream_payload(),
    )
    .await
}

/// Enhanced search fanning out to multiple strategies in parallel
///
/// Never cache-read or cache-written.
pub async fn search_enhanced(
    State(state): State<AppState>,
    Json(request): Json<GeneralSearchRequest>,
) -> Result<Json<saucier_core::EnhancedSearchResponse>, ApiError> {
    request.validate()?;

    let engine = EnhancedSearchEngine::new(Arc::clone(&state.upstream));
    let response = engine.search(&request.query, request.limit).await?;

    Ok(Json(response))
}

/// Cache introspection endpoint
pub async fn cache_stats(State(state): State<AppState>) -> impl IntoResponse {
    if !state.cache.enabled() {
        return Json(json!({
            "cache_enabled": false,
            "message": "Redis not available",
        }));
    }

    match state.cache.stats().await {
        Ok(info) => Json(json!({
            "cache_enabled": true,
            "connected_clients": info.connected_clients,
            "used_memory_human": info.used_memory_human,
            "keyspace_hits": info.keyspace_hits,
            "keyspace_misses": info.keyspace_misses,
            "cache_ttl_seconds": info.ttl_seconds,
        })),
        Err(e) => Json(json!({
            "cache_enabled": false,
            "error": e.to_string(),
        })),
    }
}

/// Purge all cached entries
pub async fn cache_clear(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if !state.cache.enabled() {
        return Ok(Json(json!({
            "cache_enabled": false,
            "message": "Redis not available",
        })));
    }

    if state.cache.clear().await {
        Ok(Json(json!({
            "success": true,
            "message": "Cache cleared successfully",
        })))
    } else {
        Err(SaucierError::cache("Failed to clear cache").into())
    }
}
