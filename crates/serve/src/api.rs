//! Route table for the Saucier proxy
//!
//! Paths, methods and payload shapes mirror the upstream-facing API this
//! proxy replaces.

use crate::handlers::{self, AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};

/// API routes configuration
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .route("/search/ingredients", post(handlers::search_ingredients))
        .route("/search/cuisine", post(handlers::search_cuisine))
        .route("/search/dish", post(handlers::search_dish))
        .route("/search/general", post(handlers::search_general))
        .route("/search/hybrid", post(handlers::search_hybrid))
        .route("/search/similar/:recipe_id", post(handlers::search_similar))
        .route("/search/enhanced", post(handlers::search_enhanced))
        .route("/cache/stats", get(handlers::cache_stats))
        .route("/cache/clear", delete(handlers::cache_clear))
}
