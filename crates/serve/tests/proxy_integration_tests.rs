//! Integration tests for the proxy routes
//!
//! These run the real router against a mock upstream server with the
//! cache store unreachable, which exercises the degraded always-miss
//! path every cached endpoint must support.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use saucier_core::ProxyConfig;
use saucier_infra::{ResultCache, UpstreamClient, UpstreamConfig};
use saucier_serve::api::create_routes;
use saucier_serve::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Creates a test router backed by the given upstream URL, with the
/// cache disabled
fn create_test_router(upstream_url: &str) -> Router {
    let upstream = Arc::new(UpstreamClient::new(UpstreamConfig {
        base_url: upstream_url.to_string(),
        timeout: Duration::from_secs(5),
    }));
    let cache = Arc::new(ResultCache::disabled());
    let state = AppState::from_parts(ProxyConfig::default(), upstream, cache);

    create_routes().with_state(state)
}

/// Helper to make a GET request
async fn make_get_request(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, value)
}

/// Helper to make a request with a JSON body
async fn make_json_request(
    router: Router,
    method: &str,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .uri(uri)
                .method(method)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, value)
}

fn recipe_body(entries: &[(i64, f64)]) -> String {
    let results: Vec<Value> = entries
        .iter()
        .map(|(id, score)| {
            json!({
                "recipe_id": id,
                "name": format!("recipe-{}", id),
                "category": "Pasta",
                "area": "Italian",
                "thumbnail_url": null,
                "youtube_url": null,
                "similarity_score": score,
                "matched_content": "pasta",
                "matched_type": "name"
            })
        })
        .collect();
    json!({"results": results, "count": results.len()}).to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let router = create_test_router("http://127.0.0.1:1");

    let (status, body) = make_get_request(router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "Recipe Search Proxy API");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cache_enabled"], false);
    assert_eq!(body["laravel_api"], "http://127.0.0.1:1");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_ingredient_search_returns_upstream_results() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/search/ingredients")
        .match_body(mockito::Matcher::Json(
            json!({"ingredients": "chicken, tomato", "limit": 5}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recipe_body(&[(1, 0.9), (2, 0.8), (3, 0.7)]))
        .create_async()
        .await;

    let router = create_test_router(&server.url());
    let (status, body) = make_json_request(
        router,
        "POST",
        "/search/ingredients",
        json!({"ingredients": "chicken, tomato", "limit": 5}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["cached"], false);
    assert!(body["response_time_ms"].is_u64());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_general_search_maps_query_to_q() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/search/general")
        .match_body(mockito::Matcher::Json(json!({"q": "pasta", "limit": 10})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recipe_body(&[(1, 0.9)]))
        .create_async()
        .await;

    let router = create_test_router(&server.url());
    let (status, _body) = make_json_request(
        router,
        "POST",
        "/search/general",
        json!({"query": "pasta", "limit": 10}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_query_rejected_before_upstream() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/search/general")
        .expect(0)
        .create_async()
        .await;

    let router = create_test_router(&server.url());
    let (status, body) = make_json_request(
        router,
        "POST",
        "/search/general",
        json!({"query": "   ", "limit": 10}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("query"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_limit_out_of_bounds_rejected() {
    let router = create_test_router("http://127.0.0.1:1");
    let (status, body) = make_json_request(
        router,
        "POST",
        "/search/dish",
        json!({"dish": "carbonara", "limit": 200}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_upstream_status_propagates() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/search/cuisine")
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let router = create_test_router(&server.url());
    let (status, body) = make_json_request(
        router,
        "POST",
        "/search/cuisine",
        json!({"cuisine": "italian", "limit": 10}),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
    assert!(body["details"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_upstream_unreachable_is_internal_error() {
    let router = create_test_router("http://127.0.0.1:1");
    let (status, body) = make_json_request(
        router,
        "POST",
        "/search/hybrid",
        json!({"query": "pasta", "limit": 10}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_similar_search_with_default_limit() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/search/similar/42")
        .match_body(mockito::Matcher::Json(json!({"limit": 5})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recipe_body(&[(7, 0.6)]))
        .create_async()
        .await;

    let router = create_test_router(&server.url());
    let (status, body) =
        make_json_request(router, "POST", "/search/similar/42", Value::Null).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_similar_search_limit_validated() {
    let router = create_test_router("http://127.0.0.1:1");
    let (status, _body) =
        make_json_request(router, "POST", "/search/similar/42?limit=60", Value::Null).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_enhanced_search_merges_and_dedupes() {
    let mut server = mockito::Server::new_async().await;

    // Sub-limit is 6 / 2 = 3 for each strategy
    server
        .mock("POST", "/search/general")
        .match_body(mockito::Matcher::Json(
            json!({"q": "italian pasta", "limit": 3}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recipe_body(&[(1, 0.5), (2, 0.9)]))
        .create_async()
        .await;

    server
        .mock("POST", "/search/ingredients")
        .match_body(mockito::Matcher::Json(
            json!({"ingredients": "italian pasta", "limit": 3}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recipe_body(&[(1, 0.99), (3, 0.7)]))
        .create_async()
        .await;

    server
        .mock("POST", "/search/dish")
        .match_body(mockito::Matcher::Json(
            json!({"dish": "italian pasta", "limit": 3}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recipe_body(&[(4, 0.3)]))
        .create_async()
        .await;

    let router = create_test_router(&server.url());
    let (status, body) = make_json_request(
        router,
        "POST",
        "/search/enhanced",
        json!({"query": "italian pasta", "limit": 6}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["search_type"], "enhanced_parallel");
    assert_eq!(body["successful_searches"], 3);
    assert_eq!(body["total_searches"], 3);
    assert_eq!(body["cached"], false);

    let results = body["results"].as_array().unwrap();
    assert!(results.len() <= 6);
    assert_eq!(body["count"], results.len());

    // No duplicate recipe ids
    let mut ids: Vec<i64> = results
        .iter()
        .map(|r| r["recipe_id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    let before = ids.len();
    ids.dedup();
    assert_eq!(ids.len(), before);

    // Scores are non-increasing
    let scores: Vec<f64> = results
        .iter()
        .map(|r| r["similarity_score"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    // The duplicate id 1 kept the general-strategy entry (score 0.5)
    let first = results
        .iter()
        .find(|r| r["recipe_id"] == 1)
        .unwrap();
    assert_eq!(first["similarity_score"], 0.5);
}

#[tokio::test]
async fn test_enhanced_search_partial_failure() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/search/general")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recipe_body(&[(1, 0.9)]))
        .create_async()
        .await;

    server
        .mock("POST", "/search/ingredients")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recipe_body(&[(2, 0.8)]))
        .create_async()
        .await;

    server
        .mock("POST", "/search/dish")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let router = create_test_router(&server.url());
    let (status, body) = make_json_request(
        router,
        "POST",
        "/search/enhanced",
        json!({"query": "pasta", "limit": 6}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["successful_searches"], 2);
    assert_eq!(body["total_searches"], 3);
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_enhanced_search_validates_input() {
    let router = create_test_router("http://127.0.0.1:1");
    let (status, _body) = make_json_request(
        router,
        "POST",
        "/search/enhanced",
        json!({"query": "pasta", "limit": 0}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_adds_proxy_info() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/search/stats")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"total_recipes": 300, "total_searches": 12}"#)
        .create_async()
        .await;

    let router = create_test_router(&server.url());
    let (status, body) = make_get_request(router, "/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_recipes"], 300);
    assert_eq!(body["proxy_info"]["cache_enabled"], false);
    assert!(body["proxy_info"]["response_time_ms"].is_u64());
}

#[tokio::test]
async fn test_cache_stats_when_disabled() {
    let router = create_test_router("http://127.0.0.1:1");
    let (status, body) = make_get_request(router, "/cache/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cache_enabled"], false);
    assert_eq!(body["message"], "Redis not available");
}

#[tokio::test]
async fn test_cache_clear_when_disabled() {
    let router = create_test_router("http://127.0.0.1:1");

    let response = router
        .oneshot(
            Request::builder()
                .uri("/cache/clear")
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["cache_enabled"], false);
}

#[tokio::test]
async fn test_repeat_search_served_from_cache() {
    // One upstream call only; the second request is answered from the
    // cache with the cached flag flipped and the timing re-measured
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/search/general")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recipe_body(&[(1, 0.9), (2, 0.8)]))
        .expect(1)
        .create_async()
        .await;

    let upstream = Arc::new(UpstreamClient::new(UpstreamConfig {
        base_url: server.url(),
        timeout: Duration::from_secs(5),
    }));
    let cache = Arc::new(ResultCache::in_memory(60));
    let state = AppState::from_parts(ProxyConfig::default(), upstream, cache);

    let router = create_routes().with_state(state.clone());
    let (status, body) = make_json_request(
        router,
        "POST",
        "/search/general",
        json!({"query": "pasta", "limit": 10}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], false);
    assert_eq!(body["count"], 2);

    let router = create_routes().with_state(state);
    let (status, body) = make_json_request(
        router,
        "POST",
        "/search/general",
        json!({"query": "pasta", "limit": 10}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], true);
    assert_eq!(body["count"], 2);
    assert!(body["response_time_ms"].is_u64());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_cache_clear_forces_fresh_fetch() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/search/dish")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recipe_body(&[(5, 0.7)]))
        .expect(2)
        .create_async()
        .await;

    let upstream = Arc::new(UpstreamClient::new(UpstreamConfig {
        base_url: server.url(),
        timeout: Duration::from_secs(5),
    }));
    let cache = Arc::new(ResultCache::in_memory(60));
    let state = AppState::from_parts(ProxyConfig::default(), upstream, cache);

    let router = create_routes().with_state(state.clone());
    let (status, body) = make_json_request(
        router,
        "POST",
        "/search/dish",
        json!({"dish": "carbonara", "limit": 5}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], false);

    let router = create_routes().with_state(state.clone());
    let response = router
        .oneshot(
            Request::builder()
                .uri("/cache/clear")
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let raw = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let cleared: Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(cleared["success"], true);
    assert_eq!(cleared["message"], "Cache cleared successfully");

    // The purged entry is gone; the same request goes upstream again
    let router = create_routes().with_state(state);
    let (status, body) = make_json_request(
        router,
        "POST",
        "/search/dish",
        json!({"dish": "carbonara", "limit": 5}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], false);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_degraded_cache_still_serves_fresh_results() {
    // Two identical calls with the cache down both hit upstream and both
    // report cached=false
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/search/dish")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(recipe_body(&[(9, 0.4)]))
        .expect(2)
        .create_async()
        .await;

    let upstream = Arc::new(UpstreamClient::new(UpstreamConfig {
        base_url: server.url(),
        timeout: Duration::from_secs(5),
    }));
    let cache = Arc::new(ResultCache::disabled());
    let state = AppState::from_parts(ProxyConfig::default(), upstream, cache);

    for _ in 0..2 {
        let router = create_routes().with_state(state.clone());
        let (status, body) = make_json_request(
            router,
            "POST",
            "/search/dish",
            json!({"dish": "carbonara", "limit": 5}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cached"], false);
    }

    mock.assert_async().await;
}
