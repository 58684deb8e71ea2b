//! Parallel enhanced search
//!
//! Fans a query out to the general, ingredient and dish search strategies
//! concurrently, then merges, deduplicates, ranks and truncates the
//! combined results. The join tolerates individual strategy failures: a
//! failed sub-search is logged and skipped, never escalated, as long as
//! the orchestration itself completes.

use saucier_core::{EnhancedSearchResponse, RecipeResult, Result, SaucierError};
use saucier_infra::UpstreamClient;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Number of upstream strategies a query fans out to
pub const TOTAL_SEARCHES: usize = 3;

/// Search type reported in enhanced responses
pub const SEARCH_TYPE: &str = "enhanced_parallel";

/// Orchestrates the concurrent multi-strategy search
pub struct EnhancedSearchEngine {
    upstream: Arc<UpstreamClient>,
}

impl EnhancedSearchEngine {
    pub fn new(upstream: Arc<UpstreamClient>) -> Self {
        Self { upstream }
    }

    /// Run the fan-out search and merge the outcomes
    ///
    /// Each strategy is requested with `limit / 2` results; the merged,
    /// deduplicated pool is ranked by similarity and truncated to `limit`.
    /// Enhanced results are never cached.
    pub async fn search(&self, query: &str, limit: u32) -> Result<EnhancedSearchResponse> {
        let start = Instant::now();
        let sub_limit = limit / 2;

        let general_body = json!({"q": query, "limit": sub_limit});
        let ingredients_body = json!({"ingredients": query, "limit": sub_limit});
        let dish_body = json!({"dish": query, "limit": sub_limit});

        let general = self.upstream.post_json("/search/general", &general_body);
        let ingredients = self
            .upstream
            .post_json("/search/ingredients", &ingredients_body);
        let dish = self.upstream.post_json("/search/dish", &dish_body);

        // All three run concurrently; a failure in one does not cancel
        // the others
        let (general, ingredients, dish) = tokio::join!(general, ingredients, dish);

        let outcomes = [
            ("general", general),
            ("ingredients", ingredients),
            ("dish", dish),
        ];

        let mut combined = Vec::new();
        let mut successful_searches = 0;

        for (strategy, outcome) in outcomes {
            match outcome.and_then(extract_results) {
                Ok(results) => {
                    combined.extend(results);
                    successful_searches += 1;
                }
                Err(e) => {
                    tracing::warn!("{} search failed: {}", strategy, e);
                }
            }
        }

        let results = dedup_and_rank(combined, limit as usize);
        let count = results.len();

        Ok(EnhancedSearchResponse {
            query: query.to_string(),
            search_type: SEARCH_TYPE.to_string(),
            results,
            count,
            successful_searches,
            total_searches: TOTAL_SEARCHES,
            cached: false,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Pull the typed result list out of an upstream response body
fn extract_results(mut value: Value) -> Result<Vec<RecipeResult>> {
    let results = value
        .get_mut("results")
        .map(Value::take)
        .ok_or_else(|| SaucierError::invalid_state("upstream response has no results field"))?;

    Ok(serde_json::from_value(results)?)
}

/// Deduplicate by recipe id, rank by similarity, truncate
///
/// The first occurrence of a recipe id wins, in strategy order; later
/// duplicates are dropped even if their score differs. The sort is stable
/// and descending, so ties keep their prior relative order.
fn dedup_and_rank(combined: Vec<RecipeResult>, limit: usize) -> Vec<RecipeResult> {
    let mut seen = HashSet::new();
    let mut unique: Vec<RecipeResult> = combined
        .into_iter()
        .filter(|r| seen.insert(r.recipe_id))
        .collect();

    unique.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(Ordering::Equal)
    });
    unique.truncate(limit);
    unique
}
