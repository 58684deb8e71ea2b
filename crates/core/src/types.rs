//! Request and response types for the Saucier proxy
//!
//! Every operation has its own typed request with an explicit
//! canonicalization into the cache-key input (`cache_params`) and into
//! the upstream wire payload (`upstream_payload`), so cache keys never
//! depend on loose parameter maps.

use crate::{Result, SaucierError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Maximum number of results a caller may request
pub const MAX_LIMIT: u32 = 50;
/// Maximum length for free-text query and ingredient fields
pub const MAX_QUERY_LEN: usize = 500;
/// Maximum length for cuisine and dish name fields
pub const MAX_NAME_LEN: usize = 200;

fn default_limit() -> u32 {
    10
}

fn default_similar_limit() -> u32 {
    5
}

fn check_limit(limit: u32) -> Result<()> {
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(SaucierError::validation(format!(
            "limit must be between 1 and {}, got {}",
            MAX_LIMIT, limit
        )));
    }
    Ok(())
}

fn check_text(field: &str, value: &str, max_len: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SaucierError::validation(format!(
            "{} must not be empty",
            field
        )));
    }
    if value.len() > max_len {
        return Err(SaucierError::validation(format!(
            "{} must be at most {} characters, got {}",
            field,
            max_len,
            value.len()
        )));
    }
    Ok(())
}

/// The search operations the proxy fronts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchOperation {
    Ingredients,
    Cuisine,
    Dish,
    General,
    Hybrid,
    Similar,
}

impl SearchOperation {
    /// Stable name used as the cache-key prefix and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingredients => "ingredients",
            Self::Cuisine => "cuisine",
            Self::Dish => "dish",
            Self::General => "general",
            Self::Hybrid => "hybrid",
            Self::Similar => "similar",
        }
    }

    /// Upstream endpoint path for this operation
    pub fn upstream_path(&self) -> &'static str {
        match self {
            Self::Ingredients => "/search/ingredients",
            Self::Cuisine => "/search/cuisine",
            Self::Dish => "/search/dish",
            Self::General => "/search/general",
            Self::Hybrid => "/search/hybrid",
            Self::Similar => "/search/similar",
        }
    }
}

impl std::fmt::Display for SearchOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// General and hybrid search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSearchRequest {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl GeneralSearchRequest {
    pub fn validate(&self) -> Result<()> {
        check_text("query", &self.query, MAX_QUERY_LEN)?;
        check_limit(self.limit)
    }

    /// Parameters fed into cache-key derivation
    pub fn cache_params(&self) -> Value {
        json!({ "query": self.query, "limit": self.limit })
    }

    /// Payload sent upstream; the external `query` field maps to the
    /// upstream `q` field
    pub fn upstream_payload(&self) -> Value {
        json!({ "q": self.query, "limit": self.limit })
    }
}

/// Ingredient search request; `ingredients` is comma-separated text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientSearchRequest {
    pub ingredients: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl IngredientSearchRequest {
    pub fn validate(&self) -> Result<()> {
        check_text("ingredients", &self.ingredients, MAX_QUERY_LEN)?;
        check_limit(self.limit)
    }

    pub fn cache_params(&self) -> Value {
        json!({ "ingredients": self.ingredients, "limit": self.limit })
    }

    pub fn upstream_payload(&self) -> Value {
        json!({ "ingredients": self.ingredients, "limit": self.limit })
    }
}

/// Cuisine search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuisineSearchRequest {
    pub cuisine: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl CuisineSearchRequest {
    pub fn validate(&self) -> Result<()> {
        check_text("cuisine", &self.cuisine, MAX_NAME_LEN)?;
        check_limit(self.limit)
    }

    pub fn cache_params(&self) -> Value {
        json!({ "cuisine": self.cuisine, "limit": self.limit })
    }

    pub fn upstream_payload(&self) -> Value {
        json!({ "cuisine": self.cuisine, "limit": self.limit })
    }
}

/// Dish-name search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishSearchRequest {
    pub dish: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl DishSearchRequest {
    pub fn validate(&self) -> Result<()> {
        check_text("dish", &self.dish, MAX_NAME_LEN)?;
        check_limit(self.limit)
    }

    pub fn cache_params(&self) -> Value {
        json!({ "dish": self.dish, "limit": self.limit })
    }

    pub fn upstream_payload(&self) -> Value {
        json!({ "dish": self.dish, "limit": self.limit })
    }
}

/// Query parameters for the similar-recipes operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarParams {
    #[serde(default = "default_similar_limit")]
    pub limit: u32,
}

impl Default for SimilarParams {
    fn default() -> Self {
        Self {
            limit: default_similar_limit(),
        }
    }
}

impl SimilarParams {
    pub fn validate(&self) -> Result<()> {
        check_limit(self.limit)
    }

    pub fn cache_params(&self, recipe_id: i64) -> Value {
        json!({ "recipe_id": recipe_id, "limit": self.limit })
    }

    pub fn upstream_payload(&self) -> Value {
        json!({ "limit": self.limit })
    }
}

/// A single recipe hit as returned by the upstream search API
///
/// `recipe_id` is the deduplication identity within a merged response.
/// Wire field names match the upstream exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResult {
    pub recipe_id: i64,
    pub name: String,
    pub category: String,
    pub area: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    pub similarity_score: f64,
    pub matched_content: String,
    pub matched_type: String,
}

/// Response for the parallel enhanced search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedSearchResponse {
    pub query: String,
    pub search_type: String,
    pub results: Vec<RecipeResult>,
    pub count: usize,
    pub successful_searches: usize,
    pub total_searches: usize,
    pub cached: bool,
    pub response_time_ms: u64,
}
