//! Saucier Core Library
//!
//! Core functionality for the Saucier caching proxy: domain types,
//! configuration, the shared error taxonomy, and deterministic cache-key
//! derivation. This crate performs no I/O.

pub mod cache_key;
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use cache_key::derive_key;
pub use config::ProxyConfig;
pub use error::{Result, SaucierError};
pub use types::{
    CuisineSearchRequest, DishSearchRequest, EnhancedSearchResponse, GeneralSearchRequest,
    IngredientSearchRequest, RecipeResult, SearchOperation, SimilarParams,
};
