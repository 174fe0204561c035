//! REST API client module for TheCocktailDB.
//!
//! This module provides the `ApiClient` for the public, unauthenticated
//! recipe search endpoint and the `RecipeSource` trait the lookup service
//! depends on, so tests can substitute an in-memory upstream.

pub mod client;
pub mod error;

pub use client::{parse_search_response, ApiClient, RecipeSource, DEFAULT_API_BASE_URL};
pub use error::ApiError;
