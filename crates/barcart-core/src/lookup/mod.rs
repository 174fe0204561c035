//! Recipe Lookup Service.
//!
//! A read-through cache in front of a `RecipeSource`: normalized query in,
//! best-matching `Recipe` out. Cached entries are never refreshed or evicted.
//!
//! The steps are also exposed separately (`cached`, `fetch_best_match`,
//! `remember`) so a UI can run the network step off its event loop and
//! discard stale answers with a `RequestSequencer`.

pub mod sequence;

use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{ApiError, RecipeSource};
use crate::models::Recipe;
use crate::storage::{parse_or_default, Storage, StorageError};

pub use sequence::{RequestSequencer, RequestTicket};

/// Prefix for per-query cache keys.
const CACHE_KEY_PREFIX: &str = "recipe_";

/// The one message users see for any failed lookup.
pub const NO_RECIPE_MESSAGE: &str = "No recipe found. Try another name.";

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("No recipe found for '{0}'")]
    NotFound(String),

    #[error("Recipe search failed: {0}")]
    Transport(#[from] ApiError),
}

impl LookupError {
    /// Uniform user-facing text. Both kinds collapse to the same message.
    pub fn user_message(&self) -> &'static str {
        NO_RECIPE_MESSAGE
    }
}

/// Trim and lowercase a query. Idempotent.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Storage key for a normalized query.
pub fn cache_key(normalized: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{normalized}")
}

/// Pick the candidate whose lowercased name equals `normalized`,
/// otherwise the first candidate in upstream order.
pub fn select_best_match(candidates: Vec<Recipe>, normalized: &str) -> Option<Recipe> {
    let exact = candidates
        .iter()
        .position(|r| r.name.to_lowercase() == normalized);
    let index = exact.unwrap_or(0);
    candidates.into_iter().nth(index)
}

/// Network half of a lookup: search with the original text, then pick the best match.
pub async fn fetch_best_match<U>(source: &U, query: &str) -> Result<Recipe, LookupError>
where
    U: RecipeSource + ?Sized,
{
    let normalized = normalize_query(query);
    let candidates = source
        .search(query)
        .await?
        .ok_or_else(|| LookupError::NotFound(query.to_string()))?;

    debug!(query, candidates = candidates.len(), "Upstream candidates");
    select_best_match(candidates, &normalized).ok_or_else(|| LookupError::NotFound(query.to_string()))
}

pub struct RecipeLookup<S, U> {
    storage: S,
    source: U,
}

impl<S: Storage, U: RecipeSource> RecipeLookup<S, U> {
    pub fn new(storage: S, source: U) -> Self {
        Self { storage, source }
    }

    pub fn source(&self) -> &U {
        &self.source
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Cached recipe for `query`, if one was stored. Malformed entries count as misses.
    pub fn cached(&self, query: &str) -> Option<Recipe> {
        let key = cache_key(&normalize_query(query));
        let raw = match self.storage.get(&key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "Failed to read recipe cache");
                return None;
            }
        };
        let recipe: Option<Recipe> = parse_or_default(raw.as_deref(), None);
        debug!(key, hit = recipe.is_some(), "Recipe cache lookup");
        recipe
    }

    /// Store `recipe` under the normalized `query`. Failure is logged, not returned.
    pub fn remember(&mut self, query: &str, recipe: &Recipe) {
        let key = cache_key(&normalize_query(query));
        let result = serde_json::to_string(recipe)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set(&key, &json));
        if let Err(e) = result {
            warn!(key, error = %e, "Failed to cache recipe");
        }
    }

    /// Full lookup: cache first, then upstream, writing the match back to the cache.
    pub async fn lookup(&mut self, query: &str) -> Result<Recipe, LookupError> {
        if let Some(recipe) = self.cached(query) {
            return Ok(recipe);
        }

        let recipe = fetch_best_match(&self.source, query).await?;
        self.remember(query, &recipe);
        Ok(recipe)
    }
}
