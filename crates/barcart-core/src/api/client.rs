//! HTTP client for TheCocktailDB search endpoint.
//!
//! `ApiClient` is the only code that speaks HTTP. It decodes responses at
//! the boundary, so callers only ever see typed `Recipe` values.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::models::{ApiDrink, Recipe};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Public TheCocktailDB v1 endpoint (test key `1`).
pub const DEFAULT_API_BASE_URL: &str = "https://www.thecocktaildb.com/api/json/v1/1";

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    drinks: Option<Vec<ApiDrink>>,
}

/// Anything that can answer a free-text recipe search.
///
/// `Ok(None)` means the upstream returned no result list at all.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn search(&self, term: &str) -> Result<Option<Vec<Recipe>>, ApiError>;
}

/// Decode a `search.php` body into typed recipes.
pub fn parse_search_response(body: &str) -> Result<Option<Vec<Recipe>>, ApiError> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse search response: {e}")))?;

    Ok(response
        .drinks
        .map(|drinks| drinks.into_iter().map(ApiDrink::into_recipe).collect()))
}

/// API client for TheCocktailDB.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, term: &str) -> String {
        format!("{}/search.php?s={}", self.base_url, urlencoding::encode(term))
    }

    /// Search recipes by name. The term is sent as typed, not normalized.
    pub async fn search_recipes(&self, term: &str) -> Result<Option<Vec<Recipe>>, ApiError> {
        let url = self.search_url(term);
        debug!(%url, "Searching recipes");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let body = response.text().await?;
        let recipes = parse_search_response(&body)?;
        debug!(
            term,
            results = recipes.as_ref().map_or(0, Vec::len),
            "Search complete"
        );
        Ok(recipes)
    }
}

#[async_trait]
impl RecipeSource for ApiClient {
    async fn search(&self, term: &str) -> Result<Option<Vec<Recipe>>, ApiError> {
        self.search_recipes(term).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_null_drinks() {
        assert_eq!(parse_search_response(r#"{"drinks": null}"#).unwrap(), None);
    }

    #[test]
    fn test_parse_missing_drinks() {
        assert_eq!(parse_search_response("{}").unwrap(), None);
    }

    #[test]
    fn test_parse_drinks_list_keeps_order() {
        let body = r#"{"drinks": [
            {"strDrink": "Mojito", "strIngredient1": "Light rum"},
            {"strDrink": "Virgin Mojito"}
        ]}"#;
        let recipes = parse_search_response(body).unwrap().unwrap();
        let names: Vec<&str> = recipes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Mojito", "Virgin Mojito"]);
        assert_eq!(recipes[0].ingredients[0].name, "Light rum");
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_search_response("<html>").unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_search_url_encodes_term() {
        let client = ApiClient::with_base_url("http://localhost:9/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.search_url("Gin & Tonic"),
            "http://localhost:9/api/search.php?s=Gin%20%26%20Tonic"
        );
    }
}
