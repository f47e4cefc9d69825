//! City suggestions for the search box.
//! Uses OpenCage forward geocoding.

use crate::provider::{http_client, DEFAULT_TIMEOUT_SECS};
use crate::types::{CitySuggestion, WeatherError};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

pub const OPENCAGE_URL: &str = "https://api.opencagedata.com/geocode/v1";
/// Queries shorter than this are not sent
pub const MIN_QUERY_CHARS: usize = 2;
pub const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    #[serde(default)]
    annotations: OpenCageAnnotations,
    #[serde(default)]
    components: OpenCageComponents,
}

#[derive(Debug, Default, Deserialize)]
struct OpenCageAnnotations {
    geohash: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenCageComponents {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}

impl OpenCageResult {
    /// Results without a settlement name cannot be searched for and are dropped
    fn into_suggestion(self) -> Option<CitySuggestion> {
        let components = self.components;
        // Prefer city > town > village for the place name
        let name = components
            .city
            .or(components.town)
            .or(components.village)
            .filter(|n| !n.is_empty())?;

        Some(CitySuggestion {
            id: self.annotations.geohash.unwrap_or_else(|| name.clone()),
            name,
            country_code: components.country.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct SuggestionClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    language: String,
}

impl SuggestionClient {
    pub fn new(api_key: &str) -> Result<Self, WeatherError> {
        Self::with_timeout(api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(api_key: &str, timeout: Duration) -> Result<Self, WeatherError> {
        Ok(Self {
            client: Arc::new(http_client(timeout)?),
            base_url: OPENCAGE_URL.to_string(),
            api_key: api_key.to_string(),
            language: "en".to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    /// Suggestions for `query`, or an empty list on any failure.
    ///
    /// Failures are logged, never surfaced.
    pub async fn fetch_suggestions(&self, query: &str) -> Vec<CitySuggestion> {
        match self.try_fetch_suggestions(query).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::warn!("Suggestion fetch error: {}", e);
                Vec::new()
            }
        }
    }

    /// Suggestions for `query` with the failure kept.
    #[instrument(skip(self), level = "debug")]
    pub async fn try_fetch_suggestions(
        &self,
        query: &str,
    ) -> Result<Vec<CitySuggestion>, WeatherError> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/json?q={}&key={}&language={}&limit={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.language),
            SUGGESTION_LIMIT,
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherError::SuggestionFetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WeatherError::SuggestionFetchFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let body: OpenCageResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::SuggestionFetchFailed(format!("parse error: {}", e)))?;

        let suggestions: Vec<CitySuggestion> = body
            .results
            .into_iter()
            .filter_map(OpenCageResult::into_suggestion)
            .take(SUGGESTION_LIMIT)
            .collect();

        tracing::debug!("{} suggestions for {:?}", suggestions.len(), query);
        Ok(suggestions)
    }
}
