//! Google Places client: nearby (location-biased) and text search.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::types::Coordinates;

use super::{PlacesError, PlacesProvider, ProviderPlace};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

pub struct GooglePlaces {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GooglePlaces {
    pub fn new(api_key: impl Into<String>, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(timeout_secs))
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch(&self, path: &str, params: &[(&str, String)]) -> Result<Vec<ProviderPlace>, PlacesError> {
        let url = format!("{}/{}/json", self.base_url, path);
        let response = self.client.get(&url).query(params).send().await?;
        let body = response.text().await?;
        parse_search_response(&body)
    }
}

#[async_trait]
impl PlacesProvider for GooglePlaces {
    async fn search_nearby(
        &self,
        keyword: &str,
        lat: f64,
        lng: f64,
        radius_m: u32,
    ) -> Result<Vec<ProviderPlace>, PlacesError> {
        self.fetch(
            "nearbysearch",
            &[
                ("keyword", keyword.to_string()),
                ("location", format!("{},{}", lat, lng)),
                ("radius", radius_m.to_string()),
                ("key", self.api_key.clone()),
            ],
        )
        .await
    }

    async fn search_by_text(&self, query: &str) -> Result<Vec<ProviderPlace>, PlacesError> {
        self.fetch(
            "textsearch",
            &[("query", query.to_string()), ("key", self.api_key.clone())],
        )
        .await
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<RawPlace>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    name: Option<String>,
    formatted_address: Option<String>,
    vicinity: Option<String>,
    geometry: Option<RawGeometry>,
    rating: Option<f32>,
    opening_hours: Option<RawHours>,
    place_id: Option<String>,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: Option<Coordinates>,
}

#[derive(Debug, Deserialize)]
struct RawHours {
    open_now: Option<bool>,
}

/// Decode a search response body. Gateways occasionally answer with an HTML
/// error page under HTTP 200, so guard before touching serde.
fn parse_search_response(body: &str) -> Result<Vec<ProviderPlace>, PlacesError> {
    let trimmed = body.trim_start();
    if trimmed.starts_with('<') {
        let preview: String = trimmed.chars().take(120).collect();
        return Err(PlacesError::Decode(format!(
            "HTML instead of JSON: {}",
            preview
        )));
    }

    let parsed: SearchResponse =
        serde_json::from_str(body).map_err(|e| PlacesError::Decode(e.to_string()))?;

    match parsed.status.as_str() {
        "OK" | "ZERO_RESULTS" | "" => {}
        status => {
            let detail = parsed.error_message.unwrap_or_default();
            return Err(PlacesError::Rejected(format!("{} {}", status, detail)));
        }
    }

    Ok(parsed
        .results
        .into_iter()
        .filter_map(|raw| {
            // A hit without a usable name cannot satisfy the record invariant.
            let name = raw.name.filter(|n| !n.trim().is_empty())?;
            Some(ProviderPlace {
                name,
                address: raw.formatted_address.or(raw.vicinity),
                coordinates: raw.geometry.and_then(|g| g.location),
                rating: raw.rating,
                open_now: raw.opening_hours.and_then(|h| h.open_now),
                place_id: raw.place_id,
                types: raw.types,
            })
        })
        .collect())
}
