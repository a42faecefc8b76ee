//! External places provider: trait seam, wire shape, normalization.

pub mod google;

pub use google::GooglePlaces;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo;
use crate::types::{Coordinates, Provenance, RankedPlace};

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("Provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Provider returned a malformed payload: {0}")]
    Decode(String),
    #[error("Provider rejected the request: {0}")]
    Rejected(String),
}

/// One hit as the live provider reports it, before normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderPlace {
    pub name: String,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub rating: Option<f32>,
    pub open_now: Option<bool>,
    /// Stable provider identifier, preferred for map links.
    pub place_id: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn search_nearby(
        &self,
        keyword: &str,
        lat: f64,
        lng: f64,
        radius_m: u32,
    ) -> Result<Vec<ProviderPlace>, PlacesError>;

    async fn search_by_text(&self, query: &str) -> Result<Vec<ProviderPlace>, PlacesError>;
}

/// Normalize a provider hit into the engine's record shape. Provider
/// relevance order is trusted upstream; no scoring happens here.
pub fn normalize(place: ProviderPlace) -> RankedPlace {
    let address = place.address.clone().unwrap_or_default();
    let map_link = match (&place.place_id, place.coordinates.as_ref()) {
        (Some(id), _) => format!("https://www.google.com/maps/place/?q=place_id:{}", id),
        (None, coords) => geo::map_link(coords, &place.name, &address),
    };
    let category = place
        .types
        .first()
        .map(|t| t.replace('_', " "))
        .unwrap_or_default();

    RankedPlace {
        name: place.name,
        category,
        address,
        coordinates: place.coordinates,
        map_link,
        distance_km: None,
        provenance: Provenance::ExternalProvider,
        rating: place.rating,
        open_now: place.open_now,
        reviews: Vec::new(),
    }
}
