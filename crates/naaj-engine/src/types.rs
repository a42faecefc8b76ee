use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Visitor review attached to a curated place. Reviews are kept
/// most-recent-first; `CorpusSnapshot` enforces the order at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub comment: String,
    #[serde(default)]
    pub rating: Option<f32>,
    pub date: DateTime<Utc>,
}

/// A curated point of interest as it lives in the corpus file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    LocalCorpus,
    ExternalProvider,
    CommunityAdded,
}

/// Request-scoped, decorated copy of a place as returned by the engine.
/// Derived fields (`map_link`, `distance_km`) are computed per request and
/// never written back into the shared corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPlace {
    pub name: String,
    pub category: String,
    pub address: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    pub map_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub provenance: Provenance,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// One prior message of the conversation, as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub text: String,
    pub is_user: bool,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_user: true }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_user: false }
    }
}
