//! In-memory curated corpus.
//!
//! The corpus is process-wide read-only state. Readers take an `Arc`
//! snapshot once per request; a refresh replaces the whole snapshot so
//! concurrent readers never observe a partial update.

pub mod matcher;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::query::ascii_fold;
use crate::types::Place;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusSnapshot {
    #[serde(default)]
    pub general_places: Vec<Place>,
    #[serde(default)]
    pub municipality_places: HashMap<String, Vec<Place>>,
    #[serde(default)]
    pub community_places: Vec<Place>,
}

impl CorpusSnapshot {
    pub fn len(&self) -> usize {
        self.general_places.len()
            + self.community_places.len()
            + self.municipality_places.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Places of one municipality, matched accent-insensitively on the key.
    pub fn places_for_municipality(&self, name: &str) -> &[Place] {
        let wanted = ascii_fold(&name.to_lowercase());
        self.municipality_places
            .iter()
            .find(|(key, _)| ascii_fold(&key.to_lowercase()) == wanted)
            .map(|(_, places)| places.as_slice())
            .unwrap_or(&[])
    }

    fn sort_reviews(&mut self) {
        let all = self
            .general_places
            .iter_mut()
            .chain(self.community_places.iter_mut())
            .chain(self.municipality_places.values_mut().flatten());
        for place in all {
            place.reviews.sort_by(|a, b| b.date.cmp(&a.date));
        }
    }
}

pub struct CorpusStore {
    inner: RwLock<Arc<CorpusSnapshot>>,
}

impl CorpusStore {
    pub fn new(mut snapshot: CorpusSnapshot) -> Self {
        snapshot.sort_reviews();
        Self { inner: RwLock::new(Arc::new(snapshot)) }
    }

    /// An empty store; the engine degrades to external-only retrieval.
    pub fn empty() -> Self {
        Self::new(CorpusSnapshot::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus file {}", path.display()))?;
        let snapshot: CorpusSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse corpus file {}", path.display()))?;
        tracing::info!(
            places = snapshot.len(),
            municipalities = snapshot.municipality_places.len(),
            "corpus loaded"
        );
        Ok(Self::new(snapshot))
    }

    /// Current snapshot. Cheap: one `Arc` clone, no lock held afterwards.
    pub fn snapshot(&self) -> Arc<CorpusSnapshot> {
        self.inner.read().clone()
    }

    /// Replace the corpus wholesale. In-flight requests keep reading the
    /// snapshot they already hold.
    pub fn refresh(&self, mut snapshot: CorpusSnapshot) {
        snapshot.sort_reviews();
        let count = snapshot.len();
        *self.inner.write() = Arc::new(snapshot);
        tracing::info!(places = count, "corpus refreshed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::types::Review;

    fn place_with_reviews() -> Place {
        Place {
            name: "La Pigua".into(),
            category: "restaurante".into(),
            address: "Av. Miguel Alemán 179A".into(),
            coordinates: None,
            rating: Some(4.6),
            reviews: vec![
                Review {
                    author: "Ana".into(),
                    comment: "Buenísimo".into(),
                    rating: Some(5.0),
                    date: Utc.with_ymd_and_hms(2023, 1, 10, 12, 0, 0).unwrap(),
                },
                Review {
                    author: "Luis".into(),
                    comment: "Regular".into(),
                    rating: Some(3.0),
                    date: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
                },
            ],
        }
    }

    #[test]
    fn test_reviews_sorted_most_recent_first() {
        let snapshot = CorpusSnapshot {
            general_places: vec![place_with_reviews()],
            ..Default::default()
        };
        let store = CorpusStore::new(snapshot);
        let reviews = &store.snapshot().general_places[0].reviews;
        assert_eq!(reviews[0].author, "Luis");
    }

    #[test]
    fn test_refresh_swaps_snapshot_atomically() {
        let store = CorpusStore::empty();
        let before = store.snapshot();
        store.refresh(CorpusSnapshot {
            general_places: vec![place_with_reviews()],
            ..Default::default()
        });
        // The old snapshot is untouched; the new one is visible.
        assert!(before.is_empty());
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn test_municipality_lookup_is_accent_insensitive() {
        let mut municipality_places = HashMap::new();
        municipality_places.insert("Champotón".to_string(), vec![place_with_reviews()]);
        let store = CorpusStore::new(CorpusSnapshot {
            municipality_places,
            ..Default::default()
        });
        let snapshot = store.snapshot();
        assert_eq!(snapshot.places_for_municipality("champoton").len(), 1);
        assert!(snapshot.places_for_municipality("palizada").is_empty());
    }
}
