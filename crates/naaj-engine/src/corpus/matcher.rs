//! Substring matching over the curated corpus.
//!
//! Matching is permissive: a record matches when any search term appears
//! anywhere in its name, category or address, not only on word boundaries.

use crate::geo;
use crate::query::mode::ModeDecision;
use crate::types::{Place, Provenance, RankedPlace};

use super::CorpusSnapshot;

/// Scan the collections selected by `decision` and return decorated,
/// ranked, capped request-scoped copies. Empty `terms` match nothing:
/// vacuous input must not return the whole corpus.
pub fn match_places(
    snapshot: &CorpusSnapshot,
    terms: &[String],
    decision: &ModeDecision,
    limit: usize,
) -> Vec<RankedPlace> {
    if terms.is_empty() {
        return Vec::new();
    }

    // Community contributions are not municipality-scoped; they are always
    // scanned alongside whichever primary collection the mode picked.
    let primary: &[Place] = match decision.target_municipality.as_deref() {
        Some(municipality) => snapshot.places_for_municipality(municipality),
        None => &snapshot.general_places,
    };
    let collections = [
        (primary, Provenance::LocalCorpus),
        (snapshot.community_places.as_slice(), Provenance::CommunityAdded),
    ];

    let query_pos = decision.effective_coordinates;
    let mut matched: Vec<(f64, RankedPlace)> = Vec::new();
    for (places, provenance) in collections {
        for place in places {
            if !matches_any(place, terms) {
                continue;
            }
            matched.push(decorate(place, provenance, query_pos.as_ref()));
        }
    }

    if query_pos.is_some() {
        matched.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    }

    matched.truncate(limit);
    matched.into_iter().map(|(_, place)| place).collect()
}

fn matches_any(place: &Place, terms: &[String]) -> bool {
    let haystack =
        format!("{} {} {}", place.name, place.category, place.address).to_lowercase();
    terms.iter().any(|term| haystack.contains(term.as_str()))
}

/// Request-scoped decorated copy; the shared corpus record is never touched.
fn decorate(
    place: &Place,
    provenance: Provenance,
    query_pos: Option<&crate::types::Coordinates>,
) -> (f64, RankedPlace) {
    let sort_key = match query_pos {
        Some(from) => geo::distance_km(Some(from), place.coordinates.as_ref()),
        None => 0.0,
    };
    let distance_km = match (query_pos, place.coordinates.as_ref()) {
        (Some(_), Some(_)) => Some(geo::round_km(sort_key)),
        _ => None,
    };

    let ranked = RankedPlace {
        name: place.name.clone(),
        category: place.category.clone(),
        address: place.address.clone(),
        coordinates: place.coordinates,
        map_link: geo::map_link(place.coordinates.as_ref(), &place.name, &place.address),
        distance_km,
        provenance,
        rating: place.rating,
        open_now: None,
        reviews: place.reviews.clone(),
    };
    (sort_key, ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::mode::SearchMode;
    use crate::types::Coordinates;
    use std::collections::HashMap;

    fn place(name: &str, category: &str, coords: Option<(f64, f64)>) -> Place {
        Place {
            name: name.into(),
            category: category.into(),
            address: "Centro, Campeche".into(),
            coordinates: coords.map(|(lat, lng)| Coordinates { lat, lng }),
            rating: None,
            reviews: Vec::new(),
        }
    }

    fn snapshot() -> CorpusSnapshot {
        let mut municipality_places = HashMap::new();
        municipality_places.insert(
            "Champotón".to_string(),
            vec![place("Mariscos El Pelícano", "restaurante de mariscos", None)],
        );
        CorpusSnapshot {
            general_places: vec![
                place("La Pigua", "restaurante de mariscos", Some((19.85, -90.53))),
                place("Casa Vieja", "restaurante", Some((19.843, -90.536))),
                place("Baluarte de San Carlos", "sitio histórico", None),
            ],
            municipality_places,
            community_places: vec![place(
                "Cenaduría Portales",
                "antojitos y mariscos",
                Some((19.851, -90.527)),
            )],
        }
    }

    fn tourism(coords: Option<Coordinates>) -> ModeDecision {
        ModeDecision {
            mode: SearchMode::GeneralTourism,
            target_municipality: None,
            effective_coordinates: coords,
        }
    }

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_terms_match_nothing() {
        let result = match_places(&snapshot(), &[], &tourism(None), 5);
        assert!(result.is_empty());
    }

    #[test]
    fn test_substring_match_over_name_category_address() {
        let result = match_places(&snapshot(), &terms(&["mariscos"]), &tourism(None), 5);
        let names: Vec<&str> = result.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["La Pigua", "Cenaduría Portales"]);
    }

    #[test]
    fn test_community_collection_always_scanned() {
        let result = match_places(&snapshot(), &terms(&["antojitos"]), &tourism(None), 5);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].provenance, Provenance::CommunityAdded);
    }

    #[test]
    fn test_municipality_scoping_replaces_general_collection() {
        let decision = ModeDecision {
            mode: SearchMode::RemoteMunicipality,
            target_municipality: Some("Champotón".to_string()),
            effective_coordinates: None,
        };
        let result = match_places(&snapshot(), &terms(&["mariscos"]), &decision, 5);
        let names: Vec<&str> = result.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Mariscos El Pelícano", "Cenaduría Portales"]);
    }

    #[test]
    fn test_without_coordinates_keeps_corpus_order_and_no_distance() {
        let result = match_places(&snapshot(), &terms(&["restaurante"]), &tourism(None), 5);
        assert!(result.iter().all(|p| p.distance_km.is_none()));
        assert_eq!(result[0].name, "La Pigua");
    }

    #[test]
    fn test_with_coordinates_sorts_ascending_and_coordless_last() {
        let here = Coordinates { lat: 19.8437, lng: -90.5353 };
        let result = match_places(
            &snapshot(),
            &terms(&["restaurante", "histórico"]),
            &tourism(Some(here)),
            5,
        );
        // Casa Vieja is closest; the record without coordinates sinks to the end.
        assert_eq!(result[0].name, "Casa Vieja");
        assert_eq!(result.last().unwrap().name, "Baluarte de San Carlos");
        assert!(result[0].distance_km.is_some());
        assert!(result.last().unwrap().distance_km.is_none());
    }

    #[test]
    fn test_cap_applies_after_ranking() {
        let result = match_places(&snapshot(), &terms(&["restaurante", "mariscos"]), &tourism(None), 2);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_every_match_gets_a_map_link() {
        let result = match_places(&snapshot(), &terms(&["histórico"]), &tourism(None), 5);
        assert!(!result.is_empty());
        assert!(result.iter().all(|p| !p.map_link.is_empty()));
    }
}
