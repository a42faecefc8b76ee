//! Search-mode selection from resolved terms and caller position.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ascii_fold;
use crate::types::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// Urgent services near the caller; external provider only, small radius.
    Utility,
    /// Query names another municipality; caller coordinates are ignored.
    RemoteMunicipality,
    GeneralTourism,
}

#[derive(Debug, Clone)]
pub struct ModeDecision {
    pub mode: SearchMode,
    pub target_municipality: Option<String>,
    /// Caller coordinates after mode rules; forced absent in
    /// remote-municipality mode.
    pub effective_coordinates: Option<Coordinates>,
}

pub struct ModeSelector {
    municipalities: Vec<String>,
    utility_terms: HashSet<String>,
}

impl ModeSelector {
    pub fn new(municipalities: &[String], utility_terms: &[String]) -> Self {
        Self {
            municipalities: municipalities.to_vec(),
            utility_terms: utility_terms.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Precedence: remote-municipality, then utility, then general tourism.
    /// A named municipality always wins so that coordinates are dropped
    /// regardless of any co-occurring utility term.
    pub fn select(&self, terms: &[String], coordinates: Option<Coordinates>) -> ModeDecision {
        if let Some(municipality) = self.municipality_for(terms) {
            return ModeDecision {
                mode: SearchMode::RemoteMunicipality,
                target_municipality: Some(municipality),
                effective_coordinates: None,
            };
        }

        if coordinates.is_some() && terms.iter().any(|t| self.utility_terms.contains(t)) {
            return ModeDecision {
                mode: SearchMode::Utility,
                target_municipality: None,
                effective_coordinates: coordinates,
            };
        }

        ModeDecision {
            mode: SearchMode::GeneralTourism,
            target_municipality: None,
            effective_coordinates: coordinates,
        }
    }

    /// Canonical municipality name for the first term naming one, matched
    /// accent-insensitively so "champoton" finds "Champotón".
    fn municipality_for(&self, terms: &[String]) -> Option<String> {
        for term in terms {
            let folded = ascii_fold(term);
            if let Some(name) = self
                .municipalities
                .iter()
                .find(|m| ascii_fold(&m.to_lowercase()) == folded)
            {
                return Some(name.clone());
            }
        }
        None
    }
}
