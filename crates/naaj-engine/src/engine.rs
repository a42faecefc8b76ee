//! Retrieval pipeline: resolve terms → select mode → match and search →
//! merge. Every failure inside the pipeline degrades to a smaller result
//! set; `retrieve` itself never errors.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::corpus::{matcher, CorpusStore};
use crate::hybrid;
use crate::places::{self, PlacesProvider};
use crate::query::context::{ContextResolver, ResolvedQuery};
use crate::query::keywords::KeywordExtractor;
use crate::query::mode::{ModeDecision, ModeSelector, SearchMode};
use crate::query::ascii_fold;
use crate::types::{Coordinates, RankedPlace, Turn};

pub struct RetrievalEngine {
    config: EngineConfig,
    corpus: CorpusStore,
    provider: Arc<dyn PlacesProvider>,
    extractor: KeywordExtractor,
    resolver: ContextResolver,
    selector: ModeSelector,
    live_data_terms: HashSet<String>,
}

impl RetrievalEngine {
    pub fn new(
        config: EngineConfig,
        corpus: CorpusStore,
        provider: Arc<dyn PlacesProvider>,
    ) -> Self {
        let lexicon = &config.lexicon;
        let extractor = KeywordExtractor::new(&lexicon.stopwords);
        let resolver = ContextResolver::new(&lexicon.follow_up_markers);
        let selector = ModeSelector::new(&lexicon.municipalities, &lexicon.utility_terms);
        let live_data_terms = lexicon
            .live_data_terms
            .iter()
            .map(|t| t.to_lowercase())
            .collect();
        Self {
            config,
            corpus,
            provider,
            extractor,
            resolver,
            selector,
            live_data_terms,
        }
    }

    /// The shared corpus, exposed so the ingestion side can refresh it.
    pub fn corpus(&self) -> &CorpusStore {
        &self.corpus
    }

    /// Run the full pipeline for one request. The returned list is ranked,
    /// deduplicated by name and capped; the caller owns everything
    /// downstream (prompting, serialization).
    pub async fn retrieve(
        &self,
        question: &str,
        history: &[Turn],
        coordinates: Option<Coordinates>,
    ) -> Vec<RankedPlace> {
        let request_id = Uuid::new_v4();
        let resolved = self.resolver.resolve(question, history, &self.extractor);
        if resolved.terms.is_empty() {
            // Match-none policy: vacuous input never dumps the corpus.
            info!(%request_id, "no usable search terms");
            return Vec::new();
        }

        let decision = self.selector.select(&resolved.terms, coordinates);
        info!(
            %request_id,
            mode = ?decision.mode,
            follow_up = resolved.is_follow_up,
            terms = ?resolved.terms,
            "query resolved"
        );

        // Utility mode short-circuits: external provider only, small
        // radius, local corpus skipped.
        if decision.mode == SearchMode::Utility {
            let external = self.external_results(&resolved, &decision).await;
            let merged = hybrid::merge(Vec::new(), external);
            info!(%request_id, results = merged.len(), "utility retrieval complete");
            return merged;
        }

        let snapshot = self.corpus.snapshot();
        let local = matcher::match_places(
            &snapshot,
            &resolved.terms,
            &decision,
            self.config.search.local_limit,
        );

        let needs_external = self.needs_external(local.len(), &resolved.terms, &decision);
        let external = if needs_external {
            self.external_results(&resolved, &decision).await
        } else {
            Vec::new()
        };

        let merged = hybrid::merge(local, external);
        info!(
            %request_id,
            results = merged.len(),
            external_consulted = needs_external,
            "retrieval complete"
        );
        merged
    }

    /// The provider is consulted when local coverage is thin, when a
    /// live-data term appears, or when the query targets a remote
    /// municipality.
    fn needs_external(&self, local_hits: usize, terms: &[String], decision: &ModeDecision) -> bool {
        if decision.mode == SearchMode::RemoteMunicipality {
            return true;
        }
        if local_hits < self.config.search.min_local_hits {
            return true;
        }
        terms.iter().any(|t| self.live_data_terms.contains(t))
    }

    async fn external_results(
        &self,
        resolved: &ResolvedQuery,
        decision: &ModeDecision,
    ) -> Vec<RankedPlace> {
        let (radius_m, limit) = match decision.mode {
            SearchMode::Utility => (
                self.config.search.utility_radius_m,
                self.config.search.external_limit_utility,
            ),
            SearchMode::RemoteMunicipality => (
                self.config.search.tourism_radius_m,
                self.config.search.external_limit_utility,
            ),
            SearchMode::GeneralTourism => (
                self.config.search.tourism_radius_m,
                self.config.search.external_limit_tourism,
            ),
        };

        let outcome = match decision.effective_coordinates {
            Some(pos) => {
                let keyword = resolved.terms.join(" ");
                self.provider
                    .search_nearby(&keyword, pos.lat, pos.lng, radius_m)
                    .await
            }
            None => {
                let query = self.text_query(resolved, decision);
                self.provider.search_by_text(&query).await
            }
        };

        match outcome {
            Ok(hits) => hits.into_iter().take(limit).map(places::normalize).collect(),
            Err(err) => {
                warn!(error = %err, "external provider failed, degrading to local results");
                Vec::new()
            }
        }
    }

    /// Text-search fallback query, scoped to the target municipality (when
    /// set) and the region so the provider stays in-area.
    fn text_query(&self, resolved: &ResolvedQuery, decision: &ModeDecision) -> String {
        let mut parts: Vec<String> = Vec::new();
        match decision.target_municipality.as_deref() {
            Some(municipality) => {
                let folded = ascii_fold(&municipality.to_lowercase());
                parts.extend(
                    resolved
                        .terms
                        .iter()
                        .filter(|t| ascii_fold(t) != folded)
                        .cloned(),
                );
                parts.push(municipality.to_string());
            }
            None => parts.extend(resolved.terms.iter().cloned()),
        }
        parts.push(self.config.provider.region_hint.clone());
        parts.join(" ")
    }
}
