//! Follow-up detection and keyword carry-over from conversation history.

use tracing::debug;

use super::keywords::KeywordExtractor;
use super::normalize;
use crate::types::Turn;

/// Search terms for one request, after history resolution.
#[derive(Debug, Clone)]
pub struct ResolvedQuery {
    /// Prior-turn keywords first (when a follow-up), current ones after.
    /// Order matters only for logging; matching is set membership.
    pub terms: Vec<String>,
    pub is_follow_up: bool,
}

pub struct ContextResolver {
    markers: Vec<String>,
}

impl ContextResolver {
    pub fn new(markers: &[String]) -> Self {
        Self {
            markers: markers.iter().map(|m| m.to_lowercase()).collect(),
        }
    }

    /// A question is a follow-up when it carries a marker word (pronouns,
    /// comparatives) or when it yields no keywords of its own.
    pub fn resolve(
        &self,
        question: &str,
        history: &[Turn],
        extractor: &KeywordExtractor,
    ) -> ResolvedQuery {
        let current = extractor.extract_ordered(question);
        let is_follow_up = current.is_empty() || self.has_marker(question);

        if !is_follow_up {
            return ResolvedQuery { terms: current, is_follow_up: false };
        }

        let mut terms = match history.iter().rev().find(|turn| turn.is_user) {
            Some(prior) => extractor.extract_ordered(&prior.text),
            None => Vec::new(),
        };
        for term in current {
            if !terms.contains(&term) {
                terms.push(term);
            }
        }

        debug!(terms = ?terms, "follow-up resolved against prior user turn");
        ResolvedQuery { terms, is_follow_up: true }
    }

    fn has_marker(&self, question: &str) -> bool {
        let normalized = normalize(question);
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        self.markers.iter().any(|marker| {
            if marker.contains(' ') {
                normalized.contains(marker.as_str())
            } else {
                tokens.iter().any(|token| token == marker)
            }
        })
    }
}
