//! Keyword extraction: free text in, significant terms out.

use std::collections::HashSet;

use super::normalize;

/// Tokens this short carry no search signal ("un", "de", "ok").
const MIN_TOKEN_CHARS: usize = 3;

pub struct KeywordExtractor {
    stopwords: HashSet<String>,
}

impl KeywordExtractor {
    pub fn new(stopwords: &[String]) -> Self {
        Self {
            stopwords: stopwords.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Extract significant terms in first-occurrence order, deduplicated.
    /// Order is for logging only; matching treats the result as a set.
    pub fn extract_ordered(&self, text: &str) -> Vec<String> {
        let normalized = normalize(text);
        let mut seen = HashSet::new();
        let mut terms = Vec::new();
        for token in normalized.split_whitespace() {
            if token.chars().count() < MIN_TOKEN_CHARS {
                continue;
            }
            if self.stopwords.contains(token) {
                continue;
            }
            if seen.insert(token.to_string()) {
                terms.push(token.to_string());
            }
        }
        terms
    }

    pub fn extract(&self, text: &str) -> HashSet<String> {
        self.extract_ordered(text).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LexiconConfig;

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::new(&LexiconConfig::default().stopwords)
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        assert!(extractor().extract("").is_empty());
        assert!(extractor().extract("   ").is_empty());
    }

    #[test]
    fn test_drops_stopwords_and_short_tokens() {
        let terms = extractor().extract("¿Dónde hay un cajero por aquí?");
        assert!(terms.contains("cajero"));
        assert!(!terms.contains("dónde"));
        assert!(!terms.contains("hay"));
        assert!(!terms.contains("un"));
    }

    #[test]
    fn test_no_token_shorter_than_three_chars() {
        let terms = extractor().extract("ir a un bar de tapas ya");
        for term in &terms {
            assert!(term.chars().count() >= 3, "short token leaked: {}", term);
        }
    }

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        let terms = extractor().extract("Recomiéndame MARISCOS, por favor!");
        assert!(terms.contains("mariscos"));
        assert_eq!(terms.len(), 1);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let ex = extractor();
        let first = ex.extract_ordered("quiero tacos de cochinita pibil baratos cerca del malecón");
        let rejoined = first.join(" ");
        let second = ex.extract_ordered(&rejoined);
        assert_eq!(first, second);
    }

    #[test]
    fn test_order_is_first_occurrence_without_duplicates() {
        let terms = extractor().extract_ordered("tacos mariscos tacos");
        assert_eq!(terms, vec!["tacos".to_string(), "mariscos".to_string()]);
    }
}
