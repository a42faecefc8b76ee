//! Query interpretation: keyword mining, follow-up resolution, mode selection.

pub mod context;
pub mod keywords;
pub mod mode;

use regex::Regex;
use std::sync::LazyLock;

// Pre-compiled. Everything that is not a letter, digit or whitespace
// becomes a space; Spanish accented letters stay intact.
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s]+").expect("punctuation regex is valid"));

/// Lowercase and strip punctuation. The common first step for every
/// word-list check in this module.
pub(crate) fn normalize(text: &str) -> String {
    PUNCTUATION_RE.replace_all(&text.to_lowercase(), " ").into_owned()
}

/// Fold Spanish accented letters to their ASCII base so that "Champotón"
/// and "champoton" compare equal. Used for closed-set lookups
/// (municipality names), never for corpus text matching.
pub(crate) fn ascii_fold(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}
