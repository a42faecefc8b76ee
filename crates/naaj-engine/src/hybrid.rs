//! Merge of curated and live results.
//!
//! Curated local data anchors the top of the list; external hits are
//! appended in provider order with name duplicates removed. No global
//! re-sort: the two blocks keep their own ranking.

use std::collections::HashSet;

use crate::types::RankedPlace;

pub fn merge(local: Vec<RankedPlace>, external: Vec<RankedPlace>) -> Vec<RankedPlace> {
    let mut seen: HashSet<String> = local.iter().map(|p| p.name.to_lowercase()).collect();
    let mut merged = local;
    for place in external {
        if seen.insert(place.name.to_lowercase()) {
            merged.push(place);
        }
    }
    merged
}
