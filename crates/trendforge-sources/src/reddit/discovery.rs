//! Subreddit discovery helpers: result filtering and niche fallbacks.

use std::collections::HashSet;

use super::SubredditData;

const MINIATURES_FALLBACK: &[&str] = &[
    "Warhammer",
    "Warhammer40k",
    "PaintingWarhammer",
    "minipainting",
    "miniatures",
    "AgeOfSigmar",
    "WarhammerFantasy",
];

/// Keep SFW communities in search order, dropping case-insensitive duplicates.
pub(crate) fn merge_subreddit_names(results: Vec<SubredditData>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|sr| !sr.over18)
        .filter_map(|sr| sr.display_name)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_lowercase()))
        .take(limit)
        .collect()
}

/// Curated communities for niches the search API handles poorly.
pub(crate) fn fallback_subreddits(niche: &str) -> Option<Vec<String>> {
    let niche = niche.to_lowercase();
    if niche.contains("warhammer") || niche.contains("miniature") {
        return Some(MINIATURES_FALLBACK.iter().map(ToString::to_string).collect());
    }
    None
}
