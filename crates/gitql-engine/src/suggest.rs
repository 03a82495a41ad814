//! "Did you mean" suggestions for misspelled names.

use strsim::levenshtein;

/// Maximum Levenshtein distance to consider a name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Finds the closest candidate to `query`, ignoring case.
///
/// Returns `None` when nothing is within the distance threshold or when the
/// best candidate is exactly `query`. A candidate differing only in case is
/// suggested, since field and kind names are matched exactly.
pub(crate) fn find_similar_name<'a>(
    query: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = candidates
        .into_iter()
        .filter(|name| !name.is_empty())
        .map(|name| (name, levenshtein(&query_lower, &name.to_lowercase())))
        .min_by_key(|(_, d)| *d)?;

    if best_match != query && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match.to_string())
    } else {
        None
    }
}
