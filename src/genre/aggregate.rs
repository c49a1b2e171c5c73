use super::rules::{Combination, COMBINATIONS};
use super::{expand, filter_redundant, OrderedGenres};

/// Expand a whole tag list into one canonical genre list.
///
/// Expansions are concatenated in input order and deduplicated
/// case-insensitively. Combination labels ("Death/Doom", ...) are then
/// prepended for every pair whose members are both present and not
/// already covered by a slash label, and redundant labels are dropped.
pub fn aggregate<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let genres: OrderedGenres = tags
        .iter()
        .map(|tag| tag.as_ref())
        .filter(|tag| !tag.trim().is_empty())
        .flat_map(expand)
        .collect();

    let lower: Vec<String> = genres.iter().map(str::to_lowercase).collect();

    // All pairs are judged against the deduplicated list, before any insertion
    let synthesized: Vec<&'static str> = COMBINATIONS
        .iter()
        .filter(|combo| applies(combo, &genres, &lower))
        .map(|combo| combo.label)
        .collect();

    let mut out: Vec<String> = synthesized.iter().rev().map(|s| s.to_string()).collect();
    out.extend(genres.into_vec());

    filter_redundant(&out)
}

fn applies(combo: &Combination, genres: &OrderedGenres, lower: &[String]) -> bool {
    genres.contains(combo.first)
        && genres.contains(combo.second)
        && !lower
            .iter()
            .any(|g| combo.covered_by.iter().any(|slash| g.contains(*slash)))
}
