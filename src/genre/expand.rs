use super::{rules, title_case, OrderedGenres};

/// How many times a tag may be split on "/" before the remainder is taken
/// verbatim.
pub const MAX_SLASH_DEPTH: usize = 3;

/// Expand one raw tag into canonical genres.
///
/// Rules are tried in order and the first that applies wins:
/// slash table, compound table, generic "a/b" split, "<word> <family>"
/// pair, single-word table, and finally the title-cased tag itself.
/// Every non-blank tag yields at least one genre. A blank or whitespace-only
/// tag is the one exception: it expands to nothing, so no empty genre can
/// reach the tag store.
pub fn expand(tag: &str) -> Vec<String> {
    expand_at_depth(tag, 0)
}

fn expand_at_depth(tag: &str, depth: usize) -> Vec<String> {
    let lower = tag.trim().to_lowercase();
    if lower.is_empty() {
        return Vec::new();
    }

    if let Some(list) = rules::slash_pair(&lower) {
        return to_owned(list);
    }

    if let Some(list) = rules::compound(&lower) {
        return to_owned(list);
    }

    if depth < MAX_SLASH_DEPTH {
        if let Some((left, right)) = split_slash(&lower) {
            let mut out = OrderedGenres::new();
            out.insert(title_case(&format!("{left}/{right}")));
            out.extend(expand_at_depth(&title_case(left), depth + 1));
            out.extend(expand_at_depth(&title_case(right), depth + 1));
            return out.into_vec();
        }
    }

    let words: Vec<&str> = lower.split_whitespace().collect();
    if let [modifier, family] = words.as_slice() {
        if rules::is_common_suffix(family) {
            let family = rules::single_word(family)
                .map(str::to_string)
                .unwrap_or_else(|| title_case(family));
            let out: OrderedGenres = [title_case(modifier), family].into_iter().collect();
            return out.into_vec();
        }
    }

    if let Some(genre) = rules::single_word(&lower) {
        return vec![genre.to_string()];
    }

    vec![title_case(tag)]
}

/// Split at the first "/", requiring both trimmed sides to be non-empty.
fn split_slash(lower: &str) -> Option<(&str, &str)> {
    let (left, right) = lower.split_once('/')?;
    let (left, right) = (left.trim(), right.trim());
    if left.is_empty() || right.is_empty() {
        None
    } else {
        Some((left, right))
    }
}

fn to_owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_table_wins() {
        assert_eq!(expand("death/thrash"), vec!["Death/Thrash", "Death Metal", "Thrash Metal"]);
        assert_eq!(expand("  Death/Thrash "), vec!["Death/Thrash", "Death Metal", "Thrash Metal"]);
        assert_eq!(
            expand("blackened death/thrash"),
            vec!["Blackened Death/Thrash", "Black Metal", "Death Metal", "Thrash Metal"]
        );
    }

    #[test]
    fn test_compound_table_beats_suffix_rule() {
        // "thrash" is a common suffix, but the explicit entry applies first
        assert_eq!(expand("crossover thrash"), vec!["Crossover", "Thrash Metal"]);
        assert_eq!(expand("Hard Rock"), vec!["Hard Rock"]);
    }

    #[test]
    fn test_generic_slash_recurses_into_parts() {
        assert_eq!(expand("black/speed"), vec!["Black/Speed", "Black Metal", "Speed Metal"]);
        assert_eq!(expand("sludge / doom"), vec!["Sludge/Doom", "Sludge Metal", "Doom Metal"]);
    }

    #[test]
    fn test_generic_slash_dedups_parts() {
        assert_eq!(expand("thrash/thrash metal"), vec!["Thrash/Thrash Metal", "Thrash Metal"]);
    }

    #[test]
    fn test_nested_slashes() {
        assert_eq!(
            expand("death/doom/black"),
            vec!["Death/Doom/Black", "Death Metal", "Doom/Black", "Doom Metal", "Black Metal"]
        );
    }

    #[test]
    fn test_slash_depth_is_capped() {
        let out = expand("a/b/c/d/e");
        assert_eq!(out, vec!["A/B/C/D/E", "A", "B/C/D/E", "B", "C/D/E", "C", "D/E"]);
        assert!(!out.contains(&"D".to_string()));
    }

    #[test]
    fn test_dangling_slash_is_not_split() {
        assert_eq!(expand("death/"), vec!["Death/"]);
        assert_eq!(expand("/doom"), vec!["/Doom"]);
    }

    #[test]
    fn test_two_word_suffix_rule() {
        assert_eq!(expand("melodic death"), vec!["Melodic", "Death Metal"]);
        assert_eq!(expand("post metal"), vec!["Post", "Metal"]);
        assert_eq!(expand("Blackened  Crossover"), vec!["Blackened", "Crossover"]);
    }

    #[test]
    fn test_two_word_suffix_rule_dedups() {
        assert_eq!(expand("metal metal"), vec!["Metal"]);
    }

    #[test]
    fn test_three_words_fall_through() {
        assert_eq!(expand("technical death metal"), vec!["Technical Death Metal"]);
    }

    #[test]
    fn test_single_word_table() {
        assert_eq!(expand("thrash"), vec!["Thrash Metal"]);
        assert_eq!(expand("THRASH"), vec!["Thrash Metal"]);
        assert_eq!(expand("math"), vec!["Mathcore"]);
    }

    #[test]
    fn test_unknown_tag_is_title_cased() {
        assert_eq!(expand("shoegaze"), vec!["Shoegaze"]);
        assert_eq!(expand("dream   pop"), vec!["Dream Pop"]);
    }

    #[test]
    fn test_blank_tag_expands_to_nothing() {
        assert!(expand("").is_empty());
        assert!(expand("   ").is_empty());
    }
}
