use regex::{Regex, RegexBuilder};

/// Drop genres that a longer, more specific genre in the same list already
/// covers ("Rock" next to "Hard Rock").
///
/// Slash labels are never dropped and never count as the covering genre.
/// A multi-word genre must appear in the other one delimited by whitespace
/// or the string ends; a single word only needs regex word boundaries, so
/// "Metal" is covered by "Post-Metal" while "Hard Rock" is not covered by
/// "Post-Hard Rock".
pub fn filter_redundant(genres: &[String]) -> Vec<String> {
    if genres.len() <= 1 {
        return genres.to_vec();
    }

    let lower: Vec<String> = genres.iter().map(|g| g.to_lowercase()).collect();

    genres
        .iter()
        .enumerate()
        .filter(|(i, genre)| genre.contains('/') || !is_covered(*i, genres, &lower))
        .map(|(_, genre)| genre.clone())
        .collect()
}

fn is_covered(index: usize, genres: &[String], lower: &[String]) -> bool {
    let len = genres[index].chars().count();
    let Some(pattern) = containment_pattern(&lower[index]) else {
        return false;
    };

    genres.iter().enumerate().any(|(j, other)| {
        j != index
            && !other.contains('/')
            && other.chars().count() > len
            && pattern.is_match(&lower[j])
    })
}

fn containment_pattern(genre_lower: &str) -> Option<Regex> {
    let escaped = regex::escape(genre_lower);
    let source = if genre_lower.contains(' ') {
        format!(r"(^|\s){escaped}(\s|$)")
    } else {
        format!(r"\b{escaped}\b")
    };
    match RegexBuilder::new(&source).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            log::debug!("Skipping redundancy check for {genre_lower:?}: {e}");
            None
        }
    }
}
