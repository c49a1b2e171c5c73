//! Genre normalization engine.
//!
//! Turns raw community tags ("death metal", "black/thrash", "seen live")
//! into a canonical, deduplicated, non-redundant genre list:
//!
//! 1. [`expand`] maps one raw tag to one or more canonical genres.
//! 2. [`aggregate`] merges expansions for a whole tag list and synthesizes
//!    combination labels such as "Death/Doom".
//! 3. [`filter_redundant`] drops broad labels subsumed by a more specific one.
//!
//! Everything here is pure; the tables are `'static` and safe to share.

pub mod aggregate;
pub mod expand;
pub mod redundancy;
pub mod rules;

use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::LazyLock;

pub use aggregate::aggregate;
pub use expand::expand;
pub use redundancy::filter_redundant;

/// Separator used when a genre list is written as a single tag value.
pub const GENRE_SEPARATOR: &str = "; ";

static WORD_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-z])([a-z0-9'&]*)\b").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Canonical casing: capitalize the first letter of each word, collapse
/// whitespace, trim.
///
/// The input is lowercased first, so "IDM" becomes "Idm". Hyphens and
/// slashes are word separators ("post-punk" → "Post-Punk").
pub fn title_case(tag: &str) -> String {
    let lower = tag.trim().to_lowercase();
    if lower.is_empty() {
        return String::new();
    }
    let cased = WORD_START_RE.replace_all(&lower, |caps: &Captures| {
        format!("{}{}", caps[1].to_uppercase(), &caps[2])
    });
    WHITESPACE_RE.replace_all(&cased, " ").trim().to_string()
}

/// Join a genre list into the value written to a track's genre field.
pub fn genre_field(genres: &[String]) -> String {
    genres.join(GENRE_SEPARATOR)
}

/// Insertion-ordered set of genres, unique by case-folded value.
/// The first spelling seen is the one kept.
#[derive(Debug, Default, Clone)]
pub struct OrderedGenres {
    keys: HashSet<String>,
    items: Vec<String>,
}

impl OrderedGenres {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a genre. Returns false if a case-insensitive match was already present.
    pub fn insert(&mut self, genre: impl Into<String>) -> bool {
        let genre = genre.into();
        if self.keys.insert(genre.to_lowercase()) {
            self.items.push(genre);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, genre: &str) -> bool {
        self.keys.contains(&genre.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl<S: Into<String>> Extend<S> for OrderedGenres {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for genre in iter {
            self.insert(genre);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for OrderedGenres {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
