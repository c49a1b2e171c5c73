//! Static expansion tables for the genre engine.
//!
//! Keys are lowercase. Values are already in canonical casing.

/// Single-word shorthand → full genre name.
pub const SINGLE_WORD: &[(&str, &str)] = &[
    ("thrash", "Thrash Metal"),
    ("death", "Death Metal"),
    ("black", "Black Metal"),
    ("doom", "Doom Metal"),
    ("heavy", "Heavy Metal"),
    ("hardcore", "Hardcore"),
    ("punk", "Punk Rock"),
    ("folk", "Folk Metal"),
    ("progressive", "Progressive Metal"),
    ("power", "Power Metal"),
    ("symphonic", "Symphonic Metal"),
    ("sludge", "Sludge Metal"),
    ("stoner", "Stoner Rock"),
    ("speed", "Speed Metal"),
    ("gothic", "Gothic Metal"),
    ("groove", "Groove Metal"),
    ("funk", "Funk Metal"),
    ("alternative", "Alternative Rock"),
    ("indie", "Indie Rock"),
    ("industrial", "Industrial"),
    ("math", "Mathcore"),
    ("horror", "Horror Punk"),
];

/// Slash-notation tags. The combined label comes first, then its parts.
pub const SLASH_PAIRS: &[(&str, &[&str])] = &[
    ("death/thrash", &["Death/Thrash", "Death Metal", "Thrash Metal"]),
    ("thrash/death", &["Thrash/Death", "Thrash Metal", "Death Metal"]),
    ("death/doom", &["Death/Doom", "Death Metal", "Doom Metal"]),
    ("doom/death", &["Doom/Death", "Doom Metal", "Death Metal"]),
    ("black/death", &["Black/Death", "Black Metal", "Death Metal"]),
    ("death/black", &["Death/Black", "Death Metal", "Black Metal"]),
    ("black/thrash", &["Black/Thrash", "Black Metal", "Thrash Metal"]),
    ("thrash/black", &["Thrash/Black", "Thrash Metal", "Black Metal"]),
    (
        "progressive death/thrash",
        &["Progressive Death/Thrash", "Progressive Metal", "Death Metal", "Thrash Metal"],
    ),
    (
        "blackened death/thrash",
        &["Blackened Death/Thrash", "Black Metal", "Death Metal", "Thrash Metal"],
    ),
];

/// Two-word phrases with a fixed expansion.
pub const COMPOUNDS: &[(&str, &[&str])] = &[
    ("crossover thrash", &["Crossover", "Thrash Metal"]),
    ("thrash crossover", &["Thrash Metal", "Crossover"]),
    ("beatdown hardcore", &["Beatdown", "Hardcore"]),
    ("hardcore beatdown", &["Hardcore", "Beatdown"]),
    ("sludge metal", &["Sludge Metal"]),
    ("stoner metal", &["Stoner Metal"]),
    ("stoner rock", &["Stoner Rock"]),
    ("death metal", &["Death Metal"]),
    ("thrash metal", &["Thrash Metal"]),
    ("black metal", &["Black Metal"]),
    ("doom metal", &["Doom Metal"]),
    ("heavy metal", &["Heavy Metal"]),
    ("hard rock", &["Hard Rock"]),
    ("classic rock", &["Classic Rock"]),
    ("punk rock", &["Punk Rock"]),
    ("alternative rock", &["Alternative Rock"]),
    ("progressive metal", &["Progressive Metal"]),
    ("power metal", &["Power Metal"]),
    ("folk metal", &["Folk Metal"]),
    ("symphonic metal", &["Symphonic Metal"]),
    ("gothic metal", &["Gothic Metal"]),
    ("groove metal", &["Groove Metal"]),
    ("speed metal", &["Speed Metal"]),
    ("funk metal", &["Funk Metal"]),
    ("indie rock", &["Indie Rock"]),
    ("hardcore punk", &["Hardcore Punk"]),
];

/// Words that end a generic "<modifier> <family>" two-word tag.
pub const COMMON_SUFFIXES: &[&str] = &[
    "metal", "rock", "punk", "hardcore", "core", "thrash", "death",
    "black", "doom", "folk", "progressive", "power", "symphonic",
    "alternative", "classic", "heavy", "beatdown", "crossover",
    "sludge", "stoner", "speed", "gothic", "groove", "funk", "indie",
    "industrial", "math", "horror", "grindcore", "deathcore", "mathcore",
    "post", "new", "nu", "glam", "technical", "brutal", "slamming",
    "viking", "war", "atmospheric", "avantgarde", "blackened",
];

/// Tags that say nothing about genre.
pub const BLOCKED: &[&str] = &["seen live"];

/// A label synthesized when both member genres appear in one result.
#[derive(Debug, Clone, Copy)]
pub struct Combination {
    pub first: &'static str,
    pub second: &'static str,
    pub label: &'static str,
    /// Lowercase slash spellings that already cover this pair.
    pub covered_by: [&'static str; 2],
}

/// Checked in this order; each hit is inserted at the front.
pub const COMBINATIONS: &[Combination] = &[
    Combination {
        first: "death metal",
        second: "doom metal",
        label: "Death/Doom",
        covered_by: ["death/doom", "doom/death"],
    },
    Combination {
        first: "thrash metal",
        second: "death metal",
        label: "Death/Thrash",
        covered_by: ["death/thrash", "thrash/death"],
    },
    Combination {
        first: "black metal",
        second: "thrash metal",
        label: "Black/Thrash",
        covered_by: ["black/thrash", "thrash/black"],
    },
    Combination {
        first: "black metal",
        second: "death metal",
        label: "Black/Death",
        covered_by: ["black/death", "death/black"],
    },
];

pub fn single_word(key: &str) -> Option<&'static str> {
    SINGLE_WORD.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub fn slash_pair(key: &str) -> Option<&'static [&'static str]> {
    SLASH_PAIRS.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub fn compound(key: &str) -> Option<&'static [&'static str]> {
    COMPOUNDS.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub fn is_common_suffix(word: &str) -> bool {
    COMMON_SUFFIXES.contains(&word)
}

/// Case-insensitive check against the blocked list.
pub fn is_blocked(tag: &str) -> bool {
    let lower = tag.to_lowercase();
    BLOCKED.contains(&lower.as_str())
}
