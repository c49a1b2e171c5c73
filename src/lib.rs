pub mod config;
pub mod gaps;
pub mod genre;
pub mod lastfm;
pub mod prune;
pub mod retag;
pub mod tags;

use std::path::Path;

/// Audio file extensions whose genre we can rewrite
pub const TAGGABLE_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "ogg", "opus", "wav",
    "aif", "aiff",
    "m4a", "mp4", "aac",
    "wv", "ape",
];

/// Application name for XDG paths
pub const APP_NAME: &str = "archivist";

/// Case-insensitive extension check.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    extensions.contains(&ext.as_str())
}
