//! Remove folders that hold no audio anywhere beneath them.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::has_extension;

/// Extensions that keep a folder alive.
pub const KEEP_EXTENSIONS: &[&str] = &["flac", "mp3", "wav", "m4a", "aac", "ogg", "aif", "aiff"];

/// Cover image file names, matched case-insensitively.
pub const COVER_NAMES: &[&str] = &[
    "cover.jpg", "cover.jpeg", "cover.png", "cover.webp",
    "folder.jpg", "folder.jpeg", "folder.png", "folder.webp",
    "album cover.jpg", "album cover.jpeg",
    "albumartsmall.jpg", "artist.jpg",
];

/// Which folders count as removable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PruneMode {
    /// No audio file anywhere beneath the folder.
    #[default]
    NoAudio,
    /// Empty, or only cover images and no subfolders.
    CoverOnly,
}

#[derive(Debug, Default)]
pub struct PruneResult {
    pub scanned: u64,
    pub removed: u64,
    pub errors: u64,
    /// Folders deleted, or that would be deleted on a dry run.
    pub candidates: Vec<PathBuf>,
}

/// True if any file under `dir` (recursively) has an audio extension.
pub fn contains_audio(dir: &Path) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|e| e.file_type().is_file() && has_extension(e.path(), KEEP_EXTENSIONS))
}

pub fn is_cover_file(name: &str) -> bool {
    COVER_NAMES.contains(&name.to_lowercase().as_str())
}

/// True if `dir` has no subfolders and every file in it is a cover image.
pub fn is_cover_only(dir: &Path) -> std::io::Result<bool> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            return Ok(false);
        }
        if !is_cover_file(&entry.file_name().to_string_lossy()) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_removable(dir: &Path, mode: PruneMode) -> bool {
    match mode {
        PruneMode::NoAudio => !contains_audio(dir),
        PruneMode::CoverOnly => match is_cover_only(dir) {
            Ok(removable) => removable,
            Err(e) => {
                log::warn!("Could not list {}: {}", dir.display(), e);
                false
            }
        },
    }
}

/// Delete every folder below `root` that `mode` deems removable, deepest
/// first. Folders are judged before anything is deleted. `root` itself is
/// never removed.
pub fn prune_empty_folders(root: &Path, mode: PruneMode, dry_run: bool) -> PruneResult {
    let mut result = PruneResult::default();

    // Children come before their parents.
    let dirs: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect();
    result.scanned = dirs.len() as u64;

    let removable: Vec<PathBuf> = dirs.into_iter().filter(|d| is_removable(d, mode)).collect();

    for dir in removable {
        if dry_run {
            println!("Would delete: {}", dir.display());
            result.candidates.push(dir);
            continue;
        }

        match std::fs::remove_dir_all(&dir) {
            Ok(()) => {
                log::info!("Deleted: {}", dir.display());
                result.removed += 1;
                result.candidates.push(dir);
            }
            Err(e) => {
                log::warn!("Error deleting {}: {}", dir.display(), e);
                result.errors += 1;
            }
        }
    }

    result
}
