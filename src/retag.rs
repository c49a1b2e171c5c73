//! The `genres` job: replace each track's genre with the normalized top
//! Last.fm tags of its artist.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::genre::{aggregate, genre_field};
use crate::lastfm::ArtistTagSource;
use crate::tags;
use crate::{has_extension, TAGGABLE_EXTENSIONS};

/// An audio file and the artist read from its tags.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackArtist {
    pub path: PathBuf,
    pub artist: String,
}

/// A pending genre write.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreUpdate {
    pub path: PathBuf,
    pub artist: String,
    pub genre: String,
}

/// Genre writes worked out for a set of tracks.
#[derive(Debug, Default)]
pub struct RetagPlan {
    pub updates: Vec<GenreUpdate>,
    /// Tracks whose artist had no usable tags.
    pub no_tags: Vec<PathBuf>,
    pub artists_looked_up: usize,
}

#[derive(Debug, Default)]
pub struct RetagResult {
    pub scanned: u64,
    pub updated: u64,
    pub skipped_no_tags: u64,
    pub missing_artist: u64,
    pub failed: u64,
}

/// Collect taggable audio files under `paths`, in walk order.
pub fn find_audio_files<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        for entry in WalkDir::new(path).follow_links(true).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() && has_extension(entry.path(), TAGGABLE_EXTENSIONS) {
                files.push(entry.into_path());
            }
        }
    }
    files
}

/// Look up each distinct artist once and work out the genre for every track.
///
/// Artists are matched case-insensitively; the first spelling seen is the
/// one sent to the tag source.
pub fn plan_updates(tracks: &[TrackArtist], source: &dyn ArtistTagSource) -> RetagPlan {
    let mut seen = HashSet::new();
    let artists: Vec<&str> = tracks
        .iter()
        .map(|t| t.artist.as_str())
        .filter(|a| seen.insert(a.to_lowercase()))
        .collect();

    let pb = progress_bar(artists.len() as u64, "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} artists ({eta}) {msg}");

    let mut genre_by_artist: HashMap<String, Option<String>> = HashMap::new();
    for &artist in &artists {
        pb.set_message(artist.to_string());
        let top = source.top_tags(artist);
        log::info!("Artist: {artist} -> Tags: {top:?}");

        let genres = aggregate(&top);
        let genre = (!genres.is_empty()).then(|| genre_field(&genres));
        genre_by_artist.insert(artist.to_lowercase(), genre);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let mut plan = RetagPlan {
        artists_looked_up: artists.len(),
        ..Default::default()
    };

    for track in tracks {
        match genre_by_artist.get(&track.artist.to_lowercase()) {
            Some(Some(genre)) => plan.updates.push(GenreUpdate {
                path: track.path.clone(),
                artist: track.artist.clone(),
                genre: genre.clone(),
            }),
            _ => {
                log::info!(
                    "Skipped {}: no top tags found for '{}'",
                    track.path.display(),
                    track.artist
                );
                plan.no_tags.push(track.path.clone());
            }
        }
    }

    plan
}

/// Scan `paths`, fetch genres per artist, and write them (unless `dry_run`).
pub fn retag<P: AsRef<Path>>(
    paths: &[P],
    source: &dyn ArtistTagSource,
    dry_run: bool,
) -> RetagResult {
    let files = find_audio_files(paths);
    let mut result = RetagResult {
        scanned: files.len() as u64,
        ..Default::default()
    };

    if files.is_empty() {
        return result;
    }
    println!("Found {} audio files", files.len());

    let mut tracks = Vec::with_capacity(files.len());
    for path in files {
        match tags::read_artist(&path) {
            Some(artist) => tracks.push(TrackArtist { path, artist }),
            None => {
                log::info!("Skipped {}: no artist tag", path.display());
                result.missing_artist += 1;
            }
        }
    }

    let plan = plan_updates(&tracks, source);
    println!("Looked up {} unique artist(s) on Last.fm", plan.artists_looked_up);
    result.skipped_no_tags = plan.no_tags.len() as u64;

    let pb = progress_bar(
        plan.updates.len() as u64,
        "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({eta}) {msg}",
    );

    for update in &plan.updates {
        let name = file_name(&update.path);
        if dry_run {
            pb.println(format!("Would update {name}: Genre -> '{}'", update.genre));
            result.updated += 1;
        } else {
            match tags::write_genre(&update.path, &update.genre) {
                Ok(()) => {
                    log::info!("Updated {name}: Genre -> '{}'", update.genre);
                    result.updated += 1;
                }
                Err(e) => {
                    log::warn!("{e}");
                    result.failed += 1;
                }
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message(format!(
        "Done: {} updated, {} failed",
        result.updated, result.failed
    ));

    result
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn progress_bar(len: u64, template: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template(template) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Canned tags per artist, recording every lookup.
    struct FakeSource {
        tags: HashMap<&'static str, Vec<&'static str>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn new(entries: &[(&'static str, &[&'static str])]) -> Self {
            Self {
                tags: entries.iter().map(|(a, t)| (*a, t.to_vec())).collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ArtistTagSource for FakeSource {
        fn top_tags(&self, artist: &str) -> Vec<String> {
            self.calls.borrow_mut().push(artist.to_string());
            self.tags
                .get(artist)
                .map(|t| t.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default()
        }
    }

    fn track(path: &str, artist: &str) -> TrackArtist {
        TrackArtist {
            path: PathBuf::from(path),
            artist: artist.to_string(),
        }
    }

    #[test]
    fn test_one_lookup_per_artist_case_insensitive() {
        let source = FakeSource::new(&[("Autopsy", &["Death Metal", "Doom Metal"])]);
        let tracks = vec![
            track("/a/01.mp3", "Autopsy"),
            track("/a/02.mp3", "AUTOPSY"),
            track("/a/03.mp3", "autopsy"),
        ];
        let plan = plan_updates(&tracks, &source);
        assert_eq!(*source.calls.borrow(), vec!["Autopsy"]);
        assert_eq!(plan.artists_looked_up, 1);
        assert_eq!(plan.updates.len(), 3);
        for update in &plan.updates {
            assert_eq!(update.genre, "Death/Doom; Death Metal; Doom Metal");
        }
        // Each update keeps its own track's spelling
        assert_eq!(plan.updates[1].artist, "AUTOPSY");
    }

    #[test]
    fn test_artist_without_tags_is_skipped() {
        let source = FakeSource::new(&[("Kreator", &["Thrash", "German"])]);
        let tracks = vec![track("/k/01.flac", "Kreator"), track("/x/01.flac", "Nobody")];
        let plan = plan_updates(&tracks, &source);
        assert_eq!(
            plan.updates,
            vec![GenreUpdate {
                path: PathBuf::from("/k/01.flac"),
                artist: "Kreator".into(),
                genre: "Thrash Metal; German".into(),
            }]
        );
        assert_eq!(plan.no_tags, vec![PathBuf::from("/x/01.flac")]);
    }

    #[test]
    fn test_empty_track_list() {
        let source = FakeSource::new(&[]);
        let plan = plan_updates(&[], &source);
        assert!(plan.updates.is_empty());
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn test_find_audio_files_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let album = dir.path().join("Artist/Album");
        std::fs::create_dir_all(&album).unwrap();
        for name in ["01 - One.mp3", "02 - Two.FLAC", "cover.jpg", "notes.txt"] {
            std::fs::write(album.join(name), b"").unwrap();
        }
        let mut found = find_audio_files(&[dir.path()]);
        found.sort();
        assert_eq!(found, vec![album.join("01 - One.mp3"), album.join("02 - Two.FLAC")]);
    }

    #[test]
    fn test_retag_counts_missing_artists() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("01 - Broken.mp3"), b"not audio").unwrap();
        let source = FakeSource::new(&[]);
        let result = retag(&[dir.path()], &source, true);
        assert_eq!(result.scanned, 1);
        assert_eq!(result.missing_artist, 1);
        assert_eq!(result.updated, 0);
        assert!(source.calls.borrow().is_empty());
    }
}
