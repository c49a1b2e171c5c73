//! Track gap checker: find album folders with missing or oddly numbered
//! tracks.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GapsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Leading track number followed by a separator: "01.", "02 -", "03_".
static TRACK_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2})[.\-_\s]").unwrap());

/// Numbering problems found in one album folder.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumReport {
    pub folder: PathBuf,
    /// Distinct track numbers, ascending.
    pub tracks: Vec<u32>,
    pub missing: Vec<u32>,
    pub strict_warnings: Vec<String>,
}

impl AlbumReport {
    pub fn has_issues(&self) -> bool {
        !self.missing.is_empty() || !self.strict_warnings.is_empty()
    }
}

/// Result of scanning an archive tree.
#[derive(Debug, Default)]
pub struct GapScan {
    pub total_albums: usize,
    pub clean: usize,
    /// Only albums with at least one issue, in walk order.
    pub albums: Vec<AlbumReport>,
}

impl GapScan {
    pub fn with_missing(&self) -> impl Iterator<Item = &AlbumReport> {
        self.albums.iter().filter(|a| !a.missing.is_empty())
    }

    pub fn with_strict_issues(&self) -> impl Iterator<Item = &AlbumReport> {
        self.albums.iter().filter(|a| !a.strict_warnings.is_empty())
    }
}

pub fn extract_track_number(file_name: &str) -> Option<u32> {
    TRACK_NUMBER_RE
        .captures(file_name)
        .and_then(|caps| caps[1].parse().ok())
}

/// Analyze a set of track numbers found in `folder`.
///
/// Strict mode also flags albums that don't start at 01 and jumps of more
/// than two between consecutive numbers.
pub fn check_numbers(folder: &Path, numbers: &[u32], strict: bool) -> AlbumReport {
    let tracks: Vec<u32> = numbers.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

    if tracks.is_empty() {
        return AlbumReport {
            folder: folder.to_path_buf(),
            tracks,
            missing: Vec::new(),
            strict_warnings: Vec::new(),
        };
    }
    let (first, last) = (tracks[0], tracks[tracks.len() - 1]);

    let missing: Vec<u32> = (first..=last).filter(|n| tracks.binary_search(n).is_err()).collect();

    let mut strict_warnings = Vec::new();
    if strict {
        if first != 1 {
            strict_warnings.push(format!("Does not start at 01 (starts at {first:02})"));
        }
        for pair in tracks.windows(2) {
            if pair[1] - pair[0] > 2 {
                strict_warnings.push(format!("Jump from {:02} to {:02}", pair[0], pair[1]));
            }
        }
    }

    AlbumReport {
        folder: folder.to_path_buf(),
        tracks,
        missing,
        strict_warnings,
    }
}

/// Track numbers of the visible files directly inside `folder`.
fn folder_track_numbers(folder: &Path) -> std::io::Result<Vec<u32>> {
    let mut numbers = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        if let Some(n) = extract_track_number(&name) {
            numbers.push(n);
        }
    }
    Ok(numbers)
}

/// Walk `root` and check every folder that holds numbered tracks.
/// Entries the walk can't reach are logged and skipped.
pub fn scan_archive(root: &Path, strict: bool) -> GapScan {
    let mut scan = GapScan::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let numbers = match folder_track_numbers(entry.path()) {
            Ok(n) => n,
            Err(e) => {
                log::warn!("Could not list {}: {}", entry.path().display(), e);
                continue;
            }
        };
        if numbers.is_empty() {
            continue;
        }

        scan.total_albums += 1;
        let report = check_numbers(entry.path(), &numbers, strict);
        if report.has_issues() {
            log::debug!("Issues in {}: {:?}", entry.path().display(), report);
            scan.albums.push(report);
        } else {
            scan.clean += 1;
        }
    }

    scan
}

/// One-line summary for `--summary-only`.
pub fn summary_line(scan: &GapScan) -> String {
    format!(
        "Summary: {} clean, {} with issues out of {} total albums",
        scan.clean,
        scan.albums.len(),
        scan.total_albums
    )
}

fn percent(part: usize, total: usize) -> f64 {
    part as f64 / total.max(1) as f64 * 100.0
}

fn format_numbers(numbers: &[u32]) -> String {
    let parts: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

fn push_album_heading(out: &mut String, index: usize, album: &AlbumReport, root: &Path) {
    let name = album
        .folder
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| album.folder.display().to_string());
    let _ = writeln!(out, "{index:2}. {name}");
    if let Some(parent) = album.folder.parent().filter(|p| *p != root) {
        if let Some(parent_name) = parent.file_name() {
            let _ = writeln!(out, "    Parent: {}", parent_name.to_string_lossy());
        }
    }
    let _ = writeln!(out, "    Found tracks: {}", format_numbers(&album.tracks));
}

/// Render the full text report.
pub fn render_report(scan: &GapScan, root: &Path, strict: bool, generated: DateTime<Local>) -> String {
    let rule = "=".repeat(80);
    let with_missing: Vec<&AlbumReport> = scan.with_missing().collect();
    let with_strict: Vec<&AlbumReport> = scan.with_strict_issues().collect();
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "TRACK GAP ANALYSIS REPORT");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Archive: {}", root.display());
    let _ = writeln!(out, "Mode: {}", if strict { "Strict" } else { "Standard" });
    let _ = writeln!(out, "Total albums scanned: {}", scan.total_albums);
    let _ = writeln!(out);

    let _ = writeln!(out, "SUMMARY STATISTICS");
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(
        out,
        "Clean albums: {} ({:.1}%)",
        scan.clean,
        percent(scan.clean, scan.total_albums)
    );
    let _ = writeln!(
        out,
        "Albums with issues: {} ({:.1}%)",
        scan.albums.len(),
        percent(scan.albums.len(), scan.total_albums)
    );
    let _ = writeln!(out, "Missing tracks: {} albums", with_missing.len());
    let _ = writeln!(out, "Strict issues: {} albums", with_strict.len());
    let _ = writeln!(out);

    if scan.albums.is_empty() {
        let _ = writeln!(out, "All albums are clean! No gaps or issues found.");
    } else {
        if !with_missing.is_empty() {
            let _ = writeln!(out, "ALBUMS WITH MISSING TRACKS");
            let _ = writeln!(out, "{}", "-".repeat(50));
            for (i, album) in with_missing.iter().enumerate() {
                push_album_heading(&mut out, i + 1, album, root);
                let _ = writeln!(out, "    Missing: {}", format_numbers(&album.missing));
                if !album.strict_warnings.is_empty() {
                    let _ = writeln!(out, "    Additional issues:");
                    for warning in &album.strict_warnings {
                        let _ = writeln!(out, "        - {warning}");
                    }
                }
                let _ = writeln!(out);
            }
        }

        let strict_only: Vec<&&AlbumReport> =
            with_strict.iter().filter(|a| a.missing.is_empty()).collect();
        if !strict_only.is_empty() {
            let _ = writeln!(out, "ALBUMS WITH NUMBERING ISSUES (Strict Mode)");
            let _ = writeln!(out, "{}", "-".repeat(55));
            for (i, album) in strict_only.iter().enumerate() {
                push_album_heading(&mut out, i + 1, album, root);
                let _ = writeln!(out, "    Issues:");
                for warning in &album.strict_warnings {
                    let _ = writeln!(out, "        - {warning}");
                }
                let _ = writeln!(out);
            }
        }

        let _ = writeln!(out, "RECOMMENDATIONS");
        let _ = writeln!(out, "{}", "-".repeat(30));
        if !with_missing.is_empty() {
            let _ = writeln!(out, "- Check for missing audio files in the listed albums");
            let _ = writeln!(out, "- Verify track numbering consistency");
            let _ = writeln!(out, "- Consider re-downloading or re-ripping problematic albums");
        }
        if !with_strict.is_empty() {
            let _ = writeln!(out, "- Standardize track numbering to start from 01");
            let _ = writeln!(out, "- Ensure sequential numbering without gaps");
            let _ = writeln!(out, "- Use consistent track number formatting");
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Report generated: {}", generated.format("%Y-%m-%d %H:%M:%S"));
    let _ = write!(out, "{rule}");
    out
}

pub fn write_report(path: &Path, report: &str) -> Result<(), GapsError> {
    std::fs::write(path, report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn touch(dir: &Path, names: &[&str]) {
        std::fs::create_dir_all(dir).unwrap();
        for name in names {
            std::fs::write(dir.join(name), b"").unwrap();
        }
    }

    #[test]
    fn test_extract_track_number() {
        assert_eq!(extract_track_number("01. Intro.flac"), Some(1));
        assert_eq!(extract_track_number("02 - Song.mp3"), Some(2));
        assert_eq!(extract_track_number("03_song.mp3"), Some(3));
        assert_eq!(extract_track_number("7 Song.mp3"), Some(7));
        assert_eq!(extract_track_number("00 Hidden.mp3"), Some(0));
        assert_eq!(extract_track_number("101 - Disc One.mp3"), None);
        assert_eq!(extract_track_number("Song 01.mp3"), None);
        assert_eq!(extract_track_number("01.mp3"), Some(1));
        assert_eq!(extract_track_number("cover.jpg"), None);
    }

    #[test]
    fn test_contiguous_album_is_clean() {
        let r = check_numbers(Path::new("/a"), &[3, 1, 2, 2], false);
        assert_eq!(r.tracks, vec![1, 2, 3]);
        assert!(r.missing.is_empty());
        assert!(!r.has_issues());
    }

    #[test]
    fn test_missing_numbers_between_first_and_last() {
        let r = check_numbers(Path::new("/a"), &[1, 2, 5, 7], false);
        assert_eq!(r.missing, vec![3, 4, 6]);
        assert!(r.strict_warnings.is_empty());
    }

    #[test]
    fn test_standard_mode_ignores_late_start() {
        let r = check_numbers(Path::new("/a"), &[4, 5, 6], false);
        assert!(!r.has_issues());
    }

    #[test]
    fn test_strict_warnings() {
        let r = check_numbers(Path::new("/a"), &[2, 3, 7], true);
        assert_eq!(r.missing, vec![4, 5, 6]);
        assert_eq!(
            r.strict_warnings,
            vec!["Does not start at 01 (starts at 02)", "Jump from 03 to 07"]
        );
    }

    #[test]
    fn test_strict_allows_single_gap() {
        // A difference of exactly two is a gap but not a jump
        let r = check_numbers(Path::new("/a"), &[1, 3], true);
        assert_eq!(r.missing, vec![2]);
        assert!(r.strict_warnings.is_empty());
    }

    #[test]
    fn test_scan_archive() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("Artist/Clean"), &["01 - A.flac", "02 - B.flac", "cover.jpg"]);
        touch(&root.path().join("Artist/Gappy"), &["01 - A.flac", "03 - C.flac"]);
        touch(&root.path().join("Artist/Late"), &["05 - E.mp3", "06 - F.mp3", ".01 - hidden.mp3"]);
        touch(&root.path().join("Artist/Scans"), &["front.jpg", "back.jpg"]);

        let scan = scan_archive(root.path(), false);
        assert_eq!(scan.total_albums, 3);
        assert_eq!(scan.clean, 2);
        assert_eq!(scan.albums.len(), 1);
        assert_eq!(scan.albums[0].folder, root.path().join("Artist/Gappy"));
        assert_eq!(scan.albums[0].missing, vec![2]);

        let strict = scan_archive(root.path(), true);
        assert_eq!(strict.clean, 1);
        assert_eq!(strict.with_strict_issues().count(), 1);
        assert_eq!(strict.with_missing().count(), 1);
    }

    #[test]
    fn test_scan_archive_skips_walk_errors() {
        let root = tempfile::tempdir().unwrap();
        let scan = scan_archive(&root.path().join("gone"), true);
        assert_eq!(scan.total_albums, 0);
        assert!(scan.albums.is_empty());
    }

    #[test]
    fn test_render_report_sections() {
        let root = Path::new("/music");
        let scan = GapScan {
            total_albums: 3,
            clean: 1,
            albums: vec![
                check_numbers(&root.join("Band/Gappy"), &[1, 2, 4], true),
                check_numbers(&root.join("Band/Late"), &[2, 3], true),
            ],
        };
        let when = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let report = render_report(&scan, root, true, when);

        assert!(report.contains("Mode: Strict"));
        assert!(report.contains("Clean albums: 1 (33.3%)"));
        assert!(report.contains("Albums with issues: 2 (66.7%)"));
        assert!(report.contains("ALBUMS WITH MISSING TRACKS"));
        assert!(report.contains(" 1. Gappy\n    Parent: Band\n    Found tracks: [1, 2, 4]\n    Missing: [3]"));
        assert!(report.contains("ALBUMS WITH NUMBERING ISSUES (Strict Mode)"));
        assert!(report.contains("        - Does not start at 01 (starts at 02)"));
        assert!(report.contains("Report generated: 2024-05-01 12:30:00"));
    }

    #[test]
    fn test_render_report_all_clean() {
        let scan = GapScan {
            total_albums: 2,
            clean: 2,
            albums: Vec::new(),
        };
        let when = Local.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let report = render_report(&scan, Path::new("/music"), false, when);
        assert!(report.contains("All albums are clean!"));
        assert!(!report.contains("RECOMMENDATIONS"));
        assert_eq!(summary_line(&scan), "Summary: 2 clean, 0 with issues out of 2 total albums");
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_tracks.txt");
        write_report(&path, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
    }
}
