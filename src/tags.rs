use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::Tag;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: lofty::error::LoftyError,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: lofty::error::LoftyError,
    },
    #[error("{path} does not support {tag_type:?} tags")]
    Unsupported {
        path: String,
        tag_type: lofty::tag::TagType,
    },
}

/// Read the artist from an audio file. Returns `None` when the file can't be
/// parsed or carries no artist.
pub fn read_artist(path: &Path) -> Option<String> {
    let tagged_file = match lofty::read_from_path(path) {
        Ok(f) => f,
        Err(e) => {
            log::debug!("Could not read tags from {}: {}", path.display(), e);
            return None;
        }
    };

    // Try primary tag, then fall back
    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())?;

    tag.artist()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
}

/// Replace the genre of an audio file with `genre`.
///
/// Writes to the file's primary tag type, creating that tag if the file has
/// none. Every existing genre item is removed first so multi-value genres
/// don't survive alongside the new one.
pub fn write_genre(path: &Path, genre: &str) -> Result<(), TagError> {
    let path_str = path.display().to_string();

    let mut tagged_file = Probe::open(path)
        .and_then(|p| p.read())
        .map_err(|source| TagError::Read {
            path: path_str.clone(),
            source,
        })?;

    let tag_type = tagged_file.primary_tag_type();
    if tagged_file.primary_tag().is_none() {
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged_file
        .primary_tag_mut()
        .ok_or_else(|| TagError::Unsupported {
            path: path_str.clone(),
            tag_type,
        })?;

    tag.remove_key(&ItemKey::Genre);
    tag.set_genre(genre.to_string());

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|source| TagError::Write {
            path: path_str,
            source,
        })
}
