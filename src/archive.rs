//! Persistence of extracted features, keyed by file identifier.
//!
//! The whole batch is serialized as one JSON blob: a map from file
//! identifier to [`FeatureRecord`]. The writer runs once, after every file
//! has been processed, so a failed run never touches an existing archive.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Features extracted from one audio file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureRecord {
    /// Analysis frames per second, `round(1 / frame_rate)`.
    pub fps: u32,
    /// Time-major feature matrix (frames x channels).
    pub features: Array2<f32>,
}

/// In-memory aggregate for a whole batch run.
pub type FeatureArchive = BTreeMap<String, FeatureRecord>;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Archive I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Archive encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize the archive to `path` in one write, replacing any existing
/// file there.
pub fn write_archive(path: &Path, archive: &FeatureArchive) -> Result<(), ArchiveError> {
    let file = File::create(path).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, archive)?;
    writer.flush().map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Deserialize an archive previously written by [`write_archive`].
pub fn read_archive(path: &Path) -> Result<FeatureArchive, ArchiveError> {
    let file = File::open(path).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_archive() -> FeatureArchive {
        let mut archive = FeatureArchive::new();
        archive.insert(
            "tone".to_string(),
            FeatureRecord {
                fps: 100,
                features: Array2::from_shape_fn((4, 3), |(r, c)| r as f32 * 0.5 - c as f32),
            },
        );
        archive
    }

    #[test]
    fn archive_round_trips_fps_and_features() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("features.pt");
        let archive = sample_archive();
        write_archive(&path, &archive).unwrap();
        let loaded = read_archive(&path).unwrap();
        assert_eq!(loaded, archive);
    }

    #[test]
    fn writing_replaces_an_existing_archive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("features.pt");
        write_archive(&path, &sample_archive()).unwrap();
        let empty = FeatureArchive::new();
        write_archive(&path, &empty).unwrap();
        assert_eq!(read_archive(&path).unwrap(), empty);
    }

    #[test]
    fn reading_a_missing_archive_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.pt");
        assert!(matches!(
            read_archive(&path),
            Err(ArchiveError::Io { .. })
        ));
    }
}
