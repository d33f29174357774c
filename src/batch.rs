//! Sequential batch driver: extract features for every directory entry and
//! persist the aggregate archive.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::analysis::{ExtractError, extract_features};
use crate::archive::{self, ArchiveError, FeatureArchive, FeatureRecord};
use crate::config::BatchOptions;

/// Counters for a completed run.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Directory entries processed.
    pub total_files: usize,
    /// Analysis frames across all files.
    pub total_frames: usize,
    /// Where the archive was written.
    pub output_path: PathBuf,
}

/// Errors that abort a batch run. The first failure wins; nothing is
/// written on failure.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Invalid frame rate {0} (expected seconds per frame > 0)")]
    InvalidFrameRate(f64),
    #[error("Failed to list input directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Feature extraction failed for {path}: {source}")]
    Extract {
        path: PathBuf,
        source: ExtractError,
    },
    #[error("{0}")]
    Archive(#[from] ArchiveError),
}

/// Process every entry of `options.input_dir` in directory listing order and
/// write the whole archive once at the end.
///
/// Entries are not filtered: anything the decoder cannot read fails the run.
/// Records whose truncated names collide silently overwrite earlier ones.
pub fn run(options: &BatchOptions) -> Result<BatchSummary, BatchError> {
    if !options.frame_rate.is_finite() || options.frame_rate <= 0.0 {
        return Err(BatchError::InvalidFrameRate(options.frame_rate));
    }
    let entries = list_entries(&options.input_dir)?;
    let total = entries.len();
    let fps = (1.0 / options.frame_rate).round() as u32;

    let mut records = FeatureArchive::new();
    let mut total_frames = 0usize;
    for (index, path) in entries.iter().enumerate() {
        info!(
            file = %path.display(),
            index = index + 1,
            total,
            "Extracting features"
        );
        let features =
            extract_features(path, options.frame_rate).map_err(|source| BatchError::Extract {
                path: path.clone(),
                source,
            })?;
        total_frames += features.nrows();
        records.insert(record_key(path), FeatureRecord { fps, features });
    }

    archive::write_archive(&options.output_path, &records)?;
    info!(
        files = total,
        records = records.len(),
        output = %options.output_path.display(),
        "Archive written"
    );
    Ok(BatchSummary {
        total_files: total,
        total_frames,
        output_path: options.output_path.clone(),
    })
}

fn list_entries(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let read = fs::read_dir(dir).map_err(|source| BatchError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.map_err(|source| BatchError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        entries.push(entry.path());
    }
    Ok(entries)
}

/// Archive key for a file: its name truncated at the first `.`, so
/// `a.b.wav` is keyed as `a`.
fn record_key(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.split('.').next().unwrap_or_default().to_string()
}
