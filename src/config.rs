//! Run configuration for the batch driver.

use std::path::PathBuf;

/// Directory scanned for audio files when no `--input` flag is given.
pub const DEFAULT_INPUT_DIR: &str = "./Audios";
/// Archive path written when no `--out` flag is given.
pub const DEFAULT_OUTPUT_PATH: &str = "librosa_audio_features.pt";
/// Analysis frame duration in seconds (10 ms frames).
pub const DEFAULT_FRAME_RATE: f64 = 0.01;

/// Options for one batch run, passed into [`crate::batch::run`].
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory whose entries are all treated as audio files.
    pub input_dir: PathBuf,
    /// Path of the single archive written at the end of the run.
    pub output_path: PathBuf,
    /// Seconds of audio per analysis frame.
    pub frame_rate: f64,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}
