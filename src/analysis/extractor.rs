use std::path::Path;

use ndarray::Array2;
use thiserror::Error;

use super::audio::{self, TARGET_SAMPLE_RATE};
use super::spectral;

/// Errors from single-file feature extraction. Any of these aborts the
/// surrounding batch.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid frame rate {0} (expected seconds per frame > 0)")]
    InvalidFrameRate(f64),
    #[error("Audio decode failed: {0}")]
    Decode(String),
    #[error("Feature analysis failed: {0}")]
    Analysis(String),
}

/// Extract the time-major feature stack for one audio file.
///
/// `frame_rate` is the analysis frame duration in seconds (0.01 = 10 ms
/// frames). The file is decoded to mono at 22 050 Hz regardless of its
/// source format; the resulting array has one row per frame and
/// [`spectral::FEATURE_CHANNELS`] columns.
pub fn extract_features(path: &Path, frame_rate: f64) -> Result<Array2<f32>, ExtractError> {
    let window_len = analysis_window_len(TARGET_SAMPLE_RATE, frame_rate)?;
    let samples = audio::load_mono(path, TARGET_SAMPLE_RATE).map_err(ExtractError::Decode)?;
    spectral::feature_stack(&samples, TARGET_SAMPLE_RATE, window_len)
        .map_err(ExtractError::Analysis)
}

/// Analysis window length in samples: `round(sample_rate * frame_rate)`,
/// never below one sample. The same value is used as the hop.
pub(crate) fn analysis_window_len(
    sample_rate: u32,
    frame_rate: f64,
) -> Result<usize, ExtractError> {
    if !frame_rate.is_finite() || frame_rate <= 0.0 {
        return Err(ExtractError::InvalidFrameRate(frame_rate));
    }
    let len = (sample_rate as f64 * frame_rate).round() as usize;
    Ok(len.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use tempfile::TempDir;

    fn write_tone(path: &Path, seconds: f32) {
        let spec = WavSpec {
            channels: 1,
            sample_rate: TARGET_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        let len = (seconds * TARGET_SAMPLE_RATE as f32).round() as usize;
        for i in 0..len {
            let phase =
                2.0 * std::f32::consts::PI * 440.0 * i as f32 / TARGET_SAMPLE_RATE as f32;
            writer
                .write_sample((phase.sin() * 0.6 * i16::MAX as f32) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn default_frame_rate_gives_221_sample_windows() {
        assert_eq!(analysis_window_len(TARGET_SAMPLE_RATE, 0.01).unwrap(), 221);
    }

    #[test]
    fn non_positive_and_non_finite_frame_rates_are_rejected() {
        assert!(matches!(
            analysis_window_len(TARGET_SAMPLE_RATE, 0.0),
            Err(ExtractError::InvalidFrameRate(_))
        ));
        assert!(matches!(
            analysis_window_len(TARGET_SAMPLE_RATE, -0.01),
            Err(ExtractError::InvalidFrameRate(_))
        ));
        assert!(matches!(
            analysis_window_len(TARGET_SAMPLE_RATE, f64::NAN),
            Err(ExtractError::InvalidFrameRate(_))
        ));
    }

    #[test]
    fn one_second_tone_extracts_expected_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");
        write_tone(&path, 1.0);
        let features = extract_features(&path, 0.01).unwrap();
        assert_eq!(features.ncols(), spectral::FEATURE_CHANNELS);
        assert!(features.nrows().abs_diff(100) <= 1);
    }

    #[test]
    fn extraction_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");
        write_tone(&path, 0.25);
        let a = extract_features(&path, 0.01).unwrap();
        let b = extract_features(&path, 0.01).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.wav");
        assert!(matches!(
            extract_features(&path, 0.01),
            Err(ExtractError::Decode(_))
        ));
    }
}
