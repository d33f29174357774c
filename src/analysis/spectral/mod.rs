//! Spectral feature stack: MFCC + mel spectrogram + centroid, with deltas.

mod delta;
mod mel;
mod stft;

use ndarray::{Array2, Axis, concatenate};

use crate::analysis::fft::FftPlan;
use delta::regression_delta;
use mel::MelBank;

/// Cepstral coefficients kept per frame.
pub(crate) const MFCC_COEFFS: usize = 20;
/// Mel filterbank bands per frame.
pub(crate) const MEL_BANDS: usize = 128;
/// Regression half-width used for the delta blocks.
const DELTA_HALF_WIDTH: usize = 4;

/// Channels per output frame: each base block plus its delta counterpart.
pub const FEATURE_CHANNELS: usize = 2 * (MFCC_COEFFS + MEL_BANDS + 1);

/// Compute the full time-major feature stack for mono audio.
///
/// `window_len` is both the analysis window and the hop, so frames do not
/// overlap. Blocks are concatenated along the channel axis in the order
/// [mfcc, mel, centroid, Δmfcc, Δmel, Δcentroid]; all six share one frame
/// count because the base features come out of a single framing loop.
pub(crate) fn feature_stack(
    samples: &[f32],
    sample_rate: u32,
    window_len: usize,
) -> Result<Array2<f32>, String> {
    if samples.is_empty() {
        return Err("No samples to analyze".to_string());
    }
    let fft_len = window_len.max(1).next_power_of_two();
    let plan = FftPlan::new(fft_len)?;
    let bank = MelBank::new(
        sample_rate,
        fft_len,
        MEL_BANDS,
        0.0,
        sample_rate as f32 * 0.5,
    );
    let frames = stft::compute_frames(samples, sample_rate, window_len, MFCC_COEFFS, &bank, &plan)?;
    let n_frames = frames.len();

    let mfcc = rows_to_array(frames.mfcc, MFCC_COEFFS)?;
    let mel = rows_to_array(frames.mel, MEL_BANDS)?;
    let centroid = Array2::from_shape_vec((n_frames, 1), frames.centroid)
        .map_err(|err| format!("Centroid block shape: {err}"))?;

    let mfcc_delta = regression_delta(&mfcc, DELTA_HALF_WIDTH);
    let mel_delta = regression_delta(&mel, DELTA_HALF_WIDTH);
    let centroid_delta = regression_delta(&centroid, DELTA_HALF_WIDTH);

    concatenate(
        Axis(1),
        &[
            mfcc.view(),
            mel.view(),
            centroid.view(),
            mfcc_delta.view(),
            mel_delta.view(),
            centroid_delta.view(),
        ],
    )
    .map_err(|err| format!("Feature stack concatenation: {err}"))
}

fn rows_to_array(rows: Vec<Vec<f32>>, width: usize) -> Result<Array2<f32>, String> {
    let n_rows = rows.len();
    let mut flat = Vec::with_capacity(n_rows * width);
    for row in rows {
        if row.len() != width {
            return Err(format!(
                "Feature row width mismatch: got {} expected {width}",
                row.len()
            ));
        }
        flat.extend_from_slice(&row);
    }
    Array2::from_shape_vec((n_rows, width), flat)
        .map_err(|err| format!("Feature block shape: {err}"))
}
