//! Decoding of audio files into mono samples at the analysis rate.

mod decode;
mod resample;

use std::path::Path;

/// Fixed working sample rate for all feature extraction.
pub(crate) const TARGET_SAMPLE_RATE: u32 = 22_050;

/// Decode `path`, average the channels down to mono, and resample to
/// `sample_rate`. Returns an error message describing the first failure.
pub(crate) fn load_mono(path: &Path, sample_rate: u32) -> Result<Vec<f32>, String> {
    let decoded = decode::decode_audio(path)?;
    let mono = downmix_to_mono(&decoded.samples, decoded.channels);
    Ok(resample::resample_linear_into_new(
        &mono,
        decoded.sample_rate,
        sample_rate,
    ))
}

fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return samples.iter().copied().map(sanitize_sample).collect();
    }
    let frames = samples.len() / channels;
    let mut mono = Vec::with_capacity(frames);
    for frame in 0..frames {
        let start = frame * channels;
        let mut sum = 0.0_f32;
        for &sample in &samples[start..start + channels] {
            sum += sanitize_sample(sample);
        }
        mono.push(sum / channels as f32);
    }
    mono
}

fn sanitize_sample(sample: f32) -> f32 {
    if sample.is_finite() {
        sample.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
