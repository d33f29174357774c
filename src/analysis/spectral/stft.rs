use super::mel::{MelBank, mfcc_from_energies};
use crate::analysis::fft::{Complex32, FftPlan, hann_window};

/// Per-frame base features, time-major: one row per analysis frame.
pub(super) struct FrameFeatures {
    pub(super) mfcc: Vec<Vec<f32>>,
    pub(super) mel: Vec<Vec<f32>>,
    pub(super) centroid: Vec<f32>,
}

impl FrameFeatures {
    pub(super) fn len(&self) -> usize {
        self.centroid.len()
    }
}

/// Slide a non-overlapping analysis window over `samples` and compute MFCC,
/// mel energies, and the spectral centroid for every frame from one shared
/// power spectrum. The window is Hann-tapered over `window_len` samples and
/// zero-padded up to the plan's power-of-two transform length; the final
/// partial frame is zero-padded the same way.
pub(super) fn compute_frames(
    samples: &[f32],
    sample_rate: u32,
    window_len: usize,
    mfcc_coeffs: usize,
    bank: &MelBank,
    plan: &FftPlan,
) -> Result<FrameFeatures, String> {
    let window_len = window_len.max(1);
    let hop_len = window_len;
    let window = hann_window(window_len);
    let mut buffer = vec![Complex32::default(); plan.len()];
    let mut frames = FrameFeatures {
        mfcc: Vec::new(),
        mel: Vec::new(),
        centroid: Vec::new(),
    };
    let mut start = 0usize;
    while start < samples.len() {
        fill_windowed(&mut buffer, samples, start, &window);
        plan.process(&mut buffer)?;
        let power = power_spectrum(&buffer);
        let energies = bank.energies(&power);
        frames.mfcc.push(mfcc_from_energies(&energies, mfcc_coeffs));
        frames.mel.push(energies);
        frames
            .centroid
            .push(centroid_hz(&power, sample_rate, plan.len()));
        start = start.saturating_add(hop_len);
    }
    Ok(frames)
}

fn fill_windowed(target: &mut [Complex32], samples: &[f32], start: usize, window: &[f32]) {
    for (i, cell) in target.iter_mut().enumerate() {
        let tapered = match window.get(i) {
            Some(&win) => samples.get(start + i).copied().unwrap_or(0.0) * win,
            // Past the analysis window: transform padding only.
            None => 0.0,
        };
        *cell = Complex32::new(tapered, 0.0);
    }
}

fn power_spectrum(fft: &[Complex32]) -> Vec<f32> {
    let bins = fft.len() / 2 + 1;
    let mut power = Vec::with_capacity(bins);
    for bin in 0..bins {
        let c = fft[bin];
        power.push((c.re * c.re + c.im * c.im).max(0.0));
    }
    power
}

/// Power-weighted mean frequency of one spectrum, in Hz. Zero for a silent
/// frame.
fn centroid_hz(power: &[f32], sample_rate: u32, fft_len: usize) -> f32 {
    let mut sum = 0.0_f64;
    let mut sum_freq = 0.0_f64;
    let sr = sample_rate.max(1) as f64;
    for (bin, &p) in power.iter().enumerate() {
        let p = p.max(0.0) as f64;
        sum += p;
        sum_freq += p * (bin as f64 * sr / fft_len as f64);
    }
    if sum <= 0.0 {
        return 0.0;
    }
    (sum_freq / sum) as f32
}
