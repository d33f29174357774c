use ndarray::Array2;

/// First-order regression delta along the time axis (rows).
///
/// Each output row is the least-squares slope of the surrounding
/// `2 * half_width + 1` rows; frames past either edge are replicated, so a
/// block and its delta always share the same shape.
pub(super) fn regression_delta(block: &Array2<f32>, half_width: usize) -> Array2<f32> {
    let frames = block.nrows();
    let channels = block.ncols();
    let mut out = Array2::zeros((frames, channels));
    if frames == 0 || half_width == 0 {
        return out;
    }
    let norm: f32 = 2.0 * (1..=half_width).map(|n| (n * n) as f32).sum::<f32>();
    for t in 0..frames {
        for c in 0..channels {
            let mut acc = 0.0_f32;
            for n in 1..=half_width {
                let ahead = block[[(t + n).min(frames - 1), c]];
                let behind = block[[t.saturating_sub(n), c]];
                acc += n as f32 * (ahead - behind);
            }
            out[[t, c]] = acc / norm;
        }
    }
    out
}
