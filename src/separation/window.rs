//! Analysis/synthesis windows and smoothing weights
//!
//! Both windows are square roots of a periodic Hamming window, the synthesis
//! one scaled by `1/1.08`. Their product summed at 50 % overlap is exactly 1,
//! so overlap-add reconstructs the input when the mask passes everything.

use std::f64::consts::PI;

/// Sum of two periodic Hamming windows offset by half a period
const HAMMING_OVERLAP_SUM: f64 = 1.08;

/// Immutable per-run vectors derived from the frame size and smoothing constants
#[derive(Debug, Clone)]
pub struct SeparationWindows {
    /// Window applied before the forward transform
    pub analysis: Vec<f32>,
    /// Window applied to the inverse transform before overlap-add
    pub synthesis: Vec<f32>,
    /// Harmonic smoothing weight per bin (`0.25 / (sigma_h^2 + 1)`)
    pub w_h: Vec<f32>,
    /// Percussive smoothing weight per bin (`0.25 / (sigma_p^2 + 1)`)
    pub w_p: Vec<f32>,
}

impl SeparationWindows {
    /// Build windows and weights for one run
    ///
    /// # Arguments
    ///
    /// * `frame_size` - Window length in samples
    /// * `sigma_h` - Harmonic smoothing constant
    /// * `sigma_p` - Percussive smoothing constant
    pub fn new(frame_size: usize, sigma_h: f32, sigma_p: f32) -> Self {
        let mut analysis = Vec::with_capacity(frame_size);
        let mut synthesis = Vec::with_capacity(frame_size);

        for i in 0..frame_size {
            let hamming = 0.54 - 0.46 * (2.0 * PI * i as f64 / frame_size as f64).cos();
            analysis.push(hamming.sqrt() as f32);
            synthesis.push((hamming.sqrt() / HAMMING_OVERLAP_SUM) as f32);
        }

        Self {
            analysis,
            synthesis,
            w_h: vec![smoothing_weight(sigma_h); frame_size],
            w_p: vec![smoothing_weight(sigma_p); frame_size],
        }
    }
}

/// Neighbour weight of the fixed-point update; always below 0.25 for sigma > 0
fn smoothing_weight(sigma: f32) -> f32 {
    let sigma = sigma as f64;
    (0.25 / (sigma * sigma + 1.0)) as f32
}
