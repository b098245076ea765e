//! Fixed-size forward/inverse DFT adapter
//!
//! A plain complex FFT over zero-imaginary input. The inverse applies the
//! `1/N` normalisation so that `inverse(forward(x)) == x`.

use crate::error::SeparationError;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Matched forward/inverse transform pair of one size
pub struct SpectralTransform {
    size: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl std::fmt::Debug for SpectralTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectralTransform")
            .field("size", &self.size)
            .finish()
    }
}

impl SpectralTransform {
    /// Plan forward and inverse transforms of `size` points
    ///
    /// # Errors
    ///
    /// Returns `SeparationError::InvalidInput` if `size` is zero or odd.
    pub fn new(size: usize) -> Result<Self, SeparationError> {
        if size == 0 || size % 2 != 0 {
            return Err(SeparationError::InvalidInput(format!(
                "Transform size must be even and > 0, got {}",
                size
            )));
        }

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Ok(Self {
            size,
            forward,
            inverse,
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
        })
    }

    /// Transform size in points
    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform of a real signal into `spectrum` (unnormalised)
    pub fn forward(&mut self, input: &[f32], spectrum: &mut [Complex<f32>]) {
        debug_assert_eq!(input.len(), self.size);
        debug_assert_eq!(spectrum.len(), self.size);

        for (bin, &x) in spectrum.iter_mut().zip(input) {
            *bin = Complex::new(x, 0.0);
        }
        self.forward
            .process_with_scratch(spectrum, &mut self.scratch);
    }

    /// Inverse transform of `spectrum` into the real part `output`
    ///
    /// `spectrum` is used as the work buffer and is overwritten.
    pub fn inverse(&mut self, spectrum: &mut [Complex<f32>], output: &mut [f32]) {
        debug_assert_eq!(spectrum.len(), self.size);
        debug_assert_eq!(output.len(), self.size);

        self.inverse
            .process_with_scratch(spectrum, &mut self.scratch);
        let norm = 1.0 / self.size as f32;
        for (out, bin) in output.iter_mut().zip(spectrum.iter()) {
            *out = bin.re * norm;
        }
    }
}
