//! Spectral frames and the frame analyzer
//!
//! A frame holds, per bin `0..=frame_size/2`, the magnitude, the unit phase
//! and the harmonic/percussive estimates the solver refines. Only bins
//! `1..frame_size/2` are ever written; DC and Nyquist stay zero.

use super::transform::SpectralTransform;
use crate::error::SeparationError;
use crate::io::{SampleStream, TimeBuffer};
use rustfft::num_complex::Complex;
use std::f32::consts::SQRT_2;

/// Spectral analysis of one windowed block
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Bin magnitudes
    pub amplitudes: Vec<f32>,
    /// Real part of the unit phase (0 for silent bins)
    pub cos_phases: Vec<f32>,
    /// Imaginary part of the unit phase (0 for silent bins)
    pub sin_phases: Vec<f32>,
    /// Harmonic component estimate
    pub harmonic: Vec<f32>,
    /// Percussive component estimate
    pub percussive: Vec<f32>,
}

impl Frame {
    /// Silent frame for a given frame size (`frame_size / 2 + 1` bins)
    pub fn new(frame_size: usize) -> Self {
        let bins = frame_size / 2 + 1;
        Self {
            amplitudes: vec![0.0; bins],
            cos_phases: vec![0.0; bins],
            sin_phases: vec![0.0; bins],
            harmonic: vec![0.0; bins],
            percussive: vec![0.0; bins],
        }
    }

    /// Number of stored bins, DC and Nyquist included
    pub fn num_bins(&self) -> usize {
        self.amplitudes.len()
    }

    /// Range of bins the analyzer, solver and mask operate on
    pub fn active_bins(&self) -> std::ops::Range<usize> {
        1..self.num_bins().saturating_sub(1)
    }

    /// Overwrite the active bins from a complex spectrum and seed an even split
    pub fn set_from_spectrum(&mut self, spectrum: &[Complex<f32>]) {
        for h in self.active_bins() {
            let amplitude = spectrum[h].norm();
            self.amplitudes[h] = amplitude;
            if amplitude == 0.0 {
                self.cos_phases[h] = 0.0;
                self.sin_phases[h] = 0.0;
            } else {
                self.cos_phases[h] = spectrum[h].re / amplitude;
                self.sin_phases[h] = spectrum[h].im / amplitude;
            }
            // Equal energy on both sides: h^2 + p^2 == amplitude^2
            self.harmonic[h] = amplitude / SQRT_2;
            self.percussive[h] = amplitude / SQRT_2;
        }
    }
}

/// Rolling analysis window feeding the forward transform
#[derive(Debug)]
pub struct FrameAnalyzer {
    shift: usize,
    buffer: TimeBuffer,
    windowed: Vec<f32>,
    spectrum: Vec<Complex<f32>>,
    transform: SpectralTransform,
    consumed: u64,
    nan_inputs: u64,
}

impl FrameAnalyzer {
    /// Analyzer for `frame_size`-sample frames advancing by `frame_size / 2`
    pub fn new(frame_size: usize) -> Result<Self, SeparationError> {
        Ok(Self {
            shift: frame_size / 2,
            buffer: TimeBuffer::new(frame_size),
            windowed: vec![0.0; frame_size],
            spectrum: vec![Complex::new(0.0, 0.0); frame_size],
            transform: SpectralTransform::new(frame_size)?,
            consumed: 0,
            nan_inputs: 0,
        })
    }

    /// Input samples pulled so far (silence padding included)
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// NaN samples seen on the input
    pub fn nan_inputs(&self) -> u64 {
        self.nan_inputs
    }

    /// Pull one hop from `input` and analyse the updated window into `frame`
    ///
    /// Missing input is read as silence.
    pub fn analyze(&mut self, input: &mut SampleStream, window: &[f32], frame: &mut Frame) {
        let consumed = &mut self.consumed;
        let nan_inputs = &mut self.nan_inputs;
        self.buffer.shift_in(self.shift, || {
            let sample = input.pop_or_silence();
            if sample.is_nan() {
                log::warn!("Invalid sample in input at position {}", *consumed);
                *nan_inputs += 1;
            }
            *consumed += 1;
            sample
        });

        for ((out, &x), &w) in self
            .windowed
            .iter_mut()
            .zip(self.buffer.as_slice())
            .zip(window)
        {
            *out = x * w;
        }

        self.transform.forward(&self.windowed, &mut self.spectrum);
        frame.set_from_spectrum(&self.spectrum);
    }
}
