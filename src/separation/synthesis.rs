//! Masking and overlap-add synthesis
//!
//! The oldest frame of the block is masked bin by bin, each masked magnitude
//! is recombined with the stored unit phase, and both spectra are inverse
//! transformed and overlap-added into per-stream accumulators. Only the
//! positive-frequency bins are filled, so the real part of the inverse carries
//! half the signal; the accumulation scale of 2 restores it.

use super::frame::Frame;
use super::mask::{apply_mask, MaskType};
use super::transform::SpectralTransform;
use crate::error::SeparationError;
use crate::io::{SampleStream, TimeBuffer};
use rustfft::num_complex::Complex;

/// Scale applied when adding an inverse-transformed frame to its accumulator
pub const OVERLAP_ADD_SCALE: f32 = 2.0;

/// Masked spectra, inverse transform and overlap-add state of one run
#[derive(Debug)]
pub struct Synthesizer {
    shift: usize,
    transform: SpectralTransform,
    harmonic_spectrum: Vec<Complex<f32>>,
    percussive_spectrum: Vec<Complex<f32>>,
    time_frame: Vec<f32>,
    harmonic_acc: TimeBuffer,
    percussive_acc: TimeBuffer,
    nan_outputs: u64,
}

impl Synthesizer {
    /// Synthesizer for `frame_size`-sample frames advancing by `frame_size / 2`
    pub fn new(frame_size: usize) -> Result<Self, SeparationError> {
        Ok(Self {
            shift: frame_size / 2,
            transform: SpectralTransform::new(frame_size)?,
            harmonic_spectrum: vec![Complex::new(0.0, 0.0); frame_size],
            percussive_spectrum: vec![Complex::new(0.0, 0.0); frame_size],
            time_frame: vec![0.0; frame_size],
            harmonic_acc: TimeBuffer::new(frame_size),
            percussive_acc: TimeBuffer::new(frame_size),
            nan_outputs: 0,
        })
    }

    /// Finished samples emitted with a NaN value so far
    pub fn nan_outputs(&self) -> u64 {
        self.nan_outputs
    }

    /// Mask `frame` and overlap-add both components into the accumulators
    pub fn synthesize(&mut self, frame: &Frame, mask: MaskType, window: &[f32]) {
        self.harmonic_spectrum.fill(Complex::new(0.0, 0.0));
        self.percussive_spectrum.fill(Complex::new(0.0, 0.0));

        for h in frame.active_bins() {
            let masked = apply_mask(
                mask,
                frame.amplitudes[h],
                frame.harmonic[h],
                frame.percussive[h],
            );
            let (cos, sin) = (frame.cos_phases[h], frame.sin_phases[h]);
            self.harmonic_spectrum[h] = Complex::new(masked.harmonic * cos, masked.harmonic * sin);
            self.percussive_spectrum[h] =
                Complex::new(masked.percussive * cos, masked.percussive * sin);
        }

        self.transform
            .inverse(&mut self.harmonic_spectrum, &mut self.time_frame);
        self.harmonic_acc
            .accumulate(&self.time_frame, window, OVERLAP_ADD_SCALE);

        self.transform
            .inverse(&mut self.percussive_spectrum, &mut self.time_frame);
        self.percussive_acc
            .accumulate(&self.time_frame, window, OVERLAP_ADD_SCALE);
    }

    /// Rotate one hop of finished samples out of both accumulators
    ///
    /// The first `count` finished samples (at most one hop) are scaled by
    /// `gain` and pushed to the output streams; the rest of the hop is
    /// discarded. `position` is the output index of the first pushed sample,
    /// used for diagnostics only.
    pub fn emit(
        &mut self,
        count: usize,
        gain: f32,
        position: u64,
        harmonic_out: &mut SampleStream,
        percussive_out: &mut SampleStream,
    ) {
        let count = count.min(self.shift);
        let nan_outputs = &mut self.nan_outputs;

        for (acc, out) in [
            (&mut self.harmonic_acc, &mut *harmonic_out),
            (&mut self.percussive_acc, &mut *percussive_out),
        ] {
            let mut index = 0usize;
            acc.shift_out(self.shift, |sample| {
                if index < count {
                    if sample.is_nan() {
                        log::warn!("Outputting NaN at position {}", position + index as u64);
                        *nan_outputs += 1;
                    }
                    out.push(sample * gain);
                }
                index += 1;
            });
        }
    }
}
