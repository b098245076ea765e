//! HPSS-based vocal removal
//!
//! Two cascaded separations with different resolutions:
//!
//! 1. Short frames: input -> intermediate (harmonic side) + really percussive
//! 2. Long frames: intermediate -> really harmonic + vocal (percussive side)
//!
//! Voice is harmonic at short time scales and percussive-like (fluctuating
//! pitch, vibrato) at long ones, so it survives pass 1 on the harmonic side
//! and leaves pass 2 on the percussive side. The non-vocal rest is
//! `really harmonic + really percussive`.
//!
//! The output gain is applied by both passes.

use super::driver::{HpssEngine, RunStats};
use crate::config::VocalRemovalParams;
use crate::error::SeparationError;
use crate::io::SampleStream;
use crate::progress::{ProgressInfo, ProgressSink};

/// Global progress at which the second pass starts
pub const FIRST_PASS_PROGRESS_SHARE: f32 = 0.4;

/// Counters of both passes of a vocal removal run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VocalRemovalStats {
    /// Short-frame pass
    pub short_pass: RunStats,
    /// Long-frame pass
    pub long_pass: RunStats,
    /// Samples written to the rest stream
    pub rest_samples: u64,
}

impl HpssEngine {
    /// Split `input` into a vocal stream and a non-vocal rest stream
    ///
    /// # Arguments
    ///
    /// * `params` - Short/long frame sizes, mask policy and gain
    /// * `input` - Input stream
    /// * `vocal_out` - Receives the vocal estimate
    /// * `rest_out` - Receives everything else
    /// * `track` - Track index forwarded to the progress sink
    /// * `sink` - Progress receiver; pass 1 covers `[0, 0.4]`, pass 2 `[0.4, 1]`
    ///
    /// # Errors
    ///
    /// - `SeparationError::InvalidInput` if the long frame is not longer than
    ///   the short one, or either frame size is invalid
    /// - `SeparationError::Cancelled` if the sink cancels during either pass
    pub fn remove_vocals(
        &self,
        params: &VocalRemovalParams,
        input: &mut SampleStream,
        vocal_out: &mut SampleStream,
        rest_out: &mut SampleStream,
        track: usize,
        sink: &mut dyn ProgressSink,
    ) -> Result<VocalRemovalStats, SeparationError> {
        params.validate()?;

        let capacity = input.len();
        let mut intermediate = SampleStream::with_capacity(capacity);
        let mut really_percussive = SampleStream::with_capacity(capacity);
        let mut really_harmonic = SampleStream::with_capacity(capacity);

        let short_pass = self.separate(
            &params.short_pass(),
            input,
            &mut intermediate,
            &mut really_percussive,
            ProgressInfo::new(track, 0.0, FIRST_PASS_PROGRESS_SHARE),
            sink,
        )?;

        let long_pass = self.separate(
            &params.long_pass(),
            &mut intermediate,
            &mut really_harmonic,
            vocal_out,
            ProgressInfo::new(track, FIRST_PASS_PROGRESS_SHARE, 1.0),
            sink,
        )?;

        log::debug!(
            "Really harmonic length: {}, really percussive length: {}",
            really_harmonic.len(),
            really_percussive.len()
        );

        let mut rest_samples = 0u64;
        while !really_harmonic.is_empty() || !really_percussive.is_empty() {
            rest_out.push(really_harmonic.pop_or_silence() + really_percussive.pop_or_silence());
            rest_samples += 1;
        }

        Ok(VocalRemovalStats {
            short_pass,
            long_pass,
            rest_samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HpssConfig;
    use crate::progress::{NoProgress, ProgressControl};

    fn engine() -> HpssEngine {
        HpssEngine::new(HpssConfig {
            block_size: 6,
            ..Default::default()
        })
        .unwrap()
    }

    fn params() -> VocalRemovalParams {
        VocalRemovalParams {
            short_frame_size: 32,
            long_frame_size: 128,
            gain: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_outputs_match_input_length() {
        let samples: Vec<f32> = (0..1500).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut input = SampleStream::from(samples);
        let mut vocal = SampleStream::new();
        let mut rest = SampleStream::new();

        let stats = engine()
            .remove_vocals(&params(), &mut input, &mut vocal, &mut rest, 0, &mut NoProgress)
            .unwrap();

        assert_eq!(vocal.len(), 1500);
        assert_eq!(rest.len(), 1500);
        assert_eq!(stats.rest_samples, 1500);
        assert_eq!(stats.short_pass.emitted, 1500);
        assert_eq!(stats.long_pass.emitted, 1500);
    }

    #[test]
    fn test_rejects_long_not_longer_than_short() {
        let mut input = SampleStream::from(vec![0.1f32; 100]);
        let mut vocal = SampleStream::new();
        let mut rest = SampleStream::new();
        let bad = VocalRemovalParams {
            short_frame_size: 128,
            long_frame_size: 32,
            ..params()
        };

        let result = engine().remove_vocals(&bad, &mut input, &mut vocal, &mut rest, 0, &mut NoProgress);
        assert!(matches!(result, Err(SeparationError::InvalidInput(_))));
        assert!(vocal.is_empty());
        assert!(rest.is_empty());
    }

    #[test]
    fn test_progress_spans_both_passes() {
        let mut input = SampleStream::from(vec![0.2f32; 800]);
        let mut vocal = SampleStream::new();
        let mut rest = SampleStream::new();
        let mut reports = Vec::new();
        let mut sink = |track: usize, p: f32| {
            assert_eq!(track, 3);
            reports.push(p);
            ProgressControl::Continue
        };

        engine()
            .remove_vocals(&params(), &mut input, &mut vocal, &mut rest, 3, &mut sink)
            .unwrap();

        assert!(reports.windows(2).all(|w| w[0] <= w[1]));
        assert!(reports.iter().any(|&p| p == FIRST_PASS_PROGRESS_SHARE));
        assert_eq!(reports.last().copied(), Some(1.0));
    }

    #[test]
    fn test_cancel_in_first_pass_aborts_cascade() {
        let mut input = SampleStream::from(vec![0.2f32; 800]);
        let mut vocal = SampleStream::new();
        let mut rest = SampleStream::new();
        let mut calls = 0;
        let mut sink = |_track: usize, _p: f32| {
            calls += 1;
            if calls >= 3 {
                ProgressControl::Cancel
            } else {
                ProgressControl::Continue
            }
        };

        let result = engine().remove_vocals(&params(), &mut input, &mut vocal, &mut rest, 0, &mut sink);
        assert_eq!(result, Err(SeparationError::Cancelled));
        assert!(vocal.is_empty());
        assert!(rest.is_empty());
    }
}
