//! # Stratum HPSS
//!
//! Streaming harmonic-percussive sound separation (HPSS) and HPSS-based
//! vocal removal for mono audio.
//!
//! ## Features
//!
//! - **Streaming separation**: STFT analysis over a sliding block of frames,
//!   refined in place by an iterative solver, resynthesised by overlap-add
//! - **Mask policies**: Binary (winner takes all) or Wiener (soft ratio)
//! - **Vocal removal**: Two cascaded separations at short and long frame sizes
//! - **Progress and cancellation**: Per-step reports through [`ProgressSink`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use stratum_hpss::{separate_audio, HpssConfig, SeparationParams};
//!
//! // Mono f32 samples
//! let samples: Vec<f32> = vec![0.0; 44100];
//!
//! let result = separate_audio(&samples, &HpssConfig::default(), &SeparationParams::default())?;
//!
//! assert_eq!(result.harmonic.len(), samples.len());
//! assert_eq!(result.percussive.len(), samples.len());
//! # Ok::<(), stratum_hpss::SeparationError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Input stream → Frame analysis → Sliding block → Solver → Mask → Overlap-add → Output streams
//! ```
//!
//! For stream-level control (custom progress sinks, cancellation, reuse of an
//! engine across runs) use [`HpssEngine`] with [`io::SampleStream`] directly.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod progress;
pub mod separation;

// Re-export main types
pub use analysis::metadata::SeparationMetadata;
pub use analysis::result::{SeparationFlag, SeparationResult, VocalRemovalResult};
pub use config::{HpssConfig, SeparationParams, VocalRemovalParams};
pub use error::SeparationError;
pub use progress::{NoProgress, ProgressControl, ProgressInfo, ProgressSink};
pub use separation::{HpssEngine, MaskType, RunStats, VocalRemovalStats};

use io::SampleStream;
use std::time::Instant;

/// Separate a mono signal into harmonic and percussive components
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `config` - Solver configuration (iterations, block size, smoothing)
/// * `params` - Frame size, mask policy and output gain
///
/// # Returns
///
/// `SeparationResult` whose `harmonic` and `percussive` signals have the
/// same length as `samples`
///
/// # Errors
///
/// Returns `SeparationError::InvalidInput` if the configuration or the
/// parameters are invalid.
///
/// # Example
///
/// ```no_run
/// use stratum_hpss::{separate_audio, HpssConfig, MaskType, SeparationParams};
///
/// let samples = vec![0.0f32; 44100 * 5];
/// let params = SeparationParams {
///     mask: MaskType::Binary,
///     ..Default::default()
/// };
/// let result = separate_audio(&samples, &HpssConfig::default(), &params)?;
/// println!("Harmonic share: {:.2}", result.harmonic_energy_share());
/// # Ok::<(), stratum_hpss::SeparationError>(())
/// ```
pub fn separate_audio(
    samples: &[f32],
    config: &HpssConfig,
    params: &SeparationParams,
) -> Result<SeparationResult, SeparationError> {
    let start_time = Instant::now();

    log::debug!(
        "Starting separation: {} samples, frame size {}, {} mask",
        samples.len(),
        params.frame_size,
        params.mask
    );

    let engine = HpssEngine::new(config.clone())?;
    let mut input = SampleStream::from(samples);
    let mut harmonic = SampleStream::with_capacity(samples.len());
    let mut percussive = SampleStream::with_capacity(samples.len());

    let stats = engine.separate(
        params,
        &mut input,
        &mut harmonic,
        &mut percussive,
        ProgressInfo::full(0),
        &mut NoProgress,
    )?;

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
    let metadata = SeparationMetadata::from_passes(
        samples.len(),
        params.mask,
        &[(params.frame_size, stats)],
        processing_time_ms,
    );

    log::debug!("Separation done in {:.1} ms", processing_time_ms);

    Ok(SeparationResult {
        harmonic: harmonic.drain_to_vec(),
        percussive: percussive.drain_to_vec(),
        metadata,
    })
}

/// Split a mono signal into a vocal estimate and everything else
///
/// Runs a short-frame separation followed by a long-frame separation of its
/// harmonic output; see [`separation::vocal_removal`].
///
/// # Errors
///
/// Returns `SeparationError::InvalidInput` if the configuration or the
/// parameters are invalid (including a long frame that is not longer than
/// the short one).
///
/// # Example
///
/// ```no_run
/// use stratum_hpss::{remove_vocals_audio, HpssConfig, VocalRemovalParams};
///
/// let samples = vec![0.0f32; 44100 * 5];
/// let result = remove_vocals_audio(&samples, &HpssConfig::default(), &VocalRemovalParams::default())?;
/// assert_eq!(result.rest.len(), samples.len());
/// # Ok::<(), stratum_hpss::SeparationError>(())
/// ```
pub fn remove_vocals_audio(
    samples: &[f32],
    config: &HpssConfig,
    params: &VocalRemovalParams,
) -> Result<VocalRemovalResult, SeparationError> {
    let start_time = Instant::now();

    log::debug!(
        "Starting vocal removal: {} samples, frame sizes {}/{}",
        samples.len(),
        params.short_frame_size,
        params.long_frame_size
    );

    let engine = HpssEngine::new(config.clone())?;
    let mut input = SampleStream::from(samples);
    let mut vocal = SampleStream::with_capacity(samples.len());
    let mut rest = SampleStream::with_capacity(samples.len());

    let stats = engine.remove_vocals(params, &mut input, &mut vocal, &mut rest, 0, &mut NoProgress)?;

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
    let metadata = SeparationMetadata::from_passes(
        samples.len(),
        params.mask,
        &[
            (params.short_frame_size, stats.short_pass),
            (params.long_frame_size, stats.long_pass),
        ],
        processing_time_ms,
    );

    log::debug!("Vocal removal done in {:.1} ms", processing_time_ms);

    Ok(VocalRemovalResult {
        vocal: vocal.drain_to_vec(),
        rest: rest.drain_to_vec(),
        metadata,
    })
}
