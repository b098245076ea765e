//! Streaming separation driver
//!
//! One call runs a complete separation pass over a sample stream:
//!
//! 1. Pull one hop (`frame_size / 2` samples, silence once the input is exhausted)
//! 2. Analyse the updated window into a new frame and push it into the block
//! 3. Sweep the solver over the block interior
//! 4. Mask the oldest frame and overlap-add both components
//! 5. Emit one finished hop per stream once the pipeline is primed
//! 6. Report progress (the sink may cancel)
//!
//! # Latency
//!
//! A frame needs `block_size - 1` steps to travel from the newest to the
//! oldest block position, where it is synthesised. The analysis buffer starts
//! with one hop of silence, so the first input hop is complete only after the
//! second overlapping frame has been added: `OVERLAP` more steps. Emission
//! therefore starts at step `block_size - 1 + OVERLAP`, and the driver feeds
//! silence for that many steps past the end of the input to flush the block.
//!
//! # Example
//!
//! ```
//! use stratum_hpss::io::SampleStream;
//! use stratum_hpss::progress::{NoProgress, ProgressInfo};
//! use stratum_hpss::{HpssConfig, HpssEngine, SeparationParams};
//!
//! let engine = HpssEngine::new(HpssConfig::default())?;
//! let mut input = SampleStream::from(vec![0.0f32; 4096]);
//! let mut harmonic = SampleStream::new();
//! let mut percussive = SampleStream::new();
//!
//! engine.separate(
//!     &SeparationParams::default(),
//!     &mut input,
//!     &mut harmonic,
//!     &mut percussive,
//!     ProgressInfo::full(0),
//!     &mut NoProgress,
//! )?;
//! assert_eq!(harmonic.len(), 4096);
//! assert_eq!(percussive.len(), 4096);
//! # Ok::<(), stratum_hpss::SeparationError>(())
//! ```

use super::block::SlidingBlock;
use super::frame::FrameAnalyzer;
use super::mask::MaskType;
use super::solver::solve_block;
use super::synthesis::Synthesizer;
use super::window::SeparationWindows;
use crate::config::{HpssConfig, SeparationParams};
use crate::error::SeparationError;
use crate::io::SampleStream;
use crate::progress::{ProgressControl, ProgressInfo, ProgressSink};

/// Frames overlapping each output sample (`frame_size / shift`)
pub const OVERLAP: usize = 2;

/// Counters of one finished pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Input samples present when the pass started
    pub input_samples: u64,
    /// Samples emitted on each output stream
    pub emitted: u64,
    /// Analysis/synthesis steps executed
    pub steps: u64,
    /// Steps before the first emission
    pub latency_steps: u64,
    /// NaN samples read from the input
    pub nan_inputs: u64,
    /// NaN samples emitted (both streams)
    pub nan_outputs: u64,
}

/// Immutable values derived once at the start of a pass
#[derive(Debug, Clone)]
struct RunContext {
    frame_size: usize,
    shift: usize,
    mask: MaskType,
    gain: f32,
    latency_steps: u64,
    windows: SeparationWindows,
}

impl RunContext {
    fn new(config: &HpssConfig, params: &SeparationParams) -> Self {
        Self {
            frame_size: params.frame_size,
            shift: params.frame_size / OVERLAP,
            mask: params.mask,
            gain: params.gain,
            latency_steps: latency_steps(config.block_size),
            windows: SeparationWindows::new(params.frame_size, config.sigma_h, config.sigma_p),
        }
    }
}

/// Steps before the first finished sample leaves a block of `block_size` frames
pub fn latency_steps(block_size: usize) -> u64 {
    (block_size as u64).saturating_sub(1) + OVERLAP as u64
}

/// Harmonic-percussive separation engine
///
/// Holds only the immutable solver configuration; every pass builds its own
/// windows, block and buffers, so one engine can run any number of passes.
#[derive(Debug, Clone)]
pub struct HpssEngine {
    config: HpssConfig,
}

impl HpssEngine {
    /// Create an engine
    ///
    /// # Errors
    ///
    /// Returns `SeparationError` if the configuration fails validation.
    pub fn new(config: HpssConfig) -> Result<Self, SeparationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Solver configuration
    pub fn config(&self) -> &HpssConfig {
        &self.config
    }

    /// Separate `input` into harmonic and percussive streams
    ///
    /// Consumes every queued input sample and appends exactly as many samples
    /// to each output stream.
    ///
    /// # Arguments
    ///
    /// * `params` - Frame size, mask policy and output gain
    /// * `input` - Input stream; its length is captured before consumption
    /// * `harmonic_out` - Receives the harmonic component
    /// * `percussive_out` - Receives the percussive component
    /// * `progress` - Maps this pass onto the global progress range
    /// * `sink` - Progress receiver, checked for cancellation after every step
    ///
    /// # Errors
    ///
    /// - `SeparationError::InvalidInput` if the parameters are invalid
    /// - `SeparationError::Cancelled` if the sink cancels; outputs may then
    ///   hold a partial prefix
    pub fn separate(
        &self,
        params: &SeparationParams,
        input: &mut SampleStream,
        harmonic_out: &mut SampleStream,
        percussive_out: &mut SampleStream,
        progress: ProgressInfo,
        sink: &mut dyn ProgressSink,
    ) -> Result<RunStats, SeparationError> {
        params.validate()?;

        let ctx = RunContext::new(&self.config, params);
        let input_len = input.len() as u64;

        log::debug!(
            "Processing signal ({} samples): frame={}, shift={}, mask={}, block={}, iterations={}",
            input_len,
            ctx.frame_size,
            ctx.shift,
            ctx.mask,
            self.config.block_size,
            self.config.num_iterations
        );

        let mut analyzer = FrameAnalyzer::new(ctx.frame_size)?;
        let mut synthesizer = Synthesizer::new(ctx.frame_size)?;
        let mut block = SlidingBlock::new(self.config.block_size, ctx.frame_size);

        let mut emitted: u64 = 0;

        if input_len == 0
            && sink.report(progress.track, progress.to_global(1.0)) == ProgressControl::Cancel
        {
            return Err(SeparationError::Cancelled);
        }

        while emitted < input_len {
            block.advance(|frame| analyzer.analyze(input, &ctx.windows.analysis, frame));

            solve_block(
                block.frames_mut(),
                &ctx.windows.w_h,
                &ctx.windows.w_p,
                self.config.num_iterations,
            );

            if let Some(oldest) = block.oldest() {
                synthesizer.synthesize(oldest, ctx.mask, &ctx.windows.synthesis);
            }

            let count = if block.steps() >= ctx.latency_steps {
                (ctx.shift as u64).min(input_len - emitted) as usize
            } else {
                0
            };
            synthesizer.emit(count, ctx.gain, emitted, harmonic_out, percussive_out);
            emitted += count as u64;

            let local = emitted as f32 / input_len as f32;
            if sink.report(progress.track, progress.to_global(local)) == ProgressControl::Cancel {
                log::debug!(
                    "Separation cancelled after {} steps ({} of {} samples emitted)",
                    block.steps(),
                    emitted,
                    input_len
                );
                return Err(SeparationError::Cancelled);
            }
        }

        let stats = RunStats {
            input_samples: input_len,
            emitted,
            steps: block.steps(),
            latency_steps: ctx.latency_steps,
            nan_inputs: analyzer.nan_inputs(),
            nan_outputs: synthesizer.nan_outputs(),
        };

        log::debug!(
            "Separation finished: {} steps, {} samples per stream, {} input consumed",
            stats.steps,
            stats.emitted,
            analyzer.consumed()
        );

        Ok(stats)
    }
}
