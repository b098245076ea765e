//! Progress reporting and cooperative cancellation
//!
//! The driver reports once per step. A sink answers with [`ProgressControl`];
//! `Cancel` makes the driver stop and return [`SeparationError::Cancelled`].
//!
//! [`SeparationError::Cancelled`]: crate::error::SeparationError::Cancelled

/// Answer of a progress sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressControl {
    /// Keep processing
    Continue,
    /// Abort the run
    Cancel,
}

/// Receiver of progress reports
pub trait ProgressSink {
    /// Report `progress` in `[0, 1]` for the track with index `track`
    fn report(&mut self, track: usize, progress: f32) -> ProgressControl;
}

impl<F> ProgressSink for F
where
    F: FnMut(usize, f32) -> ProgressControl,
{
    fn report(&mut self, track: usize, progress: f32) -> ProgressControl {
        self(track, progress)
    }
}

/// Sink that ignores reports and never cancels
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _track: usize, _progress: f32) -> ProgressControl {
        ProgressControl::Continue
    }
}

/// Maps the local progress of one pass into a slice of the global range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressInfo {
    /// Track index passed through to the sink
    pub track: usize,
    /// Global progress at local progress 0
    pub global_start: f32,
    /// Global progress at local progress 1
    pub global_end: f32,
}

impl ProgressInfo {
    /// Range `[global_start, global_end]` for `track`
    pub fn new(track: usize, global_start: f32, global_end: f32) -> Self {
        Self {
            track,
            global_start,
            global_end,
        }
    }

    /// Full range `[0, 1]` for `track`
    pub fn full(track: usize) -> Self {
        Self::new(track, 0.0, 1.0)
    }

    /// Linear map of `local` in `[0, 1]` into the global range
    ///
    /// A finished pass (`local >= 1`) maps exactly onto `global_end`.
    pub fn to_global(&self, local: f32) -> f32 {
        if local >= 1.0 {
            return self.global_end;
        }
        (local * (self.global_end - self.global_start) + self.global_start).min(self.global_end)
    }
}
