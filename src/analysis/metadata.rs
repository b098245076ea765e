//! Run metadata attached to slice-level results

use super::result::SeparationFlag;
use crate::separation::{MaskType, RunStats};
use serde::{Deserialize, Serialize};

/// Metadata of one separation or vocal removal run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparationMetadata {
    /// Crate version that produced the result
    pub algorithm_version: String,

    /// Input length in samples
    pub input_samples: usize,

    /// Frame size of every pass, in order
    pub frame_sizes: Vec<usize>,

    /// Mask policy
    pub mask: MaskType,

    /// Steps executed, summed over passes
    pub steps: u64,

    /// Steps before the first emission, summed over passes
    pub latency_steps: u64,

    /// NaN samples read from the input streams
    pub nan_inputs: u64,

    /// NaN samples emitted
    pub nan_outputs: u64,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Diagnostic flags
    pub flags: Vec<SeparationFlag>,
}

impl SeparationMetadata {
    /// Build metadata from the stats of each pass
    pub(crate) fn from_passes(
        input_samples: usize,
        mask: MaskType,
        passes: &[(usize, RunStats)],
        processing_time_ms: f32,
    ) -> Self {
        let steps = passes.iter().map(|(_, s)| s.steps).sum();
        let latency_steps = passes.iter().map(|(_, s)| s.latency_steps).sum();
        let nan_inputs: u64 = passes.iter().map(|(_, s)| s.nan_inputs).sum();
        let nan_outputs: u64 = passes.iter().map(|(_, s)| s.nan_outputs).sum();

        let mut flags = Vec::new();
        if nan_inputs > 0 {
            flags.push(SeparationFlag::NanInput);
        }
        if nan_outputs > 0 {
            flags.push(SeparationFlag::NanOutput);
        }

        Self {
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            input_samples,
            frame_sizes: passes.iter().map(|(frame_size, _)| *frame_size).collect(),
            mask,
            steps,
            latency_steps,
            nan_inputs,
            nan_outputs,
            processing_time_ms,
            flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_passes_sums_and_flags() {
        let pass = RunStats {
            input_samples: 100,
            emitted: 100,
            steps: 70,
            latency_steps: 61,
            nan_inputs: 0,
            nan_outputs: 2,
        };
        let meta = SeparationMetadata::from_passes(100, MaskType::Binary, &[(512, pass), (8192, pass)], 1.5);

        assert_eq!(meta.frame_sizes, vec![512, 8192]);
        assert_eq!(meta.steps, 140);
        assert_eq!(meta.latency_steps, 122);
        assert_eq!(meta.nan_outputs, 4);
        assert_eq!(meta.flags, vec![SeparationFlag::NanOutput]);
        assert_eq!(meta.algorithm_version, env!("CARGO_PKG_VERSION"));
    }
}
