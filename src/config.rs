//! Configuration parameters for harmonic-percussive separation
//!
//! Two layers:
//! - [`HpssConfig`]: fixed at engine construction (solver sweeps, block length, smoothing)
//! - [`SeparationParams`] / [`VocalRemovalParams`]: chosen per call (frame sizes, mask, gain)
//!
//! Frame sizes are always sample counts here. Hosts that think in milliseconds
//! or in power-of-two exponents convert with [`frame_size_from_ms`] and
//! [`frame_size_from_exponent`].

use crate::error::SeparationError;
use crate::separation::mask::MaskType;
use serde::{Deserialize, Serialize};

/// Largest power-of-two exponent accepted for frame sizes
pub const MAX_FRAME_SIZE_EXPONENT: u32 = 20;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HpssConfig {
    /// Solver sweeps over the sliding block per step (default: 1)
    pub num_iterations: u32,

    /// Sliding block length in frames (default: 60)
    /// Longer blocks smooth harmonics over more time and add latency
    pub block_size: usize,

    /// Percussive smoothing constant (default: 0.5)
    /// Smaller values smooth more strongly along frequency
    pub sigma_p: f32,

    /// Harmonic smoothing constant (default: 0.5)
    /// Smaller values smooth more strongly along time
    pub sigma_h: f32,
}

impl Default for HpssConfig {
    fn default() -> Self {
        Self {
            num_iterations: 1,
            block_size: 60,
            sigma_p: 0.5,
            sigma_h: 0.5,
        }
    }
}

impl HpssConfig {
    /// Check that every field is usable by the solver
    pub fn validate(&self) -> Result<(), SeparationError> {
        if self.num_iterations == 0 {
            return Err(SeparationError::InvalidInput(
                "Number of iterations must be > 0".to_string(),
            ));
        }

        if self.block_size == 0 {
            return Err(SeparationError::InvalidInput(
                "Block size must be > 0".to_string(),
            ));
        }

        for (name, sigma) in [("sigma_p", self.sigma_p), ("sigma_h", self.sigma_h)] {
            if !sigma.is_finite() {
                return Err(SeparationError::NumericalError(format!(
                    "{} must be finite, got {}",
                    name, sigma
                )));
            }
            if sigma <= 0.0 {
                return Err(SeparationError::InvalidInput(format!(
                    "{} must be > 0, got {}",
                    name, sigma
                )));
            }
        }

        Ok(())
    }
}

/// Per-call parameters of a single separation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparationParams {
    /// Analysis window length in samples (default: 512, must be even)
    pub frame_size: usize,

    /// Mask policy (default: Wiener)
    pub mask: MaskType,

    /// Multiplier applied to every emitted sample (default: 0.8)
    pub gain: f32,
}

impl Default for SeparationParams {
    fn default() -> Self {
        Self {
            // 15 ms at 44.1 kHz, snapped to the nearest power of two
            frame_size: 512,
            mask: MaskType::Wiener,
            gain: 0.8,
        }
    }
}

impl SeparationParams {
    /// Check frame size and gain
    pub fn validate(&self) -> Result<(), SeparationError> {
        validate_frame_size(self.frame_size)?;
        validate_gain(self.gain)
    }
}

/// Per-call parameters of the two-pass vocal removal cascade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocalRemovalParams {
    /// Frame size of the first pass in samples (default: 512)
    pub short_frame_size: usize,

    /// Frame size of the second pass in samples (default: 8192)
    pub long_frame_size: usize,

    /// Mask policy used by both passes (default: Wiener)
    pub mask: MaskType,

    /// Multiplier applied by both passes (default: 0.8)
    pub gain: f32,
}

impl Default for VocalRemovalParams {
    fn default() -> Self {
        Self {
            short_frame_size: 1 << 9,
            long_frame_size: 1 << 13,
            mask: MaskType::Wiener,
            gain: 0.8,
        }
    }
}

impl VocalRemovalParams {
    /// Check both frame sizes, their ordering and the gain
    pub fn validate(&self) -> Result<(), SeparationError> {
        validate_frame_size(self.short_frame_size)?;
        validate_frame_size(self.long_frame_size)?;

        if self.long_frame_size <= self.short_frame_size {
            return Err(SeparationError::InvalidInput(format!(
                "Long frame size ({}) should be longer than the short one ({})",
                self.long_frame_size, self.short_frame_size
            )));
        }

        validate_gain(self.gain)
    }

    /// Parameters of the first (short frame) pass
    pub fn short_pass(&self) -> SeparationParams {
        SeparationParams {
            frame_size: self.short_frame_size,
            mask: self.mask,
            gain: self.gain,
        }
    }

    /// Parameters of the second (long frame) pass
    pub fn long_pass(&self) -> SeparationParams {
        SeparationParams {
            frame_size: self.long_frame_size,
            mask: self.mask,
            gain: self.gain,
        }
    }
}

fn validate_frame_size(frame_size: usize) -> Result<(), SeparationError> {
    if frame_size < 2 || frame_size % 2 != 0 {
        return Err(SeparationError::InvalidInput(format!(
            "Frame size must be even and >= 2, got {}",
            frame_size
        )));
    }
    Ok(())
}

fn validate_gain(gain: f32) -> Result<(), SeparationError> {
    if !gain.is_finite() {
        return Err(SeparationError::NumericalError(format!(
            "Gain must be finite, got {}",
            gain
        )));
    }
    Ok(())
}

/// Convert a frame length in milliseconds to the nearest power-of-two sample count
///
/// Candidates are `2, 4, ..., 2^29`; on a tie the smaller candidate wins.
///
/// # Errors
///
/// Returns `SeparationError::InvalidInput` if the sample rate is not positive
/// or the duration rounds to zero samples.
///
/// # Example
///
/// ```
/// use stratum_hpss::config::frame_size_from_ms;
///
/// assert_eq!(frame_size_from_ms(15, 44100.0)?, 512);
/// assert_eq!(frame_size_from_ms(100, 48000.0)?, 4096);
/// # Ok::<(), stratum_hpss::SeparationError>(())
/// ```
pub fn frame_size_from_ms(frame_ms: u32, sample_rate: f64) -> Result<usize, SeparationError> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(SeparationError::InvalidInput(format!(
            "Invalid sample rate: {}",
            sample_rate
        )));
    }

    let desired = (frame_ms as f64 / 1000.0 * sample_rate).round() as i64;
    let mut closest: i64 = 0;
    let mut candidate: i64 = 2;
    while candidate < 1 << 30 {
        if (candidate - desired).abs() < (closest - desired).abs() {
            closest = candidate;
        }
        candidate *= 2;
    }

    if closest == 0 {
        return Err(SeparationError::InvalidInput(format!(
            "{} ms at {} Hz is shorter than one sample pair",
            frame_ms, sample_rate
        )));
    }

    Ok(closest as usize)
}

/// Convert a frame length in samples to rounded milliseconds
pub fn frame_size_to_ms(frame_size: usize, sample_rate: f64) -> Result<u32, SeparationError> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(SeparationError::InvalidInput(format!(
            "Invalid sample rate: {}",
            sample_rate
        )));
    }
    Ok((frame_size as f64 / sample_rate * 1000.0).round() as u32)
}

/// Frame size `2^exponent` for exponents in `1..=20`
pub fn frame_size_from_exponent(exponent: u32) -> Result<usize, SeparationError> {
    if exponent == 0 || exponent > MAX_FRAME_SIZE_EXPONENT {
        return Err(SeparationError::InvalidInput(format!(
            "Frame size exponent must be in 1..={}, got {}",
            MAX_FRAME_SIZE_EXPONENT, exponent
        )));
    }
    Ok(1usize << exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(HpssConfig::default().validate().is_ok());
        assert!(SeparationParams::default().validate().is_ok());
        assert!(VocalRemovalParams::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_engine_config() {
        let mut config = HpssConfig::default();
        config.block_size = 0;
        assert!(config.validate().is_err());

        let mut config = HpssConfig::default();
        config.num_iterations = 0;
        assert!(config.validate().is_err());

        let mut config = HpssConfig::default();
        config.sigma_h = -1.0;
        assert!(config.validate().is_err());

        let mut config = HpssConfig::default();
        config.sigma_p = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(SeparationError::NumericalError(_))
        ));
    }

    #[test]
    fn test_odd_frame_size_rejected() {
        let params = SeparationParams {
            frame_size: 511,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = SeparationParams {
            frame_size: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_vocal_removal_requires_longer_second_pass() {
        let params = VocalRemovalParams {
            short_frame_size: 4096,
            long_frame_size: 1024,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = VocalRemovalParams {
            short_frame_size: 1024,
            long_frame_size: 1024,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_frame_size_conversions() {
        assert_eq!(frame_size_from_ms(15, 44100.0).unwrap(), 512);
        assert_eq!(frame_size_from_ms(50, 44100.0).unwrap(), 2048);
        assert!(frame_size_from_ms(0, 44100.0).is_err());
        assert!(frame_size_from_ms(15, 0.0).is_err());

        assert_eq!(frame_size_to_ms(4410, 44100.0).unwrap(), 100);

        assert_eq!(frame_size_from_exponent(9).unwrap(), 512);
        assert_eq!(frame_size_from_exponent(13).unwrap(), 8192);
        assert!(frame_size_from_exponent(0).is_err());
        assert!(frame_size_from_exponent(21).is_err());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let params = VocalRemovalParams::default();
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"wiener\""));
        let back: VocalRemovalParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
