//! Mask policies
//!
//! Turns the converged harmonic/percussive estimates of a bin into the final
//! magnitudes handed to synthesis:
//! - Binary: the larger component keeps the whole amplitude (ties go to percussive)
//! - Wiener: the amplitude is shared by the ratio of squared components
//!
//! Under both policies the two masked magnitudes add up to the bin amplitude.

use crate::error::SeparationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mask policy applied to the oldest frame of the sliding block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskType {
    /// Hard 0/1 assignment of each bin to one component
    Binary,
    /// Soft assignment proportional to squared component energy
    Wiener,
}

impl MaskType {
    /// Short lowercase identifier ("binary" / "wiener")
    pub fn name(&self) -> &'static str {
        match self {
            MaskType::Binary => "binary",
            MaskType::Wiener => "wiener",
        }
    }
}

impl fmt::Display for MaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MaskType {
    type Err = SeparationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binary" | "binary mask" => Ok(MaskType::Binary),
            "wiener" | "wiener mask" => Ok(MaskType::Wiener),
            other => Err(SeparationError::InvalidInput(format!(
                "Unknown mask type: {:?}",
                other
            ))),
        }
    }
}

impl TryFrom<u32> for MaskType {
    type Error = SeparationError;

    /// Numeric ids as stored by presets: 0 = binary, 1 = wiener
    fn try_from(id: u32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(MaskType::Binary),
            1 => Ok(MaskType::Wiener),
            other => Err(SeparationError::InvalidInput(format!(
                "Unknown mask type id: {}",
                other
            ))),
        }
    }
}

/// Masked magnitudes of one bin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskedBin {
    /// Magnitude assigned to the harmonic stream
    pub harmonic: f32,
    /// Magnitude assigned to the percussive stream
    pub percussive: f32,
}

/// Apply a mask policy to one bin
///
/// # Arguments
///
/// * `mask` - Mask policy
/// * `amplitude` - Bin magnitude of the analysed frame
/// * `harmonic` - Converged harmonic component of the bin
/// * `percussive` - Converged percussive component of the bin
///
/// # Returns
///
/// Harmonic and percussive magnitudes, summing to `amplitude`
pub fn apply_mask(mask: MaskType, amplitude: f32, harmonic: f32, percussive: f32) -> MaskedBin {
    match mask {
        MaskType::Binary => {
            if harmonic > percussive {
                MaskedBin {
                    harmonic: amplitude,
                    percussive: 0.0,
                }
            } else {
                MaskedBin {
                    harmonic: 0.0,
                    percussive: amplitude,
                }
            }
        }
        MaskType::Wiener => {
            let h2 = harmonic * harmonic;
            let energy = h2 + percussive * percussive;
            let ratio = if energy == 0.0 { 0.5 } else { h2 / energy };
            MaskedBin {
                harmonic: ratio * amplitude,
                percussive: (1.0 - ratio) * amplitude,
            }
        }
    }
}
