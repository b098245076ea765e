//! Result types

use super::metadata::SeparationMetadata;
use serde::{Deserialize, Serialize};

/// Diagnostic flags raised during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeparationFlag {
    /// The input contained NaN samples
    NanInput,
    /// NaN samples were emitted
    NanOutput,
}

/// Harmonic/percussive separation of a sample slice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeparationResult {
    /// Harmonic component, same length as the input
    pub harmonic: Vec<f32>,

    /// Percussive component, same length as the input
    pub percussive: Vec<f32>,

    /// Run metadata
    pub metadata: SeparationMetadata,
}

impl SeparationResult {
    /// Share of output energy in the harmonic component (0.5 for silence)
    pub fn harmonic_energy_share(&self) -> f32 {
        energy_share(&self.harmonic, &self.percussive)
    }
}

/// Vocal removal of a sample slice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocalRemovalResult {
    /// Vocal estimate, same length as the input
    pub vocal: Vec<f32>,

    /// Everything but the vocal estimate, same length as the input
    pub rest: Vec<f32>,

    /// Run metadata
    pub metadata: SeparationMetadata,
}

/// Root mean square of a signal (0 for an empty slice)
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&x| (x as f64) * (x as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}

/// Energy of `a` relative to the energy of `a` and `b` together
fn energy_share(a: &[f32], b: &[f32]) -> f32 {
    let ea: f64 = a.iter().map(|&x| (x as f64) * (x as f64)).sum();
    let eb: f64 = b.iter().map(|&x| (x as f64) * (x as f64)).sum();
    if ea + eb == 0.0 {
        0.5
    } else {
        (ea / (ea + eb)) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms() {
        assert_eq!(rms(&[]), 0.0);
        assert!((rms(&[1.0, -1.0, 1.0, -1.0]) - 1.0).abs() < 1e-7);
        assert!((rms(&[3.0, 4.0]) - (12.5f32).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_energy_share() {
        assert_eq!(energy_share(&[0.0; 4], &[0.0; 4]), 0.5);
        assert!((energy_share(&[1.0, 1.0], &[1.0, 1.0]) - 0.5).abs() < 1e-7);
        assert!((energy_share(&[3.0], &[1.0]) - 0.9).abs() < 1e-6);
    }
}
