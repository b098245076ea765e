//! Error types for the separation engine

use std::fmt;

/// Errors that can occur during harmonic-percussive separation
#[derive(Debug, Clone, PartialEq)]
pub enum SeparationError {
    /// Invalid input parameters (frame size, block size, mask id, ...)
    InvalidInput(String),

    /// Numerical error (non-finite configuration values, etc.)
    NumericalError(String),

    /// The progress sink asked the run to stop
    Cancelled,
}

impl fmt::Display for SeparationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeparationError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            SeparationError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            SeparationError::Cancelled => write!(f, "Separation cancelled"),
        }
    }
}

impl std::error::Error for SeparationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SeparationError::InvalidInput("frame size must be even".to_string());
        assert_eq!(err.to_string(), "Invalid input: frame size must be even");
        assert_eq!(SeparationError::Cancelled.to_string(), "Separation cancelled");
    }
}
