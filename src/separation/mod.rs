//! Harmonic-percussive separation modules
//!
//! Components, leaves first:
//! - Spectral transform (forward/inverse FFT)
//! - Windows and smoothing weights
//! - Frame analysis
//! - Sliding block of frames
//! - Iterative solver
//! - Mask policies
//! - Masked overlap-add synthesis
//! - Streaming driver
//! - Two-pass vocal removal

pub mod block;
pub mod driver;
pub mod frame;
pub mod mask;
pub mod solver;
pub mod synthesis;
pub mod transform;
pub mod vocal_removal;
pub mod window;

pub use driver::{HpssEngine, RunStats};
pub use mask::MaskType;
pub use vocal_removal::VocalRemovalStats;
