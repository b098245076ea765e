//! Result aggregation for the slice-level API
//!
//! - Result types
//! - Run metadata

pub mod metadata;
pub mod result;
