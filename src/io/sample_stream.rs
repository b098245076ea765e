//! FIFO sample streams connecting the host to the engine

use std::collections::VecDeque;

/// Unbounded first-in first-out queue of samples
///
/// The engine reads input streams strictly front to back and appends to
/// output streams; a read from an empty stream yields silence.
#[derive(Debug, Clone, Default)]
pub struct SampleStream {
    /// Queued samples
    data: VecDeque<f32>,
    /// Samples pushed since creation
    enqueued: u64,
}

impl SampleStream {
    /// Create an empty stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stream with room for `capacity` samples
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: VecDeque::with_capacity(capacity),
            enqueued: 0,
        }
    }

    /// Append one sample
    pub fn push(&mut self, sample: f32) {
        self.data.push_back(sample);
        self.enqueued += 1;
    }

    /// Append a slice of samples
    pub fn push_slice(&mut self, samples: &[f32]) {
        self.data.extend(samples.iter().copied());
        self.enqueued += samples.len() as u64;
    }

    /// Remove and return the oldest sample
    pub fn pop(&mut self) -> Option<f32> {
        self.data.pop_front()
    }

    /// Remove the oldest sample, or return `0.0` if the stream is exhausted
    pub fn pop_or_silence(&mut self) -> f32 {
        self.data.pop_front().unwrap_or(0.0)
    }

    /// Number of samples currently queued
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if no samples are queued
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Total number of samples pushed since the stream was created
    pub fn total_enqueued(&self) -> u64 {
        self.enqueued
    }

    /// Drain every queued sample into a vector
    pub fn drain_to_vec(&mut self) -> Vec<f32> {
        self.data.drain(..).collect()
    }
}

impl From<&[f32]> for SampleStream {
    fn from(samples: &[f32]) -> Self {
        let mut stream = Self::with_capacity(samples.len());
        stream.push_slice(samples);
        stream
    }
}

impl From<Vec<f32>> for SampleStream {
    fn from(samples: Vec<f32>) -> Self {
        let enqueued = samples.len() as u64;
        Self {
            data: VecDeque::from(samples),
            enqueued,
        }
    }
}
