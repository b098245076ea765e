//! Fixed-length rolling sample buffer
//!
//! Used both as the analysis window (samples shift in at the tail) and as the
//! overlap-add accumulator (finished samples shift out at the head). The
//! length never changes after construction.

/// Rolling buffer of `frame_size` samples
#[derive(Debug, Clone)]
pub struct TimeBuffer {
    data: Vec<f32>,
}

impl TimeBuffer {
    /// Create a zero-filled buffer
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    /// Buffer length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for a zero-length buffer
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current contents, oldest first
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Drop the oldest `count` samples and append `count` samples from `next`
    pub fn shift_in<F: FnMut() -> f32>(&mut self, count: usize, mut next: F) {
        let count = count.min(self.data.len());
        self.data.copy_within(count.., 0);
        let tail = self.data.len() - count;
        for slot in &mut self.data[tail..] {
            *slot = next();
        }
    }

    /// Add `frame * window * scale` elementwise
    pub fn accumulate(&mut self, frame: &[f32], window: &[f32], scale: f32) {
        for ((acc, &x), &w) in self.data.iter_mut().zip(frame).zip(window) {
            *acc += w * x * scale;
        }
    }

    /// Hand the oldest `count` samples to `emit`, then rotate them out as zeros
    pub fn shift_out<F: FnMut(f32)>(&mut self, count: usize, mut emit: F) {
        let count = count.min(self.data.len());
        for &sample in &self.data[..count] {
            emit(sample);
        }
        self.data.copy_within(count.., 0);
        let tail = self.data.len() - count;
        self.data[tail..].fill(0.0);
    }
}
