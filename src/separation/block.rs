//! Sliding block of frames
//!
//! Fixed-length history, oldest first. Each step recycles the storage of the
//! evicted oldest frame for the incoming newest one, so no frame memory is
//! allocated after construction.

use super::frame::Frame;

/// Ordered, fixed-length history of frames
#[derive(Debug, Clone)]
pub struct SlidingBlock {
    frames: Vec<Frame>,
    steps: u64,
}

impl SlidingBlock {
    /// Block of `block_size` silent frames
    pub fn new(block_size: usize, frame_size: usize) -> Self {
        Self {
            frames: vec![Frame::new(frame_size); block_size],
            steps: 0,
        }
    }

    /// Evict the oldest frame and append a new one written by `fill`
    ///
    /// `fill` receives the evicted frame's storage; it must overwrite every
    /// active bin.
    pub fn advance<F: FnOnce(&mut Frame)>(&mut self, fill: F) {
        self.frames.rotate_left(1);
        if let Some(newest) = self.frames.last_mut() {
            fill(newest);
        }
        self.steps += 1;
    }

    /// Number of `advance` calls since construction
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Block length in frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True for an empty block
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame about to be evicted
    pub fn oldest(&self) -> Option<&Frame> {
        self.frames.first()
    }

    /// Most recently appended frame
    pub fn newest(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// All frames, oldest first
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// All frames, oldest first, for in-place solving
    pub fn frames_mut(&mut self) -> &mut [Frame] {
        &mut self.frames
    }
}
