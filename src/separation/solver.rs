//! Iterative harmonic/percussive solver
//!
//! For every interior frame of the block and every active bin, the target
//! energy `2·|X|^2` is split by the current harmonic share, then each
//! component is moved to the positive root of
//!
//! ```text
//! x^2 - 2·b·x - c·(1 - 4·w) = 0,   b = w·(left + right neighbour)
//! ```
//!
//! Harmonic neighbours are the same bin in the adjacent frames (time axis),
//! percussive neighbours are the adjacent bins of the same frame (frequency
//! axis). Updates are written in place in ascending frame then ascending bin
//! order, so later updates in a sweep read values already refreshed earlier in
//! that sweep (Gauss-Seidel). Changing the traversal order changes the output.

use super::frame::Frame;

/// Run `num_iterations` in-place sweeps over the interior of the block
///
/// The first and last frames are read as anchors and never written.
///
/// # Arguments
///
/// * `frames` - Sliding block contents, oldest first
/// * `w_h` - Harmonic smoothing weight per bin
/// * `w_p` - Percussive smoothing weight per bin
/// * `num_iterations` - Number of sweeps
pub fn solve_block(frames: &mut [Frame], w_h: &[f32], w_p: &[f32], num_iterations: u32) {
    let len = frames.len();
    if len < 3 {
        return;
    }

    for _ in 0..num_iterations {
        for pos in 1..len - 1 {
            let (before, rest) = frames.split_at_mut(pos);
            let (current, after) = rest.split_at_mut(1);
            update_frame(&mut current[0], &before[pos - 1], &after[0], w_h, w_p);
        }
    }
}

/// Update every active bin of `frame` once, given its time neighbours
pub fn update_frame(frame: &mut Frame, prev: &Frame, next: &Frame, w_h: &[f32], w_p: &[f32]) {
    for h in frame.active_bins() {
        let harmonic = frame.harmonic[h];
        let percussive = frame.percussive[h];
        let ww = frame.amplitudes[h] * frame.amplitudes[h];
        let energy = harmonic * harmonic + percussive * percussive;

        let (c_h, c_p) = if energy > 0.0 {
            let c_h = harmonic * harmonic / energy * 2.0 * ww;
            // Rounding can push the remainder a hair below zero
            (c_h, (2.0 * ww - c_h).max(0.0))
        } else {
            (ww, ww)
        };

        let b = (prev.harmonic[h] + next.harmonic[h]) * w_h[h];
        frame.harmonic[h] = positive_root(b, c_h, w_h[h]);

        // Bin 0 is always zero, which anchors the h = 1 update
        let b = (frame.percussive[h - 1] + frame.percussive[h + 1]) * w_p[h];
        frame.percussive[h] = positive_root(b, c_p, w_p[h]);
    }
}

#[inline]
fn positive_root(b: f32, c: f32, w: f32) -> f32 {
    b + (b * b + c * (1.0 - 4.0 * w)).sqrt()
}
