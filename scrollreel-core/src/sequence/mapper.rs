use crate::{foundation::core::FrameNumber, sequence::holds::HoldSpec};

/// Extended frame table mapping normalized scroll progress to a frame.
///
/// Built once per configuration by [`crate::build_extended_sequence`] and shared by
/// reference afterwards. Non-empty, non-decreasing, every entry in `[1, total_frames]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSequence {
    total_frames: u32,
    holds: Vec<HoldSpec>,
    frames: Vec<FrameNumber>,
}

impl FrameSequence {
    pub(crate) fn from_parts(
        total_frames: u32,
        holds: Vec<HoldSpec>,
        frames: Vec<FrameNumber>,
    ) -> Self {
        debug_assert!(!frames.is_empty());
        Self {
            total_frames,
            holds,
            frames,
        }
    }

    /// Number of distinct frames (`N`).
    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// Number of scroll positions, holds included.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false` for a built sequence.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Holds sorted by frame.
    pub fn holds(&self) -> &[HoldSpec] {
        &self.holds
    }

    /// Frame at every scroll position, in order.
    pub fn as_slice(&self) -> &[FrameNumber] {
        &self.frames
    }

    fn index_at(&self, progress: f64) -> usize {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let last = self.frames.len() - 1;
        let idx = (p * last as f64).floor() as usize;
        idx.min(last)
    }

    /// Frame shown at scroll `progress` (clamped to `[0, 1]`).
    pub fn frame_at(&self, progress: f64) -> FrameNumber {
        self.frames[self.index_at(progress)]
    }

    /// Smallest progress whose mapped frame is `>= frame`.
    pub fn progress_for_frame(&self, frame: FrameNumber) -> f64 {
        let last = self.frames.len() - 1;
        if last == 0 {
            return 0.0;
        }
        let i = self.frames.partition_point(|f| *f < frame);
        if i > last {
            return 1.0;
        }

        let mut p = i as f64 / last as f64;
        while self.index_at(p) < i {
            p = p.next_up();
        }
        p.min(1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/mapper.rs"]
mod tests;
