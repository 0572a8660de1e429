use std::{collections::BTreeMap, sync::Arc};

use crate::{assets::decode::PreparedImage, foundation::core::FrameNumber};

/// Frames decoded so far. Grows monotonically; a key is written at most once.
#[derive(Clone, Debug, Default)]
pub struct LoadedFrames {
    frames: BTreeMap<FrameNumber, Arc<PreparedImage>>,
}

impl LoadedFrames {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` (and keeps the existing image) when `frame` is already present.
    pub fn insert(&mut self, frame: FrameNumber, image: Arc<PreparedImage>) -> bool {
        if frame.0 == 0 || self.frames.contains_key(&frame) {
            return false;
        }
        self.frames.insert(frame, image);
        true
    }

    /// Image for exactly `frame`.
    pub fn get(&self, frame: FrameNumber) -> Option<&Arc<PreparedImage>> {
        self.frames.get(&frame)
    }

    /// Whether `frame` itself has loaded.
    pub fn contains(&self, frame: FrameNumber) -> bool {
        self.frames.contains_key(&frame)
    }

    /// Number of loaded frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` before the first frame lands.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Image for `frame`, or the closest earlier loaded frame.
    ///
    /// `None` only when nothing at or before `frame` has loaded yet.
    pub fn resolve(&self, frame: FrameNumber) -> Option<(FrameNumber, &Arc<PreparedImage>)> {
        self.frames
            .range(..=frame)
            .next_back()
            .map(|(f, img)| (*f, img))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preload/frames.rs"]
mod tests;
