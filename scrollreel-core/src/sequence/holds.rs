use std::collections::BTreeMap;

use crate::{
    foundation::core::FrameNumber,
    foundation::error::{ReelError, ReelResult},
    sequence::mapper::FrameSequence,
};

/// A narrative beat where one frame repeats so scrolling past it takes longer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HoldSpec {
    /// Held frame.
    pub frame: FrameNumber,
    /// Total occurrences of `frame` in the extended table (`1` means no hold).
    pub duration: u32,
    /// Name of the beat, for logs.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
}

impl HoldSpec {
    /// Hold of `frame` for `duration` positions.
    pub fn new(frame: u32, duration: u32, label: impl Into<String>) -> Self {
        Self {
            frame: FrameNumber(frame),
            duration,
            label: label.into(),
        }
    }
}

/// Check `holds` against `total_frames` and return them sorted by frame.
pub fn validate_holds(total_frames: u32, holds: &[HoldSpec]) -> ReelResult<Vec<HoldSpec>> {
    if total_frames == 0 {
        return Err(ReelError::validation("total_frames must be >= 1"));
    }

    let mut seen = BTreeMap::<u32, &HoldSpec>::new();
    for h in holds {
        if h.frame.0 == 0 || h.frame.0 > total_frames {
            return Err(ReelError::validation(format!(
                "hold frame {} is outside [1, {total_frames}]",
                h.frame
            )));
        }
        if h.duration == 0 {
            return Err(ReelError::validation(format!(
                "hold at frame {} must have duration >= 1",
                h.frame
            )));
        }
        if seen.insert(h.frame.0, h).is_some() {
            return Err(ReelError::validation(format!(
                "frame {} is held more than once",
                h.frame
            )));
        }
    }

    Ok(seen.into_values().cloned().collect())
}

/// Build the extended frame table: every frame once, in order, held frames repeated.
pub fn build_extended_sequence(
    total_frames: u32,
    holds: &[HoldSpec],
) -> ReelResult<FrameSequence> {
    let holds = validate_holds(total_frames, holds)?;

    let extra: usize = holds.iter().map(|h| (h.duration - 1) as usize).sum();
    let mut frames = Vec::with_capacity(total_frames as usize + extra);
    let mut pending = holds.iter().peekable();

    for f in 1..=total_frames {
        let repeat = match pending.peek() {
            Some(h) if h.frame.0 == f => {
                tracing::debug!(frame = f, duration = h.duration, label = %h.label, "hold");
                let d = h.duration;
                pending.next();
                d
            }
            _ => 1,
        };
        frames.extend(std::iter::repeat_n(FrameNumber(f), repeat as usize));
    }

    tracing::debug!(
        positions = frames.len(),
        total_frames,
        "built extended frame sequence"
    );
    Ok(FrameSequence::from_parts(total_frames, holds, frames))
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/holds.rs"]
mod tests;
