use std::ops::RangeInclusive;

use crate::{
    foundation::core::FrameNumber,
    foundation::error::{ReelError, ReelResult},
    sequence::mapper::FrameSequence,
};

/// Narrative segment of the hero sequence, in scroll order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Opening frames.
    Intro,
    /// The scene opens up.
    Expansion,
    /// Feature walkthrough; corner cards live here.
    DeepDive,
    /// Closing frames with the call to action.
    Cta,
}

impl Phase {
    /// Every phase in scroll order.
    pub const ALL: [Phase; 4] = [Phase::Intro, Phase::Expansion, Phase::DeepDive, Phase::Cta];

    /// Name as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Expansion => "expansion",
            Self::DeepDive => "deepDive",
            Self::Cta => "cta",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last frame of each phase but the final one, as written in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PhaseEnds {
    /// Last intro frame.
    pub intro_end: u32,
    /// Last expansion frame.
    pub expansion_end: u32,
    /// Last deep dive frame; the CTA runs from the next frame to N.
    pub deep_dive_end: u32,
}

/// Phase boundaries bound to a specific frame count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseBoundaries {
    total_frames: u32,
    ends: PhaseEnds,
}

impl PhaseBoundaries {
    /// Boundaries must satisfy `1 <= intro_end < expansion_end < deep_dive_end < total_frames`.
    pub fn new(total_frames: u32, ends: PhaseEnds) -> ReelResult<Self> {
        let PhaseEnds {
            intro_end,
            expansion_end,
            deep_dive_end,
        } = ends;
        if intro_end < 1
            || intro_end >= expansion_end
            || expansion_end >= deep_dive_end
            || deep_dive_end >= total_frames
        {
            return Err(ReelError::validation(format!(
                "phase boundaries {intro_end}/{expansion_end}/{deep_dive_end} do not partition [1, {total_frames}]"
            )));
        }
        Ok(Self { total_frames, ends })
    }

    /// Frame count the boundaries were validated against.
    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// Boundaries in their configuration form.
    pub fn ends(&self) -> PhaseEnds {
        self.ends
    }

    /// Fails when these boundaries were written for a different frame count.
    pub fn check_matches(&self, sequence: &FrameSequence) -> ReelResult<()> {
        if self.total_frames != sequence.total_frames() {
            return Err(ReelError::validation(format!(
                "phase boundaries are for {} frames but the sequence has {}",
                self.total_frames,
                sequence.total_frames()
            )));
        }
        Ok(())
    }

    /// Phase containing `frame`.
    pub fn classify(&self, frame: FrameNumber) -> Phase {
        let f = frame.0;
        if f <= self.ends.intro_end {
            Phase::Intro
        } else if f <= self.ends.expansion_end {
            Phase::Expansion
        } else if f <= self.ends.deep_dive_end {
            Phase::DeepDive
        } else {
            Phase::Cta
        }
    }

    /// Inclusive frame range of `phase`.
    pub fn range(&self, phase: Phase) -> RangeInclusive<u32> {
        let e = self.ends;
        match phase {
            Phase::Intro => 1..=e.intro_end,
            Phase::Expansion => (e.intro_end + 1)..=e.expansion_end,
            Phase::DeepDive => (e.expansion_end + 1)..=e.deep_dive_end,
            Phase::Cta => (e.deep_dive_end + 1)..=self.total_frames,
        }
    }

    /// All four ranges, in scroll order.
    pub fn ranges(&self) -> [(Phase, RangeInclusive<u32>); 4] {
        Phase::ALL.map(|p| (p, self.range(p)))
    }

    /// Position of `frame` within its phase, `0.0` at the first frame and `1.0` at the last.
    pub fn phase_progress(&self, frame: FrameNumber) -> f64 {
        let range = self.range(self.classify(frame));
        let (start, end) = (*range.start(), *range.end());
        if end == start {
            return 1.0;
        }
        let f = frame.0.clamp(start, end);
        f64::from(f - start) / f64::from(end - start)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/phase.rs"]
mod tests;
