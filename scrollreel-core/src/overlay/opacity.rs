use crate::{
    animation::ease::Ease,
    foundation::core::{FrameNumber, Vec2},
    foundation::error::{ReelError, ReelResult},
};

/// Fade-in / hold / fade-out envelope over frame numbers (all bounds inclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OpacityWindow {
    /// Last frame at opacity 0 before the fade-in.
    pub start: u32,
    /// First fully opaque frame.
    pub peak_start: u32,
    /// Last fully opaque frame.
    pub peak_end: u32,
    /// Frame the fade-out reaches 0.
    pub end: u32,
}

impl OpacityWindow {
    /// Validated window.
    pub fn new(start: u32, peak_start: u32, peak_end: u32, end: u32) -> ReelResult<Self> {
        let w = Self {
            start,
            peak_start,
            peak_end,
            end,
        };
        w.validate()?;
        Ok(w)
    }

    /// Bounds must be non-decreasing.
    pub fn validate(&self) -> ReelResult<()> {
        if !(self.start <= self.peak_start
            && self.peak_start <= self.peak_end
            && self.peak_end <= self.end)
        {
            return Err(ReelError::validation(format!(
                "opacity window {}/{}/{}/{} is not ordered",
                self.start, self.peak_start, self.peak_end, self.end
            )));
        }
        Ok(())
    }

    /// Shorthand for `frame_opacity(*self, frame)`.
    pub fn opacity(&self, frame: FrameNumber) -> f64 {
        frame_opacity(*self, frame)
    }
}

/// Opacity in `[0, 1]` for `frame` under `window`: linear ramps around a fully opaque plateau.
pub fn frame_opacity(window: OpacityWindow, frame: FrameNumber) -> f64 {
    let f = f64::from(frame.0);
    let (start, peak_start, peak_end, end) = (
        f64::from(window.start),
        f64::from(window.peak_start),
        f64::from(window.peak_end),
        f64::from(window.end),
    );

    let v = if f < start || f > end {
        0.0
    } else if f >= peak_start && f <= peak_end {
        1.0
    } else if f < peak_start {
        (f - start) / (peak_start - start)
    } else {
        1.0 - (f - peak_end) / (end - peak_end)
    };
    v.clamp(0.0, 1.0)
}

/// Frame-driven 2D motion between two offsets.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameMotion {
    /// Frame the motion starts.
    pub start_frame: u32,
    /// Frame the motion ends.
    pub end_frame: u32,
    /// Offset at `start_frame`.
    #[serde(default)]
    pub from: Vec2,
    /// Offset at `end_frame`.
    #[serde(default)]
    pub to: Vec2,
    /// Curve between the two.
    #[serde(default)]
    pub ease: Ease,
}

impl FrameMotion {
    /// Ramp position in `[0, 1]`; a zero-length ramp steps at `end_frame`.
    pub fn progress(&self, frame: FrameNumber) -> f64 {
        let f = frame.0;
        if f <= self.start_frame {
            return if self.end_frame <= self.start_frame && f >= self.end_frame {
                1.0
            } else {
                0.0
            };
        }
        if f >= self.end_frame {
            return 1.0;
        }
        f64::from(f - self.start_frame) / f64::from(self.end_frame - self.start_frame)
    }
}

/// Position of `motion` at `frame`: `from` before the ramp, `to` after it.
pub fn frame_position(motion: &FrameMotion, frame: FrameNumber) -> Vec2 {
    let t = motion.progress(frame);
    Vec2::new(
        motion.ease.lerp(motion.from.x, motion.to.x, t),
        motion.ease.lerp(motion.from.y, motion.to.y, t),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/opacity.rs"]
mod tests;
