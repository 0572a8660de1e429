use crate::{
    foundation::core::FrameNumber,
    foundation::error::{ReelError, ReelResult},
    scroll::tracker::ScrollGeometry,
    sequence::mapper::FrameSequence,
};

/// Keyframe the scroll may settle on.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SnapPoint {
    /// Target frame.
    pub frame: FrameNumber,
    /// Name used in logs and by the host.
    #[serde(default)]
    pub label: String,
}

/// When and where idle scrolling snaps.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SnapConfig {
    /// Off disables snapping entirely.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Quiet time after the last scroll sample before a snap is considered.
    #[serde(default = "default_idle_ms")]
    pub idle_ms: f64,
    /// Exclusive bound: a point exactly this many frames ahead is out of reach.
    pub max_frames_ahead: u32,
    /// Pixels per millisecond.
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,
    /// A snap counts as in flight for at most this long.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: f64,
    /// Ascending by frame.
    pub points: Vec<SnapPoint>,
}

fn default_true() -> bool {
    true
}

fn default_idle_ms() -> f64 {
    300.0
}

fn default_max_velocity() -> f64 {
    2.0
}

fn default_settle_ms() -> f64 {
    500.0
}

impl SnapConfig {
    /// Timings must be finite and non-negative. Points must lie in `1..=total_frames`, strictly
    /// ascending.
    pub fn validate(&self, total_frames: u32) -> ReelResult<()> {
        for (name, v) in [
            ("idle_ms", self.idle_ms),
            ("max_velocity", self.max_velocity),
            ("settle_ms", self.settle_ms),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ReelError::validation(format!(
                    "snap {name} must be finite and >= 0"
                )));
            }
        }
        let mut prev = 0;
        for p in &self.points {
            if p.frame.0 == 0 || p.frame.0 > total_frames {
                return Err(ReelError::validation(format!(
                    "snap point '{}' at frame {} is outside [1, {total_frames}]",
                    p.label, p.frame
                )));
            }
            if p.frame.0 <= prev {
                return Err(ReelError::validation(
                    "snap points must be strictly ascending",
                ));
            }
            prev = p.frame.0;
        }
        Ok(())
    }
}

/// Where the host should smooth-scroll to.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SnapTarget {
    /// Snap point frame.
    pub frame: FrameNumber,
    /// Snap point label.
    pub label: String,
    /// Document offset that shows `frame`.
    pub scroll_y: f64,
}

/// Nudges a slow, idle scroll forward onto the next nearby snap point.
#[derive(Clone, Debug)]
pub struct SnapController {
    config: SnapConfig,
    last_sample: Option<(f64, f64)>,
    velocity: f64,
    snap_started: Option<f64>,
}

impl SnapController {
    /// Controller with no samples yet.
    pub fn new(config: SnapConfig) -> Self {
        Self {
            config,
            last_sample: None,
            velocity: 0.0,
            snap_started: None,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    /// Feed one scroll sample; velocity is `|dy| / dt` against the previous sample.
    pub fn record_scroll(&mut self, scroll_y: f64, now_ms: f64) {
        if let Some((y0, t0)) = self.last_sample {
            let dt = now_ms - t0;
            if dt > 0.0 {
                self.velocity = (scroll_y - y0).abs() / dt;
            }
        }
        self.last_sample = Some((scroll_y, now_ms));
    }

    /// Last measured velocity, pixels per millisecond.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// A snap was issued and has not settled.
    pub fn is_snapping(&self) -> bool {
        self.snap_started.is_some()
    }

    /// The host finished the smooth scroll.
    pub fn snap_settled(&mut self) {
        self.snap_started = None;
    }

    /// Snap decision for an idle tick.
    ///
    /// Returns a target only when scrolling has been quiet for `idle_ms`, was slower than
    /// `max_velocity`, no snap is in flight, and the next point after `current` is fewer than
    /// `max_frames_ahead` frames away.
    pub fn on_idle(
        &mut self,
        now_ms: f64,
        current: FrameNumber,
        geometry: &ScrollGeometry,
        sequence: &FrameSequence,
    ) -> Option<SnapTarget> {
        if !self.config.enabled {
            return None;
        }
        if let Some(started) = self.snap_started {
            if now_ms - started < self.config.settle_ms {
                return None;
            }
            self.snap_started = None;
        }
        let (_, last_t) = self.last_sample?;
        if now_ms - last_t < self.config.idle_ms || self.velocity >= self.config.max_velocity {
            return None;
        }

        let next = self.config.points.iter().find(|p| p.frame > current)?;
        if next.frame.0 - current.0 >= self.config.max_frames_ahead {
            return None;
        }

        let progress = sequence.progress_for_frame(next.frame);
        let scroll_y = geometry.offset_for_progress(progress);
        tracing::debug!(from = %current, to = %next.frame, label = %next.label, scroll_y, "snap");
        self.snap_started = Some(now_ms);
        Some(SnapTarget {
            frame: next.frame,
            label: next.label.clone(),
            scroll_y,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/snap.rs"]
mod tests;
