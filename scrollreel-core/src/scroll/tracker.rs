use std::sync::Arc;

use crate::{
    foundation::core::FrameNumber,
    foundation::error::ReelResult,
    sequence::mapper::FrameSequence,
    sequence::phase::{Phase, PhaseBoundaries},
};

/// Scroll container measurements, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollGeometry {
    /// Document scroll offset.
    pub scroll_y: f64,
    /// Document offset of the container's top edge.
    pub container_top: f64,
    /// Full height of the scroll container.
    pub container_height: f64,
    /// Visible height.
    pub viewport_height: f64,
}

impl ScrollGeometry {
    /// Scrollable distance inside the container.
    pub fn span(&self) -> f64 {
        self.container_height - self.viewport_height
    }

    /// Position inside the container in `[0, 1]`; `0` when nothing can scroll.
    pub fn progress(&self) -> f64 {
        let span = self.span();
        if span.is_nan() || span <= 0.0 {
            return 0.0;
        }
        let p = (self.scroll_y - self.container_top) / span;
        if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
    }

    /// Document offset that yields `progress`.
    pub fn offset_for_progress(&self, progress: f64) -> f64 {
        self.container_top + self.span().max(0.0) * progress.clamp(0.0, 1.0)
    }

    /// Largest meaningful `scroll_y` for this container.
    pub fn max_scroll(&self) -> f64 {
        self.offset_for_progress(1.0)
    }
}

/// Emitted when a computation lands on a different frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameUpdate {
    /// New frame.
    pub frame: FrameNumber,
    /// Phase of `frame`.
    pub phase: Phase,
    /// Position inside the phase, `[0, 1]`.
    pub phase_progress: f64,
    /// Container progress, `[0, 1]`.
    pub progress: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum TrackerState {
    Unmounted,
    Tracking {
        geometry: ScrollGeometry,
        /// A computation is queued for the next animation frame.
        ticking: bool,
    },
}

/// Turns scroll offsets into frame updates, at most once per animation frame.
#[derive(Clone, Debug)]
pub struct ScrollTracker {
    sequence: Arc<FrameSequence>,
    phases: PhaseBoundaries,
    state: TrackerState,
    current: Option<FrameNumber>,
    progress: f64,
}

impl ScrollTracker {
    /// Fails when `phases` was built for a different frame count than `sequence`.
    pub fn new(sequence: Arc<FrameSequence>, phases: PhaseBoundaries) -> ReelResult<Self> {
        phases.check_matches(&sequence)?;
        Ok(Self {
            sequence,
            phases,
            state: TrackerState::Unmounted,
            current: None,
            progress: 0.0,
        })
    }

    /// Extended sequence being tracked.
    pub fn sequence(&self) -> &FrameSequence {
        &self.sequence
    }

    /// Phase boundaries used for classification.
    pub fn phases(&self) -> &PhaseBoundaries {
        &self.phases
    }

    /// Start tracking and compute once.
    pub fn mount(&mut self, geometry: ScrollGeometry) -> Option<FrameUpdate> {
        self.state = TrackerState::Tracking {
            geometry,
            ticking: false,
        };
        self.compute()
    }

    /// Stop tracking. The last frame is forgotten so a later `mount` reports it again.
    pub fn unmount(&mut self) {
        self.state = TrackerState::Unmounted;
        self.current = None;
        self.progress = 0.0;
    }

    /// Whether the tracker is attached to a container.
    pub fn is_mounted(&self) -> bool {
        matches!(self.state, TrackerState::Tracking { .. })
    }

    /// Record a new offset; the computation waits for [`ScrollTracker::on_animation_frame`].
    pub fn on_scroll(&mut self, scroll_y: f64) {
        if let TrackerState::Tracking { geometry, ticking } = &mut self.state {
            geometry.scroll_y = scroll_y;
            *ticking = true;
        }
    }

    /// A scroll arrived since the last animation frame.
    pub fn is_tick_pending(&self) -> bool {
        matches!(self.state, TrackerState::Tracking { ticking: true, .. })
    }

    /// Run the queued computation, if any.
    pub fn on_animation_frame(&mut self) -> Option<FrameUpdate> {
        match &mut self.state {
            TrackerState::Tracking { ticking, .. } if *ticking => {
                *ticking = false;
                self.compute()
            }
            _ => None,
        }
    }

    /// New container measurements; recomputes immediately.
    pub fn on_resize(
        &mut self,
        viewport_height: f64,
        container_height: f64,
    ) -> Option<FrameUpdate> {
        match &mut self.state {
            TrackerState::Tracking { geometry, ticking } => {
                geometry.viewport_height = viewport_height;
                geometry.container_height = container_height;
                *ticking = false;
                self.compute()
            }
            TrackerState::Unmounted => None,
        }
    }

    /// Measurements while mounted.
    pub fn geometry(&self) -> Option<ScrollGeometry> {
        match self.state {
            TrackerState::Tracking { geometry, .. } => Some(geometry),
            TrackerState::Unmounted => None,
        }
    }

    /// Last computed frame; `None` until the first computation.
    pub fn current_frame(&self) -> Option<FrameNumber> {
        self.current
    }

    /// Phase of the last computed frame.
    pub fn current_phase(&self) -> Option<Phase> {
        self.current.map(|f| self.phases.classify(f))
    }

    /// Last computed scroll progress, recorded even when the frame did not change.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    fn compute(&mut self) -> Option<FrameUpdate> {
        let TrackerState::Tracking { geometry, .. } = self.state else {
            return None;
        };
        let progress = geometry.progress();
        self.progress = progress;

        let frame = self
            .sequence
            .frame_at(progress)
            .clamp_to(self.sequence.total_frames());
        if self.current == Some(frame) {
            return None;
        }
        self.current = Some(frame);

        Some(FrameUpdate {
            frame,
            phase: self.phases.classify(frame),
            phase_progress: self.phases.phase_progress(frame),
            progress,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/tracker.rs"]
mod tests;
