use std::sync::Arc;

use crate::{
    assets::cache::{ImageCache, ImageSource},
    assets::manifest::FrameManifest,
    config::EngineConfig,
    foundation::core::{CssSize, FrameNumber},
    foundation::error::{ReelError, ReelResult},
    overlay::blocks::OverlayState,
    preload::loader::{PreloadEvent, PreloadHandle, PreloadPlan, PreloadState, spawn_preloader},
    render::canvas::{CanvasRenderer, DrawOutcome, FrameRGBA},
    scroll::snap::{SnapController, SnapTarget},
    scroll::tracker::{FrameUpdate, ScrollGeometry, ScrollTracker},
    sequence::mapper::FrameSequence,
    sequence::phase::{Phase, PhaseBoundaries},
};

/// Host window state at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Canvas size in CSS pixels.
    pub css: CssSize,
    /// Host device pixel ratio.
    pub device_pixel_ratio: f64,
    /// Scroll container at mount time.
    pub geometry: ScrollGeometry,
}

/// Keyboard scrolling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollKey {
    /// Scroll up by `key_scroll_px`.
    ArrowUp,
    /// Scroll down by `key_scroll_px`.
    ArrowDown,
}

/// Input from the embedding host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// Page scrolled.
    Scroll {
        /// New document offset.
        scroll_y: f64,
        /// Host clock.
        now_ms: f64,
    },
    /// The host is about to paint.
    AnimationFrame,
    /// Window or container size changed.
    Resize {
        /// New canvas size.
        css: CssSize,
        /// New pixel ratio.
        device_pixel_ratio: f64,
        /// New viewport height.
        viewport_height: f64,
        /// New container height.
        container_height: f64,
    },
    /// Arrow key pressed.
    Key(ScrollKey),
    /// No scroll input since the last event; `now_ms` is the host clock.
    Idle {
        /// Host clock.
        now_ms: f64,
    },
}

/// What the host should do in response to an event.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionAction {
    /// The visible frame changed; repaint.
    Frame(FrameUpdate),
    /// Scroll the page to `scroll_y` (smoothly).
    ScrollTo {
        /// Target document offset.
        scroll_y: f64,
        /// The snap point being approached, if this is a snap.
        snap: Option<SnapTarget>,
    },
}

/// One mounted hero: tracker, canvas, snap and the background preload, built from one config.
#[derive(Debug)]
pub struct ScrollytellingSession {
    config: EngineConfig,
    sequence: Arc<FrameSequence>,
    phases: PhaseBoundaries,
    tracker: ScrollTracker,
    renderer: CanvasRenderer,
    snap: SnapController,
    preload: PreloadState,
    handle: Option<PreloadHandle>,
    last_draw: Option<DrawOutcome>,
    reduced_motion: bool,
}

impl ScrollytellingSession {
    /// Mount a session and start the background preload.
    ///
    /// Fails when the config is invalid or `manifest` lists a different frame count.
    pub fn new(
        config: EngineConfig,
        manifest: &FrameManifest,
        source: Arc<dyn ImageSource>,
        viewport: Viewport,
    ) -> ReelResult<Self> {
        config.validate()?;
        if manifest.total_frames() != config.total_frames {
            return Err(ReelError::validation(format!(
                "manifest lists {} frames but the config expects {}",
                manifest.total_frames(),
                config.total_frames
            )));
        }

        let sequence = Arc::new(config.sequence()?);
        let phases = config.phase_boundaries()?;
        let mut tracker = ScrollTracker::new(sequence.clone(), phases)?;
        tracker.mount(viewport.geometry);

        let renderer = CanvasRenderer::new(
            viewport.css,
            viewport.device_pixel_ratio,
            config.canvas_settings(),
        )?;

        let mut preload = PreloadState::new();
        let plan = PreloadPlan::new(manifest, config.priority_count);
        let cache = Arc::new(ImageCache::new(source));
        let handle = match spawn_preloader(plan, cache) {
            Ok(h) => Some(h),
            Err(e) => {
                tracing::warn!(error = %e, "could not start preloader");
                preload.apply(PreloadEvent::WorkerFailed(e.to_string()));
                None
            }
        };

        tracing::debug!(
            total_frames = config.total_frames,
            positions = sequence.len(),
            priority = config.priority_count,
            "session mounted"
        );

        Ok(Self {
            snap: SnapController::new(config.snap.clone()),
            config,
            sequence,
            phases,
            tracker,
            renderer,
            preload,
            handle,
            last_draw: None,
            reduced_motion: false,
        })
    }

    /// Configuration the session runs with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Extended frame table built from the config.
    pub fn sequence(&self) -> &FrameSequence {
        &self.sequence
    }

    /// Phase boundaries built from the config.
    pub fn phases(&self) -> &PhaseBoundaries {
        &self.phases
    }

    /// Loading state as of the last pump.
    pub fn preload_state(&self) -> &PreloadState {
        &self.preload
    }

    /// Priority frames are in: the loading screen can go.
    pub fn is_ready(&self) -> bool {
        self.preload.is_ready()
    }

    /// Every frame was attempted.
    pub fn is_complete(&self) -> bool {
        self.preload.is_complete()
    }

    /// Loading percentage for the loading screen.
    pub fn loading_progress(&self) -> u8 {
        self.preload.progress
    }

    /// The small "loading more frames" badge shown after the hero appears.
    pub fn show_background_indicator(&self) -> bool {
        self.is_ready() && !self.is_complete()
    }

    /// Apply whatever the preloader has finished since the last call.
    pub fn pump_preloader(&mut self) -> usize {
        match self.handle.as_mut() {
            Some(h) => h.drain(&mut self.preload),
            None => 0,
        }
    }

    /// Block until the preloader is done (or the session is unmounted).
    pub fn wait_for_preload(&mut self) -> usize {
        match self.handle.as_mut() {
            Some(h) => h.wait(&mut self.preload),
            None => 0,
        }
    }

    /// Feed one host event. Does nothing once unmounted.
    pub fn handle(&mut self, event: HostEvent) -> ReelResult<Option<SessionAction>> {
        if !self.tracker.is_mounted() {
            return Ok(None);
        }
        match event {
            HostEvent::Scroll { scroll_y, now_ms } => {
                self.tracker.on_scroll(scroll_y);
                self.snap.record_scroll(scroll_y, now_ms);
                Ok(None)
            }
            HostEvent::AnimationFrame => {
                let update = self.tracker.on_animation_frame();
                Ok(self.frame_action(update))
            }
            HostEvent::Resize {
                css,
                device_pixel_ratio,
                viewport_height,
                container_height,
            } => {
                self.renderer.resize(css, device_pixel_ratio)?;
                let update = self.tracker.on_resize(viewport_height, container_height);
                Ok(self.frame_action(update))
            }
            HostEvent::Key(key) => {
                let Some(g) = self.tracker.geometry() else {
                    return Ok(None);
                };
                let delta = match key {
                    ScrollKey::ArrowUp => -self.config.key_scroll_px,
                    ScrollKey::ArrowDown => self.config.key_scroll_px,
                };
                Ok(Some(SessionAction::ScrollTo {
                    scroll_y: (g.scroll_y + delta).min(g.max_scroll()).max(0.0),
                    snap: None,
                }))
            }
            HostEvent::Idle { now_ms } => {
                if self.reduced_motion {
                    return Ok(None);
                }
                let (Some(current), Some(g)) =
                    (self.tracker.current_frame(), self.tracker.geometry())
                else {
                    return Ok(None);
                };
                Ok(self
                    .snap
                    .on_idle(now_ms, current, &g, &self.sequence)
                    .map(|target| SessionAction::ScrollTo {
                        scroll_y: target.scroll_y,
                        snap: Some(target),
                    }))
            }
        }
    }

    /// The host finished a smooth scroll started by a snap.
    pub fn snap_settled(&mut self) {
        self.snap.snap_settled();
    }

    fn frame_action(&self, update: Option<FrameUpdate>) -> Option<SessionAction> {
        if self.reduced_motion {
            return None;
        }
        update.map(SessionAction::Frame)
    }

    /// Frame on screen: the tracker's, or the last frame under reduced motion.
    pub fn current_frame(&self) -> FrameNumber {
        if self.reduced_motion {
            return FrameNumber(self.sequence.total_frames());
        }
        self.tracker.current_frame().unwrap_or(FrameNumber::FIRST)
    }

    /// Phase of `current_frame`; `Cta` under reduced motion.
    pub fn current_phase(&self) -> Phase {
        if self.reduced_motion {
            return Phase::Cta;
        }
        self.phases.classify(self.current_frame())
    }

    /// Fill level of the thin progress bar.
    pub fn scroll_progress(&self) -> f64 {
        if self.reduced_motion {
            1.0
        } else {
            self.tracker.progress()
        }
    }

    /// Paint the current frame and read the canvas back.
    pub fn render(&mut self) -> ReelResult<FrameRGBA> {
        let outcome = self
            .renderer
            .draw(self.current_frame(), self.preload.frames())?;
        self.last_draw = Some(outcome);
        Ok(self.renderer.readback())
    }

    /// Outcome of the last `render`.
    pub fn last_draw(&self) -> Option<DrawOutcome> {
        self.last_draw
    }

    /// Overlay state for the current frame and phase.
    pub fn overlay(&self) -> OverlayState {
        self.config
            .overlay
            .state(self.current_frame(), self.current_phase())
    }

    /// Static presentation: the final frame and the call to action, no snapping.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Whether reduced motion is on.
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// `false` after `unmount`.
    pub fn is_mounted(&self) -> bool {
        self.tracker.is_mounted()
    }

    /// Stop tracking and cancel the preload; queued results are discarded.
    pub fn unmount(&mut self) {
        self.tracker.unmount();
        if let Some(h) = &self.handle {
            h.cancel();
        }
        tracing::debug!("session unmounted");
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
