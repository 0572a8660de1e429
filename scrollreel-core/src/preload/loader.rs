use std::{
    sync::{
        Arc,
        mpsc::{self, TryRecvError},
    },
    thread::JoinHandle,
};

use anyhow::Context;

use crate::{
    assets::{cache::ImageCache, decode::PreparedImage, manifest::FrameManifest},
    foundation::{cancel::CancellationToken, core::FrameNumber, error::ReelResult},
    preload::frames::LoadedFrames,
};

/// Status of one load wave, or of the whole preload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveStatus {
    /// Not started.
    Idle,
    /// In progress.
    Loading,
    /// Every frame was attempted.
    Complete,
    /// The worker stopped early.
    Error,
}

/// The two load waves: frames `1..=K` gate the loading screen, the rest stream in after.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreloadPlan {
    /// Frames `1..=K`, in order.
    pub priority: Vec<(FrameNumber, String)>,
    /// Frames `K+1..=N`, in order.
    pub remaining: Vec<(FrameNumber, String)>,
}

impl PreloadPlan {
    /// Split `manifest` after `priority_count` frames (clamped to N).
    pub fn new(manifest: &FrameManifest, priority_count: u32) -> Self {
        let k = priority_count.min(manifest.total_frames());
        let own = |(f, p): (FrameNumber, &str)| (f, p.to_string());
        Self {
            priority: manifest.entries(1..=k).map(own).collect(),
            remaining: manifest
                .entries((k + 1)..=manifest.total_frames())
                .map(own)
                .collect(),
        }
    }

    /// Frames across both waves.
    pub fn len(&self) -> usize {
        self.priority.len() + self.remaining.len()
    }

    /// `true` for a plan with no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Progress report from the preload worker.
#[derive(Clone, Debug)]
pub enum PreloadEvent {
    /// A frame decoded.
    FrameLoaded {
        /// Frame number.
        frame: FrameNumber,
        /// Decoded image.
        image: Arc<PreparedImage>,
    },
    /// A frame could not be loaded; the wave continues.
    FrameFailed {
        /// Frame number.
        frame: FrameNumber,
        /// Load error, formatted.
        error: String,
    },
    /// Overall percentage, `0..=100`.
    Progress(u8),
    /// Every frame of the priority wave was attempted.
    PriorityComplete,
    /// Every frame of both waves was attempted.
    Complete,
    /// The worker stopped without finishing.
    WorkerFailed(String),
}

/// How `run_waves` ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Both waves ran to the end.
    Completed,
    /// The token was cancelled first.
    Cancelled,
}

fn percent(done: usize, len: usize, base: f64) -> u8 {
    let frac = if len == 0 {
        1.0
    } else {
        done as f64 / len as f64
    };
    ((base + frac * 0.5) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Load both waves in order, one frame at a time, reporting through `on_event`.
///
/// A frame that fails is logged and reported, and the wave moves on. The token is checked before
/// each load; once cancelled nothing more is emitted.
#[tracing::instrument(
    skip_all,
    fields(priority = plan.priority.len(), remaining = plan.remaining.len())
)]
pub fn run_waves(
    plan: &PreloadPlan,
    cache: &ImageCache,
    token: &CancellationToken,
    mut on_event: impl FnMut(PreloadEvent),
) -> RunOutcome {
    for (wave, base, entries) in [
        ("priority", 0.0, &plan.priority),
        ("remaining", 0.5, &plan.remaining),
    ] {
        for (i, (frame, path)) in entries.iter().enumerate() {
            if token.is_cancelled() {
                tracing::debug!(wave, %frame, "preload cancelled");
                return RunOutcome::Cancelled;
            }

            match cache.preload(path) {
                Ok(image) => on_event(PreloadEvent::FrameLoaded {
                    frame: *frame,
                    image,
                }),
                Err(e) => {
                    tracing::warn!(wave, %frame, path = %path, error = %e, "failed to load frame");
                    on_event(PreloadEvent::FrameFailed {
                        frame: *frame,
                        error: e.to_string(),
                    });
                }
            }
            on_event(PreloadEvent::Progress(percent(i + 1, entries.len(), base)));
        }

        if token.is_cancelled() {
            return RunOutcome::Cancelled;
        }
        if base == 0.0 {
            tracing::debug!(frames = entries.len(), "priority wave complete");
            on_event(PreloadEvent::PriorityComplete);
        }
    }

    on_event(PreloadEvent::Complete);
    RunOutcome::Completed
}

/// Loading state as seen by the owner of the view.
#[derive(Clone, Debug)]
pub struct PreloadState {
    /// Priority wave.
    pub priority: WaveStatus,
    /// Remaining wave.
    pub remaining: WaveStatus,
    /// Whole preload.
    pub overall: WaveStatus,
    /// Percentage in `0..=100`.
    pub progress: u8,
    /// Set when the worker failed.
    pub error: Option<String>,
    frames: LoadedFrames,
    failed: Vec<FrameNumber>,
}

impl Default for PreloadState {
    fn default() -> Self {
        Self {
            priority: WaveStatus::Loading,
            remaining: WaveStatus::Idle,
            overall: WaveStatus::Loading,
            progress: 0,
            error: None,
            frames: LoadedFrames::new(),
            failed: Vec::new(),
        }
    }
}

impl PreloadState {
    /// Initial state: priority wave loading, nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the state.
    pub fn apply(&mut self, event: PreloadEvent) {
        match event {
            PreloadEvent::FrameLoaded { frame, image } => {
                self.frames.insert(frame, image);
            }
            PreloadEvent::FrameFailed { frame, .. } => self.failed.push(frame),
            PreloadEvent::Progress(p) => self.progress = p,
            PreloadEvent::PriorityComplete => {
                self.priority = WaveStatus::Complete;
                self.remaining = WaveStatus::Loading;
                self.overall = WaveStatus::Loading;
            }
            PreloadEvent::Complete => {
                self.priority = WaveStatus::Complete;
                self.remaining = WaveStatus::Complete;
                self.overall = WaveStatus::Complete;
                self.progress = 100;
            }
            PreloadEvent::WorkerFailed(msg) => {
                self.overall = WaveStatus::Error;
                self.error = Some(msg);
            }
        }
    }

    /// Priority wave done: the view can replace its loading screen.
    pub fn is_ready(&self) -> bool {
        self.priority == WaveStatus::Complete
    }

    /// Both waves done.
    pub fn is_complete(&self) -> bool {
        self.overall == WaveStatus::Complete
    }

    /// Frames loaded so far.
    pub fn frames(&self) -> &LoadedFrames {
        &self.frames
    }

    /// Frames that failed to load, in load order.
    pub fn failed(&self) -> &[FrameNumber] {
        &self.failed
    }
}

/// Owner side of a background preload.
///
/// Events are only applied through [`PreloadHandle::drain`] / [`PreloadHandle::wait`] on the
/// owner's thread, and only while the token is live. Dropping the handle cancels the worker.
#[derive(Debug)]
pub struct PreloadHandle {
    rx: mpsc::Receiver<PreloadEvent>,
    token: CancellationToken,
    worker: Option<JoinHandle<RunOutcome>>,
    disconnected: bool,
}

/// Run [`run_waves`] on a dedicated worker thread.
pub fn spawn_preloader(plan: PreloadPlan, cache: Arc<ImageCache>) -> ReelResult<PreloadHandle> {
    let (tx, rx) = mpsc::channel();
    let token = CancellationToken::new();
    let worker_token = token.clone();

    let worker = std::thread::Builder::new()
        .name("scrollreel-preload".to_string())
        .spawn(move || {
            run_waves(&plan, &cache, &worker_token, |ev| {
                // The owner may be gone already; nothing to do then.
                let _ = tx.send(ev);
            })
        })
        .context("spawn preload worker")?;

    Ok(PreloadHandle {
        rx,
        token,
        worker: Some(worker),
        disconnected: false,
    })
}

impl PreloadHandle {
    /// Token shared with the worker.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Stop the worker and ignore anything it already sent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The worker hung up: every event it sent has been received.
    pub fn is_finished(&self) -> bool {
        self.disconnected
    }

    /// Apply every queued event without blocking. Returns how many were applied.
    pub fn drain(&mut self, state: &mut PreloadState) -> usize {
        let mut applied = 0;
        while self.token.is_live() {
            match self.rx.try_recv() {
                Ok(ev) => {
                    state.apply(ev);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.on_disconnect(state);
                    break;
                }
            }
        }
        applied
    }

    /// Block until the worker finishes (or the token is cancelled), applying events as they come.
    pub fn wait(&mut self, state: &mut PreloadState) -> usize {
        let mut applied = 0;
        while self.token.is_live() {
            match self.rx.recv() {
                Ok(ev) => {
                    state.apply(ev);
                    applied += 1;
                }
                Err(_) => {
                    self.on_disconnect(state);
                    break;
                }
            }
        }
        applied
    }

    fn on_disconnect(&mut self, state: &mut PreloadState) {
        if self.disconnected {
            return;
        }
        self.disconnected = true;

        let outcome = self.worker.take().map(JoinHandle::join);
        if !state.is_complete() && self.token.is_live() {
            let msg = match outcome {
                Some(Err(_)) => "preload worker panicked".to_string(),
                _ => "preload worker stopped before completing".to_string(),
            };
            tracing::warn!(error = %msg, "preload ended early");
            state.apply(PreloadEvent::WorkerFailed(msg));
        }
    }
}

impl Drop for PreloadHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preload/loader.rs"]
mod tests;
