use std::{collections::HashMap, sync::Arc};

use rayon::prelude::*;

use crate::{
    config::EngineConfig,
    foundation::core::{CssSize, FrameNumber},
    foundation::error::{ReelError, ReelResult},
    preload::frames::LoadedFrames,
    render::canvas::{CanvasRenderer, FrameRGBA},
    render::sink::{FrameSink, SinkConfig},
    scroll::tracker::{ScrollGeometry, ScrollTracker},
    sequence::mapper::FrameSequence,
    sequence::phase::Phase,
};

/// Viewport height used for simulated sweeps, in CSS pixels.
pub const SWEEP_VIEWPORT_PX: f64 = 1000.0;
/// Scroll distance allotted to each position of the extended sequence.
pub const SWEEP_PX_PER_POSITION: f64 = 10.0;

/// One simulated scroll position and what the tracker made of it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SweepStep {
    /// Position in the sweep, from 0.
    pub index: usize,
    /// Simulated scroll offset.
    pub scroll_y: f64,
    /// Container progress in `[0, 1]`.
    pub progress: f64,
    /// Frame the tracker resolved.
    pub frame: FrameNumber,
    /// Story phase of `frame`.
    pub phase: Phase,
}

/// How `render_sweep` schedules work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepOpts {
    /// Render distinct frames on a rayon pool.
    pub parallel: bool,
    /// Worker count override (parallel mode only).
    pub threads: Option<usize>,
}

/// Counters returned by `render_sweep`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct SweepStats {
    /// Steps pushed to the sink.
    pub steps: usize,
    /// Distinct frames painted.
    pub frames_rendered: usize,
    /// Steps that painted an earlier frame than requested, or only the background.
    pub fallbacks: usize,
}

/// Scroll a simulated container from top to bottom in `steps` evenly spaced offsets.
pub fn sweep_frames(
    config: &EngineConfig,
    sequence: Arc<FrameSequence>,
    steps: usize,
) -> ReelResult<Vec<SweepStep>> {
    if steps == 0 {
        return Err(ReelError::validation("sweep needs at least one step"));
    }
    let span = sequence.len() as f64 * SWEEP_PX_PER_POSITION;
    let mut tracker = ScrollTracker::new(sequence, config.phase_boundaries()?)?;
    tracker.mount(ScrollGeometry {
        scroll_y: 0.0,
        container_top: 0.0,
        container_height: SWEEP_VIEWPORT_PX + span,
        viewport_height: SWEEP_VIEWPORT_PX,
    });

    let mut out = Vec::with_capacity(steps);
    for index in 0..steps {
        let scroll_y = if steps == 1 {
            0.0
        } else {
            span * index as f64 / (steps - 1) as f64
        };
        tracker.on_scroll(scroll_y);
        tracker.on_animation_frame();

        let (Some(frame), Some(phase)) = (tracker.current_frame(), tracker.current_phase()) else {
            return Err(ReelError::validation("sweep tracker produced no frame"));
        };
        out.push(SweepStep {
            index,
            scroll_y,
            progress: tracker.progress(),
            frame,
            phase,
        });
    }
    Ok(out)
}

/// Render every step of a sweep and push it to `sink` in step order.
///
/// Each distinct frame is drawn once. In parallel mode every worker owns its renderer.
#[tracing::instrument(skip_all, fields(steps = steps.len(), parallel = opts.parallel))]
pub fn render_sweep(
    config: &EngineConfig,
    frames: &LoadedFrames,
    steps: &[SweepStep],
    css: CssSize,
    device_pixel_ratio: f64,
    opts: SweepOpts,
    sink: &mut dyn FrameSink,
) -> ReelResult<SweepStats> {
    let settings = config.canvas_settings();
    let mut unique = Vec::<FrameNumber>::new();
    let mut slot_of = HashMap::<FrameNumber, usize>::new();
    for s in steps {
        slot_of.entry(s.frame).or_insert_with(|| {
            unique.push(s.frame);
            unique.len() - 1
        });
    }

    let rendered: Vec<(Option<FrameNumber>, FrameRGBA)> = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        let results = pool.install(|| {
            unique
                .par_iter()
                .map_init(
                    || CanvasRenderer::new(css, device_pixel_ratio, settings),
                    |renderer, frame| -> ReelResult<(Option<FrameNumber>, FrameRGBA)> {
                        let renderer = renderer
                            .as_mut()
                            .map_err(|e| ReelError::render(e.to_string()))?;
                        let outcome = renderer.draw(*frame, frames)?;
                        Ok((outcome.drawn, renderer.readback()))
                    },
                )
                .collect::<Vec<_>>()
        });
        results.into_iter().collect::<ReelResult<Vec<_>>>()?
    } else {
        let mut renderer = CanvasRenderer::new(css, device_pixel_ratio, settings)?;
        let mut out = Vec::with_capacity(unique.len());
        for frame in &unique {
            let outcome = renderer.draw(*frame, frames)?;
            out.push((outcome.drawn, renderer.readback()));
        }
        out
    };

    let (width, height) = rendered
        .first()
        .map(|(_, f)| (f.width, f.height))
        .unwrap_or_default();
    sink.begin(SinkConfig {
        width,
        height,
        steps: steps.len(),
    })?;

    let mut fallbacks = 0;
    for s in steps {
        let slot = slot_of
            .get(&s.frame)
            .copied()
            .ok_or_else(|| ReelError::render("internal error: sweep frame was not rendered"))?;
        let (drawn, rgba) = &rendered[slot];
        if *drawn != Some(s.frame) {
            fallbacks += 1;
        }
        sink.push_frame(s.index, s.frame, rgba)?;
    }
    sink.end()?;

    let stats = SweepStats {
        steps: steps.len(),
        frames_rendered: unique.len(),
        fallbacks,
    };
    tracing::debug!(?stats, "sweep rendered");
    Ok(stats)
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::validation(
            "sweep 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
