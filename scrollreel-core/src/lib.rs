//! Scrollreel is a scroll-driven image-sequence playback engine.
//!
//! A page scroll position is mapped onto an extended frame sequence (with dwell "holds"),
//! the matching frame is resolved from a two-wave background preload, and the image is
//! painted letterboxed onto a CPU canvas (`FrameRGBA`).
//!
//! # Pipeline overview
//!
//! 1. **Configure**: `EngineConfig` (preset or JSON) -> `FrameSequence` + `PhaseBoundaries`
//! 2. **Preload**: `FrameManifest` -> priority wave, then remaining wave, on a worker thread
//! 3. **Track**: scroll geometry -> progress -> frame number and story phase
//! 4. **Draw**: nearest loaded frame at or below the target, contain-fit onto the canvas
//!
//! Overlay opacity, snap-to-keyframe and the surrounding site routes are pure functions of
//! frame numbers and paths, so they can be driven from tests or the CLI without a browser.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod animation;
mod assets;
mod config;
mod foundation;
mod overlay;
mod preload;
mod render;
mod scroll;
mod sequence;
mod session;
mod site;

pub use animation::ease::Ease;
pub use assets::cache::{FsImageSource, ImageCache, ImageSource};
pub use assets::decode::{PreparedImage, decode_image};
pub use assets::manifest::{FrameManifest, FramePattern, normalize_rel_path};
pub use config::{EngineConfig, FrameCount};
pub use foundation::cancel::CancellationToken;
pub use foundation::core::{CssSize, FrameNumber, Rgba8};
pub use foundation::error::{ReelError, ReelResult};
pub use overlay::blocks::{
    BlockState, CardCorner, CardState, ChildState, CornerCard, CornerCardsConfig, GlowConfig,
    OverlayBlock, OverlayChild, OverlayConfig, OverlayState,
};
pub use overlay::opacity::{FrameMotion, OpacityWindow, frame_opacity, frame_position};
pub use preload::frames::LoadedFrames;
pub use preload::loader::{
    PreloadEvent, PreloadHandle, PreloadPlan, PreloadState, RunOutcome, WaveStatus, run_waves,
    spawn_preloader,
};
pub use render::canvas::{CanvasRenderer, CanvasSettings, DrawOutcome, FrameRGBA};
pub use render::fit::contain_fit;
pub use render::pipeline::{
    SWEEP_PX_PER_POSITION, SWEEP_VIEWPORT_PX, SweepOpts, SweepStats, SweepStep, render_sweep,
    sweep_frames,
};
pub use render::sink::{FrameSink, InMemorySink, PngDirSink, SinkConfig};
pub use scroll::snap::{SnapConfig, SnapController, SnapPoint, SnapTarget};
pub use scroll::tracker::{FrameUpdate, ScrollGeometry, ScrollTracker};
pub use sequence::holds::{HoldSpec, build_extended_sequence, validate_holds};
pub use sequence::mapper::FrameSequence;
pub use sequence::phase::{Phase, PhaseBoundaries, PhaseEnds};
pub use session::{HostEvent, ScrollKey, ScrollytellingSession, SessionAction, Viewport};
pub use site::content::{Article, CallToAction, Catalog, Course, Publication};
pub use site::routes::{Route, SolutionTopic};
pub use site::search::{PublicationFilter, available_years, parse_year_filter};
pub use site::view::{DisclosureKind, View, resolve, resolve_filtered};
