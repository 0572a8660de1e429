use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::core::FrameNumber,
    foundation::error::{ReelError, ReelResult},
    render::canvas::FrameRGBA,
};

/// Configuration provided to a [`FrameSink`] before a sweep starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in device pixels.
    pub width: u32,
    /// Frame height in device pixels.
    pub height: u32,
    /// Number of `push_frame` calls that will follow.
    pub steps: usize,
}

/// Consumer of rendered sweep steps.
///
/// `push_frame` is called once per step, in step order.
pub trait FrameSink: Send {
    /// Called once, before the first frame.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// One rendered step; `frame` is the sequence frame it shows.
    fn push_frame(&mut self, step: usize, frame: FrameNumber, rgba: &FrameRGBA) -> ReelResult<()>;
    /// Called once, after the last frame.
    fn end(&mut self) -> ReelResult<()>;
}

/// Keeps every pushed frame; for tests and digests.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(usize, FrameNumber, FrameRGBA)>,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Config from the last `begin`.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// `(step, frame, pixels)` in push order.
    pub fn frames(&self) -> &[(usize, FrameNumber, FrameRGBA)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.frames.clear();
        self.frames.reserve(cfg.steps);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, step: usize, frame: FrameNumber, rgba: &FrameRGBA) -> ReelResult<()> {
        self.frames.push((step, frame, rgba.clone()));
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        Ok(())
    }
}

/// Writes `step_NNNN_frame_NNN.png` files into a directory.
#[derive(Debug)]
pub struct PngDirSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PngDirSink {
    /// Sink writing into `dir`, created on `begin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in step order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for PngDirSink {
    fn begin(&mut self, _cfg: SinkConfig) -> ReelResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, step: usize, frame: FrameNumber, rgba: &FrameRGBA) -> ReelResult<()> {
        let path = self
            .dir
            .join(format!("step_{step:04}_frame_{:03}.png", frame.0));
        let img = image::RgbaImage::from_raw(rgba.width, rgba.height, rgba.to_straight_rgba8())
            .ok_or_else(|| ReelError::render("invalid rgba buffer size"))?;
        img.save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        tracing::debug!(dir = %self.dir.display(), files = self.written.len(), "png sweep written");
        Ok(())
    }
}
