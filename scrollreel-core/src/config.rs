use std::{fs::File, io::BufReader, path::Path};

use crate::{
    assets::manifest::{FrameManifest, FramePattern},
    foundation::core::Rgba8,
    foundation::error::{ReelError, ReelResult},
    overlay::blocks::OverlayConfig,
    render::canvas::CanvasSettings,
    scroll::snap::SnapConfig,
    sequence::holds::{HoldSpec, build_extended_sequence, validate_holds},
    sequence::mapper::FrameSequence,
    sequence::phase::{PhaseBoundaries, PhaseEnds},
};

/// Frame counts that ship with a tuned configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameCount {
    /// 50 frames.
    N50,
    /// 100 frames.
    N100,
    /// 200 frames.
    N200,
}

impl FrameCount {
    /// Every shipped count, smallest first.
    pub const ALL: [Self; 3] = [Self::N50, Self::N100, Self::N200];

    /// Frame count N.
    pub fn total_frames(self) -> u32 {
        match self {
            Self::N50 => 50,
            Self::N100 => 100,
            Self::N200 => 200,
        }
    }

    /// Preset for exactly `total_frames`, if one ships.
    pub fn from_total(total_frames: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.total_frames() == total_frames)
    }

    fn preset_json(self) -> &'static str {
        match self {
            Self::N50 => include_str!("../presets/n50.json"),
            Self::N100 => include_str!("../presets/n100.json"),
            Self::N200 => include_str!("../presets/n200.json"),
        }
    }
}

/// Everything the engine needs for one image sequence.
///
/// Values are explicit: presets carry their own tuned phase boundaries, overlay windows and
/// snap points rather than deriving them from `total_frames`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// Number of images in the sequence (N).
    pub total_frames: u32,
    /// Size of the first load wave (frames `1..=priority_count`).
    pub priority_count: u32,
    /// Frames that dwell for extra scroll positions.
    #[serde(default)]
    pub holds: Vec<HoldSpec>,
    /// Last frame of each of the first three story phases.
    pub phases: PhaseEnds,
    /// How frame files are named on disk.
    pub frames: FramePattern,
    /// Canvas fill behind the letterboxed image.
    #[serde(default = "default_background")]
    pub background: Rgba8,
    /// Lower bound applied to the host's device pixel ratio.
    #[serde(default = "default_min_pixel_ratio")]
    pub min_pixel_ratio: f64,
    /// Prefix the site is served under; only routing uses it.
    #[serde(default)]
    pub base_path: String,
    /// Scroll distance of one arrow key press.
    #[serde(default = "default_key_scroll_px")]
    pub key_scroll_px: f64,
    /// Frame-keyed overlay content.
    pub overlay: OverlayConfig,
    /// Snap-to-keyframe behaviour.
    pub snap: SnapConfig,
}

fn default_background() -> Rgba8 {
    Rgba8::opaque(0x07, 0x07, 0x07)
}

fn default_min_pixel_ratio() -> f64 {
    2.0
}

fn default_key_scroll_px() -> f64 {
    100.0
}

impl EngineConfig {
    /// Built-in configuration for `count`.
    pub fn preset(count: FrameCount) -> ReelResult<Self> {
        Self::from_json_str(count.preset_json())
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse and validate a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| ReelError::serde(format!("parse engine config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::validation(format!("open engine config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Cross-field checks: counts, holds, phases, overlay windows and snap points must fit N.
    pub fn validate(&self) -> ReelResult<()> {
        if self.total_frames == 0 {
            return Err(ReelError::validation("total_frames must be > 0"));
        }
        if self.priority_count == 0 || self.priority_count > self.total_frames {
            return Err(ReelError::validation(format!(
                "priority_count must be in [1, {}], got {}",
                self.total_frames, self.priority_count
            )));
        }
        if !self.min_pixel_ratio.is_finite() || self.min_pixel_ratio <= 0.0 {
            return Err(ReelError::validation(
                "min_pixel_ratio must be finite and > 0",
            ));
        }
        if !self.key_scroll_px.is_finite() || self.key_scroll_px < 0.0 {
            return Err(ReelError::validation(
                "key_scroll_px must be finite and >= 0",
            ));
        }
        if self.frames.digits == 0 {
            return Err(ReelError::validation("frames.digits must be > 0"));
        }
        if !self.base_path.is_empty() && !self.base_path.starts_with('/') {
            return Err(ReelError::validation(format!(
                "base_path '{}' must start with '/'",
                self.base_path
            )));
        }

        validate_holds(self.total_frames, &self.holds)?;
        PhaseBoundaries::new(self.total_frames, self.phases)?;
        self.overlay.validate(self.total_frames)?;
        self.snap.validate(self.total_frames)?;
        Ok(())
    }

    /// Extended frame table with the configured holds.
    pub fn sequence(&self) -> ReelResult<FrameSequence> {
        build_extended_sequence(self.total_frames, &self.holds)
    }

    /// Story phase ranges over `1..=total_frames`.
    pub fn phase_boundaries(&self) -> ReelResult<PhaseBoundaries> {
        PhaseBoundaries::new(self.total_frames, self.phases)
    }

    /// Manifest derived from the file pattern, without touching the filesystem.
    pub fn manifest(&self) -> ReelResult<FrameManifest> {
        FrameManifest::from_pattern(&self.frames, self.total_frames)
    }

    /// Settings the canvas renderer needs.
    pub fn canvas_settings(&self) -> CanvasSettings {
        CanvasSettings {
            background: self.background,
            min_pixel_ratio: self.min_pixel_ratio,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
