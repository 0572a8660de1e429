use crate::{
    animation::ease::Ease,
    foundation::core::{FrameNumber, Rgba8, Vec2},
    foundation::error::{ReelError, ReelResult},
    overlay::opacity::{FrameMotion, OpacityWindow, frame_position},
    sequence::phase::Phase,
};

/// A text/CTA block shown only while its phase is active.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayBlock {
    /// Stable key the host renders the block under.
    pub id: String,
    /// Phase during which the block exists at all.
    pub phase: Phase,
    /// Opacity envelope in frames.
    pub window: OpacityWindow,
    /// Staggered sub-elements (description, code snippet) with their own windows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OverlayChild>,
}

/// Staggered element inside an `OverlayBlock`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayChild {
    /// Key, unique within the parent block.
    pub id: String,
    /// Fades independently of the parent.
    pub window: OpacityWindow,
}

/// Viewport corner a card is pinned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardCorner {
    /// Top left.
    TopLeft,
    /// Top right.
    TopRight,
    /// Bottom left.
    BottomLeft,
    /// Bottom right.
    BottomRight,
}

impl CardCorner {
    /// Slide-in start offset in CSS pixels.
    pub fn entry_offset(self) -> Vec2 {
        match self {
            Self::TopLeft => Vec2::new(-100.0, -100.0),
            Self::TopRight => Vec2::new(100.0, -100.0),
            Self::BottomLeft => Vec2::new(-100.0, 100.0),
            Self::BottomRight => Vec2::new(100.0, 100.0),
        }
    }
}

/// Static content of one corner card.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CornerCard {
    /// Corner the card sits in; also picks its slide direction.
    pub position: CardCorner,
    /// Card heading.
    pub title: String,
    /// Headline figure, e.g. `35% faster`.
    pub metric: String,
    /// Target of the card's link.
    pub link: String,
    /// Border and metric color.
    pub accent: Rgba8,
}

/// Four-corner feature cards rendered during one frame range.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CornerCardsConfig {
    /// First frame the cards exist.
    pub visible_from: u32,
    /// Last frame the cards exist.
    pub visible_to: u32,
    /// Shared opacity envelope.
    pub window: OpacityWindow,
    /// Frame the slide-in starts.
    pub slide_from: u32,
    /// Frame the cards reach their corners.
    pub slide_to: u32,
    /// Curve of the slide-in.
    #[serde(default)]
    pub slide_ease: Ease,
    /// One entry per corner.
    pub cards: Vec<CornerCard>,
}

/// Canvas glow over a frame window.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlowConfig {
    /// First frame of the bump.
    pub window_start: u32,
    /// Last frame of the bump.
    pub window_end: u32,
    /// Intensity at the window edges.
    pub base: f64,
    /// Extra intensity at the window midpoint.
    pub amplitude: f64,
    /// Intensity outside the window.
    pub idle: f64,
}

impl GlowConfig {
    /// Canvas glow: a half-sine bump over the window, flat `idle` outside it.
    pub fn intensity(&self, frame: FrameNumber) -> f64 {
        let f = frame.0;
        if f < self.window_start || f > self.window_end || self.window_end == self.window_start {
            return self.idle;
        }
        let t = f64::from(f - self.window_start) / f64::from(self.window_end - self.window_start);
        self.base + (t * std::f64::consts::PI).sin() * self.amplitude
    }
}

/// Every overlay element, keyed by frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayConfig {
    /// Phase-bound text blocks.
    pub blocks: Vec<OverlayBlock>,
    /// Feature cards of the deep dive.
    pub corner_cards: CornerCardsConfig,
    /// Canvas glow.
    pub glow: GlowConfig,
}

/// A block as it appears at one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BlockState {
    /// Block id.
    pub id: String,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Child states, in configured order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildState>,
}

/// A child element as it appears at one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ChildState {
    /// Child id.
    pub id: String,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

/// A corner card as it appears at one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CardState {
    /// Corner.
    pub position: CardCorner,
    /// Card heading.
    pub title: String,
    /// Headline figure.
    pub metric: String,
    /// Link target.
    pub link: String,
    /// Accent color.
    pub accent: Rgba8,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Offset from the resting corner position, in CSS pixels.
    pub slide: Vec2,
    /// Hidden from assistive tech while fully transparent.
    pub hidden: bool,
}

/// Everything layered over the canvas for one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct OverlayState {
    /// Frame the state was computed for.
    pub frame: FrameNumber,
    /// Phase of that frame.
    pub phase: Phase,
    /// Blocks of `phase` only.
    pub blocks: Vec<BlockState>,
    /// Empty outside the card range.
    pub cards: Vec<CardState>,
    /// Glow intensity.
    pub glow: f64,
}

impl OverlayConfig {
    /// Every window must be ordered and the card range must fit `1..=total_frames`.
    pub fn validate(&self, total_frames: u32) -> ReelResult<()> {
        for b in &self.blocks {
            b.window
                .validate()
                .map_err(|e| ReelError::validation(format!("overlay block '{}': {e}", b.id)))?;
            for c in &b.children {
                c.window.validate().map_err(|e| {
                    ReelError::validation(format!("overlay block '{}/{}': {e}", b.id, c.id))
                })?;
            }
        }

        let cc = &self.corner_cards;
        cc.window.validate()?;
        if cc.visible_from > cc.visible_to || cc.visible_to > total_frames {
            return Err(ReelError::validation(format!(
                "corner cards range {}..={} is outside [1, {total_frames}]",
                cc.visible_from, cc.visible_to
            )));
        }
        if cc.slide_from > cc.slide_to {
            return Err(ReelError::validation("corner card slide range is reversed"));
        }
        if self.glow.window_start > self.glow.window_end {
            return Err(ReelError::validation("glow window is reversed"));
        }
        Ok(())
    }

    /// Overlay for `frame`. Blocks whose phase differs from `phase` are left out.
    pub fn state(&self, frame: FrameNumber, phase: Phase) -> OverlayState {
        let blocks = self
            .blocks
            .iter()
            .filter(|b| b.phase == phase)
            .map(|b| BlockState {
                id: b.id.clone(),
                opacity: b.window.opacity(frame),
                children: b
                    .children
                    .iter()
                    .map(|c| ChildState {
                        id: c.id.clone(),
                        opacity: c.window.opacity(frame),
                    })
                    .collect(),
            })
            .collect();

        OverlayState {
            frame,
            phase,
            blocks,
            cards: self.corner_cards.state(frame),
            glow: self.glow.intensity(frame),
        }
    }
}

impl CornerCardsConfig {
    /// Whether `frame` lies in `visible_from..=visible_to`.
    pub fn is_visible(&self, frame: FrameNumber) -> bool {
        (self.visible_from..=self.visible_to).contains(&frame.0)
    }

    /// Card states for `frame`, or none outside the visible range.
    pub fn state(&self, frame: FrameNumber) -> Vec<CardState> {
        if !self.is_visible(frame) {
            return Vec::new();
        }
        let opacity = self.window.opacity(frame);
        self.cards
            .iter()
            .map(|card| {
                let motion = FrameMotion {
                    start_frame: self.slide_from,
                    end_frame: self.slide_to,
                    from: card.position.entry_offset(),
                    to: Vec2::ZERO,
                    ease: self.slide_ease,
                };
                CardState {
                    position: card.position,
                    title: card.title.clone(),
                    metric: card.metric.clone(),
                    link: card.link.clone(),
                    accent: card.accent,
                    opacity,
                    slide: frame_position(&motion, frame),
                    hidden: opacity == 0.0,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/blocks.rs"]
mod tests;
