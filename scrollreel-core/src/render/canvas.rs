use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::decode::PreparedImage,
    foundation::core::{Affine, CssSize, FrameNumber, Rgba8},
    foundation::error::{ReelError, ReelResult},
    preload::frames::LoadedFrames,
    render::fit::{contain_fit, image_to_rect},
};

/// Renderer settings that do not change with the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSettings {
    /// Fill behind the image.
    pub background: Rgba8,
    /// The backing store never uses fewer device pixels per CSS pixel than this.
    pub min_pixel_ratio: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            background: Rgba8::opaque(0x07, 0x07, 0x07),
            min_pixel_ratio: 2.0,
        }
    }
}

/// A rendered canvas in RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 at pixel `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy, for encoders that expect it.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_in_place(&mut out);
        }
        out
    }
}

/// What a `draw` call painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DrawOutcome {
    /// Frame the caller asked for.
    pub requested: FrameNumber,
    /// Frame actually painted; earlier than `requested` when falling back, `None` when only the
    /// background was cleared.
    pub drawn: Option<FrameNumber>,
}

#[derive(Clone)]
struct ImagePaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

/// CPU canvas that paints one sequence frame at a time, letterboxed over a solid background.
pub struct CanvasRenderer {
    settings: CanvasSettings,
    css: CssSize,
    pixel_ratio: f64,
    pixmap: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
    paints: HashMap<FrameNumber, ImagePaint>,
}

impl std::fmt::Debug for CanvasRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasRenderer")
            .field("css", &self.css)
            .field("pixel_ratio", &self.pixel_ratio)
            .field("size_px", &self.size_px())
            .field("cached_paints", &self.paints.len())
            .finish()
    }
}

impl CanvasRenderer {
    /// Canvas of `css` size at `max(dpr, min_pixel_ratio)` device pixels per CSS pixel.
    pub fn new(
        css: CssSize,
        device_pixel_ratio: f64,
        settings: CanvasSettings,
    ) -> ReelResult<Self> {
        let (pixel_ratio, w, h) = backing_size(css, device_pixel_ratio, &settings)?;
        Ok(Self {
            settings,
            css,
            pixel_ratio,
            pixmap: vello_cpu::Pixmap::new(w, h),
            ctx: None,
            paints: HashMap::new(),
        })
    }

    /// Re-dimension the backing store. Cached image paints survive.
    pub fn resize(&mut self, css: CssSize, device_pixel_ratio: f64) -> ReelResult<()> {
        let (pixel_ratio, w, h) = backing_size(css, device_pixel_ratio, &self.settings)?;
        self.css = css;
        self.pixel_ratio = pixel_ratio;
        if self.pixmap.width() != w || self.pixmap.height() != h {
            self.pixmap = vello_cpu::Pixmap::new(w, h);
        }
        Ok(())
    }

    /// Current size in CSS pixels.
    pub fn css_size(&self) -> CssSize {
        self.css
    }

    /// Effective device pixels per CSS pixel.
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Backing store size in device pixels.
    pub fn size_px(&self) -> (u32, u32) {
        (
            u32::from(self.pixmap.width()),
            u32::from(self.pixmap.height()),
        )
    }

    /// Settings the renderer was created with.
    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    /// Number of frames with a ready image paint.
    pub fn cached_paints(&self) -> usize {
        self.paints.len()
    }

    /// Clear to the background and paint `frame`, or the nearest earlier loaded frame.
    pub fn draw(&mut self, frame: FrameNumber, frames: &LoadedFrames) -> ReelResult<DrawOutcome> {
        let image = match frames.resolve(frame) {
            Some((f, img)) => Some((f, self.paint_for(f, img)?)),
            None => None,
        };

        let (w_u16, h_u16) = (self.pixmap.width(), self.pixmap.height());
        let (w, h) = (f64::from(w_u16), f64::from(h_u16));
        let bg = self.settings.background;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w_u16 && ctx.height() == h_u16 => ctx,
            _ => vello_cpu::RenderContext::new(w_u16, h_u16),
        };
        ctx.reset();

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));

        let drawn = image.map(|(f, p)| {
            let (iw, ih) = (f64::from(p.w), f64::from(p.h));
            let dst = contain_fit(iw, ih, w, h);
            ctx.set_transform(affine_to_cpu(image_to_rect(iw, ih, dst)));
            ctx.set_paint(p.paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
            f
        });

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
        self.ctx = Some(ctx);

        if let Some(f) = drawn
            && f != frame
        {
            tracing::debug!(requested = %frame, drawn = %f, "painted fallback frame");
        }
        Ok(DrawOutcome {
            requested: frame,
            drawn,
        })
    }

    /// Copy of the current canvas contents (premultiplied).
    pub fn readback(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.pixmap.width()),
            height: u32::from(self.pixmap.height()),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn paint_for(
        &mut self,
        frame: FrameNumber,
        image: &Arc<PreparedImage>,
    ) -> ReelResult<ImagePaint> {
        if let Some(p) = self.paints.get(&frame) {
            return Ok(p.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let paint = ImagePaint {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            w: image.width,
            h: image.height,
        };
        self.paints.insert(frame, paint.clone());
        Ok(paint)
    }
}

fn backing_size(
    css: CssSize,
    device_pixel_ratio: f64,
    settings: &CanvasSettings,
) -> ReelResult<(f64, u16, u16)> {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    let ratio = dpr.max(settings.min_pixel_ratio);
    let (w, h) = css.device_pixels(ratio);
    let to_u16 = |v: u32, what: &str| -> ReelResult<u16> {
        u16::try_from(v)
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| ReelError::render(format!("canvas {what} {v}px is out of range")))
    };
    Ok((ratio, to_u16(w, "width")?, to_u16(h, "height")?))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::render("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::render("image byte length does not match its size"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
