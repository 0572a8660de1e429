use crate::foundation::core::{Affine, Rect};

/// Largest rect with the image's aspect ratio that fits the canvas, centered.
///
/// Wide images leave bars above and below; tall images leave bars at the sides.
pub fn contain_fit(image_w: f64, image_h: f64, canvas_w: f64, canvas_h: f64) -> Rect {
    if !(image_w > 0.0 && image_h > 0.0 && canvas_w > 0.0 && canvas_h > 0.0) {
        return Rect::ZERO;
    }
    let image_aspect = image_w / image_h;
    let canvas_aspect = canvas_w / canvas_h;

    let (w, h) = if image_aspect > canvas_aspect {
        (canvas_w, canvas_w / image_aspect)
    } else {
        (canvas_h * image_aspect, canvas_h)
    };
    let x = (canvas_w - w) / 2.0;
    let y = (canvas_h - h) / 2.0;
    Rect::new(x, y, x + w, y + h)
}

/// Maps image space `(0, 0)..(image_w, image_h)` onto `dst`.
pub(crate) fn image_to_rect(image_w: f64, image_h: f64, dst: Rect) -> Affine {
    Affine::translate((dst.x0, dst.y0))
        * Affine::scale_non_uniform(dst.width() / image_w, dst.height() / image_h)
}

#[cfg(test)]
#[path = "../../tests/unit/render/fit.rs"]
mod tests;
