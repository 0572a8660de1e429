use super::*;

const BG: [u8; 4] = [7, 7, 7, 255];

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> Arc<PreparedImage> {
    let data = rgba.repeat((w * h) as usize);
    Arc::new(PreparedImage::from_straight_rgba8(w, h, data))
}

fn unit_ratio() -> CanvasSettings {
    CanvasSettings {
        min_pixel_ratio: 1.0,
        ..CanvasSettings::default()
    }
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2)
}

#[test]
fn backing_store_uses_at_least_min_ratio() {
    let css = CssSize::new(100.0, 50.5).unwrap();
    let r = CanvasRenderer::new(css, 1.0, CanvasSettings::default()).unwrap();
    assert_eq!(r.pixel_ratio(), 2.0);
    assert_eq!(r.size_px(), (200, 101));

    let r = CanvasRenderer::new(css, 3.0, CanvasSettings::default()).unwrap();
    assert_eq!(r.size_px(), (300, 152));
}

#[test]
fn oversized_canvas_is_a_render_error() {
    let css = CssSize::new(40_000.0, 10.0).unwrap();
    let err = CanvasRenderer::new(css, 2.0, CanvasSettings::default()).unwrap_err();
    assert!(matches!(err, ReelError::Render(_)));
}

#[test]
fn nothing_loaded_clears_to_background() {
    let css = CssSize::new(8.0, 8.0).unwrap();
    let mut r = CanvasRenderer::new(css, 1.0, unit_ratio()).unwrap();
    let out = r.draw(FrameNumber(3), &LoadedFrames::new()).unwrap();
    assert_eq!(out.drawn, None);

    let frame = r.readback();
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 8 * 8 * 4);
    assert!(frame.data.chunks_exact(4).all(|px| px == BG));
}

#[test]
fn wide_frame_is_letterboxed() {
    let css = CssSize::new(8.0, 8.0).unwrap();
    let mut r = CanvasRenderer::new(css, 1.0, unit_ratio()).unwrap();
    let mut loaded = LoadedFrames::new();
    loaded.insert(FrameNumber(1), solid(4, 2, [255, 0, 0, 255]));

    let out = r.draw(FrameNumber(1), &loaded).unwrap();
    assert_eq!(out.drawn, Some(FrameNumber(1)));

    let f = r.readback();
    assert_eq!(f.pixel(4, 0), Some(BG));
    assert_eq!(f.pixel(4, 7), Some(BG));
    assert!(close(f.pixel(4, 4).unwrap(), [255, 0, 0, 255]));
    assert!(close(f.pixel(0, 3).unwrap(), [255, 0, 0, 255]));
}

#[test]
fn tall_frame_is_pillarboxed() {
    let css = CssSize::new(8.0, 8.0).unwrap();
    let mut r = CanvasRenderer::new(css, 1.0, unit_ratio()).unwrap();
    let mut loaded = LoadedFrames::new();
    loaded.insert(FrameNumber(1), solid(2, 4, [0, 0, 255, 255]));
    r.draw(FrameNumber(1), &loaded).unwrap();

    let f = r.readback();
    assert_eq!(f.pixel(0, 4), Some(BG));
    assert_eq!(f.pixel(7, 4), Some(BG));
    assert!(close(f.pixel(4, 4).unwrap(), [0, 0, 255, 255]));
}

#[test]
fn missing_frame_paints_nearest_earlier_one() {
    let css = CssSize::new(4.0, 4.0).unwrap();
    let mut r = CanvasRenderer::new(css, 1.0, unit_ratio()).unwrap();
    let mut loaded = LoadedFrames::new();
    loaded.insert(FrameNumber(1), solid(1, 1, [0, 255, 0, 255]));

    let out = r.draw(FrameNumber(3), &loaded).unwrap();
    assert_eq!(
        out,
        DrawOutcome {
            requested: FrameNumber(3),
            drawn: Some(FrameNumber(1)),
        }
    );
    assert!(close(r.readback().pixel(2, 2).unwrap(), [0, 255, 0, 255]));
}

#[test]
fn paints_are_cached_per_frame_and_survive_resize() {
    let css = CssSize::new(4.0, 4.0).unwrap();
    let mut r = CanvasRenderer::new(css, 1.0, unit_ratio()).unwrap();
    let mut loaded = LoadedFrames::new();
    loaded.insert(FrameNumber(1), solid(2, 2, [10, 20, 30, 255]));

    r.draw(FrameNumber(1), &loaded).unwrap();
    r.draw(FrameNumber(2), &loaded).unwrap();
    assert_eq!(r.cached_paints(), 1);

    r.resize(CssSize::new(6.0, 3.0).unwrap(), 2.0).unwrap();
    assert_eq!(r.size_px(), (12, 6));
    assert_eq!(r.cached_paints(), 1);
    r.draw(FrameNumber(1), &loaded).unwrap();
    assert_eq!(r.readback().data.len(), 12 * 6 * 4);
}

#[test]
fn straight_conversion_undoes_premultiply() {
    let f = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 32, 128],
        premultiplied: true,
    };
    assert_eq!(f.to_straight_rgba8(), vec![128, 0, 64, 128]);
    assert_eq!(f.pixel(1, 0), None);
}
