use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let prepared = decode_image(&png_bytes(3, 2, [100, 50, 200, 128])).unwrap();
    assert_eq!((prepared.width, prepared.height), (3, 2));
    assert_eq!(prepared.rgba8_premul.len(), 3 * 2 * 4);
    assert_eq!(
        &prepared.rgba8_premul[..4],
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn opaque_and_transparent_pixels() {
    let img = PreparedImage::from_straight_rgba8(2, 1, vec![10, 20, 30, 255, 10, 20, 30, 0]);
    assert_eq!(img.rgba8_premul.as_slice(), &[10, 20, 30, 255, 0, 0, 0, 0]);
}

#[test]
fn garbage_bytes_fail() {
    assert!(decode_image(b"not an image").is_err());
}
