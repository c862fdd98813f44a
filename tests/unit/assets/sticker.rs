use super::*;
use crate::assets::color::Color;

fn dot_subject(size: u32) -> RasterImage {
    let mut data = vec![0u8; (size * size * 4) as usize];
    let c = size / 2;
    let i = ((c * size + c) * 4) as usize;
    data[i..i + 4].copy_from_slice(&[255, 0, 0, 255]);
    RasterImage::from_premul_rgba8(size, size, data).unwrap()
}

fn px(img: &RasterImage, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * img.width() + x) * 4) as usize;
    let d = img.data();
    [d[i], d[i + 1], d[i + 2], d[i + 3]]
}

#[test]
fn dilation_grows_by_radius() {
    let mut alpha = vec![0u8; 49];
    alpha[3 * 7 + 3] = 255;
    let out = dilate_disc(&alpha, 7, 7, 2);
    assert_eq!(out[3 * 7 + 5], 255);
    assert_eq!(out[3 * 7 + 6], 0);
    // Corner of the 5x5 square lies outside the disc.
    assert_eq!(out[7 + 1], 0);
    assert_eq!(dilate_disc(&alpha, 7, 7, 0), alpha);
}

fn dilate_reference(alpha: &[u8], w: u32, h: u32, r: u32) -> Vec<u8> {
    let (w, h, r) = (i64::from(w), i64::from(h), i64::from(r));
    let mut out = vec![0u8; alpha.len()];
    for y in 0..h {
        for x in 0..w {
            let mut m = 0u8;
            for dy in -r..=r {
                for dx in -r..=r {
                    let (sx, sy) = (x + dx, y + dy);
                    if dx * dx + dy * dy <= r * r && sx >= 0 && sy >= 0 && sx < w && sy < h {
                        m = m.max(alpha[(sy * w + sx) as usize]);
                    }
                }
            }
            out[(y * w + x) as usize] = m;
        }
    }
    out
}

#[test]
fn dilation_matches_per_pixel_disc() {
    let (w, h) = (23u32, 17u32);
    let alpha: Vec<u8> = (0..w * h)
        .map(|i| if (i * 37) % 11 == 0 { ((i * 91) % 256) as u8 } else { 0 })
        .collect();
    for r in [1, 2, 3, 5, 8, 30] {
        assert_eq!(dilate_disc(&alpha, w, h, r), dilate_reference(&alpha, w, h, r), "radius {r}");
    }
}

#[test]
fn widest_border_on_a_large_subject() {
    let (w, h) = (320u32, 240u32);
    let mut alpha = vec![0u8; (w * h) as usize];
    alpha[(120 * w + 160) as usize] = 200;
    let out = dilate_disc(&alpha, w, h, 50);
    assert_eq!(out[(120 * w + 210) as usize], 200);
    assert_eq!(out[(120 * w + 211) as usize], 0);
    assert_eq!(out[(70 * w + 160) as usize], 200);
    assert_eq!(out[(85 * w + 195) as usize], 200);
    assert_eq!(out[(84 * w + 196) as usize], 0);
}

#[test]
fn outline_keeps_size_and_subject_on_top() {
    let subject = dot_subject(11);
    let opts = StickerSettings {
        enabled: true,
        border_width: 2.0,
        border_color: Color::WHITE,
        shadow_opacity: 0.0,
        ..StickerSettings::default()
    };
    let out = OutlineSticker.create_sticker(&subject, &opts).unwrap();
    assert_eq!((out.width(), out.height()), (11, 11));
    assert_eq!(px(&out, 5, 5), [255, 0, 0, 255]);
    assert_eq!(px(&out, 7, 5), [255, 255, 255, 255]);
    assert_eq!(px(&out, 0, 0), [0, 0, 0, 0]);
}

#[test]
fn outline_casts_offset_shadow() {
    let subject = dot_subject(21);
    let opts = StickerSettings {
        border_width: 0.0,
        shadow_blur: 0.0,
        shadow_color: Color::BLACK,
        shadow_offset_x: 5.0,
        shadow_offset_y: 5.0,
        shadow_opacity: 100.0,
        ..StickerSettings::default()
    };
    let out = OutlineSticker.create_sticker(&subject, &opts).unwrap();
    assert_eq!(px(&out, 15, 15), [0, 0, 0, 255]);
}

#[test]
fn transparent_subject_is_rejected() {
    let subject = RasterImage::from_premul_rgba8(2, 2, vec![0u8; 16]).unwrap();
    let err = OutlineSticker
        .create_sticker(&subject, &StickerSettings::default())
        .unwrap_err();
    assert!(matches!(err, BehindTextError::Sticker(_)));
}

#[test]
fn closures_are_sticker_makers() {
    let maker =
        |s: &RasterImage, _: &StickerSettings| -> BehindTextResult<RasterImage> { Ok(s.clone()) };
    let subject = dot_subject(3);
    let out = maker
        .create_sticker(&subject, &StickerSettings::default())
        .unwrap();
    assert!(out.same_pixels(&subject));
}
