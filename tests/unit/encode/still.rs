use super::*;

fn frame() -> FrameRGBA {
    // Opaque red, then half-transparent premultiplied green.
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 0, 128, 0, 128],
        premultiplied: true,
    }
}

#[test]
fn file_names_follow_product_convention() {
    assert_eq!(StillFormat::Png.file_name(), "behindtext-effect.png");
    assert_eq!(StillFormat::Jpeg.file_name(), "behindtext-effect.jpeg");
}

#[test]
fn png_keeps_transparency_as_straight_alpha() {
    let bytes = encode_still(&frame(), StillFormat::Png).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    let px = img.get_pixel(1, 0).0;
    assert_eq!(px[3], 128);
    assert!(px[1] >= 254, "green is un-premultiplied, got {px:?}");
}

#[test]
fn jpeg_is_opaque_and_flattened_over_black() {
    let bytes = encode_still(&frame(), StillFormat::Jpeg).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
    let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (2, 1));
}

#[test]
fn malformed_frame_is_rejected() {
    let mut f = frame();
    f.data.truncate(4);
    assert!(encode_still(&f, StillFormat::Png).is_err());
}
