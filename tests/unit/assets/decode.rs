use super::*;
use std::io::Cursor;

fn encode(img: &image::RgbaImage, format: image::ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

#[test]
fn decode_png_premultiplies_and_keeps_size() {
    let mut img = image::RgbaImage::new(4, 3);
    img.put_pixel(0, 0, image::Rgba([255, 0, 0, 128]));
    let bytes = encode(&img, image::ImageFormat::Png);

    let raster = decode_image(&bytes).unwrap();
    assert_eq!((raster.width(), raster.height()), (4, 3));
    assert_eq!(&raster.data()[..4], &[128, 0, 0, 128]);
    assert_eq!(raster.canvas(), Canvas { width: 4, height: 3 });
}

#[test]
fn sniff_accepts_png_and_jpeg_only() {
    let img = image::RgbaImage::new(2, 2);
    let png = encode(&img, image::ImageFormat::Png);
    assert_eq!(sniff_upload_format(&png, None).unwrap(), UploadFormat::Png);

    let rgb = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();
    let mut jpeg = Cursor::new(Vec::new());
    rgb.write_to(&mut jpeg, image::ImageFormat::Jpeg).unwrap();
    assert_eq!(
        sniff_upload_format(jpeg.get_ref(), Some("image/jpg")).unwrap(),
        UploadFormat::Jpeg
    );

    let bmp = encode(&img, image::ImageFormat::Bmp);
    assert!(matches!(
        sniff_upload_format(&bmp, None),
        Err(BehindTextError::Upload(_))
    ));
    assert!(matches!(
        sniff_upload_format(b"not an image", None),
        Err(BehindTextError::Upload(_))
    ));
}

#[test]
fn declared_mime_must_be_accepted_type() {
    let png = encode(&image::RgbaImage::new(1, 1), image::ImageFormat::Png);
    assert!(sniff_upload_format(&png, Some("image/gif")).is_err());
    assert!(sniff_upload_format(&png, Some("IMAGE/PNG")).is_ok());
}

#[test]
fn raster_rejects_wrong_buffer_len() {
    assert!(RasterImage::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(RasterImage::from_premul_rgba8(0, 2, vec![]).is_err());
    let a = RasterImage::from_premul_rgba8(1, 1, vec![1, 2, 3, 4]).unwrap();
    let b = a.clone();
    assert!(a.same_pixels(&b));
}
