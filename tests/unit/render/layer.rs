use super::*;
use crate::assets::color::Color;
use crate::scene::model::LayerShadow;

fn gradient(w: u32, h: u32) -> RasterImage {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend([(x * 20) as u8, (y * 30) as u8, 128, 255]);
        }
    }
    RasterImage::from_premul_rgba8(w, h, data).unwrap()
}

fn draw(image: &RasterImage, settings: &ImageLayerSettings) -> Surface {
    let mut raster = Rasterizer::new();
    let mut surface = Surface::new(image.canvas()).unwrap();
    draw_image_layer(&mut raster, &mut surface, image, settings).unwrap();
    surface
}

#[test]
fn neutral_settings_are_pixel_identical() {
    let img = gradient(8, 6);
    let surface = draw(&img, &ImageLayerSettings::default());
    assert_eq!(surface.data(), img.data());
}

#[test]
fn neutral_transform_is_identity() {
    let canvas = Canvas::new(40, 30).unwrap();
    assert_eq!(layer_transform(canvas, 0.0, 1.0), Affine::IDENTITY);
}

#[test]
fn transform_pivots_on_canvas_centre() {
    let canvas = Canvas::new(40, 30).unwrap();
    let c = canvas.center();
    let t = layer_transform(canvas, 37.0, 2.5);
    let moved = t * c;
    assert!((moved - c).hypot() < 1e-9);
}

#[test]
fn rotation_limits_are_equivalent() {
    let canvas = Canvas::new(40, 30).unwrap();
    let a = layer_transform(canvas, -180.0, 1.0).as_coeffs();
    let b = layer_transform(canvas, 180.0, 1.0).as_coeffs();
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < 1e-9);
    }
}

#[test]
fn scale_limits_draw_without_error() {
    let img = gradient(8, 8);
    for scale in [0.1, 3.0] {
        let settings = ImageLayerSettings {
            scale,
            ..ImageLayerSettings::default()
        };
        let surface = draw(&img, &settings);
        assert_eq!(surface.data().len(), img.data().len());
    }
}

#[test]
fn half_scale_leaves_border_transparent() {
    let img = RasterImage::from_premul_rgba8(16, 16, [255u8; 4].repeat(256)).unwrap();
    let settings = ImageLayerSettings {
        scale: 0.5,
        ..ImageLayerSettings::default()
    };
    let surface = draw(&img, &settings);
    assert_eq!(surface.data()[3], 0, "corner is outside the scaled image");
    let centre = ((8 * 16 + 8) * 4) as usize;
    assert_eq!(surface.data()[centre + 3], 255);
}

#[test]
fn opacity_scales_alpha() {
    let img = RasterImage::from_premul_rgba8(1, 1, vec![255, 255, 255, 255]).unwrap();
    let settings = ImageLayerSettings {
        opacity: 50.0,
        ..ImageLayerSettings::default()
    };
    let surface = draw(&img, &settings);
    assert!((127..=128).contains(&surface.data()[3]));

    let hidden = ImageLayerSettings {
        opacity: 0.0,
        ..ImageLayerSettings::default()
    };
    assert!(draw(&img, &hidden).data().iter().all(|&b| b == 0));
}

#[test]
fn stretches_to_fill_canvas() {
    let img = RasterImage::from_premul_rgba8(2, 2, [0u8, 0, 255, 255].repeat(4)).unwrap();
    let mut raster = Rasterizer::new();
    let mut surface = Surface::new(Canvas::new(10, 6).unwrap()).unwrap();
    draw_image_layer(&mut raster, &mut surface, &img, &ImageLayerSettings::default()).unwrap();
    let centre = ((3 * 10 + 5) * 4) as usize;
    assert_eq!(surface.data()[centre + 3], 255);
    assert!(surface.data()[centre + 2] > 200);
}

#[test]
fn enabled_shadow_draws_below_subject() {
    let mut data = vec![0u8; 10 * 10 * 4];
    let i = ((2 * 10 + 2) * 4) as usize;
    data[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
    let img = RasterImage::from_premul_rgba8(10, 10, data).unwrap();
    let settings = ImageLayerSettings {
        shadow: LayerShadow {
            enabled: true,
            blur: 0.0,
            color: Color::rgb(0, 255, 0),
            offset_x: 3.0,
            offset_y: 3.0,
            opacity: 100.0,
        },
        ..ImageLayerSettings::default()
    };
    let surface = draw(&img, &settings);
    let s = ((5 * 10 + 5) * 4) as usize;
    assert_eq!(&surface.data()[s..s + 4], &[0, 255, 0, 255]);
    assert_eq!(&surface.data()[i..i + 4], &[255, 255, 255, 255]);
}
