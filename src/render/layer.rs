//! Filter/Transform Compositor: draws one image layer onto a surface.

use crate::assets::decode::RasterImage;
use crate::effects::composite::{ShadowParams, cast_shadow, over_in_place};
use crate::effects::filter::FilterChain;
use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::BehindTextResult;
use crate::foundation::math::deg_to_rad;
use crate::render::surface::{Rasterizer, Surface, affine_to_cpu};
use crate::scene::model::ImageLayerSettings;

/// Rotation and uniform scale about the canvas centre.
pub fn layer_transform(canvas: Canvas, rotation_deg: f64, scale: f64) -> Affine {
    let c = canvas.center().to_vec2();
    Affine::translate(c)
        * Affine::rotate(deg_to_rad(rotation_deg))
        * Affine::scale(scale)
        * Affine::translate(-c)
}

/// Stretch image pixel space onto the full canvas rectangle.
pub fn image_to_canvas(image: &RasterImage, canvas: Canvas) -> Affine {
    Affine::scale_non_uniform(
        f64::from(canvas.width) / f64::from(image.width()),
        f64::from(canvas.height) / f64::from(image.height()),
    )
}

/// Draw `image` stretched over the canvas with the layer's transform, filters, shadow and
/// opacity, compositing source-over onto `dst`.
///
/// Every call starts from fresh state; nothing carries over to the next layer.
pub(crate) fn draw_image_layer(
    raster: &mut Rasterizer,
    dst: &mut Surface,
    image: &RasterImage,
    settings: &ImageLayerSettings,
) -> BehindTextResult<()> {
    let canvas = dst.canvas();
    let opacity = (settings.opacity / 100.0).clamp(0.0, 1.0) as f32;
    if opacity <= 0.0 {
        return Ok(());
    }

    let transform =
        layer_transform(canvas, settings.rotation, settings.scale) * image_to_canvas(image, canvas);
    let mut pixels = if transform == Affine::IDENTITY {
        image.data().to_vec()
    } else {
        let paint = raster.image_paint(image)?;
        let (iw, ih) = (f64::from(image.width()), f64::from(image.height()));
        raster.render_layer(canvas, |ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
            Ok(())
        })?
    };

    FilterChain::from_layer(settings).apply_in_place(&mut pixels, canvas.width, canvas.height)?;

    if settings.shadow.enabled {
        let shadow = ShadowParams {
            color: settings
                .shadow
                .color
                .with_opacity(settings.shadow.opacity / 100.0),
            blur: settings.shadow.blur,
            offset_x: settings.shadow.offset_x,
            offset_y: settings.shadow.offset_y,
        };
        if !shadow.is_invisible() {
            let cast = cast_shadow(&pixels, canvas.width, canvas.height, &shadow)?;
            over_in_place(dst.data_mut(), &cast, opacity)?;
        }
    }

    over_in_place(dst.data_mut(), &pixels, opacity)
}

#[cfg(test)]
#[path = "../../tests/unit/render/layer.rs"]
mod tests;
