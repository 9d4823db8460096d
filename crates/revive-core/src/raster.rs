//! Commit pending edits into pixels.
//!
//! The source is conceptually drawn onto an intermediate surface large enough
//! to hold it rotated, then a region of that surface (the crop box or the
//! visible edit viewport) is copied 1:1 into the output. Both steps collapse
//! into one inverse mapping, so every output pixel is sampled exactly once.

use image::{DynamicImage, Rgba, RgbaImage};
use tracing::{debug, info, warn};

use crate::config::ExportConfig;
use crate::consts::{MAX_SURFACE_PIXELS, MAX_SURFACE_SIDE};
use crate::edit::EditParameters;
use crate::error::{ReviveError, Result};
use crate::geometry::{
    display_origin, screen_rect_to_source_rect, Affine, Container, Dimensions, SourceRect, Vec2,
};
use crate::payload::{encode_image, ImagePayload};
use crate::view::ViewState;

/// Everything needed to commit an edit session, detached from the viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterRequest {
    pub params: EditParameters,
    /// Edit view at apply time.
    pub view: ViewState,
    pub container: Container,
    pub export: ExportConfig,
}

impl RasterRequest {
    /// Headless request: the container is the rotated bounds at zoom 1, so a
    /// crop box is given in rotated-image pixels.
    pub fn for_image(source: Dimensions, params: EditParameters, export: ExportConfig) -> Self {
        let bounds = params.rotated_bounds(source);
        Self {
            params,
            view: ViewState::centered(1.0),
            container: Container::sized(bounds.width as f64, bounds.height as f64),
            export,
        }
    }
}

/// Geometry of one commit, computed without touching pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterPlan {
    pub source: Dimensions,
    /// Intermediate surface holding the rotated image.
    pub surface: Dimensions,
    /// Source pixel space to surface pixel space.
    pub surface_transform: Affine,
    /// Region of the surface copied into the output. Not clamped.
    pub crop: SourceRect,
    pub output: Dimensions,
}

fn check_surface(dims: Dimensions) -> Result<()> {
    let pixels = dims.width as u64 * dims.height as u64;
    if dims.width > MAX_SURFACE_SIDE || dims.height > MAX_SURFACE_SIDE || pixels > MAX_SURFACE_PIXELS
    {
        return Err(ReviveError::SurfaceUnavailable {
            width: dims.width,
            height: dims.height,
        });
    }
    Ok(())
}

/// Compute surface, crop region and output size for `source`.
pub fn plan(source: Dimensions, request: &RasterRequest) -> Result<RasterPlan> {
    let params = &request.params;
    let surface = params.rotated_bounds(source);
    check_surface(surface)?;

    let surface_transform = Affine::translate(Vec2::new(
        -(source.width as f64) / 2.0,
        -(source.height as f64) / 2.0,
    ))
    .then(&params.edit_transform())
    .then(&Affine::translate(Vec2::new(
        surface.width as f64 / 2.0,
        surface.height as f64 / 2.0,
    )));

    let container = request.container;
    let origin = display_origin(
        container.size,
        surface.to_size(),
        request.view.zoom,
        request.view.pan,
    );
    let region = match params.crop_box() {
        Some(rect) => rect.normalized().translated(Vec2::ZERO - container.origin),
        None => container.local_rect(),
    };
    let crop = screen_rect_to_source_rect(&region, origin, request.view.zoom);
    let output = crop.output_dimensions();
    check_surface(output)?;

    debug!(
        %source,
        %surface,
        %output,
        crop_x = crop.x,
        crop_y = crop.y,
        "Raster plan"
    );

    Ok(RasterPlan {
        source,
        surface,
        surface_transform,
        crop,
        output,
    })
}

/// Premultiplied bilinear sample at pixel-index coordinates. Taps outside
/// the image are transparent.
fn bilinear_sample(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (w, h) = image.dimensions();

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = (x - x0 as f64) as f32;
    let fy = (y - y0 as f64) as f32;

    let inside = |c: i64, r: i64| c >= 0 && c < w as i64 && r >= 0 && r < h as i64;

    if fx == 0.0 && fy == 0.0 {
        return if inside(x0, y0) {
            *image.get_pixel(x0 as u32, y0 as u32)
        } else {
            Rgba([0, 0, 0, 0])
        };
    }

    let mut acc = [0.0f32; 4];
    let taps = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1, y0, fx * (1.0 - fy)),
        (x0, y0 + 1, (1.0 - fx) * fy),
        (x0 + 1, y0 + 1, fx * fy),
    ];
    for (c, r, weight) in taps {
        if weight == 0.0 || !inside(c, r) {
            continue;
        }
        let [pr, pg, pb, pa] = image.get_pixel(c as u32, r as u32).0;
        let a = pa as f32 / 255.0 * weight;
        acc[0] += pr as f32 * a;
        acc[1] += pg as f32 * a;
        acc[2] += pb as f32 * a;
        acc[3] += a;
    }

    if acc[3] <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let unpremultiply = |v: f32| (v / acc[3]).round().clamp(0.0, 255.0) as u8;
    Rgba([
        unpremultiply(acc[0]),
        unpremultiply(acc[1]),
        unpremultiply(acc[2]),
        (acc[3] * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Produce the output pixels of `plan` from `source`.
pub fn execute(plan: &RasterPlan, source: &RgbaImage) -> RgbaImage {
    let Some(inverse) = plan.surface_transform.inverse() else {
        return RgbaImage::new(plan.output.width, plan.output.height);
    };
    let crop = plan.crop;
    RgbaImage::from_fn(plan.output.width, plan.output.height, |ox, oy| {
        // Output pixel centers map 1:1 onto the crop region of the surface.
        let on_surface = Vec2::new(crop.x + ox as f64 + 0.5, crop.y + oy as f64 + 0.5);
        let src = inverse.apply(on_surface);
        bilinear_sample(source, src.x - 0.5, src.y - 0.5)
    })
}

/// Plan and execute against a decoded image, without encoding.
pub fn render(source: &DynamicImage, request: &RasterRequest) -> Result<RgbaImage> {
    let dims = Dimensions::new(source.width(), source.height());
    let plan = plan(dims, request)?;
    Ok(execute(&plan, &source.to_rgba8()))
}

/// Commit `request` onto `source` and encode the result as `mime_type`.
pub fn rasterize(
    source: &DynamicImage,
    request: &RasterRequest,
    mime_type: &str,
) -> Result<ImagePayload> {
    let pixels = render(source, request).inspect_err(|e| {
        if e.is_silent() {
            warn!("Drawing surface unavailable, apply aborted: {e}");
        }
    })?;
    let payload = encode_image(&pixels, mime_type, &request.export)?;
    info!(
        width = pixels.width(),
        height = pixels.height(),
        mime = %payload.mime_type,
        bytes = payload.bytes.len(),
        "Edits rasterized"
    );
    Ok(payload)
}

/// Decode `source` and commit `request`, keeping its mime type.
pub fn rasterize_payload(source: &ImagePayload, request: &RasterRequest) -> Result<ImagePayload> {
    let image = source.decode()?;
    rasterize(&image, request, &source.mime_type)
}
