use image::{DynamicImage, Rgba, RgbaImage};

use revive_core::geometry::{Container, Dimensions};
use revive_core::payload::{encode_image, ImagePayload};
use revive_core::config::ExportConfig;
use revive_core::view::{ProbedDimensions, Viewer};

/// Opaque image where every pixel encodes its own coordinates:
/// `r = x`, `g = y`, `b = x ^ y` (all mod 256).
pub fn coordinate_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8, 255])
    })
}

/// Opaque image: left half red, right half blue.
pub fn split_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    })
}

pub fn dynamic(image: RgbaImage) -> DynamicImage {
    DynamicImage::ImageRgba8(image)
}

/// PNG payload of `image`.
pub fn png_payload(image: &RgbaImage) -> ImagePayload {
    encode_image(image, "image/png", &ExportConfig::default()).unwrap()
}

/// Viewer with a container and after (and optional before) dimensions set.
pub fn viewer_with(
    container: (f64, f64),
    before: Option<(u32, u32)>,
    after: Option<(u32, u32)>,
) -> Viewer {
    let mut viewer = Viewer::default();
    viewer.set_container(Container::sized(container.0, container.1));
    let generation = viewer.begin_dimension_probe();
    let dims = ProbedDimensions {
        before: before.map(|(w, h)| Dimensions::new(w, h)),
        after: after.map(|(w, h)| Dimensions::new(w, h)),
    };
    viewer.finish_dimension_probe(generation, Ok(dims)).unwrap();
    viewer
}
