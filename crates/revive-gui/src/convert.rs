use image::RgbaImage;

/// Convert straight-alpha RGBA pixels to an egui ColorImage, downscaling
/// so neither side exceeds `max_side` (the GPU texture limit).
pub fn rgba_to_color_image(image: &RgbaImage, max_side: usize) -> egui::ColorImage {
    let (w, h) = image.dimensions();
    let max_side = max_side.max(1) as u32;
    if w <= max_side && h <= max_side {
        return egui::ColorImage::from_rgba_unmultiplied(
            [w as usize, h as usize],
            image.as_raw(),
        );
    }

    let scale = max_side as f64 / w.max(h) as f64;
    let tw = ((w as f64 * scale).round() as u32).clamp(1, max_side);
    let th = ((h as f64 * scale).round() as u32).clamp(1, max_side);
    let small = image::imageops::thumbnail(image, tw, th);
    egui::ColorImage::from_rgba_unmultiplied([tw as usize, th as usize], small.as_raw())
}
