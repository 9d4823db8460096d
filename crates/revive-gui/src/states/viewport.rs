use image::RgbaImage;
use revive_core::compare::ImageRole;
use revive_core::filter::FilterPreset;

use crate::convert::rgba_to_color_image;

/// Decoded pixels of one image plus the textures built from them.
pub struct LoadedImage {
    pub pixels: RgbaImage,
    pub plain: egui::TextureHandle,
    /// Texture with the preview filter baked in, and the filter it holds.
    pub filtered: Option<(FilterPreset, egui::TextureHandle)>,
}

impl LoadedImage {
    pub fn texture(&self, filter: FilterPreset) -> &egui::TextureHandle {
        match &self.filtered {
            Some((f, tex)) if *f == filter && !filter.is_none() => tex,
            _ => &self.plain,
        }
    }
}

/// Viewport display state.
#[derive(Default)]
pub struct ViewportState {
    pub before: Option<LoadedImage>,
    pub after: Option<LoadedImage>,
    /// A pair is being probed and decoded.
    pub loading: bool,
    pub viewing_label: String,
}

impl ViewportState {
    pub fn image(&self, role: ImageRole) -> Option<&LoadedImage> {
        match role {
            ImageRole::Before => self.before.as_ref(),
            ImageRole::After => self.after.as_ref(),
        }
    }

    pub fn clear(&mut self) {
        self.before = None;
        self.after = None;
    }

    /// Make sure both images have a texture with `filter` baked in.
    pub fn prepare_filter(&mut self, ctx: &egui::Context, filter: FilterPreset) {
        if filter.is_none() {
            return;
        }
        let max_side = ctx.input(|i| i.max_texture_side);
        for (name, image) in [("before", &mut self.before), ("after", &mut self.after)] {
            let Some(image) = image else { continue };
            if matches!(&image.filtered, Some((f, _)) if *f == filter) {
                continue;
            }
            let pixels = filter.applied(&image.pixels);
            let texture = ctx.load_texture(
                format!("{name}-{}", filter.id()),
                rgba_to_color_image(&pixels, max_side),
                egui::TextureOptions::LINEAR,
            );
            image.filtered = Some((filter, texture));
        }
    }
}
