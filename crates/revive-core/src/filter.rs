//! Color filter presets.
//!
//! Filters are a rendering-time preview; pixels only change when a caller
//! explicitly bakes a preset (export). The operations follow the CSS filter
//! function definitions so preview and export agree.

use std::fmt;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// One filter function with its amount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterOp {
    Sepia(f32),
    Grayscale(f32),
    Saturate(f32),
    Contrast(f32),
    Brightness(f32),
    Invert(f32),
}

impl FilterOp {
    /// Apply to one linear-in-[0, 1] RGB triple, clamping the result.
    pub fn apply_rgb(&self, [r, g, b]: [f32; 3]) -> [f32; 3] {
        let out = match *self {
            FilterOp::Sepia(amount) => {
                let s = 1.0 - amount.clamp(0.0, 1.0);
                mul3(
                    [
                        [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
                        [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
                        [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
                    ],
                    [r, g, b],
                )
            }
            FilterOp::Grayscale(amount) => {
                let s = 1.0 - amount.clamp(0.0, 1.0);
                mul3(
                    [
                        [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
                        [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
                        [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
                    ],
                    [r, g, b],
                )
            }
            FilterOp::Saturate(s) => {
                let s = s.max(0.0);
                mul3(
                    [
                        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
                    ],
                    [r, g, b],
                )
            }
            FilterOp::Contrast(c) => {
                let offset = 0.5 - 0.5 * c;
                [r * c + offset, g * c + offset, b * c + offset]
            }
            FilterOp::Brightness(k) => [r * k, g * k, b * k],
            FilterOp::Invert(amount) => {
                let a = amount.clamp(0.0, 1.0);
                [
                    a + r * (1.0 - 2.0 * a),
                    a + g * (1.0 - 2.0 * a),
                    a + b * (1.0 - 2.0 * a),
                ]
            }
        };
        out.map(|v| v.clamp(0.0, 1.0))
    }
}

/// Mild lift applied to 2x exports before the preset is baked.
pub const UPSCALE_ENHANCE: &[FilterOp] = &[
    FilterOp::Contrast(1.05),
    FilterOp::Saturate(1.05),
    FilterOp::Brightness(1.02),
];

fn apply_ops(ops: &[FilterOp], pixel: [u8; 4]) -> [u8; 4] {
    let mut rgb = [
        pixel[0] as f32 / 255.0,
        pixel[1] as f32 / 255.0,
        pixel[2] as f32 / 255.0,
    ];
    for op in ops {
        rgb = op.apply_rgb(rgb);
    }
    let [r, g, b] = rgb.map(|v| (v * 255.0).round() as u8);
    [r, g, b, pixel[3]]
}

/// Double both sides of `image` with Catmull-Rom resampling, lift it with
/// [`UPSCALE_ENHANCE`] and bake `preset` on top.
pub fn upscale_2x(image: &RgbaImage, preset: FilterPreset) -> RgbaImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return RgbaImage::new(width.saturating_mul(2), height.saturating_mul(2));
    }
    let mut out = imageops::resize(
        image,
        width.saturating_mul(2),
        height.saturating_mul(2),
        FilterType::CatmullRom,
    );
    for pixel in out.pixels_mut() {
        pixel.0 = apply_ops(UPSCALE_ENHANCE, pixel.0);
    }
    preset.apply(&mut out);
    tracing::debug!(width, height, preset = preset.id(), "Upscaled image 2x");
    out
}

fn mul3(m: [[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// The user-selectable filter presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPreset {
    #[default]
    None,
    Sepia,
    Grayscale,
    Vintage,
    Invert,
    Saturate,
    Contrast,
}

impl FilterPreset {
    pub const ALL: &[Self] = &[
        Self::None,
        Self::Sepia,
        Self::Grayscale,
        Self::Vintage,
        Self::Invert,
        Self::Saturate,
        Self::Contrast,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sepia => "sepia",
            Self::Grayscale => "grayscale",
            Self::Vintage => "vintage",
            Self::Invert => "invert",
            Self::Saturate => "saturate",
            Self::Contrast => "contrast",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.id() == id)
    }

    /// CSS `filter` value equivalent to the preset.
    pub fn css(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sepia => "sepia(1)",
            Self::Grayscale => "grayscale(1)",
            Self::Vintage => "sepia(0.6) contrast(0.9) brightness(1.1) saturate(1.2)",
            Self::Invert => "invert(1)",
            Self::Saturate => "saturate(2)",
            Self::Contrast => "contrast(1.5)",
        }
    }

    pub fn ops(self) -> &'static [FilterOp] {
        match self {
            Self::None => &[],
            Self::Sepia => &[FilterOp::Sepia(1.0)],
            Self::Grayscale => &[FilterOp::Grayscale(1.0)],
            Self::Vintage => &[
                FilterOp::Sepia(0.6),
                FilterOp::Contrast(0.9),
                FilterOp::Brightness(1.1),
                FilterOp::Saturate(1.2),
            ],
            Self::Invert => &[FilterOp::Invert(1.0)],
            Self::Saturate => &[FilterOp::Saturate(2.0)],
            Self::Contrast => &[FilterOp::Contrast(1.5)],
        }
    }

    pub fn is_none(self) -> bool {
        self == Self::None
    }

    /// Filter one straight-alpha pixel. Alpha is left untouched.
    pub fn apply_pixel(self, pixel: [u8; 4]) -> [u8; 4] {
        if self.is_none() {
            return pixel;
        }
        apply_ops(self.ops(), pixel)
    }

    /// Bake the preset into `image` in place.
    pub fn apply(self, image: &mut RgbaImage) {
        if self.is_none() {
            return;
        }
        for pixel in image.pixels_mut() {
            pixel.0 = self.apply_pixel(pixel.0);
        }
    }

    /// Filtered copy, leaving the source untouched.
    pub fn applied(self, image: &RgbaImage) -> RgbaImage {
        let mut out = image.clone();
        self.apply(&mut out);
        out
    }
}

impl fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Sepia => write!(f, "Sepia"),
            Self::Grayscale => write!(f, "Grayscale"),
            Self::Vintage => write!(f, "Vintage"),
            Self::Invert => write!(f, "Invert"),
            Self::Saturate => write!(f, "Saturate"),
            Self::Contrast => write!(f, "Contrast"),
        }
    }
}
