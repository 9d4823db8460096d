use revive_core::filter::{upscale_2x, FilterOp, FilterPreset, UPSCALE_ENHANCE};

#[test]
fn test_filter_ids_round_trip() {
    for preset in FilterPreset::ALL {
        assert_eq!(FilterPreset::from_id(preset.id()), Some(*preset));
    }
    assert_eq!(FilterPreset::from_id("posterize"), None);
}

#[test]
fn test_filter_css() {
    assert_eq!(FilterPreset::None.css(), "none");
    assert_eq!(FilterPreset::Sepia.css(), "sepia(1)");
    assert_eq!(
        FilterPreset::Vintage.css(),
        "sepia(0.6) contrast(0.9) brightness(1.1) saturate(1.2)"
    );
}

#[test]
fn test_filter_display() {
    assert_eq!(format!("{}", FilterPreset::Grayscale), "Grayscale");
    assert_eq!(format!("{}", FilterPreset::default()), "None");
}

#[test]
fn test_none_is_identity() {
    let px = [12, 200, 77, 128];
    assert_eq!(FilterPreset::None.apply_pixel(px), px);
}

#[test]
fn test_invert_pixel() {
    assert_eq!(FilterPreset::Invert.apply_pixel([0, 255, 100, 40]), [255, 0, 155, 40]);
}

#[test]
fn test_grayscale_equalizes_channels() {
    let [r, g, b, a] = FilterPreset::Grayscale.apply_pixel([200, 30, 90, 255]);
    assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1);
    assert_eq!(a, 255);
}

#[test]
fn test_contrast_keeps_mid_gray() {
    let v = FilterOp::Contrast(1.5).apply_rgb([0.5, 0.5, 0.5]);
    assert!(v.iter().all(|c| (c - 0.5).abs() < 1e-6));
}

#[test]
fn test_saturate_zero_is_gray() {
    let [r, g, b] = FilterOp::Saturate(0.0).apply_rgb([1.0, 0.0, 0.0]);
    assert!((r - g).abs() < 1e-6 && (g - b).abs() < 1e-6);
}

#[test]
fn test_applied_leaves_source_untouched() {
    let source = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
    let out = FilterPreset::Invert.applied(&source);
    assert_eq!(source.get_pixel(0, 0).0, [10, 20, 30, 255]);
    assert_eq!(out.get_pixel(0, 0).0, [245, 235, 225, 255]);
}

fn enhanced_channel(value: u8) -> f32 {
    let mut rgb = [value as f32 / 255.0; 3];
    for op in UPSCALE_ENHANCE {
        rgb = op.apply_rgb(rgb);
    }
    rgb[0] * 255.0
}

#[test]
fn test_upscale_2x_doubles_dimensions() {
    let source = image::RgbaImage::from_pixel(3, 2, image::Rgba([128, 128, 128, 255]));
    let out = upscale_2x(&source, FilterPreset::None);
    assert_eq!(out.dimensions(), (6, 4));
    assert_eq!(source.dimensions(), (3, 2));
}

#[test]
fn test_upscale_2x_enhances_then_bakes_preset() {
    let source = image::RgbaImage::from_pixel(4, 4, image::Rgba([128, 128, 128, 200]));
    let expected = enhanced_channel(128);
    assert!(expected > 128.0);

    let plain = upscale_2x(&source, FilterPreset::None);
    for pixel in plain.pixels() {
        assert!((pixel.0[0] as f32 - expected).abs() <= 1.0, "{:?}", pixel.0);
        assert_eq!(pixel.0[3], 200);
    }

    let inverted = upscale_2x(&source, FilterPreset::Invert);
    let px = inverted.get_pixel(3, 5).0;
    assert!((px[0] as f32 - (255.0 - expected)).abs() <= 1.0, "{px:?}");
}

#[test]
fn test_upscale_2x_empty_image() {
    let source = image::RgbaImage::new(0, 0);
    assert_eq!(upscale_2x(&source, FilterPreset::Sepia).dimensions(), (0, 0));
}
