/// Smallest zoom factor a view state can hold.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor a view state can hold.
pub const MAX_ZOOM: f64 = 10.0;

/// Fraction of the container used when fitting content (leaves a small border).
pub const FIT_MARGIN: f64 = 0.95;

/// Multiplier applied by one zoom-in / zoom-out button press.
pub const ZOOM_STEP: f64 = 1.1;

/// Wheel sensitivity: `zoom *= 1 - delta_y * WHEEL_ZOOM_FACTOR`.
pub const WHEEL_ZOOM_FACTOR: f64 = 0.01;

/// Straighten angle limit in degrees (symmetric).
pub const STRAIGHTEN_LIMIT_DEG: f64 = 15.0;

/// Step of the straighten slider in degrees.
pub const STRAIGHTEN_STEP_DEG: f64 = 0.5;

/// Gap between the two panes of the side-by-side layout, in screen pixels.
pub const SIDE_PANE_GAP: f64 = 16.0;

/// Default slider divider position (fraction of the container width).
pub const DEFAULT_SLIDER_POSITION: f64 = 0.5;

/// Largest side of a drawing surface, in pixels.
pub const MAX_SURFACE_SIDE: u32 = 32_767;

/// Largest pixel count of a drawing surface.
pub const MAX_SURFACE_PIXELS: u64 = 268_435_456;

/// JPEG quality used when committing edits ("maximum quality").
pub const JPEG_MAX_QUALITY: u8 = 100;

/// Prompt recorded on results produced by the rasterizer.
pub const EDITED_PROMPT: &str = "Image Edited";

/// Prompt recorded on results wrapping the uploaded image.
pub const ORIGINAL_PROMPT: &str = "Original Image";

/// Mime type used when the requested one cannot be encoded.
pub const FALLBACK_MIME_TYPE: &str = "image/png";
