//! Coordinate-space math shared by the viewer, the edit preview and the
//! rasterizer.
//!
//! Three spaces are involved:
//! - *source* space: pixels of an intrinsic image (or of the rotated
//!   intermediate surface while editing),
//! - *container* space: screen points relative to the viewport's top-left,
//! - *client* space: absolute screen points, as delivered by pointer events.
//!
//! Everything here is a pure function of its inputs so the mapping can be
//! tested without a layout engine.

use serde::{Deserialize, Serialize};

use crate::compare::ComparisonMode;
use crate::consts::FIT_MARGIN;

/// Intrinsic pixel size of a decoded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A point or offset in screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A floating-point extent (container size, displayed content size).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn scaled(self, factor: f64) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }

    /// True when both sides are finite and strictly positive.
    pub fn is_positive(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// The viewport: where the container sits in client space and how big it is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub origin: Vec2,
    pub size: Size,
}

impl Container {
    pub fn new(origin: Vec2, size: Size) -> Self {
        Self { origin, size }
    }

    /// A container at the client origin, as used by headless callers.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(Vec2::ZERO, Size::new(width, height))
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    /// Convert a client-space point into container space.
    pub fn to_local(&self, client: Vec2) -> Vec2 {
        client - self.origin
    }

    /// The whole container as a container-space rectangle.
    pub fn local_rect(&self) -> ScreenRect {
        ScreenRect::new(0.0, 0.0, self.size.width, self.size.height)
    }
}

/// A rectangle captured by a pointer drag: raw start and end points in
/// client coordinates, not yet normalized.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientRect {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl ClientRect {
    /// A zero-sized rectangle anchored at `point`.
    pub fn anchored(point: Vec2) -> Self {
        Self {
            start_x: point.x,
            start_y: point.y,
            end_x: point.x,
            end_y: point.y,
        }
    }

    pub fn with_end(self, point: Vec2) -> Self {
        Self {
            end_x: point.x,
            end_y: point.y,
            ..self
        }
    }

    /// Normalized rectangle (positive width/height) in the same space.
    pub fn normalized(&self) -> ScreenRect {
        ScreenRect::new(
            self.start_x.min(self.end_x),
            self.start_y.min(self.end_y),
            (self.end_x - self.start_x).abs(),
            (self.end_y - self.start_y).abs(),
        )
    }
}

/// An axis-aligned rectangle in screen space with positive extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn translated(&self, offset: Vec2) -> ScreenRect {
        ScreenRect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

/// A region of source-pixel space. Not clamped to the image bounds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SourceRect {
    /// Output pixel size when drawn 1:1.
    pub fn output_dimensions(&self) -> Dimensions {
        Dimensions::new(
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }
}

/// Zoom that fits `content` inside `container`, shrunk by `margin`.
///
/// Returns the neutral zoom `1.0` when either extent is degenerate.
pub fn fit_scale(container: Size, content: Size, margin: f64) -> f64 {
    if !container.is_positive() || !content.is_positive() {
        return 1.0;
    }
    let scale_x = container.width / content.width;
    let scale_y = container.height / content.height;
    let zoom = scale_x.min(scale_y) * margin;
    if zoom > 0.0 && zoom.is_finite() {
        zoom
    } else {
        1.0
    }
}

/// [`fit_scale`] with the default margin.
pub fn fit_scale_default(container: Size, content: Size) -> f64 {
    fit_scale(container, content, FIT_MARGIN)
}

/// Dimension set driving fit/zoom: after, then before, then the generic one.
pub fn master_dimensions(
    before: Option<Dimensions>,
    after: Option<Dimensions>,
    generic: Option<Dimensions>,
) -> Option<Dimensions> {
    after.or(before).or(generic)
}

/// Size the fit calculation works against.
///
/// In side-by-side mode with both images present the two panes render at the
/// same visual height, so the content is twice as wide as the master image.
pub fn effective_content_size(
    mode: ComparisonMode,
    before: Option<Dimensions>,
    after: Option<Dimensions>,
    generic: Option<Dimensions>,
    editing: bool,
) -> Option<Size> {
    let master = master_dimensions(before, after, generic)?;
    let mut size = master.to_size();
    if mode == ComparisonMode::Side && before.is_some() && after.is_some() && !editing {
        size.width *= 2.0;
    }
    Some(size)
}

/// Container-space top-left of `content` drawn at `zoom`, centered and then
/// shifted by `pan`.
pub fn display_origin(container: Size, content: Size, zoom: f64, pan: Vec2) -> Vec2 {
    let displayed = content.scaled(zoom);
    Vec2::new(
        (container.width - displayed.width) / 2.0 + pan.x,
        (container.height - displayed.height) / 2.0 + pan.y,
    )
}

/// Inverse of the display transform: map a container-space rectangle into
/// source-pixel space. Width and height never drop below one pixel.
pub fn screen_rect_to_source_rect(
    rect: &ScreenRect,
    display_origin: Vec2,
    display_scale: f64,
) -> SourceRect {
    let scale = if display_scale > 0.0 && display_scale.is_finite() {
        display_scale
    } else {
        1.0
    };
    SourceRect {
        x: (rect.x - display_origin.x) / scale,
        y: (rect.y - display_origin.y) / scale,
        width: (rect.width / scale).max(1.0),
        height: (rect.height / scale).max(1.0),
    }
}

/// Directions in which panned content extends past the container.
///
/// `up` means content hangs below the container's bottom edge (the user can
/// still pan up), and so on for the other directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanGuides {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl PanGuides {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Compute pan affordances for content of `displayed` size panned by `pan`
/// inside `container`. Purely informational; panning is not bounded.
pub fn pan_guides(displayed: Size, container: Size, pan: Vec2) -> PanGuides {
    if displayed.width <= container.width && displayed.height <= container.height {
        return PanGuides::default();
    }

    let top = pan.y - displayed.height / 2.0;
    let bottom = pan.y + displayed.height / 2.0;
    let left = pan.x - displayed.width / 2.0;
    let right = pan.x + displayed.width / 2.0;

    PanGuides {
        up: bottom > container.height / 2.0,
        down: top < -container.height / 2.0,
        left: right > container.width / 2.0,
        right: left < -container.width / 2.0,
    }
}

/// A 2D affine transform `p' = M·p + t`, stored row-major as
/// `[a, b, c, d, tx, ty]` with `x' = a·x + c·y + tx`, `y' = b·x + d·y + ty`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn translate(offset: Vec2) -> Self {
        Self {
            tx: offset.x,
            ty: offset.y,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// Clockwise rotation in screen space (y axis pointing down).
    pub fn rotate(radians: f64) -> Self {
        Self::rotate_sin_cos(radians.sin(), radians.cos())
    }

    /// Rotation from a precomputed sine/cosine pair, so quadrant angles can
    /// be exact.
    pub fn rotate_sin_cos(sin: f64, cos: f64) -> Self {
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// `self` followed by `next`: `(self.then(next)).apply(p) == next.apply(self.apply(p))`.
    pub fn then(&self, next: &Affine) -> Affine {
        Affine {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            tx: next.a * self.tx + next.c * self.ty + next.tx,
            ty: next.b * self.tx + next.d * self.ty + next.ty,
        }
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Inverse transform, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Affine> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Affine {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + c * self.ty),
            ty: -(b * self.tx + d * self.ty),
        })
    }

    /// Image of the four corners of a `size` rectangle anchored at the origin,
    /// in top-left, top-right, bottom-right, bottom-left order.
    pub fn corners(&self, size: Size) -> [Vec2; 4] {
        [
            self.apply(Vec2::new(0.0, 0.0)),
            self.apply(Vec2::new(size.width, 0.0)),
            self.apply(Vec2::new(size.width, size.height)),
            self.apply(Vec2::new(0.0, size.height)),
        ]
    }
}
