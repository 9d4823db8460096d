//! Pending, fully reversible geometric edits.
//!
//! Nothing here touches pixels: the session only accumulates intents
//! (rotation, flip, straighten, crop box) plus its own zoom/pan. Pixels change
//! when the rasterizer commits the session.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::STRAIGHTEN_LIMIT_DEG;
use crate::geometry::{Affine, ClientRect, Dimensions, Vec2};
use crate::view::ViewState;

/// Coarse rotation in 90° steps, clockwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: &[Self] = &[Self::Deg0, Self::Deg90, Self::Deg180, Self::Deg270];

    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Normalize any multiple of 90° (negative allowed). Other angles snap
    /// down to the previous quadrant.
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees.rem_euclid(360) / 90 {
            0 => Self::Deg0,
            1 => Self::Deg90,
            2 => Self::Deg180,
            _ => Self::Deg270,
        }
    }

    /// `(rotation + 90) mod 360`
    pub fn rotated_right(self) -> Self {
        Self::from_degrees(self.degrees() as i32 + 90)
    }

    /// `(rotation - 90 + 360) mod 360`
    pub fn rotated_left(self) -> Self {
        Self::from_degrees(self.degrees() as i32 - 90 + 360)
    }

    /// Exact `(sin, cos)` for the quadrant.
    pub fn sin_cos(self) -> (f64, f64) {
        match self {
            Self::Deg0 => (0.0, 1.0),
            Self::Deg90 => (1.0, 0.0),
            Self::Deg180 => (0.0, -1.0),
            Self::Deg270 => (-1.0, 0.0),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// The transform intents of one edit session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditParameters {
    rotation: Rotation,
    flipped: bool,
    straighten_deg: f64,
    crop_box: Option<ClientRect>,
}

impl Default for EditParameters {
    fn default() -> Self {
        Self::identity()
    }
}

impl EditParameters {
    pub fn identity() -> Self {
        Self {
            rotation: Rotation::Deg0,
            flipped: false,
            straighten_deg: 0.0,
            crop_box: None,
        }
    }

    /// Build parameters directly (headless callers). Straighten is clamped to
    /// the default limit.
    pub fn new(rotation: Rotation, flipped: bool, straighten_deg: f64) -> Self {
        let mut params = Self::identity();
        params.rotation = rotation;
        params.flipped = flipped;
        params.set_straighten(straighten_deg, STRAIGHTEN_LIMIT_DEG);
        params
    }

    pub fn with_crop_box(mut self, crop_box: Option<ClientRect>) -> Self {
        self.crop_box = crop_box;
        self
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Crop box in client coordinates, if one was drawn.
    pub fn crop_box(&self) -> Option<ClientRect> {
        self.crop_box
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Horizontal scale factor: `1` or `-1`.
    pub fn flip_scale_x(&self) -> f64 {
        if self.flipped {
            -1.0
        } else {
            1.0
        }
    }

    pub fn straighten_deg(&self) -> f64 {
        self.straighten_deg
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Clamp into `[-limit, limit]`. Non-finite input leaves the angle as is;
    /// a non-finite limit means the default one.
    pub fn set_straighten(&mut self, degrees: f64, limit: f64) {
        if !degrees.is_finite() {
            return;
        }
        let limit = sanitize_straighten_limit(limit);
        self.straighten_deg = degrees.clamp(-limit, limit);
    }

    pub fn is_identity(&self) -> bool {
        self.rotation == Rotation::Deg0
            && !self.flipped
            && self.straighten_deg == 0.0
            && self.crop_box.is_none()
    }

    /// Combined angle `rotation + straighten`, in radians.
    pub fn angle_radians(&self) -> f64 {
        (self.rotation.degrees() as f64 + self.straighten_deg).to_radians()
    }

    /// `(sin, cos)` of the combined angle; exact when there is no straighten.
    pub fn sin_cos(&self) -> (f64, f64) {
        if self.straighten_deg == 0.0 {
            self.rotation.sin_cos()
        } else {
            self.angle_radians().sin_cos()
        }
    }

    /// Geometric part of the edit about the image center: flip first, then
    /// the combined rotation. Preview and rasterizer both use this.
    pub fn edit_transform(&self) -> Affine {
        let (sin, cos) = self.sin_cos();
        Affine::scale(self.flip_scale_x(), 1.0).then(&Affine::rotate_sin_cos(sin, cos))
    }

    /// Axis-aligned bounds of `source` after rotation, unrounded.
    pub fn rotated_extent(&self, source: Dimensions) -> (f64, f64) {
        let (sin, cos) = self.sin_cos();
        let (w, h) = (source.width as f64, source.height as f64);
        (
            w * cos.abs() + h * sin.abs(),
            w * sin.abs() + h * cos.abs(),
        )
    }

    /// Pixel size of the intermediate surface holding the rotated image.
    pub fn rotated_bounds(&self, source: Dimensions) -> Dimensions {
        let (w, h) = self.rotated_extent(source);
        Dimensions::new(w.round().max(1.0) as u32, h.round().max(1.0) as u32)
    }
}

fn sanitize_straighten_limit(limit: f64) -> f64 {
    if limit.is_finite() {
        limit.abs()
    } else {
        STRAIGHTEN_LIMIT_DEG
    }
}

/// Interactive crop-drawing state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CropTool {
    #[default]
    Off,
    /// Crop mode is on; drags draw a box.
    Armed,
    /// A drag is growing the box.
    Drawing,
}

/// What a press of `Escape` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapeOutcome {
    /// An in-progress crop drag was discarded.
    CropDrawingCancelled,
    /// Crop mode was switched off.
    CropModeExited,
    /// The whole edit session was cancelled.
    SessionCancelled,
    /// Nothing to cancel (not editing).
    Ignored,
}

/// Edit-mode state: pending parameters, crop tool and the edit view.
#[derive(Clone, Debug)]
pub struct EditSession {
    params: EditParameters,
    crop_tool: CropTool,
    view: ViewState,
    initial_view: ViewState,
    straighten_limit: f64,
}

impl EditSession {
    /// Start a blank session whose view is the given fit.
    pub fn new(initial_view: ViewState, straighten_limit: f64) -> Self {
        Self {
            params: EditParameters::identity(),
            crop_tool: CropTool::Off,
            view: initial_view,
            initial_view,
            straighten_limit: sanitize_straighten_limit(straighten_limit),
        }
    }

    pub fn params(&self) -> &EditParameters {
        &self.params
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn crop_tool(&self) -> CropTool {
        self.crop_tool
    }

    pub fn is_crop_mode(&self) -> bool {
        self.crop_tool != CropTool::Off
    }

    pub fn is_drawing_crop(&self) -> bool {
        self.crop_tool == CropTool::Drawing
    }

    pub fn straighten_limit(&self) -> f64 {
        self.straighten_limit
    }

    pub fn rotate_left_90(&mut self) {
        self.params.rotation = self.params.rotation.rotated_left();
        debug!(rotation = %self.params.rotation, "Rotate left");
    }

    pub fn rotate_right_90(&mut self) {
        self.params.rotation = self.params.rotation.rotated_right();
        debug!(rotation = %self.params.rotation, "Rotate right");
    }

    pub fn flip_horizontal(&mut self) {
        self.params.flip();
    }

    pub fn set_straighten(&mut self, degrees: f64) {
        self.params.set_straighten(degrees, self.straighten_limit);
    }

    /// Enter or leave crop drawing. Leaving discards the drawn box.
    pub fn toggle_crop_mode(&mut self) {
        self.crop_tool = match self.crop_tool {
            CropTool::Off => CropTool::Armed,
            CropTool::Armed | CropTool::Drawing => {
                self.params.crop_box = None;
                CropTool::Off
            }
        };
    }

    /// Start a new box at `client`. Ignored outside crop mode.
    pub fn begin_crop(&mut self, client: Vec2) -> bool {
        if self.crop_tool == CropTool::Off {
            return false;
        }
        self.params.crop_box = Some(ClientRect::anchored(client));
        self.crop_tool = CropTool::Drawing;
        true
    }

    /// Grow the box being drawn to `client`.
    pub fn update_crop(&mut self, client: Vec2) {
        if self.crop_tool != CropTool::Drawing {
            return;
        }
        if let Some(rect) = self.params.crop_box {
            self.params.crop_box = Some(rect.with_end(client));
        }
    }

    pub fn end_crop(&mut self) {
        if self.crop_tool == CropTool::Drawing {
            self.crop_tool = CropTool::Armed;
        }
    }

    /// Crop box the rasterizer should honour: only while crop mode is on.
    pub fn effective_crop(&self) -> Option<ClientRect> {
        if self.is_crop_mode() {
            self.params.crop_box
        } else {
            None
        }
    }

    /// Parameters as they will be committed.
    pub fn params_for_apply(&self) -> EditParameters {
        self.params.clone().with_crop_box(self.effective_crop())
    }

    /// Back to identity, crop mode off, view back to the initial fit.
    pub fn reset(&mut self) {
        self.params = EditParameters::identity();
        self.crop_tool = CropTool::Off;
        self.view = self.initial_view;
    }

    /// Innermost interaction cancels first. `SessionCancelled` asks the
    /// owner to leave edit mode.
    pub fn escape(&mut self) -> EscapeOutcome {
        match self.crop_tool {
            CropTool::Drawing => {
                self.crop_tool = CropTool::Armed;
                self.params.crop_box = None;
                EscapeOutcome::CropDrawingCancelled
            }
            CropTool::Armed => {
                self.crop_tool = CropTool::Off;
                self.params.crop_box = None;
                EscapeOutcome::CropModeExited
            }
            CropTool::Off => EscapeOutcome::SessionCancelled,
        }
    }
}
