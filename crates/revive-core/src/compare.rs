//! Before/after comparison layouts.
//!
//! The renderer is a pure function from viewer state to a [`RenderPlan`]:
//! which images are drawn, the affine mapping each one's source pixels into
//! container-local screen space, and the region each may paint into. Front
//! ends only have to draw textured quads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::edit::EditParameters;
use crate::filter::FilterPreset;
use crate::geometry::{Affine, Dimensions, ScreenRect, Size, Vec2};
use crate::result::ResultItem;
use crate::view::ViewState;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    #[default]
    Slider,
    Side,
    Single,
}

impl ComparisonMode {
    pub const ALL: &[Self] = &[Self::Slider, Self::Side, Self::Single];

    /// Mode to show after `item` is selected. Edited and video results force
    /// single view; leaving a forced result goes back to the slider.
    pub fn after_selecting(current: Self, item: &ResultItem) -> Self {
        if item.forces_single() {
            Self::Single
        } else if current == Self::Single {
            Self::Slider
        } else {
            current
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Slider => "slider",
            Self::Side => "side",
            Self::Single => "single",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.id() == id)
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slider => write!(f, "Slider"),
            Self::Side => write!(f, "Side by side"),
            Self::Single => write!(f, "Single"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageRole {
    Before,
    After,
}

/// One image as it lands on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    pub role: ImageRole,
    pub dimensions: Dimensions,
    /// Screen pixels per source pixel.
    pub scale: f64,
    /// Source pixel space to container-local screen space.
    pub transform: Affine,
    /// Screen-space corners: top-left, top-right, bottom-right, bottom-left
    /// of the source image.
    pub corners: [Vec2; 4],
    /// Region of the container this surface may paint into.
    pub clip: ScreenRect,
    /// Preview filter; never baked into pixels here.
    pub filter: FilterPreset,
}

impl Surface {
    fn new(
        role: ImageRole,
        dimensions: Dimensions,
        scale: f64,
        transform: Affine,
        clip: ScreenRect,
        filter: FilterPreset,
    ) -> Self {
        Self {
            role,
            dimensions,
            scale,
            transform,
            corners: transform.corners(dimensions.to_size()),
            clip,
            filter,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Layout {
    /// Nothing to draw.
    Empty,
    Slider {
        before: Surface,
        after: Surface,
        /// Container-local x of the divider.
        divider_x: f64,
    },
    Side {
        before: Surface,
        after: Surface,
    },
    Single {
        surface: Surface,
        editing: bool,
        video: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderPlan {
    /// The mode actually rendered, after overrides.
    pub mode: ComparisonMode,
    pub layout: Layout,
}

impl RenderPlan {
    pub fn surfaces(&self) -> Vec<&Surface> {
        match &self.layout {
            Layout::Empty => Vec::new(),
            Layout::Slider { before, after, .. } | Layout::Side { before, after } => {
                vec![before, after]
            }
            Layout::Single { surface, .. } => vec![surface],
        }
    }
}

/// Everything the layout depends on.
#[derive(Clone, Debug)]
pub struct RenderInput<'a> {
    pub mode: ComparisonMode,
    pub before: Option<Dimensions>,
    pub after: Option<Dimensions>,
    pub container: Size,
    pub view: ViewState,
    /// Pending edit and its view, while editing.
    pub edit: Option<(&'a EditParameters, ViewState)>,
    pub forced_single: bool,
    pub video: bool,
    pub filter: FilterPreset,
    pub slider_position: f64,
    pub pane_gap: f64,
}

impl RenderInput<'_> {
    /// Mode after applying the single-view overrides.
    pub fn effective_mode(&self) -> ComparisonMode {
        let comparable = self.before.is_some() && self.after.is_some();
        if self.edit.is_some() || self.video || self.forced_single || !comparable {
            ComparisonMode::Single
        } else {
            self.mode
        }
    }
}

/// Source pixels centered on `center`, scaled by `zoom`.
fn centered_transform(dims: Dimensions, zoom: f64, center: Vec2) -> Affine {
    Affine::translate(Vec2::new(
        -(dims.width as f64) / 2.0,
        -(dims.height as f64) / 2.0,
    ))
    .then(&Affine::scale(zoom, zoom))
    .then(&Affine::translate(center))
}

/// Edit preview: the pending edit about the image center, inside the edit view.
fn edit_preview_transform(
    dims: Dimensions,
    params: &EditParameters,
    view: &ViewState,
    center: Vec2,
) -> Affine {
    Affine::translate(Vec2::new(
        -(dims.width as f64) / 2.0,
        -(dims.height as f64) / 2.0,
    ))
    .then(&params.edit_transform())
    .then(&Affine::scale(view.zoom, view.zoom))
    .then(&Affine::translate(center + view.pan))
}

/// Before-pane zoom so both panes share one visual height.
pub fn side_scale_correction(before: Option<Dimensions>, after: Option<Dimensions>) -> f64 {
    match (before, after) {
        (Some(b), Some(a)) if b.width > 0 && a.width > 0 => a.width as f64 / b.width as f64,
        _ => 1.0,
    }
}

pub fn render_plan(input: &RenderInput<'_>) -> RenderPlan {
    let mode = input.effective_mode();
    let container = input.container;
    let full = ScreenRect::new(0.0, 0.0, container.width, container.height);
    let center = Vec2::new(container.width / 2.0, container.height / 2.0);
    let zoom = input.view.zoom;
    let pan = input.view.pan;

    let layout = match (mode, input.before, input.after) {
        (ComparisonMode::Slider, Some(before), Some(after)) => {
            let divider_x = container.width * input.slider_position.clamp(0.0, 1.0);
            let left = ScreenRect::new(0.0, 0.0, divider_x, container.height);
            let right = ScreenRect::new(divider_x, 0.0, container.width - divider_x, container.height);
            Layout::Slider {
                before: Surface::new(
                    ImageRole::Before,
                    before,
                    zoom,
                    centered_transform(before, zoom, center + pan),
                    left,
                    input.filter,
                ),
                after: Surface::new(
                    ImageRole::After,
                    after,
                    zoom,
                    centered_transform(after, zoom, center + pan),
                    right,
                    input.filter,
                ),
                divider_x,
            }
        }
        (ComparisonMode::Side, Some(before), Some(after)) => {
            let pane_w = ((container.width - input.pane_gap) / 2.0).max(0.0);
            let left = ScreenRect::new(0.0, 0.0, pane_w, container.height);
            let right = ScreenRect::new(container.width - pane_w, 0.0, pane_w, container.height);
            let before_zoom = zoom * side_scale_correction(Some(before), Some(after));
            Layout::Side {
                before: Surface::new(
                    ImageRole::Before,
                    before,
                    before_zoom,
                    centered_transform(before, before_zoom, left.center() + pan),
                    left,
                    input.filter,
                ),
                after: Surface::new(
                    ImageRole::After,
                    after,
                    zoom,
                    centered_transform(after, zoom, right.center() + pan),
                    right,
                    input.filter,
                ),
            }
        }
        (_, before, after) => {
            let (role, dims) = match (after, before) {
                (Some(a), _) => (ImageRole::After, a),
                (None, Some(b)) => (ImageRole::Before, b),
                (None, None) => {
                    return RenderPlan {
                        mode,
                        layout: Layout::Empty,
                    }
                }
            };
            let surface = match input.edit {
                Some((params, edit_view)) => Surface::new(
                    role,
                    dims,
                    edit_view.zoom,
                    edit_preview_transform(dims, params, &edit_view, center),
                    full,
                    FilterPreset::None,
                ),
                None => Surface::new(
                    role,
                    dims,
                    zoom,
                    centered_transform(dims, zoom, center + pan),
                    full,
                    input.filter,
                ),
            };
            Layout::Single {
                surface,
                editing: input.edit.is_some(),
                video: input.video,
            }
        }
    };

    RenderPlan { mode, layout }
}
