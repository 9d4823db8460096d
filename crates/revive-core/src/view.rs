//! Viewing state machine for the center viewport.
//!
//! A [`Viewer`] owns everything the viewport needs between frames: the
//! container geometry, the intrinsic dimensions of the before/after images,
//! the comparison mode, the viewing [`ViewState`] and, while editing, the
//! [`EditSession`] with its own independent view. Modes are a tagged enum so
//! an edit view or a crop drag cannot exist outside edit mode.

use tracing::{debug, info, warn};

use crate::compare::{self, ComparisonMode, RenderInput, RenderPlan};
use crate::config::StudioConfig;
use crate::edit::{EditSession, EscapeOutcome};
use crate::error::{ReviveError, Result};
use crate::filter::FilterPreset;
use crate::generation::{Generation, GenerationCounter};
use crate::geometry::{
    effective_content_size, fit_scale, master_dimensions, pan_guides, Container, Dimensions,
    PanGuides, Size, Vec2,
};
use crate::payload::ImagePayload;
use crate::raster::{self, RasterRequest};
use crate::result::ResultItem;

/// Zoom and pan of one view. Pan is the screen-space offset from the
/// centered position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub zoom: f64,
    pub pan: Vec2,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::centered(1.0)
    }
}

impl ViewState {
    pub fn centered(zoom: f64) -> Self {
        Self {
            zoom,
            pan: Vec2::ZERO,
        }
    }
}

/// Which view is live.
#[derive(Clone, Debug, Default)]
pub enum Mode {
    #[default]
    Viewing,
    Editing(EditSession),
}

/// An active pan drag. `anchor = pointer - pan` at drag start, so moves
/// compute `pan = pointer - anchor` without a jump.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PanGesture {
    anchor: Vec2,
}

/// Dimensions measured for one before/after pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProbedDimensions {
    pub before: Option<Dimensions>,
    pub after: Option<Dimensions>,
}

pub struct Viewer {
    config: StudioConfig,
    container: Container,
    before: Option<Dimensions>,
    after: Option<Dimensions>,
    generic: Option<Dimensions>,
    comparison: ComparisonMode,
    forced_single: bool,
    video: bool,
    view: ViewState,
    mode: Mode,
    gesture: Option<PanGesture>,
    probes: GenerationCounter,
    slider_position: f64,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(StudioConfig::default())
    }
}

impl Viewer {
    pub fn new(config: StudioConfig) -> Self {
        let comparison = config.compare.default_mode;
        Self {
            config,
            container: Container::default(),
            before: None,
            after: None,
            generic: None,
            comparison,
            forced_single: false,
            video: false,
            view: ViewState::default(),
            mode: Mode::Viewing,
            gesture: None,
            probes: GenerationCounter::new(),
            slider_position: crate::consts::DEFAULT_SLIDER_POSITION,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn container(&self) -> Container {
        self.container
    }

    pub fn before_dimensions(&self) -> Option<Dimensions> {
        self.before
    }

    pub fn after_dimensions(&self) -> Option<Dimensions> {
        self.after
    }

    pub fn master_dimensions(&self) -> Option<Dimensions> {
        master_dimensions(self.before, self.after, self.generic)
    }

    pub fn has_image(&self) -> bool {
        self.master_dimensions().is_some()
    }

    /// The mode the user selected (may be overridden at render time).
    pub fn comparison_mode(&self) -> ComparisonMode {
        self.comparison
    }

    /// True when the current result cannot be compared (edited or video).
    pub fn is_comparison_disabled(&self) -> bool {
        self.forced_single || self.video
    }

    pub fn is_video(&self) -> bool {
        self.video
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Editing(_))
    }

    pub fn is_panning(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.mode {
            Mode::Editing(session) => Some(session),
            Mode::Viewing => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        match &mut self.mode {
            Mode::Editing(session) => Some(session),
            Mode::Viewing => None,
        }
    }

    /// The viewing state (frozen while editing).
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Whichever view pan/zoom gestures currently drive.
    pub fn live_view(&self) -> &ViewState {
        match &self.mode {
            Mode::Editing(session) => session.view(),
            Mode::Viewing => &self.view,
        }
    }

    fn live_view_mut(&mut self) -> &mut ViewState {
        match &mut self.mode {
            Mode::Editing(session) => session.view_mut(),
            Mode::Viewing => &mut self.view,
        }
    }

    fn is_crop_mode(&self) -> bool {
        self.session().is_some_and(EditSession::is_crop_mode)
    }

    pub fn slider_position(&self) -> f64 {
        self.slider_position
    }

    pub fn set_slider_position(&mut self, fraction: f64) {
        if fraction.is_finite() {
            self.slider_position = fraction.clamp(0.0, 1.0);
        }
    }

    // -----------------------------------------------------------------------
    // Inputs: config, container, images, comparison mode
    // -----------------------------------------------------------------------

    /// Swap in new tunables. The viewing state is refit; a running edit
    /// session keeps its view.
    pub fn set_config(&mut self, config: StudioConfig) {
        self.config = config;
        if !self.is_editing() {
            self.fit_all();
        }
    }

    /// Container moved or resized: refit whichever view is live.
    pub fn set_container(&mut self, container: Container) {
        if self.container == container {
            return;
        }
        let resized = self.container.size != container.size;
        self.container = container;
        if resized && self.has_image() {
            if self.is_editing() {
                self.fit_edit();
            } else {
                self.fit_all();
            }
        }
    }

    /// Switch comparison mode. Results that force single view keep it.
    pub fn set_comparison_mode(&mut self, mode: ComparisonMode) {
        if self.is_comparison_disabled() && mode != ComparisonMode::Single {
            debug!(?mode, "Comparison disabled for this result");
            return;
        }
        if self.comparison == mode {
            return;
        }
        self.comparison = mode;
        if !self.is_editing() {
            self.fit_all();
        }
    }

    /// Show a new result. Leaves edit mode, applies the result's comparison
    /// rule and starts a new dimension probe, returning its generation.
    pub fn select_result(&mut self, item: &ResultItem) -> Generation {
        if self.is_editing() {
            self.cancel_edits();
        }
        self.forced_single = item.forces_single();
        self.video = item.is_video();
        self.comparison = ComparisonMode::after_selecting(self.comparison, item);
        self.clear_dimensions();
        self.begin_dimension_probe()
    }

    /// Forget the current images entirely.
    pub fn clear(&mut self) {
        if self.is_editing() {
            self.cancel_edits();
        }
        self.forced_single = false;
        self.video = false;
        self.clear_dimensions();
        self.probes.advance();
        self.view = ViewState::default();
    }

    fn clear_dimensions(&mut self) {
        self.before = None;
        self.after = None;
        self.generic = None;
    }

    /// Supersede any running probe and hand out a new generation.
    pub fn begin_dimension_probe(&mut self) -> Generation {
        self.probes.advance()
    }

    /// Deliver a probe result. Stale generations are dropped (`Ok(false)`).
    /// A failed probe resets all dimensions to unknown.
    pub fn finish_dimension_probe(
        &mut self,
        generation: Generation,
        result: Result<ProbedDimensions>,
    ) -> Result<bool> {
        if !self.probes.is_current(generation) {
            debug!(%generation, current = %self.probes.current(), "Dropping stale dimension probe");
            return Ok(false);
        }
        match result {
            Ok(dims) => {
                self.set_dimensions(dims.before, dims.after);
                Ok(true)
            }
            Err(e) => {
                warn!("Dimension probe failed: {e}");
                self.clear_dimensions();
                Err(match e {
                    ReviveError::DimensionProbe(_) => e,
                    other => ReviveError::DimensionProbe(other.to_string()),
                })
            }
        }
    }

    /// Dimension-load completion.
    pub fn set_dimensions(&mut self, before: Option<Dimensions>, after: Option<Dimensions>) {
        self.before = before;
        self.after = after;
        self.generic = after.or(before);
        if !self.is_editing() {
            self.fit_all();
        }
    }

    // -----------------------------------------------------------------------
    // Fitting and zoom
    // -----------------------------------------------------------------------

    /// Fit the master image (doubled in side-by-side) into the container and
    /// recenter.
    pub fn fit_all(&mut self) {
        let size = self.container.size;
        let Some(content) = effective_content_size(
            self.comparison,
            self.before,
            self.after,
            self.generic,
            self.is_editing(),
        ) else {
            self.view = ViewState::default();
            return;
        };
        if !size.is_positive() {
            return;
        }
        let zoom = fit_scale(size, content, self.config.view.fit_margin);
        self.view = ViewState::centered(self.config.view.clamp_zoom(zoom));
        debug!(zoom = self.view.zoom, "Fit all");
    }

    /// Match the container height exactly, no margin.
    pub fn fit_to_height(&mut self) {
        let Some(master) = self.after.or(self.generic) else {
            *self.live_view_mut() = ViewState::default();
            return;
        };
        let container_h = self.container.size.height;
        if container_h <= 0.0 || master.height == 0 {
            return;
        }
        let zoom = self.config.view.clamp_zoom(container_h / master.height as f64);
        *self.live_view_mut() = ViewState::centered(zoom);
    }

    /// Explicit zoom, recentered.
    pub fn zoom_to(&mut self, zoom: f64) {
        let zoom = self.config.view.clamp_zoom(zoom);
        *self.live_view_mut() = ViewState::centered(zoom);
    }

    /// 100%, recentered.
    pub fn reset_zoom(&mut self) {
        self.zoom_to(1.0);
    }

    /// Zoom in one step about the viewport center; pan is kept.
    pub fn zoom_in(&mut self) {
        let step = self.config.view.zoom_step;
        self.scale_live_zoom(step);
    }

    pub fn zoom_out(&mut self) {
        let step = self.config.view.zoom_step;
        self.scale_live_zoom(1.0 / step);
    }

    /// Wheel zoom about the viewport center (not the cursor). Positive
    /// `delta_y` zooms out. Ignored in crop mode or with no image.
    pub fn wheel(&mut self, delta_y: f64) {
        if !self.has_image() || self.is_crop_mode() || !delta_y.is_finite() {
            return;
        }
        let factor = 1.0 - delta_y * self.config.view.wheel_zoom_factor;
        self.scale_live_zoom(factor);
    }

    fn scale_live_zoom(&mut self, factor: f64) {
        let (min, max) = self.config.view.zoom_range();
        let view = self.live_view_mut();
        let scaled = view.zoom * factor;
        view.zoom = if scaled.is_finite() && scaled > 0.0 {
            scaled.clamp(min, max)
        } else {
            min
        };
    }

    /// Pan affordances for the viewing state. Always empty while editing.
    pub fn pan_guides(&self) -> PanGuides {
        if self.is_editing() {
            return PanGuides::default();
        }
        let Some(content) = effective_content_size(
            self.comparison,
            self.before,
            self.after,
            self.generic,
            false,
        ) else {
            return PanGuides::default();
        };
        pan_guides(content.scaled(self.view.zoom), self.container.size, self.view.pan)
    }

    // -----------------------------------------------------------------------
    // Pointer gestures
    // -----------------------------------------------------------------------

    /// Start a drag at client point `pointer`: a crop box in crop mode,
    /// otherwise a pan. Returns false when nothing started.
    pub fn pointer_down(&mut self, pointer: Vec2) -> bool {
        if !self.has_image() || self.video {
            return false;
        }
        if let Mode::Editing(session) = &mut self.mode {
            if session.is_crop_mode() {
                self.gesture = None;
                return session.begin_crop(pointer);
            }
        }
        let pan = self.live_view().pan;
        self.gesture = Some(PanGesture {
            anchor: pointer - pan,
        });
        true
    }

    pub fn pointer_move(&mut self, pointer: Vec2) {
        if let Mode::Editing(session) = &mut self.mode {
            if session.is_drawing_crop() {
                session.update_crop(pointer);
                return;
            }
            if session.is_crop_mode() {
                return;
            }
        }
        if let Some(gesture) = self.gesture {
            self.live_view_mut().pan = pointer - gesture.anchor;
        }
    }

    /// Pointer released or left the viewport.
    pub fn pointer_up(&mut self) {
        self.gesture = None;
        if let Mode::Editing(session) = &mut self.mode {
            session.end_crop();
        }
    }

    // -----------------------------------------------------------------------
    // Edit mode
    // -----------------------------------------------------------------------

    /// Viewing → Editing. The viewing state is left untouched; the edit view
    /// starts fitted to the after image.
    pub fn enter_edit(&mut self) -> Result<()> {
        if self.is_editing() {
            return Ok(());
        }
        if self.video {
            return Err(ReviveError::VideoNotEditable);
        }
        if self.after.or(self.generic).is_none() {
            return Err(ReviveError::NoImage);
        }
        self.gesture = None;
        let initial = self.edit_fit_view();
        self.mode = Mode::Editing(EditSession::new(
            initial,
            self.config.edit.straighten_limit_deg,
        ));
        info!(zoom = initial.zoom, "Entered edit mode");
        Ok(())
    }

    fn edit_fit_view(&self) -> ViewState {
        let Some(dims) = self.after.or(self.generic) else {
            return ViewState::default();
        };
        let zoom = fit_scale(
            self.container.size,
            dims.to_size(),
            self.config.view.fit_margin,
        );
        ViewState::centered(self.config.view.clamp_zoom(zoom))
    }

    fn fit_edit(&mut self) {
        let fitted = self.edit_fit_view();
        if let Mode::Editing(session) = &mut self.mode {
            *session.view_mut() = fitted;
        }
    }

    /// Discard the session and return to viewing. No-op when not editing.
    pub fn cancel_edits(&mut self) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.leave_edit();
        debug!("Edit session cancelled");
        true
    }

    fn leave_edit(&mut self) {
        self.mode = Mode::Viewing;
        self.gesture = None;
        self.fit_all();
    }

    /// Route `Escape`: innermost interaction first, then the session.
    pub fn handle_escape(&mut self) -> EscapeOutcome {
        let outcome = match &mut self.mode {
            Mode::Viewing => return EscapeOutcome::Ignored,
            Mode::Editing(session) => session.escape(),
        };
        if outcome == EscapeOutcome::SessionCancelled {
            self.cancel_edits();
        }
        outcome
    }

    /// Snapshot of what an apply would commit, for running the rasterizer
    /// elsewhere. The session is left untouched.
    pub fn apply_request(&self) -> Result<RasterRequest> {
        let session = self.session().ok_or(ReviveError::NotEditing)?;
        Ok(RasterRequest {
            params: session.params_for_apply(),
            view: *session.view(),
            container: self.container,
            export: self.config.export.clone(),
        })
    }

    /// Finish a successful apply: clear the session and return to viewing.
    pub fn finish_apply(&mut self) {
        if self.is_editing() {
            self.leave_edit();
            info!("Edits applied");
        }
    }

    /// Rasterize `source` with the pending edits. On success the session is
    /// cleared and edit mode exits; on failure the session is kept so the
    /// user can retry.
    pub fn apply_edits(&mut self, source: &ImagePayload) -> Result<ImagePayload> {
        let request = self.apply_request()?;
        match raster::rasterize_payload(source, &request) {
            Ok(payload) => {
                self.finish_apply();
                Ok(payload)
            }
            Err(e) => {
                warn!("Apply aborted, edit session kept: {e}");
                Err(e)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Inputs of the comparison renderer for the current state.
    pub fn render_input(&self, filter: FilterPreset) -> RenderInput<'_> {
        RenderInput {
            mode: self.comparison,
            before: self.before,
            after: self.after,
            container: self.container.size,
            view: self.view,
            edit: self.session().map(|s| (s.params(), *s.view())),
            forced_single: self.forced_single,
            video: self.video,
            filter,
            slider_position: self.slider_position,
            pane_gap: self.config.compare.side_pane_gap,
        }
    }

    pub fn render_plan(&self, filter: FilterPreset) -> RenderPlan {
        compare::render_plan(&self.render_input(filter))
    }

    /// Size the fit calculation currently works against.
    pub fn effective_content_size(&self) -> Option<Size> {
        effective_content_size(
            self.comparison,
            self.before,
            self.after,
            self.generic,
            self.is_editing(),
        )
    }
}
