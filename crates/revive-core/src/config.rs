use serde::{Deserialize, Serialize};

use crate::compare::ComparisonMode;
use crate::consts::{
    FIT_MARGIN, JPEG_MAX_QUALITY, MAX_ZOOM, MIN_ZOOM, SIDE_PANE_GAP, STRAIGHTEN_LIMIT_DEG,
    STRAIGHTEN_STEP_DEG, WHEEL_ZOOM_FACTOR, ZOOM_STEP,
};
use crate::error::{ReviveError, Result};
use crate::filter::FilterPreset;

/// Tunables of the viewer, edit session, comparison layout and export.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub edit: EditConfig,
    #[serde(default)]
    pub compare: CompareConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl StudioConfig {
    /// Reject values the viewer cannot work with. Call after loading a
    /// user-supplied file.
    pub fn validate(&self) -> Result<()> {
        self.view.validate()?;
        self.edit.validate()?;
        let gap = self.compare.side_pane_gap;
        if !gap.is_finite() || gap < 0.0 {
            return Err(invalid(format!(
                "compare.side_pane_gap must be finite and non-negative, got {gap}"
            )));
        }
        if !(1..=JPEG_MAX_QUALITY).contains(&self.export.jpeg_quality) {
            return Err(invalid(format!(
                "export.jpeg_quality must be in 1..={JPEG_MAX_QUALITY}, got {}",
                self.export.jpeg_quality
            )));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> ReviveError {
    ReviveError::InvalidConfig(reason)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Fraction of the container filled by fit-all (0.0..1.0].
    pub fit_margin: f64,
    /// Multiplier of one zoom-in / zoom-out step.
    pub zoom_step: f64,
    /// `zoom *= 1 - wheel_delta * wheel_zoom_factor`.
    pub wheel_zoom_factor: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            fit_margin: FIT_MARGIN,
            zoom_step: ZOOM_STEP,
            wheel_zoom_factor: WHEEL_ZOOM_FACTOR,
        }
    }
}

impl ViewConfig {
    /// `(min, max)` zoom, ordered. Unusable bounds fall back to the defaults.
    pub fn zoom_range(&self) -> (f64, f64) {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        let min = if usable(self.min_zoom) { self.min_zoom } else { MIN_ZOOM };
        let max = if usable(self.max_zoom) { self.max_zoom } else { MAX_ZOOM };
        (min.min(max), min.max(max))
    }

    /// Clamp a zoom into the configured range. Non-finite or non-positive
    /// values fall back to 100%.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
        let (min, max) = self.zoom_range();
        zoom.clamp(min, max)
    }

    fn validate(&self) -> Result<()> {
        let finite = [
            ("view.min_zoom", self.min_zoom),
            ("view.max_zoom", self.max_zoom),
            ("view.fit_margin", self.fit_margin),
            ("view.zoom_step", self.zoom_step),
            ("view.wheel_zoom_factor", self.wheel_zoom_factor),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite, got {value}")));
            }
        }
        if self.min_zoom <= 0.0 {
            return Err(invalid(format!(
                "view.min_zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(invalid(format!(
                "view.min_zoom ({}) exceeds view.max_zoom ({})",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.fit_margin <= 0.0 || self.fit_margin > 1.0 {
            return Err(invalid(format!(
                "view.fit_margin must be in (0, 1], got {}",
                self.fit_margin
            )));
        }
        if self.zoom_step <= 0.0 {
            return Err(invalid(format!(
                "view.zoom_step must be positive, got {}",
                self.zoom_step
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Straighten range is `[-limit, limit]` degrees.
    pub straighten_limit_deg: f64,
    pub straighten_step_deg: f64,
}

impl EditConfig {
    fn validate(&self) -> Result<()> {
        if !self.straighten_limit_deg.is_finite() || self.straighten_limit_deg < 0.0 {
            return Err(invalid(format!(
                "edit.straighten_limit_deg must be finite and non-negative, got {}",
                self.straighten_limit_deg
            )));
        }
        if !self.straighten_step_deg.is_finite() || self.straighten_step_deg <= 0.0 {
            return Err(invalid(format!(
                "edit.straighten_step_deg must be positive, got {}",
                self.straighten_step_deg
            )));
        }
        Ok(())
    }
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            straighten_limit_deg: STRAIGHTEN_LIMIT_DEG,
            straighten_step_deg: STRAIGHTEN_STEP_DEG,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    pub default_mode: ComparisonMode,
    /// Gap between side-by-side panes, in screen pixels.
    pub side_pane_gap: f64,
    pub default_filter: FilterPreset,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            default_mode: ComparisonMode::Slider,
            side_pane_gap: SIDE_PANE_GAP,
            default_filter: FilterPreset::None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// JPEG quality for committed edits (1..=100).
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: JPEG_MAX_QUALITY,
        }
    }
}
