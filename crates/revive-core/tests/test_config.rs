use revive_core::compare::ComparisonMode;
use revive_core::config::{StudioConfig, ViewConfig};
use revive_core::consts::{FIT_MARGIN, MAX_ZOOM, MIN_ZOOM, STRAIGHTEN_LIMIT_DEG};
use revive_core::edit::EditSession;
use revive_core::error::ReviveError;
use revive_core::filter::FilterPreset;
use revive_core::generation::GenerationCounter;
use revive_core::geometry::{Container, Dimensions};
use revive_core::view::{ViewState, Viewer};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_defaults_match_constants() {
    let config = StudioConfig::default();
    assert_eq!(config.view.min_zoom, MIN_ZOOM);
    assert_eq!(config.view.max_zoom, MAX_ZOOM);
    assert_eq!(config.view.fit_margin, FIT_MARGIN);
    assert_eq!(config.view.zoom_step, 1.1);
    assert_eq!(config.edit.straighten_limit_deg, 15.0);
    assert_eq!(config.edit.straighten_step_deg, 0.5);
    assert_eq!(config.compare.default_mode, ComparisonMode::Slider);
    assert_eq!(config.compare.default_filter, FilterPreset::None);
    assert_eq!(config.export.jpeg_quality, 100);
}

#[test]
fn test_clamp_zoom() {
    let view = ViewConfig::default();
    assert_eq!(view.clamp_zoom(0.01), 0.1);
    assert_eq!(view.clamp_zoom(12.0), 10.0);
    assert_eq!(view.clamp_zoom(2.5), 2.5);
    assert_eq!(view.clamp_zoom(f64::NAN), 1.0);
    assert_eq!(view.clamp_zoom(-3.0), 1.0);
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

#[test]
fn test_config_json_round_trip() {
    let mut config = StudioConfig::default();
    config.compare.default_mode = ComparisonMode::Side;
    config.compare.default_filter = FilterPreset::Vintage;
    config.view.max_zoom = 4.0;

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"side\""));
    assert!(json.contains("\"vintage\""));
    let back: StudioConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_partial_config_fills_defaults() {
    let config: StudioConfig =
        serde_json::from_str(r#"{"view": {"max_zoom": 3.0}, "export": {}}"#).unwrap();
    assert_eq!(config.view.max_zoom, 3.0);
    assert_eq!(config.view.min_zoom, MIN_ZOOM);
    assert_eq!(config.edit, StudioConfig::default().edit);
    assert_eq!(config.export.jpeg_quality, 100);
}

// ---------------------------------------------------------------------------
// Generations
// ---------------------------------------------------------------------------

#[test]
fn test_generation_counter_supersedes() {
    let mut counter = GenerationCounter::new();
    let first = counter.advance();
    assert!(counter.is_current(first));
    let second = counter.advance();
    assert!(!counter.is_current(first));
    assert!(counter.is_current(second));
    assert!(second > first);
    assert_eq!(format!("{second}"), "#2");
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_default_config_validates() {
    assert!(StudioConfig::default().validate().is_ok());
}

#[test]
fn test_inverted_zoom_range_rejected() {
    let config: StudioConfig =
        serde_json::from_str(r#"{"view": {"min_zoom": 2.0, "max_zoom": 1.0}}"#).unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ReviveError::InvalidConfig(_)));
    assert!(err.to_string().contains("min_zoom"));
}

#[test]
fn test_inverted_zoom_range_does_not_panic_when_used() {
    let config: StudioConfig =
        serde_json::from_str(r#"{"view": {"min_zoom": 2.0, "max_zoom": 1.0}}"#).unwrap();
    assert_eq!(config.view.zoom_range(), (1.0, 2.0));
    assert_eq!(config.view.clamp_zoom(5.0), 2.0);

    let mut viewer = Viewer::new(config);
    viewer.set_container(Container::sized(400.0, 300.0));
    viewer.set_dimensions(None, Some(Dimensions::new(4000, 3000)));
    assert_eq!(viewer.view().zoom, 1.0);
    viewer.zoom_in();
    viewer.wheel(-100.0);
    assert!(viewer.view().zoom <= 2.0);
}

#[test]
fn test_nan_config_values_rejected() {
    let mut config = StudioConfig::default();
    config.view.max_zoom = f64::NAN;
    assert!(matches!(config.validate(), Err(ReviveError::InvalidConfig(_))));
    assert_eq!(config.view.clamp_zoom(50.0), MAX_ZOOM);

    let mut config = StudioConfig::default();
    config.edit.straighten_limit_deg = f64::NAN;
    assert!(matches!(config.validate(), Err(ReviveError::InvalidConfig(_))));
}

#[test]
fn test_out_of_range_values_rejected() {
    let cases: [fn(&mut StudioConfig); 5] = [
        |c| c.view.fit_margin = 0.0,
        |c| c.view.zoom_step = -1.0,
        |c| c.edit.straighten_step_deg = 0.0,
        |c| c.compare.side_pane_gap = -4.0,
        |c| c.export.jpeg_quality = 0,
    ];
    for mutate in cases {
        let mut config = StudioConfig::default();
        mutate(&mut config);
        assert!(config.validate().is_err(), "{config:?}");
    }
}

#[test]
fn test_nan_straighten_limit_falls_back_to_default() {
    let mut session = EditSession::new(ViewState::centered(1.0), f64::NAN);
    assert_eq!(session.straighten_limit(), STRAIGHTEN_LIMIT_DEG);
    session.set_straighten(5.0);
    assert_eq!(session.params().straighten_deg(), 5.0);
    session.set_straighten(40.0);
    assert_eq!(session.params().straighten_deg(), STRAIGHTEN_LIMIT_DEG);
}

#[test]
fn test_negative_straighten_limit_is_mirrored() {
    let mut session = EditSession::new(ViewState::centered(1.0), -10.0);
    session.set_straighten(-30.0);
    assert_eq!(session.params().straighten_deg(), -10.0);
}
