mod common;

use cardiogate_core::error::GatingError;
use cardiogate_core::frame::CropRegion;
use cardiogate_core::gating::{AppConfig, DisplayConfig, GatingConfig, GatingSession, PeakMode, Phase};

use common::write_temp;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_gating_config_defaults() {
    let c = GatingConfig::default();
    assert_eq!(c.intramural_threshold, 0.6);
    assert_eq!(c.lowcut, 0.45);
    assert_eq!(c.highcut, 1.8);
    assert_eq!(c.order, 4);
    assert_eq!(c.window_size, 5);
    assert_eq!(c.min_height_percentile, 50.0);
    assert_eq!(c.min_distance, 5);
    assert_eq!(c.auto_gating_threshold, 5);
    assert!(c.both_extrema);
    assert!(c.validate().is_ok());
}

#[test]
fn test_app_config_defaults() {
    let c = AppConfig::default();
    assert_eq!(c.frame_rate, 30.0);
    assert_eq!(
        c.crop,
        CropRegion {
            row_start: 50,
            row_end: 450,
            col_start: 50,
            col_end: 450
        }
    );
    assert_eq!(c.display, DisplayConfig::default());
}

// ---------------------------------------------------------------------------
// PeakMode
// ---------------------------------------------------------------------------

#[test]
fn test_peak_mode_from_flag() {
    assert_eq!(PeakMode::from(true), PeakMode::AllExtrema);
    assert_eq!(PeakMode::from(false), PeakMode::MaximaOnly);
}

#[test]
fn test_peak_mode_display() {
    assert_eq!(format!("{}", PeakMode::AllExtrema), "Extrema");
    assert_eq!(format!("{}", PeakMode::MaximaOnly), "Maxima");
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_validate_rejects_zero_window() {
    let c = GatingConfig {
        window_size: 0,
        ..Default::default()
    };
    assert!(matches!(c.validate(), Err(GatingError::Config(_))));
}

#[test]
fn test_validate_rejects_zero_distance() {
    let c = GatingConfig {
        min_distance: 0,
        ..Default::default()
    };
    assert!(c.validate().is_err());
}

#[test]
fn test_validate_rejects_percentile_out_of_range() {
    let c = GatingConfig {
        min_height_percentile: 120.0,
        ..Default::default()
    };
    assert!(c.validate().is_err());
}

#[test]
fn test_validate_rejects_swapped_cutoffs() {
    let c = GatingConfig {
        lowcut: 2.0,
        highcut: 1.0,
        ..Default::default()
    };
    assert!(c.validate().is_err());
}

// ---------------------------------------------------------------------------
// TOML
// ---------------------------------------------------------------------------

#[test]
fn test_toml_round_trip() {
    let mut config = AppConfig::default();
    config.gating.both_extrema = false;
    config.gating.min_distance = 8;
    config.frame_rate = 25.0;
    config.display.diastole_color = [0, 0, 255];

    let text = config.to_toml_string().unwrap();
    let back = AppConfig::from_toml_str(&text).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_partial_toml_uses_defaults() {
    let config = AppConfig::from_toml_str("[gating]\nlowcut = 0.5\n").unwrap();
    assert_eq!(config.gating.lowcut, 0.5);
    assert_eq!(config.gating.highcut, 1.8);
    assert_eq!(config.frame_rate, 30.0);
    assert_eq!(config.crop, CropRegion::default());
}

#[test]
fn test_empty_toml_is_default() {
    assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
}

#[test]
fn test_invalid_toml_values_rejected() {
    let err = AppConfig::from_toml_str("[gating]\norder = 0\n").unwrap_err();
    assert!(matches!(err, GatingError::Config(_)));
    let err = AppConfig::from_toml_str("[gating]\norder = \"four\"\n").unwrap_err();
    assert!(matches!(err, GatingError::Config(_)));
}

#[test]
fn test_load_config_file() {
    let file = write_temp("frame_rate = 12.5\n\n[crop]\nrow_start = 0\nrow_end = 100\ncol_start = 0\ncol_end = 100\n", ".toml");
    let config = AppConfig::load(file.path()).unwrap();
    assert_eq!(config.frame_rate, 12.5);
    assert_eq!(config.crop.row_end, 100);
    assert_eq!(config.gating, GatingConfig::default());
}

// ---------------------------------------------------------------------------
// Serialization of results
// ---------------------------------------------------------------------------

#[test]
fn test_session_json_round_trip() {
    let mut session = GatingSession::new();
    session.assign(&[2, 31], &[16, 45]);
    session.set_current_frame(16);

    let json = serde_json::to_string(&session).unwrap();
    let back: GatingSession = serde_json::from_str(&json).unwrap();
    assert_eq!(back.diastole_frames(), vec![2, 31]);
    assert_eq!(back.systole_frames(), vec![16, 45]);
    assert_eq!(back.phase_of(45), Some(Phase::Systole));
    assert_eq!(back.current_frame(), 16);
}

#[test]
fn test_gating_config_json_round_trip() {
    let config = GatingConfig {
        auto_gating_threshold: 7,
        ..Default::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: GatingConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
