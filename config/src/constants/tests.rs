//! Tests for the runtime configuration snapshot.

use super::*;

/// Ensures default settings are sane.
#[test]
fn default_config_is_valid() {
    let cfg = ExtrudeConfig::default();
    assert!(cfg.wall_angle_threshold_deg > 0.0);
    assert!(cfg.merge_geometry);
    assert!(!cfg.parallel);
}

/// Validates the builder rejects out-of-range thresholds.
#[test]
fn new_validates_threshold() {
    assert_eq!(
        ExtrudeConfig::new(0.0, true, false).unwrap_err(),
        ConfigError::InvalidAngleThreshold(0.0)
    );
    assert_eq!(
        ExtrudeConfig::new(200.0, true, false).unwrap_err(),
        ConfigError::InvalidAngleThreshold(200.0)
    );
    assert!(ExtrudeConfig::new(f64::NAN, true, false).is_err());
    assert!(ExtrudeConfig::new(180.0, true, false).is_ok());
}

#[test]
fn cosine_uses_degrees() {
    assert!((cos_angle_threshold(60.0).unwrap() - 0.5).abs() < 1e-12);
    assert!(cos_angle_threshold(90.0).unwrap().abs() < 1e-12);
}

#[test]
fn config_error_display_mentions_value() {
    let err = ConfigError::InvalidAngleThreshold(-3.0);
    assert!(err.to_string().contains("-3"));
}

#[test]
fn cos_angle_threshold_rejects_what_config_rejects() {
    for degrees in [-1.0, 0.0, 181.0, f64::INFINITY] {
        assert!(cos_angle_threshold(degrees).is_err());
        assert!(ExtrudeConfig::new(degrees, true, false).is_err());
    }
}
