//! Shared fixtures for the filter integration tests.

#![allow(dead_code)]

use extrude_filter::{
    ExtrusionSymbol, Geometry, ResourceLibrary, SimpleFeature, SkinResource, SkinSymbol, Style,
    StyleSheet,
};
use glam::DVec3;
use tracing_subscriber::EnvFilter;

/// Routes filter logs to the test harness; set `RUST_LOG` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Axis-aligned rectangle at elevation `z`, closed (first point repeated).
pub fn rectangle(x: f64, y: f64, w: f64, h: f64, z: f64) -> Vec<DVec3> {
    vec![
        DVec3::new(x, y, z),
        DVec3::new(x + w, y, z),
        DVec3::new(x + w, y + h, z),
        DVec3::new(x, y + h, z),
        DVec3::new(x, y, z),
    ]
}

/// A footprint with a `levels` attribute.
pub fn building(id: u64, x: f64, levels: i32) -> SimpleFeature {
    SimpleFeature::new(id, Geometry::polygon(rectangle(x, 0.0, 8.0, 6.0, 0.0)))
        .with_attribute("levels", levels)
}

/// Style extruding `[levels] * 3` with walls from the `facades` library.
pub fn skinned_style() -> Style {
    Style::new("buildings").with_extrusion(ExtrusionSymbol {
        height_expression: Some("[levels] * 3".parse().unwrap()),
        wall_style: Some("walls".into()),
        roof_style: Some("roofs".into()),
        ..Default::default()
    })
}

/// Facade skins split by object height, plus one roof skin.
pub fn sheet() -> StyleSheet {
    StyleSheet::new()
        .with_style(Style::new("walls").with_skin(SkinSymbol {
            library: Some("facades".into()),
            ..Default::default()
        }))
        .with_style(
            Style::new("roofs")
                .with_skin(SkinSymbol {
                    library: Some("roofing".into()),
                    ..Default::default()
                })
                .with_fill([0.4, 0.2, 0.2, 1.0]),
        )
        .with_library(
            ResourceLibrary::new("facades")
                .with_skin(
                    SkinResource::new("low", "low.png", 4.0, 3.0)
                        .with_object_heights(None, Some(12.0)),
                )
                .with_skin(
                    SkinResource::new("tall", "tall.png", 6.0, 4.0)
                        .with_object_heights(Some(12.0), None)
                        .with_tiled(true),
                ),
        )
        .with_library(
            ResourceLibrary::new("roofing").with_skin(SkinResource::new("tiles", "tiles.png", 2.0, 2.0)),
        )
}

/// Facade library with several interchangeable skins.
pub fn mixed_sheet() -> StyleSheet {
    let mut library = ResourceLibrary::new("facades");
    for name in ["brick", "stone", "stucco", "glass"] {
        library = library.with_skin(SkinResource::new(name, format!("{name}.png"), 4.0, 3.0));
    }
    StyleSheet::new()
        .with_style(Style::new("walls").with_skin(SkinSymbol {
            library: Some("facades".into()),
            ..Default::default()
        }))
        .with_library(library)
}
