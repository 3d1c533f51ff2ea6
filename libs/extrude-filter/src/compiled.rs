//! # Compiled Style
//!
//! The style-derived values the filter needs for every feature, resolved
//! once per style version instead of re-walking the symbols per feature.

use crate::error::FilterError;
use crate::expression::NumericExpression;
use crate::style::{HeightReference, PolygonSymbol, SkinSymbol, Style, StyleSheet};
use config::constants::{
    cos_angle_threshold, ExtrudeConfig, DEFAULT_FILL_COLOR, DEFAULT_ROOF_ANGLE_THRESHOLD_DEG,
};

/// Plain-field snapshot of an extrusion style.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStyle {
    /// Name of the source style
    pub style_name: String,
    /// Fixed height
    pub height: f64,
    /// Per-feature height, preferred over `height`
    pub height_expression: Option<NumericExpression>,
    /// Per-feature height offset; set for heights relative to the feature maximum
    pub height_offset_expression: Option<NumericExpression>,
    /// Flatten roofs
    pub flatten: bool,
    /// Wall texture query
    pub wall_skin: Option<SkinSymbol>,
    /// Roof texture query
    pub roof_skin: Option<SkinSymbol>,
    /// Wall color
    pub wall_fill: [f32; 4],
    /// Roof color
    pub roof_fill: [f32; 4],
    /// Cosine of the wall crease angle
    pub cos_wall_angle_threshold: f64,
    /// Cosine of the roof crease angle
    pub cos_roof_angle_threshold: f64,
}

impl CompiledStyle {
    /// Compiles `style`, resolving the wall and roof styles it references.
    ///
    /// Wall and roof skins and colors come from the referenced styles, and
    /// fall back to the style's own symbols when those are absent.
    ///
    /// # Errors
    ///
    /// - [`FilterError::MissingExtrusionSymbol`] if the style cannot extrude
    /// - [`FilterError::Config`] if a crease angle is out of range
    pub fn compile(
        style: &Style,
        sheet: Option<&StyleSheet>,
        config: &ExtrudeConfig,
    ) -> Result<Self, FilterError> {
        let extrusion = style
            .extrusion
            .as_ref()
            .ok_or_else(|| FilterError::missing_extrusion(&style.name))?;

        let wall_style = referenced_style(sheet, extrusion.wall_style.as_deref());
        let roof_style = referenced_style(sheet, extrusion.roof_style.as_deref());

        let skin_of = |s: Option<&Style>| {
            s.and_then(|s| s.skin.clone()).or_else(|| style.skin.clone())
        };
        let fill_of = |s: Option<&Style>| {
            s.and_then(|s| s.polygon)
                .or(style.polygon)
                .map_or(DEFAULT_FILL_COLOR, |p: PolygonSymbol| p.fill)
        };

        let wall_angle = extrusion
            .wall_angle_threshold_deg
            .unwrap_or(config.wall_angle_threshold_deg);
        let roof_angle = extrusion
            .roof_angle_threshold_deg
            .unwrap_or(DEFAULT_ROOF_ANGLE_THRESHOLD_DEG);

        let height_offset_expression = match extrusion.height_reference {
            HeightReference::Absolute => None,
            HeightReference::RelativeToMaxZ => Some(NumericExpression::max_z()),
        };

        Ok(Self {
            style_name: style.name.clone(),
            height: extrusion.height,
            height_expression: extrusion.height_expression.clone(),
            height_offset_expression,
            flatten: extrusion.flatten,
            wall_skin: skin_of(wall_style),
            roof_skin: skin_of(roof_style),
            wall_fill: fill_of(wall_style),
            roof_fill: fill_of(roof_style),
            cos_wall_angle_threshold: cos_angle_threshold(wall_angle)?,
            cos_roof_angle_threshold: cos_angle_threshold(roof_angle)?,
        })
    }
}

fn referenced_style<'s>(sheet: Option<&'s StyleSheet>, name: Option<&str>) -> Option<&'s Style> {
    sheet.zip(name).and_then(|(sheet, name)| sheet.get_style(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::ExtrusionSymbol;
    use approx::assert_relative_eq;
    use config::constants::ConfigError;

    const SAND: [f32; 4] = [0.9, 0.8, 0.6, 1.0];
    const SLATE: [f32; 4] = [0.3, 0.3, 0.35, 1.0];

    fn skin(library: &str) -> SkinSymbol {
        SkinSymbol {
            library: Some(library.into()),
            ..Default::default()
        }
    }

    fn sheet() -> StyleSheet {
        StyleSheet::new()
            .with_style(Style::new("walls").with_skin(skin("facades")).with_fill(SAND))
            .with_style(Style::new("roofs").with_fill(SLATE))
    }

    #[test]
    fn test_missing_extrusion() {
        let err = CompiledStyle::compile(&Style::new("plain"), None, &ExtrudeConfig::default());
        assert_eq!(err, Err(FilterError::missing_extrusion("plain")));
    }

    #[test]
    fn test_defaults() {
        let style = Style::new("b").with_extrusion(ExtrusionSymbol::default());
        let compiled = CompiledStyle::compile(&style, None, &ExtrudeConfig::default()).unwrap();
        assert_eq!(compiled.wall_fill, DEFAULT_FILL_COLOR);
        assert_eq!(compiled.roof_fill, DEFAULT_FILL_COLOR);
        assert!(compiled.wall_skin.is_none() && compiled.roof_skin.is_none());
        assert!(compiled.height_offset_expression.is_none());
        assert_relative_eq!(compiled.cos_wall_angle_threshold, 0.5, epsilon = 1e-12);
        assert_relative_eq!(compiled.cos_roof_angle_threshold, -1.0);
    }

    #[test]
    fn test_referenced_styles_resolve() {
        let style = Style::new("b").with_extrusion(ExtrusionSymbol {
            wall_style: Some("walls".into()),
            roof_style: Some("roofs".into()),
            ..Default::default()
        });
        let compiled =
            CompiledStyle::compile(&style, Some(&sheet()), &ExtrudeConfig::default()).unwrap();
        assert_eq!(compiled.wall_fill, SAND);
        assert_eq!(compiled.roof_fill, SLATE);
        assert_eq!(compiled.wall_skin, Some(skin("facades")));
        assert!(compiled.roof_skin.is_none());
    }

    #[test]
    fn test_fallback_to_own_symbols() {
        let style = Style::new("b")
            .with_extrusion(ExtrusionSymbol {
                roof_style: Some("roofs".into()),
                ..Default::default()
            })
            .with_skin(skin("own"))
            .with_fill(SAND);
        let compiled =
            CompiledStyle::compile(&style, Some(&sheet()), &ExtrudeConfig::default()).unwrap();
        assert_eq!(compiled.wall_fill, SAND);
        assert_eq!(compiled.wall_skin, Some(skin("own")));
        // roof style has a color but no skin
        assert_eq!(compiled.roof_fill, SLATE);
        assert_eq!(compiled.roof_skin, Some(skin("own")));
    }

    #[test]
    fn test_relative_height_uses_max_z() {
        let style = Style::new("b").with_extrusion(ExtrusionSymbol {
            height_reference: HeightReference::RelativeToMaxZ,
            ..Default::default()
        });
        let compiled = CompiledStyle::compile(&style, None, &ExtrudeConfig::default()).unwrap();
        assert_eq!(compiled.height_offset_expression, Some(NumericExpression::max_z()));
    }

    #[test]
    fn test_threshold_override_and_validation() {
        let config = ExtrudeConfig::new(30.0, true, false).unwrap();
        let style = Style::new("b").with_extrusion(ExtrusionSymbol::default());
        let compiled = CompiledStyle::compile(&style, None, &config).unwrap();
        assert_relative_eq!(compiled.cos_wall_angle_threshold, 30f64.to_radians().cos());

        let bad = Style::new("b").with_extrusion(ExtrusionSymbol {
            wall_angle_threshold_deg: Some(270.0),
            ..Default::default()
        });
        assert_eq!(
            CompiledStyle::compile(&bad, None, &config),
            Err(FilterError::Config(ConfigError::InvalidAngleThreshold(270.0)))
        );
    }
}
