//! # Styles
//!
//! Symbolic styling input. A [`Style`] carries optional symbols; the
//! extrusion symbol may point at other styles of the [`StyleSheet`] for its
//! walls and roof.

use crate::expression::NumericExpression;
use crate::resource::ResourceLibrary;
use config::constants::{DEFAULT_EXTRUSION_HEIGHT, DEFAULT_FILL_COLOR};
use serde::{Deserialize, Serialize};

/// Where the extrusion height is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeightReference {
    /// Height is added to each point's own elevation
    #[default]
    Absolute,
    /// Height is measured from the feature's highest point
    RelativeToMaxZ,
}

/// Extrusion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrusionSymbol {
    /// Fixed height, used when no expression is set
    pub height: f64,
    /// Height evaluated per feature
    pub height_expression: Option<NumericExpression>,
    /// Height reference mode
    pub height_reference: HeightReference,
    /// Put the whole roof at one elevation
    pub flatten: bool,
    /// Style supplying wall skin and color
    pub wall_style: Option<String>,
    /// Style supplying roof skin and color
    pub roof_style: Option<String>,
    /// Wall crease angle in degrees, overriding the filter setting
    pub wall_angle_threshold_deg: Option<f64>,
    /// Roof crease angle in degrees
    pub roof_angle_threshold_deg: Option<f64>,
}

impl Default for ExtrusionSymbol {
    fn default() -> Self {
        Self {
            height: DEFAULT_EXTRUSION_HEIGHT,
            height_expression: None,
            height_reference: HeightReference::Absolute,
            flatten: true,
            wall_style: None,
            roof_style: None,
            wall_angle_threshold_deg: None,
            roof_angle_threshold_deg: None,
        }
    }
}

/// Texture query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinSymbol {
    /// Resource library to query
    pub library: Option<String>,
    /// Exact skin name
    pub name: Option<String>,
    /// Tags every candidate must carry
    pub tags: Vec<String>,
    /// Height of the object being skinned
    pub object_height: Option<f64>,
}

/// Fill color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolygonSymbol {
    /// RGBA
    pub fill: [f32; 4],
}

impl Default for PolygonSymbol {
    fn default() -> Self {
        Self {
            fill: DEFAULT_FILL_COLOR,
        }
    }
}

/// A named set of symbols.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Style name
    pub name: String,
    /// Extrusion parameters; required by the extrusion filter
    pub extrusion: Option<ExtrusionSymbol>,
    /// Texture query
    pub skin: Option<SkinSymbol>,
    /// Fill color
    pub polygon: Option<PolygonSymbol>,
}

impl Style {
    /// Creates an empty style.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the extrusion symbol.
    pub fn with_extrusion(mut self, extrusion: ExtrusionSymbol) -> Self {
        self.extrusion = Some(extrusion);
        self
    }

    /// Sets the skin symbol.
    pub fn with_skin(mut self, skin: SkinSymbol) -> Self {
        self.skin = Some(skin);
        self
    }

    /// Sets the fill color.
    pub fn with_fill(mut self, fill: [f32; 4]) -> Self {
        self.polygon = Some(PolygonSymbol { fill });
        self
    }
}

/// Styles and resource libraries shared by a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSheet {
    /// Named styles
    pub styles: Vec<Style>,
    /// Resource libraries
    pub libraries: Vec<ResourceLibrary>,
}

impl StyleSheet {
    /// Creates an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.styles.push(style);
        self
    }

    /// Adds a resource library.
    pub fn with_library(mut self, library: ResourceLibrary) -> Self {
        self.libraries.push(library);
        self
    }

    /// Looks up a style by name.
    pub fn get_style(&self, name: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.name == name)
    }

    /// Looks up a resource library by name.
    pub fn get_library(&self, name: &str) -> Option<&ResourceLibrary> {
        self.libraries.iter().find(|l| l.name == name)
    }
}
