//! # Skin Resources
//!
//! Wall and roof textures ("skins") described by their real-world tile size,
//! grouped into named libraries. A style's skin symbol queries a library;
//! every matching skin is a candidate.

use crate::bucket::StateKey;
use crate::style::SkinSymbol;
use extrude_mesh::ops::TextureParams;
use serde::{Deserialize, Serialize};

/// How a skin combines with the wall color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TexEnvMode {
    /// Texture is tinted by the fill color
    #[default]
    Modulate,
    /// Texture replaces the fill color
    Decal,
}

/// A texture with the real-world size of one tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinResource {
    /// Unique name within the library; also the bucket identity
    pub name: String,
    /// Image location
    pub image_url: String,
    /// Width of one tile, in map units
    pub image_width: f64,
    /// Height of one tile, in map units
    pub image_height: f64,
    /// Texture repeats along the wall height
    #[serde(default)]
    pub tiled: bool,
    /// Color combination
    #[serde(default)]
    pub tex_env_mode: TexEnvMode,
    /// Lowest object this skin suits
    #[serde(default)]
    pub min_object_height: Option<f64>,
    /// Tallest object this skin suits
    #[serde(default)]
    pub max_object_height: Option<f64>,
    /// Free-form tags matched against the query
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SkinResource {
    /// Creates a modulating, non-repeating skin with no height limits.
    pub fn new(
        name: impl Into<String>,
        image_url: impl Into<String>,
        image_width: f64,
        image_height: f64,
    ) -> Self {
        Self {
            name: name.into(),
            image_url: image_url.into(),
            image_width,
            image_height,
            tiled: false,
            tex_env_mode: TexEnvMode::Modulate,
            min_object_height: None,
            max_object_height: None,
            tags: Vec::new(),
        }
    }

    /// Sets vertical repetition.
    pub fn with_tiled(mut self, tiled: bool) -> Self {
        self.tiled = tiled;
        self
    }

    /// Sets the color combination.
    pub fn with_tex_env_mode(mut self, mode: TexEnvMode) -> Self {
        self.tex_env_mode = mode;
        self
    }

    /// Restricts the skin to objects within a height range.
    pub fn with_object_heights(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_object_height = min;
        self.max_object_height = max;
        self
    }

    /// Adds a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Returns true if the skin satisfies every constraint of `query`.
    pub fn matches(&self, query: &SkinSymbol) -> bool {
        let name_ok = query.name.as_ref().map_or(true, |n| *n == self.name);
        let height_ok = query.object_height.map_or(true, |h| {
            self.min_object_height.map_or(true, |min| h >= min)
                && self.max_object_height.map_or(true, |max| h <= max)
        });
        let tags_ok = query.tags.iter().all(|t| self.tags.contains(t));
        name_ok && height_ok && tags_ok
    }

    /// Wall texturing parameters for this skin.
    pub fn texture_params(&self, fill_color: [f32; 4]) -> TextureParams {
        TextureParams::skinned(
            self.image_width,
            self.image_height,
            self.tiled,
            self.tex_env_mode == TexEnvMode::Decal,
            fill_color,
        )
    }

    /// Rendering-state bucket for geometry wearing this skin.
    pub fn state_key(&self) -> StateKey {
        StateKey::Skin(self.name.clone())
    }
}

/// A named collection of skins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceLibrary {
    /// Library name referenced by skin symbols
    pub name: String,
    /// Skins in declaration order
    #[serde(default)]
    pub skins: Vec<SkinResource>,
}

impl ResourceLibrary {
    /// Creates an empty library.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skins: Vec::new(),
        }
    }

    /// Adds a skin.
    pub fn with_skin(mut self, skin: SkinResource) -> Self {
        self.skins.push(skin);
        self
    }

    /// Returns every skin matching `query`, in declaration order.
    pub fn get_skins(&self, query: &SkinSymbol) -> Vec<&SkinResource> {
        self.skins.iter().filter(|s| s.matches(query)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> ResourceLibrary {
        ResourceLibrary::new("facades")
            .with_skin(
                SkinResource::new("brick", "brick.png", 4.0, 3.0)
                    .with_object_heights(None, Some(15.0))
                    .with_tag("residential"),
            )
            .with_skin(
                SkinResource::new("glass", "glass.png", 6.0, 4.0)
                    .with_object_heights(Some(15.0), None)
                    .with_tag("commercial"),
            )
            .with_skin(SkinResource::new("stucco", "stucco.png", 5.0, 5.0).with_tag("residential"))
    }

    fn names(skins: Vec<&SkinResource>) -> Vec<&str> {
        skins.into_iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_unconstrained_query_matches_all() {
        assert_eq!(library().get_skins(&SkinSymbol::default()).len(), 3);
    }

    #[test]
    fn test_height_filter() {
        let lib = library();
        let low = SkinSymbol {
            object_height: Some(9.0),
            ..Default::default()
        };
        assert_eq!(names(lib.get_skins(&low)), ["brick", "stucco"]);

        let tall = SkinSymbol {
            object_height: Some(40.0),
            ..Default::default()
        };
        assert_eq!(names(lib.get_skins(&tall)), ["glass", "stucco"]);
    }

    #[test]
    fn test_tag_and_name_filters() {
        let lib = library();
        let residential = SkinSymbol {
            tags: vec!["residential".into()],
            ..Default::default()
        };
        assert_eq!(names(lib.get_skins(&residential)), ["brick", "stucco"]);

        let named = SkinSymbol {
            name: Some("glass".into()),
            ..Default::default()
        };
        assert_eq!(names(lib.get_skins(&named)), ["glass"]);
    }

    #[test]
    fn test_texture_params() {
        let skin = SkinResource::new("brick", "brick.png", 4.0, 3.0).with_tiled(true);
        let params = skin.texture_params([0.5; 4]);
        assert!(params.textured && params.use_vertex_color && params.repeats_vertically);
        assert_eq!((params.tile_width, params.tile_height), (4.0, 3.0));

        let decal = skin.with_tex_env_mode(TexEnvMode::Decal).texture_params([0.5; 4]);
        assert!(!decal.use_vertex_color);
    }

    #[test]
    fn test_state_key_is_skin_name() {
        let skin = SkinResource::new("brick", "brick.png", 4.0, 3.0);
        assert_eq!(skin.state_key(), StateKey::Skin("brick".into()));
    }
}
