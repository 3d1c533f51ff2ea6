//! # Extrusion Operations
//!
//! Turns feature contours into renderable solids:
//! - **walls**: a triangle strip per contour, roof vertex first in each pair
//! - **roof**: optional closed-loop outline at the extruded elevation
//! - **base**: optional closed-loop outline at the footprint, wound in reverse
//!
//! ## Heights
//!
//! The roof is either offset from each base point by `height`, or flattened
//! to a single elevation (`max_z + height` over the whole feature). The
//! height offset is subtracted from both.

mod walls;


pub use walls::{extrude, extrude_contours, vertical_tile_height};

use crate::mesh::Mesh;
use crate::outline::Outline;
use config::constants::{DEFAULT_FILL_COLOR, DEFAULT_TILE_HEIGHT, DEFAULT_TILE_WIDTH};
use glam::DVec3;

/// Transform from feature coordinates into the rendering frame.
///
/// Used when the scene is geocentric: the implementation converts a map
/// point to world coordinates and applies the localization matrix.
pub trait RenderFrame: Send + Sync {
    /// Maps a feature point into the rendering frame.
    fn to_render_frame(&self, point: DVec3) -> DVec3;
}

/// Height parameters for one extrusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeParams {
    /// Extrusion height (may be negative)
    pub height: f64,
    /// Subtracted from both the per-point height and the flattened roof
    pub height_offset: f64,
    /// Put every roof point at the same elevation
    pub flatten: bool,
}

impl Default for ExtrudeParams {
    fn default() -> Self {
        Self {
            height: 1.0,
            height_offset: 0.0,
            flatten: false,
        }
    }
}

/// Wall texturing parameters, usually derived from a skin resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureParams {
    /// Real-world width mapped to one texture tile
    pub tile_width: f64,
    /// Real-world height mapped to one texture tile
    pub tile_height: f64,
    /// Texture repeats along the wall height
    pub repeats_vertically: bool,
    /// Emit texture coordinates
    pub textured: bool,
    /// Bind `fill_color` to the wall mesh
    pub use_vertex_color: bool,
    /// Wall color
    pub fill_color: [f32; 4],
}

impl TextureParams {
    /// Parameters for walls with no skin: colored, no texture coordinates.
    pub fn untextured(fill_color: [f32; 4]) -> Self {
        Self {
            tile_width: DEFAULT_TILE_WIDTH,
            tile_height: DEFAULT_TILE_HEIGHT,
            repeats_vertically: false,
            textured: false,
            use_vertex_color: true,
            fill_color,
        }
    }

    /// Parameters for a tiled skin.
    ///
    /// A decal skin replaces the fill color, so no color is bound.
    pub fn skinned(
        tile_width: f64,
        tile_height: f64,
        repeats_vertically: bool,
        decal: bool,
        fill_color: [f32; 4],
    ) -> Self {
        Self {
            tile_width,
            tile_height,
            repeats_vertically,
            textured: true,
            use_vertex_color: !decal,
            fill_color,
        }
    }
}

impl Default for TextureParams {
    fn default() -> Self {
        Self::untextured(DEFAULT_FILL_COLOR)
    }
}

/// Which outputs to build besides the walls.
#[derive(Clone, Copy, Default)]
pub struct ExtrudeOptions<'a> {
    /// Build a roof outline with this color
    pub roof: Option<[f32; 4]>,
    /// Build a base outline with this color
    pub base: Option<[f32; 4]>,
    /// Transform vertices into the rendering frame
    pub frame: Option<&'a dyn RenderFrame>,
}

impl std::fmt::Debug for ExtrudeOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtrudeOptions")
            .field("roof", &self.roof)
            .field("base", &self.base)
            .field("frame", &self.frame.is_some())
            .finish()
    }
}

/// Result of one extrusion.
#[derive(Debug, Clone, PartialEq)]
pub struct Extrusion {
    /// Wall triangles, one part per contour
    pub walls: Mesh,
    /// Roof outline, when requested
    pub roof: Option<Outline>,
    /// Base outline, when requested
    pub base: Option<Outline>,
    /// At least one vertex pair was emitted
    pub made_geometry: bool,
}
