//! # Wall Extrusion
//!
//! Builds the wall strip of every contour plus the optional roof and base
//! outlines in a single pass.
//!
//! ## Vertex layout
//!
//! ```text
//! roof:  0   2   4   6        quad i: (p, p+1, p+2), (p+1, p+3, p+2)
//!        | \ | \ | \ |        rings wrap the last quad to the first pair
//! base:  1   3   5   7
//! ```

use super::{ExtrudeOptions, ExtrudeParams, Extrusion, TextureParams};
use crate::contour::{Contour, ElevationRange};
use crate::error::MeshError;
use crate::mesh::{vertex_index, Mesh};
use crate::outline::Outline;
use config::constants::{
    DEFAULT_TILE_HEIGHT, DEFAULT_TILE_WIDTH, EPSILON, MAX_MESH_VERTICES, MIN_TILE_DIVISOR,
};
use glam::{DVec2, DVec3};

/// Fits a whole number of texture tiles onto the tallest wall.
///
/// Returns the tile height stretched or compressed so that
/// `round(max_height / tile_height)` tiles (at least one) span exactly
/// `max_height`. The result is always positive: a zero wall height or an
/// invalid tile height falls back to the tile height itself.
///
/// # Example
///
/// ```rust
/// use extrude_mesh::ops::extrude::vertical_tile_height;
///
/// // 10 units of wall, 3-unit tiles: three tiles of 3.333...
/// let adjusted = vertical_tile_height(10.0, 3.0);
/// assert!((adjusted * 3.0 - 10.0).abs() < 1e-9);
///
/// // 1 unit of wall, 3-unit tiles: rounds to zero tiles, one stretched tile
/// assert!((vertical_tile_height(1.0, 3.0) - 1.0).abs() < 1e-9);
/// ```
pub fn vertical_tile_height(max_height: f64, tile_height: f64) -> f64 {
    let tile = positive_or(tile_height, DEFAULT_TILE_HEIGHT);
    let span = max_height.abs();
    if !span.is_finite() || span < EPSILON {
        return tile;
    }
    let div = (span / tile).round().max(MIN_TILE_DIVISOR);
    span / div
}

/// Extrudes contours, computing the elevation range from the contours
/// themselves.
///
/// Use [`extrude`] when the contours are a subset of a larger feature and
/// the roof must line up with the rest of it.
pub fn extrude_contours(
    contours: &[Contour],
    params: &ExtrudeParams,
    texture: &TextureParams,
    options: &ExtrudeOptions<'_>,
) -> Result<Extrusion, MeshError> {
    let range = ElevationRange::of(contours).unwrap_or(ElevationRange {
        min_z: 0.0,
        max_z: 0.0,
    });
    extrude(contours, range, params, texture, options)
}

/// Extrudes contours into walls and optional roof/base outlines.
///
/// ## Parameters
///
/// - `contours`: Rings and lines to extrude, each becoming one part
/// - `range`: Elevation range of the whole feature; sets the flattened
///   roof elevation and the vertical texture normalization
/// - `params`: Height, height offset and flatten mode
/// - `texture`: Wall tiling and color
/// - `options`: Roof/base outlines and rendering-frame transform
///
/// ## Returns
///
/// The extrusion; `made_geometry` is false when no contour had a point.
///
/// # Errors
///
/// `MeshError::TooManyVertices` when the wall strip would not fit `u32`
/// indices.
///
/// # Example
///
/// ```rust
/// use extrude_mesh::ops::extrude::{extrude_contours, ExtrudeOptions, ExtrudeParams, TextureParams};
/// use extrude_mesh::Contour;
/// use glam::DVec3;
///
/// let square = Contour::ring(vec![
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(1.0, 0.0, 0.0),
///     DVec3::new(1.0, 1.0, 0.0),
///     DVec3::new(0.0, 1.0, 0.0),
/// ]);
/// let params = ExtrudeParams { height: 10.0, ..Default::default() };
/// let result = extrude_contours(&[square], &params, &TextureParams::default(), &ExtrudeOptions::default())?;
/// assert_eq!(result.walls.vertex_count(), 8);
/// assert_eq!(result.walls.index_count(), 24);
/// # Ok::<(), extrude_mesh::MeshError>(())
/// ```
pub fn extrude(
    contours: &[Contour],
    range: ElevationRange,
    params: &ExtrudeParams,
    texture: &TextureParams,
    options: &ExtrudeOptions<'_>,
) -> Result<Extrusion, MeshError> {
    let point_count: usize = contours.iter().map(Contour::len).sum();
    if 2 * point_count > MAX_MESH_VERTICES {
        return Err(MeshError::too_many_vertices(2 * point_count));
    }
    let mut walls = Mesh::with_capacity(2 * point_count, 2 * point_count);
    let mut texcoords: Option<Vec<DVec2>> = texture
        .textured
        .then(|| Vec::with_capacity(2 * point_count));
    if texture.use_vertex_color {
        walls.set_color(texture.fill_color);
    }
    let mut roof = options.roof.map(Outline::new);
    let mut base = options.base.map(Outline::new);

    let height = params.height - params.height_offset;
    let target_len = range.max_z + params.height - params.height_offset;
    let tile_width = positive_or(texture.tile_width, DEFAULT_TILE_WIDTH);
    let tile_height = vertical_tile_height(target_len - range.min_z, texture.tile_height);

    let mut made_geometry = false;

    for contour in contours {
        let n = contour.len();
        let part_start = vertex_index(walls.vertex_count())?;
        let triangle_start = walls.triangle_count();
        let roof_start = roof.as_ref().map_or(0, Outline::vertex_count);
        let base_start = base.as_ref().map_or(0, Outline::vertex_count);

        let mut part_len = 0.0;
        let mut previous_roof: Option<DVec3> = None;

        for (i, &base_pt) in contour.points().iter().enumerate() {
            let roof_pt = if params.flatten {
                DVec3::new(base_pt.x, base_pt.y, target_len)
            } else {
                DVec3::new(base_pt.x, base_pt.y, base_pt.z + height)
            };

            let (roof_pt, base_pt) = match options.frame {
                Some(frame) => (frame.to_render_frame(roof_pt), frame.to_render_frame(base_pt)),
                None => (roof_pt, base_pt),
            };

            // roof first: triangle winding depends on it
            let p = walls.add_vertex(roof_pt)?;
            walls.add_vertex(base_pt)?;

            if let Some(previous) = previous_roof {
                part_len += roof_pt.distance(previous);
            }
            previous_roof = Some(roof_pt);

            if let Some(uv) = texcoords.as_mut() {
                let h = if texture.repeats_vertically {
                    -roof_pt.distance(base_pt)
                } else {
                    -tile_height
                };
                let u = part_len / tile_width;
                uv.push(DVec2::new(u, 0.0));
                uv.push(DVec2::new(u, h / tile_height));
            }

            if i + 1 < n {
                walls.add_triangle(p, p + 1, p + 2);
                walls.add_triangle(p + 1, p + 3, p + 2);
            } else if contour.is_closed() && n >= 3 {
                walls.add_triangle(p, p + 1, part_start);
                walls.add_triangle(p + 1, part_start + 1, part_start);
            }

            if let Some(roof) = roof.as_mut() {
                roof.add_vertex(roof_pt);
            }
            if let Some(base) = base.as_mut() {
                base.add_vertex(base_pt);
            }

            made_geometry = true;
        }

        walls.add_part(triangle_start..walls.triangle_count());

        if let Some(roof) = roof.as_mut() {
            let end = roof.vertex_count();
            roof.add_loop(roof_start..end);
        }
        if let Some(base) = base.as_mut() {
            let end = base.vertex_count();
            reverse_loop(&mut base.vertices_mut()[base_start..end]);
            base.add_loop(base_start..end);
        }
    }

    if let Some(uv) = texcoords {
        walls.set_texcoords(uv);
    }

    Ok(Extrusion {
        walls,
        roof,
        base,
        made_geometry,
    })
}

/// Reverses the winding of a loop, keeping its first vertex in place.
fn reverse_loop(vertices: &mut [DVec3]) {
    if vertices.len() > 2 {
        vertices[1..].reverse();
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
