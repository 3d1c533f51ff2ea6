//! # Mesh Data Structure
//!
//! Triangle mesh used for extruded walls and tessellated roofs, with
//! optional texture coordinates, colors and normals.

use crate::error::MeshError;
use config::constants::{DEFAULT_FILL_COLOR, DEGENERATE_AREA_EPSILON, MAX_MESH_VERTICES};
use glam::{DVec2, DVec3};
use std::ops::Range;

/// A triangle mesh with vertices, indices and per-part triangle ranges.
///
/// All geometry calculations use f64. A mesh either carries one overall
/// color (walls and roofs straight out of the extruder) or per-vertex
/// colors (after consolidation merged meshes of different colors).
///
/// # Example
///
/// ```rust
/// use extrude_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0))?;
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0))?;
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0))?;
/// mesh.add_triangle(0, 1, 2);
/// mesh.add_part(0..1);
/// assert_eq!(mesh.index_count(), 3);
/// # Ok::<(), extrude_mesh::MeshError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    vertices: Vec<DVec3>,
    /// Triangle indices (3 indices per triangle)
    triangles: Vec<[u32; 3]>,
    /// Optional per-vertex texture coordinates
    texcoords: Option<Vec<DVec2>>,
    /// Optional color bound to the whole mesh (RGBA)
    color: Option<[f32; 4]>,
    /// Optional per-vertex colors (RGBA)
    colors: Option<Vec<[f32; 4]>>,
    /// Optional vertex normals
    normals: Option<Vec<DVec3>>,
    /// Triangle ranges, one per input contour
    parts: Vec<Range<usize>>,
    /// Optional identification string
    name: Option<String>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            ..Self::default()
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns the number of triangle indices.
    #[inline]
    pub fn index_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// Returns true if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Adds a vertex and returns its index.
    ///
    /// # Errors
    ///
    /// `MeshError::TooManyVertices` once the mesh holds `MAX_MESH_VERTICES`.
    pub fn add_vertex(&mut self, position: DVec3) -> Result<u32, MeshError> {
        let index = vertex_index(self.vertices.len())?;
        self.vertices.push(position);
        Ok(index)
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Registers a contiguous range of triangles as one part.
    pub fn add_part(&mut self, triangles: Range<usize>) {
        self.parts.push(triangles);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns mutable triangles, for operations that re-index corners.
    #[inline]
    pub fn triangles_mut(&mut self) -> &mut [[u32; 3]] {
        &mut self.triangles
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns the triangle at the given index.
    #[inline]
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        self.triangles[index]
    }

    /// Returns the per-part triangle ranges.
    #[inline]
    pub fn parts(&self) -> &[Range<usize>] {
        &self.parts
    }

    /// Sets texture coordinates.
    pub fn set_texcoords(&mut self, texcoords: Vec<DVec2>) {
        self.texcoords = Some(texcoords);
    }

    /// Returns the texture coordinates.
    pub fn texcoords(&self) -> Option<&[DVec2]> {
        self.texcoords.as_deref()
    }

    /// Binds one color to the whole mesh.
    pub fn set_color(&mut self, color: [f32; 4]) {
        self.color = Some(color);
    }

    /// Returns the overall color.
    pub fn color(&self) -> Option<[f32; 4]> {
        self.color
    }

    /// Sets per-vertex colors, replacing any overall color.
    pub fn set_colors(&mut self, colors: Vec<[f32; 4]>) {
        self.color = None;
        self.colors = Some(colors);
    }

    /// Returns the per-vertex colors.
    pub fn colors(&self) -> Option<&[[f32; 4]]> {
        self.colors.as_deref()
    }

    /// Returns the color of a vertex, whichever binding is active.
    pub fn color_at(&self, index: usize) -> Option<[f32; 4]> {
        match &self.colors {
            Some(colors) => colors.get(index).copied(),
            None => self.color,
        }
    }

    /// Sets vertex normals.
    pub fn set_normals(&mut self, normals: Vec<DVec3>) {
        self.normals = Some(normals);
    }

    /// Returns the vertex normals.
    pub fn normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }

    /// Sets the identification string.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Returns the identification string.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Duplicates a vertex with all of its attributes and returns the copy's
    /// index. Normals are not copied; callers recompute them.
    pub fn duplicate_vertex(&mut self, index: u32) -> Result<u32, MeshError> {
        let i = index as usize;
        let copy = self.add_vertex(self.vertices[i])?;
        if let Some(texcoords) = &mut self.texcoords {
            let uv = texcoords[i];
            texcoords.push(uv);
        }
        if let Some(colors) = &mut self.colors {
            let c = colors[i];
            colors.push(c);
        }
        Ok(copy)
    }

    /// Returns the unnormalized normal of a triangle (length is twice its area).
    pub fn face_normal(&self, triangle: usize) -> DVec3 {
        let [a, b, c] = self.triangles[triangle];
        let v0 = self.vertices[a as usize];
        let v1 = self.vertices[b as usize];
        let v2 = self.vertices[c as usize];
        (v1 - v0).cross(v2 - v0)
    }

    /// Computes and sets area-weighted vertex normals with no crease handling.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];

        for tri in &self.triangles {
            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];
            let normal = (v1 - v0).cross(v2 - v0);

            normals[tri[0] as usize] += normal;
            normals[tri[1] as usize] += normal;
            normals[tri[2] as usize] += normal;
        }

        for normal in &mut normals {
            *normal = normal.try_normalize().unwrap_or(DVec3::Z);
        }

        self.normals = Some(normals);
    }

    /// Merges another mesh into this one.
    ///
    /// Attributes present on only one side are filled with neutral values
    /// (zero texcoords, +Z normals). Differing overall colors are expanded
    /// into per-vertex colors. Parts of `other` are appended after the
    /// parts of `self`.
    pub fn merge(&mut self, other: &Mesh) {
        let vertex_offset = self.vertices.len() as u32;
        let triangle_offset = self.triangles.len();
        let own_count = self.vertices.len();
        let other_count = other.vertices.len();

        merge_attribute(
            &mut self.texcoords,
            other.texcoords.as_deref(),
            own_count,
            other_count,
            DVec2::ZERO,
        );
        merge_attribute(
            &mut self.normals,
            other.normals.as_deref(),
            own_count,
            other_count,
            DVec3::Z,
        );
        self.merge_colors(other, own_count);

        self.vertices.extend_from_slice(&other.vertices);
        for tri in &other.triangles {
            self.triangles.push([
                tri[0] + vertex_offset,
                tri[1] + vertex_offset,
                tri[2] + vertex_offset,
            ]);
        }
        for part in &other.parts {
            self.parts
                .push(part.start + triangle_offset..part.end + triangle_offset);
        }
    }

    fn merge_colors(&mut self, other: &Mesh, own_count: usize) {
        if own_count == 0 {
            self.color = other.color;
            self.colors = other.colors.clone();
            return;
        }
        if self.colors.is_none() && other.colors.is_none() && self.color == other.color {
            return;
        }

        let mut colors = self
            .colors
            .take()
            .unwrap_or_else(|| vec![self.color.unwrap_or(DEFAULT_FILL_COLOR); own_count]);
        match &other.colors {
            Some(other_colors) => colors.extend_from_slice(other_colors),
            None => colors.extend(
                std::iter::repeat(other.color.unwrap_or(DEFAULT_FILL_COLOR))
                    .take(other.vertices.len()),
            ),
        }
        self.color = None;
        self.colors = Some(colors);
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All triangle indices are valid
    /// - No degenerate triangles (repeated index or zero area)
    /// - Attribute arrays match the vertex count
    ///
    /// Returns true if valid.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len();

        for tri in &self.triangles {
            if tri.iter().any(|&i| i as usize >= vertex_count) {
                return false;
            }

            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return false;
            }

            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];
            if (v1 - v0).cross(v2 - v0).length() < DEGENERATE_AREA_EPSILON {
                return false;
            }
        }

        let n = self.vertices.len();
        let attributes_match = self.texcoords.as_ref().map_or(true, |t| t.len() == n)
            && self.normals.as_ref().map_or(true, |v| v.len() == n)
            && self.colors.as_ref().map_or(true, |c| c.len() == n);
        let parts_in_range = self
            .parts
            .iter()
            .all(|p| p.start <= p.end && p.end <= self.triangles.len());

        attributes_match && parts_in_range
    }
}

/// Narrows the position of the next vertex to a `u32` index.
pub(crate) fn vertex_index(position: usize) -> Result<u32, MeshError> {
    match u32::try_from(position) {
        Ok(index) if position < MAX_MESH_VERTICES => Ok(index),
        _ => Err(MeshError::too_many_vertices(position.saturating_add(1))),
    }
}

/// Appends `other` to `own`, padding whichever side lacks the attribute.
fn merge_attribute<T: Copy>(
    own: &mut Option<Vec<T>>,
    other: Option<&[T]>,
    own_count: usize,
    other_count: usize,
    neutral: T,
) {
    match (own.as_mut(), other) {
        (Some(values), Some(other_values)) => values.extend_from_slice(other_values),
        (Some(values), None) => values.extend(std::iter::repeat(neutral).take(other_count)),
        (None, Some(other_values)) => {
            let mut values = vec![neutral; own_count];
            values.extend_from_slice(other_values);
            *own = Some(values);
        }
        (None, None) => {}
    }
}
