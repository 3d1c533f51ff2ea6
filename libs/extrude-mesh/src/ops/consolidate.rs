//! # Consolidation
//!
//! Folds every mesh of a rendering-state bucket into one mesh so the bucket
//! draws in a single call.

use crate::error::MeshError;
use crate::mesh::Mesh;
use config::constants::MAX_MESH_VERTICES;

/// Merges `meshes` into one mesh, in order.
///
/// Parts are preserved (offset into the merged triangle list). Meshes with
/// different overall colors end up with per-vertex colors.
///
/// # Errors
///
/// `MeshError::TooManyVertices` when the merged mesh could not be indexed
/// with `u32`.
pub fn consolidate(meshes: &[Mesh]) -> Result<Mesh, MeshError> {
    let vertex_count: usize = meshes.iter().map(Mesh::vertex_count).sum();
    if vertex_count > MAX_MESH_VERTICES {
        return Err(MeshError::too_many_vertices(vertex_count));
    }
    let triangle_count: usize = meshes.iter().map(Mesh::triangle_count).sum();

    let mut merged = Mesh::with_capacity(vertex_count, triangle_count);
    for mesh in meshes {
        merged.merge(mesh);
    }
    Ok(merged)
}
