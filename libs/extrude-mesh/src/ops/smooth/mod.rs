//! # Crease-Angle Smoothing
//!
//! Generates per-vertex normals, splitting vertices where the faces meeting
//! at them bend more than a threshold angle. Wall corners stay sharp while
//! gently curved walls shade smoothly.
//!
//! ## Algorithm
//!
//! For every vertex, the incident faces are grouped into clusters: a face
//! joins the first cluster whose seed normal is within the crease angle of
//! its own normal, otherwise it seeds a new cluster. The first cluster keeps
//! the vertex; every other cluster gets a duplicate (position, texcoord and
//! color copied) and its triangle corners are rewired to it. Area-weighted
//! normals are then computed on the split mesh.


use crate::error::MeshError;
use crate::mesh::Mesh;
use config::constants::EPSILON;
use glam::DVec3;

/// Smooths `mesh` with the crease angle given as its cosine.
///
/// `cos_threshold = -1.0` (a 180° crease) never splits; `1.0` splits every
/// vertex shared by non-coplanar faces.
///
/// # Errors
///
/// `MeshError::TooManyVertices` when the split copies overflow `u32`
/// indices.
///
/// # Example
///
/// ```rust
/// use extrude_mesh::ops::smooth::smooth_creases;
/// use extrude_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::ZERO)?;
/// mesh.add_vertex(DVec3::X)?;
/// mesh.add_vertex(DVec3::Y)?;
/// mesh.add_triangle(0, 1, 2);
///
/// smooth_creases(&mut mesh, 60f64.to_radians().cos())?;
/// assert_eq!(mesh.normals().unwrap()[0], DVec3::Z);
/// # Ok::<(), extrude_mesh::MeshError>(())
/// ```
pub fn smooth_creases(mesh: &mut Mesh, cos_threshold: f64) -> Result<(), MeshError> {
    split_creases(mesh, cos_threshold)?;
    mesh.compute_normals();
    Ok(())
}

/// Splits creased vertices without computing normals.
///
/// Returns the number of vertices added.
pub fn split_creases(mesh: &mut Mesh, cos_threshold: f64) -> Result<usize, MeshError> {
    let vertex_count = mesh.vertex_count();
    let face_normals: Vec<Option<DVec3>> = (0..mesh.triangle_count())
        .map(|t| mesh.face_normal(t).try_normalize())
        .collect();

    // (triangle, corner) pairs per vertex
    let mut incident: Vec<Vec<(usize, usize)>> = vec![Vec::new(); vertex_count];
    for (t, tri) in mesh.triangles().iter().enumerate() {
        for (corner, &v) in tri.iter().enumerate() {
            incident[v as usize].push((t, corner));
        }
    }

    let mut added = 0;
    for (v, corners) in incident.into_iter().enumerate() {
        let clusters = cluster_faces(&corners, &face_normals, cos_threshold);
        for cluster in clusters.iter().skip(1) {
            let copy = mesh.duplicate_vertex(v as u32)?;
            let triangles = mesh.triangles_mut();
            for &(t, corner) in cluster {
                triangles[t][corner] = copy;
            }
            added += 1;
        }
    }
    Ok(added)
}

fn cluster_faces(
    corners: &[(usize, usize)],
    face_normals: &[Option<DVec3>],
    cos_threshold: f64,
) -> Vec<Vec<(usize, usize)>> {
    let mut seeds: Vec<DVec3> = Vec::new();
    let mut clusters: Vec<Vec<(usize, usize)>> = Vec::new();
    // degenerate faces have no direction; they stay on the original vertex
    let mut degenerate: Vec<(usize, usize)> = Vec::new();

    for &(t, corner) in corners {
        let Some(normal) = face_normals[t] else {
            degenerate.push((t, corner));
            continue;
        };
        match seeds
            .iter()
            .position(|seed| seed.dot(normal) >= cos_threshold - EPSILON)
        {
            Some(i) => clusters[i].push((t, corner)),
            None => {
                seeds.push(normal);
                clusters.push(vec![(t, corner)]);
            }
        }
    }

    match clusters.first_mut() {
        Some(first) => first.extend(degenerate),
        None if !degenerate.is_empty() => clusters.push(degenerate),
        None => {}
    }
    clusters
}
