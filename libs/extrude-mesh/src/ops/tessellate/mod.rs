//! # Roof Tessellation
//!
//! Triangulates a roof outline with earcut. The first loop with at least
//! three vertices is the outer boundary; every later loop is a hole, which
//! gives the odd-winding fill expected for footprints with courtyards.
//!
//! Loops are projected onto the plane that drops the dominant axis of the
//! outer loop's Newell normal, so sloped roofs tessellate as well as flat
//! ones. Triangles are wound to face `up`.


use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::outline::Outline;
use config::constants::DEGENERATE_AREA_EPSILON;
use glam::DVec3;

/// Tessellates `outline` into a single-part mesh facing `up`.
///
/// ## Returns
///
/// - `Ok(mesh)` with normals computed and the outline's color and name
/// - `Ok(empty)` when no loop encloses any area
/// - `Err(MeshError::TessellationFailed)` when earcut rejects the input
///
/// # Example
///
/// ```rust
/// use extrude_mesh::ops::tessellate::tessellate_outline;
/// use extrude_mesh::Outline;
/// use glam::DVec3;
///
/// let mut roof = Outline::new([1.0; 4]);
/// for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
///     roof.add_vertex(DVec3::new(x, y, 10.0));
/// }
/// roof.add_loop(0..4);
///
/// let mesh = tessellate_outline(&roof, DVec3::Z).unwrap();
/// assert_eq!(mesh.triangle_count(), 2);
/// ```
pub fn tessellate_outline(outline: &Outline, up: DVec3) -> Result<Mesh, MeshError> {
    let loops: Vec<&[DVec3]> = fillable_loops(outline).collect();

    let mut mesh = Mesh::new();
    mesh.set_color(outline.color());
    if let Some(name) = outline.name() {
        mesh.set_name(name);
    }

    let Some(outer) = loops.first() else {
        return Ok(mesh);
    };
    let normal = newell_normal(outer);
    if normal.length() < DEGENERATE_AREA_EPSILON {
        return Ok(mesh);
    }
    let project = projection_for(normal);

    let mut coords: Vec<f64> = Vec::new();
    let mut hole_starts: Vec<usize> = Vec::new();
    for (i, ring) in loops.iter().enumerate() {
        if i > 0 {
            hole_starts.push(coords.len() / 2);
        }
        for &p in ring.iter() {
            let [u, v] = project(p);
            coords.push(u);
            coords.push(v);
            mesh.add_vertex(p)?;
        }
    }

    let indices = earcutr::earcut(&coords, &hole_starts, 2).map_err(|e| {
        MeshError::tessellation(format!(
            "earcut failed on {} loops ({} vertices): {e:?}",
            loops.len(),
            mesh.vertex_count()
        ))
    })?;

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as u32, tri[1] as u32, tri[2] as u32);
        mesh.add_triangle(a, b, c);
        let last = mesh.triangle_count() - 1;
        if mesh.face_normal(last).dot(up) < 0.0 {
            mesh.triangles_mut()[last] = [a, c, b];
        }
    }

    mesh.add_part(0..mesh.triangle_count());
    mesh.compute_normals();
    Ok(mesh)
}

/// The loop tessellation treats as the outer boundary: the first one with
/// at least three vertices.
pub fn outer_loop(outline: &Outline) -> Option<&[DVec3]> {
    fillable_loops(outline).next()
}

fn fillable_loops(outline: &Outline) -> impl Iterator<Item = &[DVec3]> {
    (0..outline.loops().len())
        .map(move |i| outline.loop_vertices(i))
        .filter(|l| l.len() >= 3)
}

/// Newell normal of a closed loop (length is twice the projected area).
fn newell_normal(points: &[DVec3]) -> DVec3 {
    let n = points.len();
    (0..n).fold(DVec3::ZERO, |acc, i| {
        let a = points[i];
        let b = points[(i + 1) % n];
        acc + DVec3::new(
            (a.y - b.y) * (a.z + b.z),
            (a.z - b.z) * (a.x + b.x),
            (a.x - b.x) * (a.y + b.y),
        )
    })
}

/// Picks the 2D projection that drops the normal's dominant axis.
fn projection_for(normal: DVec3) -> fn(DVec3) -> [f64; 2] {
    let abs = normal.abs();
    if abs.z >= abs.x && abs.z >= abs.y {
        |p: DVec3| [p.x, p.y]
    } else if abs.x >= abs.y {
        |p: DVec3| [p.y, p.z]
    } else {
        |p: DVec3| [p.z, p.x]
    }
}
