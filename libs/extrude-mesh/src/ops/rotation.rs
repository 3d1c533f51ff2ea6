//! # Rotation Estimation
//!
//! Finds the dominant direction of a footprint so roof textures can be laid
//! out along the building instead of along the map axes.

use glam::{DVec2, DVec3};

/// Returns the angle (radians) of the longest edge of a closed contour.
///
/// The edge is oriented lower-x endpoint first (lower-y first when the edge
/// is vertical), so the result lies in `[-π/2, π/2]` and does not depend on
/// the winding of the input. Exactly equal edge lengths resolve to the
/// smaller angle. Fewer than two points yield `0.0`.
///
/// # Example
///
/// ```rust
/// use extrude_mesh::ops::rotation::apparent_rotation;
/// use glam::DVec3;
///
/// let rect = [
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(0.0, 4.0, 0.0),
///     DVec3::new(-1.0, 4.0, 0.0),
///     DVec3::new(-1.0, 0.0, 0.0),
/// ];
/// assert!((apparent_rotation(&rect) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// ```
pub fn apparent_rotation(points: &[DVec3]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }

    let mut best: Option<(f64, f64)> = None;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let len2 = (b - a).length_squared();
        let angle = oriented_angle(a, b);

        let better = match best {
            None => true,
            Some((best_len2, best_angle)) => {
                len2 > best_len2 || (len2 == best_len2 && angle < best_angle)
            }
        };
        if better {
            best = Some((len2, angle));
        }
    }

    best.map_or(0.0, |(_, angle)| angle)
}

fn oriented_angle(a: DVec3, b: DVec3) -> f64 {
    let lower_first = a.x < b.x || (a.x == b.x && a.y <= b.y);
    let (p1, p2) = if lower_first { (a, b) } else { (b, a) };
    (p2.y - p1.y).atan2(p2.x - p1.x)
}

/// Computes roof texture coordinates aligned with `rotation`.
///
/// Every vertex is rotated by `-rotation` about the first vertex and scaled
/// to tile units. Non-positive tile sizes are treated as 1.
pub fn roof_texcoords(
    points: &[DVec3],
    rotation: f64,
    tile_width: f64,
    tile_height: f64,
) -> Vec<DVec2> {
    let Some(origin) = points.first().map(|p| p.truncate()) else {
        return Vec::new();
    };
    let tile = DVec2::new(unit_if_invalid(tile_width), unit_if_invalid(tile_height));
    let unrotate = DVec2::from_angle(-rotation);

    points
        .iter()
        .map(|p| unrotate.rotate(p.truncate() - origin) / tile)
        .collect()
}

fn unit_if_invalid(size: f64) -> f64 {
    if size.is_finite() && size > 0.0 {
        size
    } else {
        1.0
    }
}
