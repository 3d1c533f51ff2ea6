//! # Contours
//!
//! A contour is one ring or line of a feature footprint. Points carry a Z
//! value (the terrain or base elevation of the footprint vertex).

use config::constants::approx_equal;
use glam::DVec3;

/// Ordered sequence of footprint points.
///
/// Closed contours (polygon rings) connect their last point back to the
/// first one implicitly; the closing point should not be repeated. Use
/// [`Contour::open`] to strip a repeated closing point.
///
/// # Example
///
/// ```rust
/// use extrude_mesh::Contour;
/// use glam::DVec3;
///
/// let mut ring = Contour::ring(vec![
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(1.0, 0.0, 0.0),
///     DVec3::new(1.0, 1.0, 0.0),
///     DVec3::new(0.0, 0.0, 0.0),
/// ]);
/// ring.open();
/// assert_eq!(ring.len(), 3);
/// assert_eq!(ring.segments().count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<DVec3>,
    closed: bool,
}

impl Contour {
    /// Creates a closed polygon ring.
    pub fn ring(points: Vec<DVec3>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    /// Creates an open line.
    pub fn line(points: Vec<DVec3>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    /// Returns the points in order.
    #[inline]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Returns true for polygon rings.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the contour has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Removes a duplicated closing point from a ring.
    ///
    /// Only the last point is compared against the first; lines are left
    /// untouched.
    pub fn open(&mut self) {
        if !self.closed || self.points.len() < 2 {
            return;
        }
        let first = self.points[0];
        let duplicated = self.points.last().is_some_and(|last| {
            approx_equal(last.x, first.x)
                && approx_equal(last.y, first.y)
                && approx_equal(last.z, first.z)
        });
        if duplicated {
            self.points.pop();
        }
    }

    /// Iterates over the segments of the contour.
    ///
    /// Rings yield a final segment from the last point back to the first.
    pub fn segments(&self) -> impl Iterator<Item = (DVec3, DVec3)> + '_ {
        let n = self.points.len();
        let count = match (self.closed, n) {
            (_, 0) | (_, 1) => 0,
            (true, _) => n,
            (false, _) => n - 1,
        };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

/// Vertical extent of a set of contours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationRange {
    /// Lowest Z of any point
    pub min_z: f64,
    /// Highest Z of any point
    pub max_z: f64,
}

impl ElevationRange {
    /// Computes the range over every point of every contour.
    ///
    /// Returns `None` when there are no points at all.
    ///
    /// ```rust
    /// use extrude_mesh::{Contour, ElevationRange};
    /// use glam::DVec3;
    ///
    /// let a = Contour::line(vec![DVec3::new(0.0, 0.0, 2.0), DVec3::new(1.0, 0.0, 5.0)]);
    /// let b = Contour::line(vec![DVec3::new(0.0, 1.0, -1.0)]);
    /// let range = ElevationRange::of([&a, &b]).unwrap();
    /// assert_eq!((range.min_z, range.max_z), (-1.0, 5.0));
    /// ```
    pub fn of<'a>(contours: impl IntoIterator<Item = &'a Contour>) -> Option<Self> {
        contours
            .into_iter()
            .flat_map(|c| c.points().iter())
            .fold(None, |acc: Option<Self>, p| {
                Some(match acc {
                    Some(r) => Self {
                        min_z: r.min_z.min(p.z),
                        max_z: r.max_z.max(p.z),
                    },
                    None => Self {
                        min_z: p.z,
                        max_z: p.z,
                    },
                })
            })
    }
}
