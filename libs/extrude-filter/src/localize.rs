//! # Localization
//!
//! Geocentric scenes place vertices in Earth-centered coordinates, which are
//! far too large for single-precision rendering. The filter converts every
//! point to ECEF and then into an east-north-up frame anchored at the
//! center of the working extent; the output group carries the inverse
//! matrix so a renderer can put the geometry back.

use extrude_mesh::ops::RenderFrame;
use glam::{DMat4, DVec3};
use std::fmt;

/// WGS84 semi-major axis in meters.
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS84 flattening.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// A coordinate system that can be expressed in Earth-centered coordinates.
pub trait SpatialReference: Send + Sync {
    /// Converts a map point to Earth-centered, Earth-fixed coordinates.
    fn to_ecef(&self, point: DVec3) -> DVec3;

    /// Matrix from a local frame anchored at `point` to ECEF.
    fn local_to_world(&self, point: DVec3) -> DMat4;
}

/// Geodetic WGS84: `x` is longitude in degrees, `y` latitude in degrees,
/// `z` height above the ellipsoid in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Wgs84;

impl Wgs84 {
    fn eccentricity_squared() -> f64 {
        WGS84_FLATTENING * (2.0 - WGS84_FLATTENING)
    }
}

impl SpatialReference for Wgs84 {
    fn to_ecef(&self, point: DVec3) -> DVec3 {
        let (lon, lat) = (point.x.to_radians(), point.y.to_radians());
        let e2 = Self::eccentricity_squared();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        let n = WGS84_SEMI_MAJOR_AXIS / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        DVec3::new(
            (n + point.z) * cos_lat * cos_lon,
            (n + point.z) * cos_lat * sin_lon,
            (n * (1.0 - e2) + point.z) * sin_lat,
        )
    }

    fn local_to_world(&self, point: DVec3) -> DMat4 {
        let (sin_lat, cos_lat) = point.y.to_radians().sin_cos();
        let (sin_lon, cos_lon) = point.x.to_radians().sin_cos();
        let east = DVec3::new(-sin_lon, cos_lon, 0.0);
        let north = DVec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
        let up = DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);
        DMat4::from_cols(
            east.extend(0.0),
            north.extend(0.0),
            up.extend(0.0),
            self.to_ecef(point).extend(1.0),
        )
    }
}

/// Bounding box of the features being processed, in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoExtent {
    /// Minimum x
    pub west: f64,
    /// Minimum y
    pub south: f64,
    /// Maximum x
    pub east: f64,
    /// Maximum y
    pub north: f64,
}

impl GeoExtent {
    /// Creates an extent.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Center at zero height.
    pub fn center(&self) -> DVec3 {
        DVec3::new(
            (self.west + self.east) * 0.5,
            (self.south + self.north) * 0.5,
            0.0,
        )
    }
}

/// A geocentric target frame: the map's spatial reference and the extent
/// whose center anchors the local frame.
#[derive(Clone, Copy)]
pub struct Geocentric<'a> {
    /// Map spatial reference
    pub srs: &'a dyn SpatialReference,
    /// Working extent
    pub extent: GeoExtent,
}

impl fmt::Debug for Geocentric<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Geocentric")
            .field("extent", &self.extent)
            .finish_non_exhaustive()
    }
}

/// Maps feature points into the local frame of a [`Geocentric`] target.
pub struct Localizer<'a> {
    srs: &'a dyn SpatialReference,
    world_to_local: DMat4,
    local_to_world: DMat4,
}

impl<'a> Localizer<'a> {
    /// Builds the localization matrices for `target`.
    pub fn new(target: Geocentric<'a>) -> Self {
        let local_to_world = target.srs.local_to_world(target.extent.center());
        Self {
            srs: target.srs,
            world_to_local: local_to_world.inverse(),
            local_to_world,
        }
    }

    /// Matrix that returns localized geometry to world coordinates.
    pub fn delocalize(&self) -> DMat4 {
        self.local_to_world
    }
}

impl RenderFrame for Localizer<'_> {
    fn to_render_frame(&self, point: DVec3) -> DVec3 {
        self.world_to_local
            .transform_point3(self.srs.to_ecef(point))
    }
}

impl fmt::Debug for Localizer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer")
            .field("local_to_world", &self.local_to_world)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ecef_reference_points() {
        let srs = Wgs84;
        let origin = srs.to_ecef(DVec3::ZERO);
        assert_relative_eq!(origin.x, WGS84_SEMI_MAJOR_AXIS, epsilon = 1e-6);
        assert_relative_eq!(origin.y, 0.0, epsilon = 1e-6);

        let east = srs.to_ecef(DVec3::new(90.0, 0.0, 100.0));
        assert_relative_eq!(east.y, WGS84_SEMI_MAJOR_AXIS + 100.0, epsilon = 1e-6);

        let pole = srs.to_ecef(DVec3::new(0.0, 90.0, 0.0));
        let semi_minor = WGS84_SEMI_MAJOR_AXIS * (1.0 - WGS84_FLATTENING);
        assert_relative_eq!(pole.z, semi_minor, epsilon = 1e-6);
    }

    #[test]
    fn test_extent_center() {
        let extent = GeoExtent::new(10.0, 40.0, 12.0, 44.0);
        assert_eq!(extent.center(), DVec3::new(11.0, 42.0, 0.0));
    }

    #[test]
    fn test_center_maps_to_local_origin() {
        let srs = Wgs84;
        let extent = GeoExtent::new(10.0, 40.0, 12.0, 44.0);
        let localizer = Localizer::new(Geocentric { srs: &srs, extent });

        let center = localizer.to_render_frame(extent.center());
        assert_relative_eq!(center.length(), 0.0, epsilon = 1e-6);

        // 30 m straight up stays on the local up axis
        let raised = localizer.to_render_frame(extent.center() + DVec3::new(0.0, 0.0, 30.0));
        assert_relative_eq!(raised.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(raised.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(raised.z, 30.0, epsilon = 1e-6);
    }

    #[test]
    fn test_local_axes_are_east_north() {
        let srs = Wgs84;
        let extent = GeoExtent::new(-0.001, -0.001, 0.001, 0.001);
        let localizer = Localizer::new(Geocentric { srs: &srs, extent });

        let east = localizer.to_render_frame(DVec3::new(0.001, 0.0, 0.0));
        assert!(east.x > 100.0 && east.y.abs() < 1e-3);

        let north = localizer.to_render_frame(DVec3::new(0.0, 0.001, 0.0));
        assert!(north.y > 100.0 && north.x.abs() < 1e-3);
    }

    #[test]
    fn test_delocalize_round_trip() {
        let srs = Wgs84;
        let extent = GeoExtent::new(2.0, 48.0, 3.0, 49.0);
        let localizer = Localizer::new(Geocentric { srs: &srs, extent });
        let point = DVec3::new(2.7, 48.2, 55.0);

        let world = localizer
            .delocalize()
            .transform_point3(localizer.to_render_frame(point));
        let expected = srs.to_ecef(point);
        assert_relative_eq!(world.x, expected.x, epsilon = 1e-4);
        assert_relative_eq!(world.y, expected.y, epsilon = 1e-4);
        assert_relative_eq!(world.z, expected.z, epsilon = 1e-4);
    }
}
