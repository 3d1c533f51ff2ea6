//! # Features
//!
//! Input to the filter: a geometry plus named attributes that style
//! expressions can read.

use crate::error::ExpressionError;
use crate::expression::{NumericExpression, StringExpression};
use extrude_mesh::Contour;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// ATTRIBUTES
// =============================================================================

/// A feature attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Numeric attribute
    Number(f64),
    /// Text attribute; numeric text still evaluates as a number
    Text(String),
}

impl AttributeValue {
    /// Returns the value as a number, parsing text if needed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// A polygon with an outer ring and optional holes.
///
/// Rings may repeat their first point at the end; it is dropped before
/// extrusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Outer boundary
    pub outer: Vec<DVec3>,
    /// Inner boundaries
    #[serde(default)]
    pub holes: Vec<Vec<DVec3>>,
}

/// Feature geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Geometry {
    /// A polygon: extruded with a roof
    Polygon(Polygon),
    /// A line string: extruded as a wall only
    Line(Vec<DVec3>),
    /// A collection of parts
    Multi(Vec<Geometry>),
}

impl Geometry {
    /// Geometry with no parts.
    pub fn empty() -> Self {
        Self::Multi(Vec::new())
    }

    /// A polygon without holes.
    pub fn polygon(outer: Vec<DVec3>) -> Self {
        Self::Polygon(Polygon {
            outer,
            holes: Vec::new(),
        })
    }

    /// A polygon with holes.
    pub fn polygon_with_holes(outer: Vec<DVec3>, holes: Vec<Vec<DVec3>>) -> Self {
        Self::Polygon(Polygon { outer, holes })
    }

    /// A line string.
    pub fn line(points: Vec<DVec3>) -> Self {
        Self::Line(points)
    }

    /// Returns the leaf parts in order, flattening collections.
    pub fn parts(&self) -> Vec<&Geometry> {
        let mut parts = Vec::new();
        self.collect_parts(&mut parts);
        parts
    }

    fn collect_parts<'a>(&'a self, out: &mut Vec<&'a Geometry>) {
        match self {
            Self::Multi(children) => children.iter().for_each(|c| c.collect_parts(out)),
            leaf => out.push(leaf),
        }
    }

    /// Returns true for polygons.
    pub fn is_polygon(&self) -> bool {
        matches!(self, Self::Polygon(_))
    }

    /// Converts the geometry into contours.
    ///
    /// Polygon rings come out closed and opened (closing duplicate
    /// removed), outer ring first.
    pub fn contours(&self) -> Vec<Contour> {
        match self {
            Self::Polygon(polygon) => std::iter::once(&polygon.outer)
                .chain(polygon.holes.iter())
                .map(|ring| {
                    let mut contour = Contour::ring(ring.clone());
                    contour.open();
                    contour
                })
                .collect(),
            Self::Line(points) => vec![Contour::line(points.clone())],
            Self::Multi(children) => children.iter().flat_map(Geometry::contours).collect(),
        }
    }

    /// Visits every point.
    pub fn for_each_point(&self, f: &mut impl FnMut(DVec3)) {
        match self {
            Self::Polygon(polygon) => {
                polygon.outer.iter().copied().for_each(&mut *f);
                for hole in &polygon.holes {
                    hole.iter().copied().for_each(&mut *f);
                }
            }
            Self::Line(points) => points.iter().copied().for_each(f),
            Self::Multi(children) => children.iter().for_each(|c| c.for_each_point(&mut *f)),
        }
    }

    /// Highest Z of any point, or `None` for empty geometry.
    pub fn max_z(&self) -> Option<f64> {
        let mut max: Option<f64> = None;
        self.for_each_point(&mut |p| {
            max = Some(max.map_or(p.z, |m| m.max(p.z)));
        });
        max
    }
}

// =============================================================================
// FEATURE
// =============================================================================

/// A map feature the filter can extrude.
pub trait Feature: Send + Sync {
    /// Stable identifier used in diagnostics.
    fn id(&self) -> u64;

    /// The feature's geometry.
    fn geometry(&self) -> &Geometry;

    /// Looks up an attribute by name.
    fn attribute(&self, name: &str) -> Option<AttributeValue>;

    /// Highest elevation of the geometry (0 when empty).
    fn max_z(&self) -> f64 {
        self.geometry().max_z().unwrap_or(0.0)
    }

    /// Evaluates a numeric expression against this feature.
    fn eval(&self, expr: &NumericExpression) -> Result<f64, ExpressionError> {
        expr.eval(self)
    }

    /// Expands a string expression against this feature.
    fn eval_string(&self, expr: &StringExpression) -> String {
        expr.eval(self)
    }
}

/// A feature backed by an in-memory attribute table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleFeature {
    id: u64,
    geometry: Geometry,
    #[serde(default)]
    attributes: BTreeMap<String, AttributeValue>,
}

impl SimpleFeature {
    /// Creates a feature with no attributes.
    pub fn new(id: u64, geometry: Geometry) -> Self {
        Self {
            id,
            geometry,
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets an attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(name.into(), value.into());
    }
}

impl Feature for SimpleFeature {
    fn id(&self) -> u64 {
        self.id
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn attribute(&self, name: &str) -> Option<AttributeValue> {
        self.attributes.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(z: f64) -> Vec<DVec3> {
        vec![
            DVec3::new(0.0, 0.0, z),
            DVec3::new(1.0, 0.0, z),
            DVec3::new(1.0, 1.0, z),
            DVec3::new(0.0, 1.0, z),
            DVec3::new(0.0, 0.0, z),
        ]
    }

    #[test]
    fn test_polygon_contours_are_opened() {
        let geometry = Geometry::polygon_with_holes(square(0.0), vec![square(0.0)]);
        let contours = geometry.contours();
        assert_eq!(contours.len(), 2);
        assert!(contours.iter().all(|c| c.is_closed() && c.len() == 4));
    }

    #[test]
    fn test_line_contour_stays_open() {
        let contours = Geometry::line(square(0.0)).contours();
        assert_eq!(contours.len(), 1);
        assert!(!contours[0].is_closed());
        assert_eq!(contours[0].len(), 5);
    }

    #[test]
    fn test_multi_parts_flatten() {
        let geometry = Geometry::Multi(vec![
            Geometry::polygon(square(0.0)),
            Geometry::Multi(vec![Geometry::line(square(1.0))]),
        ]);
        let parts = geometry.parts();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].is_polygon());
        assert!(!parts[1].is_polygon());
    }

    #[test]
    fn test_max_z() {
        let geometry = Geometry::Multi(vec![
            Geometry::polygon(square(2.0)),
            Geometry::line(vec![DVec3::new(0.0, 0.0, 7.5)]),
        ]);
        assert_eq!(geometry.max_z(), Some(7.5));
        assert_eq!(Geometry::empty().max_z(), None);

        let feature = SimpleFeature::new(3, Geometry::empty());
        assert_eq!(feature.max_z(), 0.0);
    }

    #[test]
    fn test_attribute_values() {
        assert_eq!(AttributeValue::from(" 12.5 ").as_number(), Some(12.5));
        assert_eq!(AttributeValue::from("tall").as_number(), None);
        assert_eq!(AttributeValue::from(3).to_string(), "3");
    }
}
