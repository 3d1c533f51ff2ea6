//! # Extrude Filter
//!
//! Styled extrusion of map features: footprints and lines in, bucketed 3D
//! wall and roof meshes out.
//!
//! ## Architecture
//!
//! ```text
//! Style + StyleSheet ──compile──→ CompiledStyle (cached per style version)
//!                                      │
//! [Feature] ──→ ExtrudeGeometryFilter::push
//!                 ├─ heights, offsets   (expression)
//!                 ├─ skins, colors      (resource, rng)
//!                 ├─ extrude/smooth/tessellate  (extrude-mesh)
//!                 └─ StateBuckets ──→ ExtrudedGroup
//! ```
//!
//! ## Example
//!
//! ```rust
//! use extrude_filter::{
//!     default_rng, ExtrudeGeometryFilter, ExtrusionSymbol, FilterContext, Geometry,
//!     SimpleFeature, StateKey, Style,
//! };
//! use glam::DVec3;
//!
//! let mut filter = ExtrudeGeometryFilter::new();
//! filter.set_style(Style::new("buildings").with_extrusion(ExtrusionSymbol {
//!     height_expression: Some("[levels] * 3".parse().unwrap()),
//!     ..Default::default()
//! }));
//!
//! let footprint = Geometry::polygon(vec![
//!     DVec3::new(0.0, 0.0, 0.0),
//!     DVec3::new(10.0, 0.0, 0.0),
//!     DVec3::new(10.0, 6.0, 0.0),
//!     DVec3::new(0.0, 6.0, 0.0),
//! ]);
//! let features = [SimpleFeature::new(1, footprint).with_attribute("levels", 4)];
//!
//! let group = filter.push(&features, &FilterContext::default(), &mut default_rng());
//! let bucket = group.bucket(&StateKey::Untextured).unwrap();
//! // walls and roof merged into one mesh
//! assert_eq!(bucket.meshes.len(), 1);
//! assert_eq!(group.triangle_count(), 8 + 2);
//! ```

pub mod bucket;
pub mod compiled;
pub mod diagnostic;
pub mod error;
pub mod expression;
pub mod feature;
pub mod filter;
pub mod localize;
pub mod output;
pub mod resource;
pub mod style;

pub use bucket::{StateBucket, StateBuckets, StateKey};
pub use compiled::CompiledStyle;
pub use diagnostic::{Diagnostic, Diagnostics};
pub use error::{ExpressionError, FilterError};
pub use expression::{NumericExpression, StringExpression};
pub use feature::{AttributeValue, Feature, Geometry, Polygon, SimpleFeature};
pub use filter::{
    default_rng, seeded_rng, ExtrudeGeometryFilter, FilterContext, HeightCallback,
};
pub use localize::{GeoExtent, Geocentric, Localizer, SpatialReference, Wgs84};
pub use output::ExtrudedGroup;
pub use resource::{ResourceLibrary, SkinResource, TexEnvMode};
pub use style::{
    ExtrusionSymbol, HeightReference, PolygonSymbol, SkinSymbol, Style, StyleSheet,
};
