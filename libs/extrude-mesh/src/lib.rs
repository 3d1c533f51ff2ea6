//! # Extrude Mesh
//!
//! Geometry kernel for extruded map features. Turns footprint contours
//! (building outlines, fences, walls) into wall meshes plus roof and base
//! outlines, then smooths, tessellates and consolidates them.
//!
//! ## Architecture
//!
//! ```text
//! Contour ─→ extrude ─→ Mesh (walls) ─→ smooth_creases ─┐
//!                   └─→ Outline (roof) ─→ tessellate ───┴─→ consolidate
//! ```
//!
//! All geometry is f64 (`glam::DVec3`). Indices are `u32`; every path
//! that adds vertices fails with `MeshError::TooManyVertices` rather than
//! wrapping.
//!
//! ## Usage
//!
//! ```rust
//! use extrude_mesh::ops::{extrude_contours, smooth_creases, ExtrudeOptions, ExtrudeParams, TextureParams};
//! use extrude_mesh::Contour;
//! use glam::DVec3;
//!
//! let footprint = Contour::ring(vec![
//!     DVec3::new(0.0, 0.0, 0.0),
//!     DVec3::new(8.0, 0.0, 0.0),
//!     DVec3::new(8.0, 5.0, 0.0),
//!     DVec3::new(0.0, 5.0, 0.0),
//! ]);
//! let params = ExtrudeParams { height: 12.0, ..Default::default() };
//! let options = ExtrudeOptions { roof: Some([1.0; 4]), ..Default::default() };
//!
//! let mut result = extrude_contours(&[footprint], &params, &TextureParams::default(), &options)?;
//! smooth_creases(&mut result.walls, 60f64.to_radians().cos())?;
//! assert_eq!(result.walls.triangle_count(), 8);
//! # Ok::<(), extrude_mesh::MeshError>(())
//! ```

pub mod contour;
pub mod error;
pub mod mesh;
pub mod ops;
pub mod outline;

pub use contour::{Contour, ElevationRange};
pub use error::MeshError;
pub use mesh::Mesh;
pub use outline::Outline;
