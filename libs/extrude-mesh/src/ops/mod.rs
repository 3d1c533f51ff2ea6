//! # Mesh Operations
//!
//! Stages applied to feature contours, in pipeline order:
//! extrude, smooth (walls), tessellate (roofs), consolidate (buckets).
//! `rotation` orients rooftop textures.

pub mod consolidate;
pub mod extrude;
pub mod rotation;
pub mod smooth;
pub mod tessellate;

pub use consolidate::consolidate;
pub use extrude::{
    extrude, extrude_contours, ExtrudeOptions, ExtrudeParams, Extrusion, RenderFrame,
    TextureParams,
};
pub use rotation::{apparent_rotation, roof_texcoords};
pub use smooth::smooth_creases;
pub use tessellate::{outer_loop, tessellate_outline};
