//! # Config Crate
//!
//! Centralized configuration constants for the feature extrusion pipeline.
//! All magic numbers and tunable parameters are defined here so the mesh
//! kernel and the filter agree on tolerances, defaults and limits.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{ExtrudeConfig, DEFAULT_WALL_ANGLE_THRESHOLD_DEG};
//!
//! let cfg = ExtrudeConfig::default();
//! assert_eq!(cfg.wall_angle_threshold_deg, DEFAULT_WALL_ANGLE_THRESHOLD_DEG);
//! assert!(cfg.merge_geometry);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Validated Snapshots**: Runtime settings are checked on construction
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
