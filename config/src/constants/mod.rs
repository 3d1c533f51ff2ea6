//! # Configuration Constants
//!
//! Centralized values shared by the extrusion kernel and the feature filter.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Texturing**: Default tile sizes used when no skin is resolved
//! - **Smoothing**: Crease-angle thresholds for normal generation
//! - **Colors**: Default fill colors
//! - **Runtime**: The validated [`ExtrudeConfig`] snapshot

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Maximum number of vertices a single mesh may hold.
///
/// Triangle indices are `u32`, so consolidation refuses to grow a mesh past
/// this count.
///
/// ```rust
/// use config::constants::MAX_MESH_VERTICES;
/// assert_eq!(MAX_MESH_VERTICES, u32::MAX as usize);
/// ```
pub const MAX_MESH_VERTICES: usize = u32::MAX as usize;

/// Minimum triangle area (twice the area, as a cross-product length) below
/// which a face is considered degenerate and ignored for normal generation.
///
/// ```rust
/// use config::constants::{DEGENERATE_AREA_EPSILON, EPSILON};
/// assert!(DEGENERATE_AREA_EPSILON < EPSILON);
/// ```
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-12;

// =============================================================================
// TEXTURING CONSTANTS
// =============================================================================

/// Real-world width, in map units, of one wall texture tile when no skin
/// resource is available.
///
/// ```rust
/// use config::constants::DEFAULT_TILE_WIDTH;
/// assert_eq!(DEFAULT_TILE_WIDTH, 1.0);
/// ```
pub const DEFAULT_TILE_WIDTH: f64 = 1.0;

/// Real-world height, in map units, of one wall texture tile when no skin
/// resource is available.
///
/// ```rust
/// use config::constants::DEFAULT_TILE_HEIGHT;
/// assert_eq!(DEFAULT_TILE_HEIGHT, 1.0);
/// ```
pub const DEFAULT_TILE_HEIGHT: f64 = 1.0;

/// Smallest number of vertical texture tiles fitted onto the tallest wall.
pub const MIN_TILE_DIVISOR: f64 = 1.0;

// =============================================================================
// SMOOTHING CONSTANTS
// =============================================================================

/// Default crease angle for wall normal smoothing, in degrees.
///
/// Adjacent wall faces meeting at a larger angle keep a hard edge.
///
/// ```rust
/// use config::constants::DEFAULT_WALL_ANGLE_THRESHOLD_DEG;
/// assert_eq!(DEFAULT_WALL_ANGLE_THRESHOLD_DEG, 60.0);
/// ```
pub const DEFAULT_WALL_ANGLE_THRESHOLD_DEG: f64 = 60.0;

/// Default crease angle for roof normal smoothing, in degrees.
///
/// Tessellated roofs are planar, so every face blends.
pub const DEFAULT_ROOF_ANGLE_THRESHOLD_DEG: f64 = 180.0;

/// Extrusion height used when a style declares neither a height nor a
/// height expression.
pub const DEFAULT_EXTRUSION_HEIGHT: f64 = 10.0;

// =============================================================================
// COLOR CONSTANTS
// =============================================================================

/// Default wall and roof fill color (RGBA, opaque white).
///
/// ```rust
/// use config::constants::DEFAULT_FILL_COLOR;
/// assert_eq!(DEFAULT_FILL_COLOR[3], 1.0);
/// ```
pub const DEFAULT_FILL_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

// =============================================================================
// FEATURE CONSTANTS
// =============================================================================

/// Reserved attribute name resolving to a feature's maximum elevation.
pub const MAX_Z_ATTRIBUTE: &str = "__max_z";

/// Seed used when callers ask for a deterministic default random source.
pub const DEFAULT_RNG_SEED: u64 = 42;

// =============================================================================
// RUNTIME CONFIGURATION
// =============================================================================

/// Immutable snapshot of the filter's runtime settings.
///
/// # Examples
/// ```
/// use config::constants::ExtrudeConfig;
/// let config = ExtrudeConfig::default();
/// assert!(config.wall_angle_threshold_deg > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeConfig {
    /// Crease angle (degrees) used when smoothing wall normals.
    pub wall_angle_threshold_deg: f64,
    /// Combine every bucket into a single mesh after processing.
    pub merge_geometry: bool,
    /// Run per-part geometry construction on the rayon pool.
    pub parallel: bool,
}

impl ExtrudeConfig {
    /// Builds a configuration, rejecting thresholds outside `(0, 180]`.
    ///
    /// # Examples
    /// ```
    /// use config::constants::ExtrudeConfig;
    /// let cfg = ExtrudeConfig::new(45.0, false, true).expect("valid config");
    /// assert!(cfg.parallel);
    /// assert!(ExtrudeConfig::new(0.0, true, false).is_err());
    /// ```
    pub fn new(
        wall_angle_threshold_deg: f64,
        merge_geometry: bool,
        parallel: bool,
    ) -> Result<Self, ConfigError> {
        cos_angle_threshold(wall_angle_threshold_deg)?;
        Ok(Self {
            wall_angle_threshold_deg,
            merge_geometry,
            parallel,
        })
    }
}

impl Default for ExtrudeConfig {
    fn default() -> Self {
        Self {
            wall_angle_threshold_deg: DEFAULT_WALL_ANGLE_THRESHOLD_DEG,
            merge_geometry: true,
            parallel: false,
        }
    }
}

/// Validates a crease angle in degrees and returns its cosine.
///
/// ```rust
/// use config::constants::cos_angle_threshold;
/// assert!((cos_angle_threshold(60.0).unwrap() - 0.5).abs() < 1e-12);
/// assert_eq!(cos_angle_threshold(180.0).unwrap(), -1.0);
/// assert!(cos_angle_threshold(f64::NAN).is_err());
/// ```
pub fn cos_angle_threshold(degrees: f64) -> Result<f64, ConfigError> {
    if !(degrees > 0.0 && degrees <= 180.0) {
        return Err(ConfigError::InvalidAngleThreshold(degrees));
    }
    Ok(degrees.to_radians().cos())
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Raised when the crease angle is not within `(0, 180]` degrees.
    InvalidAngleThreshold(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAngleThreshold(value) => {
                write!(f, "angle threshold must be within (0, 180] degrees: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two floating-point values are approximately equal.
///
/// ```rust
/// use config::constants::approx_equal;
/// assert!(approx_equal(1.0, 1.0 + 1e-12));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

#[cfg(test)]
mod tests;
