//! # Filter Errors
//!
//! Error types for style compilation, expression evaluation and resource
//! lookup. None of them abort a run: the filter turns them into
//! [`Diagnostic`](crate::diagnostic::Diagnostic)s and degrades its output.

use crate::bucket::StateKey;
use config::constants::ConfigError;
use extrude_mesh::MeshError;
use thiserror::Error;

/// Errors that can occur while filtering features.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// The active style has no extrusion symbol
    #[error("Missing required extrusion symbology in style '{style}'")]
    MissingExtrusionSymbol {
        /// Name of the style that was compiled
        style: String,
    },

    /// A skin symbol names a resource library the style sheet lacks
    #[error("Unable to load resource library '{name}'")]
    LibraryNotFound {
        /// Requested library name
        name: String,
    },

    /// A feature's height or height offset expression failed; the value
    /// became 0
    #[error("Feature {feature}: {target} evaluates to 0: {source}")]
    Expression {
        /// Feature identifier
        feature: u64,
        /// Which value was being computed
        target: &'static str,
        /// Evaluation failure
        source: ExpressionError,
    },

    /// A style value failed validation
    #[error("Invalid style setting: {0}")]
    Config(#[from] ConfigError),

    /// A part's walls could not be built; the part was skipped
    #[error("Feature {feature}: walls dropped: {source}")]
    Walls {
        /// Feature identifier
        feature: u64,
        /// Geometry failure
        source: MeshError,
    },

    /// A roof could not be built; the walls were kept
    #[error("Feature {feature}: roof dropped: {source}")]
    Roof {
        /// Feature identifier
        feature: u64,
        /// Geometry failure
        source: MeshError,
    },

    /// A bucket could not be merged and stays as separate meshes
    #[error("Cannot consolidate {bucket}: {source}")]
    Consolidate {
        /// Bucket that was being merged
        bucket: StateKey,
        /// Geometry failure
        source: MeshError,
    },
}

impl FilterError {
    /// Creates a missing extrusion symbol error.
    pub fn missing_extrusion(style: impl Into<String>) -> Self {
        Self::MissingExtrusionSymbol {
            style: style.into(),
        }
    }

    /// Creates a library lookup error.
    pub fn library_not_found(name: impl Into<String>) -> Self {
        Self::LibraryNotFound { name: name.into() }
    }

    /// Creates a failed height or height offset evaluation.
    pub fn expression(feature: u64, target: &'static str, source: ExpressionError) -> Self {
        Self::Expression {
            feature,
            target,
            source,
        }
    }
}

/// Errors raised by numeric and string expressions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExpressionError {
    /// Syntax error
    #[error("Cannot parse expression '{source_text}' at {position}: {message}")]
    Parse {
        /// Full expression text
        source_text: String,
        /// Byte offset of the problem
        position: usize,
        /// What was expected
        message: String,
    },

    /// Referenced attribute is absent on the feature
    #[error("Unknown attribute '{0}'")]
    UnknownAttribute(String),

    /// Referenced attribute is not a number
    #[error("Attribute '{name}' is not numeric: '{value}'")]
    NotNumeric {
        /// Attribute name
        name: String,
        /// Attribute value as text
        value: String,
    },

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,
}

impl ExpressionError {
    pub(crate) fn parse(source: &str, position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            source_text: source.to_string(),
            position,
            message: message.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FilterError::library_not_found("facades");
        assert_eq!(err.to_string(), "Unable to load resource library 'facades'");

        let err = FilterError::missing_extrusion("buildings");
        assert!(err.to_string().contains("extrusion symbology"));
    }

    #[test]
    fn test_feature_errors_name_the_feature() {
        let err = FilterError::expression(
            8,
            "height",
            ExpressionError::UnknownAttribute("levels".into()),
        );
        assert_eq!(
            err.to_string(),
            "Feature 8: height evaluates to 0: Unknown attribute 'levels'"
        );

        let err = FilterError::Roof {
            feature: 3,
            source: MeshError::tessellation("no ears"),
        };
        assert_eq!(
            err.to_string(),
            "Feature 3: roof dropped: Tessellation failed: no ears"
        );
        assert!(std::error::Error::source(&err).is_some());

        let err = FilterError::Consolidate {
            bucket: StateKey::Skin("brick".into()),
            source: MeshError::too_many_vertices(usize::MAX),
        };
        assert!(err.to_string().starts_with("Cannot consolidate skin 'brick': Too many vertices"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: FilterError = ConfigError::InvalidAngleThreshold(400.0).into();
        assert!(err.to_string().starts_with("Invalid style setting"));
    }
}
