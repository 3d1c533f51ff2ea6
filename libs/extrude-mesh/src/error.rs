//! # Mesh Errors
//!
//! Error types for mesh generation operations.

use config::constants::MAX_MESH_VERTICES;
use thiserror::Error;

/// Errors that can occur during mesh generation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// Polygon tessellation failed
    #[error("Tessellation failed: {message}")]
    TessellationFailed {
        /// Details reported by the triangulator
        message: String,
    },

    /// Too many vertices
    #[error("Too many vertices: {count} (max: {max})")]
    TooManyVertices {
        /// Vertex count that was requested
        count: usize,
        /// Largest supported count
        max: usize,
    },
}

impl MeshError {
    /// Creates a tessellation failure.
    pub fn tessellation(message: impl Into<String>) -> Self {
        Self::TessellationFailed {
            message: message.into(),
        }
    }

    /// Creates a vertex overflow error for a mesh of `count` vertices.
    pub fn too_many_vertices(count: usize) -> Self {
        Self::TooManyVertices {
            count,
            max: MAX_MESH_VERTICES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::tessellation("ring self-intersects");
        assert!(err.to_string().contains("Tessellation failed"));
        assert!(err.to_string().contains("self-intersects"));

        let err = MeshError::TooManyVertices { count: 10, max: 5 };
        assert_eq!(err.to_string(), "Too many vertices: 10 (max: 5)");

        let err = MeshError::too_many_vertices(MAX_MESH_VERTICES + 1);
        assert!(err.to_string().ends_with(&format!("(max: {MAX_MESH_VERTICES})")));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeshError>();
    }
}
