//! # Output Group

use crate::bucket::{StateBucket, StateKey};
use crate::diagnostic::{Diagnostic, Diagnostics};
use glam::DMat4;

/// Everything one `push` produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtrudedGroup {
    /// Buckets in key order (untextured first)
    pub buckets: Vec<StateBucket>,
    /// Local-to-world matrix when the geometry was localized
    pub delocalize: Option<DMat4>,
    /// Problems recorded during the run, in order
    pub diagnostics: Vec<Diagnostic>,
}

impl ExtrudedGroup {
    /// A group with no geometry.
    pub fn empty(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics: diagnostics.into_vec(),
            ..Default::default()
        }
    }

    /// Returns true if no bucket holds a mesh.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.meshes.is_empty())
    }

    /// Looks up a bucket by key.
    pub fn bucket(&self, key: &StateKey) -> Option<&StateBucket> {
        self.buckets.iter().find(|b| b.key == *key)
    }

    /// Number of meshes over all buckets.
    pub fn mesh_count(&self) -> usize {
        self.buckets.iter().map(|b| b.meshes.len()).sum()
    }

    /// Number of triangles over all buckets.
    pub fn triangle_count(&self) -> usize {
        self.buckets.iter().map(StateBucket::triangle_count).sum()
    }

    /// Warnings recorded during the run, in order.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}
