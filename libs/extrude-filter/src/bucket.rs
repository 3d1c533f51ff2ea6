//! # State Buckets
//!
//! Meshes grouped by the rendering state they need, so a renderer can draw
//! every mesh of a bucket with one state change.

use crate::resource::SkinResource;
use extrude_mesh::ops::consolidate;
use extrude_mesh::{Mesh, MeshError};
use std::collections::BTreeMap;
use std::fmt;

/// Rendering-state identity of a bucket.
///
/// `Untextured` orders first, then skins by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateKey {
    /// No texture; also collects every roof
    Untextured,
    /// Named skin texture
    Skin(String),
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Untextured => f.write_str("untextured"),
            Self::Skin(name) => write!(f, "skin '{name}'"),
        }
    }
}

/// Meshes sharing one rendering state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateBucket {
    /// State identity
    pub key: StateKey,
    /// Skin to bind, for skin buckets
    pub skin: Option<SkinResource>,
    /// Meshes in insertion order
    pub meshes: Vec<Mesh>,
}

impl StateBucket {
    /// Creates an empty bucket.
    pub fn new(key: StateKey, skin: Option<SkinResource>) -> Self {
        Self {
            key,
            skin,
            meshes: Vec::new(),
        }
    }

    /// Total triangles over all meshes.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    /// Replaces the meshes with a single merged mesh.
    ///
    /// Leaves the bucket untouched when it holds at most one mesh or the
    /// merge fails.
    pub fn consolidate(&mut self) -> Result<(), MeshError> {
        if self.meshes.len() > 1 {
            let merged = consolidate(&self.meshes)?;
            self.meshes = vec![merged];
        }
        Ok(())
    }
}

/// The buckets of one run, created lazily and kept in key order.
#[derive(Debug, Clone, Default)]
pub struct StateBuckets {
    buckets: BTreeMap<StateKey, StateBucket>,
}

impl StateBuckets {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bucket for `key`, creating it on first use.
    pub fn bucket_mut(&mut self, key: StateKey, skin: Option<&SkinResource>) -> &mut StateBucket {
        self.buckets
            .entry(key)
            .or_insert_with_key(|key| StateBucket::new(key.clone(), skin.cloned()))
    }

    /// Appends a mesh to the bucket for `key`.
    pub fn push(&mut self, key: StateKey, skin: Option<&SkinResource>, mesh: Mesh) {
        self.bucket_mut(key, skin).meshes.push(mesh);
    }

    /// Looks up a bucket.
    pub fn get(&self, key: &StateKey) -> Option<&StateBucket> {
        self.buckets.get(key)
    }

    /// Iterates mutably in key order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StateBucket> {
        self.buckets.values_mut()
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true if no bucket was created.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Moves the buckets out in key order, leaving the set empty.
    pub fn drain(&mut self) -> Vec<StateBucket> {
        std::mem::take(&mut self.buckets).into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn triangle(color: [f32; 4]) -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(DVec3::ZERO).unwrap();
        let b = mesh.add_vertex(DVec3::X).unwrap();
        let c = mesh.add_vertex(DVec3::Y).unwrap();
        mesh.add_triangle(a, b, c);
        mesh.set_color(color);
        mesh
    }

    #[test]
    fn test_buckets_created_once_per_key() {
        let brick = SkinResource::new("brick", "brick.png", 4.0, 3.0);
        let mut buckets = StateBuckets::new();
        buckets.push(brick.state_key(), Some(&brick), triangle([1.0; 4]));
        buckets.push(StateKey::Untextured, None, triangle([1.0; 4]));
        buckets.push(brick.state_key(), Some(&brick), triangle([1.0; 4]));

        assert_eq!(buckets.len(), 2);
        let bucket = buckets.get(&brick.state_key()).unwrap();
        assert_eq!(bucket.meshes.len(), 2);
        assert_eq!(bucket.skin.as_ref().map(|s| s.name.as_str()), Some("brick"));
    }

    #[test]
    fn test_drain_orders_untextured_first() {
        let mut buckets = StateBuckets::new();
        buckets.push(StateKey::Skin("b".into()), None, triangle([1.0; 4]));
        buckets.push(StateKey::Skin("a".into()), None, triangle([1.0; 4]));
        buckets.push(StateKey::Untextured, None, triangle([1.0; 4]));

        let keys: Vec<StateKey> = buckets.drain().into_iter().map(|b| b.key).collect();
        assert_eq!(
            keys,
            [
                StateKey::Untextured,
                StateKey::Skin("a".into()),
                StateKey::Skin("b".into())
            ]
        );
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_consolidate_keeps_triangles() {
        let mut bucket = StateBucket::new(StateKey::Untextured, None);
        bucket.meshes = vec![triangle([1.0; 4]), triangle([0.0, 0.0, 0.0, 1.0])];
        bucket.consolidate().unwrap();
        assert_eq!(bucket.meshes.len(), 1);
        assert_eq!(bucket.triangle_count(), 2);
        assert!(bucket.meshes[0].colors().is_some());
    }

    #[test]
    fn test_display() {
        assert_eq!(StateKey::Untextured.to_string(), "untextured");
        assert_eq!(StateKey::Skin("brick".into()).to_string(), "skin 'brick'");
    }
}
