//! # Outlines
//!
//! Roof and base outlines: closed loops of vertices, one loop per extruded
//! contour, later handed to the tessellator.

use glam::DVec3;
use std::ops::Range;

/// Closed-loop outline geometry with one overall color.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    vertices: Vec<DVec3>,
    loops: Vec<Range<usize>>,
    color: [f32; 4],
    name: Option<String>,
}

impl Outline {
    /// Creates an empty outline.
    pub fn new(color: [f32; 4]) -> Self {
        Self {
            vertices: Vec::new(),
            loops: Vec::new(),
            color,
            name: None,
        }
    }

    /// Appends a vertex.
    pub fn add_vertex(&mut self, position: DVec3) {
        self.vertices.push(position);
    }

    /// Registers a closed loop over a contiguous vertex range.
    pub fn add_loop(&mut self, vertices: Range<usize>) {
        self.loops.push(vertices);
    }

    /// Returns all vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns mutable vertices for in-place edits such as reversing winding.
    #[inline]
    pub fn vertices_mut(&mut self) -> &mut [DVec3] {
        &mut self.vertices
    }

    /// Returns the loop ranges.
    #[inline]
    pub fn loops(&self) -> &[Range<usize>] {
        &self.loops
    }

    /// Returns the vertices of one loop.
    pub fn loop_vertices(&self, index: usize) -> &[DVec3] {
        &self.vertices[self.loops[index].clone()]
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the outline has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Overall color.
    #[inline]
    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    /// Sets the identification string.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Returns the identification string.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
