//! # Mesh Data Structure
//!
//! Triangle mesh handed to the renderer and read back by boundary
//! extraction.

use crate::geometry::{to_plane, Bounds};
use crate::triangulate::Triangulation;
use config::constants::approx_zero;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A triangle mesh on the floor plane.
///
/// # Example
///
/// ```rust
/// use floorplan_arrange::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 1.0));
/// mesh.add_triangle(0, 1, 2);
/// assert!((mesh.plane_area().abs() - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    vertices: Vec<DVec3>,
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Plane bounds of all vertices.
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::empty();
        for &v in &self.vertices {
            bounds.include(to_plane(v));
        }
        bounds
    }

    /// Flips every triangle by reversing the index stream.
    ///
    /// Triangle order is reversed along with the corners of each triangle.
    pub fn reverse_winding(&mut self) {
        self.triangles.reverse();
        for triangle in &mut self.triangles {
            triangle.reverse();
        }
    }

    /// Sum of signed triangle areas in (x, z). Positive when triangles are
    /// counter-clockwise.
    pub fn plane_area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let a = to_plane(self.vertices[a as usize]);
                let b = to_plane(self.vertices[b as usize]);
                let c = to_plane(self.vertices[c as usize]);
                (b - a).perp_dot(c - a) * 0.5
            })
            .sum()
    }

    /// Checks indices are in range and no triangle is degenerate.
    pub fn validate(&self) -> bool {
        let count = self.vertices.len() as u32;
        self.triangles.iter().all(|&[a, b, c]| {
            if a >= count || b >= count || c >= count || a == b || b == c || a == c {
                return false;
            }
            let (pa, pb, pc) = (
                to_plane(self.vertices[a as usize]),
                to_plane(self.vertices[b as usize]),
                to_plane(self.vertices[c as usize]),
            );
            !approx_zero((pb - pa).perp_dot(pc - pa))
        })
    }
}

impl From<Triangulation> for Mesh {
    fn from(triangulation: Triangulation) -> Self {
        Self {
            vertices: triangulation.vertices,
            triangles: triangulation.triangles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(DVec3::new(0.0, 0.0, 1.0));
        mesh.add_triangle(0, 1, 2);
        mesh
    }

    #[test]
    fn test_mesh_new_is_empty() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_mesh_plane_area_sign() {
        let mut mesh = unit_triangle();
        assert!((mesh.plane_area() - 0.5).abs() < 1e-12);
        mesh.reverse_winding();
        assert!((mesh.plane_area() + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_mesh_reverse_winding_reverses_stream() {
        let mut mesh = unit_triangle();
        mesh.add_vertex(DVec3::new(1.0, 0.0, 1.0));
        mesh.add_triangle(1, 3, 2);
        mesh.reverse_winding();
        assert_eq!(mesh.triangles(), &[[2, 3, 1], [2, 1, 0]]);
    }

    #[test]
    fn test_mesh_bounds() {
        let bounds = unit_triangle().bounds();
        assert_eq!(bounds.min.x, 0.0);
        assert_eq!(bounds.max.y, 1.0);
    }

    #[test]
    fn test_mesh_validate() {
        assert!(unit_triangle().validate());

        let mut broken = Mesh::new();
        broken.add_vertex(DVec3::ZERO);
        broken.add_triangle(0, 1, 2);
        assert!(!broken.validate());
    }
}
