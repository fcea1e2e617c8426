//! # Triangulation
//!
//! Turns polygons into renderable meshes.
//!
//! The triangulation algorithm sits behind the [`Triangulator`] trait;
//! [`EarcutTriangulator`] is the default implementation.
//! [`TriangulationAdapter`] feeds polygons through a triangulator and
//! applies the renderer's front-face convention.
//!
//! ## Example
//!
//! ```rust
//! use floorplan_arrange::{Polygon, TriangulationAdapter};
//! use glam::DVec3;
//!
//! let square = Polygon::from_loop(vec![
//!     DVec3::new(0.0, 0.0, 0.0),
//!     DVec3::new(1.0, 0.0, 0.0),
//!     DVec3::new(1.0, 0.0, 1.0),
//!     DVec3::new(0.0, 0.0, 1.0),
//! ])
//! .unwrap();
//!
//! let adapter: TriangulationAdapter = TriangulationAdapter::default();
//! let mesh = adapter.to_mesh(&square);
//! assert_eq!(mesh.triangle_count(), 2);
//! ```

mod earcut;

#[cfg(test)]
mod tests;

pub use earcut::EarcutTriangulator;

use crate::mesh::Mesh;
use crate::polygon::{Polygon, PolygonSet};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Triangles over a vertex list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Triangulation {
    pub vertices: Vec<DVec3>,
    pub triangles: Vec<[u32; 3]>,
}

/// Triangulates a planar polygon with holes.
///
/// Output vertices are the outer points followed by each hole's points, in
/// input order. Triangles are counter-clockwise in (x, z). Fewer than three
/// outer points yield no triangles.
pub trait Triangulator {
    fn triangulate(&self, outer: &[DVec2], holes: &[Vec<DVec2>]) -> Triangulation;
}

/// Winding the renderer treats as front-facing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrontFace {
    #[default]
    CounterClockwise,
    /// Every triangle is reversed after triangulation
    Clockwise,
}

/// Polygon to mesh conversion.
#[derive(Debug, Clone, Default)]
pub struct TriangulationAdapter<T = EarcutTriangulator> {
    triangulator: T,
    front_face: FrontFace,
}

impl<T: Triangulator> TriangulationAdapter<T> {
    pub fn new(triangulator: T) -> Self {
        Self {
            triangulator,
            front_face: FrontFace::default(),
        }
    }

    pub fn with_front_face(mut self, front_face: FrontFace) -> Self {
        self.front_face = front_face;
        self
    }

    pub fn front_face(&self) -> FrontFace {
        self.front_face
    }

    /// Triangulates one polygon. Degenerate polygons, and triangulations
    /// that fail [`Mesh::validate`], give an empty mesh.
    pub fn to_mesh(&self, polygon: &Polygon) -> Mesh {
        let outer = polygon.outer_loop_2d();
        if outer.len() < 3 {
            return Mesh::new();
        }
        let triangulation = self.triangulator.triangulate(&outer, &polygon.holes_2d());
        if triangulation.triangles.is_empty() {
            return Mesh::new();
        }

        let mut mesh = Mesh::from(triangulation);
        if !mesh.validate() {
            log::warn!("triangulator returned out-of-range or degenerate triangles, mesh discarded");
            return Mesh::new();
        }
        if self.front_face == FrontFace::Clockwise {
            mesh.reverse_winding();
        }
        mesh
    }

    /// Triangulates every polygon of a set, in order.
    pub fn to_meshes(&self, polygons: &PolygonSet) -> Vec<Mesh> {
        polygons.iter().map(|polygon| self.to_mesh(polygon)).collect()
    }
}
