//! # Polygon Data Model
//!
//! A [`Polygon`] owns its vertex list, one outer loop and any number of hole
//! loops. Loops are stored as directed [`EdgeRef`]s into the vertex list.
//!
//! ## Winding
//!
//! Outer loops are counter-clockwise in (x, z) and holes are clockwise, so
//! the interior is always on the left of an edge. Every constructor
//! normalizes to this winding.
//!
//! ## Bounds
//!
//! Bounds are computed lazily on first use and cached. Polygons are never
//! edited in place; every structural change builds a new polygon, so the
//! cache cannot go stale.

mod set;


pub use set::PolygonSet;
pub(crate) use set::sort_by_diagonal_desc;

use crate::boundary::{extract_loops, weld_triangle_soup};
use crate::geometry::{compute_bounds, lift, points_coincide, signed_area, to_plane, Bounds};
use config::constants::approx_zero;
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;

/// Directed edge between two vertex indices of a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRef {
    pub v1: usize,
    pub v2: usize,
}

impl EdgeRef {
    pub fn new(v1: usize, v2: usize) -> Self {
        Self { v1, v2 }
    }

    /// Same edge traversed the other way.
    pub fn reversed(self) -> Self {
        Self {
            v1: self.v2,
            v2: self.v1,
        }
    }
}

/// A planar polygon with holes.
///
/// # Example
///
/// ```rust
/// use floorplan_arrange::Polygon;
/// use glam::DVec3;
///
/// let square = Polygon::from_loop(vec![
///     DVec3::new(0.0, 0.0, 0.0),
///     DVec3::new(2.0, 0.0, 0.0),
///     DVec3::new(2.0, 0.0, 2.0),
///     DVec3::new(0.0, 0.0, 2.0),
/// ])
/// .unwrap();
/// assert_eq!(square.outer_edges().len(), 4);
/// assert!((square.area() - 4.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<DVec3>,
    outer: Vec<EdgeRef>,
    holes: Vec<Vec<EdgeRef>>,
    #[serde(skip)]
    bounds: OnceCell<Bounds>,
}

impl Polygon {
    /// Builds a polygon from an explicit outer point loop.
    ///
    /// Points are flattened onto the plane, consecutive duplicates (and a
    /// repeated closing point) are dropped, and the loop is reordered to
    /// counter-clockwise keeping the first point first.
    ///
    /// Returns `None` for fewer than 3 distinct points or zero area.
    pub fn from_loop(points: Vec<DVec3>) -> Option<Self> {
        Self::with_holes(points, Vec::new())
    }

    /// Builds a polygon from an outer loop and hole loops.
    ///
    /// Holes with fewer than 3 distinct points are skipped. Holes are
    /// reordered to clockwise.
    pub fn with_holes(outer: Vec<DVec3>, holes: Vec<Vec<DVec3>>) -> Option<Self> {
        let outer = normalize_loop(&outer, true)?;

        let mut vertices: Vec<DVec3> = outer.iter().copied().map(lift).collect();
        let outer_edges = ring_edges(0, outer.len());

        let mut hole_edges = Vec::with_capacity(holes.len());
        for hole in &holes {
            let Some(hole) = normalize_loop(hole, false) else {
                log::debug!("skipping degenerate hole loop of {} points", hole.len());
                continue;
            };
            hole_edges.push(ring_edges(vertices.len(), hole.len()));
            vertices.extend(hole.into_iter().map(lift));
        }

        Some(Self {
            vertices,
            outer: outer_edges,
            holes: hole_edges,
            bounds: OnceCell::new(),
        })
    }

    /// Builds a polygon from pre-indexed loops.
    ///
    /// The loops must already be closed chains over `vertices` with the
    /// data-model winding. Returns `None` if the outer loop has fewer than
    /// 3 edges or any index is out of range.
    pub fn from_parts(
        vertices: Vec<DVec3>,
        outer: Vec<EdgeRef>,
        holes: Vec<Vec<EdgeRef>>,
    ) -> Option<Self> {
        if outer.len() < 3 {
            return None;
        }
        let in_range = |e: &EdgeRef| e.v1 < vertices.len() && e.v2 < vertices.len();
        if !outer.iter().all(in_range) || !holes.iter().flatten().all(in_range) {
            return None;
        }
        let vertices = vertices.into_iter().map(|v| DVec3::new(v.x, 0.0, v.z)).collect();
        Some(Self {
            vertices,
            outer,
            holes,
            bounds: OnceCell::new(),
        })
    }

    /// Extracts a polygon from a triangle mesh.
    ///
    /// Coincident vertices are welded first, so unindexed triangle soups
    /// still cancel their shared edges. Returns `None` when the mesh has no
    /// boundary.
    pub fn from_mesh(vertices: &[DVec3], triangles: &[[u32; 3]]) -> Option<Self> {
        let (welded, triangles) = weld_triangle_soup(vertices, triangles);
        let loops = extract_loops(&welded, &triangles);
        if loops.outer.is_empty() {
            return None;
        }
        Self::from_parts(welded, loops.outer, loops.holes)
    }

    /// Returns a copy of this polygon with one more hole.
    pub fn with_added_hole(&self, hole: Vec<DVec3>) -> Option<Self> {
        let mut holes = self.holes();
        holes.push(hole);
        let polygon = Self::with_holes(self.outer_loop(), holes)?;
        (polygon.hole_count() == self.hole_count() + 1).then_some(polygon)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn outer_edges(&self) -> &[EdgeRef] {
        &self.outer
    }

    pub fn hole_edges(&self) -> &[Vec<EdgeRef>] {
        &self.holes
    }

    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    /// Plane position of vertex `index`.
    #[inline]
    pub fn vertex_2d(&self, index: usize) -> DVec2 {
        to_plane(self.vertices[index])
    }

    /// Plane endpoints of an edge.
    #[inline]
    pub fn edge_points(&self, edge: EdgeRef) -> (DVec2, DVec2) {
        (self.vertex_2d(edge.v1), self.vertex_2d(edge.v2))
    }

    /// Outer loop as world-space points, in traversal order.
    pub fn outer_loop(&self) -> Vec<DVec3> {
        self.outer.iter().map(|e| self.vertices[e.v1]).collect()
    }

    /// Outer loop as plane points, in traversal order.
    pub fn outer_loop_2d(&self) -> Vec<DVec2> {
        self.outer.iter().map(|e| self.vertex_2d(e.v1)).collect()
    }

    /// Hole loops as world-space points.
    pub fn holes(&self) -> Vec<Vec<DVec3>> {
        self.holes
            .iter()
            .map(|hole| hole.iter().map(|e| self.vertices[e.v1]).collect())
            .collect()
    }

    /// Hole loops as plane points.
    pub fn holes_2d(&self) -> Vec<Vec<DVec2>> {
        self.holes
            .iter()
            .map(|hole| hole.iter().map(|e| self.vertex_2d(e.v1)).collect())
            .collect()
    }

    /// Outer edges as plane segments.
    pub fn outer_segments(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        self.outer.iter().map(|&e| self.edge_points(e))
    }

    /// Edges of hole `index` as plane segments.
    pub fn hole_segments(&self, index: usize) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        self.holes[index].iter().map(|&e| self.edge_points(e))
    }

    /// Outer and hole edges as plane segments.
    pub fn boundary_segments(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        self.outer
            .iter()
            .chain(self.holes.iter().flatten())
            .map(|&e| self.edge_points(e))
    }

    /// Cached bounds of the outer loop.
    pub fn bounds(&self) -> Bounds {
        *self
            .bounds
            .get_or_init(|| compute_bounds(&self.outer_loop_2d()))
    }

    /// Enclosed area: outer loop minus holes.
    pub fn area(&self) -> f64 {
        let outer = signed_area(&self.outer_loop_2d()).abs();
        let holes: f64 = self
            .holes_2d()
            .iter()
            .map(|hole| signed_area(hole).abs())
            .sum();
        outer - holes
    }
}

/// Consecutive edges `start -> start+1 -> ... -> start` over `len` vertices.
fn ring_edges(start: usize, len: usize) -> Vec<EdgeRef> {
    (0..len)
        .map(|i| EdgeRef::new(start + i, start + (i + 1) % len))
        .collect()
}

/// Flattens, dedups and orients a point loop.
///
/// `ccw` selects the target winding. The first point keeps its position.
fn normalize_loop(points: &[DVec3], ccw: bool) -> Option<Vec<DVec2>> {
    let mut loop_2d: Vec<DVec2> = Vec::with_capacity(points.len());
    for p in points.iter().copied().map(to_plane) {
        if loop_2d.last().map_or(true, |&last| !points_coincide(last, p)) {
            loop_2d.push(p);
        }
    }
    while loop_2d.len() > 1 && points_coincide(loop_2d[0], loop_2d[loop_2d.len() - 1]) {
        loop_2d.pop();
    }
    if loop_2d.len() < 3 {
        return None;
    }

    let area = signed_area(&loop_2d);
    if approx_zero(area) {
        return None;
    }
    if (area > 0.0) != ccw {
        loop_2d[1..].reverse();
    }
    Some(loop_2d)
}
