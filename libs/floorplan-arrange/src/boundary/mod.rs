//! # Boundary Extraction
//!
//! Recovers the outer loop and hole loops of a triangulated planar region.
//!
//! ## Algorithm
//!
//! 1. Every triangle contributes its three directed edges
//! 2. An edge `(a, b)` that meets its reverse `(b, a)` is interior; both
//!    are cancelled. What remains is the boundary
//! 3. Boundary edges are chained head to tail into closed loops
//! 4. The loop with the largest bounding-box diagonal is the outer loop
//! 5. Loops are flipped if needed so the outer loop is counter-clockwise
//!
//! ## Example
//!
//! ```rust
//! use floorplan_arrange::boundary::extract_loops;
//! use glam::DVec3;
//!
//! let vertices = vec![
//!     DVec3::new(0.0, 0.0, 0.0),
//!     DVec3::new(1.0, 0.0, 0.0),
//!     DVec3::new(1.0, 0.0, 1.0),
//!     DVec3::new(0.0, 0.0, 1.0),
//! ];
//! let loops = extract_loops(&vertices, &[[0, 1, 2], [0, 2, 3]]);
//! assert_eq!(loops.outer.len(), 4);
//! assert!(loops.holes.is_empty());
//! ```


use crate::geometry::{compute_bounds, lift, signed_area, to_plane, PointWelder};
use crate::polygon::EdgeRef;
use glam::{DVec2, DVec3};
use std::collections::HashMap;

/// Boundary loops of a mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryLoops {
    /// Outer loop, counter-clockwise. Empty if the mesh had no boundary.
    pub outer: Vec<EdgeRef>,
    /// Hole loops, clockwise.
    pub holes: Vec<Vec<EdgeRef>>,
}

impl BoundaryLoops {
    pub fn is_empty(&self) -> bool {
        self.outer.is_empty()
    }
}

/// Directed edges of every triangle, in triangle order.
pub fn triangle_edges(triangles: &[[u32; 3]]) -> Vec<EdgeRef> {
    let mut edges = Vec::with_capacity(triangles.len() * 3);
    for &[a, b, c] in triangles {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        edges.push(EdgeRef::new(a, b));
        edges.push(EdgeRef::new(b, c));
        edges.push(EdgeRef::new(c, a));
    }
    edges
}

/// Cancels interior edges, keeping boundary edges in input order.
///
/// Each edge is matched against at most one earlier unmatched reverse, so
/// non-manifold fans cancel pairwise. Degenerate edges (`v1 == v2`) are
/// dropped.
pub fn find_boundary(edges: &[EdgeRef]) -> Vec<EdgeRef> {
    let mut alive = vec![true; edges.len()];
    let mut unmatched: HashMap<EdgeRef, Vec<usize>> = HashMap::new();

    for (i, &edge) in edges.iter().enumerate() {
        if edge.v1 == edge.v2 {
            alive[i] = false;
            continue;
        }
        let partner = unmatched
            .get_mut(&edge.reversed())
            .and_then(|stack| stack.pop());
        match partner {
            Some(j) => {
                alive[i] = false;
                alive[j] = false;
            }
            None => unmatched.entry(edge).or_default().push(i),
        }
    }

    edges
        .iter()
        .zip(alive)
        .filter_map(|(&edge, keep)| keep.then_some(edge))
        .collect()
}

/// Chains boundary edges into closed loops.
///
/// A walk starts at the first unvisited edge and follows `v2 == next.v1`
/// until it returns to its start vertex. At a pinch vertex with several
/// outgoing edges the first unvisited one in input order is taken. Chains
/// that never close are discarded.
pub fn chain_loops(edges: &[EdgeRef]) -> Vec<Vec<EdgeRef>> {
    let mut outgoing: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, edge) in edges.iter().enumerate() {
        outgoing.entry(edge.v1).or_default().push(i);
    }

    let mut visited = vec![false; edges.len()];
    let mut loops = Vec::new();

    for start in 0..edges.len() {
        if visited[start] {
            continue;
        }
        let start_vertex = edges[start].v1;
        let mut chain = Vec::new();
        let mut current = start;
        let mut closed = false;

        for _ in 0..edges.len() {
            visited[current] = true;
            chain.push(edges[current]);
            let head = edges[current].v2;
            if head == start_vertex {
                closed = true;
                break;
            }
            let next = outgoing
                .get(&head)
                .and_then(|candidates| candidates.iter().copied().find(|&i| !visited[i]));
            match next {
                Some(next) => current = next,
                None => break,
            }
        }

        if closed && chain.len() >= 3 {
            loops.push(chain);
        } else {
            log::debug!("discarding open boundary chain of {} edges", chain.len());
        }
    }

    loops
}

/// Extracts the outer loop and holes of a triangle mesh.
///
/// Returns empty loops when there are no boundary edges.
pub fn extract_loops(vertices: &[DVec3], triangles: &[[u32; 3]]) -> BoundaryLoops {
    let in_range = triangles
        .iter()
        .all(|t| t.iter().all(|&i| (i as usize) < vertices.len()));
    if !in_range {
        log::warn!("triangle index out of range, mesh ignored");
        return BoundaryLoops::default();
    }

    let boundary = find_boundary(&triangle_edges(triangles));
    if boundary.is_empty() {
        return BoundaryLoops::default();
    }

    let mut loops = chain_loops(&boundary);
    if loops.is_empty() {
        return BoundaryLoops::default();
    }

    let points_of = |chain: &[EdgeRef]| -> Vec<DVec2> {
        chain.iter().map(|e| to_plane(vertices[e.v1])).collect()
    };

    // First maximum wins so the choice is stable for equal diagonals.
    let mut outer_index = 0;
    let mut best = f64::NEG_INFINITY;
    for (i, chain) in loops.iter().enumerate() {
        let diagonal = compute_bounds(&points_of(chain)).diagonal();
        if diagonal > best {
            best = diagonal;
            outer_index = i;
        }
    }

    let mut outer = loops.remove(outer_index);
    let mut holes = loops;

    if signed_area(&points_of(&outer)) < 0.0 {
        reverse_loop(&mut outer);
        holes.iter_mut().for_each(|hole| reverse_loop(hole));
    }

    BoundaryLoops { outer, holes }
}

fn reverse_loop(chain: &mut [EdgeRef]) {
    chain.reverse();
    for edge in chain.iter_mut() {
        *edge = edge.reversed();
    }
}

/// Merges vertices closer than vertex tolerance and remaps triangles.
///
/// Triangles that collapse (two corners welded together) or reference
/// out-of-range vertices are dropped.
pub fn weld_triangle_soup(vertices: &[DVec3], triangles: &[[u32; 3]]) -> (Vec<DVec3>, Vec<[u32; 3]>) {
    let mut welder = PointWelder::new();
    let remap: Vec<usize> = vertices
        .iter()
        .map(|&v| welder.weld(to_plane(v)))
        .collect();

    let mut welded_triangles = Vec::with_capacity(triangles.len());
    for triangle in triangles {
        let mut ids = [0u32; 3];
        let mut valid = true;
        for (slot, &index) in ids.iter_mut().zip(triangle) {
            match remap.get(index as usize) {
                Some(&id) => *slot = id as u32,
                None => valid = false,
            }
        }
        if !valid {
            log::debug!("dropping triangle {triangle:?} with out-of-range index");
            continue;
        }
        if ids[0] == ids[1] || ids[1] == ids[2] || ids[2] == ids[0] {
            continue;
        }
        welded_triangles.push(ids);
    }

    let welded_vertices = welder.points().iter().copied().map(lift).collect();
    (welded_vertices, welded_triangles)
}
