//! # Boundary Merge
//!
//! Unions the outer loops of two polygons into one outer loop plus any
//! holes the union encloses.
//!
//! ## Algorithm
//!
//! 1. Find proper crossings between the two outer loops and every vertex of
//!    one polygon that lies on an edge of the other (touches)
//! 2. Split both loops at those points; nodes are welded so a crossing and a
//!    coincident vertex become one node
//! 3. Keep the directed edges on the union boundary: midpoint outside the
//!    other polygon, or a shared edge in the same direction (first copy
//!    only). Shared edges in opposite directions cancel
//! 4. Walk the outer loop from the lowest-leftmost node, taking the
//!    sharpest clockwise turn at every junction
//! 5. Walk the remaining edges into hole loops, up to a fixed budget
//!
//! Existing holes of both inputs are carried over unchanged.

use crate::error::{ArrangeError, ArrangeResult, ArrangeWarning};
use crate::geometry::{
    cw_angle_between, is_collinear, lift, point_in_loop, point_on_segment, points_coincide,
    segment_intersect, signed_area, PointWelder,
};
use crate::polygon::Polygon;
use config::constants::walk_step_limit;
use glam::DVec2;
use std::collections::{HashMap, HashSet};

/// Which input of a merge an edge or touch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    First,
    Second,
}

/// Proper crossing between outer edge `edge_a` of the first polygon and
/// outer edge `edge_b` of the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeIntersection {
    pub edge_a: usize,
    pub edge_b: usize,
    pub point: DVec2,
}

/// A vertex of one polygon lying on outer edge `edge` of the polygon
/// named by `side`. Coincident vertices show up here too, on both edges
/// that meet at the vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedVertex {
    pub side: Side,
    pub edge: usize,
    pub point: DVec2,
}

/// Result of merging two polygons.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub polygon: Polygon,
    pub warnings: Vec<ArrangeWarning>,
}

/// All proper crossings between the outer loops of `a` and `b`.
pub fn find_edge_intersections(a: &Polygon, b: &Polygon) -> Vec<EdgeIntersection> {
    let mut hits = Vec::new();
    for (edge_a, (p1, p2)) in a.outer_segments().enumerate() {
        for (edge_b, (p3, p4)) in b.outer_segments().enumerate() {
            if let Some(point) = segment_intersect(p1, p2, p3, p4) {
                hits.push(EdgeIntersection {
                    edge_a,
                    edge_b,
                    point,
                });
            }
        }
    }
    hits
}

/// All touches between the outer loops of `a` and `b`.
pub fn find_shared_vertices(a: &Polygon, b: &Polygon) -> Vec<SharedVertex> {
    let mut touches = vertices_on_edges(b, a, Side::First);
    touches.extend(vertices_on_edges(a, b, Side::Second));
    touches
}

fn vertices_on_edges(source: &Polygon, target: &Polygon, side: Side) -> Vec<SharedVertex> {
    let mut touches = Vec::new();
    for point in source.outer_loop_2d() {
        for (edge, (s, e)) in target.outer_segments().enumerate() {
            if point_on_segment(point, s, e) {
                touches.push(SharedVertex { side, edge, point });
            }
        }
    }
    touches
}

#[derive(Debug, Clone, Copy)]
struct WalkEdge {
    from: usize,
    to: usize,
}

/// Kept union-boundary edges over welded nodes.
struct WalkGraph {
    welder: PointWelder,
    edges: Vec<WalkEdge>,
    outgoing: HashMap<usize, Vec<usize>>,
}

impl WalkGraph {
    fn point(&self, node: usize) -> DVec2 {
        self.welder.point(node)
    }

    fn direction(&self, edge: usize) -> DVec2 {
        let e = self.edges[edge];
        self.point(e.to) - self.point(e.from)
    }

    /// Outgoing unused edge at `node` with the largest clockwise angle from
    /// `back`. Ties keep the first edge.
    fn sharpest_turn(&self, node: usize, back: DVec2, used: &[bool]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &candidate in self.outgoing.get(&node)? {
            if used[candidate] {
                continue;
            }
            let angle = cw_angle_between(back, self.direction(candidate));
            if best.map_or(true, |(_, best_angle)| angle > best_angle) {
                best = Some((candidate, angle));
            }
        }
        best.map(|(edge, _)| edge)
    }

    /// Follows edges from `start` until the walk returns to its first node.
    ///
    /// Every traversed edge is marked used, also when the walk fails.
    fn walk(&self, start: usize, used: &mut [bool]) -> Option<Vec<usize>> {
        let start_node = self.edges[start].from;
        let mut nodes = vec![start_node];
        let mut current = start;

        for _ in 0..walk_step_limit(self.edges.len()) {
            used[current] = true;
            let edge = self.edges[current];
            if edge.to == start_node {
                return Some(nodes);
            }
            nodes.push(edge.to);

            let back = self.point(edge.from) - self.point(edge.to);
            let next = self.sharpest_turn(edge.to, back, used)?;
            log::trace!("walk {} -> {} via edge {}", edge.to, self.edges[next].to, next);
            current = next;
        }
        None
    }

    /// Kept edge leaving the lowest-leftmost node.
    fn outer_start(&self) -> Option<usize> {
        let start_node = self
            .edges
            .iter()
            .map(|edge| edge.from)
            .min_by(|&a, &b| {
                let (pa, pb) = (self.point(a), self.point(b));
                pa.x.total_cmp(&pb.x).then(pa.y.total_cmp(&pb.y))
            })?;
        // Arriving at the leftmost node from above
        let unused = vec![false; self.edges.len()];
        self.sharpest_turn(start_node, DVec2::Y, &unused)
    }

    fn loop_points(&self, nodes: &[usize]) -> Vec<DVec2> {
        nodes.iter().map(|&n| self.point(n)).collect()
    }
}

/// Splits an outer loop at the given points and returns welded node ids.
fn split_loop(points: &[DVec2], splits: &[Vec<DVec2>], welder: &mut PointWelder) -> Vec<usize> {
    let n = points.len();
    let mut nodes: Vec<usize> = Vec::with_capacity(n);

    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        push_node(&mut nodes, welder.weld(a));

        let d = b - a;
        let len_sq = d.length_squared();
        if len_sq == 0.0 {
            continue;
        }
        let mut interior: Vec<(f64, DVec2)> = splits[i]
            .iter()
            .filter(|&&p| !points_coincide(p, a) && !points_coincide(p, b))
            .map(|&p| ((p - a).dot(d) / len_sq, p))
            .collect();
        interior.sort_by(|x, y| x.0.total_cmp(&y.0));
        for (_, p) in interior {
            push_node(&mut nodes, welder.weld(p));
        }
    }

    while nodes.len() > 1 && nodes.first() == nodes.last() {
        nodes.pop();
    }
    nodes
}

fn push_node(nodes: &mut Vec<usize>, id: usize) {
    if nodes.last() != Some(&id) {
        nodes.push(id);
    }
}

fn directed_pairs(nodes: &[usize]) -> Vec<(usize, usize)> {
    let n = nodes.len();
    (0..n).map(|i| (nodes[i], nodes[(i + 1) % n])).collect()
}

/// Removes duplicate and straight-through vertices from a closed loop.
pub(crate) fn simplify_loop(mut points: Vec<DVec2>) -> Vec<DVec2> {
    loop {
        let n = points.len();
        if n < 3 {
            return points;
        }
        let redundant = (0..n).find(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            points_coincide(prev, points[i]) || is_collinear(prev, points[i], next)
        });
        match redundant {
            Some(i) => {
                points.remove(i);
            }
            None => return points,
        }
    }
}

/// Merges the outer loops of `first` and `second`.
///
/// `first` wins when both polygons contain the same directed edge. The
/// outer walk failing is a hard error; an incomplete hole set is accepted
/// with a warning.
pub fn merge_pair(
    first: &Polygon,
    second: &Polygon,
    hole_walk_attempts: usize,
) -> ArrangeResult<MergeOutcome> {
    let loop_a = first.outer_loop_2d();
    let loop_b = second.outer_loop_2d();

    let mut splits_a = vec![Vec::new(); loop_a.len()];
    let mut splits_b = vec![Vec::new(); loop_b.len()];
    let crossings = find_edge_intersections(first, second);
    for hit in &crossings {
        splits_a[hit.edge_a].push(hit.point);
        splits_b[hit.edge_b].push(hit.point);
    }
    for touch in find_shared_vertices(first, second) {
        match touch.side {
            Side::First => splits_a[touch.edge].push(touch.point),
            Side::Second => splits_b[touch.edge].push(touch.point),
        }
    }

    let mut welder = PointWelder::new();
    let nodes_a = split_loop(&loop_a, &splits_a, &mut welder);
    let nodes_b = split_loop(&loop_b, &splits_b, &mut welder);
    let pairs_a = directed_pairs(&nodes_a);
    let pairs_b = directed_pairs(&nodes_b);
    let keys_a: HashSet<(usize, usize)> = pairs_a.iter().copied().collect();
    let keys_b: HashSet<(usize, usize)> = pairs_b.iter().copied().collect();

    let mut edges = Vec::new();
    for (side, pairs, other_keys, other_loop) in [
        (Side::First, &pairs_a, &keys_b, &loop_b),
        (Side::Second, &pairs_b, &keys_a, &loop_a),
    ] {
        for &(from, to) in pairs {
            if from == to {
                continue;
            }
            let keep = if other_keys.contains(&(to, from)) {
                false
            } else if other_keys.contains(&(from, to)) {
                side == Side::First
            } else {
                let mid = (welder.point(from) + welder.point(to)) * 0.5;
                !point_in_loop(mid, other_loop)
            };
            if keep {
                edges.push(WalkEdge { from, to });
            }
        }
    }

    let mut outgoing: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, edge) in edges.iter().enumerate() {
        outgoing.entry(edge.from).or_default().push(i);
    }
    let graph = WalkGraph {
        welder,
        edges,
        outgoing,
    };
    log::debug!(
        "merging {} + {} vertices: {} crossings, {} kept edges",
        loop_a.len(),
        loop_b.len(),
        crossings.len(),
        graph.edges.len()
    );

    let mut used = vec![false; graph.edges.len()];
    let start = graph
        .outer_start()
        .ok_or_else(|| ArrangeError::unresolved_merge("no boundary edges survived the merge"))?;
    let outer_nodes = graph.walk(start, &mut used).ok_or_else(|| {
        ArrangeError::unresolved_merge(format!(
            "outer walk from node {} did not close",
            graph.edges[start].from
        ))
    })?;
    let outer = simplify_loop(graph.loop_points(&outer_nodes));
    if outer.len() < 3 || signed_area(&outer) <= 0.0 {
        return Err(ArrangeError::unresolved_merge(format!(
            "outer walk produced an invalid loop of {} vertices",
            outer.len()
        )));
    }

    let mut holes: Vec<Vec<DVec2>> = Vec::new();
    let mut attempts = 0;
    while attempts < hole_walk_attempts {
        let Some(seed) = used.iter().position(|&u| !u) else {
            break;
        };
        attempts += 1;
        match graph.walk(seed, &mut used) {
            Some(nodes) => {
                let hole = simplify_loop(graph.loop_points(&nodes));
                if hole.len() >= 3 && signed_area(&hole) < 0.0 {
                    holes.push(hole);
                } else {
                    log::trace!("discarding non-hole loop of {} vertices", hole.len());
                }
            }
            None => log::trace!("hole walk from edge {seed} stayed open"),
        }
    }

    let mut warnings = Vec::new();
    let unused_edges = used.iter().filter(|&&u| !u).count();
    if unused_edges > 0 {
        log::warn!(
            "hole extraction stopped after {attempts} attempts with {unused_edges} edges left"
        );
        warnings.push(ArrangeWarning::UnresolvedMergeLoop {
            unused_edges,
            attempts,
        });
    }

    let all_holes: Vec<_> = holes
        .into_iter()
        .map(|hole| hole.into_iter().map(lift).collect::<Vec<_>>())
        .chain(first.holes())
        .chain(second.holes())
        .collect();
    let outer_3d = outer.into_iter().map(lift).collect();
    let polygon = Polygon::with_holes(outer_3d, all_holes)
        .ok_or_else(|| ArrangeError::degenerate("merged outer loop collapsed"))?;

    Ok(MergeOutcome { polygon, warnings })
}
