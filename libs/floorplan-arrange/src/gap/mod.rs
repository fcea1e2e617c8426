//! # Gap Filling
//!
//! Tessellates the empty space between resolved polygons, up to their
//! common bounding rectangle, and groups the resulting triangles into one
//! gap polygon per pair of bridged polygons.
//!
//! ## Algorithm
//!
//! Starting from every outer wall edge, each round finds for every edge the
//! best "third point" on its outward side and emits the triangle
//! `(v1, third, v2)`. The two new edges are queued for the next round unless
//! they cancel against an edge already queued or seen. Rounds repeat until
//! no edges remain.
//!
//! Candidate third points are the outer vertices of every polygon. The
//! bounding rectangle only limits the fill; its corners are never
//! candidates. A candidate qualifies when it lies within
//! `max_normal_angle_degrees` of the edge's outward normal, the midpoint
//! towards it is not covered by any polygon, and neither new edge crosses
//! an edge drawn so far. The lowest `distance * (π - dot)` wins.


use crate::error::{ArrangeError, ArrangeResult, ArrangeWarning};
use crate::geometry::{
    edge_normal, lift, point_in_polygon_with_holes, points_coincide, segment_intersect, Bounds,
    PointWelder,
};
use crate::overlap::{OverlapResolver, ResolveOptions};
use crate::polygon::{Polygon, PolygonSet};
use config::constants::{GAP_MAX_NORMAL_ANGLE_DEGREES, MAX_GAP_FILL_ROUNDS};
use glam::DVec2;
use std::collections::{BTreeMap, HashSet};
use std::f64::consts::PI;

/// Runtime knobs for [`GapFiller`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapFillOptions {
    /// Largest accepted angle between outward normal and candidate direction
    pub max_normal_angle_degrees: f64,
    /// Cap on fill rounds
    pub max_rounds: usize,
    /// Options for merging faces; adjacent merging is always switched on
    pub resolve: ResolveOptions,
}

impl Default for GapFillOptions {
    fn default() -> Self {
        Self {
            max_normal_angle_degrees: GAP_MAX_NORMAL_ANGLE_DEGREES,
            max_rounds: MAX_GAP_FILL_ROUNDS,
            resolve: ResolveOptions::default(),
        }
    }
}

/// A gap polygon and the indices of the two polygons it connects.
#[derive(Debug, Clone)]
pub struct GapPolygon {
    /// Input indices, smaller first
    pub bridges: (usize, usize),
    pub polygon: Polygon,
}

/// Output of [`GapFiller::fill`].
#[derive(Debug, Clone, Default)]
pub struct GapFillResult {
    /// Gap polygons ordered by `bridges`
    pub gaps: Vec<GapPolygon>,
    /// Fill rectangle
    pub bounds: Bounds,
    pub rounds: usize,
    /// Faces that did not bridge exactly two polygons
    pub dropped_faces: usize,
    pub warnings: Vec<ArrangeWarning>,
}

impl GapFillResult {
    /// Gap polygons without their bridge keys.
    pub fn polygons(&self) -> PolygonSet {
        self.gaps.iter().map(|gap| gap.polygon.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct GapVertex {
    point: DVec2,
    /// Welded id, shared by coincident vertices of different owners
    key: usize,
    /// Index of the polygon the vertex came from
    owner: usize,
}

#[derive(Debug, Clone, Copy)]
struct GapEdge {
    v1: GapVertex,
    v2: GapVertex,
}

impl GapEdge {
    fn new(v1: GapVertex, v2: GapVertex) -> Self {
        Self { v1, v2 }
    }

    fn key(&self) -> (usize, usize) {
        (self.v1.key, self.v2.key)
    }

    fn reversed_key(&self) -> (usize, usize) {
        (self.v2.key, self.v1.key)
    }

    fn length(&self) -> f64 {
        self.v1.point.distance(self.v2.point)
    }

    fn center(&self) -> DVec2 {
        (self.v1.point + self.v2.point) * 0.5
    }
}

/// Key of a face that bridges exactly two polygons.
fn face_key(corners: [GapVertex; 3]) -> Option<(usize, usize)> {
    let mut owners: Vec<usize> = Vec::with_capacity(3);
    for corner in corners {
        if !owners.contains(&corner.owner) {
            owners.push(corner.owner);
        }
    }
    match owners.as_slice() {
        &[a, b] => Some((a.min(b), a.max(b))),
        _ => None,
    }
}

/// Edge bookkeeping for one fill run.
struct EdgeLedger {
    /// Every edge ever accepted, by welded key
    seen: HashSet<(usize, usize)>,
    /// Segments new edges must not cross
    drawn: Vec<(DVec2, DVec2)>,
}

impl EdgeLedger {
    fn crosses(&self, p1: DVec2, p2: DVec2) -> bool {
        self.drawn.iter().any(|&(p3, p4)| {
            let identical = (points_coincide(p1, p3) && points_coincide(p2, p4))
                || (points_coincide(p1, p4) && points_coincide(p2, p3));
            !identical && segment_intersect(p1, p2, p3, p4).is_some()
        })
    }

    /// Queues `edge` for the next round unless it cancels.
    fn add(&mut self, edge: GapEdge, pending: &mut Vec<GapEdge>) {
        if let Some(i) = pending.iter().position(|e| e.key() == edge.reversed_key()) {
            pending.remove(i);
        } else if let Some(i) = pending.iter().position(|e| e.key() == edge.key()) {
            pending.remove(i);
        } else if self.seen.contains(&edge.key()) || self.seen.contains(&edge.reversed_key()) {
            log::trace!("discarding already seen edge {:?}", edge.key());
        } else {
            self.seen.insert(edge.key());
            self.drawn.push((edge.v1.point, edge.v2.point));
            pending.push(edge);
        }
    }
}

/// Fills the space between polygons with bridging gap polygons.
#[derive(Debug, Clone, Default)]
pub struct GapFiller {
    options: GapFillOptions,
}

impl GapFiller {
    pub fn new(options: GapFillOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GapFillOptions {
        &self.options
    }

    /// Tessellates the gaps between the polygons of `set`.
    ///
    /// Returns an empty result for fewer than two polygons.
    pub fn fill(&self, set: &PolygonSet) -> ArrangeResult<GapFillResult> {
        let polygons = set.as_slice();
        let bounds = set.bounds();
        if polygons.len() < 2 {
            return Ok(GapFillResult {
                bounds,
                ..GapFillResult::default()
            });
        }

        let mut welder = PointWelder::new();
        let mut candidates = Vec::new();
        let mut edges = Vec::new();
        for (index, polygon) in polygons.iter().enumerate() {
            let ring: Vec<GapVertex> = polygon
                .outer_loop_2d()
                .into_iter()
                .map(|point| GapVertex {
                    point,
                    key: welder.weld(point),
                    owner: index,
                })
                .collect();
            for i in 0..ring.len() {
                edges.push(GapEdge::new(ring[i], ring[(i + 1) % ring.len()]));
            }
            candidates.extend(ring);
        }

        let mut ledger = EdgeLedger {
            seen: edges.iter().map(GapEdge::key).collect(),
            drawn: edges.iter().map(|e| (e.v1.point, e.v2.point)).collect(),
        };

        let mut faces: Vec<[GapVertex; 3]> = Vec::new();
        let mut dropped_edges = 0;
        let mut rounds = 0;

        while !edges.is_empty() {
            if rounds >= self.options.max_rounds {
                return Err(ArrangeError::iteration_limit("gap filling", self.options.max_rounds));
            }
            rounds += 1;

            edges.sort_by(|a, b| b.length().total_cmp(&a.length()));
            let mut pending = Vec::new();

            for edge in &edges {
                let Some(third) = self.find_third_point(edge, &candidates, polygons, &ledger) else {
                    dropped_edges += 1;
                    continue;
                };
                ledger.add(GapEdge::new(edge.v1, third), &mut pending);
                ledger.add(GapEdge::new(third, edge.v2), &mut pending);
                faces.push([edge.v1, third, edge.v2]);
            }

            log::debug!(
                "gap round {rounds}: {} edges, {} faces so far, {} pending",
                edges.len(),
                faces.len(),
                pending.len()
            );
            edges = pending;
        }

        let mut warnings = Vec::new();
        if dropped_edges > 0 {
            log::debug!("{dropped_edges} gap edges had no valid third point");
            warnings.push(ArrangeWarning::DroppedEdges {
                count: dropped_edges,
            });
        }

        let mut groups: BTreeMap<(usize, usize), Vec<Polygon>> = BTreeMap::new();
        let mut dropped_faces = 0;
        for corners in faces {
            let key = face_key(corners);
            let triangle = Polygon::from_loop(corners.iter().map(|c| lift(c.point)).collect());
            match (key, triangle) {
                (Some(key), Some(triangle)) => groups.entry(key).or_default().push(triangle),
                _ => dropped_faces += 1,
            }
        }
        if dropped_faces > 0 {
            log::warn!("{dropped_faces} gap faces did not bridge two polygons");
            warnings.push(ArrangeWarning::UnbridgedFaces {
                count: dropped_faces,
            });
        }

        let resolver = OverlapResolver::new(self.options.resolve.with_merge_adjacent(true));
        let mut gaps = Vec::new();
        for (bridges, triangles) in groups {
            let mut group = PolygonSet::from(triangles);
            let report = resolver.resolve(&mut group)?;
            warnings.extend(report.warnings);
            gaps.extend(
                group
                    .into_iter()
                    .map(|polygon| GapPolygon { bridges, polygon }),
            );
        }

        Ok(GapFillResult {
            gaps,
            bounds,
            rounds,
            dropped_faces,
            warnings,
        })
    }

    fn find_third_point(
        &self,
        edge: &GapEdge,
        candidates: &[GapVertex],
        polygons: &[Polygon],
        ledger: &EdgeLedger,
    ) -> Option<GapVertex> {
        let center = edge.center();
        let normal = edge_normal(edge.v1.point, edge.v2.point);
        let max_angle = self.options.max_normal_angle_degrees.to_radians();

        let mut best: Option<(f64, GapVertex)> = None;
        for &candidate in candidates {
            if candidate.key == edge.v1.key || candidate.key == edge.v2.key {
                continue;
            }
            let offset = candidate.point - center;
            let distance = offset.length();
            if distance == 0.0 {
                continue;
            }
            let dot = (offset / distance).dot(normal);
            if dot <= 0.0 || dot.clamp(-1.0, 1.0).acos() >= max_angle {
                continue;
            }
            let midpoint = center + offset * 0.5;
            if polygons
                .iter()
                .any(|polygon| point_in_polygon_with_holes(midpoint, polygon))
            {
                continue;
            }

            let score = distance * (PI - dot);
            if best.map_or(true, |(best_score, _)| score < best_score)
                && !ledger.crosses(edge.v1.point, candidate.point)
                && !ledger.crosses(candidate.point, edge.v2.point)
            {
                best = Some((score, candidate));
            }
        }
        best.map(|(_, vertex)| vertex)
    }
}
