//! # Overlap Resolution
//!
//! Classifies polygon pairs and merges or removes them until no two
//! polygons in the set overlap.
//!
//! ## Fixed Point
//!
//! Each pass sorts the working list by bounding-box diagonal (largest
//! first) and scans pairs `(i, j > i)`. The first pair that needs a change
//! is resolved and the scan restarts:
//!
//! - [`OverlapType::FullyContainedIn1`] drops polygon `j`
//! - [`OverlapType::FullyContainedIn2`] drops polygon `i`
//! - [`OverlapType::Overlapping`] / [`OverlapType::Adjacent`] replace both with
//!   their boundary merge
//!
//! The loop ends when a full scan changes nothing.
//!
//! ## Example
//!
//! ```rust
//! use floorplan_arrange::{OverlapResolver, Polygon, PolygonSet, ResolveOptions};
//! use glam::DVec3;
//!
//! let square = |x: f64, z: f64, size: f64| {
//!     Polygon::from_loop(vec![
//!         DVec3::new(x, 0.0, z),
//!         DVec3::new(x + size, 0.0, z),
//!         DVec3::new(x + size, 0.0, z + size),
//!         DVec3::new(x, 0.0, z + size),
//!     ])
//!     .unwrap()
//! };
//!
//! let mut set = PolygonSet::from(vec![square(0.0, 0.0, 2.0), square(1.0, 1.0, 2.0)]);
//! let report = OverlapResolver::new(ResolveOptions::default())
//!     .resolve(&mut set)
//!     .unwrap();
//! assert_eq!(set.len(), 1);
//! assert_eq!(report.merged, 1);
//! ```

mod merge;

#[cfg(test)]
mod tests;

pub use merge::{
    find_edge_intersections, find_shared_vertices, merge_pair, EdgeIntersection, MergeOutcome,
    SharedVertex, Side,
};

use crate::error::{ArrangeError, ArrangeResult, ArrangeWarning};
use crate::geometry::{point_in_polygon_with_holes, point_on_segment, segment_intersect};
use crate::polygon::{sort_by_diagonal_desc, Polygon, PolygonSet};
use config::constants::{HOLE_WALK_ATTEMPTS, MAX_RESOLVE_PASSES, VERTEX_MERGE_EPSILON};
use glam::DVec2;

/// Relationship between two polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapType {
    NotOverlapping,
    /// Outer boundaries cross
    Overlapping,
    /// The second polygon lies inside the first
    FullyContainedIn1,
    /// The first polygon lies inside the second
    FullyContainedIn2,
    /// Disjoint interiors sharing a boundary segment in opposite directions.
    /// Only reported when adjacent merging is enabled.
    Adjacent,
}

/// Runtime knobs for [`OverlapResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Cap on fixed-point passes
    pub max_passes: usize,
    /// Hole walks attempted per merge
    pub hole_walk_attempts: usize,
    /// Also merge polygons that only share an edge
    pub merge_adjacent: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_passes: MAX_RESOLVE_PASSES,
            hole_walk_attempts: HOLE_WALK_ATTEMPTS,
            merge_adjacent: false,
        }
    }
}

impl ResolveOptions {
    /// Same options with adjacent merging switched on.
    pub fn with_merge_adjacent(mut self, merge_adjacent: bool) -> Self {
        self.merge_adjacent = merge_adjacent;
        self
    }
}

/// What a [`OverlapResolver::resolve`] call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Passes run, including the final pass that found nothing
    pub passes: usize,
    /// Pair merges performed
    pub merged: usize,
    /// Contained polygons removed
    pub removed: usize,
    pub warnings: Vec<ArrangeWarning>,
}

impl ResolveReport {
    /// True when the set was left as it was.
    pub fn is_unchanged(&self) -> bool {
        self.merged == 0 && self.removed == 0
    }
}

enum Step {
    Remove(usize),
    Merge(usize, usize),
}

/// Merges overlapping polygons until none overlap.
#[derive(Debug, Clone, Default)]
pub struct OverlapResolver {
    options: ResolveOptions,
}

impl OverlapResolver {
    pub fn new(options: ResolveOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Classifies a pair using this resolver's options.
    pub fn classify(&self, a: &Polygon, b: &Polygon) -> OverlapType {
        classify(a, b, self.options.merge_adjacent)
    }

    /// Boundary merge of two polygons. `a` wins shared same-direction edges.
    pub fn merge_pair(&self, a: &Polygon, b: &Polygon) -> ArrangeResult<MergeOutcome> {
        merge_pair(a, b, self.options.hole_walk_attempts)
    }

    /// Resolves `set` to a fixed point.
    ///
    /// Works on a copy and writes back only on success. On error `set` is
    /// unchanged.
    pub fn resolve(&self, set: &mut PolygonSet) -> ArrangeResult<ResolveReport> {
        let mut working: Vec<Polygon> = set.as_slice().to_vec();
        let mut report = ResolveReport::default();

        loop {
            if report.passes >= self.options.max_passes {
                return Err(ArrangeError::iteration_limit(
                    "overlap resolution",
                    self.options.max_passes,
                ));
            }
            report.passes += 1;
            sort_by_diagonal_desc(&mut working);

            match self.next_step(&working) {
                None => break,
                Some(Step::Remove(index)) => {
                    log::debug!("removing contained polygon {index}");
                    working.remove(index);
                    report.removed += 1;
                }
                Some(Step::Merge(i, j)) => {
                    let outcome = self.merge_pair(&working[i], &working[j])?;
                    log::debug!(
                        "merged polygons {i} and {j} into {} outer vertices, {} holes",
                        outcome.polygon.outer_edges().len(),
                        outcome.polygon.hole_count()
                    );
                    working.remove(j);
                    working.remove(i);
                    working.push(outcome.polygon);
                    report.merged += 1;
                    report.warnings.extend(outcome.warnings);
                }
            }
        }

        if !report.is_unchanged() {
            *set = PolygonSet::from(working);
        }
        Ok(report)
    }

    fn next_step(&self, polygons: &[Polygon]) -> Option<Step> {
        for i in 0..polygons.len() {
            for j in i + 1..polygons.len() {
                match self.classify(&polygons[i], &polygons[j]) {
                    OverlapType::NotOverlapping => {}
                    OverlapType::FullyContainedIn1 => return Some(Step::Remove(j)),
                    OverlapType::FullyContainedIn2 => return Some(Step::Remove(i)),
                    OverlapType::Overlapping | OverlapType::Adjacent => {
                        return Some(Step::Merge(i, j))
                    }
                }
            }
        }
        None
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Where one polygon's sample points fall relative to another polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Inside,
    Outside,
    /// Samples on both sides
    Straddling,
    /// Every sample lies on the other boundary
    OnBoundary,
}

/// Classifies polygons `a` and `b`.
///
/// Checks run in order: bounds, outer-edge crossings, then containment
/// probes. The probe of a polygon is its first outer vertex not on the
/// other polygon's boundary, falling back to edge midpoints. Remaining
/// samples only matter when they disagree with the probe, which catches
/// overlaps whose boundaries meet at vertices without a proper crossing.
pub fn classify(a: &Polygon, b: &Polygon, merge_adjacent: bool) -> OverlapType {
    let (bounds_a, bounds_b) = (a.bounds(), b.bounds());
    let bounds_hit = if merge_adjacent {
        bounds_a.touches(&bounds_b)
    } else {
        bounds_a.overlaps(&bounds_b)
    };
    if !bounds_hit {
        return OverlapType::NotOverlapping;
    }

    if has_edge_crossing(a, b) {
        return OverlapType::Overlapping;
    }

    let b_in_a = placement(b, a);
    let a_in_b = placement(a, b);
    match (b_in_a, a_in_b) {
        (Placement::Straddling, _) | (_, Placement::Straddling) => OverlapType::Overlapping,
        (Placement::Inside | Placement::OnBoundary, _) => OverlapType::FullyContainedIn1,
        (_, Placement::Inside | Placement::OnBoundary) => OverlapType::FullyContainedIn2,
        _ if merge_adjacent && shares_boundary_segment(a, b) => OverlapType::Adjacent,
        _ => OverlapType::NotOverlapping,
    }
}

/// True if any outer edge of `a` properly crosses an outer edge of `b`.
pub fn has_edge_crossing(a: &Polygon, b: &Polygon) -> bool {
    a.outer_segments().any(|(p1, p2)| {
        b.outer_segments()
            .any(|(p3, p4)| segment_intersect(p1, p2, p3, p4).is_some())
    })
}

fn on_boundary(p: DVec2, polygon: &Polygon) -> bool {
    polygon
        .boundary_segments()
        .any(|(s, e)| point_on_segment(p, s, e))
}

/// Outer vertices followed by outer edge midpoints.
fn sample_points(polygon: &Polygon) -> impl Iterator<Item = DVec2> + '_ {
    polygon
        .outer_segments()
        .map(|(s, _)| s)
        .chain(polygon.outer_segments().map(|(s, e)| (s + e) * 0.5))
}

fn placement(polygon: &Polygon, container: &Polygon) -> Placement {
    let mut found: Option<bool> = None;
    for sample in sample_points(polygon).filter(|&p| !on_boundary(p, container)) {
        let inside = point_in_polygon_with_holes(sample, container);
        match found {
            None => found = Some(inside),
            Some(previous) if previous != inside => return Placement::Straddling,
            Some(_) => {}
        }
    }
    match found {
        None => Placement::OnBoundary,
        Some(true) => Placement::Inside,
        Some(false) => Placement::Outside,
    }
}

/// True if `a` and `b` share a stretch of boundary traversed in opposite
/// directions, as two neighbouring faces of a tiling do.
pub fn shares_boundary_segment(a: &Polygon, b: &Polygon) -> bool {
    a.outer_segments().any(|(a1, a2)| {
        b.outer_segments()
            .any(|(b1, b2)| opposite_overlap(a1, a2, b1, b2))
    })
}

fn opposite_overlap(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> bool {
    let da = a2 - a1;
    let len = da.length();
    if len < VERTEX_MERGE_EPSILON || da.dot(b2 - b1) >= 0.0 {
        return false;
    }
    let dir = da / len;
    let off_line = |p: DVec2| dir.perp_dot(p - a1).abs() >= VERTEX_MERGE_EPSILON;
    if off_line(b1) || off_line(b2) {
        return false;
    }
    let t1 = dir.dot(b1 - a1);
    let t2 = dir.dot(b2 - a1);
    let overlap = t1.max(t2).min(len) - t1.min(t2).max(0.0);
    overlap > VERTEX_MERGE_EPSILON
}
