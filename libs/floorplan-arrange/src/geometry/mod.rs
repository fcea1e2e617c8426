//! # Geometry Primitives
//!
//! Planar helpers shared by every stage of the arrangement pipeline.
//!
//! All vertices live on the horizontal X/Z plane (`y == 0`). Planar math is
//! done on `DVec2(x, z)`; [`to_plane`] and [`lift`] convert between the two.
//!
//! ## Tolerances
//!
//! - Vertex identity: [`points_coincide`] / [`PointWelder`] with
//!   `VERTEX_MERGE_EPSILON`
//! - Parallel segments: determinant below `PARALLEL_EPSILON` (scaled by the
//!   segment lengths) never intersect
//! - Endpoint touches: [`segment_intersect`] never reports a crossing within
//!   `VERTEX_MERGE_EPSILON` of any of the four endpoints

mod welder;


pub use welder::PointWelder;

use crate::polygon::Polygon;
use config::constants::{PARALLEL_EPSILON, RAY_CAST_MARGIN, VERTEX_MERGE_EPSILON};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

// =============================================================================
// PLANE CONVERSION
// =============================================================================

/// Projects a world-space vertex onto the X/Z plane.
#[inline]
pub fn to_plane(v: DVec3) -> DVec2 {
    DVec2::new(v.x, v.z)
}

/// Lifts a plane point back to world space with `y == 0`.
#[inline]
pub fn lift(p: DVec2) -> DVec3 {
    DVec3::new(p.x, 0.0, p.y)
}

/// Checks whether two plane points are the same vertex.
///
/// # Example
///
/// ```rust
/// use floorplan_arrange::geometry::points_coincide;
/// use glam::DVec2;
///
/// assert!(points_coincide(DVec2::new(1.0, 1.0), DVec2::new(1.0 + 1e-9, 1.0)));
/// assert!(!points_coincide(DVec2::new(1.0, 1.0), DVec2::new(1.1, 1.0)));
/// ```
#[inline]
pub fn points_coincide(a: DVec2, b: DVec2) -> bool {
    a.distance_squared(b) < VERTEX_MERGE_EPSILON * VERTEX_MERGE_EPSILON
}

// =============================================================================
// BOUNDS
// =============================================================================

/// Axis-aligned bounding rectangle on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner (x, z)
    pub min: DVec2,
    /// Maximum corner (x, z)
    pub max: DVec2,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    /// Creates bounds from two corners.
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Bounds containing nothing. Any union with it yields the other operand.
    pub fn empty() -> Self {
        Self {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }

    /// Returns true if no point was ever added.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Grows the bounds to include `p`.
    pub fn include(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Strict overlap test. Rectangles that only share a border do not overlap.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Overlap test that also accepts rectangles sharing a border.
    pub fn touches(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x + VERTEX_MERGE_EPSILON
            && self.max.x >= other.min.x - VERTEX_MERGE_EPSILON
            && self.min.y <= other.max.y + VERTEX_MERGE_EPSILON
            && self.max.y >= other.min.y - VERTEX_MERGE_EPSILON
    }

    /// Inclusive point test with vertex tolerance.
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x - VERTEX_MERGE_EPSILON
            && p.x <= self.max.x + VERTEX_MERGE_EPSILON
            && p.y >= self.min.y - VERTEX_MERGE_EPSILON
            && p.y <= self.max.y + VERTEX_MERGE_EPSILON
    }

    /// Length of the diagonal, `0.0` for empty bounds.
    pub fn diagonal(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            (self.max - self.min).length()
        }
    }

    /// Smallest bounds containing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.x - self.min.x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.y - self.min.y
        }
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// Computes the bounds of a point list.
pub fn compute_bounds(points: &[DVec2]) -> Bounds {
    let mut bounds = Bounds::empty();
    for &p in points {
        bounds.include(p);
    }
    bounds
}

// =============================================================================
// SEGMENTS
// =============================================================================

/// Raw parametric intersection of the lines through `p1p2` and `p3p4`.
///
/// Returns `(t1, t2, point)` with `point = p1 + t1 * (p2 - p1)`
/// `= p3 + t2 * (p4 - p3)`. Parameters are not clamped, so callers can
/// classify touches themselves. Parallel lines and non-finite results
/// yield `None`.
pub fn segment_params(p1: DVec2, p2: DVec2, p3: DVec2, p4: DVec2) -> Option<(f64, f64, DVec2)> {
    let d12 = p2 - p1;
    let d34 = p4 - p3;
    let denom = d12.perp_dot(d34);

    // Scale-aware: the determinant grows with both segment lengths.
    if denom.abs() <= PARALLEL_EPSILON * d12.length() * d34.length() || denom == 0.0 {
        return None;
    }

    let d13 = p3 - p1;
    let t1 = d13.perp_dot(d34) / denom;
    let t2 = d13.perp_dot(d12) / denom;
    if !t1.is_finite() || !t2.is_finite() {
        return None;
    }

    Some((t1, t2, p1 + d12 * t1))
}

/// Proper crossing point of segments `p1p2` and `p3p4`.
///
/// Returns `None` for parallel or collinear segments, for parameters outside
/// `[0, 1]`, and for endpoint-only touches: a point within vertex tolerance of
/// any of the four endpoints is not a crossing.
///
/// # Example
///
/// ```rust
/// use floorplan_arrange::geometry::segment_intersect;
/// use glam::DVec2;
///
/// let hit = segment_intersect(
///     DVec2::new(0.0, 0.0),
///     DVec2::new(2.0, 2.0),
///     DVec2::new(0.0, 2.0),
///     DVec2::new(2.0, 0.0),
/// );
/// assert_eq!(hit, Some(DVec2::new(1.0, 1.0)));
///
/// // Shared endpoint only
/// let touch = segment_intersect(
///     DVec2::new(0.0, 0.0),
///     DVec2::new(1.0, 0.0),
///     DVec2::new(1.0, 0.0),
///     DVec2::new(1.0, 1.0),
/// );
/// assert_eq!(touch, None);
/// ```
pub fn segment_intersect(p1: DVec2, p2: DVec2, p3: DVec2, p4: DVec2) -> Option<DVec2> {
    let (t1, t2, point) = segment_params(p1, p2, p3, p4)?;
    if !(0.0..=1.0).contains(&t1) || !(0.0..=1.0).contains(&t2) {
        return None;
    }
    if [p1, p2, p3, p4].iter().any(|&end| points_coincide(point, end)) {
        return None;
    }
    Some(point)
}

/// Distance from `p` to the segment `ab`.
pub fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Checks whether `p` lies on segment `ab` within vertex tolerance.
#[inline]
pub fn point_on_segment(p: DVec2, a: DVec2, b: DVec2) -> bool {
    distance_to_segment(p, a, b) < VERTEX_MERGE_EPSILON
}

/// Outward normal of an edge of a counter-clockwise loop.
///
/// The interior is on the left of `p1 -> p2`, so the outward normal is the
/// right-hand perpendicular. Zero-length edges give `DVec2::ZERO`.
pub fn edge_normal(p1: DVec2, p2: DVec2) -> DVec2 {
    let d = p2 - p1;
    DVec2::new(d.y, -d.x).normalize_or_zero()
}

/// Clockwise angle from `u` to `v` in `[0, 2π)`.
///
/// # Example
///
/// ```rust
/// use floorplan_arrange::geometry::cw_angle_between;
/// use glam::DVec2;
/// use std::f64::consts::FRAC_PI_2;
///
/// let angle = cw_angle_between(DVec2::new(0.0, 1.0), DVec2::new(1.0, 0.0));
/// assert!((angle - FRAC_PI_2).abs() < 1e-12);
/// ```
pub fn cw_angle_between(u: DVec2, v: DVec2) -> f64 {
    let angle = (u.y.atan2(u.x) - v.y.atan2(v.x)).rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if angle >= TAU {
        0.0
    } else {
        angle
    }
}

/// Signed shoelace area. Positive for counter-clockwise loops.
pub fn signed_area(points: &[DVec2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.perp_dot(b);
    }
    sum * 0.5
}

/// Checks whether `b` lies on the straight continuation from `a` to `c`.
///
/// Spikes that double back (`a -> b -> a`) are not collinear in this sense.
pub fn is_collinear(a: DVec2, b: DVec2, c: DVec2) -> bool {
    let ab = b - a;
    let bc = c - b;
    if ab.length_squared() == 0.0 || bc.length_squared() == 0.0 {
        return true;
    }
    let ac = c - a;
    let ac_len = ac.length();
    if ac_len == 0.0 {
        return false;
    }
    let offset = ab.perp_dot(ac).abs() / ac_len;
    offset < VERTEX_MERGE_EPSILON && ab.dot(bc) > 0.0
}

// =============================================================================
// CONTAINMENT
// =============================================================================

/// Counts crossings of the horizontal ray from `p` to `ray_end_x` with the
/// given segments, using the half-open rule so a vertex on the ray is
/// counted once.
fn ray_crossings<I>(p: DVec2, ray_end_x: f64, segments: I) -> usize
where
    I: IntoIterator<Item = (DVec2, DVec2)>,
{
    let mut crossings = 0;
    for (a, b) in segments {
        if (a.y > p.y) == (b.y > p.y) {
            continue;
        }
        let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
        if x > p.x && x <= ray_end_x {
            crossings += 1;
        }
    }
    crossings
}

fn loop_segments(points: &[DVec2]) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
    let n = points.len();
    (0..n).map(move |i| (points[i], points[(i + 1) % n]))
}

/// Even-odd containment test against a closed point loop.
///
/// Results for points exactly on the boundary are unspecified.
pub fn point_in_loop(p: DVec2, points: &[DVec2]) -> bool {
    if points.len() < 3 {
        return false;
    }
    let bounds = compute_bounds(points);
    if !bounds.contains(p) {
        return false;
    }
    ray_crossings(p, bounds.max.x + RAY_CAST_MARGIN, loop_segments(points)) % 2 == 1
}

/// Containment test against a polygon's outer loop. Holes are ignored.
pub fn point_in_polygon(p: DVec2, polygon: &Polygon) -> bool {
    let bounds = polygon.bounds();
    if !bounds.contains(p) {
        return false;
    }
    ray_crossings(p, bounds.max.x + RAY_CAST_MARGIN, polygon.outer_segments()) % 2 == 1
}

/// Containment test that treats hole interiors as outside.
pub fn point_in_polygon_with_holes(p: DVec2, polygon: &Polygon) -> bool {
    if !point_in_polygon(p, polygon) {
        return false;
    }
    let ray_end_x = polygon.bounds().max.x + RAY_CAST_MARGIN;
    (0..polygon.hole_count())
        .all(|hole| ray_crossings(p, ray_end_x, polygon.hole_segments(hole)) % 2 == 0)
}
