//! # Tests for Overlap Resolution

use super::merge::simplify_loop;
use super::*;
use crate::geometry::signed_area;
use approx::assert_relative_eq;
use glam::DVec3;

fn polygon(points: &[(f64, f64)]) -> Polygon {
    Polygon::from_loop(points.iter().map(|&(x, z)| DVec3::new(x, 0.0, z)).collect()).unwrap()
}

fn rect(x0: f64, z0: f64, x1: f64, z1: f64) -> Polygon {
    polygon(&[(x0, z0), (x1, z0), (x1, z1), (x0, z1)])
}

fn u_shape() -> Polygon {
    polygon(&[
        (0.0, 0.0),
        (3.0, 0.0),
        (3.0, 3.0),
        (2.0, 3.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 3.0),
        (0.0, 3.0),
    ])
}

fn l_shape() -> Polygon {
    polygon(&[
        (0.0, 0.0),
        (2.0, 0.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 2.0),
        (0.0, 2.0),
    ])
}

// =============================================================================
// CLASSIFICATION TESTS
// =============================================================================

#[test]
fn test_classify_disjoint() {
    let a = rect(0.0, 0.0, 1.0, 1.0);
    let b = rect(5.0, 5.0, 6.0, 6.0);
    assert_eq!(classify(&a, &b, false), OverlapType::NotOverlapping);
    assert_eq!(classify(&a, &b, true), OverlapType::NotOverlapping);
}

#[test]
fn test_classify_overlapping_squares() {
    let a = rect(0.0, 0.0, 2.0, 2.0);
    let b = rect(1.0, 1.0, 3.0, 3.0);
    assert_eq!(classify(&a, &b, false), OverlapType::Overlapping);
    assert!(has_edge_crossing(&a, &b));
}

#[test]
fn test_classify_containment_both_orders() {
    let big = rect(0.0, 0.0, 4.0, 4.0);
    let small = rect(1.0, 1.0, 2.0, 2.0);
    assert_eq!(classify(&big, &small, false), OverlapType::FullyContainedIn1);
    assert_eq!(classify(&small, &big, false), OverlapType::FullyContainedIn2);
}

#[test]
fn test_classify_contained_touching_border() {
    let big = rect(0.0, 0.0, 4.0, 4.0);
    let inner = rect(0.0, 0.0, 2.0, 2.0);
    assert_eq!(classify(&big, &inner, false), OverlapType::FullyContainedIn1);
}

#[test]
fn test_classify_identical_is_contained() {
    let a = rect(0.0, 0.0, 2.0, 2.0);
    let b = rect(0.0, 0.0, 2.0, 2.0);
    assert_eq!(classify(&a, &b, false), OverlapType::FullyContainedIn1);
}

#[test]
fn test_classify_overlap_without_proper_crossing() {
    // Two corners on the square, the diagonal runs through its interior
    let square = rect(0.0, 0.0, 2.0, 2.0);
    let triangle = polygon(&[(0.0, 0.0), (2.0, 2.0), (-1.0, 3.0)]);
    assert!(!has_edge_crossing(&square, &triangle));
    assert_eq!(classify(&square, &triangle, false), OverlapType::Overlapping);
}

#[test]
fn test_classify_polygon_inside_hole_is_disjoint() {
    let holed = Polygon::with_holes(
        rect(0.0, 0.0, 6.0, 6.0).outer_loop(),
        vec![rect(2.0, 2.0, 4.0, 4.0).outer_loop()],
    )
    .unwrap();
    let island = rect(2.5, 2.5, 3.5, 3.5);
    assert_eq!(classify(&holed, &island, false), OverlapType::NotOverlapping);
}

#[test]
fn test_classify_adjacent_requires_flag() {
    let a = rect(0.0, 0.0, 1.0, 1.0);
    let b = rect(1.0, 0.0, 2.0, 1.0);
    assert_eq!(classify(&a, &b, false), OverlapType::NotOverlapping);
    assert_eq!(classify(&a, &b, true), OverlapType::Adjacent);
}

#[test]
fn test_classify_l_shape_and_notch_square() {
    let l = l_shape();
    let notch = rect(1.0, 1.0, 2.0, 2.0);
    assert_eq!(classify(&l, &notch, false), OverlapType::NotOverlapping);
    assert_eq!(classify(&l, &notch, true), OverlapType::Adjacent);
}

#[test]
fn test_corner_touch_is_not_adjacent() {
    let a = rect(0.0, 0.0, 1.0, 1.0);
    let b = rect(1.0, 1.0, 2.0, 2.0);
    assert!(!shares_boundary_segment(&a, &b));
    assert_eq!(classify(&a, &b, true), OverlapType::NotOverlapping);
}

// =============================================================================
// INTERSECTION TESTS
// =============================================================================

#[test]
fn test_find_edge_intersections() {
    let a = rect(0.0, 0.0, 2.0, 2.0);
    let b = rect(1.0, 1.0, 3.0, 3.0);
    let hits = find_edge_intersections(&a, &b);

    assert_eq!(hits.len(), 2);
    assert_eq!((hits[0].edge_a, hits[0].edge_b), (1, 0));
    assert_relative_eq!(hits[0].point.x, 2.0);
    assert_relative_eq!(hits[0].point.y, 1.0);
    assert_eq!((hits[1].edge_a, hits[1].edge_b), (2, 3));
}

#[test]
fn test_find_shared_vertices_t_touch() {
    let a = rect(0.0, 0.0, 2.0, 2.0);
    let b = rect(2.0, 0.5, 3.0, 1.5);
    let touches = find_shared_vertices(&a, &b);

    assert_eq!(touches.len(), 2);
    assert!(touches.iter().all(|t| t.side == Side::First && t.edge == 1));
}

// =============================================================================
// MERGE TESTS
// =============================================================================

#[test]
fn test_merge_overlapping_squares() {
    let a = rect(0.0, 0.0, 2.0, 2.0);
    let b = rect(1.0, 1.0, 3.0, 3.0);
    let outcome = merge_pair(&a, &b, HOLE_WALK_ATTEMPTS).unwrap();

    assert_eq!(outcome.polygon.outer_edges().len(), 8);
    assert_eq!(outcome.polygon.hole_count(), 0);
    assert_relative_eq!(outcome.polygon.area(), 7.0, epsilon = 1e-9);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_merge_u_shape_with_bar_encloses_hole() {
    let bar = rect(-1.0, 2.0, 4.0, 2.5);
    let outcome = merge_pair(&u_shape(), &bar, HOLE_WALK_ATTEMPTS).unwrap();
    let merged = outcome.polygon;

    assert_eq!(merged.hole_count(), 1);
    assert_relative_eq!(signed_area(&merged.holes_2d()[0]), -1.0, epsilon = 1e-9);
    assert_relative_eq!(merged.area(), 8.5, epsilon = 1e-9);
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_merge_adjacent_squares_drops_shared_edge() {
    let a = rect(0.0, 0.0, 1.0, 1.0);
    let b = rect(1.0, 0.0, 2.0, 1.0);
    let merged = merge_pair(&a, &b, HOLE_WALK_ATTEMPTS).unwrap().polygon;

    assert_eq!(merged.outer_edges().len(), 4);
    assert_relative_eq!(merged.area(), 2.0, epsilon = 1e-9);
}

#[test]
fn test_merge_l_shape_fills_notch() {
    let merged = merge_pair(&l_shape(), &rect(1.0, 1.0, 2.0, 2.0), HOLE_WALK_ATTEMPTS)
        .unwrap()
        .polygon;
    assert_eq!(merged.outer_edges().len(), 4);
    assert_relative_eq!(merged.area(), 4.0, epsilon = 1e-9);
}

#[test]
fn test_merge_carries_existing_holes() {
    let holed = Polygon::with_holes(
        rect(0.0, 0.0, 4.0, 4.0).outer_loop(),
        vec![rect(1.0, 1.0, 2.0, 2.0).outer_loop()],
    )
    .unwrap();
    let merged = merge_pair(&holed, &rect(3.0, 3.0, 5.0, 5.0), HOLE_WALK_ATTEMPTS)
        .unwrap()
        .polygon;
    assert_eq!(merged.hole_count(), 1);
    assert_relative_eq!(merged.area(), 16.0 + 4.0 - 1.0 - 1.0, epsilon = 1e-9);
}

#[test]
fn test_simplify_loop_removes_straight_vertices() {
    let points = vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(2.0, 0.0),
        DVec2::new(2.0, 2.0),
        DVec2::new(0.0, 2.0),
        DVec2::new(0.0, 1.0),
    ];
    assert_eq!(simplify_loop(points).len(), 4);
}

// =============================================================================
// RESOLVER TESTS
// =============================================================================

#[test]
fn test_resolve_merges_overlapping() {
    let mut set = PolygonSet::from(vec![rect(0.0, 0.0, 2.0, 2.0), rect(1.0, 1.0, 3.0, 3.0)]);
    let report = OverlapResolver::default().resolve(&mut set).unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(report.merged, 1);
    assert_eq!(report.removed, 0);
    assert_eq!(set[0].outer_edges().len(), 8);
}

#[test]
fn test_resolve_removes_contained() {
    let mut set = PolygonSet::from(vec![rect(1.0, 1.0, 2.0, 2.0), rect(0.0, 0.0, 4.0, 4.0)]);
    let report = OverlapResolver::default().resolve(&mut set).unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(report.removed, 1);
    assert_relative_eq!(set[0].area(), 16.0);
}

#[test]
fn test_resolve_is_fixed_point() {
    let resolver = OverlapResolver::default();
    let mut set = PolygonSet::from(vec![
        rect(0.0, 0.0, 2.0, 2.0),
        rect(1.0, 1.0, 3.0, 3.0),
        rect(10.0, 0.0, 11.0, 1.0),
    ]);
    resolver.resolve(&mut set).unwrap();
    assert_eq!(set.len(), 2);

    let again = resolver.resolve(&mut set).unwrap();
    assert!(again.is_unchanged());
    assert_eq!(again.passes, 1);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_resolve_chain_of_overlaps() {
    let mut set = PolygonSet::from(vec![
        rect(0.0, 0.0, 2.0, 1.0),
        rect(1.5, 0.0, 3.5, 1.0),
        rect(3.0, 0.0, 5.0, 1.0),
    ]);
    let report = OverlapResolver::default().resolve(&mut set).unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(report.merged, 2);
    assert_relative_eq!(set[0].area(), 5.0, epsilon = 1e-9);
}

#[test]
fn test_resolve_keeps_adjacent_by_default() {
    let mut set = PolygonSet::from(vec![rect(0.0, 0.0, 1.0, 1.0), rect(1.0, 0.0, 2.0, 1.0)]);
    let report = OverlapResolver::default().resolve(&mut set).unwrap();
    assert!(report.is_unchanged());
    assert_eq!(set.len(), 2);
}

#[test]
fn test_resolve_merges_adjacent_when_enabled() {
    let resolver = OverlapResolver::new(ResolveOptions::default().with_merge_adjacent(true));
    let mut set = PolygonSet::from(vec![rect(0.0, 0.0, 1.0, 1.0), rect(1.0, 0.0, 2.0, 1.0)]);
    resolver.resolve(&mut set).unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set[0].outer_edges().len(), 4);
}

#[test]
fn test_resolve_iteration_limit_leaves_set_unchanged() {
    let resolver = OverlapResolver::new(ResolveOptions {
        max_passes: 1,
        ..ResolveOptions::default()
    });
    let mut set = PolygonSet::from(vec![rect(0.0, 0.0, 2.0, 2.0), rect(1.0, 1.0, 3.0, 3.0)]);
    let err = resolver.resolve(&mut set).unwrap_err();

    assert!(matches!(err, ArrangeError::IterationLimit { limit: 1, .. }));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_resolve_empty_set() {
    let mut set = PolygonSet::new();
    let report = OverlapResolver::default().resolve(&mut set).unwrap();
    assert!(report.is_unchanged());
}
