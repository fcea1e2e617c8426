//! # Tests for Polygon Drafting

use super::*;
use approx::assert_relative_eq;

fn p(x: f64, z: f64) -> DVec3 {
    DVec3::new(x, 0.0, z)
}

fn draft_of(points: &[(f64, f64)]) -> PolygonDraft {
    let mut draft = PolygonDraft::new();
    for &(x, z) in points {
        draft.add_vertex(p(x, z)).unwrap();
    }
    draft
}

fn host() -> Polygon {
    Polygon::from_loop(vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)]).unwrap()
}

// =============================================================================
// STANDALONE DRAFT TESTS
// =============================================================================

#[test]
fn test_add_vertex_reports_count() {
    let mut draft = PolygonDraft::new();
    assert_eq!(draft.add_vertex(p(0.0, 0.0)), Ok(DraftStatus::Added(1)));
    assert_eq!(draft.add_vertex(p(1.0, 0.0)), Ok(DraftStatus::Added(2)));
    assert_eq!(draft.len(), 2);
    assert!(!draft.is_hole());
}

#[test]
fn test_close_on_first_vertex() {
    let mut draft = draft_of(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
    assert_eq!(draft.add_vertex(p(0.0, 0.0)), Ok(DraftStatus::Closed));
    assert!(draft.is_closed());

    let polygon = draft.finish().unwrap();
    assert_eq!(polygon.outer_edges().len(), 4);
    assert_relative_eq!(polygon.area(), 4.0);
}

#[test]
fn test_closed_draft_rejects_points() {
    let mut draft = draft_of(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
    assert_eq!(draft.add_vertex(p(5.0, 5.0)), Err(DraftError::AlreadyClosed));
}

#[test]
fn test_duplicate_vertex_rejected() {
    let mut draft = draft_of(&[(0.0, 0.0), (1.0, 0.0)]);
    assert_eq!(draft.add_vertex(p(1.0, 0.0)), Err(DraftError::Duplicate));
    assert_eq!(draft.len(), 2);
}

#[test]
fn test_close_needs_three_vertices() {
    let mut draft = draft_of(&[(0.0, 0.0), (1.0, 0.0)]);
    assert_eq!(
        draft.add_vertex(p(0.0, 0.0)),
        Err(DraftError::TooFewVertices { count: 2 })
    );
    assert!(!draft.can_finish());
    assert!(draft.finish().is_none());
}

#[test]
fn test_self_crossing_segment_rejected() {
    let mut draft = draft_of(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0)]);
    assert!(!draft.segment_preview_valid(p(0.0, 2.0)));
    assert_eq!(draft.add_vertex(p(0.0, 2.0)), Err(DraftError::Crossing));
    assert_eq!(draft.len(), 3);

    assert!(draft.segment_preview_valid(p(3.0, -1.0)));
}

#[test]
fn test_crossing_closing_segment_rejected() {
    // Spiral whose closing edge would cut through (1,1)-(3,1)
    let mut draft = draft_of(&[
        (0.0, 0.0),
        (4.0, 0.0),
        (4.0, 4.0),
        (1.0, 4.0),
        (1.0, 1.0),
        (3.0, 1.0),
        (3.0, 2.0),
    ]);
    assert_eq!(draft.add_vertex(p(0.0, 0.0)), Err(DraftError::Crossing));
    assert!(!draft.is_closed());
    assert!(draft.finish().is_none());
}

#[test]
fn test_finish_open_draft() {
    let draft = draft_of(&[(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)]);
    assert!(draft.can_finish());
    let polygon = draft.finish().unwrap();
    assert_relative_eq!(polygon.area(), 2.0);
}

#[test]
fn test_reset_clears_draft() {
    let mut draft = draft_of(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
    draft.reset();
    assert!(draft.is_empty());
    assert!(!draft.is_closed());
    assert!(draft.segment_preview_valid(p(1.0, 1.0)));
}

#[test]
fn test_vertices_lifted() {
    let draft = draft_of(&[(1.0, 2.0)]);
    assert_eq!(draft.vertices(), vec![p(1.0, 2.0)]);
}

// =============================================================================
// HOLE DRAFT TESTS
// =============================================================================

#[test]
fn test_hole_must_start_inside_host() {
    let err = PolygonDraft::hole_in(&host(), p(5.0, 5.0)).unwrap_err();
    assert_eq!(err, DraftError::OutsideHost);
}

#[test]
fn test_hole_draft_adds_hole() {
    let mut draft = PolygonDraft::hole_in(&host(), p(1.0, 1.0)).unwrap();
    assert!(draft.is_hole());
    for &(x, z) in &[(3.0, 1.0), (3.0, 3.0), (1.0, 3.0)] {
        draft.add_vertex(p(x, z)).unwrap();
    }
    assert_eq!(draft.add_vertex(p(1.0, 1.0)), Ok(DraftStatus::Closed));

    let polygon = draft.finish().unwrap();
    assert_eq!(polygon.hole_count(), 1);
    assert_relative_eq!(polygon.area(), 12.0);
}

#[test]
fn test_hole_segment_cannot_cross_host_boundary() {
    let mut draft = PolygonDraft::hole_in(&host(), p(1.0, 1.0)).unwrap();
    assert!(!draft.segment_preview_valid(p(5.0, 1.0)));
    assert_eq!(draft.add_vertex(p(5.0, 1.0)), Err(DraftError::Crossing));
}

#[test]
fn test_hole_cannot_start_in_existing_hole() {
    let holed = host()
        .with_added_hole(vec![p(1.0, 1.0), p(3.0, 1.0), p(3.0, 3.0), p(1.0, 3.0)])
        .unwrap();
    let err = PolygonDraft::hole_in(&holed, p(2.0, 2.0)).unwrap_err();
    assert_eq!(err, DraftError::OutsideHost);
}

#[test]
fn test_draft_error_messages() {
    assert_eq!(
        DraftError::TooFewVertices { count: 2 }.to_string(),
        "outline needs at least 3 vertices, has 2"
    );
    assert_eq!(DraftError::Crossing.to_string(), "segment crosses an existing edge");
}
