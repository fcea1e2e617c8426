//! # Tests for Triangulation

use super::*;
use crate::geometry::{signed_area, to_plane};
use approx::assert_relative_eq;

fn v(x: f64, y: f64) -> DVec2 {
    DVec2::new(x, y)
}

fn square_points(min: f64, max: f64) -> Vec<DVec2> {
    vec![v(min, min), v(max, min), v(max, max), v(min, max)]
}

fn lift_all(points: &[DVec2]) -> Vec<DVec3> {
    points.iter().map(|p| DVec3::new(p.x, 0.0, p.y)).collect()
}

fn polygon(outer: &[DVec2], holes: &[Vec<DVec2>]) -> Polygon {
    Polygon::with_holes(lift_all(outer), holes.iter().map(|h| lift_all(h)).collect()).unwrap()
}

/// Sum of signed triangle areas in (x, z).
fn triangulated_area(triangulation: &Triangulation) -> f64 {
    Mesh::from(triangulation.clone()).plane_area()
}

/// Fan from the first outer vertex; convex input only.
struct FanTriangulator;

impl Triangulator for FanTriangulator {
    fn triangulate(&self, outer: &[DVec2], _holes: &[Vec<DVec2>]) -> Triangulation {
        let vertices = outer.iter().map(|p| DVec3::new(p.x, 0.0, p.y)).collect();
        let triangles = (1..outer.len().saturating_sub(1))
            .map(|i| [0, i as u32, i as u32 + 1])
            .collect();
        Triangulation {
            vertices,
            triangles,
        }
    }
}

// =============================================================================
// EARCUT TESTS
// =============================================================================

#[test]
fn test_earcut_square() {
    let result = EarcutTriangulator.triangulate(&square_points(0.0, 1.0), &[]);
    assert_eq!(result.vertices.len(), 4);
    assert_eq!(result.triangles.len(), 2);
    assert_relative_eq!(triangulated_area(&result), 1.0, epsilon = 1e-12);
}

#[test]
fn test_earcut_clockwise_input_gives_ccw_triangles() {
    let mut points = square_points(0.0, 2.0);
    points.reverse();
    let result = EarcutTriangulator.triangulate(&points, &[]);
    assert_eq!(result.triangles.len(), 2);
    assert_relative_eq!(triangulated_area(&result), 4.0, epsilon = 1e-12);
}

#[test]
fn test_earcut_degenerate_input() {
    let result = EarcutTriangulator.triangulate(&[v(0.0, 0.0), v(1.0, 0.0)], &[]);
    assert!(result.triangles.is_empty());

    let collinear = EarcutTriangulator.triangulate(&[v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0)], &[]);
    assert!(collinear.triangles.is_empty());
}

#[test]
fn test_earcut_collinear_point_leaves_no_slivers() {
    let points = [v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0), v(2.0, 2.0), v(0.0, 2.0)];
    let result = EarcutTriangulator.triangulate(&points, &[]);
    assert_eq!(result.vertices.len(), 5);
    assert!(!result.triangles.is_empty());
    assert_relative_eq!(triangulated_area(&result), 4.0, epsilon = 1e-12);

    let mesh = Mesh::from(result);
    for triangle in mesh.triangles() {
        let corners: Vec<DVec2> = triangle
            .iter()
            .map(|&i| to_plane(mesh.vertices()[i as usize]))
            .collect();
        assert!(signed_area(&corners) > 0.0);
    }
}

#[test]
fn test_earcut_concave_l_shape() {
    let points = [
        v(0.0, 0.0),
        v(2.0, 0.0),
        v(2.0, 1.0),
        v(1.0, 1.0),
        v(1.0, 2.0),
        v(0.0, 2.0),
    ];
    let result = EarcutTriangulator.triangulate(&points, &[]);
    assert_eq!(result.triangles.len(), 4);
    assert_relative_eq!(triangulated_area(&result), 3.0, epsilon = 1e-12);
}

#[test]
fn test_earcut_square_with_hole() {
    let result =
        EarcutTriangulator.triangulate(&square_points(0.0, 10.0), &[square_points(3.0, 7.0)]);
    assert_eq!(result.vertices.len(), 8);
    assert_eq!(result.triangles.len(), 8);
    assert_relative_eq!(triangulated_area(&result), 84.0, epsilon = 1e-9);
}

#[test]
fn test_earcut_short_hole_keeps_input_numbering() {
    let short_hole = vec![v(1.0, 1.0), v(2.0, 2.0)];
    let result = EarcutTriangulator.triangulate(
        &square_points(0.0, 10.0),
        &[short_hole, square_points(3.0, 7.0)],
    );
    assert_eq!(result.vertices.len(), 10);
    assert_eq!(result.triangles.len(), 8);
    assert!(result.triangles.iter().flatten().all(|&i| i != 4 && i != 5));
    assert_relative_eq!(triangulated_area(&result), 84.0, epsilon = 1e-9);
}

#[test]
fn test_earcut_non_finite_input() {
    let points = [v(0.0, 0.0), v(f64::NAN, 0.0), v(1.0, 1.0)];
    let result = EarcutTriangulator.triangulate(&points, &[]);
    assert!(result.triangles.is_empty());
    assert_eq!(result.vertices.len(), 3);
}

#[test]
fn test_earcut_vertices_on_floor() {
    let result = EarcutTriangulator.triangulate(&square_points(0.0, 1.0), &[]);
    assert!(result.vertices.iter().all(|p| p.y == 0.0));
    assert_eq!(result.vertices[2], DVec3::new(1.0, 0.0, 1.0));
}

// =============================================================================
// ADAPTER TESTS
// =============================================================================

#[test]
fn test_adapter_area_matches_polygon() {
    let holed = polygon(&square_points(0.0, 10.0), &[square_points(3.0, 7.0)]);
    let adapter: TriangulationAdapter = TriangulationAdapter::default();
    let mesh = adapter.to_mesh(&holed);

    assert!(mesh.validate());
    assert_relative_eq!(mesh.plane_area(), holed.area(), epsilon = 1e-9);
}

#[test]
fn test_adapter_clockwise_front_face() {
    let square = polygon(&square_points(0.0, 2.0), &[]);
    let adapter =
        TriangulationAdapter::new(EarcutTriangulator).with_front_face(FrontFace::Clockwise);
    let mesh = adapter.to_mesh(&square);

    assert_eq!(adapter.front_face(), FrontFace::Clockwise);
    assert_eq!(mesh.triangle_count(), 2);
    assert_relative_eq!(mesh.plane_area(), -4.0, epsilon = 1e-12);
}

#[test]
fn test_adapter_to_meshes_keeps_order() {
    let set: PolygonSet = vec![
        polygon(&square_points(0.0, 1.0), &[]),
        polygon(&square_points(5.0, 7.0), &[]),
    ]
    .into_iter()
    .collect();
    let adapter: TriangulationAdapter = TriangulationAdapter::default();
    let meshes = adapter.to_meshes(&set);

    assert_eq!(meshes.len(), 2);
    assert_relative_eq!(meshes[0].plane_area(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(meshes[1].plane_area(), 4.0, epsilon = 1e-12);
}

#[test]
fn test_adapter_custom_triangulator() {
    let square = polygon(&square_points(0.0, 1.0), &[]);
    let mesh = TriangulationAdapter::new(FanTriangulator).to_mesh(&square);
    assert_eq!(mesh.triangles(), &[[0, 1, 2], [0, 2, 3]]);
}

#[test]
fn test_adapter_empty_triangulation_gives_empty_mesh() {
    struct Nothing;
    impl Triangulator for Nothing {
        fn triangulate(&self, _outer: &[DVec2], _holes: &[Vec<DVec2>]) -> Triangulation {
            Triangulation::default()
        }
    }

    let square = polygon(&square_points(0.0, 1.0), &[]);
    let mesh = TriangulationAdapter::new(Nothing).to_mesh(&square);
    assert!(mesh.is_empty());
    assert_eq!(mesh.vertex_count(), 0);
}

#[test]
fn test_adapter_discards_invalid_triangulation() {
    struct OutOfRange;
    impl Triangulator for OutOfRange {
        fn triangulate(&self, outer: &[DVec2], _holes: &[Vec<DVec2>]) -> Triangulation {
            Triangulation {
                vertices: outer.iter().map(|p| DVec3::new(p.x, 0.0, p.y)).collect(),
                triangles: vec![[0, 1, 9]],
            }
        }
    }

    let square = polygon(&square_points(0.0, 1.0), &[]);
    let mesh = TriangulationAdapter::new(OutOfRange).to_mesh(&square);
    assert!(mesh.is_empty());
}
