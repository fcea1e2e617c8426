//! # Earcut Triangulation
//!
//! Wraps `earcutr`, which bridges holes into the outer ring and clips ears
//! from the result.

use super::{Triangulation, Triangulator};
use crate::geometry::{lift, signed_area};
use config::constants::approx_zero;
use earcutr::earcut;
use glam::DVec2;

/// Default [`Triangulator`], backed by `earcutr`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarcutTriangulator;

impl Triangulator for EarcutTriangulator {
    fn triangulate(&self, outer: &[DVec2], holes: &[Vec<DVec2>]) -> Triangulation {
        let mut points: Vec<DVec2> = outer.to_vec();
        let mut hole_starts = Vec::with_capacity(holes.len());
        for hole in holes {
            if hole.len() < 3 {
                log::debug!("skipping hole with {} points", hole.len());
                continue;
            }
            hole_starts.push(points.len());
            points.extend_from_slice(hole);
        }

        let mut triangulation = Triangulation {
            vertices: outer
                .iter()
                .chain(holes.iter().flatten())
                .copied()
                .map(lift)
                .collect(),
            triangles: Vec::new(),
        };
        if outer.len() < 3 || points.iter().any(|p| !p.is_finite()) {
            return triangulation;
        }

        let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
        let indices = match earcut(&coords, &hole_starts, 2) {
            Ok(indices) => indices,
            Err(err) => {
                log::warn!("earcut failed on {} points: {err:?}", points.len());
                return triangulation;
            }
        };

        // Skipped holes shift the flattened indices; map them back to the
        // input numbering used by `vertices`.
        let output_index = output_indices(outer.len(), holes);
        for tri in indices.chunks_exact(3) {
            let corners = [points[tri[0]], points[tri[1]], points[tri[2]]];
            let area = signed_area(&corners);
            if approx_zero(area) {
                continue;
            }
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| output_index[i]);
            if area > 0.0 {
                triangulation.triangles.push([a, b, c]);
            } else {
                triangulation.triangles.push([a, c, b]);
            }
        }
        triangulation
    }
}

/// Output vertex index of every flattened point.
fn output_indices(outer_len: usize, holes: &[Vec<DVec2>]) -> Vec<u32> {
    let mut indices: Vec<u32> = (0..outer_len as u32).collect();
    let mut offset = outer_len as u32;
    for hole in holes {
        if hole.len() >= 3 {
            indices.extend(offset..offset + hole.len() as u32);
        }
        offset += hole.len() as u32;
    }
    indices
}
