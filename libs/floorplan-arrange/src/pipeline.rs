//! # Arrangement Pipeline
//!
//! Wires the stages together:
//!
//! ```text
//! MeshInput[] → extract → PolygonSet → resolve → fill → triangulate → Mesh[]
//! ```
//!
//! Every stage is also callable on its own.

use crate::error::{ArrangeResult, ArrangeWarning};
use crate::gap::{GapFillResult, GapFiller};
use crate::mesh::Mesh;
use crate::overlap::{OverlapResolver, ResolveReport};
use crate::polygon::{Polygon, PolygonSet};
use crate::triangulate::{EarcutTriangulator, TriangulationAdapter, Triangulator};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A triangle mesh handed in by a mesh source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshInput {
    pub vertices: Vec<DVec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl MeshInput {
    pub fn new(vertices: Vec<DVec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Copies the buffers of an existing mesh.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self::new(mesh.vertices().to_vec(), mesh.triangles().to_vec())
    }
}

/// Everything a [`Pipeline::run`] produced.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// Polygons after overlap resolution
    pub resolved: PolygonSet,
    pub gaps: GapFillResult,
    /// One mesh per resolved polygon, same order
    pub resolved_meshes: Vec<Mesh>,
    /// One mesh per gap polygon, same order
    pub gap_meshes: Vec<Mesh>,
    /// Inputs that had no boundary
    pub skipped_inputs: usize,
    pub warnings: Vec<ArrangeWarning>,
}

/// The full arrangement pass.
#[derive(Debug, Clone, Default)]
pub struct Pipeline<T = EarcutTriangulator> {
    pub resolver: OverlapResolver,
    pub gap_filler: GapFiller,
    pub adapter: TriangulationAdapter<T>,
}

impl<T: Triangulator> Pipeline<T> {
    pub fn new(
        resolver: OverlapResolver,
        gap_filler: GapFiller,
        adapter: TriangulationAdapter<T>,
    ) -> Self {
        Self {
            resolver,
            gap_filler,
            adapter,
        }
    }

    /// Extracts one polygon per input mesh. Returns the polygons and the
    /// number of inputs skipped for having no boundary.
    pub fn extract(&self, inputs: &[MeshInput]) -> (PolygonSet, usize) {
        let mut set = PolygonSet::new();
        let mut skipped = 0;
        for (index, input) in inputs.iter().enumerate() {
            match Polygon::from_mesh(&input.vertices, &input.triangles) {
                Some(polygon) => set.push(polygon),
                None => {
                    log::debug!("mesh input {index} has no boundary, skipping");
                    skipped += 1;
                }
            }
        }
        (set, skipped)
    }

    /// Resolves overlaps, returning a new set.
    pub fn resolve(&self, set: &PolygonSet) -> ArrangeResult<(PolygonSet, ResolveReport)> {
        let mut resolved = set.clone();
        let report = self.resolver.resolve(&mut resolved)?;
        Ok((resolved, report))
    }

    pub fn fill(&self, set: &PolygonSet) -> ArrangeResult<GapFillResult> {
        self.gap_filler.fill(set)
    }

    pub fn triangulate(&self, set: &PolygonSet) -> Vec<Mesh> {
        self.adapter.to_meshes(set)
    }

    /// Runs every stage in order.
    pub fn run(&self, inputs: &[MeshInput]) -> ArrangeResult<PipelineOutput> {
        let (extracted, skipped_inputs) = self.extract(inputs);
        let (resolved, report) = self.resolve(&extracted)?;
        log::debug!(
            "resolved {} polygons into {} ({} merged, {} removed)",
            extracted.len(),
            resolved.len(),
            report.merged,
            report.removed
        );

        let gaps = self.fill(&resolved)?;
        let resolved_meshes = self.triangulate(&resolved);
        let gap_meshes = self.triangulate(&gaps.polygons());

        let mut warnings = report.warnings;
        warnings.extend(gaps.warnings.iter().cloned());

        Ok(PipelineOutput {
            resolved,
            gaps,
            resolved_meshes,
            gap_meshes,
            skipped_inputs,
            warnings,
        })
    }
}
