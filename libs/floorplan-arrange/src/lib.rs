//! # Floor-Plan Arrangement
//!
//! 2D polygon arrangement for floor-plan authoring. Rooms are drawn as
//! polygons on the horizontal X/Z plane; this crate keeps them a valid
//! planar arrangement.
//!
//! ## Architecture
//!
//! ```text
//! triangle meshes → boundary → Polygon → overlap → gap → triangulate → Mesh
//! ```
//!
//! - **boundary**: outer and hole loops of a triangle mesh
//! - **overlap**: merges overlapping polygons into regions with holes
//! - **gap**: tessellates the space between polygons into gap polygons
//! - **triangulate**: earcut triangulation for rendering
//! - **draft**: validation for freehand polygon drawing
//!
//! ## Usage
//!
//! ```rust
//! use floorplan_arrange::{MeshInput, Pipeline};
//! use glam::DVec3;
//!
//! let quad = |x: f64| {
//!     MeshInput::new(
//!         vec![
//!             DVec3::new(x, 0.0, 0.0),
//!             DVec3::new(x + 1.0, 0.0, 0.0),
//!             DVec3::new(x + 1.0, 0.0, 1.0),
//!             DVec3::new(x, 0.0, 1.0),
//!         ],
//!         vec![[0, 1, 2], [0, 2, 3]],
//!     )
//! };
//!
//! let pipeline: Pipeline = Pipeline::default();
//! let output = pipeline.run(&[quad(0.0), quad(2.0)]).unwrap();
//! assert_eq!(output.resolved.len(), 2);
//! assert_eq!(output.gaps.gaps.len(), 1);
//! ```

pub mod boundary;
pub mod draft;
pub mod error;
pub mod gap;
pub mod geometry;
pub mod mesh;
pub mod overlap;
pub mod pipeline;
pub mod polygon;
pub mod triangulate;

pub use draft::{DraftError, DraftStatus, PolygonDraft};
pub use error::{ArrangeError, ArrangeResult, ArrangeWarning};
pub use gap::{GapFillOptions, GapFillResult, GapFiller, GapPolygon};
pub use geometry::{Bounds, PointWelder};
pub use mesh::Mesh;
pub use overlap::{OverlapResolver, OverlapType, ResolveOptions, ResolveReport};
pub use pipeline::{MeshInput, Pipeline, PipelineOutput};
pub use polygon::{EdgeRef, Polygon, PolygonSet};
pub use triangulate::{
    EarcutTriangulator, FrontFace, Triangulation, TriangulationAdapter, Triangulator,
};
