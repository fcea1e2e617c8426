//! # Polygon Drafting
//!
//! Validation for freehand polygon drawing. Points arrive one at a time
//! from an input collaborator; the draft rejects points that would make the
//! outline self-intersecting and closes when the first point is clicked
//! again.
//!
//! A draft can also be started inside an existing polygon, in which case the
//! finished outline becomes a new hole of that polygon.
//!
//! ## Example
//!
//! ```rust
//! use floorplan_arrange::{DraftStatus, PolygonDraft};
//! use glam::DVec3;
//!
//! let mut draft = PolygonDraft::new();
//! draft.add_vertex(DVec3::new(0.0, 0.0, 0.0)).unwrap();
//! draft.add_vertex(DVec3::new(2.0, 0.0, 0.0)).unwrap();
//! draft.add_vertex(DVec3::new(2.0, 0.0, 2.0)).unwrap();
//! let status = draft.add_vertex(DVec3::new(0.0, 0.0, 0.0)).unwrap();
//! assert_eq!(status, DraftStatus::Closed);
//!
//! let triangle = draft.finish().unwrap();
//! assert_eq!(triangle.outer_edges().len(), 3);
//! ```

#[cfg(test)]
mod tests;

use crate::geometry::{
    point_in_polygon_with_holes, points_coincide, segment_intersect, to_plane,
};
use crate::polygon::Polygon;
use glam::{DVec2, DVec3};
use thiserror::Error;

/// Outcome of a successful [`PolygonDraft::add_vertex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStatus {
    /// Point appended; carries the new vertex count
    Added(usize),
    /// The outline was closed on its first point
    Closed,
}

/// Reasons a draft rejects a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("hole must start inside the host polygon")]
    OutsideHost,

    #[error("segment crosses an existing edge")]
    Crossing,

    #[error("point repeats the previous vertex")]
    Duplicate,

    #[error("outline needs at least 3 vertices, has {count}")]
    TooFewVertices { count: usize },

    #[error("draft is already closed")]
    AlreadyClosed,
}

/// An outline being drawn.
#[derive(Debug, Clone, Default)]
pub struct PolygonDraft {
    points: Vec<DVec2>,
    /// Polygon receiving the outline as a hole
    host: Option<Polygon>,
    closed: bool,
}

impl PolygonDraft {
    /// Starts a standalone outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a hole outline inside `host` at `first`.
    pub fn hole_in(host: &Polygon, first: DVec3) -> Result<Self, DraftError> {
        let first = to_plane(first);
        if !point_in_polygon_with_holes(first, host) {
            return Err(DraftError::OutsideHost);
        }
        Ok(Self {
            points: vec![first],
            host: Some(host.clone()),
            closed: false,
        })
    }

    /// Drawn points, lifted to world space.
    pub fn vertices(&self) -> Vec<DVec3> {
        self.points.iter().map(|p| DVec3::new(p.x, 0.0, p.y)).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_hole(&self) -> bool {
        self.host.is_some()
    }

    /// Adds the next point of the outline.
    pub fn add_vertex(&mut self, p: DVec3) -> Result<DraftStatus, DraftError> {
        if self.closed {
            return Err(DraftError::AlreadyClosed);
        }
        let p = to_plane(p);
        let (Some(&first), Some(&last)) = (self.points.first(), self.points.last()) else {
            self.points.push(p);
            return Ok(DraftStatus::Added(1));
        };

        if points_coincide(p, last) {
            return Err(DraftError::Duplicate);
        }
        if points_coincide(p, first) {
            if self.points.len() < 3 {
                return Err(DraftError::TooFewVertices {
                    count: self.points.len(),
                });
            }
            if self.crosses(last, first) {
                return Err(DraftError::Crossing);
            }
            self.closed = true;
            return Ok(DraftStatus::Closed);
        }
        if self.crosses(last, p) {
            return Err(DraftError::Crossing);
        }

        self.points.push(p);
        Ok(DraftStatus::Added(self.points.len()))
    }

    /// Whether a segment from the last point to `p` would be accepted.
    ///
    /// Used for live preview colouring; does not modify the draft.
    pub fn segment_preview_valid(&self, p: DVec3) -> bool {
        match self.points.last() {
            Some(&last) => !self.crosses(last, to_plane(p)),
            None => true,
        }
    }

    /// True once the outline has enough points to form a polygon.
    pub fn can_finish(&self) -> bool {
        self.points.len() >= 3
    }

    /// Builds the polygon. For hole drafts this is the host with the new
    /// hole added. Returns `None` for fewer than 3 points, a self-crossing
    /// closing edge, or a degenerate outline.
    pub fn finish(&self) -> Option<Polygon> {
        if !self.can_finish() {
            return None;
        }
        let (first, last) = (self.points[0], self.points[self.points.len() - 1]);
        if !self.closed && self.crosses(last, first) {
            return None;
        }

        match &self.host {
            Some(host) => host.with_added_hole(self.vertices()),
            None => Polygon::from_loop(self.vertices()),
        }
    }

    /// Clears all points and any host.
    pub fn reset(&mut self) {
        self.points.clear();
        self.host = None;
        self.closed = false;
    }

    /// True if segment `from -> to` crosses a drawn edge or the host
    /// boundary. Shared endpoints do not count.
    fn crosses(&self, from: DVec2, to: DVec2) -> bool {
        let drawn = self.points.windows(2).map(|w| (w[0], w[1]));
        let crosses_drawn = drawn
            .into_iter()
            .any(|(a, b)| segment_intersect(from, to, a, b).is_some());
        let crosses_host = self.host.as_ref().is_some_and(|host| {
            host.boundary_segments()
                .any(|(a, b)| segment_intersect(from, to, a, b).is_some())
        });
        crosses_drawn || crosses_host
    }
}
