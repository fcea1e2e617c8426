//! # Arrangement Errors
//!
//! Error and warning types for the arrangement pipeline.
//!
//! Hard failures are [`ArrangeError`]s and leave the caller's polygon set
//! untouched. Soft problems that still produce a usable result are reported
//! as [`ArrangeWarning`]s alongside the result.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type ArrangeResult<T> = Result<T, ArrangeError>;

/// Errors that abort an arrangement pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArrangeError {
    /// Input that cannot form a polygon (fewer than 3 vertices, no boundary edges)
    #[error("Degenerate input: {message}")]
    DegenerateInput { message: String },

    /// The outer boundary walk of a merge did not close
    #[error("Unresolved merge loop: {message}")]
    UnresolvedMergeLoop { message: String },

    /// A fixed-point or fill loop reached its iteration cap
    #[error("Iteration limit reached in {stage}: {limit}")]
    IterationLimit { stage: &'static str, limit: usize },
}

impl ArrangeError {
    /// Creates a degenerate input error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateInput {
            message: message.into(),
        }
    }

    /// Creates an unresolved merge loop error.
    pub fn unresolved_merge(message: impl Into<String>) -> Self {
        Self::UnresolvedMergeLoop {
            message: message.into(),
        }
    }

    /// Creates an iteration limit error.
    pub fn iteration_limit(stage: &'static str, limit: usize) -> Self {
        Self::IterationLimit { stage, limit }
    }
}

/// Non-fatal conditions reported next to a successful result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrangeWarning {
    /// Hole extraction gave up before consuming every boundary edge.
    /// The merged polygon may be missing holes.
    #[error("hole extraction stopped after {attempts} attempts with {unused_edges} edges left")]
    UnresolvedMergeLoop { unused_edges: usize, attempts: usize },

    /// Gap edges for which no valid third point existed.
    #[error("{count} gap edges had no valid third point")]
    DroppedEdges { count: usize },

    /// Gap faces that did not bridge exactly two polygons.
    #[error("{count} gap faces did not bridge two polygons")]
    UnbridgedFaces { count: usize },
}
