//! # Configuration Constants
//!
//! Centralized constants for the floor-plan arrangement engine. All geometry
//! tolerances, iteration caps and angular limits are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Limits**: Iteration caps that guarantee termination
//! - **Gap Filling**: Candidate selection parameters
//! - **Probing**: Ray casting parameters for containment tests

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Epsilon for vertex identity.
///
/// Two plane points closer than this are the same vertex. Recomputed
/// intersection points and original vertices are compared with this
/// tolerance, never with exact equality.
///
/// # Example
///
/// ```rust
/// use config::constants::VERTEX_MERGE_EPSILON;
///
/// fn same_vertex(a: [f64; 2], b: [f64; 2]) -> bool {
///     let dx = a[0] - b[0];
///     let dy = a[1] - b[1];
///     (dx * dx + dy * dy).sqrt() < VERTEX_MERGE_EPSILON
/// }
///
/// assert!(same_vertex([1.0, 2.0], [1.0 + 1e-9, 2.0]));
/// assert!(!same_vertex([1.0, 2.0], [1.001, 2.0]));
/// ```
pub const VERTEX_MERGE_EPSILON: f64 = 1e-6;

/// Determinant threshold below which two segments are treated as parallel.
///
/// Parallel and collinear segments never report an intersection.
///
/// # Example
///
/// ```rust
/// use config::constants::PARALLEL_EPSILON;
///
/// let det: f64 = 0.0;
/// assert!(det.abs() <= PARALLEL_EPSILON);
/// ```
pub const PARALLEL_EPSILON: f64 = 1e-12;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of restarts of the overlap fixed-point loop.
///
/// Every restart consumes at least one polygon, so a well-formed input never
/// gets close to this limit.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_RESOLVE_PASSES;
///
/// let polygon_count = 250;
/// assert!(polygon_count < MAX_RESOLVE_PASSES);
/// ```
pub const MAX_RESOLVE_PASSES: usize = 10_000;

/// Number of hole-loop walks attempted per boundary merge.
///
/// When the budget runs out with unwalked edges left, the merge keeps the
/// holes it found and reports a warning.
///
/// # Example
///
/// ```rust
/// use config::constants::HOLE_WALK_ATTEMPTS;
///
/// assert!(HOLE_WALK_ATTEMPTS >= 2);
/// ```
pub const HOLE_WALK_ATTEMPTS: usize = 8;

/// Multiplier applied to the edge count to bound a single loop walk.
///
/// # Example
///
/// ```rust
/// use config::constants::{walk_step_limit, WALK_STEP_FACTOR};
///
/// assert!(walk_step_limit(10) >= 10 * WALK_STEP_FACTOR);
/// ```
pub const WALK_STEP_FACTOR: usize = 4;

/// Maximum number of gap-filling rounds.
///
/// The gap filler never re-adds an edge it has seen, so the loop terminates
/// on its own; this cap only protects against pathological input.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_GAP_FILL_ROUNDS;
///
/// assert!(MAX_GAP_FILL_ROUNDS >= 100);
/// ```
pub const MAX_GAP_FILL_ROUNDS: usize = 1_000;

// =============================================================================
// GAP FILLING CONSTANTS
// =============================================================================

/// Maximum angle in degrees between an edge's outward normal and the
/// direction to a candidate third point.
///
/// Candidates close to perpendicular to the normal would produce sliver
/// triangles and are rejected.
///
/// # Example
///
/// ```rust
/// use config::constants::GAP_MAX_NORMAL_ANGLE_DEGREES;
///
/// let dot: f64 = 0.5; // 60 degrees
/// assert!(dot.acos().to_degrees() < GAP_MAX_NORMAL_ANGLE_DEGREES);
/// ```
pub const GAP_MAX_NORMAL_ANGLE_DEGREES: f64 = 87.5;

// =============================================================================
// PROBING CONSTANTS
// =============================================================================

/// Distance past a polygon's bounds that containment rays extend.
///
/// # Example
///
/// ```rust
/// use config::constants::RAY_CAST_MARGIN;
///
/// let max_x = 10.0;
/// let ray_end = max_x + RAY_CAST_MARGIN;
/// assert!(ray_end > max_x);
/// ```
pub const RAY_CAST_MARGIN: f64 = 1.0;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Number of steps a single loop walk may take over `edge_count` edges.
///
/// # Example
///
/// ```rust
/// use config::constants::walk_step_limit;
///
/// assert!(walk_step_limit(0) > 0);
/// assert!(walk_step_limit(100) > 100);
/// ```
#[inline]
pub fn walk_step_limit(edge_count: usize) -> usize {
    edge_count.saturating_mul(WALK_STEP_FACTOR).saturating_add(16)
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
