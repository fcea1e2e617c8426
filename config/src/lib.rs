//! # Config Crate
//!
//! Centralized configuration constants for the floor-plan arrangement engine.
//! All tolerances and iteration caps are defined here so the overlap
//! resolver, gap filler and triangulator agree on what "the same point"
//! means and when to give up.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{EPSILON, VERTEX_MERGE_EPSILON, MAX_RESOLVE_PASSES};
//!
//! // Use EPSILON for floating-point comparisons
//! let value: f64 = 0.00000000001; // 1e-11, smaller than EPSILON (1e-10)
//! assert!(value.abs() < EPSILON);
//!
//! // Vertex identity is looser than raw float comparison
//! assert!(VERTEX_MERGE_EPSILON > EPSILON);
//! assert!(MAX_RESOLVE_PASSES > 0);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Bounded Loops**: Every iterative algorithm has a cap defined here
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;
