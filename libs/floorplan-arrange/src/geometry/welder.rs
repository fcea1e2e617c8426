//! # Point Welder
//!
//! Tolerance-based vertex identity using a spatial hash grid.
//!
//! Points are hashed into cells of size `tolerance`. A lookup searches the
//! 3×3 block of neighbouring cells, so any two points closer than the
//! tolerance are guaranteed to receive the same id regardless of where the
//! cell borders fall.

use config::constants::VERTEX_MERGE_EPSILON;
use glam::DVec2;
use std::collections::HashMap;

/// 2D cell coordinate for spatial hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i64,
    y: i64,
}

impl CellCoord {
    fn from_position(pos: DVec2, cell_size: f64) -> Self {
        Self {
            x: (pos.x / cell_size).floor() as i64,
            y: (pos.y / cell_size).floor() as i64,
        }
    }

    fn neighbours(self) -> impl Iterator<Item = CellCoord> {
        (-1..=1).flat_map(move |dx| {
            (-1..=1).map(move |dy| CellCoord {
                x: self.x + dx,
                y: self.y + dy,
            })
        })
    }
}

/// Assigns stable ids to plane points, merging points within tolerance.
///
/// The first point welded into an id stays its representative position.
///
/// # Example
///
/// ```rust
/// use floorplan_arrange::geometry::PointWelder;
/// use glam::DVec2;
///
/// let mut welder = PointWelder::new();
/// let a = welder.weld(DVec2::new(1.0, 2.0));
/// let b = welder.weld(DVec2::new(1.0 + 1e-9, 2.0));
/// let c = welder.weld(DVec2::new(3.0, 2.0));
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// assert_eq!(welder.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PointWelder {
    /// Hash grid: cell -> ids of points stored in it
    grid: HashMap<CellCoord, Vec<usize>>,
    /// Representative position per id
    points: Vec<DVec2>,
    tolerance: f64,
}

impl Default for PointWelder {
    fn default() -> Self {
        Self::new()
    }
}

impl PointWelder {
    /// Creates a welder using `VERTEX_MERGE_EPSILON`.
    pub fn new() -> Self {
        Self::with_tolerance(VERTEX_MERGE_EPSILON)
    }

    /// Creates a welder with a custom tolerance.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            grid: HashMap::new(),
            points: Vec::new(),
            tolerance,
        }
    }

    /// Returns the id of `p`, inserting it if no stored point is within tolerance.
    pub fn weld(&mut self, p: DVec2) -> usize {
        if let Some(id) = self.find(p) {
            return id;
        }
        let id = self.points.len();
        self.points.push(p);
        self.grid
            .entry(CellCoord::from_position(p, self.tolerance))
            .or_default()
            .push(id);
        id
    }

    /// Looks up the id of a stored point within tolerance of `p`.
    ///
    /// When several stored points qualify the lowest id wins, which keeps
    /// the result independent of hash map iteration order.
    pub fn find(&self, p: DVec2) -> Option<usize> {
        let tol_sq = self.tolerance * self.tolerance;
        CellCoord::from_position(p, self.tolerance)
            .neighbours()
            .filter_map(|cell| self.grid.get(&cell))
            .flatten()
            .copied()
            .filter(|&id| self.points[id].distance_squared(p) < tol_sq)
            .min()
    }

    /// Representative position of `id`.
    pub fn point(&self, id: usize) -> DVec2 {
        self.points[id]
    }

    /// All representative positions, indexed by id.
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
