//! # Polygon Set
//!
//! Owner of the current generation of polygons.

use super::Polygon;
use crate::geometry::Bounds;
use std::ops::Index;

/// Ordered collection of polygons.
///
/// The resolver and gap filler read from a set and produce a new one;
/// a polygon consumed by a merge is dropped with the old generation.
#[derive(Debug, Clone, Default)]
pub struct PolygonSet {
    polygons: Vec<Polygon>,
}

impl PolygonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Polygon> {
        self.polygons.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.polygons.iter()
    }

    pub fn as_slice(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn into_vec(self) -> Vec<Polygon> {
        self.polygons
    }

    /// Stable sort by bounding-box diagonal, largest first.
    pub fn sort_by_diagonal_desc(&mut self) {
        sort_by_diagonal_desc(&mut self.polygons);
    }

    /// Union of all polygon bounds. Empty for an empty set.
    pub fn bounds(&self) -> Bounds {
        self.polygons
            .iter()
            .fold(Bounds::empty(), |acc, p| acc.union(&p.bounds()))
    }

    /// Sum of polygon areas (outer minus holes).
    pub fn total_area(&self) -> f64 {
        self.polygons.iter().map(Polygon::area).sum()
    }
}

pub(crate) fn sort_by_diagonal_desc(polygons: &mut [Polygon]) {
    polygons.sort_by(|a, b| b.bounds().diagonal().total_cmp(&a.bounds().diagonal()));
}

impl From<Vec<Polygon>> for PolygonSet {
    fn from(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }
}

impl FromIterator<Polygon> for PolygonSet {
    fn from_iter<I: IntoIterator<Item = Polygon>>(iter: I) -> Self {
        Self {
            polygons: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PolygonSet {
    type Item = Polygon;
    type IntoIter = std::vec::IntoIter<Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.into_iter()
    }
}

impl<'a> IntoIterator for &'a PolygonSet {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}

impl Index<usize> for PolygonSet {
    type Output = Polygon;

    fn index(&self, index: usize) -> &Polygon {
        &self.polygons[index]
    }
}
