//! Hole-centre points and pairwise distances.

use crate::error::{InputError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A planar drill hole centre
///
/// Coordinates are in whatever unit the geometry came in; no origin or scale
/// is assumed. A point never changes once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Create a point at (x, y)
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// X coordinate
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y coordinate
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Whether both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Reject empty point sets and non-finite coordinates.
pub fn validate_points(points: &[Point]) -> Result<()> {
    if points.is_empty() {
        return Err(InputError::EmptyPointSet.into());
    }
    if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
        return Err(InputError::NonFiniteCoordinate {
            index,
            x: p.x,
            y: p.y,
        }
        .into());
    }
    Ok(())
}

/// Anything that can answer "how far is point `a` from point `b`".
///
/// Implementations must be symmetric and non-negative.
pub trait DistanceSource {
    /// Number of points
    fn len(&self) -> usize;

    /// Distance between points `a` and `b`
    fn distance(&self, a: usize, b: usize) -> f64;

    /// Whether there are no points
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Distances computed on demand from the points.
#[derive(Debug, Clone, Copy)]
pub struct EuclideanDistances<'a> {
    points: &'a [Point],
}

impl<'a> EuclideanDistances<'a> {
    pub fn new(points: &'a [Point]) -> Self {
        Self { points }
    }
}

impl DistanceSource for EuclideanDistances<'_> {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn distance(&self, a: usize, b: usize) -> f64 {
        self.points[a].distance_to(&self.points[b])
    }
}

/// Dense symmetric distance matrix
///
/// Stored row-major in a single buffer of `n * n` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Build the matrix for a point set
    pub fn from_points(points: &[Point]) -> Self {
        let n = points.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].distance_to(&points[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { n, data }
    }
}

impl DistanceSource for DistanceMatrix {
    fn len(&self) -> usize {
        self.n
    }

    fn distance(&self, a: usize, b: usize) -> f64 {
        self.data[a * self.n + b]
    }
}
