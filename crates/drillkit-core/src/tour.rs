//! Visiting orders over a point set.

use crate::error::{InputError, Result};
use crate::point::{DistanceSource, EuclideanDistances, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the head returns to its start after the last hole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TourClosure {
    /// Path from the first to the last hole, no return leg
    #[default]
    Open,
    /// Cycle; the leg from the last hole back to the first counts
    Closed,
}

impl fmt::Display for TourClosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// An ordering of point indices
///
/// Always a permutation of `0..len`: every index appears exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tour {
    order: Vec<usize>,
}

impl Tour {
    /// Wrap an order, checking it is a permutation of `0..point_count`.
    pub fn new(order: Vec<usize>, point_count: usize) -> Result<Self> {
        Self::check(&order, point_count)?;
        Ok(Self { order })
    }

    /// Identity order `0, 1, .., n - 1`
    pub fn identity(point_count: usize) -> Self {
        Self {
            order: (0..point_count).collect(),
        }
    }

    /// Check that `order` is a permutation of `0..point_count`.
    pub fn check(order: &[usize], point_count: usize) -> Result<()> {
        if order.len() != point_count {
            return Err(InputError::TourLengthMismatch {
                expected: point_count,
                actual: order.len(),
            }
            .into());
        }
        let mut seen = vec![false; point_count];
        for &index in order {
            if index >= point_count {
                return Err(InputError::InvalidTourIndex {
                    index,
                    len: point_count,
                }
                .into());
            }
            if std::mem::replace(&mut seen[index], true) {
                return Err(InputError::DuplicateTourIndex { index }.into());
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied()
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.order
    }

    /// Total travel length over `points`
    pub fn length(&self, points: &[Point], closure: TourClosure) -> f64 {
        tour_length(points, &self.order, closure)
    }
}

impl<'de> Deserialize<'de> for Tour {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            order: Vec<usize>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let n = raw.order.len();
        Tour::new(raw.order, n).map_err(serde::de::Error::custom)
    }
}

impl AsRef<[usize]> for Tour {
    fn as_ref(&self) -> &[usize] {
        &self.order
    }
}

/// Length of visiting `order` over `points`.
///
/// A single point, or an empty order, has length zero.
pub fn tour_length(points: &[Point], order: &[usize], closure: TourClosure) -> f64 {
    length_with(&EuclideanDistances::new(points), order, closure)
}

/// Length of visiting `order` using any distance source.
pub fn length_with<D: DistanceSource + ?Sized>(
    distances: &D,
    order: &[usize],
    closure: TourClosure,
) -> f64 {
    if order.len() < 2 {
        return 0.0;
    }
    let path: f64 = order
        .windows(2)
        .map(|w| distances.distance(w[0], w[1]))
        .sum();
    match closure {
        TourClosure::Open => path,
        TourClosure::Closed => path + distances.distance(order[order.len() - 1], order[0]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_tour_rejects_non_permutations() {
        assert!(Tour::new(vec![2, 0, 1], 3).is_ok());

        let err = Tour::new(vec![0, 1], 3).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InputError::TourLengthMismatch {
                expected: 3,
                actual: 2
            })
        ));

        let err = Tour::new(vec![0, 3, 1], 3).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InputError::InvalidTourIndex { index: 3, len: 3 })
        ));

        let err = Tour::new(vec![0, 1, 1], 3).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InputError::DuplicateTourIndex { index: 1 })
        ));
    }

    #[test]
    fn test_lengths_by_closure() {
        let points = square();
        let tour = Tour::identity(4);
        assert_eq!(tour.length(&points, TourClosure::Open), 30.0);
        assert_eq!(tour.length(&points, TourClosure::Closed), 40.0);

        let single = Tour::identity(1);
        assert_eq!(single.length(&points[..1], TourClosure::Closed), 0.0);
    }

    #[test]
    fn test_tour_serde_validates() {
        let tour: Tour = serde_json::from_str(r#"{"order":[1,0,2]}"#).unwrap();
        assert_eq!(tour.as_slice(), &[1, 0, 2]);

        let json = serde_json::to_string(&tour).unwrap();
        assert_eq!(json, r#"{"order":[1,0,2]}"#);

        assert!(serde_json::from_str::<Tour>(r#"{"order":[1,1,2]}"#).is_err());
    }

    #[test]
    fn test_closure_serde_names() {
        assert_eq!(
            serde_json::to_string(&TourClosure::Closed).unwrap(),
            "\"closed\""
        );
        assert_eq!(TourClosure::default(), TourClosure::Open);
    }
}
