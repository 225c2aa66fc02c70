//! # DrillKit Core
//!
//! Core types shared by the DrillKit crates.
//! Provides hole-centre points, distance sources, visiting orders (tours)
//! and the error taxonomy used by the path optimizer.

pub mod error;
pub mod point;
pub mod tour;

pub use error::{Error, InputError, Result};
pub use point::{validate_points, DistanceMatrix, DistanceSource, EuclideanDistances, Point};
pub use tour::{length_with, tour_length, Tour, TourClosure};
