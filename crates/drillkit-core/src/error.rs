//! Error handling for DrillKit
//!
//! Provides the error types shared by all layers. The only failure the
//! core and the optimizer report is invalid input: empty or non-finite point
//! sets, malformed tours and unusable settings.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Input error type
///
/// Raised when a caller hands the optimizer something it cannot order.
/// These are never retried and never partially recovered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// No points were supplied
    #[error("Point set is empty")]
    EmptyPointSet,

    /// A coordinate is NaN or infinite
    #[error("Point {index} has a non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate {
        /// Index of the offending point.
        index: usize,
        /// The X coordinate as supplied.
        x: f64,
        /// The Y coordinate as supplied.
        y: f64,
    },

    /// The requested start index does not name a point
    #[error("Start index {index} out of range for {len} points")]
    StartOutOfRange {
        /// The requested start index.
        index: usize,
        /// Number of points.
        len: usize,
    },

    /// The tour does not cover the point set
    #[error("Tour has {actual} entries but there are {expected} points")]
    TourLengthMismatch {
        /// Number of points.
        expected: usize,
        /// Number of tour entries.
        actual: usize,
    },

    /// A tour entry does not name a point
    #[error("Tour index {index} out of range for {len} points")]
    InvalidTourIndex {
        /// The offending tour entry.
        index: usize,
        /// Number of points.
        len: usize,
    },

    /// A tour entry appears more than once
    #[error("Tour visits point {index} more than once")]
    DuplicateTourIndex {
        /// The repeated tour entry.
        index: usize,
    },

    /// An optimizer setting cannot be used
    #[error("Invalid optimizer setting '{name}': {reason}")]
    InvalidSetting {
        /// The setting name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Main error type for DrillKit
///
/// A unified error type used in the public APIs of the core and optimizer.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),
}

impl Error {
    /// Check if this is an input error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
