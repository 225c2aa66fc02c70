//! Drill path optimization.
//!
//! Orders drill hole centres so the head travels as little as possible
//! between holes.
//!
//! # Algorithms
//!
//! 1. **Nearest Neighbor (NN)**: greedy construction from the start hole,
//!    always moving to the closest unvisited hole. Ties go to the lowest
//!    index so the result is reproducible.
//! 2. **2-opt**: local search over pairs of non-adjacent edges
//!    `(i, i+1)` and `(j, j+1)`, reversing `i+1..=j` whenever that strictly
//!    shortens the tour. Candidate pairs are scanned in lexicographic
//!    `(i, j)` order.
//!
//! Refinement stops at a local optimum (a full pass with no improving move),
//! after `max_passes` passes, or when the optional time limit runs out.

use drillkit_core::point::validate_points;
use drillkit_core::{
    length_with, DistanceMatrix, DistanceSource, EuclideanDistances, InputError, Point, Result,
    Tour, TourClosure,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Largest accepted `matrix_threshold`; a full matrix at this size is 512 MiB
pub const MAX_MATRIX_THRESHOLD: usize = 8192;

/// Where the nearest-neighbor construction starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StartStrategy {
    /// Start at the point with this index
    Index { index: usize },
    /// Start at the point closest to an anchor (for example the machine origin)
    NearestTo { x: f64, y: f64 },
}

impl Default for StartStrategy {
    fn default() -> Self {
        Self::Index { index: 0 }
    }
}

/// How 2-opt picks moves within a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveSelection {
    /// Apply every improving reversal as soon as it is found and keep scanning
    #[default]
    FirstImprovement,
    /// Scan the whole neighbourhood and apply only the best reversal
    BestImprovement,
}

/// Path optimizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Whether the return leg to the start counts toward the length
    pub closure: TourClosure,
    /// Start point for the construction phase
    pub start: StartStrategy,
    /// 2-opt move selection
    pub move_selection: MoveSelection,
    /// Maximum number of full 2-opt passes.
    /// Set to 0 to keep the nearest-neighbor tour.
    pub max_passes: usize,
    /// Optional wall-clock budget for refinement in milliseconds.
    /// Output is only reproducible when this is `None` or never reached.
    pub time_limit_ms: Option<u64>,
    /// A reversal must shorten the tour by more than this to be applied
    pub min_improvement: f64,
    /// Largest point count for which a dense distance matrix is built.
    /// At most [`MAX_MATRIX_THRESHOLD`].
    pub matrix_threshold: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            closure: TourClosure::Open,
            start: StartStrategy::default(),
            move_selection: MoveSelection::FirstImprovement,
            max_passes: 1000,
            time_limit_ms: None,
            min_improvement: 1e-9,
            matrix_threshold: 2048,
        }
    }
}

impl OptimizerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.min_improvement.is_finite() || self.min_improvement < 0.0 {
            return Err(InputError::InvalidSetting {
                name: "min_improvement".to_string(),
                reason: format!("must be finite and >= 0, got {}", self.min_improvement),
            }
            .into());
        }
        if self.matrix_threshold > MAX_MATRIX_THRESHOLD {
            return Err(InputError::InvalidSetting {
                name: "matrix_threshold".to_string(),
                reason: format!(
                    "must be <= {MAX_MATRIX_THRESHOLD}, got {}",
                    self.matrix_threshold
                ),
            }
            .into());
        }
        if let StartStrategy::NearestTo { x, y } = self.start {
            if !x.is_finite() || !y.is_finite() {
                return Err(InputError::InvalidSetting {
                    name: "start".to_string(),
                    reason: format!("anchor ({x}, {y}) is not finite"),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Outcome of one optimization run, for progress reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationReport {
    /// Final visiting order
    pub tour: Tour,
    /// Closure the lengths were measured with
    pub closure: TourClosure,
    /// Length of the nearest-neighbor tour
    pub initial_length: f64,
    /// Length after 2-opt
    pub final_length: f64,
    /// Number of 2-opt passes run
    pub passes: usize,
    /// Number of reversals applied
    pub moves_applied: usize,
    /// Whether refinement stopped at a local optimum rather than a budget
    pub converged: bool,
}

impl OptimizationReport {
    /// Whether refinement shortened the construction tour
    pub fn improved(&self) -> bool {
        self.final_length < self.initial_length
    }
}

#[derive(Debug, Default)]
struct RefineStats {
    passes: usize,
    moves: usize,
    converged: bool,
}

enum Distances<'a> {
    Dense(DistanceMatrix),
    OnDemand(EuclideanDistances<'a>),
}

impl DistanceSource for Distances<'_> {
    fn len(&self) -> usize {
        match self {
            Self::Dense(m) => m.len(),
            Self::OnDemand(e) => e.len(),
        }
    }

    fn distance(&self, a: usize, b: usize) -> f64 {
        match self {
            Self::Dense(m) => m.distance(a, b),
            Self::OnDemand(e) => e.distance(a, b),
        }
    }
}

/// Nearest-neighbor + 2-opt drill path optimizer
///
/// Holds only its configuration; every call works on its own buffers, so a
/// single optimizer can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct PathOptimizer {
    config: OptimizerConfig,
}

impl PathOptimizer {
    /// Create an optimizer with the given configuration
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Build a visiting order with the nearest-neighbor heuristic.
    pub fn build_initial_tour(&self, points: &[Point]) -> Result<Tour> {
        self.config.validate()?;
        validate_points(points)?;
        let start = self.resolve_start(points)?;
        let distances = self.distances(points);
        Tour::new(nearest_neighbor(&distances, start), points.len())
    }

    /// Improve a visiting order with 2-opt.
    ///
    /// The result is never longer than `tour`.
    pub fn refine_tour(&self, points: &[Point], tour: Tour) -> Result<Tour> {
        self.config.validate()?;
        validate_points(points)?;
        Tour::check(tour.as_slice(), points.len())?;

        let distances = self.distances(points);
        let mut order = tour.into_vec();
        self.two_opt(&distances, &mut order);
        Tour::new(order, points.len())
    }

    /// Construct and refine a visiting order.
    pub fn optimize(&self, points: &[Point]) -> Result<Tour> {
        Ok(self.optimize_with_report(points)?.tour)
    }

    /// Construct and refine a visiting order, reporting before/after lengths.
    pub fn optimize_with_report(&self, points: &[Point]) -> Result<OptimizationReport> {
        self.config.validate()?;
        validate_points(points)?;
        let start = self.resolve_start(points)?;
        let distances = self.distances(points);
        let closure = self.config.closure;

        let mut order = nearest_neighbor(&distances, start);
        let initial_length = length_with(&distances, &order, closure);

        let stats = self.two_opt(&distances, &mut order);
        let final_length = length_with(&distances, &order, closure);

        tracing::debug!(
            points = points.len(),
            passes = stats.passes,
            moves = stats.moves,
            converged = stats.converged,
            "path optimized: {:.3} -> {:.3}",
            initial_length,
            final_length
        );

        Ok(OptimizationReport {
            tour: Tour::new(order, points.len())?,
            closure,
            initial_length,
            final_length,
            passes: stats.passes,
            moves_applied: stats.moves,
            converged: stats.converged,
        })
    }

    fn resolve_start(&self, points: &[Point]) -> Result<usize> {
        match self.config.start {
            StartStrategy::Index { index } if index < points.len() => Ok(index),
            StartStrategy::Index { index } => Err(InputError::StartOutOfRange {
                index,
                len: points.len(),
            }
            .into()),
            StartStrategy::NearestTo { x, y } => Ok(nearest_to(points, Point::new(x, y))),
        }
    }

    fn distances<'a>(&self, points: &'a [Point]) -> Distances<'a> {
        if points.len() <= self.config.matrix_threshold {
            Distances::Dense(DistanceMatrix::from_points(points))
        } else {
            Distances::OnDemand(EuclideanDistances::new(points))
        }
    }

    fn two_opt<D: DistanceSource>(&self, distances: &D, order: &mut [usize]) -> RefineStats {
        let n = order.len();
        if n < 4 {
            // No pair of non-adjacent edges exists
            return RefineStats {
                converged: true,
                ..RefineStats::default()
            };
        }

        let deadline = self
            .config
            .time_limit_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));
        let expired = || deadline.is_some_and(|d| Instant::now() >= d);
        let closure = self.config.closure;
        let eps = self.config.min_improvement;
        let mut stats = RefineStats::default();

        while stats.passes < self.config.max_passes {
            stats.passes += 1;
            let mut improved = false;
            let mut cut_short = false;
            let mut best: Option<(usize, usize, f64)> = None;

            'scan: for i in 0..n - 2 {
                if expired() {
                    cut_short = true;
                    break 'scan;
                }
                for j in (i + 2)..n {
                    if !is_candidate(i, j, n, closure) {
                        continue;
                    }
                    let gain = reversal_gain(distances, order, i, j);
                    if gain <= eps {
                        continue;
                    }
                    match self.config.move_selection {
                        MoveSelection::FirstImprovement => {
                            order[i + 1..=j].reverse();
                            stats.moves += 1;
                            improved = true;
                        }
                        MoveSelection::BestImprovement => {
                            if best.map_or(true, |(_, _, g)| gain > g) {
                                best = Some((i, j, gain));
                            }
                        }
                    }
                }
            }

            if let Some((i, j, _)) = best {
                order[i + 1..=j].reverse();
                stats.moves += 1;
                improved = true;
            }

            if !improved && !cut_short {
                stats.converged = true;
                break;
            }
            if cut_short || expired() {
                tracing::debug!(passes = stats.passes, "2-opt time limit reached");
                break;
            }
        }

        stats
    }
}

/// Whether edges `(i, i+1)` and `(j, j+1)` form a 2-opt candidate pair.
///
/// Callers guarantee `j >= i + 2`.
fn is_candidate(i: usize, j: usize, n: usize, closure: TourClosure) -> bool {
    match closure {
        // Edge (j, j+1) must exist
        TourClosure::Open => j + 1 < n,
        // Edge (n-1, 0) touches edge (0, 1)
        TourClosure::Closed => !(i == 0 && j == n - 1),
    }
}

/// Length saved by reversing `order[i+1..=j]`.
fn reversal_gain<D: DistanceSource>(distances: &D, order: &[usize], i: usize, j: usize) -> f64 {
    let n = order.len();
    let a = order[i];
    let b = order[i + 1];
    let c = order[j];
    let e = order[(j + 1) % n];
    distances.distance(a, b) + distances.distance(c, e)
        - distances.distance(a, c)
        - distances.distance(b, e)
}

fn nearest_neighbor<D: DistanceSource>(distances: &D, start: usize) -> Vec<usize> {
    let n = distances.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = start;
    visited[current] = true;
    order.push(current);

    while order.len() < n {
        let mut best: Option<(usize, f64)> = None;
        for (j, seen) in visited.iter().enumerate() {
            if *seen {
                continue;
            }
            let d = distances.distance(current, j);
            // Strict comparison keeps the lowest index on ties
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((j, d));
            }
        }
        let Some((next, _)) = best else {
            break;
        };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

/// Index of the point closest to `anchor`, lowest index on ties.
fn nearest_to(points: &[Point], anchor: Point) -> usize {
    let mut best = (0, f64::INFINITY);
    for (i, p) in points.iter().enumerate() {
        let d = p.distance_to(&anchor);
        if d < best.1 {
            best = (i, d);
        }
    }
    best.0
}

/// Nearest-neighbor tour with the default configuration.
pub fn build_initial_tour(points: &[Point]) -> Result<Tour> {
    PathOptimizer::default().build_initial_tour(points)
}

/// 2-opt refinement with the default configuration.
pub fn refine_tour(points: &[Point], tour: Tour) -> Result<Tour> {
    PathOptimizer::default().refine_tour(points, tour)
}

/// Nearest-neighbor + 2-opt with the default configuration.
pub fn optimize(points: &[Point]) -> Result<Tour> {
    PathOptimizer::default().optimize(points)
}
