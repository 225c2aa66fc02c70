//! # DrillKit CAM Tools
//!
//! This crate orders drill holes and turns the order into G-Code.
//!
//! ## Tools Included
//!
//! - **Path Optimizer**: nearest-neighbor construction plus 2-opt refinement
//!   over hole centres
//! - **Drill Jobs**: hole lists per part, loaded from JSON or TOML
//! - **Sequencer**: per-face optimization that keeps every hole's identity
//! - **Drill Press**: drilling program generation with peck and helical cycles

pub mod drill_job;
pub mod drill_press;
pub mod error;
pub mod path_optimizer;
pub mod sequencer;

// Re-export commonly used items
pub use drill_job::{DrillJob, Face, Hole};
pub use drill_press::{DrillPressParameters, DrillProgramGenerator};
pub use error::{CamToolError, CamToolResult, ParameterError};
pub use path_optimizer::{
    build_initial_tour, optimize, refine_tour, MoveSelection, OptimizationReport,
    OptimizerConfig, PathOptimizer, StartStrategy, MAX_MATRIX_THRESHOLD,
};
pub use sequencer::{DrillPlan, DrillSequencer, FacePlan};
