//! # DrillKit
//!
//! Orders drill holes so the head travels as little as possible, and turns
//! the order into drilling programs.
//!
//! ## Architecture
//!
//! DrillKit is organized as a workspace with multiple crates:
//!
//! 1. **drillkit-core** - Points, distances, tours, errors
//! 2. **drillkit-camtools** - Path optimizer, drill jobs, sequencing, G-code
//! 3. **drillkit-settings** - Configuration files and validation
//! 4. **drillkit** - Batch runner and the `drillkit` binary

pub mod batch;

pub use batch::{run_batch, BatchSummary, JobOutcome};

pub use drillkit_core::{Error, InputError, Point, Result, Tour, TourClosure};

pub use drillkit_camtools::{
    optimize, DrillJob, DrillPlan, DrillPressParameters, DrillProgramGenerator, DrillSequencer,
    Face, Hole, MoveSelection, OptimizationReport, OptimizerConfig, PathOptimizer, StartStrategy,
};

pub use drillkit_settings::{Config, OutputSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr so stdout stays free for results
/// - RUST_LOG environment variable support, INFO otherwise
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
