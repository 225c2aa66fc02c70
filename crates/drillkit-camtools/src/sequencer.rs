//! Hole sequencing.
//!
//! Splits a job's holes by face and runs the path optimizer on each face,
//! mapping the resulting tour back to the holes it came from.

use crate::drill_job::{DrillJob, Face, Hole};
use crate::error::{CamToolError, CamToolResult};
use crate::path_optimizer::{OptimizationReport, OptimizerConfig, PathOptimizer, StartStrategy};
use drillkit_core::Point;
use serde::Serialize;

/// Ordered holes for one face
#[derive(Debug, Clone, Serialize)]
pub struct FacePlan {
    pub face: Face,
    /// Holes in visiting order
    pub holes: Vec<Hole>,
    pub report: OptimizationReport,
}

/// Visiting order for a whole job, face by face
#[derive(Debug, Clone, Serialize)]
pub struct DrillPlan {
    pub job_name: String,
    pub faces: Vec<FacePlan>,
}

impl DrillPlan {
    pub fn total_holes(&self) -> usize {
        self.faces.iter().map(|f| f.holes.len()).sum()
    }

    /// Sum of the optimized travel over all faces
    pub fn total_length(&self) -> f64 {
        self.faces.iter().map(|f| f.report.final_length).sum()
    }

    /// Sum of the nearest-neighbor travel over all faces
    pub fn initial_length(&self) -> f64 {
        self.faces.iter().map(|f| f.report.initial_length).sum()
    }

    /// Every hole in drilling order
    pub fn ordered_holes(&self) -> impl Iterator<Item = &Hole> {
        self.faces.iter().flat_map(|f| f.holes.iter())
    }
}

/// Orders the holes of drill jobs
#[derive(Debug, Clone, Default)]
pub struct DrillSequencer {
    config: OptimizerConfig,
}

impl DrillSequencer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Optimize the drilling order of every face of `job`.
    pub fn sequence(&self, job: &DrillJob) -> CamToolResult<DrillPlan> {
        job.validate()?;
        if job.holes.is_empty() {
            return Err(CamToolError::InvalidJob(format!(
                "job '{}' has no holes",
                job.name
            )));
        }

        let mut config = self.config.clone();
        if let Some((x, y)) = job.origin {
            config.start = StartStrategy::NearestTo { x, y };
        }
        let optimizer = PathOptimizer::new(config);

        let mut faces = Vec::new();
        for face in job.faces() {
            let holes = job.holes_on(face);
            let points: Vec<Point> = holes.iter().map(|h| h.center()).collect();
            let report = optimizer.optimize_with_report(&points)?;

            tracing::info!(
                job = %job.name,
                face = %face,
                holes = holes.len(),
                improved = report.improved(),
                "face path optimized: {:.3} -> {:.3}",
                report.initial_length,
                report.final_length
            );

            let ordered = report.tour.iter().map(|i| holes[i].clone()).collect();
            faces.push(FacePlan {
                face,
                holes: ordered,
                report,
            });
        }

        Ok(DrillPlan {
            job_name: job.name.clone(),
            faces,
        })
    }
}
