//! Batch processing of drill job files.
//!
//! Each file is loaded, sequenced and written out on its own. A file that
//! fails is logged with its name and skipped; the rest of the batch goes on.

use anyhow::Context;
use drillkit_camtools::{DrillJob, DrillPlan, DrillProgramGenerator, DrillSequencer};
use drillkit_settings::Config;
use std::path::{Path, PathBuf};

/// A job that went through
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub path: PathBuf,
    pub job_name: String,
    pub holes: usize,
    /// Nearest-neighbor travel, summed over faces
    pub initial_length: f64,
    /// Optimized travel, summed over faces
    pub final_length: f64,
    /// Files written for this job
    pub written: Vec<PathBuf>,
}

/// Result of a batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub succeeded: Vec<JobOutcome>,
    /// Failed files with the error message
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Process every job file in `paths` with `config`.
///
/// The config is checked once up front; an invalid config fails the whole
/// batch before any file is touched.
pub fn run_batch(paths: &[PathBuf], config: &Config) -> anyhow::Result<BatchSummary> {
    config.validate().context("invalid configuration")?;
    let sequencer = DrillSequencer::new(config.optimizer.clone());
    let mut summary = BatchSummary::default();

    for path in paths {
        tracing::info!("processing {}", path.display());
        match run_job(path, config, &sequencer) {
            Ok(outcome) => {
                tracing::info!(
                    file = %path.display(),
                    holes = outcome.holes,
                    "job done: travel {:.3} -> {:.3}",
                    outcome.initial_length,
                    outcome.final_length
                );
                summary.succeeded.push(outcome);
            }
            Err(err) => {
                tracing::error!(file = %path.display(), "job failed: {err:#}");
                summary.failed.push((path.clone(), format!("{err:#}")));
            }
        }
    }

    tracing::info!(
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        "batch finished"
    );
    Ok(summary)
}

fn run_job(path: &Path, config: &Config, sequencer: &DrillSequencer) -> anyhow::Result<JobOutcome> {
    let job = DrillJob::load_from_file(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let plan = sequencer
        .sequence(&job)
        .with_context(|| format!("failed to sequence job '{}'", job.name))?;

    let written = write_outputs(path, &plan, config)?;

    Ok(JobOutcome {
        path: path.to_path_buf(),
        job_name: plan.job_name.clone(),
        holes: plan.total_holes(),
        initial_length: plan.initial_length(),
        final_length: plan.total_length(),
        written,
    })
}

/// Render every requested output, then write them. Nothing is written when
/// rendering fails.
fn write_outputs(path: &Path, plan: &DrillPlan, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let output = &config.output;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| plan.job_name.clone());

    let mut rendered = Vec::new();
    if output.write_plan {
        let json = serde_json::to_string_pretty(plan)?;
        rendered.push((output.directory.join(format!("{stem}.plan.json")), json));
    }
    if output.write_gcode {
        let gcode = DrillProgramGenerator::new(config.drilling.clone())
            .generate(plan)
            .with_context(|| format!("failed to generate program for '{}'", plan.job_name))?;
        rendered.push((output.directory.join(format!("{stem}.nc")), gcode));
    }
    if rendered.is_empty() {
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(&output.directory)
        .with_context(|| format!("failed to create {}", output.directory.display()))?;
    let mut written = Vec::with_capacity(rendered.len());
    for (target, content) in rendered {
        std::fs::write(&target, content)
            .with_context(|| format!("failed to write {}", target.display()))?;
        written.push(target);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_failed_generation_leaves_no_plan_behind() {
        let dir = TempDir::new().unwrap();
        let job = dir.path().join("plate.json");
        std::fs::write(
            &job,
            r#"{"name": "plate", "holes": [{"id": "H1", "x": 0.0, "y": 0.0, "diameter": 4.0}]}"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.output.directory = dir.path().join("out");
        config.output.write_gcode = true;
        config.drilling.plunge_rate = 0.0;

        let err = run_job(&job, &config, &DrillSequencer::default()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("plunge_rate"));
        assert_eq!(message.matches("plunge_rate").count(), 1);
        assert!(!dir.path().join("out").join("plate.plan.json").exists());
        assert!(!dir.path().join("out").exists());
    }
}
