use anyhow::Context;
use bpaf::*;
use drillkit::{init_logging, run_batch, Config, TourClosure};
use std::path::PathBuf;

/// Command line options
#[derive(Debug, Clone)]
struct Options {
    config: Option<PathBuf>,
    closed: bool,
    output: Option<PathBuf>,
    gcode: bool,
    jobs: Vec<PathBuf>,
}

fn options() -> OptionParser<Options> {
    let config = long("config")
        .short('c')
        .help("Config file (.json or .toml), defaults to the platform config directory")
        .argument::<PathBuf>("PATH")
        .optional();
    let closed = long("closed")
        .help("Count the return leg to the first hole when optimizing")
        .switch();
    let output = long("output")
        .short('o')
        .help("Directory for generated plans and programs")
        .argument::<PathBuf>("DIR")
        .optional();
    let gcode = long("gcode")
        .help("Write a drilling program for every job")
        .switch();
    let jobs = positional::<PathBuf>("JOB")
        .help("Drill job file (.json or .toml)")
        .some("at least one job file is required");

    construct!(Options {
        config,
        closed,
        output,
        gcode,
        jobs
    })
    .to_options()
    .descr("Order drill holes with nearest-neighbor + 2-opt and emit drilling programs")
    .version(drillkit::VERSION)
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => match Config::default_path() {
            Ok(path) => Config::load_or_default(&path)
                .with_context(|| format!("failed to load config {}", path.display())),
            Err(_) => Ok(Config::default()),
        },
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let opts = options().run();

    let mut config = load_config(opts.config.as_ref())?;
    if opts.closed {
        config.optimizer.closure = TourClosure::Closed;
    }
    if let Some(dir) = opts.output {
        config.output.directory = dir;
    }
    if opts.gcode {
        config.output.write_gcode = true;
    }
    tracing::debug!(build_date = drillkit::BUILD_DATE, "drillkit {}", drillkit::VERSION);

    let summary = run_batch(&opts.jobs, &config)?;
    for job in &summary.succeeded {
        println!(
            "ok    {}  {} holes  {:.3} -> {:.3}",
            job.path.display(),
            job.holes,
            job.initial_length,
            job.final_length
        );
    }
    for (path, reason) in &summary.failed {
        println!("fail  {}  {}", path.display(), reason);
    }

    if summary.succeeded.is_empty() {
        anyhow::bail!("no job could be processed");
    }
    Ok(())
}
