use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use fluc_obs::{run_toy, to_canonical_json_bytes, write_report, RunOpts, ToyRun};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ToyArgs {
    /// YAML description of the toy study.
    #[arg(long)]
    pub config: PathBuf,
    /// Output directory for `toy_report.json`.
    #[arg(long)]
    pub out: PathBuf,
    /// Override the master seed.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Override the number of events.
    #[arg(long)]
    pub events: Option<usize>,
    /// Worker threads; results do not depend on this.
    #[arg(long, default_value_t = 1)]
    pub threads: usize,
}

#[derive(Debug, Serialize)]
struct ToyOutcome {
    report: String,
    config_hash: String,
    events: usize,
    observables: usize,
}

pub fn run(args: &ToyArgs) -> Result<(), Box<dyn Error>> {
    let raw = fs::read_to_string(&args.config)?;
    let mut study: ToyRun = serde_yaml::from_str(&raw)?;
    if let Some(seed) = args.seed {
        study.seed = seed;
    }
    if let Some(events) = args.events {
        study.events = events;
    }
    tracing::debug!(config = %args.config.display(), seed = study.seed, "toy study loaded");
    let report = run_toy(
        &study,
        &RunOpts {
            threads: args.threads,
        },
    )?;
    let path = write_report(&report, &args.out)?;
    let outcome = ToyOutcome {
        report: path.display().to_string(),
        config_hash: report.provenance.config_hash.clone(),
        events: report.provenance.events,
        observables: report.summary.observables.len(),
    };
    println!("{}", String::from_utf8(to_canonical_json_bytes(&outcome)?)?);
    Ok(())
}
