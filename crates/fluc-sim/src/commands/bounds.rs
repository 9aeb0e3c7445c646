use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use fluc_core::FlowConfig;
use fluc_obs::{to_canonical_json_bytes, FlowAssembler};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct BoundsArgs {
    /// YAML flow configuration; defaults are used when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BoundsReport {
    harmonics: usize,
    powers: usize,
    ladder_len: usize,
}

pub fn run(args: &BoundsArgs) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => FlowConfig::load(path)?,
        None => FlowConfig::default(),
    };
    let assembler = FlowAssembler::new(config)?;
    let bounds = assembler.bounds();
    let report = BoundsReport {
        harmonics: bounds.harmonics,
        powers: bounds.powers,
        ladder_len: assembler.ladder_len(),
    };
    println!("{}", String::from_utf8(to_canonical_json_bytes(&report)?)?);
    Ok(())
}
