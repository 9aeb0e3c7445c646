//! Toy Monte-Carlo driver: generates events, assembles them in parallel and
//! merges the per-chunk accumulators.

use std::collections::BTreeMap;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use fluc_core::{
    generate_event, ErrorInfo, EventContext, FlowConfig, FlowModel, FlucError, RngHandle,
};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::accumulate::{CentralityAxis, FlowSummary, ProfileAccumulator};
use crate::assembler::FlowAssembler;
use crate::hash::stable_hash_string;
use crate::serde::to_canonical_json_bytes;

fn io_error(code: &str, err: impl ToString) -> FlucError {
    FlucError::Io(ErrorInfo::new(code, err.to_string()))
}

fn run_error(code: &str, message: impl Into<String>) -> FlucError {
    FlucError::Config(ErrorInfo::new(code, message))
}

fn default_events() -> usize {
    1000
}

fn default_seed() -> u64 {
    0x5eed
}

fn default_chunk_size() -> usize {
    64
}

fn default_centrality() -> CentralityRange {
    CentralityRange {
        min: 0.0,
        max: 50.0,
    }
}

fn default_vertex_spread() -> f64 {
    10.0
}

/// Range event centralities are drawn from uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralityRange {
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound.
    pub max: f64,
}

/// Description of a toy study. Every field is covered by the provenance hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToyRun {
    /// Number of events.
    #[serde(default = "default_events")]
    pub events: usize,
    /// Master seed; event `i` uses substream `i`.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Events per work unit. Results depend on this, not on the thread count.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Event generator.
    #[serde(default)]
    pub model: FlowModel,
    /// Analysis configuration.
    #[serde(default)]
    pub flow: FlowConfig,
    /// Accumulator binning.
    #[serde(default)]
    pub axis: CentralityAxis,
    /// Centrality range of the generated events.
    #[serde(default = "default_centrality")]
    pub centrality: CentralityRange,
    /// Vertices are uniform in `(-spread, spread)`.
    #[serde(default = "default_vertex_spread")]
    pub vertex_spread: f64,
}

impl Default for ToyRun {
    fn default() -> Self {
        Self {
            events: default_events(),
            seed: default_seed(),
            chunk_size: default_chunk_size(),
            model: FlowModel::default(),
            flow: FlowConfig::default(),
            axis: CentralityAxis::default(),
            centrality: default_centrality(),
            vertex_spread: default_vertex_spread(),
        }
    }
}

impl ToyRun {
    /// Validates the run and builds its assembler.
    pub fn assembler(&self) -> Result<FlowAssembler, FlucError> {
        if self.chunk_size == 0 {
            return Err(run_error("chunk-size", "chunk_size must be positive"));
        }
        let CentralityRange { min, max } = self.centrality;
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(FlucError::Config(
                ErrorInfo::new("centrality-range", "centrality range requires min < max")
                    .with_context("min", min)
                    .with_context("max", max),
            ));
        }
        if !self.vertex_spread.is_finite() || self.vertex_spread < 0.0 {
            return Err(run_error(
                "vertex-spread",
                format!("vertex spread must be finite and >= 0, got {}", self.vertex_spread),
            ));
        }
        self.model.validate()?;
        self.axis.validate()?;
        FlowAssembler::new(self.flow.clone())
    }

    fn chunks(&self) -> Vec<Range<usize>> {
        (0..self.events)
            .step_by(self.chunk_size)
            .map(|start| start..(start + self.chunk_size).min(self.events))
            .collect()
    }

    fn simulate(&self, assembler: &FlowAssembler, index: usize, sink: &mut ProfileAccumulator) {
        let mut rng = RngHandle::for_substream(self.seed, index as u64);
        let centrality = rng.gen_range(self.centrality.min..self.centrality.max);
        let vertex = if self.vertex_spread > 0.0 {
            rng.gen_range(-self.vertex_spread..self.vertex_spread)
        } else {
            0.0
        };
        let sample = generate_event(&self.model, &self.flow.eta_window, &mut rng);
        let context = EventContext::from_config(&self.flow, centrality, vertex);
        assembler.process_sample(&sample, &context, sink);
    }
}

/// Options that affect scheduling but never the results.
#[derive(Debug, Clone)]
pub struct RunOpts {
    /// Worker threads.
    pub threads: usize,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self { threads: 1 }
    }
}

/// Provenance attached to every toy report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToyProvenance {
    /// Canonical hash of the [`ToyRun`].
    pub config_hash: String,
    /// Master seed.
    pub seed: u64,
    /// Events processed.
    pub events: usize,
    /// Work units the events were split into.
    pub chunks: usize,
    /// Versions of the crates that produced the report.
    pub tool_versions: BTreeMap<String, String>,
}

/// Output of [`run_toy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToyReport {
    /// Run provenance.
    pub provenance: ToyProvenance,
    /// Accumulated observables.
    pub summary: FlowSummary,
}

/// Runs the toy study and returns the merged accumulator.
///
/// Chunks are merged in chunk order, so the result is bit-identical for any
/// thread count.
pub fn accumulate_toy(run: &ToyRun, opts: &RunOpts) -> Result<ProfileAccumulator, FlucError> {
    let assembler = run.assembler()?;
    let chunks = run.chunks();
    tracing::info!(
        events = run.events,
        chunks = chunks.len(),
        threads = opts.threads,
        "toy run started"
    );
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.threads.max(1))
        .build()
        .map_err(|err| io_error("thread_pool", err))?;

    let partials: Vec<ProfileAccumulator> = pool.install(|| {
        chunks
            .par_iter()
            .enumerate()
            .map(|(chunk, range)| {
                let mut sink = ProfileAccumulator::new(run.axis.clone());
                for index in range.clone() {
                    run.simulate(&assembler, index, &mut sink);
                }
                tracing::debug!(chunk, events = range.len(), "chunk finished");
                sink
            })
            .collect()
    });

    let mut total = ProfileAccumulator::new(run.axis.clone());
    for partial in &partials {
        total.merge(partial)?;
    }
    if total.out_of_range() > 0 {
        tracing::warn!(
            dropped = total.out_of_range(),
            "emissions outside the centrality axis"
        );
    }
    Ok(total)
}

/// Runs the toy study and builds its report.
pub fn run_toy(run: &ToyRun, opts: &RunOpts) -> Result<ToyReport, FlucError> {
    let accumulator = accumulate_toy(run, opts)?;
    let mut tool_versions = BTreeMap::new();
    tool_versions.insert(
        "fluc-obs".to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    let provenance = ToyProvenance {
        config_hash: stable_hash_string(run)?,
        seed: run.seed,
        events: run.events,
        chunks: run.chunks().len(),
        tool_versions,
    };
    tracing::info!(config_hash = %provenance.config_hash, "toy run finished");
    Ok(ToyReport {
        provenance,
        summary: accumulator.summary(),
    })
}

/// Writes `toy_report.json` in canonical JSON under `out`.
pub fn write_report(report: &ToyReport, out: &Path) -> Result<PathBuf, FlucError> {
    fs::create_dir_all(out).map_err(|err| io_error("report_out_dir", err))?;
    let path = out.join("toy_report.json");
    let bytes = to_canonical_json_bytes(report)?;
    fs::write(&path, bytes).map_err(|err| io_error("report_write", err))?;
    Ok(path)
}
