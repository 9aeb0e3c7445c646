#![deny(missing_docs)]
#![doc = "Observable assembly, emission sinks, profile accumulation and the parallel toy-run driver."]

pub mod accumulate;
pub mod assembler;
pub mod driver;
pub mod emit;
/// Stable hashing helpers for run provenance.
pub mod hash;
pub mod ids;
mod mixed;
pub mod qa;
/// Canonical JSON helpers.
pub mod serde;
/// Histograms and weighted profiles.
pub mod stat;

pub use accumulate::{BinSummary, CentralityAxis, FlowSummary, ProfileAccumulator, QaHistograms};
pub use assembler::FlowAssembler;
pub use driver::{
    accumulate_toy, run_toy, write_report, CentralityRange, RunOpts, ToyProvenance, ToyReport,
    ToyRun,
};
pub use emit::{Emission, FlowSink, MemorySink};
pub use hash::stable_hash_string;
pub use ids::{MixedObservable, ObservableKey};
pub use qa::{emit_qa, QaFill};
pub use crate::serde::{from_json_slice, to_canonical_json_bytes};
pub use stat::{Histogram, Histogram2, Histogram3, Profile};
