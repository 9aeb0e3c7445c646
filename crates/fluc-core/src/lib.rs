#![deny(missing_docs)]
#![doc = "Core types for the flow-fluctuation engine: configuration, event context, particle samples and the toy event generator."]

pub mod config;
pub mod errors;
pub mod event;
pub mod generators;
pub mod rng;
pub mod sample;

pub use config::{
    ClipPolicy, FlowConfig, FlucFlags, SubeventMask, TableBounds, MAX_SUPPORTED_HARMONIC,
    MAX_SUPPORTED_ORDER, MIN_HARMONIC, MIXED_MAX_HARMONIC,
};
pub use errors::{ErrorInfo, FlucError};
pub use event::EventContext;
pub use generators::{generate_event, generate_tracks, FlowModel, HarmonicFlow};
pub use rng::{derive_substream_seed, RngHandle};
pub use sample::{EtaTag, EtaWindow, Particle, ParticleSample, Subevent, Track};
