//! Per-event quality-assurance fills.

use fluc_core::{EtaTag, EventContext, ParticleSample};
use serde::{Deserialize, Serialize};

use crate::emit::{Emission, FlowSink};

/// One QA fill. QA fills always carry unit weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "fill", rename_all = "snake_case")]
pub enum QaFill {
    /// Event centrality.
    Centrality {
        /// Centrality value.
        value: f64,
    },
    /// Event vertex position.
    Vertex {
        /// Vertex position.
        value: f64,
    },
    /// Number of particles in the sample.
    TrackCount {
        /// Particle count.
        count: usize,
    },
    /// Azimuth and pseudorapidity of one particle, filled regardless of flags.
    Phi {
        /// Azimuthal angle.
        phi: f64,
        /// Pseudorapidity.
        eta: f64,
        /// Subevent tag of the particle.
        tag: EtaTag,
    },
    /// Point of the `(phi, eta)` acceptance map.
    PhiEta {
        /// Azimuthal angle.
        phi: f64,
        /// Pseudorapidity.
        eta: f64,
    },
    /// Azimuth, pseudorapidity and event vertex of one particle.
    PhiEtaVertex {
        /// Azimuthal angle.
        phi: f64,
        /// Pseudorapidity.
        eta: f64,
        /// Event vertex position.
        vertex: f64,
    },
}

/// Emits the QA fills of one event. With `phi_correction` set the acceptance
/// maps (`PhiEta`, `PhiEtaVertex`) are skipped.
pub fn emit_qa<S: FlowSink + ?Sized>(sample: &ParticleSample, context: &EventContext, sink: &mut S) {
    sink.emit(Emission::Qa(QaFill::Centrality {
        value: context.centrality,
    }));
    sink.emit(Emission::Qa(QaFill::Vertex {
        value: context.vertex,
    }));
    sink.emit(Emission::Qa(QaFill::TrackCount {
        count: sample.len(),
    }));
    let acceptance_maps = !context.flags.phi_correction;
    for particle in sample.particles() {
        sink.emit(Emission::Qa(QaFill::Phi {
            phi: particle.phi,
            eta: particle.eta,
            tag: particle.tag,
        }));
        if acceptance_maps {
            sink.emit(Emission::Qa(QaFill::PhiEta {
                phi: particle.phi,
                eta: particle.eta,
            }));
            sink.emit(Emission::Qa(QaFill::PhiEtaVertex {
                phi: particle.phi,
                eta: particle.eta,
                vertex: context.vertex,
            }));
        }
    }
}
