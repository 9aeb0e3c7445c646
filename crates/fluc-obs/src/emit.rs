//! Emission records and the sink capability the assembler writes into.

use serde::{Deserialize, Serialize};

use crate::ids::{MixedObservable, ObservableKey};
use crate::qa::QaFill;

/// One value produced by the assembler for one event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Emission {
    /// `(centrality, n, k, value, weight)`.
    Vn {
        /// Event centrality.
        centrality: f64,
        /// Harmonic.
        n: usize,
        /// Cumulant order.
        k: usize,
        /// Normalised correlator.
        value: f64,
        /// Event weight.
        weight: f64,
    },
    /// `(centrality, n, k, m, l, value, weight)`.
    VnVn {
        /// Event centrality.
        centrality: f64,
        /// First harmonic.
        n: usize,
        /// Order of the first harmonic.
        k: usize,
        /// Second harmonic.
        m: usize,
        /// Order of the second harmonic.
        l: usize,
        /// Normalised correlator.
        value: f64,
        /// Event weight.
        weight: f64,
    },
    /// `(centrality, value, weight)` of a named mixed-harmonic observable.
    Mixed {
        /// Event centrality.
        centrality: f64,
        /// Observable identifier.
        id: MixedObservable,
        /// Normalised correlator.
        value: f64,
        /// Event weight.
        weight: f64,
    },
    /// Full-event two-particle cumulant term.
    GenericTwo {
        /// Event centrality.
        centrality: f64,
        /// Harmonic.
        n: usize,
        /// Normalised correlator.
        value: f64,
        /// Event weight.
        weight: f64,
    },
    /// Full-event four-particle symmetric cumulant term.
    GenericFour {
        /// Event centrality.
        centrality: f64,
        /// First harmonic.
        n: usize,
        /// Second harmonic.
        m: usize,
        /// Normalised correlator.
        value: f64,
        /// Event weight.
        weight: f64,
    },
    /// Two-subevent two-particle term.
    GenericTwoGap {
        /// Event centrality.
        centrality: f64,
        /// Harmonic.
        n: usize,
        /// Normalised correlator.
        value: f64,
        /// Event weight.
        weight: f64,
    },
    /// Quality-assurance fill.
    Qa(QaFill),
}

impl Emission {
    /// Accumulation key, `None` for QA fills.
    pub fn key(&self) -> Option<ObservableKey> {
        match *self {
            Emission::Vn { n, k, .. } => Some(ObservableKey::Vn { n, k }),
            Emission::VnVn { n, k, m, l, .. } => Some(ObservableKey::VnVn { n, k, m, l }),
            Emission::Mixed { id, .. } => Some(ObservableKey::Mixed { id }),
            Emission::GenericTwo { n, .. } => Some(ObservableKey::GenericTwo { n }),
            Emission::GenericFour { n, m, .. } => Some(ObservableKey::GenericFour { n, m }),
            Emission::GenericTwoGap { n, .. } => Some(ObservableKey::GenericTwoGap { n }),
            Emission::Qa(_) => None,
        }
    }

    /// `(centrality, value, weight)` of an observable emission, `None` for QA fills.
    pub fn sample(&self) -> Option<(f64, f64, f64)> {
        match *self {
            Emission::Vn {
                centrality,
                value,
                weight,
                ..
            }
            | Emission::VnVn {
                centrality,
                value,
                weight,
                ..
            }
            | Emission::Mixed {
                centrality,
                value,
                weight,
                ..
            }
            | Emission::GenericTwo {
                centrality,
                value,
                weight,
                ..
            }
            | Emission::GenericFour {
                centrality,
                value,
                weight,
                ..
            }
            | Emission::GenericTwoGap {
                centrality,
                value,
                weight,
                ..
            } => Some((centrality, value, weight)),
            Emission::Qa(_) => None,
        }
    }
}

/// Receiver of assembler output.
///
/// The assembler never aggregates; repeated emissions of one observable
/// across events are summed by the sink.
pub trait FlowSink {
    /// Receives one emission.
    fn emit(&mut self, emission: Emission);
}

impl<S: FlowSink + ?Sized> FlowSink for &mut S {
    fn emit(&mut self, emission: Emission) {
        (**self).emit(emission)
    }
}

/// Sink collecting every emission in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySink {
    emissions: Vec<Emission>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emissions received so far.
    pub fn emissions(&self) -> &[Emission] {
        &self.emissions
    }

    /// Consumes the sink and returns the emissions.
    pub fn into_emissions(self) -> Vec<Emission> {
        self.emissions
    }

    /// Observable emissions with the given key.
    pub fn with_key(&self, key: ObservableKey) -> impl Iterator<Item = &Emission> + '_ {
        self.emissions
            .iter()
            .filter(move |emission| emission.key() == Some(key))
    }

    /// QA fills received so far.
    pub fn qa_fills(&self) -> impl Iterator<Item = &QaFill> + '_ {
        self.emissions.iter().filter_map(|emission| match emission {
            Emission::Qa(fill) => Some(fill),
            _ => None,
        })
    }
}

impl FlowSink for MemorySink {
    fn emit(&mut self, emission: Emission) {
        self.emissions.push(emission);
    }
}
