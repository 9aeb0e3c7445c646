//! Profile accumulator: the aggregating sink used by the drivers.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use fluc_core::{ErrorInfo, FlucError, Subevent};
use serde::{Deserialize, Serialize};

use crate::emit::{Emission, FlowSink};
use crate::ids::ObservableKey;
use crate::qa::QaFill;
use crate::stat::{Histogram, Histogram2, Histogram3, Profile};

fn accumulator_error(code: &str, message: impl Into<String>) -> FlucError {
    FlucError::Config(ErrorInfo::new(code, message))
}

fn default_edges() -> Vec<f64> {
    vec![0.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 100.1]
}

/// Variable-width centrality binning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralityAxis {
    /// Strictly increasing bin edges.
    #[serde(default = "default_edges")]
    pub edges: Vec<f64>,
}

impl Default for CentralityAxis {
    fn default() -> Self {
        Self {
            edges: default_edges(),
        }
    }
}

impl CentralityAxis {
    /// Checks that the axis has at least one bin and increasing edges.
    pub fn validate(&self) -> Result<(), FlucError> {
        let increasing = self.edges.windows(2).all(|pair| pair[0] < pair[1]);
        if self.edges.len() < 2 || !increasing || self.edges.iter().any(|edge| !edge.is_finite())
        {
            return Err(FlucError::Config(
                ErrorInfo::new(
                    "centrality-axis",
                    "centrality edges must be finite and strictly increasing",
                )
                .with_context("edges", format!("{:?}", self.edges)),
            ));
        }
        Ok(())
    }

    /// Number of bins.
    pub fn bins(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Bin of a centrality value, `None` outside the axis.
    pub fn bin(&self, centrality: f64) -> Option<usize> {
        if self.bins() == 0 || centrality.is_nan() || centrality < self.edges[0] {
            return None;
        }
        let bin = self.edges.partition_point(|edge| *edge <= centrality);
        (bin < self.edges.len()).then(|| bin - 1)
    }

    /// `(low, high)` edges of a bin.
    pub fn range(&self, bin: usize) -> (f64, f64) {
        (self.edges[bin], self.edges[bin + 1])
    }
}

/// QA histograms filled from [`QaFill`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaHistograms {
    /// Per-particle azimuth, all tags.
    pub phi: Histogram,
    /// Per-particle azimuth of subevent A particles.
    pub phi_a: Histogram,
    /// Per-particle azimuth of subevent B particles.
    pub phi_b: Histogram,
    /// Per-particle pseudorapidity.
    pub eta: Histogram,
    /// Azimuth versus pseudorapidity acceptance map.
    pub phi_eta: Histogram2,
    /// Azimuth, pseudorapidity and vertex acceptance map.
    pub phi_eta_vertex: Histogram3,
    /// Event centrality.
    pub centrality: Histogram,
    /// Event vertex.
    pub vertex: Histogram,
    /// Particles per event.
    pub tracks: Histogram,
}

impl Default for QaHistograms {
    fn default() -> Self {
        let phi = Histogram::uniform(-PI, PI, 50);
        Self {
            phi_a: phi.clone(),
            phi_b: phi.clone(),
            phi,
            eta: Histogram::uniform(-2.0, 2.0, 40),
            phi_eta: Histogram2::uniform((-PI, PI, 50), (-2.0, 2.0, 40)),
            phi_eta_vertex: Histogram3::uniform(
                (-PI, PI, 50),
                (-2.0, 2.0, 40),
                (-10.0, 10.0, 20),
            ),
            centrality: Histogram::uniform(0.0, 100.0, 200),
            vertex: Histogram::uniform(-20.0, 20.0, 400),
            tracks: Histogram::uniform(0.0, 5000.0, 100),
        }
    }
}

impl QaHistograms {
    fn fill(&mut self, fill: &QaFill) {
        match *fill {
            QaFill::Centrality { value } => self.centrality.fill(value),
            QaFill::Vertex { value } => self.vertex.fill(value),
            QaFill::TrackCount { count } => self.tracks.fill(count as f64),
            QaFill::Phi { phi, eta, tag } => {
                self.phi.fill(phi);
                self.eta.fill(eta);
                match tag.subevent() {
                    Some(Subevent::A) => self.phi_a.fill(phi),
                    Some(Subevent::B) => self.phi_b.fill(phi),
                    None => {}
                }
            }
            QaFill::PhiEta { phi, eta } => self.phi_eta.fill(phi, eta),
            QaFill::PhiEtaVertex { phi, eta, vertex } => {
                self.phi_eta_vertex.fill(phi, eta, vertex)
            }
        }
    }

    fn merge(&mut self, other: &QaHistograms) -> bool {
        self.phi.merge(&other.phi)
            & self.phi_a.merge(&other.phi_a)
            & self.phi_b.merge(&other.phi_b)
            & self.eta.merge(&other.eta)
            & self.phi_eta.merge(&other.phi_eta)
            & self.phi_eta_vertex.merge(&other.phi_eta_vertex)
            & self.centrality.merge(&other.centrality)
            & self.vertex.merge(&other.vertex)
            & self.tracks.merge(&other.tracks)
    }
}

/// Sink aggregating weighted moments per observable and centrality bin.
///
/// Emissions whose centrality lies outside the axis are counted but not
/// binned.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileAccumulator {
    axis: CentralityAxis,
    profiles: BTreeMap<ObservableKey, Vec<Profile>>,
    qa: QaHistograms,
    events: u64,
    out_of_range: u64,
}

impl ProfileAccumulator {
    /// Empty accumulator over the given axis.
    pub fn new(axis: CentralityAxis) -> Self {
        Self {
            axis,
            profiles: BTreeMap::new(),
            qa: QaHistograms::default(),
            events: 0,
            out_of_range: 0,
        }
    }

    /// Centrality axis.
    pub fn axis(&self) -> &CentralityAxis {
        &self.axis
    }

    /// Number of events seen (one centrality QA fill per event).
    pub fn events(&self) -> u64 {
        self.events
    }

    /// Observable emissions dropped because their centrality was off-axis.
    pub fn out_of_range(&self) -> u64 {
        self.out_of_range
    }

    /// Profile of one observable in one centrality bin.
    pub fn profile(&self, key: &ObservableKey, bin: usize) -> Option<&Profile> {
        self.profiles.get(key).and_then(|bins| bins.get(bin))
    }

    /// QA histograms.
    pub fn qa(&self) -> &QaHistograms {
        &self.qa
    }

    /// Adds another accumulator over the same axis.
    pub fn merge(&mut self, other: &ProfileAccumulator) -> Result<(), FlucError> {
        if self.axis != other.axis {
            return Err(accumulator_error(
                "axis-mismatch",
                "accumulators over different centrality axes cannot be merged",
            ));
        }
        if !self.qa.merge(&other.qa) {
            return Err(accumulator_error(
                "qa-mismatch",
                "QA histograms with different binning cannot be merged",
            ));
        }
        let bins = self.axis.bins();
        for (key, profiles) in &other.profiles {
            let own = self
                .profiles
                .entry(*key)
                .or_insert_with(|| vec![Profile::default(); bins]);
            for (mine, theirs) in own.iter_mut().zip(profiles) {
                mine.merge(theirs);
            }
        }
        self.events += other.events;
        self.out_of_range += other.out_of_range;
        Ok(())
    }

    /// Serializable summary of every profile.
    pub fn summary(&self) -> FlowSummary {
        let observables = self
            .profiles
            .iter()
            .map(|(key, profiles)| {
                let bins = profiles
                    .iter()
                    .enumerate()
                    .filter(|(_, profile)| profile.entries > 0)
                    .map(|(bin, profile)| {
                        let (low, high) = self.axis.range(bin);
                        BinSummary {
                            bin,
                            low,
                            high,
                            entries: profile.entries,
                            sum_weights: profile.sum_w,
                            mean: profile.mean(),
                            std_error: profile.std_error(),
                        }
                    })
                    .collect();
                (key.label(), bins)
            })
            .collect();
        FlowSummary {
            centrality_edges: self.axis.edges.clone(),
            events: self.events,
            out_of_range: self.out_of_range,
            observables,
            qa: self.qa.clone(),
        }
    }
}

impl FlowSink for ProfileAccumulator {
    fn emit(&mut self, emission: Emission) {
        let (key, (centrality, value, weight)) = match emission {
            Emission::Qa(fill) => {
                if matches!(fill, QaFill::Centrality { .. }) {
                    self.events += 1;
                }
                self.qa.fill(&fill);
                return;
            }
            other => match (other.key(), other.sample()) {
                (Some(key), Some(sample)) => (key, sample),
                _ => return,
            },
        };
        let Some(bin) = self.axis.bin(centrality) else {
            self.out_of_range += 1;
            return;
        };
        let bins = self.axis.bins();
        self.profiles
            .entry(key)
            .or_insert_with(|| vec![Profile::default(); bins])[bin]
            .fill(value, weight);
    }
}

/// Weighted mean of one observable in one centrality bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinSummary {
    /// Centrality bin index.
    pub bin: usize,
    /// Lower bin edge.
    pub low: f64,
    /// Upper bin edge.
    pub high: f64,
    /// Number of fills.
    pub entries: u64,
    /// Sum of event weights.
    pub sum_weights: f64,
    /// Weighted mean.
    pub mean: Option<f64>,
    /// Standard error of the weighted mean.
    pub std_error: Option<f64>,
}

/// Report of an accumulated run, keyed by [`ObservableKey::label`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSummary {
    /// Centrality axis edges.
    pub centrality_edges: Vec<f64>,
    /// Number of events.
    pub events: u64,
    /// Observable emissions outside the centrality axis.
    pub out_of_range: u64,
    /// Non-empty bins per observable.
    pub observables: BTreeMap<String, Vec<BinSummary>>,
    /// QA histograms.
    pub qa: QaHistograms,
}

impl FlowSummary {
    /// Summary of one observable in the bin containing `centrality`.
    pub fn lookup(&self, key: &ObservableKey, centrality: f64) -> Option<&BinSummary> {
        self.observables
            .get(&key.label())?
            .iter()
            .find(|bin| bin.low <= centrality && centrality < bin.high)
    }
}
