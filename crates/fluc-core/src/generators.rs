//! Toy flow-event generator used by the simulation driver and the tests.

use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, FlucError};
use crate::rng::RngHandle;
use crate::sample::{EtaWindow, ParticleSample, Track};

fn model_error(code: &str, message: impl Into<String>) -> FlucError {
    FlucError::Config(ErrorInfo::new(code, message))
}

fn default_multiplicity() -> usize {
    500
}

fn default_eta_max() -> f64 {
    0.8
}

/// Imposed flow magnitude for one harmonic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarmonicFlow {
    /// Harmonic order `n >= 1`.
    pub n: u32,
    /// Flow magnitude `v_n`.
    pub v: f64,
}

/// Azimuthal distribution `1 + 2 sum v_n cos(n (phi - psi_n))` with uniform
/// pseudorapidity and optional weight smearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowModel {
    /// Particles generated per event before acceptance cuts.
    #[serde(default = "default_multiplicity")]
    pub multiplicity: usize,
    /// Imposed harmonics. Empty means isotropic emission.
    #[serde(default)]
    pub harmonics: Vec<HarmonicFlow>,
    /// Tracks are generated with `|eta| < eta_max`.
    #[serde(default = "default_eta_max")]
    pub eta_max: f64,
    /// Weights are drawn uniformly from `[1 - s, 1 + s]`; zero gives unit weights.
    #[serde(default)]
    pub weight_spread: f64,
}

impl Default for FlowModel {
    fn default() -> Self {
        Self {
            multiplicity: default_multiplicity(),
            harmonics: Vec::new(),
            eta_max: default_eta_max(),
            weight_spread: 0.0,
        }
    }
}

impl FlowModel {
    /// Isotropic model with the given multiplicity.
    pub fn isotropic(multiplicity: usize) -> Self {
        Self {
            multiplicity,
            ..Self::default()
        }
    }

    /// Adds an imposed harmonic.
    pub fn with_flow(mut self, n: u32, v: f64) -> Self {
        self.harmonics.push(HarmonicFlow { n, v });
        self
    }

    /// Checks that the model describes a non-negative density.
    pub fn validate(&self) -> Result<(), FlucError> {
        let mut total = 0.0;
        for flow in &self.harmonics {
            if flow.n == 0 || !flow.v.is_finite() || flow.v < 0.0 {
                return Err(FlucError::Config(
                    ErrorInfo::new("flow-harmonic", "harmonics need n >= 1 and finite v >= 0")
                        .with_context("n", flow.n)
                        .with_context("v", flow.v),
                ));
            }
            total += flow.v;
        }
        if total > 0.5 {
            return Err(model_error(
                "flow-density",
                format!("sum of v_n must not exceed 0.5 for a positive density, got {total}"),
            ));
        }
        if !self.eta_max.is_finite() || self.eta_max <= 0.0 {
            return Err(model_error("flow-eta", "eta_max must be positive"));
        }
        if !(0.0..1.0).contains(&self.weight_spread) {
            return Err(model_error("flow-weights", "weight_spread must lie in [0, 1)"));
        }
        Ok(())
    }

    fn density(&self, phi: f64, planes: &[f64]) -> f64 {
        1.0 + 2.0
            * self
                .harmonics
                .iter()
                .zip(planes)
                .map(|(flow, psi)| flow.v * (flow.n as f64 * (phi - psi)).cos())
                .sum::<f64>()
    }

    fn density_bound(&self) -> f64 {
        1.0 + 2.0 * self.harmonics.iter().map(|flow| flow.v).sum::<f64>()
    }
}

fn wrap_phi(phi: f64) -> f64 {
    if phi <= -PI {
        phi + 2.0 * PI
    } else {
        phi
    }
}

/// Generates the tracks of one event. Symmetry planes are drawn uniformly
/// and independently per harmonic.
pub fn generate_tracks(model: &FlowModel, rng: &mut RngHandle) -> Vec<Track> {
    let planes: Vec<f64> = model
        .harmonics
        .iter()
        .map(|flow| rng.gen_range(-PI..PI) / flow.n as f64)
        .collect();
    let bound = model.density_bound();
    let mut tracks = Vec::with_capacity(model.multiplicity);
    while tracks.len() < model.multiplicity {
        let phi = wrap_phi(rng.gen_range(-PI..PI));
        if rng.gen::<f64>() * bound > model.density(phi, &planes) {
            continue;
        }
        let eta = rng.gen_range(-model.eta_max..model.eta_max);
        let weight = if model.weight_spread > 0.0 {
            rng.gen_range((1.0 - model.weight_spread)..(1.0 + model.weight_spread))
        } else {
            1.0
        };
        tracks.push(Track { phi, eta, weight });
    }
    tracks
}

/// Generates one event and tags it through the eta window.
pub fn generate_event(model: &FlowModel, window: &EtaWindow, rng: &mut RngHandle) -> ParticleSample {
    ParticleSample::from_tracks(&generate_tracks(model, rng), window)
}
