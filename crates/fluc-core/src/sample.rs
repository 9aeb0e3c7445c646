//! Per-event particle samples and pseudorapidity subevent tagging.

use serde::{Deserialize, Serialize};

use crate::config::window_error;
use crate::errors::FlucError;

fn default_eta_min() -> f64 {
    0.4
}

fn default_eta_max() -> f64 {
    0.8
}

/// One of the two subevents of the gap method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subevent {
    /// Backward window, `-max < eta < -min`.
    A,
    /// Forward window, `min < eta < max`.
    B,
}

impl Subevent {
    /// Both subevents in selector order.
    pub const BOTH: [Subevent; 2] = [Subevent::A, Subevent::B];

    /// Index of the subevent in `[A, B]` arrays.
    pub fn index(self) -> usize {
        match self {
            Subevent::A => 0,
            Subevent::B => 1,
        }
    }

    /// The opposite subevent.
    pub fn complement(self) -> Subevent {
        match self {
            Subevent::A => Subevent::B,
            Subevent::B => Subevent::A,
        }
    }
}

/// Subevent tag of a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EtaTag {
    /// Contributes to subevent A.
    A,
    /// Contributes to subevent B.
    B,
    /// Contributes to the full-event scope only.
    #[default]
    Unassigned,
}

impl EtaTag {
    /// Subevent the tag maps onto, if any.
    pub fn subevent(self) -> Option<Subevent> {
        match self {
            EtaTag::A => Some(Subevent::A),
            EtaTag::B => Some(Subevent::B),
            EtaTag::Unassigned => None,
        }
    }
}

impl From<Subevent> for EtaTag {
    fn from(value: Subevent) -> Self {
        match value {
            Subevent::A => EtaTag::A,
            Subevent::B => EtaTag::B,
        }
    }
}

/// Track record delivered by the selection layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Azimuthal angle.
    pub phi: f64,
    /// Pseudorapidity.
    pub eta: f64,
    /// Acceptance/efficiency weight.
    pub weight: f64,
}

/// Particle record consumed by the Q-vector builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Azimuthal angle in `(-pi, pi]`.
    pub phi: f64,
    /// Non-negative particle weight.
    pub weight: f64,
    /// Pseudorapidity, carried for QA fills only.
    pub eta: f64,
    /// Subevent assignment.
    pub tag: EtaTag,
}

impl Particle {
    /// Unit-weight particle without eta information.
    pub fn new(phi: f64, tag: EtaTag) -> Self {
        Self {
            phi,
            weight: 1.0,
            eta: 0.0,
            tag,
        }
    }

    /// Sets the particle weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Pseudorapidity windows defining the two subevents.
///
/// The windows `(-max, -min)` and `(min, max)` are disjoint for any valid
/// window, which is what the gap correlators rely on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EtaWindow {
    /// Inner edge of both windows (half the gap).
    #[serde(default = "default_eta_min")]
    pub min: f64,
    /// Outer edge of both windows (acceptance).
    #[serde(default = "default_eta_max")]
    pub max: f64,
}

impl Default for EtaWindow {
    fn default() -> Self {
        Self {
            min: default_eta_min(),
            max: default_eta_max(),
        }
    }
}

impl EtaWindow {
    /// Checks `0 <= min < max`.
    pub fn validate(&self) -> Result<(), FlucError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min < 0.0 || self.min >= self.max
        {
            return Err(window_error(self.min, self.max));
        }
        Ok(())
    }

    /// Whether the track lies inside the analysis acceptance `|eta| < max`.
    pub fn accepts(&self, eta: f64) -> bool {
        eta.abs() < self.max
    }

    /// Subevent tag for a pseudorapidity inside the acceptance.
    pub fn tag(&self, eta: f64) -> EtaTag {
        if eta > -self.max && eta < -self.min {
            EtaTag::A
        } else if eta > self.min && eta < self.max {
            EtaTag::B
        } else {
            EtaTag::Unassigned
        }
    }
}

/// Immutable per-event particle collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParticleSample {
    particles: Vec<Particle>,
}

impl ParticleSample {
    /// Wraps pre-tagged particles. Disjointness of the A and B tags is the
    /// caller's responsibility and holds trivially here since every particle
    /// carries exactly one tag.
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    /// Builds a sample from tracks, dropping tracks outside the acceptance and
    /// tagging the rest through the eta window.
    pub fn from_tracks(tracks: &[Track], window: &EtaWindow) -> Self {
        let particles = tracks
            .iter()
            .filter(|track| window.accepts(track.eta))
            .map(|track| Particle {
                phi: track.phi,
                weight: track.weight,
                eta: track.eta,
                tag: window.tag(track.eta),
            })
            .collect();
        Self { particles }
    }

    /// Particles in insertion order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the sample is empty.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of particles tagged with the given subevent.
    pub fn count(&self, subevent: Subevent) -> usize {
        self.particles
            .iter()
            .filter(|particle| particle.tag.subevent() == Some(subevent))
            .count()
    }
}

impl FromIterator<Particle> for ParticleSample {
    fn from_iter<I: IntoIterator<Item = Particle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
