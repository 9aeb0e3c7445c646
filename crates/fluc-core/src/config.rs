//! Analysis configuration, behaviour flags and Q-vector table bounds.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, FlucError};
use crate::sample::{EtaWindow, Subevent};

/// Lowest harmonic analysed by the assembler.
pub const MIN_HARMONIC: usize = 2;
/// Largest harmonic touched by the mixed-harmonic observable family (`v8`).
pub const MIXED_MAX_HARMONIC: usize = 8;
/// Largest harmonic bound accepted for `max_harmonic`.
pub const MAX_SUPPORTED_HARMONIC: usize = 32;
/// Largest cumulant order bound accepted for `max_order`.
pub const MAX_SUPPORTED_ORDER: usize = 16;

fn config_error(code: &str, message: impl Into<String>) -> FlucError {
    FlucError::Config(ErrorInfo::new(code, message))
}

fn default_max_harmonic() -> usize {
    9
}

fn default_max_cross_harmonic() -> usize {
    6
}

fn default_max_order() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_floor() -> f64 {
    1.0
}

/// Behaviour flags selecting processing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FlucFlags {
    /// Weight every emission by its reference term instead of 1.
    #[serde(default)]
    pub ebe_weighting: bool,
    /// Acceptance is corrected per bin downstream; suppresses the
    /// `(phi, eta)` and `(phi, eta, vertex)` QA fills.
    #[serde(default)]
    pub phi_correction: bool,
}

impl FlucFlags {
    /// Bit for event-by-event reference weighting.
    pub const EBE_WEIGHTING: u32 = 0x1;
    /// Bit for the per-bin phi correction mode.
    pub const PHI_CORRECTION: u32 = 0x2;

    /// Decodes a flags bitmask. Unknown bits are ignored.
    pub fn from_bits(bits: u32) -> Self {
        Self {
            ebe_weighting: bits & Self::EBE_WEIGHTING != 0,
            phi_correction: bits & Self::PHI_CORRECTION != 0,
        }
    }

    /// Encodes the flags as a bitmask.
    pub fn bits(&self) -> u32 {
        let mut bits = 0;
        if self.ebe_weighting {
            bits |= Self::EBE_WEIGHTING;
        }
        if self.phi_correction {
            bits |= Self::PHI_CORRECTION;
        }
        bits
    }
}

/// Selects which subevent acts as the non-conjugated side of the gap
/// correlators. Both selectors are processed by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubeventMask {
    /// Process selector A (A non-conjugated, B conjugated).
    #[serde(default = "default_true")]
    pub a: bool,
    /// Process selector B (B non-conjugated, A conjugated).
    #[serde(default = "default_true")]
    pub b: bool,
}

impl Default for SubeventMask {
    fn default() -> Self {
        Self { a: true, b: true }
    }
}

impl SubeventMask {
    /// Bit enabling selector A.
    pub const A: u32 = 0x1;
    /// Bit enabling selector B.
    pub const B: u32 = 0x2;

    /// Decodes a subevent bitmask.
    pub fn from_bits(bits: u32) -> Self {
        Self {
            a: bits & Self::A != 0,
            b: bits & Self::B != 0,
        }
    }

    /// Encodes the mask as bits.
    pub fn bits(&self) -> u32 {
        (if self.a { Self::A } else { 0 }) | (if self.b { Self::B } else { 0 })
    }

    /// Returns whether the given selector is enabled.
    pub fn enabled(&self, selector: Subevent) -> bool {
        match selector {
            Subevent::A => self.a,
            Subevent::B => self.b,
        }
    }

    /// Iterates over the enabled selectors in A, B order.
    pub fn selectors(&self) -> impl Iterator<Item = Subevent> + '_ {
        Subevent::BOTH
            .into_iter()
            .filter(move |selector| self.enabled(*selector))
    }
}

/// Lower bound applied to reference terms and ladder factors.
///
/// Events with very few particles in a subevent produce zero or negative
/// pair/triple counts. Clipping them at `floor` keeps every normalisation
/// finite at the cost of a bias for extremely low multiplicity events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipPolicy {
    /// Minimum value of any reference term or ladder factor.
    #[serde(default = "default_floor")]
    pub floor: f64,
}

impl Default for ClipPolicy {
    fn default() -> Self {
        Self {
            floor: default_floor(),
        }
    }
}

impl ClipPolicy {
    /// Clips a value at the configured floor.
    pub fn clip(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.floor;
        }
        value.max(self.floor)
    }
}

/// Dense Q-vector table extents.
///
/// `harmonics` is the exclusive upper bound on `|n|`, `powers` the exclusive
/// upper bound on the weight power `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBounds {
    /// Number of stored harmonics `n = 0..harmonics`.
    pub harmonics: usize,
    /// Number of stored weight powers `k = 0..powers`.
    pub powers: usize,
}

impl TableBounds {
    /// Total number of complex entries in one table.
    pub fn len(&self) -> usize {
        self.harmonics * self.powers
    }

    /// Returns true when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns whether `Q(n, k)` can be looked up.
    pub fn contains(&self, n: i32, k: usize) -> bool {
        (n.unsigned_abs() as usize) < self.harmonics && k < self.powers
    }
}

/// Fixed configuration of the flow analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Harmonics `2..max_harmonic` receive single-harmonic observables.
    #[serde(default = "default_max_harmonic")]
    pub max_harmonic: usize,
    /// Harmonics `2..max_cross_harmonic` act as the second harmonic of
    /// `vn·vm` products.
    #[serde(default = "default_max_cross_harmonic")]
    pub max_cross_harmonic: usize,
    /// Cumulant orders `1..max_order` are emitted.
    #[serde(default = "default_max_order")]
    pub max_order: usize,
    /// Default behaviour flags copied into every event context.
    #[serde(default)]
    pub flags: FlucFlags,
    /// Default subevent selectors copied into every event context.
    #[serde(default)]
    pub subevents: SubeventMask,
    /// Reference term clipping policy.
    #[serde(default)]
    pub clip: ClipPolicy,
    /// Pseudorapidity windows used to tag subevents.
    #[serde(default)]
    pub eta_window: EtaWindow,
    /// Emit the mixed-harmonic observable family.
    #[serde(default = "default_true")]
    pub mixed_harmonics: bool,
    /// Emit generic (non-gap) cumulants from the full-event table.
    #[serde(default)]
    pub generic_cumulants: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            max_harmonic: default_max_harmonic(),
            max_cross_harmonic: default_max_cross_harmonic(),
            max_order: default_max_order(),
            flags: FlucFlags::default(),
            subevents: SubeventMask::default(),
            clip: ClipPolicy::default(),
            eta_window: EtaWindow::default(),
            mixed_harmonics: true,
            generic_cumulants: false,
        }
    }
}

impl FlowConfig {
    /// Parses a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, FlucError> {
        serde_yaml::from_str(text)
            .map_err(|err| FlucError::Serde(ErrorInfo::new("yaml_deserialize", err.to_string())))
    }

    /// Loads a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, FlucError> {
        let text = fs::read_to_string(path).map_err(|err| {
            FlucError::Io(
                ErrorInfo::new("config_read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Self::from_yaml_str(&text)
    }

    /// Validates the configuration and returns the Q-vector table extents
    /// every correlator lookup of the analysis fits into.
    pub fn validate(&self) -> Result<TableBounds, FlucError> {
        if self.max_harmonic <= MIN_HARMONIC || self.max_harmonic > MAX_SUPPORTED_HARMONIC {
            return Err(FlucError::Config(
                ErrorInfo::new(
                    "harmonic-range",
                    "max_harmonic must leave at least harmonic 2 in range",
                )
                .with_context("max_harmonic", self.max_harmonic)
                .with_context("limit", MAX_SUPPORTED_HARMONIC),
            ));
        }
        if self.max_cross_harmonic < MIN_HARMONIC || self.max_cross_harmonic > self.max_harmonic
        {
            return Err(FlucError::Config(
                ErrorInfo::new(
                    "cross-harmonic-range",
                    "max_cross_harmonic must lie in [2, max_harmonic]",
                )
                .with_context("max_cross_harmonic", self.max_cross_harmonic)
                .with_context("max_harmonic", self.max_harmonic),
            ));
        }
        if self.max_order < 2 || self.max_order > MAX_SUPPORTED_ORDER {
            return Err(FlucError::Config(
                ErrorInfo::new("order-range", "max_order must allow at least order 1")
                    .with_context("max_order", self.max_order)
                    .with_context("limit", MAX_SUPPORTED_ORDER),
            ));
        }
        if !self.clip.floor.is_finite() || self.clip.floor <= 0.0 {
            return Err(FlucError::Config(
                ErrorInfo::new("clip-floor", "reference floor must be finite and positive")
                    .with_context("floor", self.clip.floor)
                    .with_hint("the default floor of 1.0 reproduces max(N - k, 1)"),
            ));
        }
        self.eta_window.validate()?;
        let bounds = self.table_bounds();
        tracing::debug!(
            harmonics = bounds.harmonics,
            powers = bounds.powers,
            mixed = self.mixed_harmonics,
            generic = self.generic_cumulants,
            "flow configuration validated"
        );
        Ok(bounds)
    }

    fn table_bounds(&self) -> TableBounds {
        let top = self.max_harmonic - 1;
        let cross_top = self.max_cross_harmonic - 1;
        // FourGap22(n, m, n, m) and TwoGap(n, n).
        let mut harmonics = 2 * top;
        if self.max_order > 3 {
            // SixGap33 with n on all six legs.
            harmonics = harmonics.max(3 * top);
        }
        if self.max_order > 2 && self.max_cross_harmonic > MIN_HARMONIC {
            harmonics = harmonics.max(2 * top + cross_top);
        }
        if self.mixed_harmonics {
            harmonics = harmonics.max(MIXED_MAX_HARMONIC);
        }
        let powers = if self.mixed_harmonics || self.generic_cumulants {
            5
        } else {
            4
        };
        TableBounds {
            harmonics: harmonics + 1,
            powers,
        }
    }

    /// Harmonics receiving single-harmonic observables.
    pub fn harmonics(&self) -> std::ops::Range<usize> {
        MIN_HARMONIC..self.max_harmonic
    }

    /// Harmonics used as the second factor of `vn·vm` products.
    pub fn cross_harmonics(&self) -> std::ops::Range<usize> {
        MIN_HARMONIC..self.max_cross_harmonic
    }

    /// Cumulant orders emitted per harmonic.
    pub fn orders(&self) -> std::ops::Range<usize> {
        1..self.max_order
    }
}

pub(crate) fn window_error(min: f64, max: f64) -> FlucError {
    config_error(
        "eta-window",
        format!("eta window requires 0 <= min < max, got min={min} max={max}"),
    )
}
