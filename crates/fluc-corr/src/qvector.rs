//! Flow-vector (Q-vector) tables.
//!
//! `Q(n, k) = sum_i w_i^k exp(i n phi_i)` is stored for `n = 0..harmonics`
//! and `k = 0..powers` in one flat row-major buffer. Negative harmonics are
//! never stored; [`QVectorTable::q`] derives them as complex conjugates.

use fluc_core::{ParticleSample, Subevent, TableBounds};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Dense Q-vector table of one scope (full event or one subevent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QVectorTable {
    bounds: TableBounds,
    values: Vec<Complex64>,
}

impl QVectorTable {
    /// All-zero table, the Q-vectors of an empty scope.
    pub fn zeros(bounds: TableBounds) -> Self {
        Self {
            bounds,
            values: vec![Complex64::new(0.0, 0.0); bounds.len()],
        }
    }

    /// Table extents.
    pub fn bounds(&self) -> TableBounds {
        self.bounds
    }

    #[inline]
    fn index(&self, n: usize, k: usize) -> usize {
        assert!(
            n < self.bounds.harmonics && k < self.bounds.powers,
            "Q({n}, {k}) outside validated table bounds {:?}",
            self.bounds
        );
        n * self.bounds.powers + k
    }

    /// Adds one particle to every harmonic and power.
    pub fn accumulate(&mut self, phi: f64, weight: f64) {
        let powers = self.bounds.powers;
        for n in 0..self.bounds.harmonics {
            let phase = Complex64::from_polar(1.0, n as f64 * phi);
            let row = &mut self.values[n * powers..(n + 1) * powers];
            let mut weight_power = 1.0;
            for entry in row.iter_mut() {
                *entry += phase * weight_power;
                weight_power *= weight;
            }
        }
    }

    /// Looks up `Q(n, k)`, resolving negative harmonics through
    /// `Q(-n, k) = conj(Q(n, k))`.
    ///
    /// Lookups outside the validated bounds are programming errors and panic.
    #[inline]
    pub fn q(&self, n: i32, k: usize) -> Complex64 {
        let value = self.values[self.index(n.unsigned_abs() as usize, k)];
        if n < 0 {
            value.conj()
        } else {
            value
        }
    }

    /// Weighted multiplicity `Re Q(0, 1)`.
    pub fn multiplicity(&self) -> f64 {
        self.q(0, 1).re
    }

    /// Unweighted particle count `Re Q(0, 0)`.
    pub fn count(&self) -> f64 {
        self.q(0, 0).re
    }
}

/// Builds the full-event table: every particle of the sample contributes.
pub fn build(sample: &ParticleSample, bounds: TableBounds) -> QVectorTable {
    let mut table = QVectorTable::zeros(bounds);
    for particle in sample.particles() {
        table.accumulate(particle.phi, particle.weight);
    }
    table
}

/// Builds the two subevent tables, indexed by [`Subevent::index`].
/// Unassigned particles contribute to neither.
pub fn build_gap(sample: &ParticleSample, bounds: TableBounds) -> [QVectorTable; 2] {
    let mut tables = [QVectorTable::zeros(bounds), QVectorTable::zeros(bounds)];
    for particle in sample.particles() {
        if let Some(subevent) = particle.tag.subevent() {
            tables[subevent.index()].accumulate(particle.phi, particle.weight);
        }
    }
    tables
}

/// Q-vector tables of one event: the full event plus both subevents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventQVectors {
    /// Full-event table.
    pub full: QVectorTable,
    /// Subevent tables indexed by [`Subevent::index`].
    pub gap: [QVectorTable; 2],
}

impl EventQVectors {
    /// Fills all three tables in a single pass over the sample.
    pub fn build(sample: &ParticleSample, bounds: TableBounds) -> Self {
        let mut full = QVectorTable::zeros(bounds);
        let mut gap = [QVectorTable::zeros(bounds), QVectorTable::zeros(bounds)];
        for particle in sample.particles() {
            full.accumulate(particle.phi, particle.weight);
            if let Some(subevent) = particle.tag.subevent() {
                gap[subevent.index()].accumulate(particle.phi, particle.weight);
            }
        }
        Self { full, gap }
    }

    /// Table of one subevent.
    pub fn subevent(&self, subevent: Subevent) -> &QVectorTable {
        &self.gap[subevent.index()]
    }
}
