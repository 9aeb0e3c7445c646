//! Reference (normalisation) terms of the gap correlators.
//!
//! A reference term is the gap correlator evaluated at all-zero harmonics,
//! i.e. the weighted number of particle tuples the correlator sums over.

use fluc_core::{ClipPolicy, Subevent};
use serde::{Deserialize, Serialize};

use crate::gap::GapPair;

/// Reference terms of one gap selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTerms {
    /// `Re TwoGap(0, 0)`.
    pub two: f64,
    /// `Re ThreeGap(0, 0, 0)`.
    pub three: f64,
    /// `Re FourGap22(0, 0, 0, 0)`.
    pub four_22: f64,
    /// `Re FourGap13(0, 0, 0, 0)`.
    pub four_13: f64,
    /// `Re FiveGap14(0, ..., 0)`, present when the tables carry power 4.
    pub five_14: Option<f64>,
    /// `Re SixGap33(0, ..., 0)`.
    pub six_33: f64,
    /// Weighted multiplicity of subevent A.
    pub multiplicity_a: f64,
    /// Weighted multiplicity of subevent B.
    pub multiplicity_b: f64,
}

impl ReferenceTerms {
    /// Unclipped reference terms for selector `i`.
    pub fn raw(pair: &GapPair<'_>, i: Subevent) -> Self {
        let five_14 = (pair.side(i.complement()).bounds().powers > 4)
            .then(|| pair.five_14(i, 0, 0, 0, 0, 0).re);
        Self {
            two: pair.two(i, 0, 0).re,
            three: pair.three(i, 0, 0, 0).re,
            four_22: pair.four_22(i, 0, 0, 0, 0).re,
            four_13: pair.four_13(i, 0, 0, 0, 0).re,
            five_14,
            six_33: pair.six_33(i, [0; 6]).re,
            multiplicity_a: pair.multiplicity(Subevent::A),
            multiplicity_b: pair.multiplicity(Subevent::B),
        }
    }

    /// Reference terms for selector `i` with every term clipped at the
    /// policy floor.
    pub fn compute(pair: &GapPair<'_>, i: Subevent, clip: &ClipPolicy) -> Self {
        Self::raw(pair, i).clipped(clip)
    }

    /// Applies the clipping policy to every tuple count. Multiplicities are
    /// left untouched; the ladder clips its own factors.
    pub fn clipped(&self, clip: &ClipPolicy) -> Self {
        let clipped = Self {
            two: clip.clip(self.two),
            three: clip.clip(self.three),
            four_22: clip.clip(self.four_22),
            four_13: clip.clip(self.four_13),
            five_14: self.five_14.map(|value| clip.clip(value)),
            six_33: clip.clip(self.six_33),
            ..*self
        };
        if clipped != *self {
            tracing::debug!(
                n_a = self.multiplicity_a,
                n_b = self.multiplicity_b,
                floor = clip.floor,
                "reference terms clipped"
            );
        }
        clipped
    }
}

/// Normalisations `ref[k]` of the `2(k+1)`-particle correlators and the
/// matching per-event weights.
///
/// `ref[0..3]` are the 2+2-style gap references `(2p, 4p, 6p)`; higher
/// entries extend the ladder by
/// `ref[k] = ref[k-1] * max(N_A - k, floor) * max(N_B - k, floor)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLadder {
    refs: Vec<f64>,
    weights: Vec<f64>,
}

impl ReferenceLadder {
    /// Builds a ladder of `len` entries from clipped reference terms.
    /// With `ebe_weighting` the weights equal the references, otherwise 1.
    pub fn new(terms: &ReferenceTerms, len: usize, clip: &ClipPolicy, ebe_weighting: bool) -> Self {
        let mut refs = vec![terms.two, terms.four_22, terms.six_33];
        refs.truncate(len);
        for k in refs.len()..len {
            let dk = k as f64;
            let factor = clip.clip(terms.multiplicity_a - dk) * clip.clip(terms.multiplicity_b - dk);
            let previous = refs[k - 1];
            refs.push(previous * factor);
        }
        let weights = if ebe_weighting {
            refs.clone()
        } else {
            vec![1.0; len]
        };
        Self { refs, weights }
    }

    /// Reference term `ref[k]`.
    pub fn reference(&self, k: usize) -> f64 {
        self.refs[k]
    }

    /// Event weight accompanying `ref[k]`.
    pub fn weight(&self, k: usize) -> f64 {
        self.weights[k]
    }

    /// Number of ladder entries.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Whether the ladder is empty.
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// All reference terms in order.
    pub fn references(&self) -> &[f64] {
        &self.refs
    }
}
