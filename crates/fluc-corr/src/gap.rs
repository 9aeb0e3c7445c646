//! Two-subevent (eta-gap) correlators.
//!
//! The selector picks the subevent whose legs enter unconjugated; the legs of
//! the complementary subevent are conjugated. Particles of different
//! subevents never coincide, so self-correlations only need removing within
//! one side, which makes every correlator a product of per-side generic
//! correlators.

use fluc_core::Subevent;
use num_complex::Complex64;

use crate::generic::{four, three, two};
use crate::qvector::QVectorTable;

/// Read-only view over the pair of subevent tables of one event.
#[derive(Debug, Clone, Copy)]
pub struct GapPair<'a> {
    tables: &'a [QVectorTable; 2],
}

impl<'a> GapPair<'a> {
    /// Wraps the subevent tables indexed by [`Subevent::index`].
    pub fn new(tables: &'a [QVectorTable; 2]) -> Self {
        Self { tables }
    }

    /// Table of one subevent.
    pub fn side(&self, subevent: Subevent) -> &'a QVectorTable {
        &self.tables[subevent.index()]
    }

    /// Weighted multiplicity of one subevent.
    pub fn multiplicity(&self, subevent: Subevent) -> f64 {
        self.side(subevent).multiplicity()
    }

    /// `Q_i(a,1) conj(Q_j(b,1))`, one particle per side.
    pub fn two(&self, i: Subevent, a: i32, b: i32) -> Complex64 {
        self.side(i).q(a, 1) * self.side(i.complement()).q(b, 1).conj()
    }

    /// One particle from `i`, two distinct particles from the complement.
    pub fn three(&self, i: Subevent, a: i32, b: i32, c: i32) -> Complex64 {
        self.side(i).q(a, 1) * two(self.side(i.complement()), b, c).conj()
    }

    /// Two distinct particles per side (2+2 split).
    pub fn four_22(&self, i: Subevent, a: i32, b: i32, c: i32, d: i32) -> Complex64 {
        two(self.side(i), a, b) * two(self.side(i.complement()), c, d).conj()
    }

    /// One particle from `i`, three distinct particles from the complement
    /// (1+3 split).
    pub fn four_13(&self, i: Subevent, a: i32, b: i32, c: i32, d: i32) -> Complex64 {
        self.side(i).q(a, 1) * three(self.side(i.complement()), b, c, d).conj()
    }

    /// One particle from `i`, four distinct particles from the complement
    /// (1+4 split).
    #[allow(clippy::too_many_arguments)]
    pub fn five_14(&self, i: Subevent, a: i32, b: i32, c: i32, d: i32, e: i32) -> Complex64 {
        self.side(i).q(a, 1) * four(self.side(i.complement()), b, c, d, e).conj()
    }

    /// Three distinct particles per side (3+3 split). Harmonics `n[0..3]`
    /// belong to `i`, `n[3..6]` to the complement.
    pub fn six_33(&self, i: Subevent, n: [i32; 6]) -> Complex64 {
        three(self.side(i), n[0], n[1], n[2])
            * three(self.side(i.complement()), n[3], n[4], n[5]).conj()
    }
}
