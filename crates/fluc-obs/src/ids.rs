//! Observable identifiers.

use serde::{Deserialize, Serialize};

/// Named mixed-harmonic observables.
///
/// Raw variants are plain Q-vector products normalised by the matching
/// reference term. Variants prefixed with `Corrected` use the gap
/// correlators and are free of self-correlations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixedObservable {
    /// `v4 v2*^2`.
    V4V2Star2,
    /// `v4 v2*^2` times `v2{2}`.
    V4V2Star2TimesV2Two,
    /// `v4 v2*^2` times `v2{4}`.
    V4V2Star2TimesV2Four,
    /// `v5 v2* v3*`.
    V5V2StarV3Star,
    /// `v5 v2* v3*` times `v2{2}`.
    V5V2StarV3StarTimesV2Two,
    /// `v5 v2* v3*` times `v3{2}`.
    V5V2StarV3StarTimesV3Two,
    /// `v6 v2*^3`.
    V6V2Star3,
    /// `v6 v3*^2`.
    V6V3Star2,
    /// `v6 v2* v4*`.
    V6V2StarV4Star,
    /// `v7 v2*^2 v3*`.
    V7V2Star2V3Star,
    /// `v7 v2* v5*`.
    V7V2StarV5Star,
    /// `v7 v3* v4*`.
    V7V3StarV4Star,
    /// `v8 v2* v3*^2`.
    V8V2StarV3Star2,
    /// `v8 v2*^4`.
    V8V2Star4,
    /// Corrected `v4 v2*^2`.
    CorrectedV4V2Star2,
    /// Corrected `v5 v2* v3*`.
    CorrectedV5V2StarV3Star,
    /// Corrected `v6 v2*^3`.
    CorrectedV6V2Star3,
    /// Corrected `v6 v3*^2`.
    CorrectedV6V3Star2,
    /// Corrected `v6 v2* v4*`.
    CorrectedV6V2StarV4Star,
    /// Corrected `v7 v2*^2 v3*`.
    CorrectedV7V2Star2V3Star,
    /// Corrected `v7 v2* v5*`.
    CorrectedV7V2StarV5Star,
    /// Corrected `v7 v3* v4*`.
    CorrectedV7V3StarV4Star,
    /// Corrected `v8 v2* v3*^2`.
    CorrectedV8V2StarV3Star2,
    /// Corrected `v8 v2*^4`.
    CorrectedV8V2Star4,
    /// `<v4^2 v2^2>` from the 2+2 correlator.
    CorrectedV4V4V2V2,
    /// `<v3^2 v2^2>` from the 2+2 correlator.
    CorrectedV3V3V2V2,
    /// `<v5^2 v2^2>` from the 2+2 correlator.
    CorrectedV5V5V2V2,
    /// `<v5^2 v3^2>` from the 2+2 correlator.
    CorrectedV5V5V3V3,
    /// `<v4^2 v3^2>` from the 2+2 correlator.
    CorrectedV4V4V3V3,
}

impl MixedObservable {
    /// Every identifier.
    pub const ALL: [MixedObservable; 29] = [
        MixedObservable::V4V2Star2,
        MixedObservable::V4V2Star2TimesV2Two,
        MixedObservable::V4V2Star2TimesV2Four,
        MixedObservable::V5V2StarV3Star,
        MixedObservable::V5V2StarV3StarTimesV2Two,
        MixedObservable::V5V2StarV3StarTimesV3Two,
        MixedObservable::V6V2Star3,
        MixedObservable::V6V3Star2,
        MixedObservable::V6V2StarV4Star,
        MixedObservable::V7V2Star2V3Star,
        MixedObservable::V7V2StarV5Star,
        MixedObservable::V7V3StarV4Star,
        MixedObservable::V8V2StarV3Star2,
        MixedObservable::V8V2Star4,
        MixedObservable::CorrectedV4V2Star2,
        MixedObservable::CorrectedV5V2StarV3Star,
        MixedObservable::CorrectedV6V2Star3,
        MixedObservable::CorrectedV6V3Star2,
        MixedObservable::CorrectedV6V2StarV4Star,
        MixedObservable::CorrectedV7V2Star2V3Star,
        MixedObservable::CorrectedV7V2StarV5Star,
        MixedObservable::CorrectedV7V3StarV4Star,
        MixedObservable::CorrectedV8V2StarV3Star2,
        MixedObservable::CorrectedV8V2Star4,
        MixedObservable::CorrectedV4V4V2V2,
        MixedObservable::CorrectedV3V3V2V2,
        MixedObservable::CorrectedV5V5V2V2,
        MixedObservable::CorrectedV5V5V3V3,
        MixedObservable::CorrectedV4V4V3V3,
    ];

    /// Stable short name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            MixedObservable::V4V2Star2 => "v4v2star_2",
            MixedObservable::V4V2Star2TimesV2Two => "v4v2star_2_v2_2",
            MixedObservable::V4V2Star2TimesV2Four => "v4v2star_2_v2_4",
            MixedObservable::V5V2StarV3Star => "v5v2starv3star",
            MixedObservable::V5V2StarV3StarTimesV2Two => "v5v2starv3star_v2_2",
            MixedObservable::V5V2StarV3StarTimesV3Two => "v5v2starv3star_v3_2",
            MixedObservable::V6V2Star3 => "v6v2star_3",
            MixedObservable::V6V3Star2 => "v6v3star_2",
            MixedObservable::V6V2StarV4Star => "v6v2starv4star",
            MixedObservable::V7V2Star2V3Star => "v7v2star_2v3star",
            MixedObservable::V7V2StarV5Star => "v7v2starv5star",
            MixedObservable::V7V3StarV4Star => "v7v3starv4star",
            MixedObservable::V8V2StarV3Star2 => "v8v2starv3star_2",
            MixedObservable::V8V2Star4 => "v8v2star_4",
            MixedObservable::CorrectedV4V2Star2 => "nv4v2star_2",
            MixedObservable::CorrectedV5V2StarV3Star => "nv5v2starv3star",
            MixedObservable::CorrectedV6V2Star3 => "nv6v2star_3",
            MixedObservable::CorrectedV6V3Star2 => "nv6v3star_2",
            MixedObservable::CorrectedV6V2StarV4Star => "nv6v2starv4star",
            MixedObservable::CorrectedV7V2Star2V3Star => "nv7v2star_2v3star",
            MixedObservable::CorrectedV7V2StarV5Star => "nv7v2starv5star",
            MixedObservable::CorrectedV7V3StarV4Star => "nv7v3starv4star",
            MixedObservable::CorrectedV8V2StarV3Star2 => "nv8v2starv3star_2",
            MixedObservable::CorrectedV8V2Star4 => "nv8v2star_4",
            MixedObservable::CorrectedV4V4V2V2 => "nv4v4v2v2",
            MixedObservable::CorrectedV3V3V2V2 => "nv3v3v2v2",
            MixedObservable::CorrectedV5V5V2V2 => "nv5v5v2v2",
            MixedObservable::CorrectedV5V5V3V3 => "nv5v5v3v3",
            MixedObservable::CorrectedV4V4V3V3 => "nv4v4v3v3",
        }
    }

    /// Whether the observable is computed from self-correlation free
    /// correlators.
    pub fn is_corrected(self) -> bool {
        self >= MixedObservable::CorrectedV4V2Star2
    }
}

/// Accumulation key of one emitted observable, independent of centrality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObservableKey {
    /// `v_n` of order `k` from the gap ladder.
    Vn {
        /// Harmonic.
        n: usize,
        /// Cumulant order.
        k: usize,
    },
    /// Two-harmonic product of orders `(k, l)`.
    VnVn {
        /// First harmonic.
        n: usize,
        /// Order of the first harmonic.
        k: usize,
        /// Second harmonic.
        m: usize,
        /// Order of the second harmonic.
        l: usize,
    },
    /// Named mixed-harmonic observable.
    Mixed {
        /// Observable identifier.
        id: MixedObservable,
    },
    /// Full-event `<2>_{n,-n}`.
    GenericTwo {
        /// Harmonic.
        n: usize,
    },
    /// Full-event `<4>_{n,m,-n,-m}`.
    GenericFour {
        /// First harmonic.
        n: usize,
        /// Second harmonic.
        m: usize,
    },
    /// Two-subevent `<2>` without higher orders.
    GenericTwoGap {
        /// Harmonic.
        n: usize,
    },
}

impl ObservableKey {
    /// Stable label used as the report key, e.g. `vn/2/1` or `mixed/nv4v2star_2`.
    pub fn label(&self) -> String {
        match self {
            ObservableKey::Vn { n, k } => format!("vn/{n}/{k}"),
            ObservableKey::VnVn { n, k, m, l } => format!("vnvn/{n}/{k}/{m}/{l}"),
            ObservableKey::Mixed { id } => format!("mixed/{}", id.name()),
            ObservableKey::GenericTwo { n } => format!("generic_two/{n}"),
            ObservableKey::GenericFour { n, m } => format!("generic_four/{n}/{m}"),
            ObservableKey::GenericTwoGap { n } => format!("generic_two_gap/{n}"),
        }
    }
}
