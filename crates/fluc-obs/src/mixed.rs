//! Mixed-harmonic observables of one gap selector.
//!
//! The selector side carries the high harmonic, the complementary side the
//! conjugated low harmonics. Raw products reuse single-particle Q-vectors on
//! the complementary side and keep its self-correlations; corrected products
//! use the gap correlators.

use fluc_core::Subevent;
use fluc_corr::{Complex64, GapPair, ReferenceLadder, ReferenceTerms};

use crate::emit::{Emission, FlowSink};
use crate::ids::MixedObservable as Id;

pub(crate) fn emit_mixed<S: FlowSink + ?Sized>(
    pair: &GapPair<'_>,
    i: Subevent,
    centrality: f64,
    terms: &ReferenceTerms,
    ladder: &ReferenceLadder,
    ebe: bool,
    sink: &mut S,
) {
    let mut put = |id: Id, value: Complex64, weight: f64| {
        sink.emit(Emission::Mixed {
            centrality,
            id,
            value: value.re,
            weight,
        });
    };
    let ebe_weight = |reference: f64| if ebe { reference } else { 1.0 };

    let own = |n: i32| pair.side(i).q(n, 1);
    let star = |n: i32| pair.side(i.complement()).q(n, 1).conj();

    let ref_3p = terms.three;
    let ref_4p_b = terms.four_13;
    let w_3p = ebe_weight(ref_3p);
    let w_4p_b = ebe_weight(ref_4p_b);
    let w_4p = ladder.weight(1);

    let v2_two = pair.two(i, 2, 2) / ladder.reference(0);
    let v2_four = pair.two(i, 2, 2).powi(2) / ladder.reference(1);
    let v3_two = pair.two(i, 3, 3) / ladder.reference(0);

    let v4v2v2 = own(4) * star(2) * star(2) / ref_3p;
    put(Id::V4V2Star2, v4v2v2, w_3p);
    put(Id::V4V2Star2TimesV2Two, v4v2v2 * v2_two, 1.0);
    put(Id::V4V2Star2TimesV2Four, v4v2v2 * v2_four, 1.0);

    let v5v2v3 = own(5) * star(2) * star(3) / ref_3p;
    put(Id::V5V2StarV3Star, v5v2v3, w_3p);
    put(Id::V5V2StarV3StarTimesV2Two, v5v2v3 * v2_two, 1.0);
    put(Id::V5V2StarV3StarTimesV3Two, v5v2v3 * v3_two, 1.0);

    put(Id::V6V2Star3, own(6) * star(2).powi(3) / ref_4p_b, w_4p_b);
    put(Id::V6V3Star2, own(6) * star(3).powi(2) / ref_3p, w_3p);
    put(Id::V6V2StarV4Star, own(6) * star(2) * star(4) / ref_3p, w_3p);
    put(
        Id::V7V2Star2V3Star,
        own(7) * star(2).powi(2) * star(3) / ref_4p_b,
        w_4p_b,
    );
    put(Id::V7V2StarV5Star, own(7) * star(2) * star(5) / ref_3p, w_3p);
    put(Id::V7V3StarV4Star, own(7) * star(3) * star(4) / ref_3p, w_3p);
    put(
        Id::V8V2StarV3Star2,
        own(8) * star(2) * star(3).powi(2) / ref_4p_b,
        w_4p_b,
    );

    put(Id::CorrectedV4V2Star2, pair.three(i, 4, 2, 2) / ref_3p, w_3p);
    put(Id::CorrectedV5V2StarV3Star, pair.three(i, 5, 2, 3) / ref_3p, w_3p);
    put(Id::CorrectedV6V2Star3, pair.four_13(i, 6, 2, 2, 2) / ref_4p_b, w_4p_b);
    put(Id::CorrectedV6V3Star2, pair.three(i, 6, 3, 3) / ref_3p, w_3p);
    put(Id::CorrectedV6V2StarV4Star, pair.three(i, 6, 2, 4) / ref_3p, w_3p);
    put(
        Id::CorrectedV7V2Star2V3Star,
        pair.four_13(i, 7, 2, 2, 3) / ref_4p_b,
        w_4p_b,
    );
    put(Id::CorrectedV7V2StarV5Star, pair.three(i, 7, 2, 5) / ref_3p, w_3p);
    put(Id::CorrectedV7V3StarV4Star, pair.three(i, 7, 3, 4) / ref_3p, w_3p);
    put(
        Id::CorrectedV8V2StarV3Star2,
        pair.four_13(i, 8, 2, 3, 3) / ref_4p_b,
        w_4p_b,
    );

    // The 1+4 reference is only available when the tables carry power 4,
    // which every configuration with mixed harmonics guarantees.
    if let Some(ref_5p) = terms.five_14 {
        let w_5p = ebe_weight(ref_5p);
        put(Id::V8V2Star4, own(8) * star(2).powi(4) / ref_5p, w_5p);
        put(
            Id::CorrectedV8V2Star4,
            pair.five_14(i, 8, 2, 2, 2, 2) / ref_5p,
            w_5p,
        );
    }

    let ref_4p = ladder.reference(1);
    for (id, n, m) in [
        (Id::CorrectedV4V4V2V2, 4, 2),
        (Id::CorrectedV3V3V2V2, 3, 2),
        (Id::CorrectedV5V5V2V2, 5, 2),
        (Id::CorrectedV5V5V3V3, 5, 3),
        (Id::CorrectedV4V4V3V3, 4, 3),
    ] {
        put(id, pair.four_22(i, n, m, n, m) / ref_4p, w_4p);
    }
}
