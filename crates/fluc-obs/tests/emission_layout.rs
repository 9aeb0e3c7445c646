use fluc_core::{
    generate_event, ClipPolicy, EtaWindow, EventContext, FlowConfig, FlowModel, FlucFlags,
    ParticleSample, RngHandle, Subevent, SubeventMask,
};
use fluc_corr::{generic, EventQVectors, GapPair, ReferenceLadder, ReferenceTerms};
use fluc_obs::{Emission, FlowAssembler, MemorySink, MixedObservable, ObservableKey, QaFill};

fn small_config() -> FlowConfig {
    FlowConfig {
        max_harmonic: 4,
        max_cross_harmonic: 3,
        max_order: 3,
        mixed_harmonics: false,
        ..FlowConfig::default()
    }
}

fn event(seed: u64, multiplicity: usize) -> ParticleSample {
    let model = FlowModel::isotropic(multiplicity).with_flow(2, 0.1);
    let mut rng = RngHandle::from_seed(seed);
    generate_event(&model, &EtaWindow::default(), &mut rng)
}

fn run(config: FlowConfig, sample: &ParticleSample, context: &EventContext) -> MemorySink {
    let assembler = FlowAssembler::new(config).expect("valid config");
    let mut sink = MemorySink::new();
    assembler.process_sample(sample, context, &mut sink);
    sink
}

fn single(sink: &MemorySink, key: ObservableKey) -> (f64, f64, f64) {
    let mut matches = sink.with_key(key).filter_map(Emission::sample);
    let first = matches.next().unwrap_or_else(|| panic!("{} not emitted", key.label()));
    assert!(matches.next().is_none(), "{} emitted twice", key.label());
    first
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= 1e-12 * (1.0 + expected.abs()),
        "{what}: {actual} vs {expected}"
    );
}

fn count(sink: &MemorySink, pred: impl Fn(&Emission) -> bool) -> usize {
    sink.emissions().iter().filter(|emission| pred(emission)).count()
}

#[test]
fn small_config_emission_counts() {
    let sample = event(1, 300);
    let sink = run(small_config(), &sample, &EventContext::new(12.0, 0.5));
    assert_eq!(count(&sink, |e| matches!(e, Emission::Vn { .. })), 2 * 2 * 2);
    assert_eq!(count(&sink, |e| matches!(e, Emission::VnVn { .. })), 2 * 2 * 2 * 2);
    assert_eq!(count(&sink, |e| matches!(e, Emission::Mixed { .. })), 0);
    assert_eq!(count(&sink, |e| matches!(e, Emission::GenericTwo { .. })), 0);
    assert_eq!(sink.qa_fills().count(), 3 + 3 * sample.len());
    for emission in sink.emissions() {
        if let Some((centrality, value, weight)) = emission.sample() {
            assert_eq!(centrality, 12.0);
            assert!(value.is_finite());
            assert_eq!(weight, 1.0);
        }
    }
}

#[test]
fn default_config_emits_every_family() {
    let sample = event(2, 400);
    let config = FlowConfig {
        generic_cumulants: true,
        ..FlowConfig::default()
    };
    let sink = run(config, &sample, &EventContext::new(35.0, -2.0));
    assert_eq!(count(&sink, |e| matches!(e, Emission::Vn { .. })), 2 * 7 * 4);
    assert_eq!(
        count(&sink, |e| matches!(e, Emission::VnVn { .. })),
        2 * 7 * 4 * 4 * 4
    );
    assert_eq!(
        count(&sink, |e| matches!(e, Emission::Mixed { .. })),
        2 * MixedObservable::ALL.len()
    );
    for id in MixedObservable::ALL {
        assert_eq!(sink.with_key(ObservableKey::Mixed { id }).count(), 2, "{id:?}");
    }
    assert_eq!(count(&sink, |e| matches!(e, Emission::GenericTwo { .. })), 7);
    assert_eq!(count(&sink, |e| matches!(e, Emission::GenericTwoGap { .. })), 7);
    assert_eq!(count(&sink, |e| matches!(e, Emission::GenericFour { .. })), 18);
    assert!(sink
        .emissions()
        .iter()
        .filter_map(Emission::sample)
        .all(|(_, value, weight)| value.is_finite() && weight.is_finite()));
}

#[test]
fn subevent_mask_selects_gap_selectors() {
    let sample = event(3, 300);
    let only_b = EventContext::new(5.0, 0.0).with_subevents(SubeventMask { a: false, b: true });
    let sink = run(small_config(), &sample, &only_b);
    assert_eq!(count(&sink, |e| matches!(e, Emission::Vn { .. })), 4);

    let qvecs = EventQVectors::build(&sample, FlowConfig::validate(&small_config()).expect("bounds"));
    let pair = GapPair::new(&qvecs.gap);
    let terms = ReferenceTerms::compute(&pair, Subevent::B, &ClipPolicy::default());
    let expected = pair.two(Subevent::B, 2, 2).re / terms.two;
    let first = sink
        .with_key(ObservableKey::Vn { n: 2, k: 1 })
        .next()
        .and_then(Emission::sample)
        .expect("v2{2} emitted");
    assert!((first.1 - expected).abs() < 1e-12);

    let none = EventContext::new(5.0, 0.0).with_subevents(SubeventMask::from_bits(0));
    let sink = run(small_config(), &sample, &none);
    assert_eq!(sink.emissions().len(), sink.qa_fills().count());
}

#[test]
fn ebe_weights_equal_clipped_references() {
    let sample = event(4, 250);
    let config = small_config();
    let bounds = config.validate().expect("bounds");
    let context = EventContext::new(8.0, 1.0)
        .with_subevents(SubeventMask { a: true, b: false })
        .with_flags(FlucFlags::from_bits(FlucFlags::EBE_WEIGHTING));
    let sink = run(config.clone(), &sample, &context);

    let qvecs = EventQVectors::build(&sample, bounds);
    let pair = GapPair::new(&qvecs.gap);
    let terms = ReferenceTerms::compute(&pair, Subevent::A, &config.clip);
    let ladder = ReferenceLadder::new(&terms, 2 * config.max_order, &config.clip, true);

    for emission in sink.emissions() {
        match *emission {
            Emission::Vn { k, weight, .. } => assert_eq!(weight, ladder.reference(k - 1)),
            Emission::VnVn { k, l, weight, .. } => {
                assert_eq!(weight, ladder.reference(k + l - 1))
            }
            _ => {}
        }
    }
    let v2_two = sink
        .with_key(ObservableKey::Vn { n: 2, k: 1 })
        .next()
        .and_then(Emission::sample)
        .expect("v2{2}");
    assert_eq!(v2_two.2, terms.two);
}

#[test]
fn order_products_follow_the_gap_correlators() {
    let sample = event(5, 300);
    let config = small_config();
    let bounds = config.validate().expect("bounds");
    let context = EventContext::new(3.0, 0.0).with_subevents(SubeventMask { a: true, b: false });
    let sink = run(config.clone(), &sample, &context);

    let qvecs = EventQVectors::build(&sample, bounds);
    let pair = GapPair::new(&qvecs.gap);
    let terms = ReferenceTerms::compute(&pair, Subevent::A, &config.clip);
    let ladder = ReferenceLadder::new(&terms, 2 * config.max_order, &config.clip, false);
    let i = Subevent::A;

    let value = |key: ObservableKey| {
        sink.with_key(key)
            .next()
            .and_then(Emission::sample)
            .map(|(_, value, _)| value)
            .expect("emitted")
    };
    let close = |actual: f64, expected: f64| {
        assert!(
            (actual - expected).abs() <= 1e-12 * (1.0 + expected.abs()),
            "{actual} vs {expected}"
        )
    };

    close(
        value(ObservableKey::Vn { n: 3, k: 2 }),
        pair.four_22(i, 3, 3, 3, 3).re / ladder.reference(1),
    );
    close(
        value(ObservableKey::VnVn { n: 3, k: 1, m: 2, l: 1 }),
        pair.four_22(i, 3, 2, 3, 2).re / ladder.reference(1),
    );
    close(
        value(ObservableKey::VnVn { n: 3, k: 1, m: 2, l: 2 }),
        pair.six_33(i, [3, 2, 2, 3, 2, 2]).re / ladder.reference(2),
    );
    close(
        value(ObservableKey::VnVn { n: 3, k: 2, m: 2, l: 1 }),
        pair.six_33(i, [3, 3, 2, 3, 3, 2]).re / ladder.reference(2),
    );
    let product = pair.four_22(i, 3, 3, 3, 3) * pair.four_22(i, 2, 2, 2, 2);
    close(
        value(ObservableKey::VnVn { n: 3, k: 2, m: 2, l: 2 }),
        product.re / ladder.reference(3),
    );
}

#[test]
fn phi_correction_only_drops_acceptance_maps() {
    let sample = event(6, 200);
    let plain = run(small_config(), &sample, &EventContext::new(20.0, 4.0));
    let corrected_context = EventContext::new(20.0, 4.0)
        .with_flags(FlucFlags::from_bits(FlucFlags::PHI_CORRECTION));
    let corrected = run(small_config(), &sample, &corrected_context);

    assert_eq!(corrected.qa_fills().count(), 3 + sample.len());
    assert!(corrected
        .qa_fills()
        .all(|fill| !matches!(fill, QaFill::PhiEta { .. } | QaFill::PhiEtaVertex { .. })));

    let observables = |sink: &MemorySink| -> Vec<Emission> {
        sink.emissions()
            .iter()
            .filter(|emission| emission.key().is_some())
            .copied()
            .collect()
    };
    assert_eq!(observables(&plain), observables(&corrected));
}

#[test]
fn empty_event_stays_finite() {
    let config = FlowConfig {
        generic_cumulants: true,
        ..FlowConfig::default()
    };
    let context = EventContext::new(50.0, 0.0).with_flags(FlucFlags::from_bits(0x3));
    let sink = run(config, &ParticleSample::default(), &context);
    for emission in sink.emissions() {
        if let Some((_, value, weight)) = emission.sample() {
            assert_eq!(value, 0.0, "{emission:?}");
            assert!(weight >= 1.0);
        }
    }
    assert_eq!(sink.qa_fills().count(), 3);
}

#[test]
fn invalid_config_is_rejected() {
    let config = FlowConfig {
        max_cross_harmonic: 12,
        ..FlowConfig::default()
    };
    let err = FlowAssembler::new(config).expect_err("cross harmonic above max");
    assert_eq!(err.info().code, "cross-harmonic-range");
}

#[test]
fn mixed_emissions_follow_their_reference_families() {
    let sample = event(7, 400);
    let config = FlowConfig::default();
    let bounds = config.validate().expect("bounds");
    let context = EventContext::new(22.0, 0.0)
        .with_subevents(SubeventMask { a: false, b: true })
        .with_flags(FlucFlags::from_bits(FlucFlags::EBE_WEIGHTING));
    let sink = run(config.clone(), &sample, &context);

    let qvecs = EventQVectors::build(&sample, bounds);
    let pair = GapPair::new(&qvecs.gap);
    let i = Subevent::B;
    let terms = ReferenceTerms::compute(&pair, i, &config.clip);
    let ladder = ReferenceLadder::new(&terms, 2 * config.max_order, &config.clip, true);
    let own = |n: i32| pair.side(i).q(n, 1);
    let star = |n: i32| pair.side(Subevent::A).q(n, 1).conj();
    let ref_3p = terms.three;
    let ref_4p_b = terms.four_13;
    let ref_5p = terms.five_14.expect("mixed tables carry power 4");
    let ref_4p = ladder.reference(1);
    assert!(ref_3p > 1.0 && ref_4p_b > ref_3p && ref_5p > ref_4p_b);

    let families = [
        (MixedObservable::V4V2Star2, own(4) * star(2) * star(2), ref_3p),
        (MixedObservable::V6V3Star2, own(6) * star(3).powi(2), ref_3p),
        (MixedObservable::V7V3StarV4Star, own(7) * star(3) * star(4), ref_3p),
        (MixedObservable::CorrectedV4V2Star2, pair.three(i, 4, 2, 2), ref_3p),
        (MixedObservable::CorrectedV6V2StarV4Star, pair.three(i, 6, 2, 4), ref_3p),
        (MixedObservable::V6V2Star3, own(6) * star(2).powi(3), ref_4p_b),
        (
            MixedObservable::V8V2StarV3Star2,
            own(8) * star(2) * star(3).powi(2),
            ref_4p_b,
        ),
        (MixedObservable::CorrectedV6V2Star3, pair.four_13(i, 6, 2, 2, 2), ref_4p_b),
        (
            MixedObservable::CorrectedV7V2Star2V3Star,
            pair.four_13(i, 7, 2, 2, 3),
            ref_4p_b,
        ),
        (MixedObservable::V8V2Star4, own(8) * star(2).powi(4), ref_5p),
        (
            MixedObservable::CorrectedV8V2Star4,
            pair.five_14(i, 8, 2, 2, 2, 2),
            ref_5p,
        ),
        (MixedObservable::CorrectedV4V4V2V2, pair.four_22(i, 4, 2, 4, 2), ref_4p),
        (MixedObservable::CorrectedV5V5V3V3, pair.four_22(i, 5, 3, 5, 3), ref_4p),
    ];
    for (id, correlator, reference) in families {
        let (centrality, value, weight) = single(&sink, ObservableKey::Mixed { id });
        assert_eq!(centrality, 22.0);
        assert_close(value, correlator.re / reference, id.name());
        assert_eq!(weight, reference, "{}", id.name());
    }

    let v4v2 = own(4) * star(2) * star(2) / ref_3p;
    let v5v2v3 = own(5) * star(2) * star(3) / ref_3p;
    let reweighted = [
        (
            MixedObservable::V4V2Star2TimesV2Two,
            v4v2 * pair.two(i, 2, 2) / ladder.reference(0),
        ),
        (
            MixedObservable::V4V2Star2TimesV2Four,
            v4v2 * pair.two(i, 2, 2).powi(2) / ref_4p,
        ),
        (
            MixedObservable::V5V2StarV3StarTimesV3Two,
            v5v2v3 * pair.two(i, 3, 3) / ladder.reference(0),
        ),
    ];
    for (id, product) in reweighted {
        let (_, value, weight) = single(&sink, ObservableKey::Mixed { id });
        assert_close(value, product.re, id.name());
        assert_eq!(weight, 1.0, "{}", id.name());
    }
}

#[test]
fn mixed_weights_are_unit_without_ebe_weighting() {
    let sample = event(9, 300);
    let context = EventContext::new(40.0, 0.0).with_subevents(SubeventMask::from_bits(SubeventMask::A));
    let sink = run(FlowConfig::default(), &sample, &context);
    for id in MixedObservable::ALL {
        let (_, value, weight) = single(&sink, ObservableKey::Mixed { id });
        assert!(value.is_finite(), "{}", id.name());
        assert_eq!(weight, 1.0, "{}", id.name());
    }
}

#[test]
fn generic_cumulants_use_event_wide_normalisations() {
    let sample = event(8, 350);
    let config = FlowConfig {
        generic_cumulants: true,
        mixed_harmonics: false,
        ..FlowConfig::default()
    };
    let bounds = config.validate().expect("bounds");
    let context = EventContext::new(33.0, 0.0)
        .with_flags(FlucFlags::from_bits(FlucFlags::EBE_WEIGHTING));
    let sink = run(config, &sample, &context);

    let qvecs = EventQVectors::build(&sample, bounds);
    let q = &qvecs.full;
    let two_ref = generic::two(q, 0, 0).re;
    let four_ref = generic::four(q, 0, 0, 0, 0).re;
    let side_a = qvecs.subevent(Subevent::A);
    let side_b = qvecs.subevent(Subevent::B);
    let gap_ref = side_a.multiplicity() * side_b.multiplicity();
    assert!(two_ref > 1.0 && four_ref > two_ref && gap_ref > 1.0);

    for (n, m) in [(3, 2), (5, 3), (8, 5)] {
        let (_, value, weight) = single(&sink, ObservableKey::GenericFour { n, m });
        let (h, g) = (n as i32, m as i32);
        assert_close(value, generic::four(q, h, g, -h, -g).re / four_ref, "four");
        assert_eq!(weight, four_ref);
    }
    assert_eq!(sink.with_key(ObservableKey::GenericFour { n: 3, m: 3 }).count(), 0);
    assert_eq!(sink.with_key(ObservableKey::GenericFour { n: 8, m: 6 }).count(), 0);

    for n in [2, 4, 7] {
        let h = n as i32;
        let (_, value, weight) = single(&sink, ObservableKey::GenericTwo { n });
        assert_close(value, generic::two(q, h, -h).re / two_ref, "two");
        assert_eq!(weight, two_ref);

        let (_, value, weight) = single(&sink, ObservableKey::GenericTwoGap { n });
        let expected = (side_a.q(h, 1) * side_b.q(h, 1).conj()).re / gap_ref;
        assert_close(value, expected, "two gap");
        assert_eq!(weight, gap_ref);
    }
}

#[test]
fn corrected_ids_are_the_self_correlation_free_half() {
    let corrected = MixedObservable::ALL
        .iter()
        .filter(|id| id.is_corrected())
        .count();
    assert_eq!(corrected, 15);
    for id in MixedObservable::ALL {
        assert_eq!(id.is_corrected(), id.name().starts_with('n'), "{}", id.name());
    }
    let mut names: Vec<_> = MixedObservable::ALL.iter().map(|id| id.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), MixedObservable::ALL.len());
}
