mod common;

use common::{random_particles, sample, BOUNDS};
use fluc_core::{EtaTag, EtaWindow, ParticleSample, RngHandle, Subevent, Track};
use fluc_corr::{build, build_gap, EventQVectors, QVectorTable};
use proptest::prelude::*;
use rand::Rng;

#[test]
fn empty_sample_yields_zero_tables() {
    let empty = ParticleSample::default();
    let full = build(&empty, BOUNDS);
    assert_eq!(full, QVectorTable::zeros(BOUNDS));
    let [a, b] = build_gap(&empty, BOUNDS);
    assert_eq!(a.multiplicity(), 0.0);
    assert_eq!(b.multiplicity(), 0.0);
}

#[test]
fn zeroth_harmonic_counts_weights() {
    let mut rng = RngHandle::from_seed(5);
    let mut particles = random_particles(&mut rng, 7, EtaTag::A);
    particles.extend(random_particles(&mut rng, 4, EtaTag::B));
    particles.extend(random_particles(&mut rng, 3, EtaTag::Unassigned));
    let qvecs = EventQVectors::build(&sample(&particles), BOUNDS);

    let weight_sum = |tag: Option<EtaTag>| -> f64 {
        particles
            .iter()
            .filter(|particle| tag.map_or(true, |tag| particle.tag == tag))
            .map(|particle| particle.weight)
            .sum()
    };
    assert!((qvecs.full.multiplicity() - weight_sum(None)).abs() < 1e-12);
    assert!((qvecs.subevent(Subevent::A).multiplicity() - weight_sum(Some(EtaTag::A))).abs() < 1e-12);
    assert!((qvecs.subevent(Subevent::B).multiplicity() - weight_sum(Some(EtaTag::B))).abs() < 1e-12);
    assert_eq!(qvecs.full.count(), 14.0);
    assert_eq!(qvecs.subevent(Subevent::A).count(), 7.0);
    assert_eq!(qvecs.subevent(Subevent::B).count(), 4.0);
    assert_eq!(qvecs.full.q(0, 1).im, 0.0);
}

#[test]
fn single_pass_matches_separate_builds() {
    let mut rng = RngHandle::from_seed(11);
    let mut particles = random_particles(&mut rng, 5, EtaTag::A);
    particles.extend(random_particles(&mut rng, 6, EtaTag::B));
    particles.extend(random_particles(&mut rng, 2, EtaTag::Unassigned));
    let sample = sample(&particles);
    let qvecs = EventQVectors::build(&sample, BOUNDS);
    assert_eq!(qvecs.full, build(&sample, BOUNDS));
    assert_eq!(qvecs.gap, build_gap(&sample, BOUNDS));
}

#[test]
#[should_panic(expected = "outside validated table bounds")]
fn out_of_range_lookup_panics() {
    let table = QVectorTable::zeros(BOUNDS);
    let _ = table.q(25, 1);
}

proptest! {
    #[test]
    fn negative_harmonics_are_conjugates(seed in any::<u64>(), count in 0usize..40) {
        let mut rng = RngHandle::from_seed(seed);
        let particles = random_particles(&mut rng, count, EtaTag::Unassigned);
        let table = build(&sample(&particles), BOUNDS);
        for n in 0..BOUNDS.harmonics as i32 {
            for k in 0..BOUNDS.powers {
                prop_assert_eq!(table.q(-n, k), table.q(n, k).conj());
            }
        }
    }

    #[test]
    fn subevent_tables_partition_tagged_tracks(seed in any::<u64>(), count in 0usize..60) {
        let mut rng = RngHandle::from_seed(seed);
        let tracks: Vec<Track> = (0..count)
            .map(|_| Track {
                phi: rng.gen_range(-3.0..3.0),
                eta: rng.gen_range(-1.0..1.0),
                weight: 1.0,
            })
            .collect();
        let window = EtaWindow::default();
        let sample = ParticleSample::from_tracks(&tracks, &window);
        let [a, b] = build_gap(&sample, BOUNDS);
        let full = build(&sample, BOUNDS);
        let in_a = tracks.iter().filter(|t| t.eta > -0.8 && t.eta < -0.4).count();
        let in_b = tracks.iter().filter(|t| t.eta > 0.4 && t.eta < 0.8).count();
        prop_assert_eq!(a.count() as usize, in_a);
        prop_assert_eq!(b.count() as usize, in_b);
        prop_assert!(full.count() as usize >= in_a + in_b);
    }
}
