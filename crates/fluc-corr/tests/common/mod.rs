#![allow(dead_code)]

use fluc_core::{EtaTag, Particle, ParticleSample, RngHandle, TableBounds};
use num_complex::Complex64;
use rand::Rng;

pub const BOUNDS: TableBounds = TableBounds {
    harmonics: 25,
    powers: 5,
};

pub fn assert_close(actual: Complex64, expected: Complex64, context: &str) {
    let scale = 1.0 + expected.norm();
    let diff = (actual - expected).norm();
    assert!(
        diff <= 1e-9 * scale,
        "{context}: formula {actual} vs brute force {expected} (diff {diff})"
    );
}

/// Random weighted particles with the given tag.
pub fn random_particles(rng: &mut RngHandle, count: usize, tag: EtaTag) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let phi = rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI);
            let weight = rng.gen_range(0.5..1.5);
            Particle::new(phi, tag).with_weight(weight)
        })
        .collect()
}

pub fn sample(particles: &[Particle]) -> ParticleSample {
    ParticleSample::new(particles.to_vec())
}

fn leg(particle: &Particle, n: i32) -> Complex64 {
    Complex64::from_polar(particle.weight, n as f64 * particle.phi)
}

/// Sum over ordered tuples of pairwise distinct particles of
/// `prod_j w_j exp(i n_j phi_j)`.
pub fn distinct_sum(particles: &[Particle], harmonics: &[i32]) -> Complex64 {
    fn recurse(
        particles: &[Particle],
        harmonics: &[i32],
        used: &mut Vec<usize>,
        acc: Complex64,
    ) -> Complex64 {
        let Some((&n, rest)) = harmonics.split_first() else {
            return acc;
        };
        let mut total = Complex64::new(0.0, 0.0);
        for (idx, particle) in particles.iter().enumerate() {
            if used.contains(&idx) {
                continue;
            }
            used.push(idx);
            total += recurse(particles, rest, used, acc * leg(particle, n));
            used.pop();
        }
        total
    }
    recurse(particles, harmonics, &mut Vec::new(), Complex64::new(1.0, 0.0))
}

/// Brute-force sum over ordered tuples of pairwise distinct particles where
/// leg `j` must carry tag `legs[j].1` and contributes `w exp(i n phi)` with
/// `n = legs[j].0`. Conjugated legs are expressed through negated harmonics.
pub fn tagged_distinct_sum(particles: &[Particle], legs: &[(i32, EtaTag)]) -> Complex64 {
    fn recurse(
        particles: &[Particle],
        legs: &[(i32, EtaTag)],
        used: &mut Vec<usize>,
        acc: Complex64,
    ) -> Complex64 {
        let Some((&(n, tag), rest)) = legs.split_first() else {
            return acc;
        };
        let mut total = Complex64::new(0.0, 0.0);
        for (idx, particle) in particles.iter().enumerate() {
            if particle.tag != tag || used.contains(&idx) {
                continue;
            }
            used.push(idx);
            total += recurse(particles, rest, used, acc * leg(particle, n));
            used.pop();
        }
        total
    }
    recurse(particles, legs, &mut Vec::new(), Complex64::new(1.0, 0.0))
}

/// Event with `count_a` particles in A, `count_b` in B and a few unassigned
/// particles that must never enter the gap correlators.
pub fn gap_event(seed: u64, count_a: usize, count_b: usize) -> Vec<Particle> {
    let mut rng = RngHandle::from_seed(seed);
    let mut particles = random_particles(&mut rng, count_a, EtaTag::A);
    particles.extend(random_particles(&mut rng, count_b, EtaTag::B));
    particles.extend(random_particles(&mut rng, 2, EtaTag::Unassigned));
    particles
}
