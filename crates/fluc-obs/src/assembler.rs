//! Combines correlators into normalised, weighted observables.

use fluc_core::{
    EventContext, FlowConfig, FlucError, ParticleSample, Subevent, TableBounds, MIN_HARMONIC,
};
use fluc_corr::generic::{four, two};
use fluc_corr::{Complex64, EventQVectors, GapPair, ReferenceLadder, ReferenceTerms};

use crate::emit::{Emission, FlowSink};
use crate::mixed::emit_mixed;
use crate::qa::emit_qa;

/// Stateless per-event observable assembler.
///
/// Holds a validated configuration; every Q-vector lookup it performs fits
/// into [`FlowAssembler::bounds`].
#[derive(Debug, Clone)]
pub struct FlowAssembler {
    config: FlowConfig,
    bounds: TableBounds,
}

/// `ncorr[n][k]`: per-harmonic correlators of order `k` for one selector.
struct OrderTable {
    orders: usize,
    values: Vec<Complex64>,
}

impl OrderTable {
    fn new(harmonics: usize, orders: usize) -> Self {
        Self {
            orders,
            values: vec![Complex64::new(0.0, 0.0); harmonics * orders],
        }
    }

    fn get(&self, n: usize, k: usize) -> Complex64 {
        self.values[n * self.orders + k]
    }

    fn set(&mut self, n: usize, k: usize, value: Complex64) {
        self.values[n * self.orders + k] = value;
    }
}

impl FlowAssembler {
    /// Validates the configuration and derives the table bounds.
    pub fn new(config: FlowConfig) -> Result<Self, FlucError> {
        let bounds = config.validate()?;
        Ok(Self { config, bounds })
    }

    /// Configuration the assembler was built from.
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Q-vector table extents required by this assembler.
    pub fn bounds(&self) -> TableBounds {
        self.bounds
    }

    /// Number of ladder entries: orders `k + l - 1` of every product fit.
    pub fn ladder_len(&self) -> usize {
        2 * self.config.max_order
    }

    /// Builds the Q-vectors of one event, emits its QA fills and assembles
    /// its observables.
    pub fn process_sample<S: FlowSink + ?Sized>(
        &self,
        sample: &ParticleSample,
        context: &EventContext,
        sink: &mut S,
    ) {
        tracing::trace!(
            particles = sample.len(),
            centrality = context.centrality,
            "assembling event"
        );
        emit_qa(sample, context, sink);
        let qvecs = EventQVectors::build(sample, self.bounds);
        self.assemble(&qvecs, context, sink);
    }

    /// Emits every observable of one event from prebuilt Q-vectors.
    ///
    /// # Panics
    ///
    /// Panics when the tables were built with bounds smaller than
    /// [`FlowAssembler::bounds`].
    pub fn assemble<S: FlowSink + ?Sized>(
        &self,
        qvecs: &EventQVectors,
        context: &EventContext,
        sink: &mut S,
    ) {
        let pair = GapPair::new(&qvecs.gap);
        let clip = &self.config.clip;
        let ebe = context.flags.ebe_weighting;
        for selector in context.subevents.selectors() {
            let terms = ReferenceTerms::compute(&pair, selector, clip);
            let ladder = ReferenceLadder::new(&terms, self.ladder_len(), clip, ebe);
            self.emit_harmonics(&pair, selector, context.centrality, &ladder, sink);
            if self.config.mixed_harmonics {
                emit_mixed(&pair, selector, context.centrality, &terms, &ladder, ebe, sink);
            }
        }
        if self.config.generic_cumulants {
            self.emit_generic(qvecs, context, sink);
        }
    }

    fn harmonic_correlators(&self, pair: &GapPair<'_>, i: Subevent) -> OrderTable {
        let orders = self.config.max_order;
        let mut ncorr = OrderTable::new(self.config.max_harmonic, orders);
        for n in self.config.harmonics() {
            let h = n as i32;
            let corr = pair.two(i, h, h);
            let mut power = corr;
            ncorr.set(n, 1, corr);
            for k in 2..orders {
                power *= corr;
                let value = match k {
                    2 => pair.four_22(i, h, h, h, h),
                    3 => pair.six_33(i, [h; 6]),
                    // Higher orders keep the plain power of the two-particle term.
                    _ => power,
                };
                ncorr.set(n, k, value);
            }
        }
        ncorr
    }

    fn emit_harmonics<S: FlowSink + ?Sized>(
        &self,
        pair: &GapPair<'_>,
        i: Subevent,
        centrality: f64,
        ladder: &ReferenceLadder,
        sink: &mut S,
    ) {
        let ncorr = self.harmonic_correlators(pair, i);
        for n in self.config.harmonics() {
            for k in self.config.orders() {
                sink.emit(Emission::Vn {
                    centrality,
                    n,
                    k,
                    value: ncorr.get(n, k).re / ladder.reference(k - 1),
                    weight: ladder.weight(k - 1),
                });
                for m in self.config.cross_harmonics() {
                    for l in self.config.orders() {
                        let (h, g) = (n as i32, m as i32);
                        let product = match (k, l) {
                            (1, 1) => pair.four_22(i, h, g, h, g),
                            (1, 2) => pair.six_33(i, [h, g, g, h, g, g]),
                            (2, 1) => pair.six_33(i, [h, h, g, h, h, g]),
                            _ => ncorr.get(n, k) * ncorr.get(m, l),
                        };
                        sink.emit(Emission::VnVn {
                            centrality,
                            n,
                            k,
                            m,
                            l,
                            value: product.re / ladder.reference(k + l - 1),
                            weight: ladder.weight(k + l - 1),
                        });
                    }
                }
            }
        }
    }

    fn emit_generic<S: FlowSink + ?Sized>(
        &self,
        qvecs: &EventQVectors,
        context: &EventContext,
        sink: &mut S,
    ) {
        let q = &qvecs.full;
        let clip = &self.config.clip;
        let two_ref = clip.clip(two(q, 0, 0).re);
        let four_ref = clip.clip(four(q, 0, 0, 0, 0).re);
        let side_a = qvecs.subevent(Subevent::A);
        let side_b = qvecs.subevent(Subevent::B);
        let gap_ref = clip.clip(side_a.multiplicity() * side_b.multiplicity());
        let weight = |reference: f64| {
            if context.flags.ebe_weighting {
                reference
            } else {
                1.0
            }
        };
        let centrality = context.centrality;
        for n in self.config.harmonics() {
            let h = n as i32;
            for m in MIN_HARMONIC..n.min(self.config.max_cross_harmonic) {
                let g = m as i32;
                sink.emit(Emission::GenericFour {
                    centrality,
                    n,
                    m,
                    value: four(q, h, g, -h, -g).re / four_ref,
                    weight: weight(four_ref),
                });
            }
            sink.emit(Emission::GenericTwo {
                centrality,
                n,
                value: two(q, h, -h).re / two_ref,
                weight: weight(two_ref),
            });
            sink.emit(Emission::GenericTwoGap {
                centrality,
                n,
                value: (side_a.q(h, 1) * side_b.q(h, 1).conj()).re / gap_ref,
                weight: weight(gap_ref),
            });
        }
    }
}
