#![deny(missing_docs)]
#![doc = "Q-vector construction and closed-form multi-particle correlators with self-correlation removal."]

pub mod gap;
pub mod generic;
pub mod qvector;
pub mod reference;

pub use gap::GapPair;
pub use num_complex::Complex64;
pub use qvector::{build, build_gap, EventQVectors, QVectorTable};
pub use reference::{ReferenceLadder, ReferenceTerms};
