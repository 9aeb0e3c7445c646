//! Self-correlation corrected correlators of a single scope.
//!
//! Each function sums `prod_j w_j exp(i n_j phi_j)` over ordered tuples of
//! pairwise distinct particles, expressed in closed form through Q-vectors.
//! Summed harmonics use the power equal to the number of merged legs.

use num_complex::Complex64;

use crate::qvector::QVectorTable;

/// Two-particle correlator `Q(n1,1) Q(n2,1) - Q(n1+n2,2)`.
pub fn two(q: &QVectorTable, n1: i32, n2: i32) -> Complex64 {
    q.q(n1, 1) * q.q(n2, 1) - q.q(n1 + n2, 2)
}

/// Three-particle correlator, the building block of the 1+2, 1+3 and 3+3
/// gap correlators.
pub fn three(q: &QVectorTable, n1: i32, n2: i32, n3: i32) -> Complex64 {
    q.q(n1, 1) * q.q(n2, 1) * q.q(n3, 1)
        - q.q(n1 + n2, 2) * q.q(n3, 1)
        - q.q(n1 + n3, 2) * q.q(n2, 1)
        - q.q(n2 + n3, 2) * q.q(n1, 1)
        + 2.0 * q.q(n1 + n2 + n3, 3)
}

/// Four-particle correlator: the 15-term inclusion-exclusion expansion over
/// every way two or more of the four legs can coincide.
pub fn four(q: &QVectorTable, n1: i32, n2: i32, n3: i32, n4: i32) -> Complex64 {
    let q1 = |n: i32| q.q(n, 1);
    let q2 = |n: i32| q.q(n, 2);
    let q3 = |n: i32| q.q(n, 3);

    q1(n1) * q1(n2) * q1(n3) * q1(n4)
        - q2(n1 + n2) * q1(n3) * q1(n4)
        - q1(n2) * q2(n1 + n3) * q1(n4)
        - q1(n1) * q2(n2 + n3) * q1(n4)
        + 2.0 * q3(n1 + n2 + n3) * q1(n4)
        - q1(n2) * q1(n3) * q2(n1 + n4)
        + q2(n2 + n3) * q2(n1 + n4)
        - q1(n1) * q1(n3) * q2(n2 + n4)
        + q2(n1 + n3) * q2(n2 + n4)
        + 2.0 * q1(n3) * q3(n1 + n2 + n4)
        - q1(n1) * q1(n2) * q2(n3 + n4)
        + q2(n1 + n2) * q2(n3 + n4)
        + 2.0 * q1(n2) * q3(n1 + n3 + n4)
        + 2.0 * q1(n1) * q3(n2 + n3 + n4)
        - 6.0 * q.q(n1 + n2 + n3 + n4, 4)
}
