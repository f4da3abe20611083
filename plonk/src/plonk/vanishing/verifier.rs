use crate::errors::{PlonkError, Result};
use crate::poly_commit::{
    pcs::{CommitmentOpening, HomomorphicPolyComElem},
    point_set::PointRef,
};
use lumen_algebra::prelude::*;

/// `h(x) = folded / (x^n - 1)`.
pub(crate) fn h_eval<F: Scalar>(folded: &F, vanishing_eval: &F) -> Result<F> {
    let inv = vanishing_eval
        .inv()
        .map_err(|_| PlonkError::DivisionByZero)?;
    Ok(folded.mul(&inv))
}

/// `sum_i xn^i C_i`.
pub(crate) fn h_commitment<C: HomomorphicPolyComElem<Scalar = F>, F>(
    h_commitments: &[C],
    xn: &F,
) -> C {
    h_commitments
        .iter()
        .rev()
        .fold(C::get_identity(), |acc, c| acc.mul(xn).add(c))
}

/// The opening claims of the combined quotient and the random polynomial.
pub(crate) fn vanishing_queries<C, F>(
    h_commitment: C,
    random_commitment: C,
    h_eval: F,
    random_eval: F,
    x_ref: PointRef,
) -> Vec<CommitmentOpening<C, F>> {
    vec![
        CommitmentOpening::new(h_commitment, x_ref, h_eval),
        CommitmentOpening::new(random_commitment, x_ref, random_eval),
    ]
}
