use crate::errors::{PlonkError, Result};
use crate::plonk::domain::EvaluationDomain;
use lumen_algebra::prelude::*;

/// The challenges of one proof, in the order they are drawn:
/// theta, beta, gamma, y, x.
#[derive(Clone, Debug, Default)]
pub(crate) struct PlonkChallenges<F> {
    challenges: Vec<F>,
}

impl<F: Scalar> PlonkChallenges<F> {
    /// Create a challenges with capacity 5.
    pub(crate) fn new() -> PlonkChallenges<F> {
        PlonkChallenges {
            challenges: Vec::with_capacity(5),
        }
    }

    /// Insert theta.
    pub(crate) fn insert_theta(&mut self, theta: F) -> Result<()> {
        if self.challenges.is_empty() {
            self.challenges.push(theta);
            Ok(())
        } else {
            Err(PlonkError::PhaseError("theta"))
        }
    }

    /// Insert beta and gamma.
    pub(crate) fn insert_beta_gamma(&mut self, beta: F, gamma: F) -> Result<()> {
        if self.challenges.len() == 1 {
            self.challenges.push(beta);
            self.challenges.push(gamma);
            Ok(())
        } else {
            Err(PlonkError::PhaseError("beta and gamma"))
        }
    }

    /// Insert y.
    pub(crate) fn insert_y(&mut self, y: F) -> Result<()> {
        if self.challenges.len() == 3 {
            self.challenges.push(y);
            Ok(())
        } else {
            Err(PlonkError::PhaseError("y"))
        }
    }

    /// Insert x.
    pub(crate) fn insert_x(&mut self, x: F) -> Result<()> {
        if self.challenges.len() == 4 {
            self.challenges.push(x);
            Ok(())
        } else {
            Err(PlonkError::PhaseError("x"))
        }
    }

    /// Return theta.
    pub(crate) fn get_theta(&self) -> Result<&F> {
        self.challenges.first().ok_or(PlonkError::PhaseError("theta"))
    }

    /// Return beta and gamma.
    pub(crate) fn get_beta_gamma(&self) -> Result<(&F, &F)> {
        if self.challenges.len() > 2 {
            Ok((&self.challenges[1], &self.challenges[2]))
        } else {
            Err(PlonkError::PhaseError("beta and gamma"))
        }
    }

    /// Return x.
    pub(crate) fn get_x(&self) -> Result<&F> {
        self.challenges.get(4).ok_or(PlonkError::PhaseError("x"))
    }

    /// All challenges drawn so far.
    pub(crate) fn to_vec(&self) -> Vec<F> {
        self.challenges.clone()
    }
}

/// `l_0(x)`, `l_last(x)` and the sum of the Lagrange polynomials of the
/// blinding rows at `x`.
pub(crate) fn lagrange_evals<F: Domain>(
    domain: &EvaluationDomain<F>,
    blinding_factors: usize,
    x: &F,
) -> (F, F, F) {
    let l = domain.lagrange_coefficients(x);
    let last = domain.n() - (blinding_factors + 1);
    let l_blind = l[last + 1..].iter().fold(F::zero(), |acc, v| acc.add(v));
    (l[0], l[last], l_blind)
}

/// `sum_i l_i(x') values_i` with `x'` the rotated point.
pub(crate) fn eval_lagrange_values<F: Domain>(
    domain: &EvaluationDomain<F>,
    values: &[F],
    point: &F,
) -> F {
    domain
        .lagrange_coefficients(point)
        .iter()
        .zip(values)
        .fold(F::zero(), |acc, (l, v)| acc.add(&l.mul(v)))
}

/// Fold constraint values with `y` in order: `acc = acc * y + c`.
pub(crate) fn fold_with_y<F: Scalar>(acc: &mut F, values: &[F], y: &F) {
    for value in values {
        *acc = acc.mul(y).add(value);
    }
}
