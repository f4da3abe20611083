//! The copy-constraint argument: a chunked grand product over the
//! permutation of cells induced by the copy constraints.
use crate::errors::{PlonkError, Result};
use crate::plonk::{
    constraint_system::{Any, Column},
    domain::EvaluationDomain,
};
use crate::poly_commit::{field_polynomial::FpPolynomial, pcs::PolyComScheme};
use ark_std::cfg_iter;
use lumen_algebra::{prelude::*, traits::LegendreSymbol};
use rand_chacha::ChaChaRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Module for the prover side.
pub mod prover;

/// Module for the verifier side.
pub mod verifier;

pub use prover::{PermutationCommitted, PermutationEvaluated};

/// The columns taking part in copy constraints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermutationArgument {
    columns: Vec<Column<Any>>,
}

impl PermutationArgument {
    pub(crate) fn add_column(&mut self, column: Column<Any>) {
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }

    /// The copy-constrained columns in registration order.
    pub fn columns(&self) -> &[Column<Any>] {
        &self.columns
    }

    /// The degree of the argument's constraints.
    pub fn required_degree() -> usize {
        3
    }

    /// The number of columns handled by one grand product.
    pub fn chunk_len(cs_degree: usize) -> usize {
        cs_degree - 2
    }
}

/// The commitments of the sigma polynomials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermutationVerifyingKey<C> {
    /// One commitment per copy-constrained column.
    pub commitments: Vec<C>,
}

/// The sigma polynomials in all three forms.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PermutationProvingKey<F> {
    /// `sigma_j(omega^i)`.
    pub permutations: Vec<Vec<F>>,
    /// The coefficients of `sigma_j`.
    pub polys: Vec<FpPolynomial<F>>,
    /// `sigma_j` over the extended coset.
    pub cosets: Vec<Vec<F>>,
}

/// The evaluations of one grand product sent in a proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermutationSetEvals<F> {
    /// `Z(x)`.
    pub eval: F,
    /// `Z(omega x)`.
    pub next_eval: F,
    /// `Z(omega^{-(bf + 1)} x)`, absent for the last set.
    pub last_eval: Option<F>,
}

/// The cycles of cells built from the copy constraints.
#[derive(Clone, Debug)]
pub(crate) struct PermutationAssembly {
    columns: Vec<Column<Any>>,
    mapping: Vec<Vec<(usize, usize)>>,
    aux: Vec<Vec<(usize, usize)>>,
    sizes: Vec<Vec<usize>>,
}

impl PermutationAssembly {
    /// Every cell starts in its own cycle.
    pub(crate) fn new(n: usize, argument: &PermutationArgument) -> Self {
        let identity: Vec<Vec<(usize, usize)>> = (0..argument.columns.len())
            .map(|i| (0..n).map(|j| (i, j)).collect())
            .collect();
        Self {
            columns: argument.columns.clone(),
            mapping: identity.clone(),
            aux: identity,
            sizes: vec![vec![1usize; n]; argument.columns.len()],
        }
    }

    fn position(&self, column: Column<Any>) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .ok_or_else(|| PlonkError::Message(format!("column {:?} not in permutation", column)))
    }

    /// Merge the cycles of the two cells.
    pub(crate) fn copy(
        &mut self,
        left_column: Column<Any>,
        left_row: usize,
        right_column: Column<Any>,
        right_row: usize,
    ) -> Result<()> {
        let left_column = self.position(left_column)?;
        let right_column = self.position(right_column)?;
        if left_row >= self.mapping[left_column].len()
            || right_row >= self.mapping[right_column].len()
        {
            return Err(PlonkError::NotEnoughRowsAvailable);
        }

        let mut left_cycle = self.aux[left_column][left_row];
        let mut right_cycle = self.aux[right_column][right_row];
        if left_cycle == right_cycle {
            return Ok(());
        }
        // merge the smaller cycle into the larger one
        if self.sizes[left_cycle.0][left_cycle.1] < self.sizes[right_cycle.0][right_cycle.1] {
            ark_std::mem::swap(&mut left_cycle, &mut right_cycle);
        }
        self.sizes[left_cycle.0][left_cycle.1] += self.sizes[right_cycle.0][right_cycle.1];
        let mut i = right_cycle;
        loop {
            self.aux[i.0][i.1] = left_cycle;
            i = self.mapping[i.0][i.1];
            if i == right_cycle {
                break;
            }
        }

        let tmp = self.mapping[left_column][left_row];
        self.mapping[left_column][left_row] = self.mapping[right_column][right_row];
        self.mapping[right_column][right_row] = tmp;
        Ok(())
    }

    /// `sigma_j(omega^i) = k_{c'} omega^{r'}` where `(c', r')` follows
    /// `(j, i)` on its cycle.
    pub(crate) fn build_permutations<F: Domain>(
        &self,
        domain: &EvaluationDomain<F>,
        ks: &[F],
    ) -> Result<Vec<Vec<F>>> {
        if ks.len() != self.columns.len() {
            return Err(PlonkError::SetupError);
        }
        let omega = domain.get_omega();
        let mut omega_powers = Vec::with_capacity(domain.n());
        let mut cur = F::one();
        for _ in 0..domain.n() {
            omega_powers.push(cur);
            cur.mul_assign(&omega);
        }
        Ok(cfg_iter!(self.mapping)
            .map(|column| {
                column
                    .iter()
                    .map(|(c, r)| ks[*c].mul(&omega_powers[*r]))
                    .collect()
            })
            .collect())
    }
}

/// Commit to the sigma polynomials.
pub(crate) fn build_permutation_vk<PCS: PolyComScheme>(
    pcs: &PCS,
    permutations: &[Vec<PCS::Field>],
) -> Result<PermutationVerifyingKey<PCS::Commitment>> {
    let commitments = permutations
        .iter()
        .map(|p| pcs.commit_lagrange(p))
        .collect::<Result<Vec<_>>>()?;
    Ok(PermutationVerifyingKey { commitments })
}

/// Interpolate the sigma polynomials and evaluate them over the extended
/// coset.
pub(crate) fn build_permutation_pk<F: Domain>(
    domain: &EvaluationDomain<F>,
    permutations: Vec<Vec<F>>,
) -> PermutationProvingKey<F> {
    let polys: Vec<FpPolynomial<F>> = cfg_iter!(permutations)
        .map(|p| domain.lagrange_to_coeff(p))
        .collect();
    let cosets = cfg_iter!(polys)
        .map(|p| domain.coeff_to_extended(p))
        .collect();
    PermutationProvingKey {
        permutations,
        polys,
        cosets,
    }
}

/// Choose `count` coset representatives: `k_0 = 1`, then quadratic
/// non-residues from a fixed-seed stream such that `(k_i / k_j)^n != 1`.
pub fn choose_ks<F: Scalar>(count: usize, n: usize) -> Result<Vec<F>> {
    let mut prng = ChaChaRng::from_seed([0u8; 32]);
    let mut ks = Vec::with_capacity(count);
    if count == 0 {
        return Ok(ks);
    }
    ks.push(F::one());
    while ks.len() < count {
        let candidate = F::random(&mut prng);
        if candidate.legendre() != LegendreSymbol::QuadraticNonResidue {
            continue;
        }
        let mut distinct = true;
        for k in ks.iter() {
            let ratio = candidate.mul(&k.inv()?);
            if ratio.pow(&[n as u64]) == F::one() {
                distinct = false;
                break;
            }
        }
        if distinct {
            ks.push(candidate);
        }
    }
    Ok(ks)
}
