use crate::errors::{PlonkError, Result};
use crate::plonk::{
    constraint_system::{Any, ConstraintSystem},
    permutation::{PermutationArgument, PermutationSetEvals},
    verifier::CommonEvals,
};
use crate::poly_commit::{pcs::CommitmentOpening, point_set::PointRef};
use lumen_algebra::prelude::*;

/// Check that a circuit's permutation evaluations have the expected shape.
pub(crate) fn check_shape<F: Scalar>(
    cs: &ConstraintSystem<F>,
    sets: &[PermutationSetEvals<F>],
) -> Result<()> {
    let chunk_len = PermutationArgument::chunk_len(cs.degree());
    let columns = cs.permutation.columns().len();
    let expected = (columns + chunk_len - 1) / chunk_len;
    if sets.len() != expected {
        return Err(PlonkError::ProofError);
    }
    for (i, set) in sets.iter().enumerate() {
        if set.last_eval.is_some() != (i + 1 < sets.len()) {
            return Err(PlonkError::ProofError);
        }
    }
    Ok(())
}

/// The permutation constraints at `x`, in the order the prover builds them
/// over the extended coset.
pub(crate) fn permutation_expressions<F: Domain>(
    cs: &ConstraintSystem<F>,
    ks: &[F],
    sets: &[PermutationSetEvals<F>],
    sigma_evals: &[F],
    common: &CommonEvals<'_, F>,
) -> Result<Vec<F>> {
    let one = F::one();
    let columns = cs.permutation.columns();
    if sigma_evals.len() != columns.len() || ks.len() != columns.len() {
        return Err(PlonkError::ProofError);
    }
    let mut expressions = vec![];

    if let Some(first) = sets.first() {
        expressions.push(common.l_0.mul(&one.sub(&first.eval)));
    }
    if let Some(last) = sets.last() {
        expressions.push(common.l_last.mul(&last.eval.square().sub(&last.eval)));
    }
    for (set, prev) in sets.iter().skip(1).zip(sets.iter()) {
        let prev_last = prev.last_eval.ok_or(PlonkError::ProofError)?;
        expressions.push(common.l_0.mul(&set.eval.sub(&prev_last)));
    }

    let l_active = one.sub(&common.l_last.add(&common.l_blind));
    let chunk_len = PermutationArgument::chunk_len(cs.degree());
    for ((set, chunk), (chunk_sigma, chunk_ks)) in sets
        .iter()
        .zip(columns.chunks(chunk_len))
        .zip(sigma_evals.chunks(chunk_len).zip(ks.chunks(chunk_len)))
    {
        let mut left = set.next_eval;
        let mut right = set.eval;
        let beta_x = common.beta.mul(&common.x);
        for ((column, sigma), k) in chunk.iter().zip(chunk_sigma).zip(chunk_ks) {
            let query = cs.get_any_query_index(*column)?;
            let eval = match column.column_type() {
                Any::Advice => common.advice_evals.get(query),
                Any::Fixed => common.fixed_evals.get(query),
                Any::Instance => common.instance_evals.get(query),
            }
            .ok_or(PlonkError::ProofError)?;
            left.mul_assign(&eval.add(&common.beta.mul(sigma)).add(&common.gamma));
            right.mul_assign(&eval.add(&beta_x.mul(k)).add(&common.gamma));
        }
        expressions.push(l_active.mul(&left.sub(&right)));
    }
    Ok(expressions)
}

/// The opening claims of one circuit's grand products.
pub(crate) fn permutation_queries<C: Clone, F: Scalar>(
    commitments: &[C],
    sets: &[PermutationSetEvals<F>],
    x_ref: PointRef,
    x_next_ref: PointRef,
    x_last_ref: Option<PointRef>,
) -> Result<Vec<CommitmentOpening<C, F>>> {
    if commitments.len() != sets.len() {
        return Err(PlonkError::ProofError);
    }
    let mut queries = vec![];
    for (commitment, set) in commitments.iter().zip(sets) {
        queries.push(CommitmentOpening::new(commitment.clone(), x_ref, set.eval));
        queries.push(CommitmentOpening::new(
            commitment.clone(),
            x_next_ref,
            set.next_eval,
        ));
        if let Some(last_eval) = set.last_eval {
            let x_last_ref = x_last_ref.ok_or(PlonkError::ProofError)?;
            queries.push(CommitmentOpening::new(
                commitment.clone(),
                x_last_ref,
                last_eval,
            ));
        }
    }
    Ok(queries)
}
