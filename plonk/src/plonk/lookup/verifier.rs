use crate::errors::Result;
use crate::plonk::{
    constraint_system::Expression,
    lookup::{compress, LookupArgument, LookupEvals},
    verifier::CommonEvals,
};
use crate::poly_commit::{pcs::CommitmentOpening, point_set::PointRef};
use lumen_algebra::prelude::*;

/// The five lookup constraints at `x`, in the order the prover builds them
/// over the extended coset.
pub(crate) fn lookup_expressions<F: Domain>(
    argument: &LookupArgument<F>,
    evals: &LookupEvals<F>,
    common: &CommonEvals<'_, F>,
    theta: &F,
) -> Result<Vec<F>> {
    let one = F::one();
    let evaluate = |expressions: &[Expression<F>]| -> Result<F> {
        let values = expressions
            .iter()
            .map(|e| common.evaluate(e))
            .collect::<Result<Vec<F>>>()?;
        Ok(compress(&values, theta))
    };
    let input = evaluate(argument.input_expressions())?;
    let table = evaluate(argument.table_expressions())?;

    let l_active = one.sub(&common.l_last.add(&common.l_blind));
    let z = evals.product_eval;
    let a = evals.permuted_input_eval;
    let s = evals.permuted_table_eval;

    let left = evals
        .product_next_eval
        .mul(&a.add(&common.beta))
        .mul(&s.add(&common.gamma));
    let right = z
        .mul(&input.add(&common.beta))
        .mul(&table.add(&common.gamma));

    Ok(vec![
        common.l_0.mul(&one.sub(&z)),
        common.l_last.mul(&z.square().sub(&z)),
        l_active.mul(&left.sub(&right)),
        common.l_0.mul(&a.sub(&s)),
        l_active
            .mul(&a.sub(&s))
            .mul(&a.sub(&evals.permuted_input_inv_eval)),
    ])
}

/// The opening claims of one lookup.
pub(crate) fn lookup_queries<C: Clone, F: Scalar>(
    permuted_commitments: &(C, C),
    product_commitment: &C,
    evals: &LookupEvals<F>,
    x_ref: PointRef,
    x_prev_ref: PointRef,
    x_next_ref: PointRef,
) -> Vec<CommitmentOpening<C, F>> {
    let (permuted_input, permuted_table) = permuted_commitments;
    vec![
        CommitmentOpening::new(product_commitment.clone(), x_ref, evals.product_eval),
        CommitmentOpening::new(permuted_input.clone(), x_ref, evals.permuted_input_eval),
        CommitmentOpening::new(permuted_table.clone(), x_ref, evals.permuted_table_eval),
        CommitmentOpening::new(
            permuted_input.clone(),
            x_prev_ref,
            evals.permuted_input_inv_eval,
        ),
        CommitmentOpening::new(
            product_commitment.clone(),
            x_next_ref,
            evals.product_next_eval,
        ),
    ]
}
