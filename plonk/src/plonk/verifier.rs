use crate::errors::{PlonkError, Result};
use crate::plonk::{
    constraint_system::{ConstraintSystem, Expression, Rotation},
    domain::EvaluationDomain,
    helpers::{eval_lagrange_values, fold_with_y, lagrange_evals},
    indexer::{PlonkPf, PlonkVK},
    lookup::verifier::{lookup_expressions, lookup_queries},
    permutation::verifier::{check_shape, permutation_expressions, permutation_queries},
    transcript::{
        transcript_get_plonk_challenge_beta, transcript_get_plonk_challenge_gamma,
        transcript_get_plonk_challenge_theta, transcript_get_plonk_challenge_x,
        transcript_get_plonk_challenge_y, transcript_init_plonk,
    },
    vanishing::verifier::{h_commitment, h_eval, vanishing_queries},
};
use crate::poly_commit::{
    pcs::{CommitmentOpening, PolyComScheme},
    point_set::PointSet,
    transcript::PolyComTranscript,
};
use ark_std::{end_timer, start_timer};
use lumen_algebra::prelude::*;
use merlin::Transcript;
use tracing::debug;

/// The values every constraint of one circuit is evaluated against at `x`.
pub(crate) struct CommonEvals<'a, F> {
    pub advice_evals: &'a [F],
    pub fixed_evals: &'a [F],
    pub instance_evals: &'a [F],
    pub l_0: F,
    pub l_last: F,
    pub l_blind: F,
    pub beta: F,
    pub gamma: F,
    pub x: F,
}

impl<'a, F: Scalar> CommonEvals<'a, F> {
    /// Evaluate `expression` with every query replaced by its evaluation.
    pub(crate) fn evaluate(&self, expression: &Expression<F>) -> Result<F> {
        let lookup = |evals: &[F], query: usize| -> Result<F> {
            evals.get(query).copied().ok_or(PlonkError::ProofError)
        };
        expression.evaluate(
            &|c| Ok(c),
            &|query, _, _| lookup(self.fixed_evals, query),
            &|query, _, _| lookup(self.advice_evals, query),
            &|query, _, _| lookup(self.instance_evals, query),
            &|a: Result<F>| a.map(|a| a.neg()),
            &|a: Result<F>, b: Result<F>| Ok(a?.add(&b?)),
            &|a: Result<F>, b: Result<F>| Ok(a?.mul(&b?)),
            &|a: Result<F>, scalar: F| a.map(|a| a.mul(&scalar)),
        )
    }
}

/// Pad every instance column to `n` rows, rejecting those longer than the
/// usable rows.
fn pad_instances<F: Scalar>(
    cs: &ConstraintSystem<F>,
    n: usize,
    instances: &[Vec<Vec<F>>],
) -> Result<Vec<Vec<Vec<F>>>> {
    let usable_rows = n - (cs.blinding_factors() + 1);
    instances
        .iter()
        .map(|columns| {
            if columns.len() != cs.num_instance_columns() {
                return Err(PlonkError::ColumnSizeError);
            }
            columns
                .iter()
                .map(|values| {
                    if values.len() > usable_rows {
                        return Err(PlonkError::ColumnSizeError);
                    }
                    let mut padded = values.clone();
                    padded.resize(n, F::zero());
                    Ok(padded)
                })
                .collect()
        })
        .collect()
}

fn check_proof_shape<PCS: PolyComScheme>(
    cs: &ConstraintSystem<PCS::Field>,
    domain: &EvaluationDomain<PCS::Field>,
    num_circuits: usize,
    proof: &PlonkPf<PCS>,
) -> Result<()> {
    let per_circuit = [
        proof.advice_commitments.len(),
        proof.lookup_permuted_commitments.len(),
        proof.permutation_product_commitments.len(),
        proof.lookup_product_commitments.len(),
        proof.advice_evals.len(),
        proof.permutation_evals.len(),
        proof.lookup_evals.len(),
    ];
    if per_circuit.iter().any(|len| *len != num_circuits) {
        return Err(PlonkError::CircuitCountMismatch);
    }
    let instance_circuits = if PCS::QUERY_INSTANCE { num_circuits } else { 0 };
    if proof.instance_commitments.len() != instance_circuits
        || proof.instance_evals.len() != instance_circuits
    {
        return Err(PlonkError::CircuitCountMismatch);
    }
    for c in 0..num_circuits {
        if proof.advice_commitments[c].len() != cs.num_advice_columns()
            || proof.advice_evals[c].len() != cs.advice_queries().len()
            || proof.lookup_permuted_commitments[c].len() != cs.lookups().len()
            || proof.lookup_product_commitments[c].len() != cs.lookups().len()
            || proof.lookup_evals[c].len() != cs.lookups().len()
            || proof.permutation_product_commitments[c].len() != proof.permutation_evals[c].len()
        {
            return Err(PlonkError::ProofError);
        }
        check_shape(cs, &proof.permutation_evals[c])?;
        if PCS::QUERY_INSTANCE && proof.instance_evals[c].len() != cs.instance_queries().len() {
            return Err(PlonkError::ProofError);
        }
    }
    if proof.fixed_evals.len() != cs.fixed_queries().len()
        || proof.permutation_common_evals.len() != cs.permutation().columns().len()
        || proof.h_commitments.len() != domain.quotient_poly_degree()
        || proof.challenges.len() != 5
    {
        return Err(PlonkError::ProofError);
    }
    Ok(())
}

/// Verify a proof over one or more circuits sharing the verifying key.
///
/// The transcript must be in the state the prover's was in. When the
/// commitment scheme opens instance columns, `pcs` must still be able to
/// commit, since the instance commitments are recomputed.
pub fn verify_proof<PCS: PolyComScheme>(
    transcript: &mut Transcript,
    pcs: &PCS,
    vk: &PlonkVK<PCS>,
    instances: &[Vec<Vec<PCS::Field>>],
    proof: &PlonkPf<PCS>,
) -> Result<()> {
    let verify_time = start_timer!(|| "Lumen PLONK verifier");
    let cs = &vk.cs;
    let domain = vk.get_domain()?;
    let n = domain.n();
    let blinding_factors = cs.blinding_factors();
    let num_circuits = instances.len();
    if num_circuits == 0 {
        return Err(PlonkError::CircuitCountMismatch);
    }
    check_proof_shape::<PCS>(cs, &domain, num_circuits, proof)?;

    transcript_init_plonk(transcript, vk)?;

    let instance_values = pad_instances(cs, n, instances)?;
    if PCS::QUERY_INSTANCE {
        for (values, commitments) in instance_values
            .iter()
            .zip(proof.instance_commitments.iter())
        {
            if values.len() != commitments.len() {
                return Err(PlonkError::ProofError);
            }
            for (column, commitment) in values.iter().zip(commitments) {
                if pcs.commit_lagrange(column)? != *commitment {
                    debug!("instance commitment mismatch");
                    return Err(PlonkError::VerificationError);
                }
                transcript.append_commitment(commitment);
            }
        }
    } else {
        for values in instance_values.iter().flatten() {
            transcript.append_field_elems(values);
        }
    }
    for c in proof.advice_commitments.iter().flatten() {
        transcript.append_commitment(c);
    }

    let theta: PCS::Field = transcript_get_plonk_challenge_theta(transcript, n);
    for (input, table) in proof.lookup_permuted_commitments.iter().flatten() {
        transcript.append_commitment(input);
        transcript.append_commitment(table);
    }

    let beta: PCS::Field = transcript_get_plonk_challenge_beta(transcript, n);
    let gamma: PCS::Field = transcript_get_plonk_challenge_gamma(transcript, n);
    for c in proof.permutation_product_commitments.iter().flatten() {
        transcript.append_commitment(c);
    }
    for c in proof.lookup_product_commitments.iter().flatten() {
        transcript.append_commitment(c);
    }
    transcript.append_commitment(&proof.random_poly_commitment);

    let y: PCS::Field = transcript_get_plonk_challenge_y(transcript, n);
    for c in proof.h_commitments.iter() {
        transcript.append_commitment(c);
    }

    let x: PCS::Field = transcript_get_plonk_challenge_x(transcript, n);
    if proof.challenges != [theta, beta, gamma, y, x] {
        return Err(PlonkError::ChallengeError);
    }

    for evals in proof.instance_evals.iter() {
        transcript.append_field_elems(evals);
    }
    for evals in proof.advice_evals.iter() {
        transcript.append_field_elems(evals);
    }
    transcript.append_field_elems(&proof.fixed_evals);
    transcript.append_field_elem(&proof.random_eval);
    transcript.append_field_elems(&proof.permutation_common_evals);
    for set in proof.permutation_evals.iter().flatten() {
        transcript.append_field_elem(&set.eval);
        transcript.append_field_elem(&set.next_eval);
        if let Some(last_eval) = &set.last_eval {
            transcript.append_field_elem(last_eval);
        }
    }
    for evals in proof.lookup_evals.iter().flatten() {
        transcript.append_field_elems(&[
            evals.product_eval,
            evals.product_next_eval,
            evals.permuted_input_eval,
            evals.permuted_input_inv_eval,
            evals.permuted_table_eval,
        ]);
    }

    let instance_evals: Vec<Vec<PCS::Field>> = if PCS::QUERY_INSTANCE {
        proof.instance_evals.clone()
    } else {
        instance_values
            .iter()
            .map(|columns| {
                cs.instance_queries()
                    .iter()
                    .map(|(column, rotation)| {
                        eval_lagrange_values(
                            &domain,
                            &columns[column.index()],
                            &domain.rotate_omega(x, *rotation),
                        )
                    })
                    .collect()
            })
            .collect()
    };

    let (l_0, l_last, l_blind) = lagrange_evals(&domain, blinding_factors, &x);
    let mut folded = PCS::Field::zero();
    for c in 0..num_circuits {
        let common = CommonEvals {
            advice_evals: &proof.advice_evals[c],
            fixed_evals: &proof.fixed_evals,
            instance_evals: &instance_evals[c],
            l_0,
            l_last,
            l_blind,
            beta,
            gamma,
            x,
        };
        for gate in cs.gates() {
            for poly in gate.polynomials() {
                fold_with_y(&mut folded, &[common.evaluate(poly)?], &y);
            }
        }
        let permutation = permutation_expressions(
            cs,
            &vk.ks,
            &proof.permutation_evals[c],
            &proof.permutation_common_evals,
            &common,
        )?;
        fold_with_y(&mut folded, &permutation, &y);
        for (argument, evals) in cs.lookups().iter().zip(proof.lookup_evals[c].iter()) {
            let lookup = lookup_expressions(argument, evals, &common, &theta)?;
            fold_with_y(&mut folded, &lookup, &y);
        }
    }

    let xn = x.pow(&[n as u64]);
    let quotient_eval = h_eval(&folded, &domain.vanishing_eval(&x))?;
    let quotient_commitment = h_commitment(&proof.h_commitments, &xn);

    let mut points = PointSet::new();
    let mut queries: Vec<CommitmentOpening<PCS::Commitment, PCS::Field>> = vec![];
    let x_last_rotation = Rotation(-((blinding_factors + 1) as i32));
    for c in 0..num_circuits {
        if PCS::QUERY_INSTANCE {
            for ((column, rotation), eval) in cs
                .instance_queries()
                .iter()
                .zip(proof.instance_evals[c].iter())
            {
                let point = points.insert(domain.rotate_omega(x, *rotation));
                queries.push(CommitmentOpening::new(
                    proof.instance_commitments[c][column.index()].clone(),
                    point,
                    *eval,
                ));
            }
        }
        for ((column, rotation), eval) in cs
            .advice_queries()
            .iter()
            .zip(proof.advice_evals[c].iter())
        {
            let point = points.insert(domain.rotate_omega(x, *rotation));
            queries.push(CommitmentOpening::new(
                proof.advice_commitments[c][column.index()].clone(),
                point,
                *eval,
            ));
        }

        let sets = &proof.permutation_evals[c];
        let x_ref = points.insert(x);
        let x_next_ref = points.insert(domain.rotate_omega(x, Rotation::next()));
        let x_last_ref = if sets.len() > 1 {
            Some(points.insert(domain.rotate_omega(x, x_last_rotation)))
        } else {
            None
        };
        queries.extend(permutation_queries(
            &proof.permutation_product_commitments[c],
            sets,
            x_ref,
            x_next_ref,
            x_last_ref,
        )?);

        for ((permuted, product), evals) in proof.lookup_permuted_commitments[c]
            .iter()
            .zip(proof.lookup_product_commitments[c].iter())
            .zip(proof.lookup_evals[c].iter())
        {
            let x_ref = points.insert(x);
            let x_prev_ref = points.insert(domain.rotate_omega(x, Rotation::prev()));
            let x_next_ref = points.insert(domain.rotate_omega(x, Rotation::next()));
            queries.extend(lookup_queries(
                permuted, product, evals, x_ref, x_prev_ref, x_next_ref,
            ));
        }
    }

    for ((column, rotation), eval) in cs.fixed_queries().iter().zip(proof.fixed_evals.iter()) {
        let point = points.insert(domain.rotate_omega(x, *rotation));
        queries.push(CommitmentOpening::new(
            vk.fixed_commitments[column.index()].clone(),
            point,
            *eval,
        ));
    }
    let x_ref = points.insert(x);
    for (commitment, eval) in vk
        .permutation
        .commitments
        .iter()
        .zip(proof.permutation_common_evals.iter())
    {
        queries.push(CommitmentOpening::new(commitment.clone(), x_ref, *eval));
    }
    queries.extend(vanishing_queries(
        quotient_commitment,
        proof.random_poly_commitment.clone(),
        quotient_eval,
        proof.random_eval,
        x_ref,
    ));

    let result = pcs.batch_verify(transcript, &points, &queries, &proof.opening);
    end_timer!(verify_time);
    result
}
