use crate::errors::{PlonkError, Result};
use crate::plonk::{
    argument::Table,
    blinder::Blinder,
    constraint_system::Rotation,
    domain::EvaluationDomain,
    permutation::{PermutationArgument, PermutationProvingKey, PermutationSetEvals},
};
use crate::poly_commit::{
    field_polynomial::FpPolynomial,
    pcs::{PolyComScheme, PolynomialOpening},
    point_set::PointSet,
    transcript::PolyComTranscript,
};
use ark_std::{cfg_into_iter, cfg_iter, cfg_iter_mut, end_timer, start_timer};
use lumen_algebra::prelude::*;
use merlin::Transcript;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

#[derive(Clone, Debug)]
struct CommittedSet<F> {
    product_poly: FpPolynomial<F>,
    product_coset: Vec<F>,
}

/// The grand products of one circuit, committed.
#[derive(Clone, Debug)]
pub struct PermutationCommitted<C, F> {
    sets: Vec<CommittedSet<F>>,
    commitments: Vec<C>,
}

#[derive(Clone, Debug)]
struct EvaluatedSet<F> {
    product_poly: FpPolynomial<F>,
    evals: PermutationSetEvals<F>,
}

/// The grand products of one circuit, evaluated at `x`.
#[derive(Clone, Debug)]
pub struct PermutationEvaluated<F> {
    sets: Vec<EvaluatedSet<F>>,
}

fn powers<F: Scalar>(base: &F, count: usize) -> Vec<F> {
    let mut powers = Vec::with_capacity(count);
    let mut cur = F::one();
    for _ in 0..count {
        powers.push(cur);
        cur.mul_assign(base);
    }
    powers
}

impl PermutationArgument {
    /// Build, blind and commit one grand product per chunk of columns.
    pub(crate) fn commit<PCS: PolyComScheme, R: CryptoRng + RngCore>(
        &self,
        pcs: &PCS,
        pkey: &PermutationProvingKey<PCS::Field>,
        ks: &[PCS::Field],
        cs_degree: usize,
        blinding_factors: usize,
        domain: &EvaluationDomain<PCS::Field>,
        table: &Table<'_, Vec<PCS::Field>>,
        beta: &PCS::Field,
        gamma: &PCS::Field,
        prng: &mut R,
        transcript: &mut Transcript,
    ) -> Result<PermutationCommitted<PCS::Commitment, PCS::Field>> {
        let commit_time = start_timer!(|| "Permutation commit");
        let n = domain.n();
        let chunk_len = Self::chunk_len(cs_degree);
        let omega_powers = powers(&domain.get_omega(), n);

        let mut last_z = PCS::Field::one();
        let mut sets = vec![];
        let mut commitments = vec![];
        for ((columns, permutations), chunk_ks) in self
            .columns()
            .chunks(chunk_len)
            .zip(pkey.permutations.chunks(chunk_len))
            .zip(ks.chunks(chunk_len))
        {
            let mut modified_values = vec![PCS::Field::one(); n];

            // (value + beta * sigma + gamma)
            for (column, permuted_values) in columns.iter().zip(permutations.iter()) {
                let values = table.column(*column)?;
                cfg_iter_mut!(modified_values)
                    .enumerate()
                    .for_each(|(i, m)| {
                        m.mul_assign(&beta.mul(&permuted_values[i]).add(gamma).add(&values[i]))
                    });
            }
            batch_inv(&mut modified_values).map_err(|_| {
                debug!("zero denominator in the permutation product");
                PlonkError::DivisionByZero
            })?;

            // (value + beta * k_j * omega^i + gamma)
            for (column, k) in columns.iter().zip(chunk_ks.iter()) {
                let values = table.column(*column)?;
                let beta_k = beta.mul(k);
                cfg_iter_mut!(modified_values)
                    .enumerate()
                    .for_each(|(i, m)| {
                        m.mul_assign(&beta_k.mul(&omega_powers[i]).add(gamma).add(&values[i]))
                    });
            }

            // each chunk continues from the last usable value of the previous
            let mut z = Vec::with_capacity(n);
            z.push(last_z);
            for row in 1..n {
                let next = z[row - 1].mul(&modified_values[row - 1]);
                z.push(next);
            }
            Blinder::new(blinding_factors, false).blind(&mut z, prng);
            last_z = z[n - (blinding_factors + 1)];

            let commitment = pcs.commit_lagrange(&z)?;
            transcript.append_commitment(&commitment);
            let product_poly = domain.lagrange_to_coeff(&z);
            let product_coset = domain.coeff_to_extended(&product_poly);
            commitments.push(commitment);
            sets.push(CommittedSet {
                product_poly,
                product_coset,
            });
        }
        end_timer!(commit_time);

        Ok(PermutationCommitted { sets, commitments })
    }
}

impl<F: Domain> PermutationProvingKey<F> {
    /// Evaluate every sigma polynomial at `x` and append the values.
    pub(crate) fn evaluate(&self, x: &F, transcript: &mut Transcript) -> Vec<F> {
        let evals: Vec<F> = cfg_iter!(self.polys).map(|p| p.eval(x)).collect();
        transcript.append_field_elems(&evals);
        evals
    }

    /// Open every sigma polynomial at `x`.
    pub(crate) fn open<'a>(
        &'a self,
        evals: &[F],
        x: &F,
        points: &mut PointSet<F>,
    ) -> Vec<PolynomialOpening<'a, F>> {
        let x_ref = points.insert(*x);
        self.polys
            .iter()
            .zip(evals.iter())
            .map(|(poly, eval)| PolynomialOpening::new(poly, x_ref, *eval))
            .collect()
    }
}

impl<C, F: Domain> PermutationCommitted<C, F> {
    /// The commitments of the grand products.
    pub fn commitments(&self) -> &[C] {
        &self.commitments
    }

    /// The argument's constraints over the extended coset, in the order
    /// the verifier folds them.
    pub(crate) fn constraints(
        &self,
        argument: &PermutationArgument,
        pkey: &PermutationProvingKey<F>,
        ks: &[F],
        cs_degree: usize,
        blinding_factors: usize,
        domain: &EvaluationDomain<F>,
        cosets: &Table<'_, Vec<F>>,
        l_common: (&[F], &[F], &[F]),
        extended_points: &[F],
        beta: &F,
        gamma: &F,
    ) -> Result<Vec<Vec<F>>> {
        let (l0, l_last, l_active) = l_common;
        let len = domain.extended_len();
        let one = F::one();
        let mut constraints = vec![];

        if let Some(first) = self.sets.first() {
            constraints.push(
                cfg_into_iter!(0..len)
                    .map(|i| l0[i].mul(&one.sub(&first.product_coset[i])))
                    .collect(),
            );
        }
        if let Some(last) = self.sets.last() {
            constraints.push(
                cfg_into_iter!(0..len)
                    .map(|i| {
                        let z = last.product_coset[i];
                        l_last[i].mul(&z.square().sub(&z))
                    })
                    .collect(),
            );
        }
        let last_rotation = Rotation(-((blinding_factors + 1) as i32));
        for (set, prev) in self.sets.iter().skip(1).zip(self.sets.iter()) {
            constraints.push(
                cfg_into_iter!(0..len)
                    .map(|i| {
                        let j = domain.rotate_extended(i, last_rotation);
                        l0[i].mul(&set.product_coset[i].sub(&prev.product_coset[j]))
                    })
                    .collect(),
            );
        }

        let chunk_len = PermutationArgument::chunk_len(cs_degree);
        for ((set, columns), (sigma_cosets, chunk_ks)) in self
            .sets
            .iter()
            .zip(argument.columns().chunks(chunk_len))
            .zip(pkey.cosets.chunks(chunk_len).zip(ks.chunks(chunk_len)))
        {
            let values = columns
                .iter()
                .map(|c| cosets.column(*c))
                .collect::<Result<Vec<_>>>()?;
            constraints.push(
                cfg_into_iter!(0..len)
                    .map(|i| {
                        let next = domain.rotate_extended(i, Rotation::next());
                        let mut left = set.product_coset[next];
                        let mut right = set.product_coset[i];
                        let beta_x = beta.mul(&extended_points[i]);
                        for ((v, sigma), k) in
                            values.iter().zip(sigma_cosets.iter()).zip(chunk_ks.iter())
                        {
                            left.mul_assign(&v[i].add(&beta.mul(&sigma[i])).add(gamma));
                            right.mul_assign(&v[i].add(&beta_x.mul(k)).add(gamma));
                        }
                        l_active[i].mul(&left.sub(&right))
                    })
                    .collect(),
            );
        }
        Ok(constraints)
    }

    /// Evaluate the grand products at `x`, `omega x` and, except for the
    /// last, at `omega^{-(bf + 1)} x`.
    pub(crate) fn evaluate(
        self,
        domain: &EvaluationDomain<F>,
        blinding_factors: usize,
        x: &F,
        transcript: &mut Transcript,
    ) -> PermutationEvaluated<F> {
        let x_next = domain.rotate_omega(*x, Rotation::next());
        let x_last = domain.rotate_omega(*x, Rotation(-((blinding_factors + 1) as i32)));
        let count = self.sets.len();
        let sets = self
            .sets
            .into_iter()
            .enumerate()
            .map(|(i, set)| {
                let eval = set.product_poly.eval(x);
                let next_eval = set.product_poly.eval(&x_next);
                transcript.append_field_elem(&eval);
                transcript.append_field_elem(&next_eval);
                let last_eval = if i + 1 < count {
                    let last_eval = set.product_poly.eval(&x_last);
                    transcript.append_field_elem(&last_eval);
                    Some(last_eval)
                } else {
                    None
                };
                EvaluatedSet {
                    product_poly: set.product_poly,
                    evals: PermutationSetEvals {
                        eval,
                        next_eval,
                        last_eval,
                    },
                }
            })
            .collect();
        PermutationEvaluated { sets }
    }
}

impl<F: Domain> PermutationEvaluated<F> {
    /// The evaluations sent in the proof.
    pub fn evals(&self) -> Vec<PermutationSetEvals<F>> {
        self.sets.iter().map(|s| s.evals.clone()).collect()
    }

    /// The opening claims of the grand products.
    pub(crate) fn open<'a>(
        &'a self,
        domain: &EvaluationDomain<F>,
        blinding_factors: usize,
        x: &F,
        points: &mut PointSet<F>,
    ) -> Vec<PolynomialOpening<'a, F>> {
        let x_ref = points.insert(*x);
        let x_next_ref = points.insert(domain.rotate_omega(*x, Rotation::next()));
        let x_last_ref = if self.sets.len() > 1 {
            Some(points.insert(
                domain.rotate_omega(*x, Rotation(-((blinding_factors + 1) as i32))),
            ))
        } else {
            None
        };
        let mut openings = vec![];
        for set in &self.sets {
            openings.push(PolynomialOpening::new(&set.product_poly, x_ref, set.evals.eval));
            openings.push(PolynomialOpening::new(
                &set.product_poly,
                x_next_ref,
                set.evals.next_eval,
            ));
            if let (Some(last_eval), Some(x_last_ref)) = (set.evals.last_eval, x_last_ref) {
                openings.push(PolynomialOpening::new(&set.product_poly, x_last_ref, last_eval));
            }
        }
        openings
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{PlonkError, Result};
    use crate::plonk::{
        argument::Table,
        constraint_system::{Any, Column},
        domain::EvaluationDomain,
        permutation::{build_permutation_pk, choose_ks, PermutationArgument, PermutationAssembly},
    };
    use crate::poly_commit::kzg_poly_com::KZGCommitmentSchemeBN254;
    use lumen_algebra::{bn254::BN254Scalar, prelude::*};
    use merlin::Transcript;
    use rand_chacha::ChaChaRng;

    const N: usize = 16;
    const BLINDING_FACTORS: usize = 5;

    /// Commit the grand product of one advice column without copies,
    /// returning the number of committed sets.
    fn commit_single_column(values: &[BN254Scalar], beta: BN254Scalar) -> Result<usize> {
        let mut prng = ChaChaRng::from_seed([8u8; 32]);
        let pcs = KZGCommitmentSchemeBN254::new(N, &mut prng)?;
        let mut argument = PermutationArgument::default();
        argument.add_column(Column::new(0, Any::Advice));
        let degree = PermutationArgument::required_degree();
        let domain = EvaluationDomain::<BN254Scalar>::new(degree, N)?;
        let ks = choose_ks::<BN254Scalar>(1, N)?;
        let permutations = PermutationAssembly::new(N, &argument).build_permutations(&domain, &ks)?;
        let pkey = build_permutation_pk(&domain, permutations);

        let advice = values.to_vec();
        let table = Table {
            fixed: vec![],
            advice: vec![&advice],
            instance: vec![],
        };
        let gamma = BN254Scalar::from(3u32);
        let mut transcript = Transcript::new(b"permutation test");
        let committed = argument.commit(
            &pcs,
            &pkey,
            &ks,
            degree,
            BLINDING_FACTORS,
            &domain,
            &table,
            &beta,
            &gamma,
            &mut prng,
            &mut transcript,
        )?;
        Ok(committed.commitments.len())
    }

    #[test]
    fn zero_denominator_in_the_product_is_fatal() {
        let mut prng = ChaChaRng::from_seed([9u8; 32]);
        let values: Vec<BN254Scalar> = (0..N).map(|_| BN254Scalar::random(&mut prng)).collect();
        assert_eq!(commit_single_column(&values, BN254Scalar::from(5u32)), Ok(1));

        // sigma(omega^0) = 1, so a_0 + beta + gamma = 0 at the first row
        let beta = values[0].add(&BN254Scalar::from(3u32)).neg();
        assert_eq!(
            commit_single_column(&values, beta),
            Err(PlonkError::DivisionByZero)
        );
    }
}
