use crate::errors::{PlonkError, Result};
use crate::plonk::{
    argument::Table,
    blinder::Blinder,
    constraint_system::{Expression, Rotation},
    domain::EvaluationDomain,
    lookup::{compress_columns, LookupArgument, LookupEvals},
};
use crate::poly_commit::{
    field_polynomial::FpPolynomial,
    pcs::{PolyComScheme, PolynomialOpening, ToBytes},
    point_set::PointSet,
    transcript::PolyComTranscript,
};
use ark_std::{cfg_into_iter, cfg_iter_mut, collections::BTreeMap, end_timer, start_timer};
use lumen_algebra::prelude::*;
use merlin::Transcript;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

/// A lookup after the permuted columns are committed.
#[derive(Clone, Debug)]
pub struct LookupPermuted<C, F> {
    compressed_input: Vec<F>,
    compressed_table: Vec<F>,
    permuted_input: Vec<F>,
    permuted_table: Vec<F>,
    permuted_input_poly: FpPolynomial<F>,
    permuted_table_poly: FpPolynomial<F>,
    permuted_input_commitment: C,
    permuted_table_commitment: C,
}

/// A lookup after the grand product is committed.
#[derive(Clone, Debug)]
pub struct LookupCommitted<C, F> {
    permuted_input_poly: FpPolynomial<F>,
    permuted_table_poly: FpPolynomial<F>,
    permuted_input_coset: Vec<F>,
    permuted_table_coset: Vec<F>,
    product_poly: FpPolynomial<F>,
    product_coset: Vec<F>,
    product_commitment: C,
}

/// A lookup evaluated at `x`.
#[derive(Clone, Debug)]
pub struct LookupEvaluated<F> {
    permuted_input_poly: FpPolynomial<F>,
    permuted_table_poly: FpPolynomial<F>,
    product_poly: FpPolynomial<F>,
    evals: LookupEvals<F>,
}

/// Sort the input and arrange the table so that every row either repeats
/// the previous input or holds an equal table entry. Only the first
/// `usable_rows` rows take part.
pub(crate) fn permute_values<F: Scalar>(
    input: &[F],
    table: &[F],
    usable_rows: usize,
) -> Result<(Vec<F>, Vec<F>)> {
    let mut leftover: BTreeMap<F, usize> = BTreeMap::new();
    for value in &table[..usable_rows] {
        *leftover.entry(*value).or_insert(0) += 1;
    }

    let mut permuted_input = input[..usable_rows].to_vec();
    permuted_input.sort();

    let mut permuted_table = vec![F::zero(); usable_rows];
    let mut repeated_rows = vec![];
    for (row, value) in permuted_input.iter().enumerate() {
        if row == 0 || *value != permuted_input[row - 1] {
            match leftover.get_mut(value) {
                Some(count) if *count > 0 => *count -= 1,
                _ => return Err(PlonkError::LookupValueNotInTable),
            }
            permuted_table[row] = *value;
        } else {
            repeated_rows.push(row);
        }
    }

    let mut remaining = leftover
        .into_iter()
        .flat_map(|(value, count)| ark_std::iter::repeat(value).take(count));
    for row in repeated_rows {
        permuted_table[row] = remaining
            .next()
            .ok_or(PlonkError::LookupValueNotInTable)?;
    }
    Ok((permuted_input, permuted_table))
}

impl<F: Domain> LookupArgument<F> {
    fn compressed_rows(
        expressions: &[Expression<F>],
        domain: &EvaluationDomain<F>,
        table: &Table<'_, Vec<F>>,
        theta: &F,
    ) -> Vec<F> {
        let n = domain.n();
        let columns: Vec<Vec<F>> = expressions
            .iter()
            .map(|e| table.evaluate(e, n, |i, r| domain.rotate_row(i, r)))
            .collect();
        compress_columns(&columns, theta, n)
    }

    /// Compress the input and table expressions with `theta`, permute
    /// them and commit to the permuted columns.
    pub(crate) fn permute<PCS: PolyComScheme<Field = F>, R: CryptoRng + RngCore>(
        &self,
        pcs: &PCS,
        domain: &EvaluationDomain<F>,
        blinding_factors: usize,
        table: &Table<'_, Vec<F>>,
        theta: &F,
        prng: &mut R,
        transcript: &mut Transcript,
    ) -> Result<LookupPermuted<PCS::Commitment, F>> {
        let permute_time = start_timer!(|| format!("Lookup permute {}", self.name()));
        let n = domain.n();
        let usable_rows = n - (blinding_factors + 1);

        let compressed_input = Self::compressed_rows(self.input_expressions(), domain, table, theta);
        let compressed_table = Self::compressed_rows(self.table_expressions(), domain, table, theta);

        let (mut permuted_input, mut permuted_table) =
            permute_values(&compressed_input, &compressed_table, usable_rows).map_err(|e| {
                debug!("lookup {} has an input outside of its table", self.name());
                e
            })?;
        permuted_input.resize(n, F::zero());
        permuted_table.resize(n, F::zero());
        let blinder = Blinder::new(blinding_factors, true);
        blinder.blind(&mut permuted_input, prng);
        blinder.blind(&mut permuted_table, prng);

        let permuted_input_commitment = pcs.commit_lagrange(&permuted_input)?;
        let permuted_table_commitment = pcs.commit_lagrange(&permuted_table)?;
        transcript.append_commitment(&permuted_input_commitment);
        transcript.append_commitment(&permuted_table_commitment);
        end_timer!(permute_time);

        Ok(LookupPermuted {
            permuted_input_poly: domain.lagrange_to_coeff(&permuted_input),
            permuted_table_poly: domain.lagrange_to_coeff(&permuted_table),
            compressed_input,
            compressed_table,
            permuted_input,
            permuted_table,
            permuted_input_commitment,
            permuted_table_commitment,
        })
    }
}

impl<C: Clone + ToBytes, F: Domain> LookupPermuted<C, F> {
    /// The commitments of the permuted input and table columns.
    pub fn commitments(&self) -> (C, C) {
        (
            self.permuted_input_commitment.clone(),
            self.permuted_table_commitment.clone(),
        )
    }

    /// The grand product
    /// `Z(omega^{i+1}) = Z(omega^i) (A_i + beta)(S_i + gamma) / ((A'_i + beta)(S'_i + gamma))`
    /// over the usable rows, starting from 1 and blinded after.
    pub(crate) fn commit_product<PCS, R>(
        self,
        pcs: &PCS,
        domain: &EvaluationDomain<F>,
        blinding_factors: usize,
        beta: &F,
        gamma: &F,
        prng: &mut R,
        transcript: &mut Transcript,
    ) -> Result<LookupCommitted<PCS::Commitment, F>>
    where
        PCS: PolyComScheme<Field = F, Commitment = C>,
        R: CryptoRng + RngCore,
    {
        let product_time = start_timer!(|| "Lookup grand product");
        let n = domain.n();
        let usable_rows = n - (blinding_factors + 1);

        let mut product: Vec<F> = cfg_into_iter!(0..usable_rows)
            .map(|i| {
                self.permuted_input[i]
                    .add(beta)
                    .mul(&self.permuted_table[i].add(gamma))
            })
            .collect();
        batch_inv(&mut product).map_err(|_| {
            debug!("zero denominator in the lookup product");
            PlonkError::DivisionByZero
        })?;
        cfg_iter_mut!(product).enumerate().for_each(|(i, p)| {
            p.mul_assign(
                &self.compressed_input[i]
                    .add(beta)
                    .mul(&self.compressed_table[i].add(gamma)),
            )
        });

        let mut z = Vec::with_capacity(n);
        z.push(F::one());
        for p in product.iter() {
            let next = z[z.len() - 1].mul(p);
            z.push(next);
        }
        z.resize(n, F::zero());
        Blinder::new(blinding_factors, false).blind(&mut z, prng);

        let product_commitment = pcs.commit_lagrange(&z)?;
        transcript.append_commitment(&product_commitment);
        let product_poly = domain.lagrange_to_coeff(&z);
        end_timer!(product_time);

        Ok(LookupCommitted {
            permuted_input_coset: domain.coeff_to_extended(&self.permuted_input_poly),
            permuted_table_coset: domain.coeff_to_extended(&self.permuted_table_poly),
            product_coset: domain.coeff_to_extended(&product_poly),
            permuted_input_poly: self.permuted_input_poly,
            permuted_table_poly: self.permuted_table_poly,
            product_poly,
            product_commitment,
        })
    }
}

impl<C: Clone, F: Domain> LookupCommitted<C, F> {
    /// The commitment of the grand product.
    pub fn product_commitment(&self) -> C {
        self.product_commitment.clone()
    }

    /// The five constraints of the argument over the extended coset, in the
    /// order the verifier folds them.
    pub(crate) fn constraints(
        &self,
        argument: &LookupArgument<F>,
        domain: &EvaluationDomain<F>,
        cosets: &Table<'_, Vec<F>>,
        l_common: (&[F], &[F], &[F]),
        theta: &F,
        beta: &F,
        gamma: &F,
    ) -> Vec<Vec<F>> {
        let (l0, l_last, l_active) = l_common;
        let len = domain.extended_len();
        let one = F::one();
        let rotate = |i: usize, r: Rotation| domain.rotate_extended(i, r);

        let input_columns: Vec<Vec<F>> = argument
            .input_expressions()
            .iter()
            .map(|e| cosets.evaluate(e, len, rotate))
            .collect();
        let table_columns: Vec<Vec<F>> = argument
            .table_expressions()
            .iter()
            .map(|e| cosets.evaluate(e, len, rotate))
            .collect();
        let input = compress_columns(&input_columns, theta, len);
        let table = compress_columns(&table_columns, theta, len);

        let z = &self.product_coset;
        let a = &self.permuted_input_coset;
        let s = &self.permuted_table_coset;

        vec![
            // l_0 (1 - Z)
            cfg_into_iter!(0..len)
                .map(|i| l0[i].mul(&one.sub(&z[i])))
                .collect(),
            // l_last (Z^2 - Z)
            cfg_into_iter!(0..len)
                .map(|i| l_last[i].mul(&z[i].square().sub(&z[i])))
                .collect(),
            cfg_into_iter!(0..len)
                .map(|i| {
                    let next = rotate(i, Rotation::next());
                    let left = z[next].mul(&a[i].add(beta)).mul(&s[i].add(gamma));
                    let right = z[i].mul(&input[i].add(beta)).mul(&table[i].add(gamma));
                    l_active[i].mul(&left.sub(&right))
                })
                .collect(),
            // l_0 (A' - S')
            cfg_into_iter!(0..len)
                .map(|i| l0[i].mul(&a[i].sub(&s[i])))
                .collect(),
            cfg_into_iter!(0..len)
                .map(|i| {
                    let prev = rotate(i, Rotation::prev());
                    l_active[i].mul(&a[i].sub(&s[i])).mul(&a[i].sub(&a[prev]))
                })
                .collect(),
        ]
    }

    /// Evaluate the product at `x` and `omega x`, the permuted input at `x`
    /// and `omega^{-1} x`, and the permuted table at `x`.
    pub(crate) fn evaluate(
        self,
        domain: &EvaluationDomain<F>,
        x: &F,
        transcript: &mut Transcript,
    ) -> LookupEvaluated<F> {
        let x_next = domain.rotate_omega(*x, Rotation::next());
        let x_prev = domain.rotate_omega(*x, Rotation::prev());
        let evals = LookupEvals {
            product_eval: self.product_poly.eval(x),
            product_next_eval: self.product_poly.eval(&x_next),
            permuted_input_eval: self.permuted_input_poly.eval(x),
            permuted_input_inv_eval: self.permuted_input_poly.eval(&x_prev),
            permuted_table_eval: self.permuted_table_poly.eval(x),
        };
        transcript.append_field_elems(&[
            evals.product_eval,
            evals.product_next_eval,
            evals.permuted_input_eval,
            evals.permuted_input_inv_eval,
            evals.permuted_table_eval,
        ]);
        LookupEvaluated {
            permuted_input_poly: self.permuted_input_poly,
            permuted_table_poly: self.permuted_table_poly,
            product_poly: self.product_poly,
            evals,
        }
    }
}

impl<F: Domain> LookupEvaluated<F> {
    /// The evaluations sent in the proof.
    pub fn evals(&self) -> LookupEvals<F> {
        self.evals.clone()
    }

    /// The opening claims of the lookup.
    pub(crate) fn open<'a>(
        &'a self,
        domain: &EvaluationDomain<F>,
        x: &F,
        points: &mut PointSet<F>,
    ) -> Vec<PolynomialOpening<'a, F>> {
        let x_ref = points.insert(*x);
        let x_prev_ref = points.insert(domain.rotate_omega(*x, Rotation::prev()));
        let x_next_ref = points.insert(domain.rotate_omega(*x, Rotation::next()));
        vec![
            PolynomialOpening::new(&self.product_poly, x_ref, self.evals.product_eval),
            PolynomialOpening::new(
                &self.permuted_input_poly,
                x_ref,
                self.evals.permuted_input_eval,
            ),
            PolynomialOpening::new(
                &self.permuted_table_poly,
                x_ref,
                self.evals.permuted_table_eval,
            ),
            PolynomialOpening::new(
                &self.permuted_input_poly,
                x_prev_ref,
                self.evals.permuted_input_inv_eval,
            ),
            PolynomialOpening::new(
                &self.product_poly,
                x_next_ref,
                self.evals.product_next_eval,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{permute_values, LookupPermuted};
    use crate::errors::PlonkError;
    use crate::plonk::{
        argument::Table,
        constraint_system::{ConstraintSystem, Rotation},
        domain::EvaluationDomain,
    };
    use crate::poly_commit::{kzg_poly_com::KZGCommitmentSchemeBN254, pcs::PolyComScheme};
    use lumen_algebra::{bn254::BN254Scalar, prelude::*};
    use merlin::Transcript;
    use rand_chacha::ChaChaRng;

    fn scalars(values: &[u32]) -> Vec<BN254Scalar> {
        values.iter().map(|v| BN254Scalar::from(*v)).collect()
    }

    #[test]
    fn permuted_rows_pair_up() {
        let input = scalars(&[3, 1, 3, 2, 3, 9]);
        let table = scalars(&[1, 2, 3, 4, 5, 0]);
        let (a, s) = permute_values(&input, &table, 5).unwrap();
        assert_eq!(a, scalars(&[1, 2, 3, 3, 3]));
        for row in 0..a.len() {
            assert!(a[row] == s[row] || (row > 0 && a[row] == a[row - 1]));
        }
        let mut sorted_s = s.clone();
        sorted_s.sort();
        assert_eq!(sorted_s, scalars(&[1, 2, 3, 4, 5]));

        assert_eq!(
            permute_values(&input, &table, 6),
            Err(PlonkError::LookupValueNotInTable)
        );
    }

    fn permuted_small_lookup(
        prng: &mut ChaChaRng,
    ) -> (
        KZGCommitmentSchemeBN254,
        EvaluationDomain<BN254Scalar>,
        usize,
        LookupPermuted<<KZGCommitmentSchemeBN254 as PolyComScheme>::Commitment, BN254Scalar>,
    ) {
        let mut cs = ConstraintSystem::<BN254Scalar>::default();
        let a = cs.advice_column();
        let t = cs.fixed_column();
        cs.lookup("small", |cs| {
            let a = cs.query_advice(a, Rotation::cur());
            let t = cs.query_fixed(t, Rotation::cur());
            vec![(a, t)]
        });
        let n = 16;
        let bf = cs.blinding_factors();
        let usable = n - bf - 1;
        let domain = EvaluationDomain::<BN254Scalar>::new(cs.degree(), n).unwrap();
        let pcs = KZGCommitmentSchemeBN254::new(n, prng).unwrap();

        let mut advice: Vec<BN254Scalar> = (0..n).map(|i| BN254Scalar::from((i % 3) as u32)).collect();
        for v in advice[usable..].iter_mut() {
            *v = BN254Scalar::random(prng);
        }
        let fixed: Vec<BN254Scalar> = (0..n).map(|i| BN254Scalar::from(i as u32)).collect();
        let table = Table {
            fixed: vec![&fixed],
            advice: vec![&advice],
            instance: vec![],
        };

        let mut transcript = Transcript::new(b"lookup test");
        let theta = BN254Scalar::from(7u32);
        let permuted = cs.lookups()[0]
            .permute(&pcs, &domain, bf, &table, &theta, prng, &mut transcript)
            .unwrap();
        (pcs, domain, bf, permuted)
    }

    #[test]
    fn grand_product_closes_on_the_last_usable_row() {
        let mut prng = ChaChaRng::from_seed([5u8; 32]);
        let (pcs, domain, bf, permuted) = permuted_small_lookup(&mut prng);
        let usable = domain.n() - bf - 1;

        let mut transcript = Transcript::new(b"lookup test");
        let beta = BN254Scalar::from(11u32);
        let gamma = BN254Scalar::from(13u32);
        let committed = permuted
            .commit_product(&pcs, &domain, bf, &beta, &gamma, &mut prng, &mut transcript)
            .unwrap();
        let z = domain.coeff_to_lagrange(&committed.product_poly);
        assert_eq!(z[0], BN254Scalar::one());
        assert_eq!(z[usable], BN254Scalar::one());
    }

    #[test]
    fn zero_denominator_in_the_product_is_fatal() {
        let mut prng = ChaChaRng::from_seed([6u8; 32]);
        let (pcs, domain, bf, permuted) = permuted_small_lookup(&mut prng);

        // A'_0 + beta = 0
        let beta = permuted.permuted_input[0].neg();
        let gamma = BN254Scalar::from(13u32);
        let mut transcript = Transcript::new(b"lookup test");
        assert_eq!(
            permuted
                .commit_product(&pcs, &domain, bf, &beta, &gamma, &mut prng, &mut transcript)
                .err(),
            Some(PlonkError::DivisionByZero)
        );
    }
}
