use crate::errors::{PlonkError, Result};
use crate::plonk::{
    constraint_system::{
        Advice, Assignment, Cell, Circuit, Column, ConstraintSystem, Fixed, Instance, Selector,
    },
    domain::EvaluationDomain,
    lookup::LookupEvals,
    permutation::{
        build_permutation_pk, build_permutation_vk, choose_ks, PermutationAssembly,
        PermutationProvingKey, PermutationSetEvals, PermutationVerifyingKey,
    },
};
use crate::poly_commit::{field_polynomial::FpPolynomial, pcs::PolyComScheme};
use ark_std::{cfg_into_iter, cfg_iter, end_timer, start_timer};
use lumen_algebra::prelude::*;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

/// The data structure of a proof over one or more circuits sharing a key.
#[derive(Debug, Deserialize, Eq, PartialEq, Serialize, Clone)]
pub struct PlonkProof<C, F, O> {
    /// Per circuit, the instance column commitments. Empty unless the
    /// commitment scheme opens instance columns.
    pub instance_commitments: Vec<Vec<C>>,
    /// Per circuit, the advice column commitments.
    pub advice_commitments: Vec<Vec<C>>,
    /// Per circuit and lookup, the permuted input and table commitments.
    pub lookup_permuted_commitments: Vec<Vec<(C, C)>>,
    /// Per circuit, the permutation grand product commitments.
    pub permutation_product_commitments: Vec<Vec<C>>,
    /// Per circuit, the lookup grand product commitments.
    pub lookup_product_commitments: Vec<Vec<C>>,
    /// The commitment of the random polynomial of the vanishing argument.
    pub random_poly_commitment: C,
    /// The commitments of the quotient pieces.
    pub h_commitments: Vec<C>,
    /// theta, beta, gamma, y and x.
    pub challenges: Vec<F>,
    /// Per circuit, the instance evaluations at the instance queries.
    /// Empty unless the commitment scheme opens instance columns.
    pub instance_evals: Vec<Vec<F>>,
    /// Per circuit, the advice evaluations at the advice queries.
    pub advice_evals: Vec<Vec<F>>,
    /// The fixed evaluations at the fixed queries.
    pub fixed_evals: Vec<F>,
    /// The random polynomial at x.
    pub random_eval: F,
    /// The sigma polynomials at x.
    pub permutation_common_evals: Vec<F>,
    /// Per circuit, the grand product evaluations of the permutation.
    pub permutation_evals: Vec<Vec<PermutationSetEvals<F>>>,
    /// Per circuit, the evaluations of every lookup.
    pub lookup_evals: Vec<Vec<LookupEvals<F>>>,
    /// The batched opening proof.
    pub opening: O,
}

/// The type of the Plonk proof with a specific polynomial commitment scheme.
pub type PlonkPf<PCS> = PlonkProof<
    <PCS as PolyComScheme>::Commitment,
    <PCS as PolyComScheme>::Field,
    <PCS as PolyComScheme>::OpeningProof,
>;

/// Plonk verifier parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlonkVerifierParams<C, F> {
    /// The number of rows.
    pub n: usize,
    /// The row domain.
    pub domain: Vec<u8>,
    /// The commitments of the fixed columns, selectors included.
    pub fixed_commitments: Vec<C>,
    /// The commitments of the sigma polynomials.
    pub permutation: PermutationVerifyingKey<C>,
    /// The constraint system.
    pub cs: ConstraintSystem<F>,
    /// The coset representatives of the copy-constrained columns.
    pub ks: Vec<F>,
}

/// Define the PLONK verifier params by given `PolyComScheme`.
pub type PlonkVK<PCS> =
    PlonkVerifierParams<<PCS as PolyComScheme>::Commitment, <PCS as PolyComScheme>::Field>;

impl<C, F: Domain> PlonkVerifierParams<C, F> {
    /// Rebuild the evaluation domains.
    pub fn get_domain(&self) -> Result<EvaluationDomain<F>> {
        let domain = EvaluationDomain::from_bytes(self.cs.degree(), &self.domain)?;
        if domain.n() != self.n {
            return Err(PlonkError::DeserializationError);
        }
        Ok(domain)
    }
}

/// Plonk prover parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlonkProverParams<C, F> {
    /// The Plonk verifier parameters.
    pub verifier_params: PlonkVerifierParams<C, F>,
    /// The values of the fixed columns.
    pub fixed_values: Vec<Vec<F>>,
    /// The fixed polynomials.
    pub fixed_polys: Vec<FpPolynomial<F>>,
    /// The fixed polynomials over the extended coset.
    pub fixed_cosets: Vec<Vec<F>>,
    /// The sigma polynomials.
    pub permutation: PermutationProvingKey<F>,
    /// `l_0` over the extended coset.
    pub l0: Vec<F>,
    /// `l_last` over the extended coset.
    pub l_last: Vec<F>,
    /// `1 - (l_last + l_blind)` over the extended coset.
    pub l_active_row: Vec<F>,
}

/// Prover parameters over a particular polynomial commitment scheme.
pub type PlonkPK<PCS> =
    PlonkProverParams<<PCS as PolyComScheme>::Commitment, <PCS as PolyComScheme>::Field>;

impl<C, F> PlonkProverParams<C, F> {
    /// Return the verifier parameters.
    pub fn get_verifier_params(self) -> PlonkVerifierParams<C, F> {
        self.verifier_params
    }

    /// Return a reference of verifier parameters.
    pub fn get_verifier_params_ref(&self) -> &PlonkVerifierParams<C, F> {
        &self.verifier_params
    }
}

/// Records the fixed values and copies of a circuit.
struct KeyAssembly<F> {
    usable_rows: usize,
    fixed: Vec<Vec<F>>,
    permutation: PermutationAssembly,
}

impl<F: Scalar> KeyAssembly<F> {
    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.usable_rows {
            return Err(PlonkError::NotEnoughRowsAvailable);
        }
        Ok(())
    }
}

impl<F: Scalar> Assignment<F> for KeyAssembly<F> {
    fn enable_selector(&mut self, selector: &Selector, row: usize) -> Result<()> {
        self.check_row(row)?;
        self.fixed[selector.column().index()][row] = F::one();
        Ok(())
    }

    fn assign_advice(&mut self, column: Column<Advice>, row: usize, _: F) -> Result<Cell> {
        self.check_row(row)?;
        Ok(Cell {
            column: column.into(),
            row,
        })
    }

    fn assign_fixed(&mut self, column: Column<Fixed>, row: usize, value: F) -> Result<Cell> {
        self.check_row(row)?;
        let cell = self
            .fixed
            .get_mut(column.index())
            .and_then(|c| c.get_mut(row))
            .ok_or(PlonkError::ColumnSizeError)?;
        *cell = value;
        Ok(Cell {
            column: column.into(),
            row,
        })
    }

    fn copy(&mut self, left: Cell, right: Cell) -> Result<()> {
        self.check_row(left.row)?;
        self.check_row(right.row)?;
        self.permutation
            .copy(left.column, left.row, right.column, right.row)
    }

    fn query_instance(&self, _: Column<Instance>, row: usize) -> Result<F> {
        self.check_row(row)?;
        Ok(F::zero())
    }
}

struct Assembled<F: Domain, C> {
    cs: ConstraintSystem<F>,
    domain: EvaluationDomain<F>,
    fixed: Vec<Vec<F>>,
    permutations: Vec<Vec<F>>,
    ks: Vec<F>,
    fixed_commitments: Vec<C>,
}

fn assemble<PCS: PolyComScheme, C: Circuit<PCS::Field>>(
    pcs: &PCS,
    circuit: &C,
) -> Result<Assembled<PCS::Field, PCS::Commitment>> {
    let mut cs = ConstraintSystem::default();
    let config = C::configure(&mut cs);

    let n = pcs.max_degree() + 1;
    if n < cs.minimum_rows() {
        debug!(n, minimum = cs.minimum_rows(), "domain too small for the circuit");
        return Err(PlonkError::NotEnoughRowsAvailable);
    }
    let domain = EvaluationDomain::new(cs.degree(), n)?;

    let mut assembly = KeyAssembly {
        usable_rows: n - (cs.blinding_factors() + 1),
        fixed: vec![vec![PCS::Field::zero(); n]; cs.num_fixed_columns()],
        permutation: PermutationAssembly::new(n, cs.permutation()),
    };
    circuit.synthesize(config, &mut assembly)?;

    let ks = choose_ks(cs.permutation().columns().len(), n)?;
    let permutations = assembly.permutation.build_permutations(&domain, &ks)?;
    let fixed_commitments = assembly
        .fixed
        .iter()
        .map(|f| pcs.commit_lagrange(f))
        .collect::<Result<Vec<_>>>()?;

    Ok(Assembled {
        cs,
        domain,
        fixed: assembly.fixed,
        permutations,
        ks,
        fixed_commitments,
    })
}

/// Generate the verifying key of a circuit. The number of rows is the size
/// of the commitment scheme.
pub fn keygen_vk<PCS: PolyComScheme, C: Circuit<PCS::Field>>(
    pcs: &PCS,
    circuit: &C,
) -> Result<PlonkVK<PCS>> {
    let keygen_time = start_timer!(|| "Keygen vk");
    let assembled = assemble(pcs, circuit)?;
    let permutation = build_permutation_vk(pcs, &assembled.permutations)?;
    let vk = PlonkVerifierParams {
        n: assembled.domain.n(),
        domain: assembled.domain.to_bytes()?,
        fixed_commitments: assembled.fixed_commitments,
        permutation,
        cs: assembled.cs,
        ks: assembled.ks,
    };
    end_timer!(keygen_time);
    Ok(vk)
}

/// Generate the proving key of a circuit for the verifying key `vk`.
pub fn keygen_pk<PCS: PolyComScheme, C: Circuit<PCS::Field>>(
    pcs: &PCS,
    vk: PlonkVK<PCS>,
    circuit: &C,
) -> Result<PlonkPK<PCS>> {
    let keygen_time = start_timer!(|| "Keygen pk");
    let assembled = assemble(pcs, circuit)?;
    if assembled.fixed_commitments != vk.fixed_commitments || assembled.domain.n() != vk.n {
        return Err(PlonkError::SetupError);
    }
    let domain = &assembled.domain;

    let fixed_polys: Vec<FpPolynomial<PCS::Field>> = cfg_iter!(assembled.fixed)
        .map(|f| domain.lagrange_to_coeff(f))
        .collect();
    let fixed_cosets = cfg_iter!(fixed_polys)
        .map(|p| domain.coeff_to_extended(p))
        .collect();
    let permutation = build_permutation_pk(domain, assembled.permutations);

    let (l0, l_last, l_active_row) =
        lagrange_cosets(domain, assembled.cs.blinding_factors());

    end_timer!(keygen_time);
    Ok(PlonkProverParams {
        verifier_params: vk,
        fixed_values: assembled.fixed,
        fixed_polys,
        fixed_cosets,
        permutation,
        l0,
        l_last,
        l_active_row,
    })
}

/// `l_0`, `l_last` and `1 - (l_last + l_blind)` over the extended coset.
fn lagrange_cosets<F: Domain>(
    domain: &EvaluationDomain<F>,
    blinding_factors: usize,
) -> (Vec<F>, Vec<F>, Vec<F>) {
    let n = domain.n();
    let last = n - (blinding_factors + 1);
    let unit = |rows: ark_std::ops::Range<usize>| {
        let mut values = vec![F::zero(); n];
        for v in values[rows].iter_mut() {
            *v = F::one();
        }
        domain.coeff_to_extended(&domain.lagrange_to_coeff(&values))
    };
    let l0 = unit(0..1);
    let l_last = unit(last..last + 1);
    let l_blind = unit(last + 1..n);
    let one = F::one();
    let l_active_row = cfg_into_iter!(0..l0.len())
        .map(|i| one.sub(&l_last[i].add(&l_blind[i])))
        .collect();
    (l0, l_last, l_active_row)
}

#[cfg(test)]
mod tests {
    use super::{keygen_pk, keygen_vk, lagrange_cosets, PlonkVK};
    use crate::errors::{PlonkError, Result};
    use crate::plonk::{
        constraint_system::{
            Advice, Assignment, Circuit, Column, ConstraintSystem, Fixed, Rotation, Selector,
        },
        domain::EvaluationDomain,
    };
    use crate::poly_commit::kzg_poly_com::KZGCommitmentSchemeBN254;
    use lumen_algebra::{bn254::BN254Scalar, prelude::*};

    #[derive(Clone)]
    struct Config {
        a: Column<Advice>,
        f: Column<Fixed>,
        q: Selector,
    }

    struct ConstantCircuit {
        rows: usize,
    }

    impl Circuit<BN254Scalar> for ConstantCircuit {
        type Config = Config;

        fn configure(cs: &mut ConstraintSystem<BN254Scalar>) -> Config {
            let a = cs.advice_column();
            let f = cs.fixed_column();
            let q = cs.selector();
            cs.enable_equality(a);
            cs.create_gate("constant", |cs| {
                let q = cs.query_selector(q);
                let a = cs.query_advice(a, Rotation::cur());
                let f = cs.query_fixed(f, Rotation::cur());
                vec![q * (a - f)]
            });
            Config { a, f, q }
        }

        fn synthesize<A: Assignment<BN254Scalar>>(
            &self,
            config: Config,
            assignment: &mut A,
        ) -> Result<()> {
            for row in 0..self.rows {
                assignment.enable_selector(&config.q, row)?;
                assignment.assign_fixed(config.f, row, BN254Scalar::from(row as u32))?;
                let cell =
                    assignment.assign_advice(config.a, row, BN254Scalar::from(row as u32))?;
                if row > 0 {
                    let first = assignment.assign_advice(config.a, 0, BN254Scalar::zero())?;
                    assignment.copy(first, cell)?;
                }
            }
            Ok(())
        }
    }

    #[test]
    fn keys_record_fixed_columns() {
        let mut prng = test_rng();
        let pcs = KZGCommitmentSchemeBN254::new(16, &mut prng).unwrap();
        let circuit = ConstantCircuit { rows: 3 };
        let vk = keygen_vk(&pcs, &circuit).unwrap();
        assert_eq!(vk.n, 16);
        assert_eq!(vk.fixed_commitments.len(), 2);
        assert_eq!(vk.permutation.commitments.len(), 1);
        assert_eq!(vk.get_domain().unwrap().n(), 16);

        let pk = keygen_pk(&pcs, vk.clone(), &circuit).unwrap();
        assert_eq!(pk.fixed_values[0][2], BN254Scalar::from(2u32));
        let one = BN254Scalar::one();
        assert_eq!(pk.fixed_values[1][..4], [one, one, one, BN254Scalar::zero()]);
        assert_eq!(pk.fixed_polys.len(), 2);
        assert_eq!(pk.permutation.polys.len(), 1);

        let bytes = bincode::serialize(&vk).unwrap();
        let restored: PlonkVK<KZGCommitmentSchemeBN254> =
            bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored.fixed_commitments, vk.fixed_commitments);

        let json = serde_json::to_string(&vk).unwrap();
        let restored: PlonkVK<KZGCommitmentSchemeBN254> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(restored.permutation.commitments, vk.permutation.commitments);
        assert_eq!(restored.ks, vk.ks);
    }

    #[test]
    fn keygen_rejects_rows_outside_the_domain() {
        let mut prng = test_rng();
        let pcs = KZGCommitmentSchemeBN254::new(16, &mut prng).unwrap();
        // 16 rows minus 6 blinding and last rows
        let circuit = ConstantCircuit { rows: 11 };
        assert_eq!(
            keygen_vk(&pcs, &circuit).err(),
            Some(PlonkError::NotEnoughRowsAvailable)
        );
        let small = KZGCommitmentSchemeBN254::new(4, &mut prng).unwrap();
        assert_eq!(
            keygen_vk(&small, &ConstantCircuit { rows: 1 }).err(),
            Some(PlonkError::NotEnoughRowsAvailable)
        );
    }

    #[test]
    fn lagrange_cosets_partition_the_rows() {
        let domain = EvaluationDomain::<BN254Scalar>::new(3, 8).unwrap();
        let (l0, l_last, l_active) = lagrange_cosets(&domain, 2);
        let points = domain.extended_points();
        let l = domain.lagrange_coefficients(&points[3]);
        assert_eq!(l0[3], l[0]);
        assert_eq!(l_last[3], l[5]);
        let expected = BN254Scalar::one().sub(&l[5].add(&l[6]).add(&l[7]));
        assert_eq!(l_active[3], expected);
    }
}
