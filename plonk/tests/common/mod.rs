#![allow(dead_code)]

use lumen_algebra::{bn254::BN254Scalar, prelude::*};
use lumen_plonk::errors::Result;
use lumen_plonk::plonk::constraint_system::{
    Advice, Assignment, Circuit, Column, ConstraintSystem, Fixed, Instance, Rotation, Selector,
};
use lumen_plonk::poly_commit::{
    field_polynomial::FpPolynomial,
    kzg_poly_com::KZGCommitmentSchemeBN254,
    pcs::{CommitmentOpening, HomomorphicPolyComElem, PolyComScheme, PolynomialOpening},
    point_set::PointSet,
};
use merlin::Transcript;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub type KZGCommitment = <KZGCommitmentSchemeBN254 as PolyComScheme>::Commitment;

/// Move a commitment to a different group element.
pub fn shift_commitment(c: &mut KZGCommitment) {
    c.add_assign(&<KZGCommitment as HomomorphicPolyComElem>::get_base());
}

/// Move a claimed evaluation to a different value.
pub fn shift_eval(v: &mut BN254Scalar) {
    *v = v.add(&BN254Scalar::one());
}

#[derive(Clone)]
pub struct AddConfig {
    a: Column<Advice>,
    b: Column<Advice>,
    c: Column<Advice>,
    pi: Column<Instance>,
    q: Selector,
}

/// Row 0: `pi[0] + pi[1] = c0`. Row 1: `c0 + pi[1] = c1`.
#[derive(Clone, Default)]
pub struct AddCircuit;

impl Circuit<BN254Scalar> for AddCircuit {
    type Config = AddConfig;

    fn configure(cs: &mut ConstraintSystem<BN254Scalar>) -> AddConfig {
        let a = cs.advice_column();
        let b = cs.advice_column();
        let c = cs.advice_column();
        let pi = cs.instance_column();
        let q = cs.selector();
        cs.enable_equality(a);
        cs.enable_equality(b);
        cs.enable_equality(c);
        cs.enable_equality(pi);
        cs.create_gate("add", |cs| {
            let q = cs.query_selector(q);
            let a = cs.query_advice(a, Rotation::cur());
            let b = cs.query_advice(b, Rotation::cur());
            let c = cs.query_advice(c, Rotation::cur());
            vec![q * (a + b - c)]
        });
        AddConfig { a, b, c, pi, q }
    }

    fn synthesize<A: Assignment<BN254Scalar>>(
        &self,
        config: AddConfig,
        assignment: &mut A,
    ) -> Result<()> {
        let (_, x) = assignment.assign_advice_from_instance(config.pi, 0, config.a, 0)?;
        let (b0, y) = assignment.assign_advice_from_instance(config.pi, 1, config.b, 0)?;
        let c0 = assignment.assign_advice(config.c, 0, x.add(&y))?;
        assignment.enable_selector(&config.q, 0)?;

        let a1 = assignment.assign_advice(config.a, 1, x.add(&y))?;
        assignment.copy(c0, a1)?;
        let b1 = assignment.assign_advice(config.b, 1, y)?;
        assignment.copy(b0, b1)?;
        assignment.assign_advice(config.c, 1, x.add(&y).add(&y))?;
        assignment.enable_selector(&config.q, 1)?;
        Ok(())
    }
}

pub fn add_instances(x: u32, y: u32) -> Vec<Vec<BN254Scalar>> {
    vec![vec![BN254Scalar::from(x), BN254Scalar::from(y)]]
}

#[derive(Clone)]
pub struct XorConfig {
    a: Column<Advice>,
    b: Column<Advice>,
    c: Column<Advice>,
    table: [Column<Fixed>; 3],
    q: Selector,
}

/// Checks `a ^ b = c` for 2-bit values through a lookup into the full
/// XOR table. The selector covers the first `XOR_ROWS` rows whatever the
/// witness, and missing rows are filled with `(0, 0, 0)`.
#[derive(Clone, Default)]
pub struct XorCircuit {
    pub rows: Vec<(u32, u32, u32)>,
}

pub const XOR_ROWS: usize = 8;

impl XorCircuit {
    pub fn honest(pairs: &[(u32, u32)]) -> Self {
        XorCircuit {
            rows: pairs.iter().map(|(a, b)| (*a, *b, a ^ b)).collect(),
        }
    }
}

impl Circuit<BN254Scalar> for XorCircuit {
    type Config = XorConfig;

    fn configure(cs: &mut ConstraintSystem<BN254Scalar>) -> XorConfig {
        let a = cs.advice_column();
        let b = cs.advice_column();
        let c = cs.advice_column();
        let table = [cs.fixed_column(), cs.fixed_column(), cs.fixed_column()];
        let q = cs.selector();
        cs.lookup("xor", |cs| {
            let q = cs.query_selector(q);
            let a = cs.query_advice(a, Rotation::cur());
            let b = cs.query_advice(b, Rotation::cur());
            let c = cs.query_advice(c, Rotation::cur());
            let ta = cs.query_fixed(table[0], Rotation::cur());
            let tb = cs.query_fixed(table[1], Rotation::cur());
            let tc = cs.query_fixed(table[2], Rotation::cur());
            vec![(q.clone() * a, ta), (q.clone() * b, tb), (q * c, tc)]
        });
        XorConfig { a, b, c, table, q }
    }

    fn synthesize<A: Assignment<BN254Scalar>>(
        &self,
        config: XorConfig,
        assignment: &mut A,
    ) -> Result<()> {
        for row in 0..16u32 {
            let (x, y) = (row >> 2, row & 3);
            let r = row as usize;
            assignment.assign_fixed(config.table[0], r, BN254Scalar::from(x))?;
            assignment.assign_fixed(config.table[1], r, BN254Scalar::from(y))?;
            assignment.assign_fixed(config.table[2], r, BN254Scalar::from(x ^ y))?;
        }
        for row in 0..XOR_ROWS {
            let (a, b, c) = self.rows.get(row).copied().unwrap_or_default();
            assignment.enable_selector(&config.q, row)?;
            assignment.assign_advice(config.a, row, BN254Scalar::from(a))?;
            assignment.assign_advice(config.b, row, BN254Scalar::from(b))?;
            assignment.assign_advice(config.c, row, BN254Scalar::from(c))?;
        }
        Ok(())
    }
}

/// KZG with instance columns committed and opened like advice columns.
pub struct QueryInstanceKZG(pub KZGCommitmentSchemeBN254);

impl PolyComScheme for QueryInstanceKZG {
    type Field = <KZGCommitmentSchemeBN254 as PolyComScheme>::Field;
    type Commitment = <KZGCommitmentSchemeBN254 as PolyComScheme>::Commitment;
    type OpeningProof = <KZGCommitmentSchemeBN254 as PolyComScheme>::OpeningProof;

    const QUERY_INSTANCE: bool = true;

    fn max_degree(&self) -> usize {
        self.0.max_degree()
    }

    fn commit(&self, polynomial: &FpPolynomial<Self::Field>) -> Result<Self::Commitment> {
        self.0.commit(polynomial)
    }

    fn commit_lagrange(&self, evals: &[Self::Field]) -> Result<Self::Commitment> {
        self.0.commit_lagrange(evals)
    }

    fn set_batch_mode(&mut self, count: usize) {
        self.0.set_batch_mode(count)
    }

    fn batch_commit(
        &mut self,
        polynomial: &FpPolynomial<Self::Field>,
        slot: usize,
    ) -> Result<()> {
        self.0.batch_commit(polynomial, slot)
    }

    fn batch_commit_lagrange(&mut self, evals: &[Self::Field], slot: usize) -> Result<()> {
        self.0.batch_commit_lagrange(evals, slot)
    }

    fn get_batch_commitments(&mut self) -> Result<Vec<Self::Commitment>> {
        self.0.get_batch_commitments()
    }

    fn batch_open(
        &self,
        transcript: &mut Transcript,
        points: &PointSet<Self::Field>,
        openings: &[PolynomialOpening<'_, Self::Field>],
    ) -> Result<Self::OpeningProof> {
        self.0.batch_open(transcript, points, openings)
    }

    fn batch_verify(
        &self,
        transcript: &mut Transcript,
        points: &PointSet<Self::Field>,
        openings: &[CommitmentOpening<Self::Commitment, Self::Field>],
        proof: &Self::OpeningProof,
    ) -> Result<()> {
        self.0.batch_verify(transcript, points, openings, proof)
    }

    fn shrink_to_verifier_only(&self) -> Self {
        QueryInstanceKZG(self.0.shrink_to_verifier_only())
    }
}
