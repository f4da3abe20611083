use criterion::{criterion_group, criterion_main, Criterion};
use lumen_algebra::{bn254::BN254Scalar, prelude::*};
use lumen_plonk::errors::Result;
use lumen_plonk::plonk::{
    constraint_system::{Advice, Assignment, Circuit, Column, ConstraintSystem, Rotation, Selector},
    indexer::{keygen_pk, keygen_vk},
    prover::prover,
    verifier::verify_proof,
};
use lumen_plonk::poly_commit::kzg_poly_com::KZGCommitmentSchemeBN254;
use merlin::Transcript;

const SIZE: usize = 1 << 10;
const ROWS: usize = 1000;

#[derive(Clone)]
struct FibConfig {
    a: Column<Advice>,
    q: Selector,
}

/// `a[i + 2] = a[i + 1] + a[i]`
struct FibCircuit;

impl Circuit<BN254Scalar> for FibCircuit {
    type Config = FibConfig;

    fn configure(cs: &mut ConstraintSystem<BN254Scalar>) -> FibConfig {
        let a = cs.advice_column();
        let q = cs.selector();
        cs.create_gate("fibonacci", |cs| {
            let q = cs.query_selector(q);
            let a0 = cs.query_advice(a, Rotation::cur());
            let a1 = cs.query_advice(a, Rotation::next());
            let a2 = cs.query_advice(a, Rotation(2));
            vec![q * (a0 + a1 - a2)]
        });
        FibConfig { a, q }
    }

    fn synthesize<A: Assignment<BN254Scalar>>(
        &self,
        config: FibConfig,
        assignment: &mut A,
    ) -> Result<()> {
        let (mut x, mut y) = (BN254Scalar::one(), BN254Scalar::one());
        assignment.assign_advice(config.a, 0, x)?;
        assignment.assign_advice(config.a, 1, y)?;
        for row in 2..ROWS {
            assignment.enable_selector(&config.q, row - 2)?;
            let z = x.add(&y);
            assignment.assign_advice(config.a, row, z)?;
            x = y;
            y = z;
        }
        Ok(())
    }
}

fn prove_fibonacci(c: &mut Criterion) {
    let mut prng = test_rng();
    let mut pcs = KZGCommitmentSchemeBN254::new(SIZE, &mut prng).unwrap();
    let vk = keygen_vk(&pcs, &FibCircuit).unwrap();
    let pk = keygen_pk(&pcs, vk, &FibCircuit).unwrap();
    let instances: Vec<Vec<Vec<BN254Scalar>>> = vec![vec![]];

    let mut group = c.benchmark_group("prover");
    group.sample_size(10);
    group.bench_function(format!("fibonacci of {} rows", ROWS), |b| {
        b.iter(|| {
            let mut transcript = Transcript::new(b"bench");
            prover(
                &mut prng,
                &mut transcript,
                &mut pcs,
                &pk,
                &[FibCircuit],
                &instances,
            )
            .unwrap()
        });
    });
    group.finish();

    let mut transcript = Transcript::new(b"bench");
    let proof = prover(
        &mut prng,
        &mut transcript,
        &mut pcs,
        &pk,
        &[FibCircuit],
        &instances,
    )
    .unwrap();

    let verifier_pcs = pcs.shrink_to_verifier_only();
    let mut group = c.benchmark_group("verifier");
    group.bench_function(format!("fibonacci of {} rows", ROWS), |b| {
        b.iter(|| {
            let mut transcript = Transcript::new(b"bench");
            verify_proof(
                &mut transcript,
                &verifier_pcs,
                pk.get_verifier_params_ref(),
                &instances,
                &proof,
            )
            .unwrap()
        });
    });
    group.finish();
}

criterion_group!(benches, prove_fibonacci);
criterion_main!(benches);
