mod common;

use common::{
    add_instances, init_tracing, shift_commitment, shift_eval, AddCircuit, QueryInstanceKZG,
};
use lumen_algebra::{bn254::BN254Scalar, prelude::*};
use lumen_plonk::errors::PlonkError;
use lumen_plonk::plonk::{
    indexer::{keygen_pk, keygen_vk, PlonkPK, PlonkPf},
    prover::prover,
    verifier::verify_proof,
};
use lumen_plonk::poly_commit::{kzg_poly_com::KZGCommitmentSchemeBN254, pcs::PolyComScheme};
use merlin::Transcript;
use rand_chacha::ChaChaRng;

const LABEL: &[u8] = b"lumen plonk test";

fn prove<PCS: PolyComScheme<Field = BN254Scalar>>(
    pcs: &mut PCS,
    pk: &PlonkPK<PCS>,
    circuits: &[AddCircuit],
    instances: &[Vec<Vec<BN254Scalar>>],
) -> PlonkPf<PCS> {
    let mut prng = ChaChaRng::from_seed([7u8; 32]);
    let mut transcript = Transcript::new(LABEL);
    prover(&mut prng, &mut transcript, pcs, pk, circuits, instances).unwrap()
}

fn verify<PCS: PolyComScheme<Field = BN254Scalar>>(
    pcs: &PCS,
    pk: &PlonkPK<PCS>,
    instances: &[Vec<Vec<BN254Scalar>>],
    proof: &PlonkPf<PCS>,
) -> Result<(), PlonkError> {
    let mut transcript = Transcript::new(LABEL);
    verify_proof(
        &mut transcript,
        pcs,
        pk.get_verifier_params_ref(),
        instances,
        proof,
    )
}

fn setup() -> (KZGCommitmentSchemeBN254, PlonkPK<KZGCommitmentSchemeBN254>) {
    let mut prng = ChaChaRng::from_seed([1u8; 32]);
    let pcs = KZGCommitmentSchemeBN254::new(16, &mut prng).unwrap();
    let vk = keygen_vk(&pcs, &AddCircuit).unwrap();
    let pk = keygen_pk(&pcs, vk, &AddCircuit).unwrap();
    (pcs, pk)
}

#[test]
fn add_circuit_proves_and_verifies() {
    init_tracing();
    let (mut pcs, pk) = setup();
    let instances = vec![add_instances(1, 1)];
    let proof = prove(&mut pcs, &pk, &[AddCircuit], &instances);
    assert_eq!(proof.challenges.len(), 5);
    assert_eq!(proof.advice_commitments[0].len(), 3);
    assert!(proof.instance_commitments.is_empty());
    assert!(verify(&pcs, &pk, &instances, &proof).is_ok());

    // the verifier only needs the G2 part of the parameters
    let verifier_pcs = pcs.shrink_to_verifier_only();
    assert!(verify(&verifier_pcs, &pk, &instances, &proof).is_ok());
}

#[test]
fn proofs_survive_serialization() {
    let (mut pcs, pk) = setup();
    let instances = vec![add_instances(2, 5)];
    let proof = prove(&mut pcs, &pk, &[AddCircuit], &instances);

    let bytes = bincode::serialize(&proof).unwrap();
    let restored: PlonkPf<KZGCommitmentSchemeBN254> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(restored, proof);

    let vk_bytes = bincode::serialize(pk.get_verifier_params_ref()).unwrap();
    let vk: lumen_plonk::plonk::indexer::PlonkVK<KZGCommitmentSchemeBN254> =
        bincode::deserialize(&vk_bytes).unwrap();
    let mut transcript = Transcript::new(LABEL);
    assert!(verify_proof(&mut transcript, &pcs, &vk, &instances, &restored).is_ok());
}

#[test]
fn wrong_instances_are_rejected() {
    let (mut pcs, pk) = setup();
    let instances = vec![add_instances(1, 1)];
    let proof = prove(&mut pcs, &pk, &[AddCircuit], &instances);
    assert!(verify(&pcs, &pk, &[add_instances(1, 2)], &proof).is_err());
    assert_eq!(
        verify(&pcs, &pk, &[add_instances(1, 1), add_instances(1, 1)], &proof),
        Err(PlonkError::CircuitCountMismatch)
    );
}

type Tamper = (&'static str, fn(&mut PlonkPf<KZGCommitmentSchemeBN254>));

#[test]
fn tampered_proofs_are_rejected() {
    let (mut pcs, pk) = setup();
    let instances = vec![add_instances(3, 4)];
    let proof = prove(&mut pcs, &pk, &[AddCircuit], &instances);
    assert!(verify(&pcs, &pk, &instances, &proof).is_ok());

    let tampers: [Tamper; 15] = [
        ("swapped advice", |p| p.advice_commitments[0].swap(0, 1)),
        ("advice commitment", |p| {
            shift_commitment(&mut p.advice_commitments[0][2])
        }),
        ("permutation product commitment", |p| {
            shift_commitment(&mut p.permutation_product_commitments[0][0])
        }),
        ("last permutation product commitment", |p| {
            let last = p.permutation_product_commitments[0].len() - 1;
            shift_commitment(&mut p.permutation_product_commitments[0][last])
        }),
        ("random commitment", |p| {
            shift_commitment(&mut p.random_poly_commitment)
        }),
        ("quotient piece", |p| shift_commitment(&mut p.h_commitments[0])),
        ("opening h", |p| shift_commitment(&mut p.opening.h_commitment)),
        ("opening q", |p| shift_commitment(&mut p.opening.q_commitment)),
        ("advice eval", |p| shift_eval(&mut p.advice_evals[0][0])),
        ("fixed eval", |p| shift_eval(&mut p.fixed_evals[0])),
        ("random eval", |p| shift_eval(&mut p.random_eval)),
        ("sigma eval", |p| shift_eval(&mut p.permutation_common_evals[3])),
        ("permutation eval", |p| {
            shift_eval(&mut p.permutation_evals[0][1].eval)
        }),
        ("permutation next eval", |p| {
            shift_eval(&mut p.permutation_evals[0][0].next_eval)
        }),
        ("permutation last eval", |p| {
            shift_eval(p.permutation_evals[0][0].last_eval.as_mut().unwrap())
        }),
    ];
    for (name, tamper) in tampers.iter() {
        let mut bad = proof.clone();
        tamper(&mut bad);
        assert!(
            verify(&pcs, &pk, &instances, &bad).is_err(),
            "accepted a proof with a changed {}",
            name
        );
    }

    let mut bad = proof.clone();
    bad.challenges[4].add_assign(&BN254Scalar::one());
    assert_eq!(
        verify(&pcs, &pk, &instances, &bad),
        Err(PlonkError::ChallengeError)
    );

    let mut bad = proof.clone();
    bad.h_commitments.pop();
    assert_eq!(
        verify(&pcs, &pk, &instances, &bad),
        Err(PlonkError::ProofError)
    );
}

#[test]
fn one_proof_covers_several_circuits() {
    let (mut pcs, pk) = setup();
    let instances = vec![add_instances(1, 1), add_instances(10, 20), add_instances(0, 3)];
    let proof = prove(&mut pcs, &pk, &[AddCircuit, AddCircuit, AddCircuit], &instances);
    assert_eq!(proof.advice_commitments.len(), 3);
    assert_eq!(proof.permutation_product_commitments.len(), 3);
    assert!(verify(&pcs, &pk, &instances, &proof).is_ok());

    let mut swapped = instances.clone();
    swapped.swap(0, 1);
    assert!(verify(&pcs, &pk, &swapped, &proof).is_err());
}

#[test]
fn prover_checks_its_inputs() {
    let (mut pcs, pk) = setup();
    let mut prng = ChaChaRng::from_seed([0u8; 32]);

    let mut transcript = Transcript::new(LABEL);
    let no_circuits: [AddCircuit; 0] = [];
    assert_eq!(
        prover(&mut prng, &mut transcript, &mut pcs, &pk, &no_circuits, &[]).err(),
        Some(PlonkError::CircuitCountMismatch)
    );

    let mut transcript = Transcript::new(LABEL);
    let instances = vec![add_instances(1, 1), add_instances(1, 1)];
    assert_eq!(
        prover(&mut prng, &mut transcript, &mut pcs, &pk, &[AddCircuit], &instances).err(),
        Some(PlonkError::CircuitCountMismatch)
    );

    // 16 rows leave 10 usable rows
    let mut transcript = Transcript::new(LABEL);
    let long = vec![vec![vec![BN254Scalar::one(); 11]]];
    assert_eq!(
        prover(&mut prng, &mut transcript, &mut pcs, &pk, &[AddCircuit], &long).err(),
        Some(PlonkError::ColumnSizeError)
    );
}

#[test]
fn instance_columns_can_be_committed_and_opened() {
    let mut prng = ChaChaRng::from_seed([3u8; 32]);
    let mut pcs = QueryInstanceKZG(KZGCommitmentSchemeBN254::new(16, &mut prng).unwrap());
    let vk = keygen_vk(&pcs, &AddCircuit).unwrap();
    let pk = keygen_pk(&pcs, vk, &AddCircuit).unwrap();

    let instances = vec![add_instances(6, 9), add_instances(2, 2)];
    let proof = prove(&mut pcs, &pk, &[AddCircuit, AddCircuit], &instances);
    assert_eq!(proof.instance_commitments.len(), 2);
    assert_eq!(proof.instance_evals[0].len(), 1);
    assert!(verify(&pcs, &pk, &instances, &proof).is_ok());

    assert_eq!(
        verify(&pcs, &pk, &[add_instances(6, 9), add_instances(2, 3)], &proof),
        Err(PlonkError::VerificationError)
    );
}
