use crate::errors::Result;
use crate::plonk::{
    argument::Argument,
    constraint_system::Circuit,
    indexer::{PlonkPK, PlonkPf, PlonkProof},
    transcript::{
        transcript_get_plonk_challenge_beta, transcript_get_plonk_challenge_gamma,
        transcript_get_plonk_challenge_theta, transcript_get_plonk_challenge_x,
        transcript_get_plonk_challenge_y, transcript_init_plonk,
    },
};
use crate::poly_commit::{pcs::PolyComScheme, point_set::PointSet};
use ark_std::{end_timer, start_timer};
use lumen_algebra::prelude::*;
use merlin::Transcript;
use tracing::debug;

/// Produce a proof that every circuit in `circuits` is satisfied by its
/// witness under the matching public `instances`.
///
/// The verifier must start from a transcript in the same state. `pcs` is
/// mutable because the instance and advice columns are committed in batch
/// mode.
///
/// # Example
/// ```
/// use lumen_plonk::plonk::{
///     constraint_system::{Advice, Assignment, Circuit, Column, ConstraintSystem, Instance, Rotation, Selector},
///     indexer::{keygen_pk, keygen_vk},
///     prover::prover,
///     verifier::verify_proof,
/// };
/// use lumen_plonk::errors::Result;
/// use lumen_plonk::poly_commit::kzg_poly_com::KZGCommitmentSchemeBN254;
/// use lumen_algebra::{bn254::BN254Scalar, prelude::*};
/// use merlin::Transcript;
/// use rand_chacha::ChaChaRng;
///
/// #[derive(Clone)]
/// struct Config {
///     a: Column<Advice>,
///     b: Column<Advice>,
///     out: Column<Instance>,
///     q: Selector,
/// }
///
/// // a + b = out
/// struct AddCircuit {
///     a: BN254Scalar,
///     b: BN254Scalar,
/// }
///
/// impl Circuit<BN254Scalar> for AddCircuit {
///     type Config = Config;
///
///     fn configure(cs: &mut ConstraintSystem<BN254Scalar>) -> Config {
///         let a = cs.advice_column();
///         let b = cs.advice_column();
///         let out = cs.instance_column();
///         let q = cs.selector();
///         cs.create_gate("add", |cs| {
///             let q = cs.query_selector(q);
///             let a = cs.query_advice(a, Rotation::cur());
///             let b = cs.query_advice(b, Rotation::cur());
///             let out = cs.query_instance(out, Rotation::cur());
///             vec![q * (a + b - out)]
///         });
///         Config { a, b, out, q }
///     }
///
///     fn synthesize<A: Assignment<BN254Scalar>>(&self, config: Config, assignment: &mut A) -> Result<()> {
///         assignment.enable_selector(&config.q, 0)?;
///         assignment.assign_advice(config.a, 0, self.a)?;
///         assignment.assign_advice(config.b, 0, self.b)?;
///         Ok(())
///     }
/// }
///
/// let mut prng = ChaChaRng::from_seed([0u8; 32]);
/// let mut pcs = KZGCommitmentSchemeBN254::new(16, &mut prng).unwrap();
/// let circuit = AddCircuit { a: BN254Scalar::from(2u32), b: BN254Scalar::from(3u32) };
/// let vk = keygen_vk(&pcs, &circuit).unwrap();
/// let pk = keygen_pk(&pcs, vk, &circuit).unwrap();
/// let instances = vec![vec![vec![BN254Scalar::from(5u32)]]];
///
/// let proof = {
///     let mut transcript = Transcript::new(b"Test");
///     prover(&mut prng, &mut transcript, &mut pcs, &pk, &[circuit], &instances).unwrap()
/// };
///
/// let mut transcript = Transcript::new(b"Test");
/// assert!(verify_proof(&mut transcript, &pcs, pk.get_verifier_params_ref(), &instances, &proof).is_ok());
/// ```
pub fn prover<R: CryptoRng + RngCore, PCS: PolyComScheme, C: Circuit<PCS::Field>>(
    prng: &mut R,
    transcript: &mut Transcript,
    pcs: &mut PCS,
    pk: &PlonkPK<PCS>,
    circuits: &[C],
    instances: &[Vec<Vec<PCS::Field>>],
) -> Result<PlonkPf<PCS>> {
    let prover_timer = start_timer!(|| "Lumen PLONK prover");
    let vk = pk.get_verifier_params_ref();
    transcript_init_plonk(transcript, vk)?;
    let n = vk.n;

    let mut argument = Argument::create(pk, pcs, circuits, instances, prng, transcript)?;
    debug!(
        circuits = argument.num_circuits(),
        n, "instances and advice committed"
    );

    let theta = transcript_get_plonk_challenge_theta(transcript, n);
    let lookups = argument.compress_lookup_step(pcs, theta, prng, transcript)?;
    let lookup_permuted_commitments = lookups
        .iter()
        .map(|circuit| circuit.iter().map(|l| l.commitments()).collect())
        .collect();

    let beta = transcript_get_plonk_challenge_beta(transcript, n);
    let gamma = transcript_get_plonk_challenge_gamma(transcript, n);
    let mut step = argument.commit_circuit_step(pcs, lookups, beta, gamma, prng, transcript)?;
    let permutations = step.take_permutations();
    let lookups = step.take_lookups();
    let vanishing = step.take_vanishing()?;
    let permutation_product_commitments = permutations
        .iter()
        .map(|p| p.commitments().to_vec())
        .collect();
    let lookup_product_commitments = lookups
        .iter()
        .map(|circuit| circuit.iter().map(|l| l.product_commitment()).collect())
        .collect();
    let random_poly_commitment = vanishing.random_commitment();
    debug!("grand products committed");

    argument.transform_advice()?;

    let y = transcript_get_plonk_challenge_y(transcript, n);
    let vanishing = argument.generate_circuit_polynomial(
        pcs,
        &permutations,
        &lookups,
        vanishing,
        y,
        transcript,
    )?;
    let h_commitments = vanishing.h_commitments();
    debug!(pieces = h_commitments.len(), "quotient committed");

    let x = transcript_get_plonk_challenge_x(transcript, n);
    let evaluated = argument.evaluate_circuit_step(x, permutations, lookups, vanishing, transcript)?;

    let mut points = PointSet::new();
    let openings = argument.construct_openings(&evaluated, &mut points)?;
    debug!(
        openings = openings.len(),
        points = points.len(),
        "opening claims collected"
    );
    let opening_time = start_timer!(|| "Batch open");
    let opening = pcs.batch_open(transcript, &points, &openings)?;
    end_timer!(opening_time);

    let proof = PlonkProof {
        instance_commitments: if PCS::QUERY_INSTANCE {
            argument.instance_commitments().to_vec()
        } else {
            vec![]
        },
        advice_commitments: argument.advice_commitments().to_vec(),
        lookup_permuted_commitments,
        permutation_product_commitments,
        lookup_product_commitments,
        random_poly_commitment,
        h_commitments,
        challenges: argument.challenges(),
        instance_evals: evaluated.instance_evals.clone(),
        advice_evals: evaluated.advice_evals.clone(),
        fixed_evals: evaluated.fixed_evals.clone(),
        random_eval: evaluated.vanishing.random_eval(),
        permutation_common_evals: evaluated.permutation_common_evals.clone(),
        permutation_evals: evaluated.permutations.iter().map(|p| p.evals()).collect(),
        lookup_evals: evaluated
            .lookups
            .iter()
            .map(|circuit| circuit.iter().map(|l| l.evals()).collect())
            .collect(),
        opening,
    };
    end_timer!(prover_timer);
    Ok(proof)
}
