use crate::errors::Result;
use crate::poly_commit::{
    field_polynomial::FpPolynomial,
    point_set::{PointRef, PointSet},
};
use ark_std::fmt::Debug;
use lumen_algebra::traits::{Domain, Scalar};
use merlin::Transcript;
use serde::{de::DeserializeOwned, Serialize};

/// The trait for help serialize to bytes,
/// implement by polynomial commitment.
pub trait ToBytes {
    /// Convert to bytes.
    fn to_bytes(&self) -> Vec<u8>;
}

/// The trait for homomorphic polynomial commitment field.
pub trait HomomorphicPolyComElem: ToBytes {
    /// This is the scalar field of the polynomial.
    type Scalar;

    /// Get base (generator) of the group.
    fn get_base() -> Self;

    /// Get identity of the group.
    fn get_identity() -> Self;

    /// Add the underlying polynomials.
    fn add(&self, other: &Self) -> Self;

    /// Add assign the underlying polynomials.
    fn add_assign(&mut self, other: &Self);

    /// Subtract the underlying polynomials.
    fn sub(&self, other: &Self) -> Self;

    /// Subtract assign the underlying polynomials.
    fn sub_assign(&mut self, other: &Self);

    /// Multiply underlying polynomial by scalar `exp`.
    fn mul(&self, exp: &Self::Scalar) -> Self;

    /// Multiply underlying polynomial by scalar `exp`.
    fn mul_assign(&mut self, exp: &Self::Scalar);
}

/// A scheme committing to vectors of field elements, with a deferred batch
/// mode. The batch sequence is `set_vector_batch_mode(count)`, one
/// `batch_commit_vector` per slot, then `get_vector_batch_commitments`.
pub trait VectorCommitmentScheme {
    /// Type of the committed values.
    type Field: Scalar;

    /// Type of the commitments.
    type Commitment: Debug + PartialEq + Eq + Clone;

    /// Whether the parameters are sampled without a trapdoor.
    const IS_TRANSPARENT: bool;

    /// The largest number of values one commitment holds.
    fn max_len(&self) -> usize;

    /// Commit to `values`.
    fn commit_vector(&self, values: &[Self::Field]) -> Result<Self::Commitment>;

    /// Enter batch mode with `count` deferred slots.
    fn set_vector_batch_mode(&mut self, count: usize);

    /// Defer the commitment of `values` into `slot`.
    fn batch_commit_vector(&mut self, values: &[Self::Field], slot: usize) -> Result<()>;

    /// Compute every deferred commitment in slot order and leave batch mode.
    fn get_vector_batch_commitments(&mut self) -> Result<Vec<Self::Commitment>>;
}

/// A prover-side claim: `poly` evaluates to `eval` at the point behind `point`.
#[derive(Clone, Debug)]
pub struct PolynomialOpening<'a, F> {
    /// The polynomial to open.
    pub poly: &'a FpPolynomial<F>,
    /// The opening point.
    pub point: PointRef,
    /// The claimed evaluation.
    pub eval: F,
}

impl<'a, F> PolynomialOpening<'a, F> {
    /// Bundle an opening claim.
    pub fn new(poly: &'a FpPolynomial<F>, point: PointRef, eval: F) -> Self {
        Self { poly, point, eval }
    }
}

/// A verifier-side claim: the polynomial behind `commitment` evaluates to
/// `eval` at the point behind `point`.
#[derive(Clone, Debug)]
pub struct CommitmentOpening<C, F> {
    /// The commitment of the opened polynomial.
    pub commitment: C,
    /// The opening point.
    pub point: PointRef,
    /// The claimed evaluation.
    pub eval: F,
}

impl<C, F> CommitmentOpening<C, F> {
    /// Bundle an opening claim.
    pub fn new(commitment: C, point: PointRef, eval: F) -> Self {
        Self {
            commitment,
            point,
            eval,
        }
    }
}

/// Trait for polynomial commitment scheme.
pub trait PolyComScheme: Sized {
    /// Type of prime field.
    type Field: Domain;

    /// Type of commitment produces, need to implement `HomomorphicPolyComElem`.
    type Commitment: HomomorphicPolyComElem<Scalar = Self::Field>
        + ToBytes
        + Debug
        + PartialEq
        + Eq
        + Clone
        + Send
        + Sync
        + Serialize
        + DeserializeOwned;

    /// Type of the multi-point opening proof.
    type OpeningProof: Debug + PartialEq + Eq + Clone + Serialize + DeserializeOwned;

    /// Whether instance columns are committed and opened like advice columns.
    /// When `false` the instance values go to the transcript and the verifier
    /// evaluates them itself.
    const QUERY_INSTANCE: bool;

    /// Return the maximum degree supported.
    fn max_degree(&self) -> usize;

    /// Commits to the polynomial, commitment is binding.
    fn commit(&self, polynomial: &FpPolynomial<Self::Field>) -> Result<Self::Commitment>;

    /// Commits to the polynomial given by its values over the evaluation domain.
    fn commit_lagrange(&self, evals: &[Self::Field]) -> Result<Self::Commitment>;

    /// Enter batch mode with `count` deferred commitment slots.
    fn set_batch_mode(&mut self, count: usize);

    /// Defer the commitment of `polynomial` into `slot`.
    fn batch_commit(&mut self, polynomial: &FpPolynomial<Self::Field>, slot: usize)
        -> Result<()>;

    /// Defer the commitment of the polynomial with values `evals` into `slot`.
    fn batch_commit_lagrange(&mut self, evals: &[Self::Field], slot: usize) -> Result<()>;

    /// Compute every deferred commitment in slot order and leave batch mode.
    fn get_batch_commitments(&mut self) -> Result<Vec<Self::Commitment>>;

    /// Prove all `openings` at once.
    fn batch_open(
        &self,
        transcript: &mut Transcript,
        points: &PointSet<Self::Field>,
        openings: &[PolynomialOpening<'_, Self::Field>],
    ) -> Result<Self::OpeningProof>;

    /// Verify a proof produced by `batch_open` for the same claims.
    fn batch_verify(
        &self,
        transcript: &mut Transcript,
        points: &PointSet<Self::Field>,
        openings: &[CommitmentOpening<Self::Commitment, Self::Field>],
        proof: &Self::OpeningProof,
    ) -> Result<()>;

    /// Shrink this to only for verifier use.
    fn shrink_to_verifier_only(&self) -> Self;
}
