use crate::errors::{PlonkError, Result};
use crate::poly_commit::{
    batch::BatchCommitState,
    field_polynomial::FpPolynomial,
    pcs::{
        CommitmentOpening, HomomorphicPolyComElem, PolyComScheme, PolynomialOpening, ToBytes,
        VectorCommitmentScheme,
    },
    point_set::PointSet,
    shplonk::{shplonk_open, shplonk_reduce, ShplonkProof},
};
use ark_poly::{domain::DomainCoeff, EvaluationDomain};
use ark_std::{cfg_iter, end_timer, start_timer};
use lumen_algebra::{bn254::BN254PairingEngine, prelude::*};
use merlin::Transcript;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The largest degree a setup may support; setups have at most
/// `KZG_MAX_DEGREE + 1` elements.
pub const KZG_MAX_DEGREE: usize = (1 << 20) - 1;

/// KZG commitment scheme over the `Group`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct KZGCommitment<G>(pub G);

impl<G: Group> ToBytes for KZGCommitment<G> {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_compressed_bytes()
    }
}

impl<G: Group> HomomorphicPolyComElem for KZGCommitment<G> {
    type Scalar = G::ScalarType;

    fn get_base() -> Self {
        KZGCommitment(G::get_base())
    }

    fn get_identity() -> Self {
        KZGCommitment(G::get_identity())
    }

    fn add(&self, other: &Self) -> Self {
        KZGCommitment(self.0.add(&other.0))
    }

    fn add_assign(&mut self, other: &Self) {
        self.0.add_assign(&other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        KZGCommitment(self.0.sub(&other.0))
    }

    fn sub_assign(&mut self, other: &Self) {
        self.0.sub_assign(&other.0)
    }

    fn mul(&self, exp: &G::ScalarType) -> Self {
        KZGCommitment(self.0.mul(exp))
    }

    fn mul_assign(&mut self, exp: &G::ScalarType) {
        self.0 = self.0.mul(exp)
    }
}

/// Which basis a deferred commitment uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Basis {
    Monomial,
    Lagrange,
}

/// The inputs of one deferred commitment.
#[derive(Clone, Debug)]
struct PendingCommit<F> {
    basis: Basis,
    scalars: Vec<F>,
}

/// KZG commitment scheme about `PairingEngine`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "", try_from = "KZGParameters<P>")]
pub struct KZGCommitmentScheme<P: Pairing> {
    /// The powers `[tau^i]_1`.
    pub public_parameter_group_1: Vec<P::G1>,
    /// The Lagrange basis `[L_i(tau)]_1` over the domain of the same size.
    pub public_parameter_lagrange: Vec<P::G1>,
    /// `[1]_2` and `[tau]_2`.
    pub public_parameter_group_2: Vec<P::G2>,
    #[serde(skip)]
    batch: BatchCommitState<PendingCommit<P::ScalarField>>,
}

/// The serialized form of the parameters, checked when read back.
#[derive(Deserialize)]
#[serde(bound = "")]
struct KZGParameters<P: Pairing> {
    public_parameter_group_1: Vec<P::G1>,
    public_parameter_lagrange: Vec<P::G1>,
    public_parameter_group_2: Vec<P::G2>,
}

impl<P: Pairing> TryFrom<KZGParameters<P>> for KZGCommitmentScheme<P> {
    type Error = PlonkError;

    fn try_from(params: KZGParameters<P>) -> Result<Self> {
        if params.public_parameter_group_1.len() != params.public_parameter_lagrange.len() {
            return Err(PlonkError::SetupError);
        }
        Ok(Self {
            public_parameter_group_1: params.public_parameter_group_1,
            public_parameter_lagrange: params.public_parameter_lagrange,
            public_parameter_group_2: params.public_parameter_group_2,
            batch: BatchCommitState::default(),
        })
    }
}

/// KZG commitment scheme over the BN254 curve
pub type KZGCommitmentSchemeBN254 = KZGCommitmentScheme<BN254PairingEngine>;

impl<P: Pairing> KZGCommitmentScheme<P>
where
    P::ScalarField: Domain,
{
    /// Create a new instance of a KZG polynomial commitment scheme with
    /// `size` elements per basis, for a random secret.
    pub fn new<R: CryptoRng + RngCore>(size: usize, prng: &mut R) -> Result<Self> {
        let tau = P::ScalarField::random(prng);
        Self::unsafe_setup(size, tau)
    }

    /// Derive the parameters from a known secret `tau`. Only for tests and
    /// for reproducing a published setup.
    pub fn unsafe_setup(size: usize, tau: P::ScalarField) -> Result<Self> {
        if size > KZG_MAX_DEGREE + 1 {
            return Err(PlonkError::DegreeError);
        }
        if !size.is_power_of_two() {
            return Err(PlonkError::SetupError);
        }
        let setup_time = start_timer!(|| format!("KZG setup of size {}", size));

        let mut powers = Vec::with_capacity(size);
        let mut cur = P::ScalarField::one();
        for _ in 0..size {
            powers.push(cur);
            cur.mul_assign(&tau);
        }
        let domain = FpPolynomial::<P::ScalarField>::evaluation_domain(size)
            .ok_or(PlonkError::GroupNotFound(size))?;
        let lagrange: Vec<P::ScalarField> = domain
            .evaluate_all_lagrange_coefficients(tau.get_field())
            .into_iter()
            .map(P::ScalarField::from_field)
            .collect();

        let g1 = P::G1::get_base();
        let public_parameter_group_1 = cfg_iter!(powers).map(|s| g1.mul(s)).collect();
        let public_parameter_lagrange = cfg_iter!(lagrange).map(|s| g1.mul(s)).collect();
        let g2 = P::G2::get_base();
        let public_parameter_group_2 = vec![g2, g2.mul(&tau)];
        end_timer!(setup_time);

        Ok(Self {
            public_parameter_group_1,
            public_parameter_lagrange,
            public_parameter_group_2,
            batch: BatchCommitState::default(),
        })
    }

    /// Return the number of elements of each basis.
    pub fn size(&self) -> usize {
        self.public_parameter_group_1.len()
    }

    /// Shrink both bases to `n` elements, `n` a power of two smaller than the
    /// current size. The result equals a setup of size `n` with the same secret.
    pub fn downsize(&mut self, n: usize) -> Result<()>
    where
        <P::G1 as Group>::Inner: DomainCoeff<<P::ScalarField as Domain>::Field>,
    {
        if !n.is_power_of_two() || n >= self.size() {
            return Err(PlonkError::DownsizeError);
        }
        let domain = FpPolynomial::<P::ScalarField>::evaluation_domain(n)
            .ok_or(PlonkError::GroupNotFound(n))?;

        self.public_parameter_group_1.truncate(n);
        // [L_i(tau)] = 1/n * sum_j omega^{-ij} [tau^j]
        let powers: Vec<_> = self
            .public_parameter_group_1
            .iter()
            .map(|p| p.into_inner())
            .collect();
        self.public_parameter_lagrange = domain
            .ifft(&powers)
            .into_iter()
            .map(P::G1::from_inner)
            .collect();
        Ok(())
    }

    fn msm(bases: &[P::G1], scalars: &[P::ScalarField]) -> Result<KZGCommitment<P::G1>> {
        let len = ark_std::cmp::min(bases.len(), scalars.len());
        let scalars_ref: Vec<&P::ScalarField> = scalars[..len].iter().collect();
        let bases_ref: Vec<&P::G1> = bases[..len].iter().collect();
        Ok(KZGCommitment(P::G1::multi_exp(&scalars_ref, &bases_ref)?))
    }

    fn check_direct_commit(&self) -> Result<()> {
        if self.batch.is_enabled() {
            Err(PlonkError::BatchModeError)
        } else {
            Ok(())
        }
    }

    /// Commit to coefficients, truncated to the length of the basis.
    pub fn commit_coefs(&self, coefs: &[P::ScalarField]) -> Result<KZGCommitment<P::G1>> {
        self.check_direct_commit()?;
        Self::msm(&self.public_parameter_group_1, coefs)
    }

    fn run_pending(&self, pending: &PendingCommit<P::ScalarField>) -> Result<KZGCommitment<P::G1>> {
        match pending.basis {
            Basis::Monomial => Self::msm(&self.public_parameter_group_1, &pending.scalars),
            Basis::Lagrange => Self::msm(&self.public_parameter_lagrange, &pending.scalars),
        }
    }

    fn run_batch(&mut self) -> Result<Vec<KZGCommitment<P::G1>>> {
        let pending = self.batch.take()?;
        let batch_time = start_timer!(|| format!("KZG batch of {} commitments", pending.len()));
        let commitments = cfg_iter!(pending)
            .map(|p| self.run_pending(p))
            .collect::<Result<Vec<_>>>();
        end_timer!(batch_time);
        commitments
    }

    /// Serialize the parameters to unchecked bytes.
    pub fn to_unchecked_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = vec![];
        let len_1 = self.public_parameter_group_1.len() as u32;
        let len_lagrange = self.public_parameter_lagrange.len() as u32;
        let len_2 = self.public_parameter_group_2.len() as u32;
        bytes.extend(len_1.to_le_bytes());
        bytes.extend(len_lagrange.to_le_bytes());
        bytes.extend(len_2.to_le_bytes());

        for i in self
            .public_parameter_group_1
            .iter()
            .chain(self.public_parameter_lagrange.iter())
        {
            bytes.extend(i.to_unchecked_bytes());
        }
        for i in &self.public_parameter_group_2 {
            bytes.extend(i.to_unchecked_bytes());
        }
        Ok(bytes)
    }

    /// Deserialize the parameters from unchecked bytes.
    pub fn from_unchecked_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 12 {
            return Err(PlonkError::DeserializationError);
        }
        let len_1 = u8_le_slice_to_u32(&bytes[0..4]) as usize;
        let len_lagrange = u8_le_slice_to_u32(&bytes[4..8]) as usize;
        let len_2 = u8_le_slice_to_u32(&bytes[8..12]) as usize;
        if len_1 != len_lagrange {
            return Err(PlonkError::SetupError);
        }
        let n_1 = P::G1::unchecked_size();
        let n_2 = P::G2::unchecked_size();
        if bytes.len() != 12 + n_1 * (len_1 + len_lagrange) + n_2 * len_2 {
            return Err(PlonkError::DeserializationError);
        }

        let mut chunks_1 = bytes[12..12 + n_1 * (len_1 + len_lagrange)].chunks_exact(n_1);
        let mut read_g1 = |count: usize| -> Result<Vec<P::G1>> {
            (0..count)
                .map(|_| {
                    let chunk = chunks_1.next().ok_or(PlonkError::DeserializationError)?;
                    P::G1::from_unchecked_bytes(chunk).map_err(PlonkError::from)
                })
                .collect()
        };
        let public_parameter_group_1 = read_g1(len_1)?;
        let public_parameter_lagrange = read_g1(len_lagrange)?;
        let public_parameter_group_2 = bytes[12 + n_1 * (len_1 + len_lagrange)..]
            .chunks_exact(n_2)
            .map(|chunk| P::G2::from_unchecked_bytes(chunk).map_err(PlonkError::from))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            public_parameter_group_1,
            public_parameter_lagrange,
            public_parameter_group_2,
            batch: BatchCommitState::default(),
        })
    }
}

impl<P: Pairing> PolyComScheme for KZGCommitmentScheme<P>
where
    P::ScalarField: Domain,
{
    type Field = P::ScalarField;
    type Commitment = KZGCommitment<P::G1>;
    type OpeningProof = ShplonkProof<KZGCommitment<P::G1>>;

    const QUERY_INSTANCE: bool = false;

    fn max_degree(&self) -> usize {
        self.public_parameter_group_1.len().saturating_sub(1)
    }

    fn commit(&self, polynomial: &FpPolynomial<P::ScalarField>) -> Result<KZGCommitment<P::G1>> {
        if polynomial.degree() > self.max_degree() {
            return Err(PlonkError::DegreeError);
        }
        self.commit_coefs(polynomial.get_coefs_ref())
    }

    fn commit_lagrange(&self, evals: &[P::ScalarField]) -> Result<KZGCommitment<P::G1>> {
        self.check_direct_commit()?;
        Self::msm(&self.public_parameter_lagrange, evals)
    }

    fn set_batch_mode(&mut self, count: usize) {
        self.batch.enable(count);
    }

    fn batch_commit(
        &mut self,
        polynomial: &FpPolynomial<P::ScalarField>,
        slot: usize,
    ) -> Result<()> {
        if polynomial.degree() > self.max_degree() {
            return Err(PlonkError::DegreeError);
        }
        self.batch.store(
            slot,
            PendingCommit {
                basis: Basis::Monomial,
                scalars: polynomial.coefs.clone(),
            },
        )
    }

    fn batch_commit_lagrange(&mut self, evals: &[P::ScalarField], slot: usize) -> Result<()> {
        self.batch.store(
            slot,
            PendingCommit {
                basis: Basis::Lagrange,
                scalars: evals.to_vec(),
            },
        )
    }

    fn get_batch_commitments(&mut self) -> Result<Vec<KZGCommitment<P::G1>>> {
        self.run_batch()
    }

    fn batch_open(
        &self,
        transcript: &mut Transcript,
        points: &PointSet<P::ScalarField>,
        openings: &[PolynomialOpening<'_, P::ScalarField>],
    ) -> Result<ShplonkProof<KZGCommitment<P::G1>>> {
        shplonk_open(self, transcript, points, openings)
    }

    fn batch_verify(
        &self,
        transcript: &mut Transcript,
        points: &PointSet<P::ScalarField>,
        openings: &[CommitmentOpening<KZGCommitment<P::G1>, P::ScalarField>],
        proof: &ShplonkProof<KZGCommitment<P::G1>>,
    ) -> Result<()> {
        if self.public_parameter_group_2.len() < 2 {
            return Err(PlonkError::SetupError);
        }
        let p = shplonk_reduce(transcript, points, openings, proof)?;
        // e(p, [1]_2) * e(Q, -[tau]_2) == 1
        let pairing_eval = P::product_of_pairings(
            &[p.0, proof.q_commitment.0],
            &[
                self.public_parameter_group_2[0],
                self.public_parameter_group_2[1].neg(),
            ],
        );
        if pairing_eval == P::Gt::get_identity() {
            Ok(())
        } else {
            Err(PlonkError::VerificationError)
        }
    }

    fn shrink_to_verifier_only(&self) -> Self {
        Self {
            public_parameter_group_1: vec![],
            public_parameter_lagrange: vec![],
            public_parameter_group_2: self.public_parameter_group_2.clone(),
            batch: BatchCommitState::default(),
        }
    }
}

/// Vectors are committed as coefficients in the monomial basis.
impl<P: Pairing> VectorCommitmentScheme for KZGCommitmentScheme<P>
where
    P::ScalarField: Domain,
{
    type Field = P::ScalarField;
    type Commitment = KZGCommitment<P::G1>;

    const IS_TRANSPARENT: bool = false;

    fn max_len(&self) -> usize {
        self.size()
    }

    fn commit_vector(&self, values: &[P::ScalarField]) -> Result<KZGCommitment<P::G1>> {
        if values.len() > self.size() {
            return Err(PlonkError::CommitmentError);
        }
        self.commit_coefs(values)
    }

    fn set_vector_batch_mode(&mut self, count: usize) {
        self.batch.enable(count);
    }

    fn batch_commit_vector(&mut self, values: &[P::ScalarField], slot: usize) -> Result<()> {
        if values.len() > self.size() {
            return Err(PlonkError::CommitmentError);
        }
        self.batch.store(
            slot,
            PendingCommit {
                basis: Basis::Monomial,
                scalars: values.to_vec(),
            },
        )
    }

    fn get_vector_batch_commitments(&mut self) -> Result<Vec<KZGCommitment<P::G1>>> {
        self.run_batch()
    }
}

#[cfg(test)]
mod tests_kzg_impl {
    use crate::errors::PlonkError;
    use crate::poly_commit::{
        field_polynomial::FpPolynomial,
        kzg_poly_com::{KZGCommitmentScheme, KZGCommitmentSchemeBN254, KZG_MAX_DEGREE},
        pcs::{HomomorphicPolyComElem, PolyComScheme},
    };
    use lumen_algebra::{
        bn254::{BN254PairingEngine, BN254Scalar, BN254G1},
        prelude::*,
    };
    use rand_chacha::ChaChaRng;

    fn check_public_parameters_generation<P: Pairing>()
    where
        P::ScalarField: Domain,
    {
        let param_size = 8;
        let mut prng = test_rng();
        let kzg_scheme = KZGCommitmentScheme::<P>::new(param_size, &mut prng).unwrap();
        let g2_power1 = kzg_scheme.public_parameter_group_2[1];

        for i in 0..param_size - 1 {
            let elem_first_group_1 = kzg_scheme.public_parameter_group_1[i];
            let elem_next_group_1 = kzg_scheme.public_parameter_group_1[i + 1];
            assert_eq!(
                P::pairing(&elem_first_group_1, &g2_power1),
                P::pairing(&elem_next_group_1, &P::G2::get_base())
            );
        }
        assert_eq!(kzg_scheme.public_parameter_lagrange.len(), param_size);
        assert_eq!(kzg_scheme.public_parameter_group_2.len(), 2);
    }

    #[test]
    fn test_public_parameters() {
        check_public_parameters_generation::<BN254PairingEngine>();
    }

    #[test]
    fn test_setup_size_checks() {
        let tau = BN254Scalar::from(11u32);
        assert_eq!(
            KZGCommitmentSchemeBN254::unsafe_setup(12, tau).unwrap_err(),
            PlonkError::SetupError
        );
        assert_eq!(
            KZGCommitmentSchemeBN254::unsafe_setup((KZG_MAX_DEGREE + 1) * 2, tau).unwrap_err(),
            PlonkError::DegreeError
        );
    }

    #[test]
    fn test_commit_is_truncated_msm() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let pcs = KZGCommitmentSchemeBN254::new(16, &mut prng).unwrap();
        for len in [1usize, 5, 16, 20] {
            let scalars: Vec<BN254Scalar> =
                (0..len).map(|_| BN254Scalar::random(&mut prng)).collect();
            let mut expected = BN254G1::get_identity();
            for (s, g) in scalars.iter().zip(pcs.public_parameter_group_1.iter()) {
                expected = expected.add(&g.mul(s));
            }
            assert_eq!(pcs.commit_coefs(&scalars).unwrap().0, expected);

            let mut expected = BN254G1::get_identity();
            for (s, g) in scalars.iter().zip(pcs.public_parameter_lagrange.iter()) {
                expected = expected.add(&g.mul(s));
            }
            assert_eq!(pcs.commit_lagrange(&scalars).unwrap().0, expected);
        }

        let too_long = FpPolynomial::<BN254Scalar>::random(&mut prng, 16);
        assert_eq!(pcs.commit(&too_long), Err(PlonkError::DegreeError));
    }

    #[test]
    fn test_lagrange_commitment_matches_coefficients() {
        let mut prng = ChaChaRng::from_seed([1u8; 32]);
        let pcs = KZGCommitmentSchemeBN254::new(16, &mut prng).unwrap();
        let domain = FpPolynomial::<BN254Scalar>::evaluation_domain(16).unwrap();
        let evals: Vec<BN254Scalar> = (0..16).map(|_| BN254Scalar::random(&mut prng)).collect();
        let poly = FpPolynomial::ffti_with_domain(&domain, &evals);
        assert_eq!(
            pcs.commit_lagrange(&evals).unwrap(),
            pcs.commit(&poly).unwrap()
        );
    }

    #[test]
    fn test_homomorphic_poly_com_elem() {
        let mut prng = test_rng();
        let pcs = KZGCommitmentSchemeBN254::new(32, &mut prng).unwrap();
        let one = BN254Scalar::one();
        let two = one.add(&one);
        let three = two.add(&one);
        let four = three.add(&one);
        let six = three.add(&three);
        let eight = six.add(&two);
        let poly1 = FpPolynomial::from_coefs(vec![two, three, six]);
        let commitment1 = pcs.commit(&poly1).unwrap();
        let poly2 = FpPolynomial::from_coefs(vec![one, eight, four]);
        let commitment2 = pcs.commit(&poly2).unwrap();

        let commitment_sum = pcs.commit(&poly1.add(&poly2)).unwrap();
        assert_eq!(commitment_sum, commitment1.add(&commitment2));

        let exponent = four.add(&one);
        let commitment_poly1_mult_5 = pcs.commit(&poly1.mul_scalar(&exponent)).unwrap();
        assert_eq!(commitment_poly1_mult_5, commitment1.mul(&exponent));
    }

    #[test]
    fn test_batch_matches_single() {
        let mut prng = ChaChaRng::from_seed([2u8; 32]);
        let mut pcs = KZGCommitmentSchemeBN254::new(16, &mut prng).unwrap();
        for count in 1..=6usize {
            let inputs: Vec<Vec<BN254Scalar>> = (0..count)
                .map(|i| {
                    (0..(3 + i * 2))
                        .map(|_| BN254Scalar::random(&mut prng))
                        .collect()
                })
                .collect();
            let expected: Vec<_> = inputs
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    if i % 2 == 0 {
                        pcs.commit(&FpPolynomial::from_coefs(v.clone())).unwrap()
                    } else {
                        pcs.commit_lagrange(v).unwrap()
                    }
                })
                .collect();

            pcs.set_batch_mode(count);
            for (i, v) in inputs.iter().enumerate().rev() {
                if i % 2 == 0 {
                    pcs.batch_commit(&FpPolynomial::from_coefs(v.clone()), i)
                        .unwrap();
                } else {
                    pcs.batch_commit_lagrange(v, i).unwrap();
                }
            }
            assert_eq!(
                pcs.commit_lagrange(&inputs[0]),
                Err(PlonkError::BatchModeError)
            );
            assert_eq!(pcs.get_batch_commitments().unwrap(), expected);
            assert!(pcs.get_batch_commitments().is_err());
        }
    }

    #[test]
    fn test_downsize_equals_smaller_setup() {
        let tau = BN254Scalar::from(123456789u64);
        let mut big = KZGCommitmentSchemeBN254::unsafe_setup(32, tau).unwrap();
        big.downsize(8).unwrap();
        let small = KZGCommitmentSchemeBN254::unsafe_setup(8, tau).unwrap();
        assert_eq!(big.public_parameter_group_1, small.public_parameter_group_1);
        assert_eq!(big.public_parameter_lagrange, small.public_parameter_lagrange);
        assert_eq!(big.public_parameter_group_2, small.public_parameter_group_2);

        assert_eq!(big.downsize(8), Err(PlonkError::DownsizeError));
        assert_eq!(big.downsize(3), Err(PlonkError::DownsizeError));
        assert_eq!(big.downsize(16), Err(PlonkError::DownsizeError));
    }

    #[test]
    fn test_unchecked_bytes_round_trip() {
        let mut prng = ChaChaRng::from_seed([3u8; 32]);
        let pcs = KZGCommitmentSchemeBN254::new(8, &mut prng).unwrap();
        let bytes = pcs.to_unchecked_bytes().unwrap();
        let restored = KZGCommitmentSchemeBN254::from_unchecked_bytes(&bytes).unwrap();
        assert_eq!(pcs.public_parameter_group_1, restored.public_parameter_group_1);
        assert_eq!(pcs.public_parameter_lagrange, restored.public_parameter_lagrange);
        assert_eq!(pcs.public_parameter_group_2, restored.public_parameter_group_2);

        let evals: Vec<BN254Scalar> = (0..8).map(|_| BN254Scalar::random(&mut prng)).collect();
        assert_eq!(
            pcs.commit_lagrange(&evals).unwrap(),
            restored.commit_lagrange(&evals).unwrap()
        );
        assert_eq!(
            pcs.commit_coefs(&evals).unwrap(),
            restored.commit_coefs(&evals).unwrap()
        );

        // unequal bases are rejected
        let mut broken = bytes.clone();
        broken[4..8].copy_from_slice(&7u32.to_le_bytes());
        assert!(KZGCommitmentSchemeBN254::from_unchecked_bytes(&broken).is_err());
        assert_eq!(
            KZGCommitmentSchemeBN254::from_unchecked_bytes(&bytes[..bytes.len() - 1]).unwrap_err(),
            PlonkError::DeserializationError
        );
    }

    #[test]
    fn test_serde_checks_basis_lengths() {
        let mut prng = ChaChaRng::from_seed([4u8; 32]);
        let pcs = KZGCommitmentSchemeBN254::new(8, &mut prng).unwrap();
        let mut value = serde_json::to_value(&pcs).unwrap();
        let restored: KZGCommitmentSchemeBN254 = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(pcs.public_parameter_group_1, restored.public_parameter_group_1);
        assert_eq!(pcs.public_parameter_lagrange, restored.public_parameter_lagrange);
        assert_eq!(pcs.public_parameter_group_2, restored.public_parameter_group_2);

        let bytes = bincode::serialize(&pcs).unwrap();
        let restored: KZGCommitmentSchemeBN254 = bincode::deserialize(&bytes).unwrap();
        assert_eq!(pcs.public_parameter_lagrange, restored.public_parameter_lagrange);

        value["public_parameter_lagrange"]
            .as_array_mut()
            .unwrap()
            .pop();
        let err = serde_json::from_value::<KZGCommitmentSchemeBN254>(value).unwrap_err();
        assert!(err.to_string().contains(&PlonkError::SetupError.to_string()));
    }
}
