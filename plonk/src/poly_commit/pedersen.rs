use crate::errors::{PlonkError, Result};
use crate::poly_commit::{batch::BatchCommitState, pcs::VectorCommitmentScheme};
use ark_std::{cfg_iter, end_timer, start_timer};
use lumen_algebra::prelude::*;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Pedersen vector commitment `MSM(generators, values) + blinding * h`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PedersenCommitmentScheme<G: Group> {
    /// The blinding generator.
    pub h: G,
    /// One generator per committed value.
    pub generators: Vec<G>,
    #[serde(skip)]
    batch: BatchCommitState<(Vec<G::ScalarType>, G::ScalarType)>,
}

impl<G: Group> PedersenCommitmentScheme<G> {
    /// Sample `size` value generators and the blinding generator.
    pub fn setup<R: CryptoRng + RngCore>(size: usize, prng: &mut R) -> Self {
        let h = G::random(prng);
        let generators = (0..size).map(|_| G::random(prng)).collect();
        Self {
            h,
            generators,
            batch: BatchCommitState::default(),
        }
    }

    /// Return the number of value generators.
    pub fn size(&self) -> usize {
        self.generators.len()
    }

    fn compute(&self, values: &[G::ScalarType], blinding: &G::ScalarType) -> Result<G> {
        if values.len() > self.generators.len() {
            return Err(PlonkError::CommitmentError);
        }
        let scalars: Vec<&G::ScalarType> =
            values.iter().chain(ark_std::iter::once(blinding)).collect();
        let points: Vec<&G> = self.generators[..values.len()]
            .iter()
            .chain(ark_std::iter::once(&self.h))
            .collect();
        Ok(G::multi_exp(&scalars, &points)?)
    }

    /// Commit to `values` with randomness `blinding`.
    pub fn commit(&self, values: &[G::ScalarType], blinding: &G::ScalarType) -> Result<G> {
        if self.batch.is_enabled() {
            return Err(PlonkError::BatchModeError);
        }
        self.compute(values, blinding)
    }

    /// Defer the commitment of `values` into `slot`.
    pub fn batch_commit(
        &mut self,
        values: &[G::ScalarType],
        blinding: &G::ScalarType,
        slot: usize,
    ) -> Result<()> {
        if values.len() > self.generators.len() {
            return Err(PlonkError::CommitmentError);
        }
        self.batch.store(slot, (values.to_vec(), *blinding))
    }

    /// Serialize the generators to unchecked bytes.
    pub fn to_unchecked_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = vec![];
        bytes.extend((self.generators.len() as u32).to_le_bytes());
        bytes.extend(self.h.to_unchecked_bytes());
        for g in &self.generators {
            bytes.extend(g.to_unchecked_bytes());
        }
        Ok(bytes)
    }

    /// Deserialize the generators from unchecked bytes.
    pub fn from_unchecked_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(PlonkError::DeserializationError);
        }
        let len = u8_le_slice_to_u32(&bytes[0..4]) as usize;
        let n = G::unchecked_size();
        if bytes.len() != 4 + n * (len + 1) {
            return Err(PlonkError::DeserializationError);
        }
        let mut points = bytes[4..]
            .chunks_exact(n)
            .map(|chunk| G::from_unchecked_bytes(chunk).map_err(PlonkError::from))
            .collect::<Result<Vec<G>>>()?;
        let generators = points.split_off(1);
        let h = points[0];
        Ok(Self {
            h,
            generators,
            batch: BatchCommitState::default(),
        })
    }
}

impl<G: Group> VectorCommitmentScheme for PedersenCommitmentScheme<G> {
    type Field = G::ScalarType;
    type Commitment = G;

    const IS_TRANSPARENT: bool = true;

    fn max_len(&self) -> usize {
        self.generators.len()
    }

    /// Commit without blinding.
    fn commit_vector(&self, values: &[G::ScalarType]) -> Result<G> {
        self.commit(values, &G::ScalarType::zero())
    }

    fn set_vector_batch_mode(&mut self, count: usize) {
        self.batch.enable(count);
    }

    fn batch_commit_vector(&mut self, values: &[G::ScalarType], slot: usize) -> Result<()> {
        self.batch_commit(values, &G::ScalarType::zero(), slot)
    }

    fn get_vector_batch_commitments(&mut self) -> Result<Vec<G>> {
        let pending = self.batch.take()?;
        let batch_time =
            start_timer!(|| format!("Pedersen batch of {} commitments", pending.len()));
        let commitments = cfg_iter!(pending)
            .map(|(values, blinding)| self.compute(values, blinding))
            .collect::<Result<Vec<_>>>();
        end_timer!(batch_time);
        commitments
    }
}
