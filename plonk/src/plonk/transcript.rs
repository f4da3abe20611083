use crate::errors::{PlonkError, Result};
use crate::plonk::indexer::PlonkVerifierParams;
use crate::poly_commit::{pcs::ToBytes, transcript::PolyComTranscript};
use lumen_algebra::prelude::*;
use merlin::Transcript;
use rand_chacha::ChaChaRng;
use tracing::trace;

/// Initialize the transcript with the verifying key.
pub(crate) fn transcript_init_plonk<C: ToBytes, F: Scalar>(
    transcript: &mut Transcript,
    params: &PlonkVerifierParams<C, F>,
) -> Result<()> {
    transcript.append_message(b"New Domain", b"Lumen PLONK");

    transcript.append_u64(b"CS size", params.n as u64);
    transcript.append_message(b"field size", &F::get_field_size_le_bytes());
    let cs_bytes = bincode::serialize(&params.cs)
        .map_err(|e| PlonkError::Message(format!("constraint system encoding: {}", e)))?;
    transcript.append_message(b"constraint system", &cs_bytes);
    for c in params.fixed_commitments.iter() {
        transcript.append_commitment(c);
    }
    for c in params.permutation.commitments.iter() {
        transcript.append_commitment(c);
    }
    for k in params.ks.iter() {
        transcript.append_field_elem(k);
    }
    Ok(())
}

/// Return the challenge result.
pub(crate) fn transcript_get_challenge_field_elem<F: Scalar>(
    transcript: &mut Transcript,
    group_order: usize,
    label: &'static [u8],
) -> F {
    trace!(label = %String::from_utf8_lossy(label), "challenge");
    let mut buff = [0u8; 32];
    transcript.challenge_bytes(label, &mut buff);
    let mut prng = ChaChaRng::from_seed(buff);
    loop {
        let elem = F::random(&mut prng);
        // elem should not be root-of-unity
        if elem.pow(&[group_order as u64]) != F::one() {
            return elem;
        }
    }
}

/// Return the challenge result by label: "theta".
pub(crate) fn transcript_get_plonk_challenge_theta<F: Scalar>(
    transcript: &mut Transcript,
    group_order: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, group_order, b"theta")
}

/// Return the challenge result by label: "beta".
pub(crate) fn transcript_get_plonk_challenge_beta<F: Scalar>(
    transcript: &mut Transcript,
    group_order: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, group_order, b"beta")
}

/// Return the challenge result by label: "gamma".
pub(crate) fn transcript_get_plonk_challenge_gamma<F: Scalar>(
    transcript: &mut Transcript,
    group_order: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, group_order, b"gamma")
}

/// Return the challenge result by label: "y".
pub(crate) fn transcript_get_plonk_challenge_y<F: Scalar>(
    transcript: &mut Transcript,
    group_order: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, group_order, b"y")
}

/// Return the challenge result by label: "x".
pub(crate) fn transcript_get_plonk_challenge_x<F: Scalar>(
    transcript: &mut Transcript,
    group_order: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, group_order, b"x")
}
