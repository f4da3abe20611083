use crate::errors::Result;
use crate::plonk::{domain::EvaluationDomain, vanishing::VanishingArgument};
use crate::poly_commit::{
    field_polynomial::FpPolynomial,
    pcs::{PolyComScheme, PolynomialOpening, ToBytes},
    point_set::PointSet,
    transcript::PolyComTranscript,
};
use ark_std::{end_timer, start_timer};
use lumen_algebra::prelude::*;
use merlin::Transcript;

/// The committed random polynomial.
#[derive(Clone, Debug)]
pub struct VanishingRandom<C, F> {
    random_poly: FpPolynomial<F>,
    random_commitment: C,
}

/// The quotient split into pieces, not yet committed.
#[derive(Clone, Debug)]
pub struct VanishingConstructed<C, F> {
    h_pieces: Vec<FpPolynomial<F>>,
    random_poly: FpPolynomial<F>,
    random_commitment: C,
}

/// The quotient pieces, committed.
#[derive(Clone, Debug)]
pub struct VanishingCommitted<C, F> {
    h_pieces: Vec<FpPolynomial<F>>,
    h_commitments: Vec<C>,
    random_poly: FpPolynomial<F>,
    random_commitment: C,
}

/// The combined quotient and the random polynomial, evaluated at `x`.
#[derive(Clone, Debug)]
pub struct VanishingEvaluated<F> {
    h_poly: FpPolynomial<F>,
    h_eval: F,
    random_poly: FpPolynomial<F>,
    random_eval: F,
}

impl VanishingArgument {
    /// Commit to a random polynomial of degree `n - 1`.
    pub(crate) fn commit_random_poly<PCS: PolyComScheme, R: CryptoRng + RngCore>(
        pcs: &PCS,
        domain: &EvaluationDomain<PCS::Field>,
        prng: &mut R,
        transcript: &mut Transcript,
    ) -> Result<VanishingRandom<PCS::Commitment, PCS::Field>> {
        let random_poly = FpPolynomial::random(prng, domain.n() - 1);
        let random_commitment = pcs.commit(&random_poly)?;
        transcript.append_commitment(&random_commitment);
        Ok(VanishingRandom {
            random_poly,
            random_commitment,
        })
    }
}

impl<C: Clone, F: Domain> VanishingRandom<C, F> {
    /// The commitment of the random polynomial.
    pub fn random_commitment(&self) -> C {
        self.random_commitment.clone()
    }

    /// Divide the folded constraints over the extended coset by `X^n - 1`
    /// and split the quotient into `n`-coefficient pieces.
    pub(crate) fn construct_h(
        self,
        mut h_ext: Vec<F>,
        domain: &EvaluationDomain<F>,
    ) -> VanishingConstructed<C, F> {
        let construct_time = start_timer!(|| "Construct the quotient");
        domain.divide_by_vanishing_poly(&mut h_ext);
        let coefs = domain.extended_to_coeff(&h_ext);
        let h_pieces = coefs
            .chunks(domain.n())
            .map(|piece| FpPolynomial::from_coefs(piece.to_vec()))
            .collect();
        end_timer!(construct_time);
        VanishingConstructed {
            h_pieces,
            random_poly: self.random_poly,
            random_commitment: self.random_commitment,
        }
    }
}

impl<C: Clone + ToBytes, F: Domain> VanishingConstructed<C, F> {
    /// Commit to every piece of the quotient.
    pub(crate) fn commit_h<PCS: PolyComScheme<Field = F, Commitment = C>>(
        self,
        pcs: &PCS,
        transcript: &mut Transcript,
    ) -> Result<VanishingCommitted<C, F>> {
        let h_commitments = self
            .h_pieces
            .iter()
            .map(|piece| pcs.commit(piece))
            .collect::<Result<Vec<_>>>()?;
        for commitment in h_commitments.iter() {
            transcript.append_commitment(commitment);
        }
        Ok(VanishingCommitted {
            h_pieces: self.h_pieces,
            h_commitments,
            random_poly: self.random_poly,
            random_commitment: self.random_commitment,
        })
    }
}

impl<C: Clone, F: Domain> VanishingCommitted<C, F> {
    /// The commitments of the quotient pieces.
    pub fn h_commitments(&self) -> Vec<C> {
        self.h_commitments.clone()
    }

    /// The commitment of the random polynomial.
    pub fn random_commitment(&self) -> C {
        self.random_commitment.clone()
    }

    /// Combine the pieces as `sum_i xn^i h_i` and evaluate the random
    /// polynomial at `x`.
    pub(crate) fn evaluate(self, x: &F, xn: &F, transcript: &mut Transcript) -> VanishingEvaluated<F> {
        let h_poly = self
            .h_pieces
            .iter()
            .rev()
            .fold(FpPolynomial::zero(), |acc, piece| acc.mul_scalar(xn).add(piece));
        let h_eval = h_poly.eval(x);
        let random_eval = self.random_poly.eval(x);
        transcript.append_field_elem(&random_eval);
        VanishingEvaluated {
            h_poly,
            h_eval,
            random_poly: self.random_poly,
            random_eval,
        }
    }
}

impl<F: Domain> VanishingEvaluated<F> {
    /// The evaluation of the random polynomial at `x`.
    pub fn random_eval(&self) -> F {
        self.random_eval
    }

    /// Open the combined quotient and the random polynomial at `x`.
    pub(crate) fn open<'a>(
        &'a self,
        x: &F,
        points: &mut PointSet<F>,
    ) -> Vec<PolynomialOpening<'a, F>> {
        let x_ref = points.insert(*x);
        vec![
            PolynomialOpening::new(&self.h_poly, x_ref, self.h_eval),
            PolynomialOpening::new(&self.random_poly, x_ref, self.random_eval),
        ]
    }
}

#[cfg(test)]
mod tests {
    use crate::plonk::{domain::EvaluationDomain, vanishing::VanishingArgument};
    use crate::poly_commit::{
        field_polynomial::FpPolynomial, kzg_poly_com::KZGCommitmentSchemeBN254,
    };
    use lumen_algebra::{bn254::BN254Scalar, prelude::*};
    use merlin::Transcript;
    use rand_chacha::ChaChaRng;

    #[test]
    fn pieces_recombine_into_the_quotient() {
        let mut prng = ChaChaRng::from_seed([2u8; 32]);
        let n = 8;
        let domain = EvaluationDomain::<BN254Scalar>::new(4, n).unwrap();
        let pcs = KZGCommitmentSchemeBN254::new(n, &mut prng).unwrap();
        let mut transcript = Transcript::new(b"vanishing test");

        // numerator = quotient * (X^n - 1)
        let quotient = FpPolynomial::<BN254Scalar>::random(&mut prng, 2 * n - 1);
        let mut shifted = vec![BN254Scalar::zero(); n];
        shifted.extend_from_slice(&quotient.coefs);
        let numerator = FpPolynomial::from_coefs(shifted).sub(&quotient);
        let h_ext = domain.coeff_to_extended(&numerator);

        let random =
            VanishingArgument::commit_random_poly(&pcs, &domain, &mut prng, &mut transcript)
                .unwrap();
        let constructed = random.construct_h(h_ext, &domain);
        assert_eq!(constructed.h_pieces.len(), domain.quotient_poly_degree());
        let committed = constructed.commit_h(&pcs, &mut transcript).unwrap();
        assert_eq!(committed.h_commitments().len(), 3);

        let x = BN254Scalar::from(17u32);
        let xn = x.pow(&[n as u64]);
        let evaluated = committed.evaluate(&x, &xn, &mut transcript);
        assert_eq!(evaluated.h_eval, quotient.eval(&x));
    }
}
