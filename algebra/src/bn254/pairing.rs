use crate::bn254::{BN254Gt, BN254Scalar, BN254G1, BN254G2};
use crate::traits::Pairing;
use ark_bn254::Bn254;
use ark_ec::{pairing::Pairing as ArkPairing, CurveGroup};

/// The pairing engine for BN254
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BN254PairingEngine;

impl Pairing for BN254PairingEngine {
    type ScalarField = BN254Scalar;
    type G1 = BN254G1;
    type G2 = BN254G2;
    type Gt = BN254Gt;

    #[inline]
    fn pairing(a: &Self::G1, b: &Self::G2) -> Self::Gt {
        BN254Gt(Bn254::pairing(a.0, b.0))
    }

    #[inline]
    fn product_of_pairings(a: &[Self::G1], b: &[Self::G2]) -> Self::Gt {
        let c1 = a.iter().map(|x| x.0.into_affine());
        let c2 = b.iter().map(|x| x.0.into_affine());
        BN254Gt(Bn254::multi_pairing(c1, c2))
    }
}
