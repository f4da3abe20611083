use crate::prelude::*;
use ark_ff::FftField;
pub use ark_ff::LegendreSymbol;
use ark_std::{fmt::Debug, hash::Hash};
use serde::{Deserialize, Serialize};

/// The trait for scalars
pub trait Scalar:
    Copy
    + Default
    + Debug
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Hash
    + Serialize
    + for<'de> Deserialize<'de>
    + Clone
    + One
    + Zero
    + Sized
    + Add<Self, Output = Self>
    + Mul<Self, Output = Self>
    + Sub<Self, Output = Self>
    + Sum<Self>
    + for<'a> Add<&'a Self, Output = Self>
    + for<'a> AddAssign<&'a Self>
    + for<'a> Mul<&'a Self, Output = Self>
    + for<'a> MulAssign<&'a Self>
    + for<'a> Sub<&'a Self, Output = Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> Sum<&'a Self>
    + From<u32>
    + From<u64>
    + Neg<Output = Self>
    + Sync
    + Send
{
    /// Return a random scalar
    fn random<R: CryptoRng + RngCore>(rng: &mut R) -> Self;

    /// Return multiplicative generator of order r,
    /// which is also required to be a quadratic nonresidue
    fn multiplicative_generator() -> Self;

    /// Return the little-endian byte representations of the field size
    fn get_field_size_le_bytes() -> Vec<u8>;

    /// Return the len of the byte representation
    fn bytes_len() -> usize;

    /// Convert to bytes
    fn to_bytes(&self) -> Vec<u8>;

    /// Convert from bytes
    fn from_bytes(bytes: &[u8]) -> Result<Self>;

    /// Return the modular inverse of the scalar if it exists
    fn inv(&self) -> Result<Self>;

    /// Return the square of the field element
    fn square(&self) -> Self;

    /// Return the legendre symbol of the field element
    fn legendre(&self) -> LegendreSymbol;

    /// exponent form: least significant limb first, with u64 limbs
    fn pow(&self, exponent: &[u64]) -> Self {
        let mut base = *self;
        let mut result = Self::one();
        for exp_u64 in exponent {
            let mut e = *exp_u64;
            for _ in 0..64 {
                if e % 2 == 1 {
                    result.mul_assign(&base);
                }
                base = base.mul(&base);
                e >>= 1;
            }
        }
        result
    }
}

/// Invert every element of `v` in place with a single field inversion.
/// Fails without touching `v` if any element is zero.
pub fn batch_inv<F: Scalar>(v: &mut [F]) -> Result<()> {
    let mut prefix = Vec::with_capacity(v.len());
    let mut acc = F::one();
    for x in v.iter() {
        if x.is_zero() {
            return Err(AlgebraError::GroupInversionError);
        }
        prefix.push(acc);
        acc.mul_assign(x);
    }

    let mut acc_inv = acc.inv()?;
    for (x, p) in v.iter_mut().zip(prefix.iter()).rev() {
        let next = acc_inv.mul(&*x);
        *x = acc_inv.mul(p);
        acc_inv = next;
    }
    Ok(())
}

/// The trait for domain.
pub trait Domain: Scalar {
    /// The field that is able to be used in FFTs.
    type Field: FftField;

    /// Return fft field.
    fn get_field(&self) -> Self::Field;

    /// Sample a domain based on a fft field.
    fn from_field(field: Self::Field) -> Self;
}

/// The trait for group elements
pub trait Group:
    Debug
    + Default
    + Copy
    + Sized
    + PartialEq
    + Eq
    + Clone
    + Send
    + Sync
    + for<'a> Add<&'a Self, Output = Self>
    + for<'a> Mul<&'a Self::ScalarType, Output = Self>
    + for<'a> Sub<&'a Self, Output = Self>
    + for<'a> AddAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + Serialize
    + Neg<Output = Self>
    + for<'de> Deserialize<'de>
{
    /// The scalar type
    type ScalarType: Scalar;

    /// The arkworks element behind the wrapper.
    type Inner: Copy + Send + Sync;

    /// The number of bytes for a compressed representation of a group element
    const COMPRESSED_LEN: usize;

    /// The number of bytes for a uncompressed representation of a group element
    const UNCOMPRESSED_LEN: usize;

    /// Wrap an arkworks element.
    fn from_inner(inner: Self::Inner) -> Self;

    /// Return the arkworks element.
    fn into_inner(self) -> Self::Inner;

    /// Return the identity element (i.e., 0 * G)
    fn get_identity() -> Self;

    /// Return the base element (i.e., 1 * G)
    fn get_base() -> Self;

    /// Return a random element
    fn random<R: CryptoRng + RngCore>(rng: &mut R) -> Self;

    /// Convert to bytes in the compressed representation
    fn to_compressed_bytes(&self) -> Vec<u8>;

    /// Convert from bytes in the compressed representation
    fn from_compressed_bytes(bytes: &[u8]) -> Result<Self>;

    /// Convert to bytes in the unchecked representation
    fn to_unchecked_bytes(&self) -> Vec<u8>;

    /// Convert from bytes in the unchecked representation
    fn from_unchecked_bytes(bytes: &[u8]) -> Result<Self>;

    /// Return the size of unchecked bytes.
    fn unchecked_size() -> usize;

    /// Compute the multiscalar multiplication. The two slices must have the
    /// same length; an empty input gives the identity.
    fn multi_exp(scalars: &[&Self::ScalarType], points: &[&Self]) -> Result<Self>;
}

/// The trait for a pair of groups for pairing
pub trait Pairing {
    /// The scalar type
    type ScalarField: Scalar;

    /// The first group
    type G1: Group<ScalarType = Self::ScalarField>;

    /// The second group
    type G2: Group<ScalarType = Self::ScalarField>;

    /// The target group
    type Gt: Group<ScalarType = Self::ScalarField>;

    /// The pairing operation
    fn pairing(a: &Self::G1, b: &Self::G2) -> Self::Gt;

    /// The product of pairing operation
    fn product_of_pairings(a: &[Self::G1], b: &[Self::G2]) -> Self::Gt;
}


#[cfg(test)]
mod tests {
    use crate::bn254::BN254Scalar;
    use crate::prelude::*;

    #[test]
    fn batch_inversion_matches_single() {
        let mut prng = test_rng();
        let values: Vec<BN254Scalar> = (0..17).map(|_| BN254Scalar::random(&mut prng)).collect();
        let mut inverted = values.clone();
        batch_inv(&mut inverted).unwrap();
        for (v, i) in values.iter().zip(inverted.iter()) {
            assert_eq!(v.inv().unwrap(), *i);
        }
    }

    #[test]
    fn batch_inversion_rejects_zero() {
        let mut values = vec![BN254Scalar::from(3u32), BN254Scalar::zero()];
        let before = values.clone();
        assert_eq!(
            batch_inv(&mut values),
            Err(AlgebraError::GroupInversionError)
        );
        assert_eq!(values, before);
    }

    #[test]
    fn generator_is_a_non_residue() {
        let g = BN254Scalar::multiplicative_generator();
        assert!(g.legendre().is_qnr());
        assert!(g.square().legendre().is_qr());
        assert!(BN254Scalar::zero().legendre().is_zero());
    }
}
