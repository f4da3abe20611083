/// The number of bytes for a scalar value over BN254.
pub const BN254_SCALAR_LEN: usize = 32;

mod fr;
pub use fr::*;

mod g1;
pub use g1::*;

mod g2;
pub use g2::*;

mod gt;
pub use gt::*;

mod pairing;
pub use pairing::*;

#[cfg(test)]
mod bn254_groups_test {
    use crate::{
        bn254::{BN254Gt, BN254PairingEngine, BN254Scalar, BN254G1, BN254G2},
        prelude::*,
        traits::group_tests::{test_multi_exp, test_scalar_operations, test_scalar_serialization},
    };

    #[test]
    fn test_scalar_ops() {
        test_scalar_operations::<BN254Scalar>();
    }

    #[test]
    fn scalar_deser() {
        test_scalar_serialization::<BN254Scalar>();
    }

    #[test]
    fn scalar_from_to_bytes() {
        let small_value = BN254Scalar::from(165747u32);
        let small_value_bytes = small_value.to_bytes();
        let mut expected = [0u8; 32];
        expected[..3].copy_from_slice(&[115, 135, 2]);
        assert_eq!(small_value_bytes, expected);

        let small_value_from_bytes = BN254Scalar::from_bytes(&small_value_bytes).unwrap();
        assert_eq!(small_value_from_bytes, small_value);
        assert!(BN254Scalar::from_bytes(&[0u8; 33]).is_err());
    }

    #[test]
    fn multi_exp_all_groups() {
        test_multi_exp::<BN254G1>();
        test_multi_exp::<BN254G2>();
        test_multi_exp::<BN254Gt>();
    }

    #[test]
    fn hard_coded_group_elements() {
        let base_gt = BN254Gt::get_base();
        let expected_base = BN254PairingEngine::pairing(&BN254G1::get_base(), &BN254G2::get_base());
        assert_eq!(base_gt, expected_base);
    }

    #[test]
    fn bilinear_properties() {
        let identity_gt_computed =
            BN254PairingEngine::pairing(&BN254G1::get_identity(), &BN254G2::get_identity());
        assert_eq!(BN254Gt::get_identity(), identity_gt_computed);

        let mut prng = test_rng();
        let s1 = BN254Scalar::random(&mut prng);
        let s2 = BN254Scalar::random(&mut prng);

        let base_g1 = BN254G1::get_base();
        let base_g2 = BN254G2::get_base();
        let s1_base_g1 = base_g1.mul(&s1);
        let s2_base_g2 = base_g2.mul(&s2);

        let mapped = BN254PairingEngine::pairing(&s1_base_g1, &s2_base_g2);
        let base_gt = BN254Gt::get_base();
        assert_eq!(
            mapped,
            BN254PairingEngine::pairing(&base_g1, &s2_base_g2).mul(&s1)
        );
        assert_eq!(mapped, base_gt.mul(&s1).mul(&s2));
        assert_eq!(mapped, base_gt.mul(&s1.mul(&s2)));
    }

    #[test]
    fn product_of_pairings_cancels() {
        let mut prng = test_rng();
        let s = BN254Scalar::random(&mut prng);
        let a = BN254G1::get_base().mul(&s);
        let b = BN254G2::get_base();
        let prod = BN254PairingEngine::product_of_pairings(
            &[a, BN254G1::get_base()],
            &[b, b.mul(&s).neg()],
        );
        assert_eq!(prod, BN254Gt::get_identity());
    }

    #[test]
    fn gt_group_laws() {
        let mut prng = test_rng();
        let a = BN254Gt::random(&mut prng);
        let b = BN254Gt::random(&mut prng);
        assert_eq!(a.add(&b).sub(&b), a);
        assert_eq!(a.add(&a.neg()), BN254Gt::get_identity());
        assert_eq!(a.add(&a), a.mul(&BN254Scalar::from(2u32)));
    }

    #[test]
    fn test_serialization_of_points() {
        let mut prng = test_rng();

        let g1 = BN254G1::random(&mut prng);
        let g1_bytes = g1.to_compressed_bytes();
        assert_eq!(g1_bytes.len(), BN254G1::COMPRESSED_LEN);
        assert_eq!(BN254G1::from_compressed_bytes(&g1_bytes).unwrap(), g1);
        let g1_raw = g1.to_unchecked_bytes();
        assert_eq!(g1_raw.len(), BN254G1::unchecked_size());
        assert_eq!(BN254G1::from_unchecked_bytes(&g1_raw).unwrap(), g1);

        let g2 = BN254G2::random(&mut prng);
        let g2_bytes = g2.to_compressed_bytes();
        assert_eq!(g2_bytes.len(), BN254G2::COMPRESSED_LEN);
        assert_eq!(BN254G2::from_compressed_bytes(&g2_bytes).unwrap(), g2);

        let gt = BN254Gt::random(&mut prng);
        let gt_bytes = gt.to_compressed_bytes();
        assert_eq!(BN254Gt::from_compressed_bytes(&gt_bytes).unwrap(), gt);

        assert!(BN254G1::from_compressed_bytes(&g1_bytes[1..]).is_err());
    }
}
