use crate::prelude::*;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

const BASE64_PADDING_CONFIG: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const BASE64_ENGINE: GeneralPurpose = GeneralPurpose::new(&URL_SAFE, BASE64_PADDING_CONFIG);

/// Convert a slice into a u32 (little-endian)
pub fn u8_le_slice_to_u32(slice: &[u8]) -> u32 {
    let mut a = [0u8; 4];
    a.copy_from_slice(slice);
    u32::from_le_bytes(a)
}

/// Compute the minimum power of two that is greater or equal to the input.
/// Zero maps to one.
pub fn min_greater_equal_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Return `log2(n)` for a power of two `n`.
pub fn log2_exact(n: usize) -> Result<u32> {
    if n == 0 || !n.is_power_of_two() {
        return Err(AlgebraError::ParameterError);
    }
    Ok(n.trailing_zeros())
}

/// Convert the input into the base64 encoding
pub fn b64enc<T: ?Sized + AsRef<[u8]>>(input: &T) -> String {
    BASE64_ENGINE.encode(input)
}

/// Reconstruct from the base64 encoding
pub fn b64dec<T: ?Sized + AsRef<[u8]>>(input: &T) -> Result<Vec<u8>> {
    BASE64_ENGINE
        .decode(input)
        .map_err(|_| AlgebraError::DeserializationError)
}

#[cfg(test)]
mod test {
    use ark_std::vec;

    #[test]
    fn power_of_two_helpers() {
        assert_eq!(1, super::min_greater_equal_power_of_two(0));
        assert_eq!(1, super::min_greater_equal_power_of_two(1));
        assert_eq!(8, super::min_greater_equal_power_of_two(5));
        assert_eq!(16, super::min_greater_equal_power_of_two(16));
        assert_eq!(super::log2_exact(32), Ok(5));
        assert!(super::log2_exact(0).is_err());
        assert!(super::log2_exact(12).is_err());
    }

    #[test]
    fn base64_round_trip_accepts_missing_padding() {
        let encoded = super::b64enc(&[1u8, 2, 3, 4]);
        assert_eq!(super::b64dec(&encoded).unwrap(), vec![1u8, 2, 3, 4]);
        assert_eq!(
            super::b64dec(encoded.trim_end_matches('=')).unwrap(),
            vec![1u8, 2, 3, 4]
        );
        assert!(super::b64dec("*&^").is_err());
    }
}
