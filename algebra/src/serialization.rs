use crate::bn254::{BN254Gt, BN254Scalar, BN254G1, BN254G2};
use crate::prelude::*;
use serde::de::{SeqAccess, Visitor};

/// Helper trait to serialize objects that implement from/to bytes.
pub trait FromToBytes: Sized {
    /// Convert to bytes.
    fn lumen_to_bytes(&self) -> Vec<u8>;
    /// Reconstruct from bytes.
    fn lumen_from_bytes(bytes: &[u8]) -> Result<Self>;
}

/// Visitor accepting raw bytes, byte sequences, or base64 strings.
pub struct BytesVisitor;

impl<'de> Visitor<'de> for BytesVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> core::fmt::Result {
        formatter.write_str("a byte-encoded algebra object")
    }

    fn visit_seq<V>(self, mut seq: V) -> core::result::Result<Vec<u8>, V::Error>
    where
        V: SeqAccess<'de>,
    {
        let mut vec: Vec<u8> = vec![];
        while let Some(x) = seq.next_element()? {
            vec.push(x);
        }
        Ok(vec)
    }

    fn visit_bytes<E>(self, v: &[u8]) -> core::result::Result<Vec<u8>, E> {
        Ok(v.to_vec())
    }

    fn visit_str<E>(self, v: &str) -> core::result::Result<Vec<u8>, E>
    where
        E: serde::de::Error,
    {
        b64dec(v).map_err(serde::de::Error::custom)
    }
}

/// Implement serde traits through `FromToBytes`: base64 strings for
/// human-readable formats and raw bytes otherwise.
#[macro_export]
macro_rules! serialize_deserialize {
    ($t:ident) => {
        impl serde::Serialize for $t {
            fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let bytes = $crate::serialization::FromToBytes::lumen_to_bytes(self);
                if serializer.is_human_readable() {
                    serializer.serialize_str(&$crate::utils::b64enc(&bytes))
                } else {
                    serializer.serialize_bytes(&bytes)
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let bytes = if deserializer.is_human_readable() {
                    deserializer.deserialize_str($crate::serialization::BytesVisitor)?
                } else {
                    deserializer.deserialize_bytes($crate::serialization::BytesVisitor)?
                };
                <$t as $crate::serialization::FromToBytes>::lumen_from_bytes(bytes.as_slice())
                    .map_err(serde::de::Error::custom)
            }
        }
    };
}

impl FromToBytes for BN254Scalar {
    fn lumen_to_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }

    fn lumen_from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::bytes_len() {
            return Err(AlgebraError::DeserializationError);
        }
        Self::from_bytes(bytes)
    }
}

macro_rules! to_from_bytes_group {
    ($g:ident) => {
        impl FromToBytes for $g {
            fn lumen_to_bytes(&self) -> Vec<u8> {
                self.to_compressed_bytes()
            }

            fn lumen_from_bytes(bytes: &[u8]) -> Result<$g> {
                $g::from_compressed_bytes(bytes)
            }
        }
    };
}

to_from_bytes_group!(BN254G1);
to_from_bytes_group!(BN254G2);
to_from_bytes_group!(BN254Gt);

serialize_deserialize!(BN254Scalar);
serialize_deserialize!(BN254G1);
serialize_deserialize!(BN254G2);
serialize_deserialize!(BN254Gt);
