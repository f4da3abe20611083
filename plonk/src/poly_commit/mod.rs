/// Module for the batch commitment state.
pub mod batch;

/// Module for field polynomial.
pub mod field_polynomial;

/// Module for KZG polynomial commitment scheme.
pub mod kzg_poly_com;

/// Module for polynomial commitment traits.
pub mod pcs;

/// Module for Pedersen vector commitments.
pub mod pedersen;

/// Module for the deduplicated set of opening points.
pub mod point_set;

/// Module for the SHPLONK multi-point opening.
pub mod shplonk;

/// Module for polynomial commitment transcript.
pub mod transcript;
