//! The crate wraps the arkworks implementation of the BN254 curve behind the
//! `Scalar`, `Group` and `Pairing` traits used by the Lumen proof system.
#![forbid(unsafe_code)]
#![warn(
    unused,
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    missing_docs
)]
#![allow(clippy::upper_case_acronyms)]

/// Module for the BN254 curve.
pub mod bn254;

/// Module for error handling.
pub mod errors;

/// Module for the prelude.
pub mod prelude;

/// Module for test rngs.
pub mod rand_helper;

/// Module for serialization of scalars and group elements.
pub mod serialization;

/// Module for traits.
pub mod traits;

/// Module for utils.
pub mod utils;

#[doc(hidden)]
pub use ark_std::{
    borrow, collections, fmt, iter, marker, ops, rand, One, UniformRand, Zero,
};
