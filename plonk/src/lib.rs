//! A Halo2-style PLONK prover and verifier over KZG commitments, with lookup,
//! permutation and vanishing arguments and a SHPLONK multi-point opening.
#![forbid(unsafe_code)]
#![warn(
    unused,
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    missing_docs
)]
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

#[macro_use]
extern crate serde_derive;

/// Module for error handling.
pub mod errors;

/// Module for the Halo2-style argument.
pub mod plonk;

/// Module for polynomial commitments.
pub mod poly_commit;
