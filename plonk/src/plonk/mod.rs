//! The Halo2-style PLONK argument: circuits, keys, prover and verifier.

/// Module for the per-proof argument state.
pub mod argument;

/// Module for blinding rows.
pub mod blinder;

/// Module for the constraint system.
pub mod constraint_system;

/// Module for the evaluation domains.
pub mod domain;

/// Module for help functions.
pub(crate) mod helpers;

/// Module for indexer.
pub mod indexer;

/// Module for the lookup argument.
pub mod lookup;

/// Module for the permutation argument.
pub mod permutation;

/// Module for prover.
pub mod prover;

/// Module for transcript.
pub(crate) mod transcript;

/// Module for the vanishing argument.
pub mod vanishing;

/// Module for verifier.
pub mod verifier;
