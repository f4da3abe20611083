//! The vanishing argument: the folded constraints divided by `X^n - 1`,
//! split into `n`-coefficient pieces, plus a random polynomial masking the
//! opening of their combination.

/// Module for the prover side.
pub mod prover;

/// Module for the verifier side.
pub mod verifier;

pub use prover::{VanishingCommitted, VanishingConstructed, VanishingEvaluated, VanishingRandom};

/// Marker for the vanishing argument.
#[derive(Clone, Copy, Debug, Default)]
pub struct VanishingArgument;
