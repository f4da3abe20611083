use ark_std::{error, fmt, string::String};
use lumen_algebra::prelude::AlgebraError;

/// The result type of the crate.
pub type Result<T> = core::result::Result<T, PlonkError>;

/// The errors of the prover, the verifier and the commitment schemes.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PlonkError {
    /// Algebra error
    Algebra(AlgebraError),
    /// Error with message
    Message(String),
    /// The setup size is not a power of two, or the bases disagree in length.
    SetupError,
    /// The requested size is beyond the maximum degree supported.
    DegreeError,
    /// Downsizing to a size that is not smaller than the current one.
    DownsizeError,
    /// Polynomial commitment error.
    CommitmentError,
    /// Batch commitment misuse.
    BatchModeError,
    /// Could not decode a serialized object.
    DeserializationError,
    /// A proving stage was run out of order.
    PhaseError(&'static str),
    /// A per-circuit vector does not match the number of circuits.
    CircuitCountMismatch,
    /// A column has the wrong number of rows.
    ColumnSizeError,
    /// An assignment targets a row outside of the usable rows.
    NotEnoughRowsAvailable,
    /// A lookup input has no matching table entry left.
    LookupValueNotInTable,
    /// Division by zero.
    DivisionByZero,
    /// Group not found.
    GroupNotFound(usize),
    /// Error occurred when verify.
    VerificationError,
    /// An opening claim does not match the polynomial.
    PCSProveEvalError,
    /// Error occurred when prove.
    ProofError,
    /// Challenge error
    ChallengeError,
}

impl fmt::Display for PlonkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PlonkError::*;
        match self {
            Algebra(e) => write!(f, "Algebra: {}", e),
            Message(e) => f.write_str(e),
            PhaseError(stage) => write!(f, "Stage called out of order: {}", stage),
            GroupNotFound(n) => write!(f, "No evaluation domain of size {}.", n),
            _ => f.write_str(match self {
                SetupError => "Setup error.",
                DegreeError => {
                    "The degree of the polynomial is higher than the maximum degree supported."
                }
                DownsizeError => "Cannot downsize to a size that is not smaller.",
                CommitmentError => "Commitment error.",
                BatchModeError => "Batch commitment mode misused.",
                DeserializationError => "Could not deserialize object.",
                CircuitCountMismatch => "Per-circuit inputs disagree with the number of circuits.",
                ColumnSizeError => "Column size error.",
                NotEnoughRowsAvailable => "Not enough usable rows for the assignment.",
                LookupValueNotInTable => "Lookup input is not contained in the table.",
                DivisionByZero => "Division by zero.",
                VerificationError => "Verification error.",
                PCSProveEvalError => "Opening claim does not match the polynomial.",
                ProofError => "Proof error.",
                ChallengeError => "Challenge error",
                Algebra(_) | Message(_) | PhaseError(_) | GroupNotFound(_) => "",
            }),
        }
    }
}

impl error::Error for PlonkError {}

impl From<AlgebraError> for PlonkError {
    fn from(e: AlgebraError) -> PlonkError {
        PlonkError::Algebra(e)
    }
}
