use thiserror::Error;

/// Errors produced by this crate's fallible constructors.
///
/// `NoPath` is not a variant here: an unreachable goal is a plain empty
/// result (`Option::None` from [`crate::HierarchicalMap::find_path`]), not an
/// error, since it's an expected outcome rather than a misuse of the API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HpaError {
    /// a caller-supplied argument violates a documented precondition
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// an internal invariant was violated; this indicates a bug in this
    /// crate rather than caller misuse
    #[error("internal invariant violation: {0}")]
    InternalInvariantViolation(String),
}
