use thiserror::Error;

/// Errors raised synchronously by lifecycle operations on a cooking session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Malformed construction input. Rejected eagerly, no partial state.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Illegal lifecycle transition. State is left unchanged.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}

/// Errors raised by the external request/response sources.
///
/// These are never surfaced to presentation: transport failures leave the
/// last-known-good working set in place until the next scheduled cycle, and
/// malformed records are skipped without aborting the batch.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed record: {0}")]
    Malformed(String),
}
