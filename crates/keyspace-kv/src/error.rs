use snafu::Snafu;

/// Errors raised by the transactional store.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum StoreError {
    /// Another transaction committed a write to a range this one read.
    #[snafu(display("transaction conflict: a concurrent commit wrote a key this transaction read"))]
    Conflict,

    /// Conflict history no longer covers this transaction's read version.
    #[snafu(display("transaction too old: read version {read_version} predates retained history"))]
    TransactionTooOld {
        /// Version the transaction started reading at.
        read_version: u64,
    },

    /// Storage operation failed.
    #[snafu(display("storage operation failed: {reason}"))]
    Failed {
        /// Human-readable failure description.
        reason: String,
    },
}

/// Classifies errors a transaction driver may retry with a fresh attempt.
///
/// Layers wrapping [`StoreError`] implement this by delegating to it so that
/// store conflicts stay visible through every error type.
pub trait Retryable {
    /// Returns true if a fresh transaction attempt may succeed.
    fn is_retryable(&self) -> bool;
}

impl Retryable for StoreError {
    fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Conflict | StoreError::TransactionTooOld { .. })
    }
}
