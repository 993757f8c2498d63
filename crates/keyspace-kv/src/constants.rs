//! Bounds for the in-memory store and its retry driver.

/// Maximum attempts made by [`MemoryDatabase::run`](crate::MemoryDatabase::run)
/// before the last retryable error is returned to the caller.
pub const MAX_TRANSACTION_RETRIES: u32 = 100;

/// Initial backoff between retried attempts (milliseconds).
pub const RETRY_INITIAL_BACKOFF_MS: u64 = 1;

/// Upper bound on the backoff between retried attempts (milliseconds).
pub const RETRY_MAX_BACKOFF_MS: u64 = 64;

/// Number of committed transactions whose write ranges are kept for conflict checks.
///
/// A transaction whose read version predates the oldest retained commit fails
/// with `TransactionTooOld`.
pub const MAX_CONFLICT_HISTORY: usize = 10_000;
