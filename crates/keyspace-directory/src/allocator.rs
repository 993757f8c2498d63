//! High-Contention Allocator (HCA) for directory prefix allocation.
//!
//! Hands out small non-negative integers to many concurrent transactions
//! while keeping them from conflicting on a single hot key.
//!
//! # Algorithm
//!
//! 1. Snapshot-read the single `counters` row: window start and allocation count
//! 2. If the window is at least half used, advance it and prune old state
//! 3. Blindly increment the count for the current window start
//! 4. Probe random candidates in `[start, start + window)` until one is unclaimed
//!    in `recent`, then claim it
//!
//! Concurrent claims of the same candidate conflict on its `recent` key and
//! are resolved by the store's transaction retry. The counter increment is an
//! atomic add, so allocators sharing a window never conflict on it.
//!
//! # Window Sizing
//!
//! Window size increases as the window start grows:
//! - start < 255: window = 64
//! - start < 65535: window = 1024
//! - start >= 65535: window = 8192

use keyspace_kv::RangeOptions;
use keyspace_kv::Retryable;
use keyspace_kv::StoreError;
use keyspace_kv::Transaction;
use keyspace_tuple::Element;
use keyspace_tuple::Subspace;
use keyspace_tuple::Tuple;
use rand::Rng;
use snafu::ResultExt;
use snafu::Snafu;
use tracing::debug;

use crate::constants::HCA_COUNTERS_KEY;
use crate::constants::HCA_INITIAL_WINDOW_SIZE;
use crate::constants::HCA_LARGE_WINDOW_THRESHOLD;
use crate::constants::HCA_MAX_CANDIDATE_PROBES;
use crate::constants::HCA_MAX_WINDOW_SIZE;
use crate::constants::HCA_MEDIUM_WINDOW_SIZE;
use crate::constants::HCA_MEDIUM_WINDOW_THRESHOLD;
use crate::constants::HCA_RECENT_KEY;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during prefix allocation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AllocationError {
    /// Storage error during allocation.
    #[snafu(display("storage error: {source}"))]
    Storage {
        /// The underlying store error.
        source: StoreError,
    },

    /// Invalid state read from storage.
    #[snafu(display("corrupted allocator state: {reason}"))]
    CorruptedState {
        /// Description of the corruption.
        reason: String,
    },

    /// Window start cannot advance without overflowing.
    #[snafu(display("allocator window exhausted at start {start}"))]
    CounterExhausted {
        /// Window start that could not advance.
        start: i64,
    },

    /// Every probed candidate was already claimed.
    #[snafu(display("no free candidate in window [{start}, {}) after {probes} probes", start + window))]
    CandidatesExhausted {
        /// Start of the probed window.
        start: i64,
        /// Size of the probed window.
        window: i64,
        /// Number of candidates probed.
        probes: u32,
    },
}

impl Retryable for AllocationError {
    fn is_retryable(&self) -> bool {
        match self {
            AllocationError::Storage { source } => source.is_retryable(),
            AllocationError::CandidatesExhausted { .. } => true,
            AllocationError::CorruptedState { .. } | AllocationError::CounterExhausted { .. } => false,
        }
    }
}

impl From<StoreError> for AllocationError {
    fn from(source: StoreError) -> Self {
        AllocationError::Storage { source }
    }
}

// =============================================================================
// High-Contention Allocator
// =============================================================================

/// High-Contention Allocator for short, unique directory prefixes.
///
/// All state lives in the store under the subspace passed to [`new`](Self::new);
/// the allocator value itself is a stateless handle and cheap to clone.
///
/// # Example
///
/// ```
/// use keyspace_directory::HighContentionAllocator;
/// use keyspace_kv::MemoryDatabase;
/// use keyspace_tuple::Subspace;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let db = MemoryDatabase::new();
/// let hca = HighContentionAllocator::new(&Subspace::from_bytes(b"hca".to_vec()));
///
/// let tr = db.begin();
/// let first = hca.allocate(&tr).await.unwrap();
/// let second = hca.allocate(&tr).await.unwrap();
/// tr.commit().await.unwrap();
///
/// assert_ne!(first, second);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HighContentionAllocator {
    /// Single row: window start -> allocation count (little-endian).
    counters: Subspace,
    /// Candidates claimed in the current window.
    recent: Subspace,
}

impl HighContentionAllocator {
    /// Create an allocator storing its state under `subspace`.
    pub fn new(subspace: &Subspace) -> Self {
        Self {
            counters: subspace.child(HCA_COUNTERS_KEY),
            recent: subspace.child(HCA_RECENT_KEY),
        }
    }

    /// Allocate an integer no other allocation from this state has returned.
    ///
    /// Runs entirely within `tr`; the result is only reserved once `tr`
    /// commits. Conflicts with concurrent allocators surface as retryable
    /// errors for the transaction's owner to retry.
    pub async fn allocate(&self, tr: &dyn Transaction) -> Result<i64, AllocationError> {
        let (mut start, count) = self.read_counter(tr).await?;
        let mut window = window_size(start);

        if should_advance_window(count, window) {
            // Drop the old counters row and every claim below the new window.
            tr.clear_range(self.counters.key(), &key_after(&self.counters.pack_element(start)));
            start = start.checked_add(window).ok_or(AllocationError::CounterExhausted { start })?;
            tr.clear_range(self.recent.key(), &self.recent.pack_element(start));
            window = window_size(start);
            debug!(start, window, "advanced allocation window");
        }

        // Every candidate in the window must be representable.
        if start.checked_add(window).is_none() {
            return Err(AllocationError::CounterExhausted { start });
        }

        tr.atomic_add(&self.counters.pack_element(start), &1u64.to_le_bytes());

        for probe in 0..HCA_MAX_CANDIDATE_PROBES {
            // Keep the RNG out of scope across the await below.
            let candidate = start + rand::rng().random_range(0..window);
            let key = self.recent.pack_element(candidate);

            if tr.get(&key).await.context(StorageSnafu)?.is_none() {
                tr.set(&key, b"");
                debug!(candidate, probes = probe + 1, "allocated candidate");
                return Ok(candidate);
            }
        }

        Err(AllocationError::CandidatesExhausted {
            start,
            window,
            probes: HCA_MAX_CANDIDATE_PROBES,
        })
    }

    /// Read the current window start and allocation count without conflicts.
    async fn read_counter(&self, tr: &dyn Transaction) -> Result<(i64, u64), AllocationError> {
        let (begin, end) = self.counters.range(&Tuple::new());
        let rows = tr
            .get_range(&begin, &end, RangeOptions::limit(1).reversed().snapshot())
            .await
            .context(StorageSnafu)?;

        let Some(row) = rows.first() else {
            return Ok((0, 0));
        };

        let key = self.counters.unpack(&row.key).map_err(|e| AllocationError::CorruptedState {
            reason: format!("undecodable counters key: {e}"),
        })?;
        let start = match key.get(0) {
            Some(Element::Int(start)) if *start >= 0 => *start,
            other => {
                return Err(AllocationError::CorruptedState {
                    reason: format!("counters key holds {other:?}, expected a non-negative integer"),
                });
            }
        };

        Ok((start, decode_count(&row.value)))
    }
}

/// Window size for a window starting at `start`.
pub fn window_size(start: i64) -> i64 {
    if start < HCA_MEDIUM_WINDOW_THRESHOLD {
        HCA_INITIAL_WINDOW_SIZE
    } else if start < HCA_LARGE_WINDOW_THRESHOLD {
        HCA_MEDIUM_WINDOW_SIZE
    } else {
        HCA_MAX_WINDOW_SIZE
    }
}

/// Whether one more allocation would leave the window at least half used.
pub fn should_advance_window(count: u64, window: i64) -> bool {
    count.saturating_add(1).saturating_mul(2) >= window.unsigned_abs()
}

/// Little-endian count, tolerating values narrower than eight bytes.
fn decode_count(value: &[u8]) -> u64 {
    value.iter().take(8).rev().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

fn key_after(key: &[u8]) -> Vec<u8> {
    let mut next = key.to_vec();
    next.push(0x00);
    next
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use keyspace_kv::MemoryDatabase;

    use super::*;

    fn allocator() -> HighContentionAllocator {
        HighContentionAllocator::new(&Subspace::from_bytes(b"hca".to_vec()))
    }

    async fn allocate_committed(db: &MemoryDatabase, hca: &HighContentionAllocator) -> i64 {
        let tr = db.begin();
        let n = hca.allocate(&tr).await.unwrap();
        tr.commit().await.unwrap();
        n
    }

    #[test]
    fn test_window_sizes() {
        assert_eq!(window_size(0), 64);
        assert_eq!(window_size(254), 64);
        assert_eq!(window_size(255), 1024);
        assert_eq!(window_size(65534), 1024);
        assert_eq!(window_size(65535), 8192);
        assert_eq!(window_size(i64::MAX / 2), 8192);
    }

    #[test]
    fn test_should_advance_window() {
        assert!(!should_advance_window(0, 64));
        assert!(!should_advance_window(30, 64));
        assert!(should_advance_window(31, 64));
        assert!(should_advance_window(1000, 1024));
        assert!(!should_advance_window(510, 1024));
    }

    #[test]
    fn test_decode_count() {
        assert_eq!(decode_count(&7u64.to_le_bytes()), 7);
        assert_eq!(decode_count(&300u32.to_le_bytes()), 300);
        assert_eq!(decode_count(&[]), 0);
    }

    #[test]
    fn test_retryable_classification() {
        assert!(AllocationError::Storage { source: StoreError::Conflict }.is_retryable());
        assert!(
            AllocationError::CandidatesExhausted {
                start: 0,
                window: 64,
                probes: 1
            }
            .is_retryable()
        );
        assert!(
            !AllocationError::CorruptedState {
                reason: "bad".to_string()
            }
            .is_retryable()
        );
    }

    #[tokio::test]
    async fn test_first_allocation_in_initial_window() {
        let db = MemoryDatabase::new();
        let n = allocate_committed(&db, &allocator()).await;
        assert!((0..HCA_INITIAL_WINDOW_SIZE).contains(&n));
    }

    #[tokio::test]
    async fn test_sequential_allocations_unique_across_windows() {
        let db = MemoryDatabase::new();
        let hca = allocator();
        let mut seen = HashSet::new();

        for _ in 0..300 {
            let n = allocate_committed(&db, &hca).await;
            assert!(n >= 0);
            assert!(seen.insert(n), "duplicate allocation {n}");
        }

        // 300 allocations cannot fit in the first half of a 64-wide window.
        assert!(seen.iter().any(|&n| n >= HCA_INITIAL_WINDOW_SIZE));
    }

    #[tokio::test]
    async fn test_allocations_in_one_transaction_are_distinct() {
        let db = MemoryDatabase::new();
        let hca = allocator();
        let tr = db.begin();

        let mut seen = HashSet::new();
        for _ in 0..40 {
            assert!(seen.insert(hca.allocate(&tr).await.unwrap()));
        }
        tr.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_window_advance_prunes_old_state() {
        let db = MemoryDatabase::new();
        let hca = allocator();

        for _ in 0..40 {
            allocate_committed(&db, &hca).await;
        }

        let tr = db.begin();
        let (begin, end) = hca.counters.range(&Tuple::new());
        let counters = tr.get_range(&begin, &end, RangeOptions::default()).await.unwrap();
        assert_eq!(counters.len(), 1, "only the active window keeps a counters row");

        let start = hca.counters.unpack(&counters[0].key).unwrap().get(0).and_then(Element::as_int).unwrap();
        assert_eq!(start, HCA_INITIAL_WINDOW_SIZE);

        let stale = tr.get_range(hca.recent.key(), &hca.recent.pack_element(start), RangeOptions::default()).await.unwrap();
        assert!(stale.is_empty(), "claims below the active window are pruned");
    }

    #[tokio::test]
    async fn test_counter_read_is_snapshot() {
        let db = MemoryDatabase::new();
        let hca = allocator();

        let first = db.begin();
        let second = db.begin();
        let a = hca.allocate(&first).await.unwrap();
        let b = hca.allocate(&second).await.unwrap();
        first.commit().await.unwrap();

        // Distinct candidates never conflict: the counter is a blind add.
        if a != b {
            second.commit().await.unwrap();
        } else {
            assert_eq!(second.commit().await, Err(StoreError::Conflict));
        }
    }

    #[tokio::test]
    async fn test_corrupted_counters_key() {
        let db = MemoryDatabase::new();
        let hca = allocator();

        let tr = db.begin();
        tr.set(&hca.counters.pack_element("not-an-int"), &1u64.to_le_bytes());
        tr.commit().await.unwrap();

        let tr = db.begin();
        assert!(matches!(hca.allocate(&tr).await, Err(AllocationError::CorruptedState { .. })));
    }

    #[tokio::test]
    async fn test_window_start_near_integer_limit_is_exhausted() {
        let db = MemoryDatabase::new();
        let hca = allocator();

        let tr = db.begin();
        tr.set(&hca.counters.pack_element(i64::MAX - 10), &0u64.to_le_bytes());
        tr.commit().await.unwrap();

        let tr = db.begin();
        match hca.allocate(&tr).await {
            Err(AllocationError::CounterExhausted { start }) => assert_eq!(start, i64::MAX - 10),
            other => panic!("expected CounterExhausted, got {other:?}"),
        }
    }

    #[test]
    fn test_store_error_converts_to_storage() {
        let err = AllocationError::from(StoreError::Conflict);
        assert!(matches!(err, AllocationError::Storage { source: StoreError::Conflict }));
        assert!(err.is_retryable());
    }
}
