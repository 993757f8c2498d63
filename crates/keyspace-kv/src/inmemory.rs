//! In-memory ordered store with optimistic concurrency control.
//!
//! Reads go straight to the shared map and record conflict ranges. Writes are
//! buffered per transaction and applied atomically on commit, after checking
//! that no transaction committed since this one's read version wrote a range
//! it read.

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::ops::Bound;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tracing::debug;

use crate::KeyValue;
use crate::RangeOptions;
use crate::Retryable;
use crate::StoreError;
use crate::Transaction;
use crate::constants::MAX_CONFLICT_HISTORY;
use crate::constants::MAX_TRANSACTION_RETRIES;
use crate::constants::RETRY_INITIAL_BACKOFF_MS;
use crate::constants::RETRY_MAX_BACKOFF_MS;
use crate::transaction::add_little_endian;

// =============================================================================
// Conflict Tracking
// =============================================================================

/// Half-open key range `[begin, end)`.
#[derive(Debug, Clone)]
struct KeyRange {
    begin: Vec<u8>,
    end: Vec<u8>,
}

impl KeyRange {
    fn new(begin: &[u8], end: &[u8]) -> Self {
        Self {
            begin: begin.to_vec(),
            end: end.to_vec(),
        }
    }

    fn single(key: &[u8]) -> Self {
        Self {
            begin: key.to_vec(),
            end: key_after(key),
        }
    }

    fn contains(&self, key: &[u8]) -> bool {
        self.begin.as_slice() <= key && key < self.end.as_slice()
    }

    fn intersects(&self, other: &KeyRange) -> bool {
        self.begin < other.end && other.begin < self.end
    }
}

/// Smallest key strictly greater than `key`.
fn key_after(key: &[u8]) -> Vec<u8> {
    let mut next = Vec::with_capacity(key.len() + 1);
    next.extend_from_slice(key);
    next.push(0x00);
    next
}

#[derive(Debug)]
struct CommitRecord {
    version: u64,
    writes: Vec<KeyRange>,
}

#[derive(Debug, Default)]
struct StoreState {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    version: u64,
    history: VecDeque<CommitRecord>,
    /// Highest commit version dropped from `history`.
    pruned_through: u64,
}

// =============================================================================
// Transaction Buffer
// =============================================================================

#[derive(Debug, Clone)]
enum PendingWrite {
    /// Final value, `None` for a cleared key.
    Value(Option<Vec<u8>>),
    /// Atomic adds applied in order on top of the committed value.
    Add(Vec<Vec<u8>>),
}

impl PendingWrite {
    fn resolve(&self, base: Option<&[u8]>) -> Option<Vec<u8>> {
        match self {
            PendingWrite::Value(value) => value.clone(),
            PendingWrite::Add(params) => {
                let mut current = base.map(<[u8]>::to_vec);
                for param in params {
                    current = Some(add_little_endian(current.as_deref(), param));
                }
                current
            }
        }
    }
}

#[derive(Debug, Default)]
struct TxnBuffer {
    writes: BTreeMap<Vec<u8>, PendingWrite>,
    cleared: Vec<KeyRange>,
    read_conflicts: Vec<KeyRange>,
    write_conflicts: Vec<KeyRange>,
}

impl TxnBuffer {
    fn is_cleared(&self, key: &[u8]) -> bool {
        self.cleared.iter().any(|range| range.contains(key))
    }
}

// =============================================================================
// MemoryDatabase
// =============================================================================

/// Shared in-memory ordered key-value store.
///
/// Cloning is cheap and every clone refers to the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transaction reading at the latest committed version.
    pub fn begin(&self) -> MemoryTransaction {
        let read_version = self.state.lock().version;
        MemoryTransaction {
            state: Arc::clone(&self.state),
            read_version,
            buffer: Mutex::new(TxnBuffer::default()),
        }
    }

    /// Run `f` in a fresh transaction and commit, retrying retryable failures.
    ///
    /// Each attempt gets a new transaction. Errors for which
    /// [`Retryable::is_retryable`] is false are returned immediately; retryable
    /// ones are retried with exponential backoff up to
    /// [`MAX_TRANSACTION_RETRIES`] attempts.
    ///
    /// # Example
    ///
    /// ```
    /// use futures::FutureExt;
    /// use keyspace_kv::{MemoryDatabase, StoreError, Transaction};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let db = MemoryDatabase::new();
    /// db.run(|tr| {
    ///     async move {
    ///         tr.set(b"k", b"v");
    ///         Ok::<_, StoreError>(())
    ///     }
    ///     .boxed()
    /// })
    /// .await
    /// .unwrap();
    /// # }
    /// ```
    pub async fn run<F, T, E>(&self, mut f: F) -> Result<T, E>
    where
        F: for<'a> FnMut(&'a MemoryTransaction) -> BoxFuture<'a, Result<T, E>>,
        E: From<StoreError> + Retryable,
    {
        let mut attempt = 0u32;
        let mut backoff_ms = RETRY_INITIAL_BACKOFF_MS;

        loop {
            let tr = self.begin();
            let outcome = f(&tr).await;

            let err = match outcome {
                Ok(value) => match tr.commit().await {
                    Ok(_) => return Ok(value),
                    Err(e) => E::from(e),
                },
                Err(e) => e,
            };

            attempt += 1;
            if !err.is_retryable() || attempt >= MAX_TRANSACTION_RETRIES {
                return Err(err);
            }

            debug!(attempt, backoff_ms, "retrying transaction");
            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            backoff_ms = (backoff_ms * 2).min(RETRY_MAX_BACKOFF_MS);
        }
    }
}

// =============================================================================
// MemoryTransaction
// =============================================================================

/// A single optimistic transaction against a [`MemoryDatabase`].
///
/// Dropping the transaction without calling [`commit`](Self::commit)
/// discards its writes.
#[derive(Debug)]
pub struct MemoryTransaction {
    state: Arc<Mutex<StoreState>>,
    read_version: u64,
    buffer: Mutex<TxnBuffer>,
}

impl MemoryTransaction {
    /// Committed version this transaction started at.
    pub fn read_version(&self) -> u64 {
        self.read_version
    }

    /// Apply buffered writes atomically, returning the commit version.
    ///
    /// Fails with [`StoreError::Conflict`] if a transaction committed after
    /// this one's read version wrote any range this one read without
    /// snapshot, and with [`StoreError::TransactionTooOld`] if that can no
    /// longer be determined.
    pub async fn commit(self) -> Result<u64, StoreError> {
        let buffer = self.buffer.into_inner();
        let mut state = self.state.lock();

        if !buffer.read_conflicts.is_empty() {
            if state.pruned_through > self.read_version {
                return Err(StoreError::TransactionTooOld {
                    read_version: self.read_version,
                });
            }

            let conflicted = state.history.iter().filter(|record| record.version > self.read_version).any(|record| {
                record.writes.iter().any(|written| buffer.read_conflicts.iter().any(|read| read.intersects(written)))
            });
            if conflicted {
                debug!(read_version = self.read_version, "commit rejected by conflict");
                return Err(StoreError::Conflict);
            }
        }

        if buffer.write_conflicts.is_empty() {
            return Ok(state.version);
        }

        for range in &buffer.cleared {
            state.data.retain(|key, _| !range.contains(key));
        }
        for (key, write) in buffer.writes {
            match write.resolve(state.data.get(&key).map(Vec::as_slice)) {
                Some(value) => {
                    state.data.insert(key, value);
                }
                None => {
                    state.data.remove(&key);
                }
            }
        }

        state.version += 1;
        let version = state.version;
        state.history.push_back(CommitRecord {
            version,
            writes: buffer.write_conflicts,
        });
        while state.history.len() > MAX_CONFLICT_HISTORY {
            if let Some(dropped) = state.history.pop_front() {
                state.pruned_through = dropped.version;
            }
        }

        Ok(version)
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let mut buffer = self.buffer.lock();
        buffer.read_conflicts.push(KeyRange::single(key));

        let base = if buffer.is_cleared(key) {
            None
        } else {
            self.state.lock().data.get(key).cloned()
        };

        Ok(match buffer.writes.get(key) {
            Some(write) => write.resolve(base.as_deref()),
            None => base,
        })
    }

    async fn get_range(&self, begin: &[u8], end: &[u8], options: RangeOptions) -> Result<Vec<KeyValue>, StoreError> {
        if begin >= end {
            return Ok(Vec::new());
        }

        let mut buffer = self.buffer.lock();
        let bounds = (Bound::Included(begin), Bound::Excluded(end));

        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = {
            let state = self.state.lock();
            state
                .data
                .range::<[u8], _>(bounds)
                .filter(|(key, _)| !buffer.is_cleared(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        };

        for (key, write) in buffer.writes.range::<[u8], _>(bounds) {
            match write.resolve(merged.get(key).map(Vec::as_slice)) {
                Some(value) => {
                    merged.insert(key.clone(), value);
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        let limit = options.limit.unwrap_or(usize::MAX);
        let to_pair = |(key, value): (Vec<u8>, Vec<u8>)| KeyValue { key, value };
        let result: Vec<KeyValue> = if options.reverse {
            merged.into_iter().rev().take(limit).map(to_pair).collect()
        } else {
            merged.into_iter().take(limit).map(to_pair).collect()
        };

        if !options.snapshot {
            // A read cut short by its limit only depends on the keys it reached.
            let conflict = match result.last() {
                Some(last) if result.len() == limit && options.reverse => KeyRange::new(&last.key, end),
                Some(last) if result.len() == limit => KeyRange::new(begin, &key_after(&last.key)),
                _ => KeyRange::new(begin, end),
            };
            buffer.read_conflicts.push(conflict);
        }

        Ok(result)
    }

    fn set(&self, key: &[u8], value: &[u8]) {
        let mut buffer = self.buffer.lock();
        buffer.writes.insert(key.to_vec(), PendingWrite::Value(Some(value.to_vec())));
        buffer.write_conflicts.push(KeyRange::single(key));
    }

    fn clear(&self, key: &[u8]) {
        let mut buffer = self.buffer.lock();
        buffer.writes.insert(key.to_vec(), PendingWrite::Value(None));
        buffer.write_conflicts.push(KeyRange::single(key));
    }

    fn clear_range(&self, begin: &[u8], end: &[u8]) {
        if begin >= end {
            return;
        }

        let range = KeyRange::new(begin, end);
        let mut buffer = self.buffer.lock();
        buffer.writes.retain(|key, _| !range.contains(key));
        buffer.cleared.push(range.clone());
        buffer.write_conflicts.push(range);
    }

    fn atomic_add(&self, key: &[u8], param: &[u8]) {
        let mut buffer = self.buffer.lock();
        let cleared = buffer.is_cleared(key);

        let next = match buffer.writes.remove(key) {
            Some(PendingWrite::Value(value)) => PendingWrite::Value(Some(add_little_endian(value.as_deref(), param))),
            Some(PendingWrite::Add(mut params)) => {
                params.push(param.to_vec());
                PendingWrite::Add(params)
            }
            None if cleared => PendingWrite::Value(Some(add_little_endian(None, param))),
            None => PendingWrite::Add(vec![param.to_vec()]),
        };

        buffer.writes.insert(key.to_vec(), next);
        buffer.write_conflicts.push(KeyRange::single(key));
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;

    use super::*;

    async fn put(db: &MemoryDatabase, key: &[u8], value: &[u8]) {
        let tr = db.begin();
        tr.set(key, value);
        tr.commit().await.unwrap();
    }

    fn keys(pairs: &[KeyValue]) -> Vec<Vec<u8>> {
        pairs.iter().map(|kv| kv.key.clone()).collect()
    }

    #[tokio::test]
    async fn test_set_get_commit() {
        let db = MemoryDatabase::new();
        put(&db, b"a", b"1").await;

        let tr = db.begin();
        assert_eq!(tr.get(b"a").await.unwrap(), Some(b"1".to_vec()));
        assert_eq!(tr.get(b"b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_private() {
        let db = MemoryDatabase::new();
        let writer = db.begin();
        writer.set(b"a", b"1");

        assert_eq!(writer.get(b"a").await.unwrap(), Some(b"1".to_vec()));
        assert_eq!(db.begin().get(b"a").await.unwrap(), None);

        drop(writer);
        assert_eq!(db.begin().get(b"a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_range_read_your_writes() {
        let db = MemoryDatabase::new();
        put(&db, b"a", b"1").await;
        put(&db, b"c", b"3").await;

        let tr = db.begin();
        tr.set(b"b", b"2");
        tr.clear(b"c");

        let pairs = tr.get_range(b"a", b"z", RangeOptions::default()).await.unwrap();
        assert_eq!(keys(&pairs), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[tokio::test]
    async fn test_clear_range_hides_committed_and_pending() {
        let db = MemoryDatabase::new();
        put(&db, b"k1", b"1").await;
        put(&db, b"k2", b"2").await;
        put(&db, b"z", b"z").await;

        let tr = db.begin();
        tr.set(b"k3", b"3");
        tr.clear_range(b"k", b"l");
        tr.set(b"k4", b"4");

        let pairs = tr.get_range(b"", b"\xFF", RangeOptions::default()).await.unwrap();
        assert_eq!(keys(&pairs), vec![b"k4".to_vec(), b"z".to_vec()]);
        assert_eq!(tr.get(b"k1").await.unwrap(), None);
        tr.commit().await.unwrap();

        let pairs = db.begin().get_range(b"", b"\xFF", RangeOptions::default()).await.unwrap();
        assert_eq!(keys(&pairs), vec![b"k4".to_vec(), b"z".to_vec()]);
    }

    #[tokio::test]
    async fn test_reverse_with_limit() {
        let db = MemoryDatabase::new();
        for key in [b"a", b"b", b"c"] {
            put(&db, key, b"").await;
        }

        let tr = db.begin();
        let pairs = tr.get_range(b"a", b"c", RangeOptions::limit(1).reversed()).await.unwrap();
        assert_eq!(keys(&pairs), vec![b"b".to_vec()]);

        let pairs = tr.get_range(b"a", b"z", RangeOptions::limit(2)).await.unwrap();
        assert_eq!(keys(&pairs), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[tokio::test]
    async fn test_atomic_add() {
        let db = MemoryDatabase::new();

        let tr = db.begin();
        tr.atomic_add(b"n", &1u64.to_le_bytes());
        tr.atomic_add(b"n", &2u64.to_le_bytes());
        assert_eq!(tr.get(b"n").await.unwrap(), Some(3u64.to_le_bytes().to_vec()));
        tr.commit().await.unwrap();

        let tr = db.begin();
        tr.atomic_add(b"n", &4u64.to_le_bytes());
        tr.commit().await.unwrap();

        assert_eq!(db.begin().get(b"n").await.unwrap(), Some(7u64.to_le_bytes().to_vec()));
    }

    #[tokio::test]
    async fn test_atomic_add_is_blind() {
        let db = MemoryDatabase::new();
        let first = db.begin();
        let second = db.begin();

        first.atomic_add(b"n", &1u32.to_le_bytes());
        second.atomic_add(b"n", &1u32.to_le_bytes());
        first.commit().await.unwrap();
        second.commit().await.unwrap();

        assert_eq!(db.begin().get(b"n").await.unwrap(), Some(2u32.to_le_bytes().to_vec()));
    }

    #[tokio::test]
    async fn test_read_write_conflict() {
        let db = MemoryDatabase::new();
        let first = db.begin();
        let second = db.begin();

        first.get(b"k").await.unwrap();
        first.set(b"k", b"first");
        second.get(b"k").await.unwrap();
        second.set(b"k", b"second");

        first.commit().await.unwrap();
        assert_eq!(second.commit().await, Err(StoreError::Conflict));
        assert_eq!(db.begin().get(b"k").await.unwrap(), Some(b"first".to_vec()));
    }

    #[tokio::test]
    async fn test_range_read_conflicts_with_insert() {
        let db = MemoryDatabase::new();
        let reader = db.begin();
        let pairs = reader.get_range(b"a", b"m", RangeOptions::default()).await.unwrap();
        assert!(pairs.is_empty());
        reader.set(b"marker", b"");

        put(&db, b"c", b"phantom").await;
        assert_eq!(reader.commit().await, Err(StoreError::Conflict));
    }

    #[tokio::test]
    async fn test_snapshot_reads_do_not_conflict() {
        let db = MemoryDatabase::new();
        let reader = db.begin();
        reader.get_range(b"a", b"m", RangeOptions::default().snapshot()).await.unwrap();
        reader.set(b"marker", b"");

        put(&db, b"c", b"x").await;
        reader.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_limited_read_only_conflicts_on_keys_reached() {
        let db = MemoryDatabase::new();
        put(&db, b"a", b"").await;
        put(&db, b"b", b"").await;

        let reader = db.begin();
        reader.get_range(b"a", b"z", RangeOptions::limit(1)).await.unwrap();
        reader.set(b"marker", b"");

        put(&db, b"q", b"").await;
        reader.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_transaction_too_old() {
        let db = MemoryDatabase::new();
        let stale = db.begin();
        stale.get(b"k").await.unwrap();
        stale.set(b"k", b"");

        for _ in 0..=MAX_CONFLICT_HISTORY {
            put(&db, b"other", b"").await;
        }

        assert_eq!(stale.commit().await, Err(StoreError::TransactionTooOld { read_version: 0 }));
    }

    #[tokio::test]
    async fn test_run_retries_conflicts() {
        let db = MemoryDatabase::new();
        let mut handles = Vec::new();

        for _ in 0..8 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                db.run(|tr| {
                    async move {
                        let current = tr.get(b"counter").await?.map(|v| v[0]).unwrap_or(0);
                        tokio::task::yield_now().await;
                        tr.set(b"counter", &[current + 1]);
                        Ok::<_, StoreError>(())
                    }
                    .boxed()
                })
                .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(db.begin().get(b"counter").await.unwrap(), Some(vec![8]));
    }

    #[tokio::test]
    async fn test_run_returns_terminal_errors() {
        let db = MemoryDatabase::new();
        let mut attempts = 0;

        let result: Result<(), StoreError> = db
            .run(|_tr| {
                attempts += 1;
                async move {
                    Err(StoreError::Failed {
                        reason: "boom".to_string(),
                    })
                }
                .boxed()
            })
            .await;

        assert!(matches!(result, Err(StoreError::Failed { .. })));
        assert_eq!(attempts, 1);
    }
}
