//! Transactional key-value store boundary.
//!
//! Layers above this crate only ever see the [`Transaction`] trait: point
//! reads, ordered range reads, buffered writes and blind atomic adds, all
//! observed as one atomic attempt. Committing and retrying belong to whoever
//! owns the transaction.
//!
//! [`MemoryDatabase`] is an in-process implementation with optimistic
//! concurrency control, used by tests and local tooling.
//!
//! # Example
//!
//! ```
//! use keyspace_kv::{MemoryDatabase, Transaction};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let db = MemoryDatabase::new();
//!
//! let tr = db.begin();
//! tr.set(b"hello", b"world");
//! tr.commit().await.unwrap();
//!
//! let tr = db.begin();
//! assert_eq!(tr.get(b"hello").await.unwrap(), Some(b"world".to_vec()));
//! # }
//! ```

pub mod constants;
mod error;
mod inmemory;
mod transaction;

pub use error::Retryable;
pub use error::StoreError;
pub use inmemory::MemoryDatabase;
pub use inmemory::MemoryTransaction;
pub use transaction::KeyValue;
pub use transaction::RangeOptions;
pub use transaction::Transaction;
