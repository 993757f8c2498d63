//! Order-preserving tuple keys and a hierarchical directory layer for ordered
//! transactional key-value stores.
//!
//! - [`tuple`]: tuple encoding and subspaces
//! - [`kv`]: the transaction boundary and an in-memory store
//! - [`directory`]: prefix allocation, directories and partitions
//!
//! # Example
//!
//! ```
//! use keyspace::directory::{Directory, DirectoryError, DirectoryLayer};
//! use keyspace::kv::MemoryDatabase;
//! use keyspace::tuple::Tuple;
//! use futures::FutureExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let db = MemoryDatabase::new();
//! let root = DirectoryLayer::default();
//!
//! let key = db
//!     .run(|tr| {
//!         let root = root.clone();
//!         async move {
//!             let dir = root.create_or_open(tr, &["app"], None).await?;
//!             Ok::<_, DirectoryError>(dir.pack(&Tuple::new().push("config"))?)
//!         }
//!         .boxed()
//!     })
//!     .await
//!     .unwrap();
//!
//! assert!(!key.is_empty());
//! # }
//! ```

pub use keyspace_directory as directory;
pub use keyspace_kv as kv;
pub use keyspace_tuple as tuple;
