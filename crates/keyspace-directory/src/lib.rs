//! Directory layer and prefix allocator for ordered transactional key-value stores.
//!
//! - [`HighContentionAllocator`]: short unique integers under heavy concurrency
//! - [`DirectoryLayer`]: path-to-prefix mapping with partitions and version gating
//! - [`DirectorySubspace`]: a directory handle usable as a keyspace
//!
//! Every operation takes a [`keyspace_kv::Transaction`] and does its work inside
//! it. Retrying on conflict is left to the transaction's owner, for example
//! [`keyspace_kv::MemoryDatabase::run`].

pub mod allocator;
pub mod config;
pub mod constants;
pub mod directory;

pub use allocator::AllocationError;
pub use allocator::HighContentionAllocator;
pub use config::DirectoryLayerConfig;
pub use directory::Directory;
pub use directory::DirectoryError;
pub use directory::DirectoryLayer;
pub use directory::DirectorySubspace;
