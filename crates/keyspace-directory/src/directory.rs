//! Hierarchical directory layer over an ordered transactional key-value store.
//!
//! The directory layer maps human-readable paths to short binary prefixes.
//! Each directory's prefix is recorded in its parent's child list, so the tree
//! lives entirely in the store and survives moves without rewriting content.
//!
//! # Layout
//!
//! Under the node subspace (default `0xFE`):
//!
//! - `root[b"version"]` = 12-byte version record
//! - `root[b"hca"]...` = allocator state
//! - `node(p)[0][name]` = prefix of child `name`
//! - `node(p)[b"layer"]` = layer tag of the directory with prefix `p`
//!
//! where `node(p) = node_subspace[p]` and `root = node(node_subspace.key())`.
//!
//! # Partitions
//!
//! A directory created with layer `"partition"` owns an independent directory
//! layer whose node subspace is `prefix ++ 0xFE` and whose content subspace is
//! the prefix itself. Operations on paths below a partition are delegated to
//! that layer, and directories cannot be moved across a partition boundary.
//!
//! # Example
//!
//! ```
//! use keyspace_directory::{Directory, DirectoryLayer};
//! use keyspace_kv::{MemoryDatabase, Transaction};
//! use keyspace_tuple::Tuple;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let db = MemoryDatabase::new();
//! let root = DirectoryLayer::default();
//!
//! let tr = db.begin();
//! let users = root.create_or_open(&tr, &["app", "users"], None).await.unwrap();
//! tr.set(&users.pack(&Tuple::new().push("alice")).unwrap(), b"admin");
//! tr.commit().await.unwrap();
//!
//! let tr = db.begin();
//! assert_eq!(root.list(&tr, &["app"]).await.unwrap(), vec!["users".to_string()]);
//! # }
//! ```

mod layer;
mod node;
mod subspace;
mod validation;

use async_trait::async_trait;
pub use layer::DirectoryLayer;
use keyspace_kv::Retryable;
use keyspace_kv::StoreError;
use keyspace_kv::Transaction;
use keyspace_tuple::SubspaceError;
use snafu::Snafu;
pub use subspace::DirectorySubspace;

use crate::allocator::AllocationError;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during directory operations.
///
/// Tree-structure and version errors are terminal for the operation. Store
/// conflicts pass through [`DirectoryError::Storage`] untouched and are
/// reported by [`Retryable::is_retryable`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DirectoryError {
    /// The operation is not permitted on the root directory.
    #[snafu(display("the root directory cannot be opened, created, moved or removed"))]
    RootDirectoryInvalid,

    /// Directory not found at the specified path.
    #[snafu(display("directory does not exist: {}", display_path(path)))]
    DirectoryMissing {
        /// The path that was not found.
        path: Vec<String>,
    },

    /// Directory already exists at the specified path.
    #[snafu(display("directory already exists: {}", display_path(path)))]
    AlreadyExists {
        /// The path that already exists.
        path: Vec<String>,
    },

    /// Source of a move does not exist.
    #[snafu(display("source directory does not exist: {}", display_path(path)))]
    SourceMissing {
        /// The missing source path.
        path: Vec<String>,
    },

    /// Destination of a move already exists.
    #[snafu(display("destination directory already exists: {}", display_path(path)))]
    DestinationExists {
        /// The existing destination path.
        path: Vec<String>,
    },

    /// Parent of a move destination does not exist.
    #[snafu(display("parent of destination does not exist: {}", display_path(path)))]
    ParentMissing {
        /// The destination path whose parent is missing.
        path: Vec<String>,
    },

    /// Destination of a move is the source itself or one of its descendants.
    #[snafu(display(
        "cannot move {} to {}: destination is inside the source",
        display_path(old_path),
        display_path(new_path)
    ))]
    InvalidDestination {
        /// Source path.
        old_path: Vec<String>,
        /// Destination path.
        new_path: Vec<String>,
    },

    /// Source and destination of a move lie in different partitions.
    #[snafu(display("cannot move {} to {} across partitions", display_path(old_path), display_path(new_path)))]
    CrossPartitionMove {
        /// Source path.
        old_path: Vec<String>,
        /// Destination path.
        new_path: Vec<String>,
    },

    /// Layer tag mismatch when opening a directory with a specific layer.
    #[snafu(display(
        "directory {} was created with layer '{}', not '{}'",
        display_path(path),
        actual,
        expected
    ))]
    IncompatibleLayer {
        /// The directory path.
        path: Vec<String>,
        /// Layer requested by the caller.
        expected: String,
        /// Layer stored with the directory.
        actual: String,
    },

    /// A caller-supplied prefix overlaps an existing directory prefix.
    #[snafu(display("prefix {} is already in use", hex::encode(prefix)))]
    PrefixInUse {
        /// The rejected prefix.
        prefix: Vec<u8>,
    },

    /// A prefix was supplied but this layer only allocates prefixes itself.
    #[snafu(display("manual prefixes are not allowed by this directory layer"))]
    ManualPrefixNotAllowed,

    /// The store already holds keys under an automatically allocated prefix.
    #[snafu(display("the store has keys under the allocated prefix {}", hex::encode(prefix)))]
    AllocatorPrefixNotEmpty {
        /// The allocated prefix.
        prefix: Vec<u8>,
    },

    /// An automatically allocated prefix overlaps a manually assigned one.
    #[snafu(display("allocated prefix {} conflicts with a manually assigned prefix", hex::encode(prefix)))]
    AllocatorPrefixConflict {
        /// The allocated prefix.
        prefix: Vec<u8>,
    },

    /// Stored layout has a newer major version.
    #[snafu(display("cannot load directory layout version {major}.{minor}.{patch} with layer version {supported}"))]
    UnsupportedVersion {
        /// Stored major version.
        major: u32,
        /// Stored minor version.
        minor: u32,
        /// Stored patch version.
        patch: u32,
        /// Version implemented by this layer.
        supported: String,
    },

    /// Stored layout has a newer minor version and may only be read.
    #[snafu(display("directory layout version {major}.{minor}.{patch} is read-only for layer version {supported}"))]
    ReadOnlyVersion {
        /// Stored major version.
        major: u32,
        /// Stored minor version.
        minor: u32,
        /// Stored patch version.
        patch: u32,
        /// Version implemented by this layer.
        supported: String,
    },

    /// Path component is invalid (empty or too long).
    #[snafu(display("invalid path component '{component}': {reason}"))]
    InvalidPath {
        /// The invalid component.
        component: String,
        /// Why it's invalid.
        reason: String,
    },

    /// Path exceeds maximum depth.
    #[snafu(display("path depth {depth} exceeds maximum of {max}"))]
    PathTooDeep {
        /// Actual depth.
        depth: u32,
        /// Maximum allowed depth.
        max: u32,
    },

    /// Key operations are not available on the root of a partition.
    #[snafu(display("cannot use the root of partition {} as a keyspace", display_path(path)))]
    PartitionRootAccess {
        /// The partition path.
        path: Vec<String>,
    },

    /// Directory metadata is corrupted.
    #[snafu(display("corrupted directory metadata: {reason}"))]
    CorruptedMetadata {
        /// Description of the corruption.
        reason: String,
    },

    /// Directory layer configuration is invalid.
    #[snafu(display("invalid directory layer configuration: {reason}"))]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// Storage error during directory operation.
    #[snafu(display("storage error: {source}"))]
    Storage {
        /// The underlying store error.
        source: StoreError,
    },

    /// Prefix allocation failed.
    #[snafu(display("prefix allocation failed: {source}"))]
    Allocation {
        /// The underlying allocation error.
        source: AllocationError,
    },

    /// A stored key could not be decoded relative to its subspace.
    #[snafu(display("malformed directory key: {source}"))]
    Subspace {
        /// The underlying subspace error.
        source: SubspaceError,
    },
}

impl Retryable for DirectoryError {
    fn is_retryable(&self) -> bool {
        match self {
            DirectoryError::Storage { source } => source.is_retryable(),
            DirectoryError::Allocation { source } => source.is_retryable(),
            _ => false,
        }
    }
}

impl From<StoreError> for DirectoryError {
    fn from(source: StoreError) -> Self {
        DirectoryError::Storage { source }
    }
}

/// Render a path as `/a/b`.
fn display_path(path: &[String]) -> String {
    format!("/{}", path.join("/"))
}

// =============================================================================
// Directory Trait
// =============================================================================

/// Operations shared by the root directory layer and every directory.
///
/// Paths are relative to the receiver: absolute for a [`DirectoryLayer`],
/// below the directory for a [`DirectorySubspace`]. Every operation runs
/// inside the caller's transaction and only takes effect when it commits.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Open the directory at `path`, creating it and any missing ancestors.
    ///
    /// If `layer` is given and non-empty, an existing directory must carry the
    /// same layer tag.
    async fn create_or_open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&str>,
    ) -> Result<DirectorySubspace, DirectoryError>;

    /// Open an existing directory.
    async fn open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&str>,
    ) -> Result<DirectorySubspace, DirectoryError>;

    /// Create a directory that must not exist yet.
    ///
    /// `prefix` assigns the prefix manually instead of allocating one; the
    /// layer must allow manual prefixes and the prefix must be free.
    async fn create(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&str>,
        prefix: Option<&[u8]>,
    ) -> Result<DirectorySubspace, DirectoryError>;

    /// Names of the immediate children of `path`.
    async fn list(&self, tr: &dyn Transaction, path: &[&str]) -> Result<Vec<String>, DirectoryError>;

    /// Move the directory at `old_path` to `new_path`, keeping its prefix and contents.
    async fn move_to(
        &self,
        tr: &dyn Transaction,
        old_path: &[&str],
        new_path: &[&str],
    ) -> Result<DirectorySubspace, DirectoryError>;

    /// Move this directory to an absolute path within its partition.
    async fn move_to_path(
        &self,
        tr: &dyn Transaction,
        new_absolute_path: &[&str],
    ) -> Result<DirectorySubspace, DirectoryError>;

    /// Remove a directory, its descendants and all of their contents.
    async fn remove(&self, tr: &dyn Transaction, path: &[&str]) -> Result<(), DirectoryError>;

    /// Like [`remove`](Self::remove), returning false instead of failing when absent.
    async fn remove_if_exists(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError>;

    /// Whether a directory exists at `path`.
    async fn exists(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError>;

    /// Layer tag of this directory (empty for the root layer).
    fn layer(&self) -> &str;

    /// Absolute path of this directory.
    fn path(&self) -> &[String];
}
