//! Directory layer and allocator constants.
//!
//! Tiger Style: Constants are fixed and immutable, enforced at compile time.
//! Each bound is explicit so no operation allocates or loops without limit.

// ============================================================================
// Persisted Layout
// ============================================================================

/// Default node subspace prefix for the root directory layer (0xFE).
///
/// Matches the reserved metadata prefix used by other directory layer
/// implementations so stores stay interoperable.
pub const DEFAULT_NODE_PREFIX: u8 = 0xFE;

/// Byte appended to a partition's prefix to form its node subspace.
pub const PARTITION_NODE_SUFFIX: u8 = 0xFE;

/// Tuple key of a node's child list (`node[0][name] = prefix`).
pub const SUBDIRS_KEY: i64 = 0;

/// Byte-string key of a node's layer tag.
pub const LAYER_KEY: &[u8] = b"layer";

/// Byte-string key of the version record under the root node.
pub const VERSION_KEY: &[u8] = b"version";

/// Byte-string key of the allocator subspace under the root node.
pub const HCA_KEY: &[u8] = b"hca";

/// Layer tag marking a directory as a partition.
pub const PARTITION_LAYER: &str = "partition";

// ============================================================================
// Version
// ============================================================================

/// Major version of the persisted layout this code reads and writes.
///
/// Stores with a newer major version are refused entirely.
pub const LAYER_VERSION_MAJOR: u32 = 1;

/// Minor version of the persisted layout.
///
/// Stores with a newer minor version may be read but not written.
pub const LAYER_VERSION_MINOR: u32 = 0;

/// Patch version of the persisted layout.
pub const LAYER_VERSION_PATCH: u32 = 0;

/// Size of the encoded version record (three little-endian u32 values).
pub const VERSION_RECORD_SIZE: usize = 12;

// ============================================================================
// Path Bounds
// ============================================================================

/// Maximum number of components in a directory path (64).
///
/// Tiger Style: Bounds recursion depth of ancestor creation.
pub const MAX_DIRECTORY_DEPTH: u32 = 64;

/// Maximum length of a single path component in bytes (1024).
pub const MAX_PATH_COMPONENT_LENGTH_BYTES: u32 = 1024;

// ============================================================================
// High-Contention Allocator
// ============================================================================

/// Tuple key of the allocator's counters subspace.
pub const HCA_COUNTERS_KEY: i64 = 0;

/// Tuple key of the allocator's recently-claimed candidates subspace.
pub const HCA_RECENT_KEY: i64 = 1;

/// Window size while the window start is below [`HCA_MEDIUM_WINDOW_THRESHOLD`] (64).
pub const HCA_INITIAL_WINDOW_SIZE: i64 = 64;

/// Window start at which the window grows to [`HCA_MEDIUM_WINDOW_SIZE`].
pub const HCA_MEDIUM_WINDOW_THRESHOLD: i64 = 255;

/// Window size while the window start is below [`HCA_LARGE_WINDOW_THRESHOLD`] (1024).
pub const HCA_MEDIUM_WINDOW_SIZE: i64 = 1024;

/// Window start at which the window grows to [`HCA_MAX_WINDOW_SIZE`].
pub const HCA_LARGE_WINDOW_THRESHOLD: i64 = 65535;

/// Window size for all larger window starts (8192).
pub const HCA_MAX_WINDOW_SIZE: i64 = 8192;

/// Maximum random probes within one allocation attempt (1024).
///
/// The window is advanced before it is half full, so a probe succeeds with
/// probability above one half. Running out of probes means concurrent
/// claimers filled the window and a fresh transaction should be tried.
pub const HCA_MAX_CANDIDATE_PROBES: u32 = 1024;
