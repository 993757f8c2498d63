//! DirectoryLayer - path resolution, creation, moves and removal.

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use keyspace_kv::RangeOptions;
use keyspace_kv::Transaction;
use keyspace_tuple::Subspace;
use keyspace_tuple::Tuple;
use keyspace_tuple::strinc;
use snafu::ResultExt;
use tracing::debug;
use tracing::warn;

use super::AllocationSnafu;
use super::Directory;
use super::DirectoryError;
use super::SubspaceSnafu;
use super::display_path;
use super::node::Node;
use super::subspace::DirectorySubspace;
use super::validation::to_path;
use crate::allocator::HighContentionAllocator;
use crate::config::DirectoryLayerConfig;
use crate::constants::HCA_KEY;
use crate::constants::LAYER_KEY;
use crate::constants::LAYER_VERSION_MAJOR;
use crate::constants::LAYER_VERSION_MINOR;
use crate::constants::LAYER_VERSION_PATCH;
use crate::constants::PARTITION_LAYER;
use crate::constants::PARTITION_NODE_SUFFIX;
use crate::constants::SUBDIRS_KEY;
use crate::constants::VERSION_KEY;
use crate::constants::VERSION_RECORD_SIZE;

/// Directory Layer for hierarchical namespace management.
///
/// Maps paths to short binary prefixes stored under a node subspace, with
/// directory contents allocated under a content subspace. The root layer is
/// built from a [`DirectoryLayerConfig`]; every partition gets its own layer
/// rooted at the partition's prefix.
///
/// # Thread Safety
///
/// `DirectoryLayer` is `Send + Sync` and holds no cached tree state; every
/// operation reads the tree through the caller's transaction.
#[derive(Debug, Clone)]
pub struct DirectoryLayer {
    /// Subspace holding directory nodes.
    node_subspace: Subspace,
    /// Subspace under which prefixes are allocated.
    content_subspace: Subspace,
    /// Node of this layer's root directory.
    root_node: Subspace,
    /// Allocator for content prefixes.
    allocator: HighContentionAllocator,
    allow_manual_prefixes: bool,
    /// Absolute path of this layer's root (empty for the top-level layer).
    path: Vec<String>,
}

impl Default for DirectoryLayer {
    fn default() -> Self {
        let config = DirectoryLayerConfig::default();
        Self::from_parts(
            Subspace::from_bytes(config.node_prefix),
            Subspace::from_bytes(config.content_prefix),
            config.allow_manual_prefixes,
            Vec::new(),
        )
    }
}

impl DirectoryLayer {
    /// Create a top-level directory layer.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidConfig` if the configuration is invalid.
    pub fn new(config: DirectoryLayerConfig) -> Result<Self, DirectoryError> {
        config.validate()?;
        Ok(Self::from_parts(
            Subspace::from_bytes(config.node_prefix),
            Subspace::from_bytes(config.content_prefix),
            config.allow_manual_prefixes,
            Vec::new(),
        ))
    }

    /// Layer managing the inside of the partition with the given prefix.
    pub(super) fn partition(prefix: &[u8], path: Vec<String>) -> Self {
        let mut node_prefix = prefix.to_vec();
        node_prefix.push(PARTITION_NODE_SUFFIX);
        Self::from_parts(Subspace::from_bytes(node_prefix), Subspace::from_bytes(prefix.to_vec()), false, path)
    }

    fn from_parts(node_subspace: Subspace, content_subspace: Subspace, allow_manual_prefixes: bool, path: Vec<String>) -> Self {
        let root_node = node_subspace.child(node_subspace.key());
        let allocator = HighContentionAllocator::new(&root_node.child(HCA_KEY));
        Self {
            node_subspace,
            content_subspace,
            root_node,
            allocator,
            allow_manual_prefixes,
            path,
        }
    }

    /// Subspace holding this layer's directory nodes.
    pub fn node_subspace(&self) -> &Subspace {
        &self.node_subspace
    }

    /// Subspace under which this layer allocates directory prefixes.
    pub fn content_subspace(&self) -> &Subspace {
        &self.content_subspace
    }

    // =========================================================================
    // Versioning
    // =========================================================================

    async fn check_version(&self, tr: &dyn Transaction, write_access: bool) -> Result<(), DirectoryError> {
        let key = self.root_node.pack_element(VERSION_KEY);
        let Some(value) = tr.get(&key).await? else {
            if write_access {
                tr.set(&key, &encode_version(LAYER_VERSION_MAJOR, LAYER_VERSION_MINOR, LAYER_VERSION_PATCH));
            }
            return Ok(());
        };

        let (major, minor, patch) = decode_version(&value)?;
        if major > LAYER_VERSION_MAJOR {
            warn!(major, minor, patch, "directory layout is newer than this layer");
            return Err(DirectoryError::UnsupportedVersion {
                major,
                minor,
                patch,
                supported: supported_version(),
            });
        }
        if minor > LAYER_VERSION_MINOR && write_access {
            return Err(DirectoryError::ReadOnlyVersion {
                major,
                minor,
                patch,
                supported: supported_version(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Node Helpers
    // =========================================================================

    fn node_with_prefix(&self, prefix: &[u8]) -> Subspace {
        self.node_subspace.child(prefix)
    }

    /// Content prefix of the directory whose node is `node`.
    fn prefix_of_node(&self, node: &Subspace) -> Result<Vec<u8>, DirectoryError> {
        let tuple = self.node_subspace.unpack(node.key()).context(SubspaceSnafu)?;
        match tuple.get(0).and_then(|e| e.as_bytes()) {
            Some(prefix) => Ok(prefix.to_vec()),
            None => Err(DirectoryError::CorruptedMetadata {
                reason: format!("node key {} does not hold a byte prefix", hex::encode(node.key())),
            }),
        }
    }

    async fn load_layer(&self, tr: &dyn Transaction, node: &Subspace) -> Result<String, DirectoryError> {
        let Some(raw) = tr.get(&node.pack_element(LAYER_KEY)).await? else {
            return Ok(String::new());
        };
        String::from_utf8(raw).map_err(|e| DirectoryError::CorruptedMetadata {
            reason: format!("layer tag is not UTF-8: {e}"),
        })
    }

    /// Walk `path` from the root, stopping at a missing child or a partition.
    async fn find(&self, tr: &dyn Transaction, path: &[String]) -> Result<Node, DirectoryError> {
        let mut current = self.root_node.clone();
        let mut layer = String::new();

        for (depth, name) in path.iter().enumerate() {
            let reached = path[..=depth].to_vec();
            let entry = current.child(SUBDIRS_KEY).pack_element(name.as_str());
            let Some(prefix) = tr.get(&entry).await? else {
                return Ok(Node {
                    subspace: None,
                    path: reached,
                    target_path: path.to_vec(),
                    layer: String::new(),
                });
            };

            current = self.node_with_prefix(&prefix);
            layer = self.load_layer(tr, &current).await?;
            if layer == PARTITION_LAYER {
                return Ok(Node {
                    subspace: Some(current),
                    path: reached,
                    target_path: path.to_vec(),
                    layer,
                });
            }
        }

        Ok(Node {
            subspace: Some(current),
            path: path.to_vec(),
            target_path: path.to_vec(),
            layer,
        })
    }

    /// The directory layer inside the partition whose node is `node`.
    fn partition_layer(&self, node: &Subspace, node_path: &[String]) -> Result<DirectoryLayer, DirectoryError> {
        let prefix = self.prefix_of_node(node)?;
        let mut path = self.path.clone();
        path.extend_from_slice(node_path);
        debug!(partition = %display_path(&path), "delegating to partition");
        Ok(DirectoryLayer::partition(&prefix, path))
    }

    fn contents_of_node(
        &self,
        node: &Subspace,
        path: &[String],
        layer: String,
    ) -> Result<DirectorySubspace, DirectoryError> {
        let prefix = self.prefix_of_node(node)?;
        let mut full_path = self.path.clone();
        full_path.extend_from_slice(path);

        if layer == PARTITION_LAYER {
            Ok(DirectorySubspace::partition(prefix, full_path, self.clone()))
        } else {
            Ok(DirectorySubspace::plain(Subspace::from_bytes(prefix), full_path, layer, self.clone()))
        }
    }

    fn absolute(&self, path: &[String]) -> Vec<String> {
        let mut full = self.path.clone();
        full.extend_from_slice(path);
        full
    }

    /// Node whose prefix is a prefix of `key`, if any.
    async fn node_containing_key(
        &self,
        tr: &dyn Transaction,
        key: &[u8],
        snapshot: bool,
    ) -> Result<Option<Subspace>, DirectoryError> {
        if key.starts_with(self.node_subspace.key()) {
            return Ok(Some(self.root_node.clone()));
        }

        let (begin, _) = self.node_subspace.range(&Tuple::new());
        let mut end = self.node_subspace.pack_element(key);
        end.push(0x00);

        let mut options = RangeOptions::limit(1).reversed();
        options.snapshot = snapshot;
        let rows = tr.get_range(&begin, &end, options).await?;

        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let tuple = self.node_subspace.unpack(&row.key).context(SubspaceSnafu)?;
        match tuple.get(0).and_then(|e| e.as_bytes()) {
            Some(prev_prefix) if key.starts_with(prev_prefix) => Ok(Some(self.node_with_prefix(prev_prefix))),
            Some(_) => Ok(None),
            None => Err(DirectoryError::CorruptedMetadata {
                reason: format!("node key {} does not start with a byte prefix", hex::encode(&row.key)),
            }),
        }
    }

    /// Whether `prefix` neither lies inside nor contains any existing node's prefix.
    async fn is_prefix_free(&self, tr: &dyn Transaction, prefix: &[u8], snapshot: bool) -> Result<bool, DirectoryError> {
        if prefix.is_empty() {
            return Ok(false);
        }
        if self.node_containing_key(tr, prefix, snapshot).await?.is_some() {
            return Ok(false);
        }

        let begin = self.node_subspace.pack_element(prefix);
        let end = match strinc(prefix) {
            Some(next) => self.node_subspace.pack_element(next),
            None => self.node_subspace.range(&Tuple::new()).1,
        };
        let mut options = RangeOptions::limit(1);
        options.snapshot = snapshot;
        Ok(tr.get_range(&begin, &end, options).await?.is_empty())
    }

    async fn subdir_names(&self, tr: &dyn Transaction, node: &Subspace) -> Result<Vec<String>, DirectoryError> {
        let subdirs = node.child(SUBDIRS_KEY);
        let (begin, end) = subdirs.range(&Tuple::new());
        let rows = tr.get_range(&begin, &end, RangeOptions::default()).await?;

        rows.iter()
            .map(|row| -> Result<String, DirectoryError> {
                let tuple = subdirs.unpack(&row.key).context(SubspaceSnafu)?;
                match tuple.get(0).and_then(|e| e.as_str()) {
                    Some(name) => Ok(name.to_string()),
                    None => Err(DirectoryError::CorruptedMetadata {
                        reason: format!("child entry {} is not named by a string", hex::encode(&row.key)),
                    }),
                }
            })
            .collect()
    }

    async fn remove_from_parent(&self, tr: &dyn Transaction, path: &[String]) -> Result<(), DirectoryError> {
        let Some((name, parent_path)) = path.split_last() else {
            return Ok(());
        };
        let parent = self.find(tr, parent_path).await?;
        if let Some(parent_node) = parent.subspace {
            tr.clear(&parent_node.child(SUBDIRS_KEY).pack_element(name.as_str()));
        }
        Ok(())
    }

    // =========================================================================
    // Operations
    // =========================================================================

    pub(super) fn create_or_open_internal<'a>(
        &'a self,
        tr: &'a dyn Transaction,
        path: &'a [String],
        layer: Option<&'a str>,
        prefix: Option<&'a [u8]>,
        allow_create: bool,
        allow_open: bool,
    ) -> BoxFuture<'a, Result<DirectorySubspace, DirectoryError>> {
        async move {
            self.check_version(tr, false).await?;

            if prefix.is_some() && !self.allow_manual_prefixes {
                return Err(DirectoryError::ManualPrefixNotAllowed);
            }
            if path.is_empty() {
                return Err(DirectoryError::RootDirectoryInvalid);
            }

            let existing = self.find(tr, path).await?;
            if let Some(node) = existing.subspace.as_ref() {
                if let Some(partition) = existing.partition_node(false) {
                    let inner = self.partition_layer(partition, &existing.path)?;
                    let subpath = existing.partition_subpath();
                    return inner
                        .create_or_open_internal(tr, &subpath, layer, prefix, allow_create, allow_open)
                        .await;
                }

                if !allow_open {
                    return Err(DirectoryError::AlreadyExists {
                        path: self.absolute(path),
                    });
                }
                if let Some(expected) = layer.filter(|l| !l.is_empty() && *l != existing.layer) {
                    return Err(DirectoryError::IncompatibleLayer {
                        path: self.absolute(path),
                        expected: expected.to_string(),
                        actual: existing.layer.clone(),
                    });
                }
                return self.contents_of_node(node, path, existing.layer.clone());
            }

            if !allow_create {
                return Err(DirectoryError::DirectoryMissing {
                    path: self.absolute(path),
                });
            }

            self.check_version(tr, true).await?;

            let prefix = match prefix {
                None => {
                    let id = self.allocator.allocate(tr).await.context(AllocationSnafu)?;
                    let prefix = self.content_subspace.pack_element(id);

                    let (begin, end) = startswith_range(&prefix);
                    if !tr.get_range(&begin, &end, RangeOptions::limit(1)).await?.is_empty() {
                        warn!(prefix = %hex::encode(&prefix), "allocated prefix already holds data");
                        return Err(DirectoryError::AllocatorPrefixNotEmpty { prefix });
                    }
                    if !self.is_prefix_free(tr, &prefix, true).await? {
                        warn!(prefix = %hex::encode(&prefix), "allocated prefix overlaps a manual prefix");
                        return Err(DirectoryError::AllocatorPrefixConflict { prefix });
                    }
                    prefix
                }
                Some(manual) => {
                    if !self.is_prefix_free(tr, manual, false).await? {
                        return Err(DirectoryError::PrefixInUse {
                            prefix: manual.to_vec(),
                        });
                    }
                    manual.to_vec()
                }
            };

            let (name, parent_path) = match path.split_last() {
                Some(split) => split,
                None => return Err(DirectoryError::RootDirectoryInvalid),
            };
            let parent_node = if parent_path.is_empty() {
                self.root_node.clone()
            } else {
                let parent = self.create_or_open_internal(tr, parent_path, None, None, true, true).await?;
                self.node_with_prefix(parent.raw_prefix())
            };

            let node = self.node_with_prefix(&prefix);
            let layer = layer.unwrap_or_default();
            tr.set(&parent_node.child(SUBDIRS_KEY).pack_element(name.as_str()), &prefix);
            tr.set(&node.pack_element(LAYER_KEY), layer.as_bytes());

            debug!(
                path = %display_path(&self.absolute(path)),
                prefix = %hex::encode(&prefix),
                layer,
                "created directory"
            );
            self.contents_of_node(&node, path, layer.to_string())
        }
        .boxed()
    }

    pub(super) fn list_internal<'a>(
        &'a self,
        tr: &'a dyn Transaction,
        path: &'a [String],
    ) -> BoxFuture<'a, Result<Vec<String>, DirectoryError>> {
        async move {
            self.check_version(tr, false).await?;

            let node = self.find(tr, path).await?;
            let Some(subspace) = node.subspace.as_ref() else {
                return Err(DirectoryError::DirectoryMissing {
                    path: self.absolute(path),
                });
            };

            if let Some(partition) = node.partition_node(true) {
                let inner = self.partition_layer(partition, &node.path)?;
                let subpath = node.partition_subpath();
                return inner.list_internal(tr, &subpath).await;
            }

            self.subdir_names(tr, subspace).await
        }
        .boxed()
    }

    pub(super) fn move_internal<'a>(
        &'a self,
        tr: &'a dyn Transaction,
        old_path: &'a [String],
        new_path: &'a [String],
    ) -> BoxFuture<'a, Result<DirectorySubspace, DirectoryError>> {
        async move {
            self.check_version(tr, true).await?;

            if old_path.is_empty() || new_path.is_empty() {
                return Err(DirectoryError::RootDirectoryInvalid);
            }
            if new_path.starts_with(old_path) {
                return Err(DirectoryError::InvalidDestination {
                    old_path: self.absolute(old_path),
                    new_path: self.absolute(new_path),
                });
            }

            let old_node = self.find(tr, old_path).await?;
            let new_node = self.find(tr, new_path).await?;

            let Some(old_subspace) = old_node.subspace.as_ref() else {
                return Err(DirectoryError::SourceMissing {
                    path: self.absolute(old_path),
                });
            };

            let old_partition = old_node.partition_node(false);
            let new_partition = new_node.partition_node(false);
            if old_partition.is_some() || new_partition.is_some() {
                return match (old_partition, new_partition) {
                    (Some(partition), Some(_)) if old_node.path == new_node.path => {
                        let inner = self.partition_layer(partition, &old_node.path)?;
                        let old_subpath = old_node.partition_subpath();
                        let new_subpath = new_node.partition_subpath();
                        inner.move_internal(tr, &old_subpath, &new_subpath).await
                    }
                    _ => Err(DirectoryError::CrossPartitionMove {
                        old_path: self.absolute(old_path),
                        new_path: self.absolute(new_path),
                    }),
                };
            }

            if new_node.exists() {
                return Err(DirectoryError::DestinationExists {
                    path: self.absolute(new_path),
                });
            }

            let Some((name, parent_path)) = new_path.split_last() else {
                return Err(DirectoryError::RootDirectoryInvalid);
            };
            let parent = self.find(tr, parent_path).await?;
            let Some(parent_node) = parent.subspace.as_ref() else {
                return Err(DirectoryError::ParentMissing {
                    path: self.absolute(new_path),
                });
            };

            let prefix = self.prefix_of_node(old_subspace)?;
            tr.set(&parent_node.child(SUBDIRS_KEY).pack_element(name.as_str()), &prefix);
            self.remove_from_parent(tr, old_path).await?;

            debug!(
                from = %display_path(&self.absolute(old_path)),
                to = %display_path(&self.absolute(new_path)),
                "moved directory"
            );
            self.contents_of_node(old_subspace, new_path, old_node.layer.clone())
        }
        .boxed()
    }

    pub(super) fn remove_internal<'a>(
        &'a self,
        tr: &'a dyn Transaction,
        path: &'a [String],
        fail_on_nonexistent: bool,
    ) -> BoxFuture<'a, Result<bool, DirectoryError>> {
        async move {
            self.check_version(tr, true).await?;

            if path.is_empty() {
                return Err(DirectoryError::RootDirectoryInvalid);
            }

            let node = self.find(tr, path).await?;
            let Some(subspace) = node.subspace.as_ref() else {
                if fail_on_nonexistent {
                    return Err(DirectoryError::DirectoryMissing {
                        path: self.absolute(path),
                    });
                }
                return Ok(false);
            };

            if let Some(partition) = node.partition_node(false) {
                let inner = self.partition_layer(partition, &node.path)?;
                let subpath = node.partition_subpath();
                return inner.remove_internal(tr, &subpath, fail_on_nonexistent).await;
            }

            self.remove_recursive(tr, subspace).await?;
            self.remove_from_parent(tr, path).await?;

            debug!(path = %display_path(&self.absolute(path)), "removed directory");
            Ok(true)
        }
        .boxed()
    }

    /// Clear a node, its descendants and all of their contents.
    fn remove_recursive<'a>(
        &'a self,
        tr: &'a dyn Transaction,
        node: &'a Subspace,
    ) -> BoxFuture<'a, Result<(), DirectoryError>> {
        async move {
            let subdirs = node.child(SUBDIRS_KEY);
            let (begin, end) = subdirs.range(&Tuple::new());
            let children = tr.get_range(&begin, &end, RangeOptions::default()).await?;
            for child in children {
                let child_node = self.node_with_prefix(&child.value);
                self.remove_recursive(tr, &child_node).await?;
            }

            let prefix = self.prefix_of_node(node)?;
            let (begin, end) = startswith_range(&prefix);
            tr.clear_range(&begin, &end);

            let (begin, end) = node.range(&Tuple::new());
            tr.clear_range(&begin, &end);
            Ok(())
        }
        .boxed()
    }

    pub(super) fn exists_internal<'a>(
        &'a self,
        tr: &'a dyn Transaction,
        path: &'a [String],
    ) -> BoxFuture<'a, Result<bool, DirectoryError>> {
        async move {
            self.check_version(tr, false).await?;

            let node = self.find(tr, path).await?;
            if !node.exists() {
                return Ok(false);
            }

            if let Some(partition) = node.partition_node(false) {
                let inner = self.partition_layer(partition, &node.path)?;
                let subpath = node.partition_subpath();
                return inner.exists_internal(tr, &subpath).await;
            }

            Ok(true)
        }
        .boxed()
    }
}

#[async_trait]
impl Directory for DirectoryLayer {
    async fn create_or_open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&str>,
    ) -> Result<DirectorySubspace, DirectoryError> {
        let path = to_path(path)?;
        self.create_or_open_internal(tr, &path, layer, None, true, true).await
    }

    async fn open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&str>,
    ) -> Result<DirectorySubspace, DirectoryError> {
        let path = to_path(path)?;
        self.create_or_open_internal(tr, &path, layer, None, false, true).await
    }

    async fn create(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&str>,
        prefix: Option<&[u8]>,
    ) -> Result<DirectorySubspace, DirectoryError> {
        let path = to_path(path)?;
        self.create_or_open_internal(tr, &path, layer, prefix, true, false).await
    }

    async fn list(&self, tr: &dyn Transaction, path: &[&str]) -> Result<Vec<String>, DirectoryError> {
        let path = to_path(path)?;
        self.list_internal(tr, &path).await
    }

    async fn move_to(
        &self,
        tr: &dyn Transaction,
        old_path: &[&str],
        new_path: &[&str],
    ) -> Result<DirectorySubspace, DirectoryError> {
        let old_path = to_path(old_path)?;
        let new_path = to_path(new_path)?;
        self.move_internal(tr, &old_path, &new_path).await
    }

    async fn move_to_path(
        &self,
        _tr: &dyn Transaction,
        _new_absolute_path: &[&str],
    ) -> Result<DirectorySubspace, DirectoryError> {
        Err(DirectoryError::RootDirectoryInvalid)
    }

    async fn remove(&self, tr: &dyn Transaction, path: &[&str]) -> Result<(), DirectoryError> {
        let path = to_path(path)?;
        self.remove_internal(tr, &path, true).await.map(|_| ())
    }

    async fn remove_if_exists(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError> {
        let path = to_path(path)?;
        self.remove_internal(tr, &path, false).await
    }

    async fn exists(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError> {
        let path = to_path(path)?;
        self.exists_internal(tr, &path).await
    }

    fn layer(&self) -> &str {
        ""
    }

    fn path(&self) -> &[String] {
        &self.path
    }
}

/// Range of every key starting with `prefix`.
fn startswith_range(prefix: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let end = strinc(prefix).unwrap_or_else(|| {
        let mut end = prefix.to_vec();
        end.push(0xFF);
        end
    });
    (prefix.to_vec(), end)
}

fn encode_version(major: u32, minor: u32, patch: u32) -> Vec<u8> {
    let mut record = Vec::with_capacity(VERSION_RECORD_SIZE);
    record.extend_from_slice(&major.to_le_bytes());
    record.extend_from_slice(&minor.to_le_bytes());
    record.extend_from_slice(&patch.to_le_bytes());
    record
}

fn decode_version(record: &[u8]) -> Result<(u32, u32, u32), DirectoryError> {
    let field = |i: usize| -> Option<u32> {
        let bytes: [u8; 4] = record.get(i * 4..i * 4 + 4)?.try_into().ok()?;
        Some(u32::from_le_bytes(bytes))
    };
    match (field(0), field(1), field(2)) {
        (Some(major), Some(minor), Some(patch)) => Ok((major, minor, patch)),
        _ => Err(DirectoryError::CorruptedMetadata {
            reason: format!("version record has {} bytes, expected {VERSION_RECORD_SIZE}", record.len()),
        }),
    }
}

fn supported_version() -> String {
    format!("{LAYER_VERSION_MAJOR}.{LAYER_VERSION_MINOR}.{LAYER_VERSION_PATCH}")
}
