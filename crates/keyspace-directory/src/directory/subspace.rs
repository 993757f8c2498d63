//! DirectorySubspace - a directory with an allocated prefix.

use async_trait::async_trait;
use keyspace_kv::Transaction;
use keyspace_tuple::Subspace;
use keyspace_tuple::Tuple;
use snafu::ResultExt;

use super::Directory;
use super::DirectoryError;
use super::SubspaceSnafu;
use super::layer::DirectoryLayer;
use super::validation::to_path;
use crate::constants::PARTITION_LAYER;

/// Whether a directory's subtree is managed by its owning layer or its own.
#[derive(Debug, Clone)]
enum DirectoryKind {
    Plain,
    /// The layer managing everything below the partition.
    Partition(Box<DirectoryLayer>),
}

/// A directory with an allocated prefix, usable as a keyspace.
///
/// Also implements [`Directory`], with paths relative to this directory.
///
/// # Example
///
/// ```
/// use keyspace_directory::{Directory, DirectoryLayer};
/// use keyspace_kv::MemoryDatabase;
/// use keyspace_tuple::Tuple;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let db = MemoryDatabase::new();
/// let tr = db.begin();
///
/// let apps = DirectoryLayer::default().create_or_open(&tr, &["apps"], None).await.unwrap();
/// let forge = apps.create_or_open(&tr, &["forge"], None).await.unwrap();
/// assert_eq!(forge.path(), &["apps".to_string(), "forge".to_string()]);
///
/// let key = forge.pack(&Tuple::new().push("repo")).unwrap();
/// assert!(forge.contains(&key).unwrap());
/// assert!(!apps.contains(&key).unwrap());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DirectorySubspace {
    /// The underlying subspace with the allocated prefix.
    subspace: Subspace,
    /// Absolute path to this directory.
    path: Vec<String>,
    /// Layer tag (empty, "partition" or application-defined).
    layer: String,
    /// Layer that holds this directory's node.
    directory_layer: DirectoryLayer,
    kind: DirectoryKind,
}

impl DirectorySubspace {
    pub(super) fn plain(subspace: Subspace, path: Vec<String>, layer: String, directory_layer: DirectoryLayer) -> Self {
        Self {
            subspace,
            path,
            layer,
            directory_layer,
            kind: DirectoryKind::Plain,
        }
    }

    pub(super) fn partition(prefix: Vec<u8>, path: Vec<String>, directory_layer: DirectoryLayer) -> Self {
        let inner = DirectoryLayer::partition(&prefix, path.clone());
        Self {
            subspace: Subspace::from_bytes(prefix),
            path,
            layer: PARTITION_LAYER.to_string(),
            directory_layer,
            kind: DirectoryKind::Partition(Box::new(inner)),
        }
    }

    /// Whether this directory is the root of a partition.
    pub fn is_partition(&self) -> bool {
        matches!(self.kind, DirectoryKind::Partition(_))
    }

    /// The layer holding this directory's node.
    ///
    /// For a partition this is the enclosing layer, not the partition's own.
    pub fn directory_layer(&self) -> &DirectoryLayer {
        &self.directory_layer
    }

    /// Prefix bytes, available for partitions too.
    pub(super) fn raw_prefix(&self) -> &[u8] {
        self.subspace.key()
    }

    fn check_keyspace(&self) -> Result<&Subspace, DirectoryError> {
        match self.kind {
            DirectoryKind::Plain => Ok(&self.subspace),
            DirectoryKind::Partition(_) => Err(DirectoryError::PartitionRootAccess { path: self.path.clone() }),
        }
    }

    /// The raw prefix of this directory.
    pub fn key(&self) -> Result<&[u8], DirectoryError> {
        Ok(self.check_keyspace()?.key())
    }

    /// Pack a key tuple within this directory's subspace.
    pub fn pack(&self, key: &Tuple) -> Result<Vec<u8>, DirectoryError> {
        Ok(self.check_keyspace()?.pack(key))
    }

    /// Unpack a key from this directory's subspace.
    pub fn unpack(&self, key: &[u8]) -> Result<Tuple, DirectoryError> {
        self.check_keyspace()?.unpack(key).context(SubspaceSnafu)
    }

    /// Range of the keys strictly inside `prefix ++ pack(tuple)`.
    pub fn range(&self, tuple: &Tuple) -> Result<(Vec<u8>, Vec<u8>), DirectoryError> {
        Ok(self.check_keyspace()?.range(tuple))
    }

    /// Check if a key belongs to this directory.
    pub fn contains(&self, key: &[u8]) -> Result<bool, DirectoryError> {
        Ok(self.check_keyspace()?.contains(key))
    }

    /// Create a nested subspace within this directory.
    pub fn subspace(&self, suffix: &Tuple) -> Result<Subspace, DirectoryError> {
        Ok(self.check_keyspace()?.subspace(suffix))
    }

    /// Layer that resolves paths below this directory.
    fn contents_layer(&self) -> &DirectoryLayer {
        match &self.kind {
            DirectoryKind::Partition(inner) => inner.as_ref(),
            DirectoryKind::Plain => &self.directory_layer,
        }
    }

    /// Layer that owns the node at `path` below this directory.
    ///
    /// The empty path names a partition's own node, which lives in the
    /// enclosing layer.
    fn layer_for_path(&self, path: &[&str]) -> &DirectoryLayer {
        match &self.kind {
            DirectoryKind::Partition(inner) if !path.is_empty() => inner.as_ref(),
            _ => &self.directory_layer,
        }
    }

    /// `path` made relative to `layer` instead of this directory.
    fn partition_subpath(&self, path: &[&str], layer: &DirectoryLayer) -> Result<Vec<String>, DirectoryError> {
        let mut full = self.path.get(layer.path().len()..).unwrap_or(&[]).to_vec();
        full.extend(to_path(path)?);
        Ok(full)
    }
}

#[async_trait]
impl Directory for DirectorySubspace {
    async fn create_or_open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&str>,
    ) -> Result<DirectorySubspace, DirectoryError> {
        let directory_layer = self.contents_layer();
        let path = self.partition_subpath(path, directory_layer)?;
        directory_layer.create_or_open_internal(tr, &path, layer, None, true, true).await
    }

    async fn open(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&str>,
    ) -> Result<DirectorySubspace, DirectoryError> {
        let directory_layer = self.contents_layer();
        let path = self.partition_subpath(path, directory_layer)?;
        directory_layer.create_or_open_internal(tr, &path, layer, None, false, true).await
    }

    async fn create(
        &self,
        tr: &dyn Transaction,
        path: &[&str],
        layer: Option<&str>,
        prefix: Option<&[u8]>,
    ) -> Result<DirectorySubspace, DirectoryError> {
        let directory_layer = self.contents_layer();
        let path = self.partition_subpath(path, directory_layer)?;
        directory_layer.create_or_open_internal(tr, &path, layer, prefix, true, false).await
    }

    async fn list(&self, tr: &dyn Transaction, path: &[&str]) -> Result<Vec<String>, DirectoryError> {
        let directory_layer = self.contents_layer();
        let path = self.partition_subpath(path, directory_layer)?;
        directory_layer.list_internal(tr, &path).await
    }

    async fn move_to(
        &self,
        tr: &dyn Transaction,
        old_path: &[&str],
        new_path: &[&str],
    ) -> Result<DirectorySubspace, DirectoryError> {
        let directory_layer = self.contents_layer();
        let old_path = self.partition_subpath(old_path, directory_layer)?;
        let new_path = self.partition_subpath(new_path, directory_layer)?;
        directory_layer.move_internal(tr, &old_path, &new_path).await
    }

    async fn move_to_path(
        &self,
        tr: &dyn Transaction,
        new_absolute_path: &[&str],
    ) -> Result<DirectorySubspace, DirectoryError> {
        let directory_layer = self.layer_for_path(&[]);
        let new_absolute_path = to_path(new_absolute_path)?;
        let root = directory_layer.path();

        if !new_absolute_path.starts_with(root) {
            return Err(DirectoryError::CrossPartitionMove {
                old_path: self.path.clone(),
                new_path: new_absolute_path,
            });
        }

        let old_path = self.path.get(root.len()..).unwrap_or(&[]);
        let new_path = new_absolute_path.get(root.len()..).unwrap_or(&[]);
        directory_layer.move_internal(tr, old_path, new_path).await
    }

    async fn remove(&self, tr: &dyn Transaction, path: &[&str]) -> Result<(), DirectoryError> {
        let directory_layer = self.layer_for_path(path);
        let path = self.partition_subpath(path, directory_layer)?;
        directory_layer.remove_internal(tr, &path, true).await.map(|_| ())
    }

    async fn remove_if_exists(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError> {
        let directory_layer = self.layer_for_path(path);
        let path = self.partition_subpath(path, directory_layer)?;
        directory_layer.remove_internal(tr, &path, false).await
    }

    async fn exists(&self, tr: &dyn Transaction, path: &[&str]) -> Result<bool, DirectoryError> {
        let directory_layer = self.layer_for_path(path);
        let path = self.partition_subpath(path, directory_layer)?;
        directory_layer.exists_internal(tr, &path).await
    }

    fn layer(&self) -> &str {
        &self.layer
    }

    fn path(&self) -> &[String] {
        &self.path
    }
}
