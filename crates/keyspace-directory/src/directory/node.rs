//! Result of walking a path through the node tree.

use keyspace_tuple::Subspace;

use crate::constants::PARTITION_LAYER;

/// The deepest node reached while resolving a path.
///
/// The walk stops early at a missing child or at a partition, so `path` is
/// either all of `target_path` or a prefix of it.
#[derive(Debug, Clone)]
pub(super) struct Node {
    /// Node subspace of the reached directory, `None` if it does not exist.
    pub(super) subspace: Option<Subspace>,
    /// Path of the reached node, relative to the resolving layer.
    pub(super) path: Vec<String>,
    /// Path that was being resolved.
    pub(super) target_path: Vec<String>,
    /// Layer tag stored with the reached node.
    pub(super) layer: String,
}

impl Node {
    pub(super) fn exists(&self) -> bool {
        self.subspace.is_some()
    }

    /// The partition node the target resolves into, if any.
    ///
    /// With `include_empty`, the partition itself counts as inside it; that is
    /// what listing a partition's children needs.
    pub(super) fn partition_node(&self, include_empty: bool) -> Option<&Subspace> {
        let subspace = self.subspace.as_ref()?;
        let inside = include_empty || self.target_path.len() > self.path.len();
        (self.layer == PARTITION_LAYER && inside).then_some(subspace)
    }

    /// Remainder of the target path below the reached node.
    pub(super) fn partition_subpath(&self) -> Vec<String> {
        self.target_path.get(self.path.len()..).unwrap_or(&[]).to_vec()
    }
}
