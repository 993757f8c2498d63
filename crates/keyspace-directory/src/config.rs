//! Configuration for a [`DirectoryLayer`](crate::DirectoryLayer).
//!
//! Loadable from any serde format; omitted fields take their defaults.

use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_NODE_PREFIX;
use crate::directory::DirectoryError;
use crate::directory::InvalidConfigSnafu;

/// Where a directory layer keeps its metadata and contents.
///
/// # Example JSON
///
/// ```json
/// {
///   "node_prefix": [254],
///   "content_prefix": [],
///   "allow_manual_prefixes": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryLayerConfig {
    /// Prefix of the node subspace holding the directory tree.
    pub node_prefix: Vec<u8>,

    /// Prefix under which directory contents are allocated.
    pub content_prefix: Vec<u8>,

    /// Whether `create` accepts caller-supplied prefixes.
    pub allow_manual_prefixes: bool,
}

impl Default for DirectoryLayerConfig {
    fn default() -> Self {
        Self {
            node_prefix: vec![DEFAULT_NODE_PREFIX],
            content_prefix: Vec::new(),
            allow_manual_prefixes: false,
        }
    }
}

impl DirectoryLayerConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if self.node_prefix.is_empty() {
            return InvalidConfigSnafu {
                reason: "node_prefix must not be empty",
            }
            .fail();
        }

        // Contents allocated under the node subspace would be listed as nodes.
        if !self.content_prefix.is_empty() && self.content_prefix.starts_with(&self.node_prefix) {
            return InvalidConfigSnafu {
                reason: format!(
                    "content_prefix {} lies inside node_prefix {}",
                    hex::encode(&self.content_prefix),
                    hex::encode(&self.node_prefix)
                ),
            }
            .fail();
        }

        Ok(())
    }
}
