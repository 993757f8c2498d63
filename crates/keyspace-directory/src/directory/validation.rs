//! Path validation helper functions for the directory layer.

use super::DirectoryError;
use crate::constants::MAX_DIRECTORY_DEPTH;
use crate::constants::MAX_PATH_COMPONENT_LENGTH_BYTES;

/// Validate a caller-supplied path and convert it to owned components.
///
/// The empty path is accepted here; operations that cannot act on the root
/// reject it themselves.
pub(super) fn to_path(path: &[&str]) -> Result<Vec<String>, DirectoryError> {
    validate_path_components(path)?;
    Ok(path.iter().map(|s| s.to_string()).collect())
}

/// Validate path components.
fn validate_path_components(path: &[&str]) -> Result<(), DirectoryError> {
    // Check depth
    if path.len() as u32 > MAX_DIRECTORY_DEPTH {
        return Err(DirectoryError::PathTooDeep {
            depth: path.len() as u32,
            max: MAX_DIRECTORY_DEPTH,
        });
    }

    for component in path {
        if component.is_empty() {
            return Err(DirectoryError::InvalidPath {
                component: component.to_string(),
                reason: "path component cannot be empty".to_string(),
            });
        }

        if component.len() as u32 > MAX_PATH_COMPONENT_LENGTH_BYTES {
            return Err(DirectoryError::InvalidPath {
                component: component.to_string(),
                reason: format!(
                    "component length {} exceeds maximum {}",
                    component.len(),
                    MAX_PATH_COMPONENT_LENGTH_BYTES
                ),
            });
        }
    }

    Ok(())
}
