//! Binary key prefixes with tuple-encoded suffixes.

use snafu::ResultExt;
use snafu::Snafu;

use crate::Element;
use crate::Tuple;
use crate::TupleError;

/// Errors from interpreting a key relative to a [`Subspace`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SubspaceError {
    /// The key does not start with the subspace prefix.
    #[snafu(display("key of {key_len} bytes is outside subspace with {prefix_len}-byte prefix"))]
    KeyOutsideSubspace {
        /// Length of the rejected key.
        key_len: usize,
        /// Length of the subspace prefix.
        prefix_len: usize,
    },

    /// The suffix after the prefix is not a valid tuple encoding.
    #[snafu(display("failed to unpack key suffix: {source}"))]
    Tuple {
        /// The underlying codec error.
        source: TupleError,
    },
}

/// A binary key prefix that scopes tuple-encoded keys beneath it.
///
/// # Example
///
/// ```
/// use keyspace_tuple::{Subspace, Tuple};
///
/// let root = Subspace::from_bytes(vec![0xFE]);
/// let child = root.child("accounts");
///
/// let key = child.pack(&Tuple::new().push(7i64));
/// assert!(root.contains(&key));
/// assert_eq!(child.unpack(&key).unwrap(), Tuple::new().push(7i64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Subspace {
    prefix: Vec<u8>,
}

impl Subspace {
    /// Create a subspace whose prefix is the packed tuple.
    pub fn new(prefix: Tuple) -> Self {
        Self { prefix: prefix.pack() }
    }

    /// Create a subspace from a raw byte prefix.
    pub fn from_bytes(prefix: impl Into<Vec<u8>>) -> Self {
        Self { prefix: prefix.into() }
    }

    /// The raw prefix bytes.
    pub fn key(&self) -> &[u8] {
        &self.prefix
    }

    /// Pack a tuple under this prefix.
    pub fn pack(&self, tuple: &Tuple) -> Vec<u8> {
        let mut key = self.prefix.clone();
        tuple.pack_into(&mut key);
        key
    }

    /// Pack a single element under this prefix.
    pub fn pack_element<E: Into<Element>>(&self, element: E) -> Vec<u8> {
        let mut key = self.prefix.clone();
        element.into().pack_into(&mut key);
        key
    }

    /// Unpack the tuple that follows this prefix in `key`.
    pub fn unpack(&self, key: &[u8]) -> Result<Tuple, SubspaceError> {
        let Some(suffix) = key.strip_prefix(self.prefix.as_slice()) else {
            return Err(SubspaceError::KeyOutsideSubspace {
                key_len: key.len(),
                prefix_len: self.prefix.len(),
            });
        };
        Tuple::unpack(suffix).context(TupleSnafu)
    }

    /// Range of keys strictly inside `prefix ++ pack(tuple)`.
    ///
    /// Same bounds as [`Tuple::range`], shifted under this prefix.
    pub fn range(&self, tuple: &Tuple) -> (Vec<u8>, Vec<u8>) {
        let packed = self.pack(tuple);
        let mut start = packed.clone();
        start.push(0x00);
        let mut end = packed;
        end.push(0xFF);
        (start, end)
    }

    /// Check if a key starts with this prefix.
    pub fn contains(&self, key: &[u8]) -> bool {
        key.starts_with(&self.prefix)
    }

    /// Nested subspace at `prefix ++ pack(suffix)`.
    pub fn subspace(&self, suffix: &Tuple) -> Subspace {
        Subspace { prefix: self.pack(suffix) }
    }

    /// Nested subspace for a single element, `prefix[element]`.
    pub fn child<E: Into<Element>>(&self, element: E) -> Subspace {
        Subspace {
            prefix: self.pack_element(element),
        }
    }
}

impl From<Vec<u8>> for Subspace {
    fn from(prefix: Vec<u8>) -> Self {
        Self { prefix }
    }
}
