use async_trait::async_trait;

use crate::StoreError;

/// A key-value pair returned by a range read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// The key.
    pub key: Vec<u8>,
    /// The value stored at `key`.
    pub value: Vec<u8>,
}

/// Options for [`Transaction::get_range`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeOptions {
    /// Maximum number of pairs to return. `None` returns the whole range.
    pub limit: Option<usize>,
    /// Return pairs in descending key order, starting from the end of the range.
    pub reverse: bool,
    /// Read without recording a read conflict.
    pub snapshot: bool,
}

impl RangeOptions {
    /// Forward read returning at most `limit` pairs.
    pub fn limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Return pairs in descending key order.
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Skip conflict tracking for this read.
    pub fn snapshot(mut self) -> Self {
        self.snapshot = true;
        self
    }
}

/// One atomic attempt against an ordered transactional key-value store.
///
/// Writes are buffered and become visible to other transactions only on
/// commit; reads within the same transaction observe its own pending writes.
/// Conflicts surface as [`StoreError::Conflict`] either from a read or from
/// the owner's commit, and must be propagated untouched.
#[async_trait]
pub trait Transaction: Send + Sync {
    /// Read a single key.
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Read the keys in `[begin, end)` in key order.
    async fn get_range(&self, begin: &[u8], end: &[u8], options: RangeOptions) -> Result<Vec<KeyValue>, StoreError>;

    /// Set `key` to `value`.
    fn set(&self, key: &[u8], value: &[u8]);

    /// Remove `key`.
    fn clear(&self, key: &[u8]);

    /// Remove every key in `[begin, end)`.
    fn clear_range(&self, begin: &[u8], end: &[u8]);

    /// Add `param` to the value at `key`, both read as little-endian unsigned integers.
    ///
    /// The stored value is truncated or zero-extended to `param.len()` bytes
    /// and overflow wraps. The add is blind: it records no read conflict.
    fn atomic_add(&self, key: &[u8], param: &[u8]);
}

/// Little-endian wrapping addition with the width of `param`.
pub(crate) fn add_little_endian(existing: Option<&[u8]>, param: &[u8]) -> Vec<u8> {
    let existing = existing.unwrap_or(&[]);
    let mut result = Vec::with_capacity(param.len());
    let mut carry = 0u16;

    for (i, &p) in param.iter().enumerate() {
        let e = existing.get(i).copied().unwrap_or(0);
        let sum = u16::from(e) + u16::from(p) + carry;
        result.push(sum as u8);
        carry = sum >> 8;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_to_missing_value() {
        assert_eq!(add_little_endian(None, &1u64.to_le_bytes()), 1u64.to_le_bytes().to_vec());
    }

    #[test]
    fn test_add_carries() {
        let sum = add_little_endian(Some(&255u32.to_le_bytes()), &1u32.to_le_bytes());
        assert_eq!(sum, 256u32.to_le_bytes().to_vec());
    }

    #[test]
    fn test_add_truncates_and_extends() {
        // Existing value wider than the parameter is truncated.
        assert_eq!(add_little_endian(Some(&[1, 2, 3]), &[1]), vec![2]);
        // Shorter existing value is zero-extended.
        assert_eq!(add_little_endian(Some(&[1]), &[1, 1]), vec![2, 1]);
    }

    #[test]
    fn test_add_wraps() {
        assert_eq!(add_little_endian(Some(&[0xFF, 0xFF]), &[1, 0]), vec![0, 0]);
    }

    #[test]
    fn test_range_options_builders() {
        let opts = RangeOptions::limit(1).reversed().snapshot();
        assert_eq!(opts.limit, Some(1));
        assert!(opts.reverse);
        assert!(opts.snapshot);
        assert_eq!(RangeOptions::default().limit, None);
    }
}
