use std::cmp::Ordering;

use super::TupleError;

// =============================================================================
// Element Type
// =============================================================================

/// A single element within a tuple.
///
/// Elements compare by their packed bytes, so `Null < Bytes < String < Int`
/// and integers compare numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    /// Null value (sorts first).
    Null,

    /// Byte string.
    Bytes(Vec<u8>),

    /// UTF-8 string. Tagged separately from [`Element::Bytes`].
    String(String),

    /// Signed 64-bit integer.
    Int(i64),
}

impl PartialOrd for Element {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Element {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pack().cmp(&other.pack())
    }
}

impl Element {
    /// Pack this element into bytes.
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.pack_into(&mut buf);
        buf
    }

    /// Returns the integer value, if this is an [`Element::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Element::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the raw bytes, if this is an [`Element::Bytes`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Element::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the string, if this is an [`Element::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Element::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<()> for Element {
    fn from(_: ()) -> Self {
        Element::Null
    }
}

impl From<Vec<u8>> for Element {
    fn from(v: Vec<u8>) -> Self {
        Element::Bytes(v)
    }
}

impl From<&[u8]> for Element {
    fn from(v: &[u8]) -> Self {
        Element::Bytes(v.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Element {
    fn from(v: &[u8; N]) -> Self {
        Element::Bytes(v.to_vec())
    }
}

impl From<String> for Element {
    fn from(s: String) -> Self {
        Element::String(s)
    }
}

impl From<&str> for Element {
    fn from(s: &str) -> Self {
        Element::String(s.to_string())
    }
}

impl From<&String> for Element {
    fn from(s: &String) -> Self {
        Element::String(s.clone())
    }
}

impl From<i64> for Element {
    fn from(n: i64) -> Self {
        Element::Int(n)
    }
}

impl From<i32> for Element {
    fn from(n: i32) -> Self {
        Element::Int(i64::from(n))
    }
}

impl From<u32> for Element {
    fn from(n: u32) -> Self {
        Element::Int(i64::from(n))
    }
}

impl From<u8> for Element {
    fn from(n: u8) -> Self {
        Element::Int(i64::from(n))
    }
}

impl TryFrom<u64> for Element {
    type Error = TupleError;

    fn try_from(n: u64) -> Result<Self, Self::Error> {
        i64::try_from(n).map(Element::Int).map_err(|_| TupleError::IntegerOutOfRange {
            reason: format!("{n} exceeds i64::MAX"),
        })
    }
}

impl TryFrom<i128> for Element {
    type Error = TupleError;

    fn try_from(n: i128) -> Result<Self, Self::Error> {
        i64::try_from(n).map(Element::Int).map_err(|_| TupleError::IntegerOutOfRange {
            reason: format!("{n} is outside the signed 64-bit range"),
        })
    }
}
