//! Order-preserving tuple encoding.
//!
//! Typed values are packed into byte strings whose lexicographic order matches
//! the order of the values, so composite keys can be range-scanned directly.
//!
//! # Type Codes
//!
//! | Code | Type | Description |
//! |------|------|-------------|
//! | 0x00 | Null | Null/None value |
//! | 0x01 | Bytes | Byte string with null escaping |
//! | 0x02 | String | UTF-8 string with null escaping |
//! | 0x0C-0x13 | NegInt | Negative integers (size = 0x14 - code) |
//! | 0x14 | IntZero | Integer zero |
//! | 0x15-0x1C | PosInt | Positive integers (size = code - 0x14) |
//!
//! # Integer Encoding
//!
//! - Zero: single byte 0x14
//! - Positive: 0x14 + size_in_bytes, then big-endian magnitude
//! - Negative: 0x14 - size_in_bytes, then the one's complement of the magnitude
//!
//! Only values in the signed 64-bit range are representable. The most negative
//! value is the one boundary case whose magnitude needs all eight bytes on the
//! negative side without a positive counterpart.
//!
//! # Example
//!
//! ```
//! use keyspace_tuple::Tuple;
//!
//! let tuple = Tuple::new().push("users").push(42i64).push("profile");
//!
//! let packed = tuple.pack();
//! let unpacked = Tuple::unpack(&packed).unwrap();
//!
//! assert_eq!(tuple, unpacked);
//! ```

mod decoding;
mod element;
mod encoding;
mod tuple_type;

#[cfg(test)]
mod tests;

pub use element::Element;
use snafu::Snafu;
pub use tuple_type::Tuple;
pub use tuple_type::strinc;

// =============================================================================
// Type Codes
// =============================================================================

/// Null value type code.
const NULL_CODE: u8 = 0x00;

/// Byte string type code.
const BYTES_CODE: u8 = 0x01;

/// UTF-8 string type code.
const STRING_CODE: u8 = 0x02;

/// Most negative integer type code (8 magnitude bytes).
const NEG_INT_MIN_CODE: u8 = 0x0C;

/// Integer zero type code (pivot point for integer encoding).
const INT_ZERO_CODE: u8 = 0x14;

/// Most positive integer type code (8 magnitude bytes).
const POS_INT_MAX_CODE: u8 = 0x1C;

/// Escape byte following an embedded 0x00 inside byte and string payloads.
const NULL_ESCAPE: u8 = 0xFF;

/// Upper bound of each integer magnitude size.
/// Index 0 = 1 byte max, Index 7 = 8 bytes max.
const INT_SIZE_LIMITS: [u64; 8] = [
    0xFF,
    0xFFFF,
    0xFF_FFFF,
    0xFFFF_FFFF,
    0xFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF,
    0xFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF_FFFF,
];

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during tuple encoding/decoding.
///
/// All variants indicate malformed input and are never worth retrying.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TupleError {
    /// Unknown type code encountered.
    #[snafu(display("unknown type code 0x{code:02X} at offset {offset}"))]
    UnknownTypeCode {
        /// The unknown type code.
        code: u8,
        /// Byte offset where the error occurred.
        offset: usize,
    },

    /// Input ended before an element was complete.
    ///
    /// Covers byte/string payloads with no terminator as well as integers
    /// whose magnitude bytes are cut short.
    #[snafu(display("truncated element at offset {offset}"))]
    Truncated {
        /// Byte offset of the incomplete element's type code.
        offset: usize,
    },

    /// Integer value does not fit in the signed 64-bit range.
    #[snafu(display("integer out of range: {reason}"))]
    IntegerOutOfRange {
        /// What was out of range.
        reason: String,
    },

    /// Invalid UTF-8 string data.
    #[snafu(display("invalid UTF-8 at offset {offset}: {source}"))]
    InvalidUtf8 {
        /// Byte offset where the error occurred.
        offset: usize,
        /// The underlying UTF-8 error.
        source: std::string::FromUtf8Error,
    },
}
