use super::BYTES_CODE;
use super::INT_SIZE_LIMITS;
use super::INT_ZERO_CODE;
use super::NULL_CODE;
use super::NULL_ESCAPE;
use super::STRING_CODE;
use super::element::Element;

// =============================================================================
// Encoding Functions
// =============================================================================

impl Element {
    /// Pack this element into an existing buffer.
    pub fn pack_into(&self, buf: &mut Vec<u8>) {
        match self {
            Element::Null => {
                buf.push(NULL_CODE);
            }
            Element::Bytes(bytes) => {
                buf.push(BYTES_CODE);
                encode_bytes_with_null_escaping(bytes, buf);
                buf.push(0x00); // Terminator
            }
            Element::String(s) => {
                buf.push(STRING_CODE);
                encode_bytes_with_null_escaping(s.as_bytes(), buf);
                buf.push(0x00); // Terminator
            }
            Element::Int(n) => {
                encode_int(*n, buf);
            }
        }
    }
}

/// Write bytes with every 0x00 rewritten as 0x00 0xFF.
fn encode_bytes_with_null_escaping(bytes: &[u8], buf: &mut Vec<u8>) {
    for &b in bytes {
        if b == 0x00 {
            buf.push(0x00);
            buf.push(NULL_ESCAPE);
        } else {
            buf.push(b);
        }
    }
}

/// Encode an integer using the variable-length scheme.
///
/// - Zero: 0x14
/// - Positive: 0x14 + size, then big-endian bytes
/// - Negative: 0x14 - size, then one's complement big-endian bytes
fn encode_int(n: i64, buf: &mut Vec<u8>) {
    if n == 0 {
        buf.push(INT_ZERO_CODE);
        return;
    }

    let abs = n.unsigned_abs();
    let size = int_size(abs);

    if n > 0 {
        buf.push(INT_ZERO_CODE + size);
        encode_uint_be(abs, size, buf);
    } else {
        buf.push(INT_ZERO_CODE - size);
        let mask = if size == 8 { u64::MAX } else { (1u64 << (size * 8)) - 1 };
        encode_uint_be(!abs & mask, size, buf);
    }
}

/// Number of bytes needed to hold a magnitude.
fn int_size(n: u64) -> u8 {
    for (i, &limit) in INT_SIZE_LIMITS.iter().enumerate() {
        if n <= limit {
            return (i + 1) as u8;
        }
    }
    8
}

/// Append the low `size` bytes of `n` in big-endian order.
fn encode_uint_be(n: u64, size: u8, buf: &mut Vec<u8>) {
    let bytes = n.to_be_bytes();
    buf.extend_from_slice(&bytes[8 - size as usize..]);
}
