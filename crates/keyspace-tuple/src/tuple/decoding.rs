use snafu::ResultExt;

use super::BYTES_CODE;
use super::INT_ZERO_CODE;
use super::InvalidUtf8Snafu;
use super::NEG_INT_MIN_CODE;
use super::NULL_CODE;
use super::NULL_ESCAPE;
use super::POS_INT_MAX_CODE;
use super::STRING_CODE;
use super::TupleError;
use super::element::Element;

// =============================================================================
// Decoding Functions
// =============================================================================

/// Decode a single element from bytes at the given offset.
///
/// Returns the decoded element and the number of bytes consumed.
pub(super) fn decode_element(data: &[u8], offset: usize) -> Result<(Element, usize), TupleError> {
    let Some(&code) = data.get(offset) else {
        return Err(TupleError::Truncated { offset });
    };

    match code {
        NULL_CODE => Ok((Element::Null, 1)),

        BYTES_CODE => {
            let (bytes, consumed) = decode_bytes_with_null_escaping(data, offset)?;
            Ok((Element::Bytes(bytes), consumed + 1))
        }

        STRING_CODE => {
            let (bytes, consumed) = decode_bytes_with_null_escaping(data, offset)?;
            let s = String::from_utf8(bytes).context(InvalidUtf8Snafu { offset })?;
            Ok((Element::String(s), consumed + 1))
        }

        NEG_INT_MIN_CODE..=POS_INT_MAX_CODE => {
            let (n, consumed) = decode_int(data, offset)?;
            Ok((Element::Int(n), consumed))
        }

        _ => Err(TupleError::UnknownTypeCode { code, offset }),
    }
}

/// Decode an escaped payload whose type code sits at `offset`.
///
/// A 0x00 followed by 0xFF is a literal null; any other 0x00 terminates.
/// Returns the payload and the bytes consumed after the type code
/// (including the terminator).
fn decode_bytes_with_null_escaping(data: &[u8], offset: usize) -> Result<(Vec<u8>, usize), TupleError> {
    let start = offset + 1;
    let mut result = Vec::new();
    let mut i = start;

    while i < data.len() {
        let b = data[i];

        if b == 0x00 {
            if data.get(i + 1) == Some(&NULL_ESCAPE) {
                result.push(0x00);
                i += 2;
            } else {
                return Ok((result, i - start + 1));
            }
        } else {
            result.push(b);
            i += 1;
        }
    }

    Err(TupleError::Truncated { offset })
}

/// Decode an integer whose type code sits at `offset`.
fn decode_int(data: &[u8], offset: usize) -> Result<(i64, usize), TupleError> {
    let code = data[offset];

    if code == INT_ZERO_CODE {
        return Ok((0, 1));
    }

    let positive = code > INT_ZERO_CODE;
    let size = if positive {
        (code - INT_ZERO_CODE) as usize
    } else {
        (INT_ZERO_CODE - code) as usize
    };

    let Some(magnitude) = data.get(offset + 1..offset + 1 + size) else {
        return Err(TupleError::Truncated { offset });
    };
    let raw = decode_uint_be(magnitude);

    if positive {
        let n = i64::try_from(raw).map_err(|_| TupleError::IntegerOutOfRange {
            reason: format!("positive magnitude 0x{raw:016X} at offset {offset} exceeds i64::MAX"),
        })?;
        return Ok((n, 1 + size));
    }

    let mask = if size == 8 { u64::MAX } else { (1u64 << (size * 8)) - 1 };
    let abs = !raw & mask;

    // i64::MIN is the only magnitude above i64::MAX that is representable.
    let n = match abs {
        a if a <= i64::MAX as u64 => -(a as i64),
        a if a == i64::MIN.unsigned_abs() => i64::MIN,
        a => {
            return Err(TupleError::IntegerOutOfRange {
                reason: format!("negative magnitude 0x{a:016X} at offset {offset} exceeds i64::MIN"),
            });
        }
    };

    Ok((n, 1 + size))
}

/// Decode an unsigned integer from big-endian bytes.
fn decode_uint_be(data: &[u8]) -> u64 {
    data.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}
