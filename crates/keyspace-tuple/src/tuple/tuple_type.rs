use std::cmp::Ordering;

use super::TupleError;
use super::decoding::decode_element;
use super::element::Element;

// =============================================================================
// Tuple Type
// =============================================================================

/// An ordered collection of typed elements that can be packed into bytes.
///
/// When packed, tuples produce bytes that sort lexicographically in the same
/// order as the tuples themselves. Encodings are self-terminating, so two
/// packed tuples concatenated unpack as their concatenation.
///
/// # Example
///
/// ```
/// use keyspace_tuple::Tuple;
///
/// let t1 = Tuple::new().push("users").push(1i64);
/// let t2 = Tuple::new().push("users").push(2i64);
///
/// assert!(t1.pack() < t2.pack());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Tuple {
    pub(crate) elements: Vec<Element>,
}

impl Tuple {
    /// Create a new empty tuple.
    pub fn new() -> Self {
        Self { elements: Vec::new() }
    }

    /// Create a tuple with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    /// Push an element onto the tuple (builder pattern).
    pub fn push<E: Into<Element>>(mut self, element: E) -> Self {
        self.elements.push(element.into());
        self
    }

    /// Push an element onto the tuple (mutating).
    pub fn push_mut<E: Into<Element>>(&mut self, element: E) {
        self.elements.push(element.into());
    }

    /// Push a value whose conversion can fail, such as a `u64` above `i64::MAX`.
    pub fn try_push<E>(mut self, element: E) -> Result<Self, TupleError>
    where E: TryInto<Element, Error = TupleError> {
        self.elements.push(element.try_into()?);
        Ok(self)
    }

    /// Append all elements of `other` after this tuple's elements.
    pub fn concat(mut self, other: &Tuple) -> Self {
        self.elements.extend(other.elements.iter().cloned());
        self
    }

    /// Get the number of elements in the tuple.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the tuple is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get an element by index.
    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Get an iterator over the elements.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Consume the tuple, returning its elements.
    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    /// Pack the tuple into bytes.
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.elements.len() * 8);
        self.pack_into(&mut buf);
        buf
    }

    /// Pack the tuple into an existing buffer.
    pub fn pack_into(&self, buf: &mut Vec<u8>) {
        for elem in &self.elements {
            elem.pack_into(buf);
        }
    }

    /// Unpack a tuple from bytes, consuming the whole input.
    pub fn unpack(data: &[u8]) -> Result<Self, TupleError> {
        let mut tuple = Tuple::new();
        let mut offset = 0;

        while offset < data.len() {
            let (elem, consumed) = decode_element(data, offset)?;
            tuple.elements.push(elem);
            offset += consumed;
        }

        Ok(tuple)
    }

    /// Get the range of keys strictly inside this tuple's prefix.
    ///
    /// Returns `(packed ++ 0x00, packed ++ 0xFF)`. Every key whose tuple
    /// encoding extends this tuple by at least one element falls in the range;
    /// the packed tuple itself does not.
    ///
    /// # Example
    ///
    /// ```
    /// use keyspace_tuple::Tuple;
    ///
    /// let prefix = Tuple::new().push("users");
    /// let (start, end) = prefix.range();
    /// let key = prefix.clone().push(7i64).pack();
    ///
    /// assert!(start <= key && key < end);
    /// ```
    pub fn range(&self) -> (Vec<u8>, Vec<u8>) {
        let packed = self.pack();
        let mut start = packed.clone();
        start.push(0x00);
        let mut end = packed;
        end.push(0xFF);
        (start, end)
    }
}

impl PartialOrd for Tuple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tuple {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pack().cmp(&other.pack())
    }
}

impl From<Vec<Element>> for Tuple {
    fn from(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

impl FromIterator<Element> for Tuple {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Tuple {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tuple {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// First key that sorts after every key starting with `prefix`.
///
/// Trailing 0xFF bytes are dropped and the last remaining byte incremented.
/// Returns `None` when `prefix` is empty or consists only of 0xFF bytes.
///
/// ```
/// use keyspace_tuple::strinc;
///
/// assert_eq!(strinc(b"ab"), Some(b"ac".to_vec()));
/// assert_eq!(strinc(&[0x01, 0xFF]), Some(vec![0x02]));
/// assert_eq!(strinc(&[0xFF]), None);
/// ```
pub fn strinc(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut data = prefix.to_vec();
    while let Some(&last) = data.last() {
        if last < 0xFF {
            let len = data.len();
            data[len - 1] = last + 1;
            return Some(data);
        }
        data.pop();
    }
    None
}
