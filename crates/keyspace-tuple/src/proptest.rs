//! Property-based tests for the tuple encoding layer.
//!
//! 1. **Roundtrip**: unpack(pack(x)) == x for all valid tuples
//! 2. **Ordering**: pack(a) < pack(b) iff a < b
//! 3. **Self-termination**: pack(a) ++ pack(b) unpacks to a ++ b
//! 4. **Containment**: every key packed under a subspace falls inside its range

use proptest::prelude::*;

use crate::Element;
use crate::Subspace;
use crate::Tuple;

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// Strategy for generating arbitrary Element values.
fn arb_element() -> impl Strategy<Value = Element> {
    prop_oneof![
        Just(Element::Null),
        "[a-zA-Z0-9_]{0,20}".prop_map(Element::String),
        // Any unicode, embedded nulls included
        any::<String>().prop_map(Element::String),
        prop::collection::vec(any::<u8>(), 0..50).prop_map(Element::Bytes),
        any::<i64>().prop_map(Element::Int),
        (-1000i64..1000i64).prop_map(Element::Int),
    ]
}

/// Strategy for generating tuples with 0-5 elements.
fn arb_tuple() -> impl Strategy<Value = Tuple> {
    prop::collection::vec(arb_element(), 0..5).prop_map(Tuple::from)
}

/// Strategy for generating byte strings heavy in 0x00 and 0xFF.
fn arb_escape_heavy_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop_oneof![Just(0x00u8), Just(0xFFu8), any::<u8>()], 0..20)
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// Property: pack followed by unpack is identity.
    #[test]
    fn prop_roundtrip(tuple in arb_tuple()) {
        let packed = tuple.pack();
        let unpacked = Tuple::unpack(&packed).expect("unpack should succeed");
        prop_assert_eq!(tuple, unpacked);
    }

    /// Property: integer encoding preserves numeric ordering.
    #[test]
    fn prop_int_ordering(a in any::<i64>(), b in any::<i64>()) {
        let packed_a = Tuple::new().push(a).pack();
        let packed_b = Tuple::new().push(b).pack();
        prop_assert_eq!(a.cmp(&b), packed_a.cmp(&packed_b));
    }

    /// Property: byte string encoding preserves lexicographic ordering.
    #[test]
    fn prop_bytes_ordering(a in arb_escape_heavy_bytes(), b in arb_escape_heavy_bytes()) {
        let packed_a = Tuple::new().push(a.clone()).pack();
        let packed_b = Tuple::new().push(b.clone()).pack();
        prop_assert_eq!(a.cmp(&b), packed_a.cmp(&packed_b));
    }

    /// Property: string encoding preserves byte-wise ordering.
    #[test]
    fn prop_string_ordering(a in any::<String>(), b in any::<String>()) {
        let packed_a = Tuple::new().push(a.as_str()).pack();
        let packed_b = Tuple::new().push(b.as_str()).pack();
        prop_assert_eq!(a.as_bytes().cmp(b.as_bytes()), packed_a.cmp(&packed_b));
    }

    /// Property: element-wise tuple ordering matches packed ordering.
    #[test]
    fn prop_tuple_ordering(
        a in prop::collection::vec(any::<i64>(), 0..4),
        b in prop::collection::vec(any::<i64>(), 0..4),
    ) {
        let tuple_a: Tuple = a.iter().copied().map(Element::Int).collect();
        let tuple_b: Tuple = b.iter().copied().map(Element::Int).collect();
        prop_assert_eq!(a.cmp(&b), tuple_a.pack().cmp(&tuple_b.pack()));
    }

    /// Property: concatenated encodings decode without length information.
    #[test]
    fn prop_self_terminating(a in arb_tuple(), b in arb_tuple()) {
        let mut packed = a.pack();
        b.pack_into(&mut packed);

        let decoded = Tuple::unpack(&packed).expect("unpack should succeed");
        prop_assert_eq!(decoded, a.concat(&b));
    }

    /// Property: packing a longer tuple extends the shorter one's encoding.
    #[test]
    fn prop_prefix_stability(a in arb_tuple(), b in arb_tuple()) {
        let packed_a = a.pack();
        let packed_ab = a.concat(&b).pack();
        prop_assert!(packed_ab.starts_with(&packed_a));
    }

    /// Property: keys packed under a subspace land inside its range.
    #[test]
    fn prop_subspace_containment(
        prefix in prop::collection::vec(any::<u8>(), 0..8),
        head in arb_element(),
        rest in arb_tuple(),
    ) {
        let sub = Subspace::from_bytes(prefix);
        let key = sub.pack(&Tuple::new().push(head).concat(&rest));
        let (start, end) = sub.range(&Tuple::new());

        prop_assert!(sub.contains(&key));
        prop_assert!(start <= key && key < end);
        prop_assert_eq!(sub.unpack(&key).expect("unpack should succeed").len(), rest.len() + 1);
    }
}
