//! Property-based tests for the symbol codec.
//!
//! Fixed examples cover the named edge cases; these check the two laws
//! over generated names: `decode(encode(ns, m)) == (ns, m)` for every input
//! encode accepts, and `encode(decode(s)) == s` for every string decode
//! accepts.

use oic_symbol::{decode, encode, SymbolError};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Segments that may appear anywhere: no leading or trailing underscore.
fn inner_segment() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,6}(_[A-Za-z0-9]{1,4}){0,2}"
}

fn namespace() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(inner_segment(), 1..=8)
}

/// Methods may additionally end with a single underscore.
fn method() -> impl Strategy<Value = String> {
    (inner_segment(), any::<bool>()).prop_map(|(s, trailing)| {
        if trailing {
            format!("{s}_")
        } else {
            s
        }
    })
}

// ============================================================================
// Laws
// ============================================================================

proptest! {
    #[test]
    fn decode_inverts_encode(ns in namespace(), m in method()) {
        let symbol = encode(&ns, &m).unwrap();
        let name = decode(symbol.as_str()).unwrap();

        let decoded_ns: Vec<String> = name
            .namespace()
            .segments()
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        prop_assert_eq!(decoded_ns, ns);
        prop_assert_eq!(name.method().as_str(), m.as_str());
    }

    #[test]
    fn encode_inverts_decode(symbol in "[A-Za-z0-9_]{0,24}") {
        if let Ok(name) = decode(&symbol) {
            let encoded = name.encode();
            prop_assert_eq!(encoded.as_str(), symbol.as_str());
        }
    }

    #[test]
    fn encoded_symbols_never_contain_underscore_runs(ns in namespace(), m in method()) {
        let symbol = encode(&ns, &m).unwrap();
        prop_assert!(!symbol.as_str().contains("___"));
        prop_assert_eq!(symbol.as_str().matches("__").count(), ns.len());
    }

    #[test]
    fn segment_with_separator_is_always_rejected(
        prefix in inner_segment(),
        suffix in inner_segment(),
        m in method(),
    ) {
        let poisoned = format!("{prefix}__{suffix}");
        let rejected = matches!(
            encode(&[poisoned.as_str()], &m),
            Err(SymbolError::InvalidSegment { .. })
        );
        prop_assert!(rejected);
    }

    #[test]
    fn dotted_and_flat_forms_agree(ns in namespace(), m in method()) {
        let symbol = encode(&ns, &m).unwrap();
        let dotted = format!("{}.{}", ns.join("."), m);
        prop_assert_eq!(decode(symbol.as_str()).unwrap().dotted(), dotted);
    }
}
