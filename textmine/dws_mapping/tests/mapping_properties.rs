//! Property-based tests for the token mapping.
//!
//! Verifies, over arbitrary token sets:
//! 1. Round-trip: every interned token resolves back to itself.
//! 2. Bucket encoding: every assigned id carries its bucket in the low
//!    decimal digits and is at least the bucket count.
//! 3. Idempotence: re-interning returns the same id and never reports a
//!    fresh insertion.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests can panic")]

use dws_mapping::{TokenId, TokenMapping};
use proptest::prelude::*;

/// Tokens as the corpus reader produces them: non-empty, below the length
/// cap, arbitrary printable bytes.
fn token_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[!-~]{1,31}").expect("valid regex")
}

proptest! {
    #[test]
    fn roundtrip_holds_for_every_interned_token(tokens in prop::collection::vec(token_strategy(), 1..200)) {
        let mut mapping = TokenMapping::new();

        let ids: Vec<TokenId> = tokens.iter().map(|t| mapping.intern(t).0).collect();

        for (token, id) in tokens.iter().zip(&ids) {
            prop_assert_eq!(mapping.id_to_token(*id), token.as_str());
            prop_assert_eq!(mapping.token_to_id(token), Some(*id));
        }
    }

    #[test]
    fn ids_encode_their_bucket(tokens in prop::collection::vec(token_strategy(), 1..200)) {
        let mut mapping = TokenMapping::new();

        for token in &tokens {
            let (id, _) = mapping.intern(token);
            let byte_sum: u32 = token.bytes().map(u32::from).sum();

            prop_assert!(!id.is_sentinel());
            prop_assert!(id.raw() >= TokenId::NUM_BUCKETS as u32);
            prop_assert_eq!(
                id.raw() as usize % TokenId::NUM_BUCKETS,
                byte_sum as usize % TokenId::NUM_BUCKETS
            );
        }
    }

    #[test]
    fn reintern_is_idempotent(tokens in prop::collection::vec(token_strategy(), 1..100)) {
        let mut mapping = TokenMapping::new();

        let first_pass: Vec<TokenId> = tokens.iter().map(|t| mapping.intern(t).0).collect();
        let count_after_first = mapping.len();

        for (token, expected) in tokens.iter().zip(&first_pass) {
            let (id, fresh) = mapping.intern(token);
            prop_assert_eq!(id, *expected);
            prop_assert!(!fresh);
        }
        prop_assert_eq!(mapping.len(), count_after_first);
    }

    #[test]
    fn distinct_tokens_get_distinct_ids(tokens in prop::collection::hash_set(token_strategy(), 1..200)) {
        let mut mapping = TokenMapping::new();

        let mut ids: Vec<u32> = tokens.iter().map(|t| mapping.intern(t).0.raw()).collect();
        ids.sort_unstable();
        ids.dedup();

        prop_assert_eq!(ids.len(), tokens.len());
        prop_assert_eq!(mapping.len(), tokens.len());
    }
}
