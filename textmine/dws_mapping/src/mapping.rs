//! Bucketed string-to-id dictionary.
//!
//! Maps every unique token to a [`TokenId`] so the intersection engine can
//! compare integers instead of strings. Tokens are distributed over
//! [`TokenId::NUM_BUCKETS`] buckets by a byte-sum hash; the assigned id
//! encodes the bucket, so the reverse mapping jumps straight to the right
//! bucket without searching the whole dictionary.

use crate::TokenId;

/// One partition of the mapping.
///
/// Invariant: the token at position `i` was assigned ordinal `i + 1`, so
/// its id is `TokenId::new(bucket, i as u32 + 1)`. Entries are never
/// removed, which keeps the ordinal a plain function of the position and
/// makes id-to-token lookup a direct index.
struct Bucket {
    tokens: Vec<Box<str>>,
    /// Ordinal handed to the next freshly added token. Monotonic; starts
    /// at 1 so no assigned id collides with a bare bucket index.
    next_ordinal: u32,
}

impl Bucket {
    fn new() -> Self {
        Bucket {
            tokens: Vec::new(),
            next_ordinal: 1,
        }
    }
}

/// Compute the bucket for a token: the byte values summed, modulo the
/// bucket count.
///
/// A deliberately simple hash. It only has to spread tokens over the
/// buckets well enough that the per-bucket linear scans stay short; the
/// performance bar of the pipeline is set by the intersection engine.
#[inline]
fn bucket_for(token: &str) -> usize {
    let mut sum = 0u32;
    for byte in token.bytes() {
        sum = sum.wrapping_add(u32::from(byte));
    }
    (sum as usize) % TokenId::NUM_BUCKETS
}

/// Bucketed string-to-id dictionary.
///
/// Built once over both corpora, then read-only for the rest of the run.
///
/// # Example
///
/// ```
/// use dws_mapping::TokenMapping;
///
/// let mut mapping = TokenMapping::new();
/// let (id, fresh) = mapping.intern("human");
/// assert!(fresh);
/// assert_eq!(mapping.intern("human"), (id, false));
/// assert_eq!(mapping.token_to_id("human"), Some(id));
/// assert_eq!(mapping.id_to_token(id), "human");
/// ```
pub struct TokenMapping {
    buckets: [Bucket; TokenId::NUM_BUCKETS],
    /// Total number of interned tokens across all buckets (O(1) `len()`).
    total_count: usize,
}

impl TokenMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        TokenMapping {
            buckets: std::array::from_fn(|_| Bucket::new()),
            total_count: 0,
        }
    }

    /// Intern a token, returning its id and whether it was freshly added.
    ///
    /// Idempotent: repeated calls with the same token return the same id
    /// with `false`. Within one bucket, ids are assigned in order of first
    /// appearance. Callers are expected to have rejected over-long tokens
    /// already; the mapping itself accepts any non-empty string.
    pub fn intern(&mut self, token: &str) -> (TokenId, bool) {
        debug_assert!(!token.is_empty(), "cannot intern an empty token");

        let bucket_idx = bucket_for(token);
        let bucket = &mut self.buckets[bucket_idx];

        if let Some(id) = Self::scan_bucket(bucket, bucket_idx, token) {
            return (id, false);
        }

        let id = TokenId::new(bucket_idx as u32, bucket.next_ordinal);
        bucket.next_ordinal += 1;
        bucket.tokens.push(token.into());
        self.total_count += 1;
        (id, true)
    }

    /// Look up the id for a token. Never allocates.
    pub fn token_to_id(&self, token: &str) -> Option<TokenId> {
        debug_assert!(!token.is_empty(), "cannot look up an empty token");
        let bucket_idx = bucket_for(token);
        Self::scan_bucket(&self.buckets[bucket_idx], bucket_idx, token)
    }

    /// Linear scan of one bucket. The first-byte comparison short-circuits
    /// the full string compare in the common mismatch case.
    fn scan_bucket(bucket: &Bucket, bucket_idx: usize, token: &str) -> Option<TokenId> {
        let first = token.as_bytes()[0];
        for (i, existing) in bucket.tokens.iter().enumerate() {
            if existing.as_bytes()[0] == first && existing.as_ref() == token {
                return Some(TokenId::new(bucket_idx as u32, i as u32 + 1));
            }
        }
        None
    }

    /// Reverse the mapping: id back to the token string.
    ///
    /// The bucket is read off the id, so only one bucket is touched.
    ///
    /// # Panics
    ///
    /// Panics if `id` is the sentinel or was never assigned by this
    /// mapping. Both indicate a bug in the caller, not bad input.
    pub fn id_to_token(&self, id: TokenId) -> &str {
        assert!(
            !id.is_sentinel(),
            "the sentinel id marks filtered-out entries and names no token"
        );
        let bucket = &self.buckets[id.bucket()];
        let ordinal = id.ordinal() as usize;
        assert!(
            ordinal >= 1 && ordinal <= bucket.tokens.len(),
            "token id {id:?} was never assigned by this mapping"
        );
        &bucket.tokens[ordinal - 1]
    }

    /// Number of interned tokens.
    pub fn len(&self) -> usize {
        self.total_count
    }

    /// Is the mapping empty?
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Per-bucket fill counts, for logging how well the hash spreads the
    /// corpus.
    pub fn bucket_lens(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(|b| b.tokens.len())
    }
}

impl Default for TokenMapping {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_lookup() {
        let mut mapping = TokenMapping::new();

        let (human, fresh) = mapping.intern("human");
        assert!(fresh);
        let (chorio, _) = mapping.intern("choriogonadotropin");
        assert_ne!(human, chorio);

        assert_eq!(mapping.id_to_token(human), "human");
        assert_eq!(mapping.id_to_token(chorio), "choriogonadotropin");
        assert_eq!(mapping.token_to_id("human"), Some(human));
        assert_eq!(mapping.token_to_id("missing"), None);
    }

    #[test]
    fn test_intern_is_idempotent() {
        let mut mapping = TokenMapping::new();

        let (first, fresh_first) = mapping.intern("receptor");
        let (second, fresh_second) = mapping.intern("receptor");

        assert_eq!(first, second);
        assert!(fresh_first);
        assert!(!fresh_second);
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_id_encodes_bucket() {
        let mut mapping = TokenMapping::new();

        for token in ["a", "ab", "abc", "zz", "protein", "cell"] {
            let (id, _) = mapping.intern(token);
            let byte_sum: u32 = token.bytes().map(u32::from).sum();
            assert_eq!(
                id.raw() as usize % TokenId::NUM_BUCKETS,
                byte_sum as usize % TokenId::NUM_BUCKETS
            );
            assert!(id.raw() >= TokenId::NUM_BUCKETS as u32);
        }
    }

    #[test]
    fn test_ids_monotonic_within_bucket() {
        let mut mapping = TokenMapping::new();

        // "ad" and "bc" share a byte sum, so they land in the same bucket.
        let (first, _) = mapping.intern("ad");
        let (second, _) = mapping.intern("bc");

        assert_eq!(first.bucket(), second.bucket());
        assert_eq!(first.ordinal() + 1, second.ordinal());
        assert_eq!(second.raw(), first.raw() + TokenId::NUM_BUCKETS as u32);
    }

    #[test]
    fn test_collisions_stay_distinct() {
        let mut mapping = TokenMapping::new();

        // All four strings collide in one bucket; ids must still be unique
        // and each must round-trip to its own string.
        let colliding = ["ad", "bc", "cb", "da"];
        let ids: Vec<_> = colliding.iter().map(|t| mapping.intern(t).0).collect();

        for (token, id) in colliding.iter().zip(&ids) {
            assert_eq!(mapping.id_to_token(*id), *token);
        }
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    #[should_panic(expected = "never assigned")]
    fn test_unassigned_id_panics() {
        let mapping = TokenMapping::new();
        let _ = mapping.id_to_token(TokenId::new(5, 1));
    }

    #[test]
    #[should_panic(expected = "sentinel")]
    fn test_sentinel_lookup_panics() {
        let mapping = TokenMapping::new();
        let _ = mapping.id_to_token(TokenId::SENTINEL);
    }
}
