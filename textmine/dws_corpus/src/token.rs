//! Token record types and the length caps of the storage format.

/// Token storage size in bytes; one byte is reserved for a terminator, so
/// the longest storable token is 31 bytes. A token at or above this size
/// is "too long": it is reported at the top of the result file and never
/// enters the mapping or the intersection pipeline.
pub const MAX_TOKEN_LENGTH: usize = 32;

/// Dataset-id storage size in bytes, one reserved for a terminator.
/// Longer ids are truncated, not rejected.
pub const DATASET_ID_LENGTH: usize = 16;

/// Does this token exceed the storable length?
#[inline]
pub fn exceeds_length_cap(token: &str) -> bool {
    token.len() >= MAX_TOKEN_LENGTH
}

/// Truncate a dataset id to its storable prefix, respecting char
/// boundaries.
pub fn clamp_dataset_id(id: &str) -> &str {
    if id.len() < DATASET_ID_LENGTH {
        return id;
    }
    let mut end = DATASET_ID_LENGTH - 1;
    while !id.is_char_boundary(end) {
        end -= 1;
    }
    &id[..end]
}

/// One token occurrence: the text plus the three offsets the upstream
/// tokenizer assigned to it.
///
/// The pipeline never interprets the offsets; they ride along so the
/// report can point back into the source the token came from. One record
/// per occurrence keeps the token and its three offsets from ever
/// disagreeing about their count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenEntry {
    pub text: String,
    pub char_offset: u16,
    pub sentence_offset: u16,
    pub word_offset: u16,
}

impl TokenEntry {
    pub fn new(
        text: impl Into<String>,
        char_offset: u16,
        sentence_offset: u16,
        word_offset: u16,
    ) -> Self {
        TokenEntry {
            text: text.into(),
            char_offset,
            sentence_offset,
            word_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_cap() {
        assert!(!exceeds_length_cap("a"));
        assert!(!exceeds_length_cap(&"x".repeat(31)));
        assert!(exceeds_length_cap(&"x".repeat(32)));
    }

    #[test]
    fn test_dataset_id_clamp() {
        assert_eq!(clamp_dataset_id("name_syn_0_0_0"), "name_syn_0_0_0");
        assert_eq!(clamp_dataset_id("exactly_15_byte"), "exactly_15_byte");
        assert_eq!(clamp_dataset_id("sixteen_bytes_xx"), "sixteen_bytes_x");
        assert_eq!(clamp_dataset_id("a_very_long_dataset_identifier"), "a_very_long_dat");
    }

    #[test]
    fn test_dataset_id_clamp_respects_char_boundaries() {
        // 13 ASCII bytes followed by a 3-byte char: the cut at byte 15
        // would split the char, so the clamp backs up to byte 13.
        let id = "aaaaaaaaaaaaa\u{20AC}\u{20AC}";
        assert_eq!(clamp_dataset_id(id), "aaaaaaaaaaaaa");
    }
}
