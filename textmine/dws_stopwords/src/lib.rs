//! Stop-word classification.
//!
//! A stop word is a token too common or too noisy to be interesting in an
//! intersection result. Beyond membership in the per-language list, the
//! predicate treats as stop words:
//!
//! - any single-character token,
//! - any token whose first byte is not an ASCII letter,
//! - anything parseable as a decimal integer or float literal,
//! - Roman numerals written in the uppercase letters I, V, X, L, C, D, M.
//!
//! List membership is case-insensitive; the other rules run before the
//! list lookup, in the order above.

use std::sync::OnceLock;

use rustc_hash::FxHashSet;

mod english;

/// Supported stop-word languages.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    English,
}

fn english_set() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| english::ENGLISH.iter().copied().collect())
}

/// Is the token a stop word in the given language?
pub fn is_stop_word(token: &str, language: Language) -> bool {
    let bytes = token.as_bytes();
    let Some(&first) = bytes.first() else {
        // An empty token carries no information either.
        return true;
    };

    // Tokens that cannot be words: too short, or not starting with a
    // letter.
    if !first.is_ascii_alphabetic() || token.chars().nth(1).is_none() {
        return true;
    }
    // Plain numbers.
    if token.parse::<i64>().is_ok() || token.parse::<f64>().is_ok() {
        return true;
    }
    if is_roman_numeral(token) {
        return true;
    }

    let set = match language {
        Language::English => english_set(),
    };
    let folded = token.to_ascii_lowercase();
    set.contains(folded.as_str())
}

/// Does the token consist solely of uppercase Roman-numeral letters?
fn is_roman_numeral(token: &str) -> bool {
    token
        .bytes()
        .all(|b| matches!(b, b'I' | b'V' | b'X' | b'L' | b'C' | b'D' | b'M'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eng(token: &str) -> bool {
        is_stop_word(token, Language::English)
    }

    #[test]
    fn test_list_words() {
        assert!(eng("the"));
        assert!(eng("and"));
        assert!(eng("because"));
        assert!(!eng("human"));
        assert!(!eng("choriogonadotropin"));
    }

    #[test]
    fn test_list_lookup_is_case_insensitive() {
        assert!(eng("The"));
        assert!(eng("BECAUSE"));
        assert!(eng("tHeIr"));
    }

    #[test]
    fn test_single_char_tokens() {
        assert!(eng("a"));
        assert!(eng("z"));
        assert!(eng("7"));
        assert!(eng(""));
    }

    #[test]
    fn test_non_alphabetic_start() {
        assert!(eng("-dash"));
        assert!(eng("(paren"));
        assert!(eng("3rd"));
        assert!(eng("'quoted"));
        assert!(!eng("dash-inside"));
    }

    #[test]
    fn test_numbers() {
        assert!(eng("42"));
        assert!(eng("-17"));
        assert!(eng("3.14"));
        assert!(eng("1e9"));
    }

    #[test]
    fn test_roman_numerals() {
        assert!(eng("I"));
        assert!(eng("VI"));
        assert!(eng("XIV"));
        assert!(eng("MCMXCIV"));
        // Lowercase forms are not Roman numerals here.
        assert!(!eng("xiv"));
        // Mixed with other letters: a word, not a numeral.
        assert!(!eng("XRAY"));
        assert!(!eng("MIXED"));
        // The check is letter membership, not numeral validity, so an
        // all-numeral-letter word like CIVIL is classified as a numeral.
        assert!(eng("CIVIL"));
    }

    #[test]
    fn test_ordinary_words_pass() {
        assert!(!eng("recombinant"));
        assert!(!eng("hormone"));
        assert!(!eng("Luteinizing"));
    }
}
