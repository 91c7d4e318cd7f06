//! Reader for the preprocessed corpus listing format.
//!
//! The pipeline consumes corpora by value; this module is the shipped
//! upstream side. It understands the flat listing that the preprocessing
//! script produces from the source JSON:
//!
//! ```text
//! name_syn_0_0_0
//! ['Re-combinant', 'human', 'choriogonadotropin']
//!
//! 16427787
//! [recombinant, human]
//! [luteinizing, hormone]
//! ```
//!
//! A line not starting with `[` opens a record and names its dataset id;
//! every following bracket line contributes tokens to that record; a blank
//! line closes it. Because this reader *is* the tokenizer for the format,
//! it also assigns the offsets: char offset is the byte position of the
//! token inside its line, sentence offset is the index of the bracket line
//! within the record, word offset is the running token index within the
//! record. Offsets saturate at `u16::MAX`.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::corpus::{TokenCorpus, TokenSequence};
use crate::token::{clamp_dataset_id, exceeds_length_cap, TokenEntry};

/// Error while loading a corpus from disk. Fatal for the run.
#[derive(Debug)]
pub enum ReadError {
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Io { path, source } => {
                write!(f, "cannot read corpus file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io { source, .. } => Some(source),
        }
    }
}

/// Read and tokenize one corpus file.
///
/// With `case_sensitive` unset, tokens are ASCII-lowercased on ingest so
/// that mapping, intersection and report all see the folded form.
pub fn read_corpus(path: &Path, case_sensitive: bool) -> Result<TokenCorpus, ReadError> {
    let content = fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let corpus = parse_corpus(&path.display().to_string(), &content, case_sensitive);
    debug!(
        source = corpus.source(),
        sequences = corpus.len(),
        tokens = corpus.total_tokens(),
        too_long = corpus.too_long_tokens().len(),
        "corpus loaded"
    );
    Ok(corpus)
}

/// Tokenize a corpus from an in-memory listing.
pub fn parse_corpus(source: &str, input: &str, case_sensitive: bool) -> TokenCorpus {
    let mut corpus = TokenCorpus::new(source);
    let mut current: Option<RecordState> = None;

    for line in input.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            if let Some(state) = current.take() {
                corpus.push(state.sequence);
            }
            continue;
        }

        if line.trim_start().starts_with('[') {
            match current.as_mut() {
                Some(state) => parse_token_line(line, state, case_sensitive, &mut corpus),
                None => warn!(source, "token list line without a dataset id, skipped"),
            }
        } else {
            // A new id line also closes an unterminated previous record.
            if let Some(state) = current.take() {
                corpus.push(state.sequence);
            }
            let id = clamp_dataset_id(line.trim());
            current = Some(RecordState::new(id));
        }
    }
    if let Some(state) = current.take() {
        corpus.push(state.sequence);
    }

    corpus
}

struct RecordState {
    sequence: TokenSequence,
    sentence: u16,
    word: u16,
}

impl RecordState {
    fn new(dataset_id: &str) -> Self {
        RecordState {
            sequence: TokenSequence::new(dataset_id),
            sentence: 0,
            word: 0,
        }
    }
}

/// Extract the tokens of one bracket line into the open record.
fn parse_token_line(
    line: &str,
    state: &mut RecordState,
    case_sensitive: bool,
    corpus: &mut TokenCorpus,
) {
    // The caller guarantees a bracket exists on this line.
    let open = match line.find('[') {
        Some(pos) => pos,
        None => return,
    };
    let body_end = line.rfind(']').unwrap_or(line.len());

    let mut seg_start = open + 1;
    while seg_start <= body_end {
        let rest = &line[seg_start..body_end];
        let seg_len = rest.find(',').unwrap_or(rest.len());
        let raw = &rest[..seg_len];

        let leading_ws = raw.len() - raw.trim_start().len();
        let mut token = raw.trim();
        let mut token_start = seg_start + leading_ws;
        if token.len() >= 2 {
            let bytes = token.as_bytes();
            let quoted = (bytes[0] == b'\'' && bytes[token.len() - 1] == b'\'')
                || (bytes[0] == b'"' && bytes[token.len() - 1] == b'"');
            if quoted {
                token = &token[1..token.len() - 1];
                token_start += 1;
            }
        }

        if !token.is_empty() {
            if exceeds_length_cap(token) {
                corpus.record_too_long(token);
            } else {
                let text = if case_sensitive {
                    token.to_owned()
                } else {
                    token.to_ascii_lowercase()
                };
                state.sequence.entries.push(TokenEntry {
                    text,
                    char_offset: saturate(token_start),
                    sentence_offset: state.sentence,
                    word_offset: state.word,
                });
                state.word = state.word.saturating_add(1);
            }
        }

        seg_start += seg_len + 1;
    }

    state.sentence = state.sentence.saturating_add(1);
}

#[inline]
fn saturate(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_records() {
        let input = "\
name_syn_0_0_0
['Re-combinant', 'human', 'choriogonadotropin']

16427787
[recombinant, human]
";
        let corpus = parse_corpus("test", input, true);

        assert_eq!(corpus.len(), 2);
        let first = &corpus.sequences()[0];
        assert_eq!(first.dataset_id, "name_syn_0_0_0");
        let tokens: Vec<_> = first.tokens().collect();
        assert_eq!(tokens, ["Re-combinant", "human", "choriogonadotropin"]);

        let second = &corpus.sequences()[1];
        assert_eq!(second.dataset_id, "16427787");
        let tokens: Vec<_> = second.tokens().collect();
        assert_eq!(tokens, ["recombinant", "human"]);
    }

    #[test]
    fn test_char_offsets_point_into_the_line() {
        let line = "[alpha, 'beta']";
        let input = format!("doc\n{line}\n");
        let corpus = parse_corpus("test", &input, true);

        let entries = &corpus.sequences()[0].entries;
        assert_eq!(entries[0].char_offset, 1);
        assert_eq!(&line[1..6], "alpha");
        assert_eq!(entries[1].char_offset, 9);
        assert_eq!(&line[9..13], "beta");
    }

    #[test]
    fn test_sentence_and_word_offsets() {
        let input = "\
doc
[one, two]
[three]
";
        let corpus = parse_corpus("test", input, true);

        let entries = &corpus.sequences()[0].entries;
        let offsets: Vec<_> = entries
            .iter()
            .map(|e| (e.sentence_offset, e.word_offset))
            .collect();
        assert_eq!(offsets, [(0, 0), (0, 1), (1, 2)]);
    }

    #[test]
    fn test_too_long_token_diverted() {
        let long = "x".repeat(40);
        let input = format!("doc\n[short, {long}]\n");
        let corpus = parse_corpus("test", &input, true);

        let tokens: Vec<_> = corpus.sequences()[0].tokens().collect();
        assert_eq!(tokens, ["short"]);
        assert_eq!(corpus.too_long_tokens(), [long]);
    }

    #[test]
    fn test_case_folding() {
        let input = "doc\n[Human, CHORIOGONADOTROPIN]\n";

        let sensitive = parse_corpus("test", input, true);
        let tokens: Vec<_> = sensitive.sequences()[0].tokens().collect();
        assert_eq!(tokens, ["Human", "CHORIOGONADOTROPIN"]);

        let folded = parse_corpus("test", input, false);
        let tokens: Vec<_> = folded.sequences()[0].tokens().collect();
        assert_eq!(tokens, ["human", "choriogonadotropin"]);
    }

    #[test]
    fn test_dataset_id_is_clamped() {
        let input = "a_very_long_dataset_identifier\n[token]\n";
        let corpus = parse_corpus("test", input, true);
        assert_eq!(corpus.sequences()[0].dataset_id, "a_very_long_dat");
    }

    #[test]
    fn test_orphan_bracket_line_is_skipped() {
        let input = "[stray, tokens]\n\ndoc\n[kept]\n";
        let corpus = parse_corpus("test", input, true);

        assert_eq!(corpus.len(), 1);
        let tokens: Vec<_> = corpus.sequences()[0].tokens().collect();
        assert_eq!(tokens, ["kept"]);
    }

    #[test]
    fn test_record_without_blank_line_flushed_at_eof() {
        let input = "doc\n[one]";
        let corpus = parse_corpus("test", input, true);
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.sequences()[0].len(), 1);
    }

    #[test]
    fn test_record_with_no_tokens_is_kept_empty() {
        let input = "doc\n\nother\n[a]\n";
        let corpus = parse_corpus("test", input, true);

        assert_eq!(corpus.len(), 2);
        assert!(corpus.sequences()[0].is_empty());
        assert_eq!(corpus.sequences()[1].len(), 1);
    }
}
