//! Token store for the intersection pipeline.
//!
//! Owns the two corpora in their raw form: per sequence a dataset id and
//! the tokens with their char/sentence/word offsets. The rest of the
//! pipeline treats the offsets as opaque payload; their meaning belongs to
//! the tokenizer that produced them.

mod corpus;
mod reader;
mod token;

pub use corpus::{TokenCorpus, TokenSequence};
pub use reader::{parse_corpus, read_corpus, ReadError};
pub use token::{clamp_dataset_id, exceeds_length_cap, TokenEntry, DATASET_ID_LENGTH, MAX_TOKEN_LENGTH};
