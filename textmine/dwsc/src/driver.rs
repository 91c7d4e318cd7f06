//! The intersection driver.
//!
//! Execution steps:
//!
//! 1. Populate the token mapping with every token of both corpora, so the
//!    pairwise loop compares integers instead of strings.
//! 2. Map both corpora into document word lists, carrying the offsets.
//! 3. Stream the report: for every sequence of the second corpus, compute
//!    its intersection with every sequence of the first corpus, filter
//!    stop words, classify partial vs. full, and flush one outer JSON
//!    object per second-corpus sequence that had any qualifying match.
//!
//! The reference side of every intersection call is the first-corpus
//! sequence: emitted tokens appear in its order and the reported offsets
//! locate them in the first corpus, which is also the side the inner
//! objects are keyed by.

use std::io::Write;

use dws_corpus::TokenCorpus;
use dws_intersect::{intersect, DocumentWordList, MappedSequence, MappedToken};
use dws_mapping::{TokenId, TokenMapping};
use dws_stopwords::{is_stop_word, Language};
use tracing::{debug, info};

use crate::config::{ExecConfig, RunOptions};
use crate::error::RunError;
use crate::progress::{ProgressMeter, ProgressTick};
use crate::report::{GeneralInfo, InnerMatch, OuterBlock, ReportWriter};

/// What the run found, independent of what the emission gates let into
/// the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntersectionSummary {
    pub partial_sets: u64,
    pub full_sets: u64,
    pub tokens_in_partial_sets: u64,
    pub tokens_in_full_sets: u64,
    /// True when the run was cut short by the abort threshold.
    pub aborted: bool,
}

impl IntersectionSummary {
    pub fn total_sets(&self) -> u64 {
        self.partial_sets + self.full_sets
    }

    pub fn total_tokens(&self) -> u64 {
        self.tokens_in_partial_sets + self.tokens_in_full_sets
    }
}

/// Run the full pipeline and stream the report into `sink`.
///
/// The sink is written exactly once, front to back; on success it holds a
/// complete JSON document, on error its partial content is left as is.
/// The observer, if any, is called from between two intersection calls
/// and cannot influence the computation.
pub fn run_intersection<W: Write>(
    first: &TokenCorpus,
    second: &TokenCorpus,
    options: &RunOptions,
    sink: W,
    mut observer: Option<&mut dyn FnMut(&ProgressTick)>,
) -> Result<IntersectionSummary, RunError> {
    options.validate()?;
    let config = options.config;

    let mut mapping = TokenMapping::new();
    let mut freshly_added = 0usize;
    for corpus in [first, second] {
        for sequence in corpus.sequences() {
            for token in sequence.tokens() {
                if mapping.intern(token).1 {
                    freshly_added += 1;
                }
            }
        }
    }
    debug!(
        unique_tokens = mapping.len(),
        freshly_added,
        max_bucket = mapping.bucket_lens().max().unwrap_or(0),
        "token mapping populated"
    );

    let first_list = build_word_list(first, &mapping);
    let second_list = build_word_list(second, &mapping);

    let general = GeneralInfo {
        first_file: optional(config, ExecConfig::NO_FILENAMES, || first.source().to_owned()),
        second_file: optional(config, ExecConfig::NO_FILENAMES, || second.source().to_owned()),
        creation_time: optional(config, ExecConfig::NO_CREATION_TIME, creation_time),
        program_version: optional(config, ExecConfig::NO_PROGRAM_VERSION, || {
            env!("CARGO_PKG_VERSION").to_owned()
        }),
    };
    let mut writer = ReportWriter::begin(
        sink,
        config,
        &general,
        first.too_long_tokens(),
        second.too_long_tokens(),
    )?;

    let total_calls = second.len() as u64 * first.len() as u64;
    let mut meter = ProgressMeter::new(total_calls);
    let min_left = config.min_tokens_left();
    let mut summary = IntersectionSummary::default();

    let first_slots = &first_list.slots()[..first_list.sealed_count()];
    let second_slots = &second_list.slots()[..second_list.sealed_count()];

    'outer: for b_slot in second_slots {
        let b_ids: Vec<TokenId> = b_slot.ids().collect();
        let mut outer_block: Option<OuterBlock> = None;

        for a_slot in first_slots {
            if let Some(limit) = options.abort_after_percent {
                if meter.percent_done() > limit {
                    info!(percent = limit, "calculation stopped intentionally");
                    summary.aborted = true;
                    break 'outer;
                }
            }

            let mut result = intersect(options.algorithm, a_slot, &b_ids);

            // Remove stop words from the result by overwriting their ids
            // with the sentinel; the entries stay so offsets keep lining
            // up positionally until emission skips the dead ones.
            let mut tokens_left = result.slots()[0].entries.len();
            if config.contains(ExecConfig::STOP_WORD_LIST) {
                for entry in &mut result.slots_mut()[0].entries {
                    if is_stop_word(mapping.id_to_token(entry.id), options.language) {
                        entry.id = TokenId::SENTINEL;
                        tokens_left -= 1;
                    }
                }
            }

            if result.is_nonempty() && tokens_left >= min_left {
                // The outer B arrays are materialized once, at the first
                // qualifying match of this outer iteration.
                let block = outer_block.get_or_insert_with(|| {
                    outer_block_for(b_slot, &mapping, config, options.language)
                });

                let inner = inner_match_for(&result, a_slot, &mapping);
                let token_count = inner.tokens.len() as u64;
                if inner.tokens.len() == block.tokens_without_stop_words.len() {
                    summary.full_sets += 1;
                    summary.tokens_in_full_sets += token_count;
                    if config.contains(ExecConfig::FULL_MATCH) {
                        block.full.push(inner);
                    }
                } else {
                    summary.partial_sets += 1;
                    summary.tokens_in_partial_sets += token_count;
                    if config.contains(ExecConfig::PART_MATCH) {
                        block.partial.push(inner);
                    }
                }
            }

            if let Some(tick) = meter.tick(writer.bytes_written()) {
                if let Some(callback) = observer.as_mut() {
                    callback(&tick);
                }
            }
        }

        if let Some(block) = outer_block {
            if block.has_reportable_data(config) {
                writer.write_outer(&block)?;
            }
        }
    }

    let bytes = writer.finish()?;
    info!(
        partial_sets = summary.partial_sets,
        full_sets = summary.full_sets,
        tokens_in_partial_sets = summary.tokens_in_partial_sets,
        tokens_in_full_sets = summary.tokens_in_full_sets,
        bytes,
        aborted = summary.aborted,
        "intersection run finished"
    );
    Ok(summary)
}

fn optional(
    config: ExecConfig,
    suppress: ExecConfig,
    value: impl FnOnce() -> String,
) -> Option<String> {
    if config.contains(suppress) {
        None
    } else {
        Some(value())
    }
}

fn creation_time() -> String {
    chrono::Local::now().format("%a %b %e %H:%M:%S %Y").to_string()
}

/// Map a corpus into its integer word list.
fn build_word_list(corpus: &TokenCorpus, mapping: &TokenMapping) -> DocumentWordList {
    let mut list = DocumentWordList::new();
    for sequence in corpus.sequences() {
        let mut mapped = MappedSequence::new(&sequence.dataset_id);
        mapped.entries.reserve(sequence.len());
        for entry in &sequence.entries {
            let Some(id) = mapping.token_to_id(&entry.text) else {
                unreachable!("token '{}' was interned during mapping population", entry.text)
            };
            mapped.entries.push(MappedToken::new(
                id,
                entry.char_offset,
                entry.sentence_offset,
                entry.word_offset,
            ));
        }
        list.append_sequence(mapped);
    }
    debug!(
        source = corpus.source(),
        sequences = list.sealed_count(),
        "word list populated"
    );
    list
}

/// Materialize the token arrays of the outer B sequence.
fn outer_block_for(
    b_slot: &MappedSequence,
    mapping: &TokenMapping,
    config: ExecConfig,
    language: Language,
) -> OuterBlock {
    let mut block = OuterBlock {
        dataset_id: b_slot.dataset_id.clone(),
        ..OuterBlock::default()
    };
    let filter_stop_words = config.contains(ExecConfig::STOP_WORD_LIST);
    for entry in &b_slot.entries {
        let token = mapping.id_to_token(entry.id);
        if !filter_stop_words || !is_stop_word(token, language) {
            block.tokens_without_stop_words.push(token.to_owned());
        }
        block.tokens.push(token.to_owned());
    }
    block
}

/// Turn a filtered intersection result into its report form.
fn inner_match_for(
    result: &DocumentWordList,
    a_slot: &MappedSequence,
    mapping: &TokenMapping,
) -> InnerMatch {
    let mut inner = InnerMatch {
        dataset_id: a_slot.dataset_id.clone(),
        ..InnerMatch::default()
    };
    for entry in result.slots()[0].live_entries() {
        inner.tokens.push(mapping.id_to_token(entry.id).to_owned());
        inner.char_offsets.push(entry.char_offset);
        inner.sentence_offsets.push(entry.sentence_offset);
        inner.word_offsets.push(entry.word_offset);
    }
    inner
}
