//! Report shape on top of the JSON stream.
//!
//! The result file is one JSON object:
//!
//! ```text
//! {
//!     "General infos":   { creation mode, file names, timestamp, version }
//!     "Too long tokens": { one array per input }            -- if configured
//!     "<B dataset id>": {
//!         "tokens":                [...],
//!         "tokens w/o stop words": [...],
//!         "Inters. (partial)":     { "<A dataset id>": { tokens, offsets } }
//!         "Inters. (full)":        { ... }
//!     },
//!     ...
//! }
//! ```
//!
//! Outer objects are buffered per outer iteration and flushed as one
//! chunk; everything above outer level is streamed. The writer owns the
//! root object, so the file is valid JSON whenever [`ReportWriter::finish`]
//! runs, including after an early abort.

use std::io::{self, Write};

use crate::config::ExecConfig;
use crate::json::JsonWriter;

/// The suppressible header fields of the report.
#[derive(Clone, Debug, Default)]
pub struct GeneralInfo {
    pub first_file: Option<String>,
    pub second_file: Option<String>,
    pub creation_time: Option<String>,
    pub program_version: Option<String>,
}

/// One match of an outer iteration: the intersection between the outer B
/// sequence and one A sequence, ready for emission.
///
/// The token/offset arrays are parallel because that is the output shape;
/// they are filled together from one pass over the result slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InnerMatch {
    pub dataset_id: String,
    pub tokens: Vec<String>,
    pub char_offsets: Vec<u16>,
    pub sentence_offsets: Vec<u16>,
    pub word_offsets: Vec<u16>,
}

/// Buffered outer object for one B sequence.
#[derive(Clone, Debug, Default)]
pub struct OuterBlock {
    pub dataset_id: String,
    pub tokens: Vec<String>,
    pub tokens_without_stop_words: Vec<String>,
    pub partial: Vec<InnerMatch>,
    pub full: Vec<InnerMatch>,
}

impl OuterBlock {
    /// Will this block contribute anything to the file under the given
    /// emission gates?
    pub fn has_reportable_data(&self, config: ExecConfig) -> bool {
        (config.contains(ExecConfig::PART_MATCH) && !self.partial.is_empty())
            || (config.contains(ExecConfig::FULL_MATCH) && !self.full.is_empty())
    }
}

/// Streaming writer for the result file.
pub struct ReportWriter<W: Write> {
    json: JsonWriter<W>,
    config: ExecConfig,
}

impl<W: Write> ReportWriter<W> {
    /// Open the root object and emit the preamble blocks.
    pub fn begin(
        sink: W,
        config: ExecConfig,
        general: &GeneralInfo,
        too_long_first: &[String],
        too_long_second: &[String],
    ) -> io::Result<Self> {
        let mut json = JsonWriter::new(sink, config.formatting_enabled());
        json.begin_object()?;

        write_general_infos(&mut json, config, general)?;
        if config.contains(ExecConfig::SHOW_TOO_LONG_TOKENS) {
            write_too_long_tokens(&mut json, too_long_first, too_long_second)?;
        }

        Ok(ReportWriter { json, config })
    }

    /// Emit one buffered outer object.
    pub fn write_outer(&mut self, block: &OuterBlock) -> io::Result<()> {
        let json = &mut self.json;
        json.key(&block.dataset_id)?;
        json.begin_object()?;

        json.key("tokens")?;
        write_string_array(json, &block.tokens)?;
        json.key("tokens w/o stop words")?;
        write_string_array(json, &block.tokens_without_stop_words)?;

        if self.config.contains(ExecConfig::PART_MATCH) {
            json.key("Inters. (partial)")?;
            json.begin_object()?;
            for inner in &block.partial {
                write_inner_match(json, self.config, inner)?;
            }
            json.end_object()?;
        }
        if self.config.contains(ExecConfig::FULL_MATCH) {
            json.key("Inters. (full)")?;
            json.begin_object()?;
            for inner in &block.full {
                write_inner_match(json, self.config, inner)?;
            }
            json.end_object()?;
        }

        json.end_object()
    }

    /// Bytes emitted so far.
    pub fn bytes_written(&self) -> u64 {
        self.json.bytes_written()
    }

    /// Close the root object and flush. Returns the total byte count.
    pub fn finish(mut self) -> io::Result<u64> {
        self.json.end_object()?;
        let (_, bytes) = self.json.finish()?;
        Ok(bytes)
    }
}

fn write_general_infos<W: Write>(
    json: &mut JsonWriter<W>,
    config: ExecConfig,
    general: &GeneralInfo,
) -> io::Result<()> {
    json.key("General infos")?;
    json.begin_object()?;

    json.key("Creation mode")?;
    json.begin_object()?;
    let modes: [(&str, ExecConfig); 7] = [
        ("Part match", ExecConfig::PART_MATCH),
        ("Full match", ExecConfig::FULL_MATCH),
        ("Stop word list used", ExecConfig::STOP_WORD_LIST),
        ("Char offset", ExecConfig::CHAR_OFFSET),
        ("Sentence offset", ExecConfig::SENTENCE_OFFSET),
        ("Word offset", ExecConfig::WORD_OFFSET),
        ("Case sensitive", ExecConfig::CASE_SENSITIVE),
    ];
    for (name, flag) in modes {
        json.key(name)?;
        json.boolean(config.contains(flag))?;
    }
    json.end_object()?;

    let fields = [
        ("First file", &general.first_file),
        ("Second file", &general.second_file),
        ("Creation time", &general.creation_time),
        ("Program version", &general.program_version),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            json.key(name)?;
            json.string(value)?;
        }
    }

    json.end_object()
}

fn write_too_long_tokens<W: Write>(
    json: &mut JsonWriter<W>,
    first: &[String],
    second: &[String],
) -> io::Result<()> {
    json.key("Too long tokens")?;
    json.begin_object()?;
    json.key("First file")?;
    write_string_array(json, first)?;
    json.key("Second file")?;
    write_string_array(json, second)?;
    json.end_object()
}

fn write_inner_match<W: Write>(
    json: &mut JsonWriter<W>,
    config: ExecConfig,
    inner: &InnerMatch,
) -> io::Result<()> {
    json.key(&inner.dataset_id)?;
    json.begin_object()?;

    json.key("tokens")?;
    write_string_array(json, &inner.tokens)?;

    let offset_arrays = [
        ("char offs.", ExecConfig::CHAR_OFFSET, &inner.char_offsets),
        ("sentence offs.", ExecConfig::SENTENCE_OFFSET, &inner.sentence_offsets),
        ("word offs.", ExecConfig::WORD_OFFSET, &inner.word_offsets),
    ];
    for (name, flag, offsets) in offset_arrays {
        if config.contains(flag) {
            json.key(name)?;
            json.begin_array()?;
            for &offset in offsets {
                json.number(u64::from(offset))?;
            }
            json.end_array()?;
        }
    }

    json.end_object()
}

fn write_string_array<W: Write>(json: &mut JsonWriter<W>, items: &[String]) -> io::Result<()> {
    json.begin_array()?;
    for item in items {
        json.string(item)?;
    }
    json.end_array()
}
