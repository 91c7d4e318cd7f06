//! Run configuration.
//!
//! The boolean switches form a closed set and travel as one [`ExecConfig`]
//! value; everything non-boolean (algorithm, abort threshold, language)
//! lives in [`RunOptions`]. Both are immutable once the driver starts.

use bitflags::bitflags;
use dws_intersect::Algorithm;
use dws_stopwords::Language;

use crate::error::RunError;

bitflags! {
    /// The boolean switches of a run.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct ExecConfig: u32 {
        /// Emit the "Inters. (partial)" group per outer object.
        const PART_MATCH = 1 << 0;
        /// Emit the "Inters. (full)" group per outer object.
        const FULL_MATCH = 1 << 1;
        /// Filter stop words out of intersection results.
        const STOP_WORD_LIST = 1 << 2;
        /// Emit char offsets in inner objects.
        const CHAR_OFFSET = 1 << 3;
        /// Emit sentence offsets in inner objects.
        const SENTENCE_OFFSET = 1 << 4;
        /// Emit word offsets in inner objects.
        const WORD_OFFSET = 1 << 5;
        /// Compare tokens case-sensitively; when unset, tokens are
        /// ASCII-lowercased at ingest.
        const CASE_SENSITIVE = 1 << 6;

        // Additional settings.

        /// Compact JSON instead of the formatted default.
        const SHORTEN_OUTPUT = 1 << 7;
        /// Suppress the input file names in the general-info block.
        const NO_FILENAMES = 1 << 8;
        /// Suppress the creation time in the general-info block.
        const NO_CREATION_TIME = 1 << 9;
        /// Suppress the program version in the general-info block.
        const NO_PROGRAM_VERSION = 1 << 10;
        /// Keep results that contain a single token.
        const KEEP_SINGLE_TOKEN_RESULTS = 1 << 11;
        /// Emit the "Too long tokens" block.
        const SHOW_TOO_LONG_TOKENS = 1 << 12;
    }
}

impl ExecConfig {
    /// The default switch set: both match kinds, stop-word filtering, char
    /// offsets, case-sensitive comparison.
    pub fn default_settings() -> Self {
        ExecConfig::PART_MATCH
            | ExecConfig::FULL_MATCH
            | ExecConfig::STOP_WORD_LIST
            | ExecConfig::CHAR_OFFSET
            | ExecConfig::CASE_SENSITIVE
    }

    /// How many tokens must survive stop-word filtering for a result to be
    /// reported.
    pub fn min_tokens_left(self) -> usize {
        if self.contains(ExecConfig::KEEP_SINGLE_TOKEN_RESULTS) {
            1
        } else {
            2
        }
    }

    /// Formatted output is the opposite of a shortened one.
    pub fn formatting_enabled(self) -> bool {
        !self.contains(ExecConfig::SHORTEN_OUTPUT)
    }
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self::default_settings()
    }
}

/// Everything a run needs besides the corpora and the sink.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub config: ExecConfig,
    pub algorithm: Algorithm,
    pub language: Language,
    /// Debug knob: stop the pairwise loop once this progress percentage is
    /// exceeded. The truncated report is still valid JSON.
    pub abort_after_percent: Option<f32>,
}

impl RunOptions {
    /// Check for combinations that cannot be executed. Runs before any
    /// I/O; a failure here never leaves a partial output file behind.
    pub fn validate(&self) -> Result<(), RunError> {
        if let Some(percent) = self.abort_after_percent {
            // NaN fails the range check as well.
            if !(0.0..=100.0).contains(&percent) {
                return Err(RunError::Config(format!(
                    "abort threshold must be a percentage between 0 and 100, got {percent}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let config = ExecConfig::default_settings();
        assert!(config.contains(ExecConfig::PART_MATCH));
        assert!(config.contains(ExecConfig::FULL_MATCH));
        assert!(config.contains(ExecConfig::STOP_WORD_LIST));
        assert!(config.contains(ExecConfig::CHAR_OFFSET));
        assert!(config.contains(ExecConfig::CASE_SENSITIVE));
        assert!(!config.contains(ExecConfig::SENTENCE_OFFSET));
        assert!(!config.contains(ExecConfig::WORD_OFFSET));
        assert!(!config.contains(ExecConfig::SHORTEN_OUTPUT));
    }

    #[test]
    fn test_min_tokens_left() {
        assert_eq!(ExecConfig::default_settings().min_tokens_left(), 2);
        assert_eq!(
            (ExecConfig::default_settings() | ExecConfig::KEEP_SINGLE_TOKEN_RESULTS)
                .min_tokens_left(),
            1
        );
    }

    #[test]
    fn test_abort_percent_validation() {
        let mut options = RunOptions::default();
        assert!(options.validate().is_ok());

        options.abort_after_percent = Some(50.0);
        assert!(options.validate().is_ok());

        options.abort_after_percent = Some(-1.0);
        assert!(options.validate().is_err());

        options.abort_after_percent = Some(101.0);
        assert!(options.validate().is_err());

        options.abort_after_percent = Some(f32::NAN);
        assert!(options.validate().is_err());
    }
}
