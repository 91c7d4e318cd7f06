//! Run-level error taxonomy.
//!
//! Length violations are handled where they occur (the offending token
//! goes to the too-long list); everything below terminates the run.

use std::io;

use thiserror::Error;

/// Fatal error of an intersection run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Invalid flag combination or parameter value. Surfaced before any
    /// I/O happens.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An input corpus could not be read.
    #[error(transparent)]
    Corpus(#[from] dws_corpus::ReadError),

    /// The result file could not be created or written. The file is left
    /// in its partial state.
    #[error("cannot write the result file: {0}")]
    Sink(#[from] io::Error),
}

impl RunError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Config(_) => 2,
            RunError::Corpus(_) | RunError::Sink(_) => 1,
        }
    }
}
