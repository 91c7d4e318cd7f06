//! dws - dominating word sets.
//!
//! Computes, for two corpora of tokenized text, the pairwise token-set
//! intersection between every sequence of the first corpus and every
//! sequence of the second, and streams a JSON report grouping the results
//! per second-corpus sequence into partial and full matches.
//!
//! # Pipeline
//!
//! ```text
//! first corpus  ──┐
//!                 ├──► TokenMapping ──► DocumentWordList × 2
//! second corpus ──┘                          │
//!                                            ▼
//!                              N × M intersection loop
//!                                            │
//!                          stop-word filter, classification
//!                                            │
//!                                            ▼
//!                                 streaming JSON report
//! ```
//!
//! The heavy lifting lives in the pipeline crates (`dws_corpus`,
//! `dws_mapping`, `dws_intersect`, `dws_stopwords`); this crate owns the
//! run configuration, the driver loop, the report writer and the CLI.

pub mod config;
pub mod driver;
pub mod error;
pub mod json;
pub mod progress;
pub mod report;
pub mod tracing_setup;

// Re-exports for convenience
pub use config::{ExecConfig, RunOptions};
pub use driver::{run_intersection, IntersectionSummary};
pub use error::RunError;
pub use progress::{ProgressMeter, ProgressTick};
pub use report::{GeneralInfo, InnerMatch, OuterBlock, ReportWriter};
