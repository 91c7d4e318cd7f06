//! Intersection engine over mapped word lists.
//!
//! ```text
//! corpus A ──map──► DocumentWordList ─┐
//!                                     ├─ intersect(reference, probe) ──► result slot
//! corpus B ──map──► DocumentWordList ─┘
//! ```
//!
//! The engine works purely on [`dws_mapping::TokenId`] values; turning ids
//! back into tokens is the caller's business.

mod algorithms;
mod word_list;

pub use algorithms::{intersect, Algorithm};
pub use word_list::{DocumentWordList, MappedSequence, MappedToken};
