//! Token-to-integer mapping for the intersection pipeline.
//!
//! The mapping is not required for correctness of the intersection; it is
//! the representation change that makes the hot loop compare `u32` ids
//! instead of strings. After the intersection the mapping is inverted again
//! to recover the original tokens for the report.
//!
//! ```text
//! corpus tokens ──intern──► TokenId ──intersect──► TokenId ──id_to_token──► report
//! ```

mod mapping;
mod token_id;

pub use mapping::TokenMapping;
pub use token_id::TokenId;
