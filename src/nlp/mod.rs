//! Text normalization
//!
//! Tokenization, stop-word filtering and term interning.

pub mod stopwords;
pub mod tokenizer;
