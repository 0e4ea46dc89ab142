//! Phrase extraction
//!
//! Merges adjacent keywords into scored candidate phrases.

pub mod extraction;
