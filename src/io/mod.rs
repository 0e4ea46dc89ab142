//! File-system boundary
//!
//! Everything that touches the disk lives here; the ranking pipeline only
//! sees [`Document`](crate::types::Document)s and returns rows.

pub mod discover;
pub mod export;
pub mod reader;
