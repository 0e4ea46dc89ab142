//! Graph construction and representation
//!
//! This module provides efficient graph building and storage
//! for the TextRank co-occurrence graph.

pub mod builder;
pub mod csr;
