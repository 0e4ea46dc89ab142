//! # hatetracker
//!
//! TextRank keyphrase ranking for hate-speech indexing.
//!
//! Each document is tokenized, turned into a co-occurrence graph over its
//! distinct terms, ranked with PageRank, and the top-ranked terms are merged
//! into phrases. A batch of documents becomes one table of
//! `document, phrase, score, rank` rows.
//!
//! ```rust
//! use hatetracker::{extract_keyphrases, TextRankConfig};
//!
//! let config = TextRankConfig::default().with_remove_stopwords(false);
//! let phrases = extract_keyphrases("cat dog cat bird dog cat", &config).unwrap();
//! assert_eq!(phrases[0].text, "cat");
//! ```

pub mod cli;
pub mod errors;
pub mod graph;
pub mod io;
pub mod nlp;
pub mod pagerank;
pub mod phrase;
pub mod pipeline;
pub mod types;

pub use errors::{DocumentError, DocumentWarning, Result, TextRankError};
pub use pipeline::batch::{BatchReport, Execution, RunSummary};
pub use pipeline::runner::{DocumentRanking, TextRank};
pub use types::{
    CooccurrenceWeighting, Document, Phrase, PhraseAdjacency, PhraseScoring, ResultRow,
    TextRankConfig, Token,
};

/// Rank the phrases of a single text
pub fn extract_keyphrases(text: &str, config: &TextRankConfig) -> Result<Vec<Phrase>> {
    let ranker = TextRank::new(config.clone())?;
    Ok(ranker.rank_text(text))
}
