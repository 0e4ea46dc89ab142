//! Pipeline runner: ranks one document end to end.
//!
//! [`TextRank`] owns a validated configuration and a tokenizer. Calling
//! [`TextRank::rank_document`] runs the stages in order, each inside its own
//! tracing span:
//!
//! 1. Tokenize (normalize, drop stop-words, intern terms)
//! 2. Build the co-occurrence graph
//! 3. Rank nodes with PageRank
//! 4. Extract phrases
//!
//! No state survives between documents, so one `TextRank` can be shared by
//! reference across threads.

use tracing::{debug, warn};

use crate::errors::{DocumentWarning, Result};
use crate::graph::builder::GraphBuilder;
use crate::graph::csr::CsrGraph;
use crate::nlp::stopwords::StopwordFilter;
use crate::nlp::tokenizer::Tokenizer;
use crate::pagerank::standard::StandardPageRank;
use crate::phrase::extraction::PhraseExtractor;
use crate::types::{Document, Phrase, ResultRow, TextRankConfig};

/// Enter a tracing span for a pipeline stage.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::debug_span!("pipeline_stage", stage = $name).entered();
    };
}

pub const STAGE_TOKENIZE: &str = "tokenize";
pub const STAGE_GRAPH: &str = "graph";
pub const STAGE_RANK: &str = "rank";
pub const STAGE_PHRASES: &str = "phrases";

/// Ranking of a single document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRanking {
    /// Document identifier
    pub document: String,
    /// Phrases, highest score first
    pub phrases: Vec<Phrase>,
    /// Tokens that survived normalization
    pub num_tokens: usize,
    pub num_nodes: usize,
    pub num_edges: usize,
    /// Ranker iterations performed
    pub iterations: usize,
    /// Whether the ranker converged before its iteration cap
    pub converged: bool,
    /// Largest per-node change in the last ranker iteration
    pub delta: f64,
}

impl DocumentRanking {
    /// Result rows with ranks 1..=K
    pub fn rows(&self) -> Vec<ResultRow> {
        self.phrases
            .iter()
            .enumerate()
            .map(|(i, phrase)| ResultRow {
                document: self.document.clone(),
                phrase: phrase.text.clone(),
                score: phrase.score,
                rank: i + 1,
            })
            .collect()
    }

    /// Whether no tokens survived normalization
    pub fn is_empty(&self) -> bool {
        self.num_tokens == 0
    }

    /// Non-fatal condition raised while ranking, if any
    pub fn warning(&self) -> Option<DocumentWarning> {
        if self.is_empty() {
            Some(DocumentWarning::Empty {
                document: self.document.clone(),
            })
        } else if !self.converged {
            Some(DocumentWarning::NotConverged {
                document: self.document.clone(),
                iterations: self.iterations,
                delta: self.delta,
            })
        } else {
            None
        }
    }
}

/// TextRank keyphrase ranker
#[derive(Debug, Clone)]
pub struct TextRank {
    config: TextRankConfig,
    tokenizer: Tokenizer,
    ranker: StandardPageRank,
    extractor: PhraseExtractor,
}

impl TextRank {
    /// Build a ranker, using the built-in stop-word list for
    /// `config.language` when `config.remove_stopwords` is set
    ///
    /// Fails with `TextRankError::InvalidConfiguration` before any document
    /// is touched.
    pub fn new(config: TextRankConfig) -> Result<Self> {
        let stopwords = if config.remove_stopwords {
            StopwordFilter::new(&config.language)
        } else {
            StopwordFilter::empty()
        };
        Self::with_stopwords(config, stopwords)
    }

    /// Build a ranker with an explicit stop-word list
    ///
    /// The list is ignored when `config.remove_stopwords` is false.
    pub fn with_stopwords(config: TextRankConfig, stopwords: StopwordFilter) -> Result<Self> {
        let report = config.validate()?;
        for issue in report.warnings() {
            warn!(path = %issue.path, "{}", issue.message);
        }

        let stopwords = if config.remove_stopwords {
            stopwords
        } else {
            StopwordFilter::empty()
        };

        Ok(Self {
            tokenizer: Tokenizer::with_stopwords(stopwords),
            ranker: StandardPageRank::from_config(&config),
            extractor: PhraseExtractor::with_config(config.clone()),
            config,
        })
    }

    pub fn config(&self) -> &TextRankConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Rank one document
    pub fn rank_document(&self, document: &Document) -> DocumentRanking {
        let _doc_span = tracing::debug_span!("document", id = %document.id).entered();

        // Stage 1: Tokenize
        let stream = {
            trace_stage!(STAGE_TOKENIZE);
            self.tokenizer.stream(&document.text)
        };

        // Stage 2: Build graph
        let graph = {
            trace_stage!(STAGE_GRAPH);
            let builder =
                GraphBuilder::from_stream(&stream, self.config.window_size, self.config.weighting);
            CsrGraph::from_builder(&builder)
        };
        debug!(
            tokens = stream.len(),
            nodes = graph.num_nodes,
            edges = graph.num_edges(),
            isolated = graph.num_isolated(),
            "graph built"
        );

        // Stage 3: Rank
        let ranks = {
            trace_stage!(STAGE_RANK);
            self.ranker.run(&graph)
        };
        debug!(
            iterations = ranks.iterations,
            converged = ranks.converged,
            delta = ranks.delta,
            "ranking finished"
        );

        // Stage 4: Extract phrases
        let phrases = {
            trace_stage!(STAGE_PHRASES);
            self.extractor.extract(&stream, &ranks)
        };

        DocumentRanking {
            document: document.id.clone(),
            phrases,
            num_tokens: stream.len(),
            num_nodes: graph.num_nodes,
            num_edges: graph.num_edges(),
            iterations: ranks.iterations,
            converged: ranks.converged,
            delta: ranks.delta,
        }
    }

    /// Rank raw text under an anonymous identifier
    pub fn rank_text(&self, text: &str) -> Vec<Phrase> {
        self.rank_document(&Document::new("", text)).phrases
    }
}

// ============================================================================
// Tests
// ============================================================================
