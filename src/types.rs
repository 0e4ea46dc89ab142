//! Core types for keyphrase ranking
//!
//! Documents, tokens, phrases, exported rows and the ranking configuration
//! that every pipeline stage receives by reference.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, TextRankError};
use crate::pipeline::validation::{ValidationEngine, ValidationReport};

/// A document to rank: an identifier (usually a file path) and its raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Identifier copied onto every result row
    pub id: String,
    /// Raw UTF-8 text
    pub text: String,
}

impl Document {
    /// Create a new document
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A normalized token emitted by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Normalized (lowercased, boundary-stripped) text
    pub text: String,
    /// Index of the word in the unfiltered word sequence
    pub position: usize,
    /// Byte offset of the word start in the source text
    pub start: usize,
    /// Byte offset of the word end in the source text
    pub end: usize,
}

impl Token {
    /// Create a new token
    pub fn new(text: impl Into<String>, position: usize, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            position,
            start,
            end,
        }
    }
}

/// A scored candidate phrase
#[derive(Debug, Clone, PartialEq)]
pub struct Phrase {
    /// Member tokens joined by a single space
    pub text: String,
    /// Aggregate score of the member tokens
    pub score: f64,
    /// Number of times the phrase occurs in the document
    pub count: usize,
    /// Position of the first token of the earliest occurrence
    pub first_position: usize,
    /// Number of tokens in the phrase
    pub length: usize,
}

/// One row of the exported result table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub document: String,
    pub phrase: String,
    pub score: f64,
    pub rank: usize,
}

/// How a co-occurrence inside the window contributes to an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CooccurrenceWeighting {
    /// Every co-occurrence adds 1
    #[default]
    Count,
    /// Every co-occurrence adds 1 / distance
    InverseDistance,
}

impl CooccurrenceWeighting {
    /// Weight contributed by a pair of tokens `distance` apart
    #[inline]
    pub fn weight(self, distance: usize) -> f64 {
        match self {
            CooccurrenceWeighting::Count => 1.0,
            CooccurrenceWeighting::InverseDistance => 1.0 / distance.max(1) as f64,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CooccurrenceWeighting::Count => "count",
            CooccurrenceWeighting::InverseDistance => "inverse_distance",
        }
    }
}

/// Whether removed stop-words break a run of kept tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseAdjacency {
    /// Tokens must be adjacent in the original text
    #[default]
    Contiguous,
    /// Removed stop-words between two kept tokens are skipped over
    BridgeStopwords,
}

impl PhraseAdjacency {
    pub fn as_str(self) -> &'static str {
        match self {
            PhraseAdjacency::Contiguous => "contiguous",
            PhraseAdjacency::BridgeStopwords => "bridge_stopwords",
        }
    }
}

/// How member token scores combine into a phrase score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseScoring {
    #[default]
    Sum,
    Mean,
}

impl PhraseScoring {
    pub fn as_str(self) -> &'static str {
        match self {
            PhraseScoring::Sum => "sum",
            PhraseScoring::Mean => "mean",
        }
    }
}

macro_rules! impl_option_enum {
    ($ty:ty, $what:expr, [$($name:expr => $variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
                match value.to_lowercase().replace('-', "_").as_str() {
                    $($name => Ok($variant),)+
                    other => Err(format!("unknown {} \"{}\"", $what, other)),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_option_enum!(CooccurrenceWeighting, "weighting", [
    "count" => CooccurrenceWeighting::Count,
    "inverse_distance" => CooccurrenceWeighting::InverseDistance,
]);

impl_option_enum!(PhraseAdjacency, "adjacency policy", [
    "contiguous" => PhraseAdjacency::Contiguous,
    "bridge_stopwords" => PhraseAdjacency::BridgeStopwords,
]);

impl_option_enum!(PhraseScoring, "phrase scoring", [
    "sum" => PhraseScoring::Sum,
    "mean" => PhraseScoring::Mean,
]);

/// Configuration for a ranking run
///
/// Immutable once the pipeline is built; every stage borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRankConfig {
    /// Maximum token distance for two tokens to share an edge
    pub window_size: usize,
    /// Edge weight contributed by each co-occurrence
    pub weighting: CooccurrenceWeighting,
    /// PageRank damping factor, in (0, 1)
    pub damping: f64,
    /// Maximum per-node score change at which iteration stops
    pub convergence_threshold: f64,
    /// Iteration cap for the ranker
    pub max_iterations: usize,
    /// Keep tokens scoring strictly above this value; `None` uses `top_fraction`
    pub score_threshold: Option<f64>,
    /// Fraction of graph nodes kept when no threshold is set
    pub top_fraction: f64,
    /// Whether removed stop-words break phrase runs
    pub adjacency: PhraseAdjacency,
    /// How phrase scores are aggregated
    pub scoring: PhraseScoring,
    /// Maximum phrases emitted per document
    pub phrase_limit: Option<usize>,
    /// Drop stop-words during tokenization
    pub remove_stopwords: bool,
    /// Language of the built-in stop-word list
    pub language: String,
}

impl Default for TextRankConfig {
    fn default() -> Self {
        Self {
            window_size: 2,
            weighting: CooccurrenceWeighting::Count,
            damping: 0.85,
            convergence_threshold: 1e-6,
            max_iterations: 100,
            score_threshold: None,
            top_fraction: 1.0 / 3.0,
            adjacency: PhraseAdjacency::Contiguous,
            scoring: PhraseScoring::Sum,
            phrase_limit: None,
            remove_stopwords: true,
            language: "en".to_string(),
        }
    }
}

impl TextRankConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_weighting(mut self, weighting: CooccurrenceWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_score_threshold(mut self, threshold: Option<f64>) -> Self {
        self.score_threshold = threshold;
        self
    }

    pub fn with_top_fraction(mut self, fraction: f64) -> Self {
        self.top_fraction = fraction;
        self
    }

    pub fn with_adjacency(mut self, adjacency: PhraseAdjacency) -> Self {
        self.adjacency = adjacency;
        self
    }

    pub fn with_scoring(mut self, scoring: PhraseScoring) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_phrase_limit(mut self, limit: Option<usize>) -> Self {
        self.phrase_limit = limit;
        self
    }

    pub fn with_remove_stopwords(mut self, remove: bool) -> Self {
        self.remove_stopwords = remove;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Run every validation rule against this configuration
    ///
    /// Returns the full report (warnings included) when no rule reported an
    /// error, and [`TextRankError::InvalidConfiguration`] otherwise.
    pub fn validate(&self) -> Result<ValidationReport> {
        let report = ValidationEngine::with_defaults().validate(self);
        if report.has_errors() {
            return Err(TextRankError::InvalidConfiguration(report));
        }
        Ok(report)
    }
}
