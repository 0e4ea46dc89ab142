//! Command line interface for the `hatetracker` binary.
//!
//! Flags override values loaded from an optional JSON configuration file,
//! which in turn override the defaults of [`TextRankConfig`].

use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info, Level};

use crate::errors::{Result, TextRankError};
use crate::io::discover::{discover_documents, DiscoverOptions};
use crate::io::export::{per_document_paths, write_per_document, RowWriter};
use crate::io::reader::read_documents;
use crate::nlp::stopwords::StopwordFilter;
use crate::pipeline::batch::{Execution, RunSummary};
use crate::pipeline::runner::TextRank;
use crate::types::{CooccurrenceWeighting, PhraseAdjacency, PhraseScoring, TextRankConfig};

/// Rank key phrases in text files with TextRank and export them as CSV
#[derive(Parser, Debug, Clone)]
#[command(name = "hatetracker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Input file or directory of documents
    pub input: PathBuf,

    /// Output CSV file, or output directory with --per-document
    pub output: PathBuf,

    /// Descend into subdirectories of the input directory
    #[arg(short, long)]
    pub recursive: bool,

    /// Only rank files whose name ends with this suffix
    #[arg(long, default_value = ".txt")]
    pub suffix: String,

    /// Write one CSV per document, mirroring the input tree
    #[arg(long)]
    pub per_document: bool,

    /// Rank documents in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Read and rank this many files at a time to bound memory use
    #[arg(short, long, value_name = "FILES")]
    pub batch_size: Option<NonZeroUsize>,

    /// JSON file with ranking configuration
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Co-occurrence window size
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Co-occurrence weighting: count or inverse-distance
    #[arg(long)]
    pub weighting: Option<CooccurrenceWeighting>,

    /// PageRank damping factor
    #[arg(long)]
    pub damping: Option<f64>,

    /// Convergence tolerance
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Maximum PageRank iterations
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Keep terms scoring above this value instead of the top fraction
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Fraction of terms kept as keywords
    #[arg(long)]
    pub top_fraction: Option<f64>,

    /// Phrase adjacency: contiguous or bridge-stopwords
    #[arg(long)]
    pub adjacency: Option<PhraseAdjacency>,

    /// Phrase scoring: sum or mean
    #[arg(long)]
    pub scoring: Option<PhraseScoring>,

    /// Maximum phrases per document
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Newline-separated stop-word list replacing the built-in one
    #[arg(long, value_name = "PATH")]
    pub stopwords: Option<PathBuf>,

    /// Keep stop-words
    #[arg(long)]
    pub no_stopwords: bool,

    /// Language of the built-in stop-word list
    #[arg(long)]
    pub language: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Log level selected by -v / -q
    pub fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    pub fn discover_options(&self) -> DiscoverOptions {
        DiscoverOptions {
            recursive: self.recursive,
            suffix: Some(self.suffix.clone()).filter(|s| !s.is_empty()),
        }
    }

    /// Build the ranking configuration: defaults, then file, then flags
    pub fn resolve_config(&self) -> Result<TextRankConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| TextRankError::Input {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_str(&text).map_err(|source| TextRankError::ConfigFile {
                    path: path.clone(),
                    source,
                })?
            }
            None => TextRankConfig::default(),
        };

        if let Some(window) = self.window {
            config.window_size = window;
        }
        if let Some(weighting) = self.weighting {
            config.weighting = weighting;
        }
        if let Some(damping) = self.damping {
            config.damping = damping;
        }
        if let Some(tolerance) = self.tolerance {
            config.convergence_threshold = tolerance;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        if self.threshold.is_some() {
            config.score_threshold = self.threshold;
        }
        if let Some(fraction) = self.top_fraction {
            config.top_fraction = fraction;
        }
        if let Some(adjacency) = self.adjacency {
            config.adjacency = adjacency;
        }
        if let Some(scoring) = self.scoring {
            config.scoring = scoring;
        }
        if self.limit.is_some() {
            config.phrase_limit = self.limit;
        }
        if self.no_stopwords {
            config.remove_stopwords = false;
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }

        Ok(config)
    }
}

/// Run the whole tool: configure, discover, read, rank, export
///
/// Configuration problems and colliding per-document outputs abort before
/// any document is read. Files are read, ranked and written one batch at a
/// time; the output does not depend on the batch size. Per-document failures
/// end up in the returned summary.
pub fn execute(args: &Args) -> Result<RunSummary> {
    let config = args.resolve_config()?;
    let ranker = match &args.stopwords {
        Some(path) => TextRank::with_stopwords(config, StopwordFilter::from_file(path)?)?,
        None => TextRank::new(config)?,
    };

    let paths = discover_documents(&args.input, &args.discover_options())?;
    info!(input = %args.input.display(), documents = paths.len(), "ranking documents");

    let per_document = args.per_document && args.input.is_dir();
    if per_document {
        let documents: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        per_document_paths(&args.input, &args.output, documents.iter().map(String::as_str))?;
    }

    let execution = if args.parallel {
        Execution::Parallel
    } else {
        Execution::Sequential
    };
    let batch_size = args.batch_size.map_or(paths.len(), NonZeroUsize::get).max(1);

    let mut table = if per_document {
        None
    } else {
        Some(RowWriter::create(&args.output)?)
    };
    let mut summary = RunSummary::default();
    let mut files = 0;

    for (index, batch) in paths.chunks(batch_size).enumerate() {
        debug!(batch = index, files = batch.len(), "ranking batch");
        let report = ranker.rank_batch(read_documents(batch), execution);
        match table.as_mut() {
            Some(table) => table.append(&report.rows())?,
            None => files += write_per_document(&args.input, &args.output, &report.rankings)?,
        }
        summary.merge(report.summary);
    }

    match table {
        Some(table) => {
            info!(output = %args.output.display(), rows = table.rows(), "wrote result table");
            table.finish()?;
        }
        None => {
            info!(output = %args.output.display(), files, "wrote per-document tables");
        }
    }

    Ok(summary)
}
