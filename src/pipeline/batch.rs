//! Batch orchestration over a collection of documents.
//!
//! Each document runs through its own [`TextRank::rank_document`] call with no
//! shared state. Documents the I/O layer failed to read arrive as
//! [`DocumentError`]s; they are recorded and skipped. Aggregation into the
//! result table happens in a single sequential pass, so parallel and
//! sequential runs produce identical output.

use rayon::prelude::*;
use tracing::{info, warn};

use super::runner::{DocumentRanking, TextRank};
use crate::errors::{DocumentError, DocumentWarning};
use crate::types::{Document, ResultRow};

/// How documents in a batch are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    #[default]
    Sequential,
    /// Rank documents on the rayon thread pool
    Parallel,
}

/// Per-run totals and the documents that need attention
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Documents submitted, readable or not
    pub documents: usize,
    /// Documents that were ranked (including empty ones)
    pub ranked: usize,
    /// Result rows produced
    pub rows: usize,
    /// Documents that could not be read
    pub failures: Vec<DocumentError>,
    /// Non-fatal conditions, in input order
    pub warnings: Vec<DocumentWarning>,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Fold the summary of a later batch into this one
    pub fn merge(&mut self, other: RunSummary) {
        self.documents += other.documents;
        self.ranked += other.ranked;
        self.rows += other.rows;
        self.failures.extend(other.failures);
        self.warnings.extend(other.warnings);
    }

    /// Identifiers of documents with no surviving tokens
    pub fn empty_documents(&self) -> impl Iterator<Item = &str> {
        self.warnings.iter().filter_map(|w| match w {
            DocumentWarning::Empty { document } => Some(document.as_str()),
            _ => None,
        })
    }

    /// Identifiers of documents whose ranking hit the iteration cap
    pub fn unconverged_documents(&self) -> impl Iterator<Item = &str> {
        self.warnings.iter().filter_map(|w| match w {
            DocumentWarning::NotConverged { document, .. } => Some(document.as_str()),
            _ => None,
        })
    }
}

/// Output of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Rankings of every readable document, in input order
    pub rankings: Vec<DocumentRanking>,
    pub summary: RunSummary,
}

impl BatchReport {
    /// The concatenated result table
    pub fn rows(&self) -> Vec<ResultRow> {
        self.rankings.iter().flat_map(DocumentRanking::rows).collect()
    }
}

impl TextRank {
    /// Rank a collection of documents
    ///
    /// `inputs` holds each document or the error raised while reading it.
    pub fn rank_batch<I>(&self, inputs: I, execution: Execution) -> BatchReport
    where
        I: IntoIterator<Item = std::result::Result<Document, DocumentError>>,
    {
        let inputs: Vec<_> = inputs.into_iter().collect();

        let outcomes: Vec<std::result::Result<DocumentRanking, DocumentError>> = match execution {
            Execution::Sequential => inputs
                .into_iter()
                .map(|input| input.map(|doc| self.rank_document(&doc)))
                .collect(),
            Execution::Parallel => inputs
                .into_par_iter()
                .map(|input| input.map(|doc| self.rank_document(&doc)))
                .collect(),
        };

        let mut report = BatchReport::default();
        for outcome in outcomes {
            report.summary.documents += 1;
            match outcome {
                Ok(ranking) => {
                    if let Some(warning) = ranking.warning() {
                        match &warning {
                            DocumentWarning::Empty { .. } => warn!("{warning}"),
                            DocumentWarning::NotConverged { .. } => info!("{warning}"),
                        }
                        report.summary.warnings.push(warning);
                    }
                    report.summary.ranked += 1;
                    report.summary.rows += ranking.phrases.len();
                    report.rankings.push(ranking);
                }
                Err(err) => {
                    warn!("skipping {err}");
                    report.summary.failures.push(err);
                }
            }
        }

        info!(
            documents = report.summary.documents,
            ranked = report.summary.ranked,
            failed = report.summary.failures.len(),
            rows = report.summary.rows,
            "batch finished"
        );

        report
    }

    /// Rank a collection of in-memory documents
    pub fn rank_documents(&self, documents: Vec<Document>, execution: Execution) -> BatchReport {
        self.rank_batch(documents.into_iter().map(Ok), execution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextRankConfig;

    fn ranker() -> TextRank {
        TextRank::new(TextRankConfig::default()).unwrap()
    }

    fn corpus() -> Vec<Document> {
        vec![
            Document::new("a.txt", "Coordinated harassment campaigns target journalists online."),
            Document::new("b.txt", ""),
            Document::new(
                "c.txt",
                "Extremist forums share memes; the memes spread extremist slogans to new forums.",
            ),
        ]
    }

    #[test]
    fn test_rows_tagged_with_document() {
        let report = ranker().rank_documents(corpus(), Execution::Sequential);

        let rows = report.rows();
        assert!(rows.iter().any(|r| r.document == "a.txt"));
        assert!(rows.iter().any(|r| r.document == "c.txt"));
        assert!(rows.iter().all(|r| r.document != "b.txt"));

        // Each document restarts ranks at 1
        let firsts = rows.iter().filter(|r| r.rank == 1).count();
        assert_eq!(firsts, 2);
    }

    #[test]
    fn test_unreadable_document_does_not_abort() {
        let inputs = vec![
            Ok(Document::new("a.txt", "Slurs against refugees trend on social media.")),
            Err(DocumentError::NotText {
                document: "b.bin".to_string(),
                reason: "invalid UTF-8".to_string(),
            }),
        ];

        let report = ranker().rank_batch(inputs, Execution::Sequential);

        assert_eq!(report.summary.documents, 2);
        assert_eq!(report.summary.ranked, 1);
        assert_eq!(report.summary.failures.len(), 1);
        assert_eq!(report.summary.failures[0].document(), "b.bin");
        assert!(report.rows().iter().all(|r| r.document == "a.txt"));
        assert!(!report.rows().is_empty());
    }

    #[test]
    fn test_empty_document_recorded_as_warning() {
        let report = ranker().rank_documents(corpus(), Execution::Sequential);

        assert_eq!(report.summary.empty_documents().collect::<Vec<_>>(), vec!["b.txt"]);
        assert!(!report.summary.has_failures());
        assert_eq!(report.summary.rows, report.rows().len());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = ranker().rank_documents(corpus(), Execution::Sequential);
        let parallel = ranker().rank_documents(corpus(), Execution::Parallel);

        assert_eq!(sequential.rankings, parallel.rankings);
        assert_eq!(sequential.rows(), parallel.rows());
    }

    #[test]
    fn test_chunked_summaries_merge_to_whole() {
        let whole = ranker().rank_documents(corpus(), Execution::Sequential);

        let mut merged = RunSummary::default();
        let mut rows = Vec::new();
        for chunk in corpus().chunks(2) {
            let report = ranker().rank_documents(chunk.to_vec(), Execution::Sequential);
            rows.extend(report.rows());
            merged.merge(report.summary);
        }

        assert_eq!(rows, whole.rows());
        assert_eq!(merged.documents, whole.summary.documents);
        assert_eq!(merged.ranked, whole.summary.ranked);
        assert_eq!(merged.rows, whole.summary.rows);
        assert_eq!(merged.warnings, whole.summary.warnings);
    }

    #[test]
    fn test_unconverged_documents_listed() {
        let config = TextRankConfig::default()
            .with_max_iterations(1)
            .with_convergence_threshold(0.0);
        let ranker = TextRank::new(config).unwrap();

        let report = ranker.rank_documents(
            vec![Document::new("x", "bots amplify hateful hashtags across hateful networks")],
            Execution::Sequential,
        );

        assert_eq!(report.summary.unconverged_documents().collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(report.rankings.len(), 1);
    }

    #[test]
    fn test_empty_batch() {
        let report = ranker().rank_documents(Vec::new(), Execution::Parallel);

        assert_eq!(report.summary.documents, 0);
        assert!(report.rows().is_empty());
    }
}
