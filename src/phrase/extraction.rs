//! Keyphrase extraction from ranked tokens
//!
//! Tokens whose term is selected as a keyword are merged into maximal runs;
//! each run becomes a phrase scored from its member terms. Repeated phrases
//! are merged and counted.

use rustc_hash::FxHashMap;

use crate::nlp::tokenizer::{StreamToken, TokenStream};
use crate::pagerank::PageRankResult;
use crate::types::{Phrase, PhraseAdjacency, PhraseScoring, TextRankConfig};

/// Phrase extractor
#[derive(Debug, Clone, Default)]
pub struct PhraseExtractor {
    config: TextRankConfig,
}

impl PhraseExtractor {
    /// Create an extractor with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: TextRankConfig) -> Self {
        Self { config }
    }

    /// Decide which terms are keywords
    ///
    /// With a score threshold, keeps terms scoring strictly above it.
    /// Otherwise keeps the top `top_fraction` of terms (at least one), ranked
    /// by score with earlier first occurrence winning ties.
    pub fn select_keywords(&self, ranks: &PageRankResult) -> Vec<bool> {
        let n = ranks.len();
        let mut keep = vec![false; n];
        if n == 0 {
            return keep;
        }

        match self.config.score_threshold {
            Some(threshold) => {
                for (flag, &score) in keep.iter_mut().zip(&ranks.scores) {
                    *flag = score > threshold;
                }
            }
            None => {
                let count = ((n as f64 * self.config.top_fraction).ceil() as usize).clamp(1, n);
                for (node, _) in ranks.top_n(count) {
                    keep[node as usize] = true;
                }
            }
        }

        keep
    }

    /// Extract scored phrases, highest score first
    pub fn extract(&self, stream: &TokenStream, ranks: &PageRankResult) -> Vec<Phrase> {
        let keep = self.select_keywords(ranks);

        let mut phrases: Vec<Phrase> = Vec::new();
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        let mut run: Vec<StreamToken> = Vec::new();

        let mut flush = |run: &mut Vec<StreamToken>| {
            if run.is_empty() {
                return;
            }
            let phrase = self.build_phrase(stream, ranks, run);
            match index.get(&phrase.text) {
                Some(&i) => phrases[i].count += 1,
                None => {
                    index.insert(phrase.text.clone(), phrases.len());
                    phrases.push(phrase);
                }
            }
            run.clear();
        };

        for &token in stream.tokens() {
            if !keep[token.term as usize] {
                flush(&mut run);
                continue;
            }
            let breaks = run.last().is_some_and(|prev| !self.adjacent(prev, &token));
            if breaks {
                flush(&mut run);
            }
            run.push(token);
        }
        flush(&mut run);

        // Phrases were created in document order, so a stable sort keeps the
        // earlier first position ahead on equal scores.
        phrases.sort_by(|a, b| b.score.total_cmp(&a.score));

        if let Some(limit) = self.config.phrase_limit {
            phrases.truncate(limit);
        }

        phrases
    }

    /// Whether `next` continues a run ending at `prev`
    ///
    /// Both are consecutive surviving tokens, so the only possible gap is
    /// made of removed stop-words.
    fn adjacent(&self, prev: &StreamToken, next: &StreamToken) -> bool {
        match self.config.adjacency {
            PhraseAdjacency::Contiguous => next.position == prev.position + 1,
            PhraseAdjacency::BridgeStopwords => true,
        }
    }

    fn build_phrase(
        &self,
        stream: &TokenStream,
        ranks: &PageRankResult,
        run: &[StreamToken],
    ) -> Phrase {
        let text = run
            .iter()
            .map(|t| stream.term(t.term))
            .collect::<Vec<_>>()
            .join(" ");

        let sum: f64 = run.iter().map(|t| ranks.score(t.term)).sum();
        let score = match self.config.scoring {
            PhraseScoring::Sum => sum,
            PhraseScoring::Mean => sum / run.len() as f64,
        };

        Phrase {
            text,
            score,
            count: 1,
            first_position: run[0].position,
            length: run.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::stopwords::StopwordFilter;
    use crate::nlp::tokenizer::Tokenizer;

    fn uniform(stream: &TokenStream) -> PageRankResult {
        let n = stream.num_terms();
        PageRankResult::new(vec![1.0 / n as f64; n], 1, 0.0, true)
    }

    fn ranks(scores: &[f64]) -> PageRankResult {
        PageRankResult::new(scores.to_vec(), 1, 0.0, true)
    }

    fn texts(phrases: &[Phrase]) -> Vec<&str> {
        phrases.iter().map(|p| p.text.as_str()).collect()
    }

    #[test]
    fn test_top_fraction_selection() {
        let extractor = PhraseExtractor::new();
        let keep = extractor.select_keywords(&ranks(&[0.1, 0.5, 0.2, 0.15, 0.05]));

        // ceil(5 / 3) = 2 keywords
        assert_eq!(keep, vec![false, true, true, false, false]);
    }

    #[test]
    fn test_top_fraction_keeps_at_least_one() {
        let extractor =
            PhraseExtractor::with_config(TextRankConfig::default().with_top_fraction(0.01));
        let keep = extractor.select_keywords(&ranks(&[0.3, 0.7]));
        assert_eq!(keep, vec![false, true]);
    }

    #[test]
    fn test_tie_prefers_earlier_term() {
        let extractor = PhraseExtractor::new();
        let keep = extractor.select_keywords(&ranks(&[0.4, 0.4, 0.2]));
        assert_eq!(keep, vec![true, false, false]);
    }

    #[test]
    fn test_threshold_selection_is_strict() {
        let config = TextRankConfig::default().with_score_threshold(Some(0.2));
        let extractor = PhraseExtractor::with_config(config);

        let keep = extractor.select_keywords(&ranks(&[0.2, 0.5, 0.1, 0.3]));
        assert_eq!(keep, vec![false, true, false, true]);
    }

    #[test]
    fn test_adjacent_keywords_merge() {
        let stream = Tokenizer::new().stream("vile online abuse is vile");
        // terms: vile, online, abuse, is
        let config = TextRankConfig::default().with_score_threshold(Some(0.2));
        let extractor = PhraseExtractor::with_config(config);

        let phrases = extractor.extract(&stream, &ranks(&[0.3, 0.25, 0.35, 0.1]));

        assert_eq!(texts(&phrases), vec!["vile online abuse", "vile"]);
        assert!((phrases[0].score - 0.9).abs() < 1e-12);
        assert_eq!(phrases[0].length, 3);
        assert_eq!(phrases[1].first_position, 4);
    }

    #[test]
    fn test_repeated_phrase_counted_once() {
        let stream = Tokenizer::new().stream("hate speech and more hate speech");
        let config = TextRankConfig::default().with_score_threshold(Some(0.2));
        let extractor = PhraseExtractor::with_config(config);

        // terms: hate, speech, and, more
        let phrases = extractor.extract(&stream, &ranks(&[0.4, 0.3, 0.1, 0.2]));

        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].text, "hate speech");
        assert_eq!(phrases[0].count, 2);
        assert_eq!(phrases[0].first_position, 0);
    }

    #[test]
    fn test_mean_scoring() {
        let stream = Tokenizer::new().stream("hate speech");
        let config = TextRankConfig::default()
            .with_score_threshold(Some(0.0))
            .with_scoring(PhraseScoring::Mean);

        let phrases = PhraseExtractor::with_config(config).extract(&stream, &ranks(&[0.6, 0.4]));
        assert!((phrases[0].score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_stopword_gap_policy() {
        let tokenizer = Tokenizer::with_stopwords(StopwordFilter::from_list(&["of"]));
        let stream = tokenizer.stream("rise of trolls");
        let all = TextRankConfig::default().with_score_threshold(Some(0.0));

        let contiguous =
            PhraseExtractor::with_config(all.clone()).extract(&stream, &uniform(&stream));
        assert_eq!(texts(&contiguous), vec!["rise", "trolls"]);

        let bridged =
            PhraseExtractor::with_config(all.with_adjacency(PhraseAdjacency::BridgeStopwords))
                .extract(&stream, &uniform(&stream));
        assert_eq!(texts(&bridged), vec!["rise trolls"]);
    }

    #[test]
    fn test_non_keyword_breaks_run_under_both_policies() {
        let stream = Tokenizer::new().stream("angry mob gathers outside");
        for adjacency in [PhraseAdjacency::Contiguous, PhraseAdjacency::BridgeStopwords] {
            let config = TextRankConfig::default()
                .with_score_threshold(Some(0.2))
                .with_adjacency(adjacency);
            let phrases = PhraseExtractor::with_config(config)
                .extract(&stream, &ranks(&[0.3, 0.3, 0.1, 0.3]));

            assert_eq!(texts(&phrases), vec!["angry mob", "outside"]);
        }
    }

    #[test]
    fn test_equal_scores_ordered_by_first_position() {
        let stream = Tokenizer::new().stream("alpha x beta");
        let config = TextRankConfig::default().with_score_threshold(Some(0.2));

        let phrases =
            PhraseExtractor::with_config(config).extract(&stream, &ranks(&[0.4, 0.1, 0.4]));
        assert_eq!(texts(&phrases), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_phrase_limit() {
        let stream = Tokenizer::new().stream("a x b x c");
        let config = TextRankConfig::default()
            .with_score_threshold(Some(0.15))
            .with_phrase_limit(Some(2));

        let phrases = PhraseExtractor::with_config(config)
            .extract(&stream, &ranks(&[0.3, 0.1, 0.2, 0.25]));
        assert_eq!(texts(&phrases), vec!["a", "c"]);
    }

    #[test]
    fn test_empty_stream() {
        let stream = TokenStream::new();
        let phrases = PhraseExtractor::new().extract(&stream, &ranks(&[]));
        assert!(phrases.is_empty());
    }
}
