//! Word tokenization and normalization
//!
//! Words are found with Unicode word segmentation (UAX #29), lowercased and
//! stripped of non-alphanumeric boundary characters. Stop-words are dropped
//! but still consume a position, so downstream stages can see the gap.

use rustc_hash::FxHashMap;
use unicode_segmentation::{UnicodeSegmentation, UnicodeWordIndices};

use super::stopwords::StopwordFilter;
use crate::types::Token;

/// Normalizing word tokenizer
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stopwords: StopwordFilter,
}

impl Tokenizer {
    /// Create a tokenizer that keeps every word
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tokenizer that drops words in `stopwords`
    pub fn with_stopwords(stopwords: StopwordFilter) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &StopwordFilter {
        &self.stopwords
    }

    /// Lazily tokenize `text`
    ///
    /// The returned sequence is `Copy`; every call to [`TokenSeq::iter`]
    /// restarts from the beginning of the text.
    pub fn tokenize<'a>(&'a self, text: &'a str) -> TokenSeq<'a> {
        TokenSeq {
            text,
            stopwords: &self.stopwords,
        }
    }

    /// Tokenize `text` and intern the result
    pub fn stream(&self, text: &str) -> TokenStream {
        self.tokenize(text).iter().collect()
    }
}

/// A restartable token sequence over borrowed text
#[derive(Debug, Clone, Copy)]
pub struct TokenSeq<'a> {
    text: &'a str,
    stopwords: &'a StopwordFilter,
}

impl<'a> TokenSeq<'a> {
    /// Start a fresh pass over the text
    pub fn iter(&self) -> Tokens<'a> {
        Tokens {
            words: self.text.unicode_word_indices(),
            stopwords: self.stopwords,
            position: 0,
        }
    }
}

impl<'a> IntoIterator for TokenSeq<'a> {
    type Item = Token;
    type IntoIter = Tokens<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the normalized tokens of one pass
pub struct Tokens<'a> {
    words: UnicodeWordIndices<'a>,
    stopwords: &'a StopwordFilter,
    position: usize,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        for (offset, word) in self.words.by_ref() {
            let trimmed = word.trim_start_matches(|c: char| !c.is_alphanumeric());
            let start = offset + (word.len() - trimmed.len());
            let trimmed = trimmed.trim_end_matches(|c: char| !c.is_alphanumeric());
            if trimmed.is_empty() {
                continue;
            }

            let position = self.position;
            self.position += 1;

            let text = trimmed.to_lowercase();
            if self.stopwords.is_stopword(&text) {
                continue;
            }

            return Some(Token::new(text, position, start, start + trimmed.len()));
        }
        None
    }
}

/// One token of a [`TokenStream`], referring to its term by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamToken {
    /// Interned term id; also the graph node id
    pub term: u32,
    /// Index of the word in the unfiltered word sequence
    pub position: usize,
    pub start: usize,
    pub end: usize,
}

/// Tokens of one document with interned term ids
///
/// Term ids are assigned in order of first occurrence, so a lower id always
/// means an earlier first position.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    terms: Vec<String>,
    term_ids: FxHashMap<String, u32>,
    tokens: Vec<StreamToken>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token, interning its text
    pub fn push(&mut self, token: Token) {
        let term = match self.term_ids.get(&token.text) {
            Some(&id) => id,
            None => {
                let id = self.terms.len() as u32;
                self.term_ids.insert(token.text.clone(), id);
                self.terms.push(token.text);
                id
            }
        };

        self.tokens.push(StreamToken {
            term,
            position: token.position,
            start: token.start,
            end: token.end,
        });
    }

    /// Tokens in document order
    pub fn tokens(&self) -> &[StreamToken] {
        &self.tokens
    }

    /// Distinct terms, indexed by term id
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Text of a term
    pub fn term(&self, id: u32) -> &str {
        &self.terms[id as usize]
    }

    /// Look up a term id by text
    pub fn term_id(&self, text: &str) -> Option<u32> {
        self.term_ids.get(text).copied()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        let mut stream = TokenStream::new();
        for token in iter {
            stream.push(token);
        }
        stream
    }
}
