use crate::error::{Error, Result};
use crate::tokenizer::tokenize;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Per-document term counts, iterated in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct TermCounts {
    terms: Vec<(String, u32)>,
    slots: HashMap<String, usize>,
    total: u64,
}

impl TermCounts {
    pub fn from_tokens<I: IntoIterator<Item = String>>(tokens: I) -> Self {
        let mut counts = Self::default();
        for token in tokens {
            counts.total += 1;
            match counts.slots.get(&token) {
                Some(&slot) => counts.terms[slot].1 += 1,
                None => {
                    counts.slots.insert(token.clone(), counts.terms.len());
                    counts.terms.push((token, 1));
                }
            }
        }
        counts
    }

    pub fn get(&self, term: &str) -> u32 {
        self.slots.get(term).map_or(0, |&slot| self.terms[slot].1)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 { self.total }

    /// Number of distinct terms.
    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.terms.iter().map(|(term, count)| (term.as_str(), *count))
    }
}

/// How many ranked words a query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Top(usize),
    All,
}

impl Default for Limit {
    fn default() -> Self { Limit::Top(10) }
}

impl From<Option<usize>> for Limit {
    fn from(n: Option<usize>) -> Self {
        n.map_or(Limit::All, Limit::Top)
    }
}

impl FromStr for Limit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Limit::All);
        }
        s.parse().map(Limit::Top).map_err(|_| Error::InvalidLimit(s.to_owned()))
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Top(n) => write!(f, "{n}"),
            Limit::All => f.write_str("all"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordScore {
    pub word: String,
    pub score: f64,
}

/// Term and document frequencies for a whole corpus.
///
/// Documents are keyed by caller-chosen strings (file paths, in the CLI).
/// `df[t]` always equals the number of indexed documents containing `t`,
/// including after a key has been re-added.
#[derive(Debug, Default, Clone)]
pub struct CorpusIndex {
    tf: BTreeMap<String, TermCounts>,
    df: HashMap<String, u32>,
}

impl CorpusIndex {
    pub fn new() -> Self { Self::default() }

    /// Tokenize `text` and index it under `key`, replacing any previous
    /// document with that key.
    pub fn add_document(&mut self, key: impl Into<String>, text: &str) {
        let key = key.into();
        let counts = TermCounts::from_tokens(tokenize(text));

        if let Some(previous) = self.tf.remove(&key) {
            debug!(key = %key, "replacing previously indexed document");
            self.retract(&previous);
        }
        for (term, _) in counts.iter() {
            *self.df.entry(term.to_owned()).or_insert(0) += 1;
        }

        debug!(key = %key, terms = counts.total(), distinct = counts.len(), "indexed document");
        self.tf.insert(key, counts);
    }

    /// Read a UTF-8 file and index it under its path.
    ///
    /// On a read failure the index is left untouched.
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
        self.add_document(path.display().to_string(), &text);
        Ok(())
    }

    fn retract(&mut self, counts: &TermCounts) {
        for (term, _) in counts.iter() {
            let emptied = match self.df.get_mut(term) {
                Some(n) => {
                    *n -= 1;
                    *n == 0
                }
                None => false,
            };
            if emptied {
                self.df.remove(term);
            }
        }
    }

    pub fn num_documents(&self) -> usize { self.tf.len() }

    /// Indexed keys in sorted order.
    pub fn documents(&self) -> impl Iterator<Item = &str> + '_ {
        self.tf.keys().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool { self.tf.contains_key(key) }

    pub fn vocabulary_size(&self) -> usize { self.df.len() }

    pub fn document_frequency(&self, term: &str) -> u32 {
        self.df.get(term).copied().unwrap_or(0)
    }

    pub fn term_frequency(&self, key: &str, term: &str) -> Result<u32> {
        Ok(self.document(key)?.get(term))
    }

    pub fn total_terms(&self, key: &str) -> Result<u64> {
        Ok(self.document(key)?.total())
    }

    pub fn document(&self, key: &str) -> Result<&TermCounts> {
        self.tf.get(key).ok_or_else(|| Error::DocumentNotFound(key.to_owned()))
    }

    /// Rank the words of `key` by tf-idf, highest first.
    ///
    /// `score(t) = tf(t) / total_terms * ln(N / df(t))`. Equal scores keep the
    /// order in which the words first appear in the document.
    pub fn important_words(&self, key: &str, limit: Limit) -> Result<Vec<WordScore>> {
        let counts = self.document(key)?;
        if counts.total() == 0 {
            return Err(Error::EmptyDocument(key.to_owned()));
        }
        let total_terms = counts.total() as f64;
        let total_documents = self.tf.len() as f64;

        let mut scored: Vec<WordScore> = counts
            .iter()
            .map(|(word, count)| {
                let df = self.document_frequency(word);
                debug_assert!(df >= 1, "indexed term {word:?} missing from df");
                let idf = (total_documents / df as f64).ln();
                WordScore { word: word.to_owned(), score: (count as f64 / total_terms) * idf }
            })
            .collect();

        // sort_by is stable, which gives the first-seen tie-break.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        if let Limit::Top(n) = limit {
            scored.truncate(n);
        }
        Ok(scored)
    }

    /// Words of `key` that occur in no other indexed document, in first-seen order.
    pub fn unique_words(&self, key: &str) -> Result<Vec<String>> {
        let counts = self.document(key)?;
        Ok(counts
            .iter()
            .filter(|(word, _)| self.document_frequency(word) == 1)
            .map(|(word, _)| word.to_owned())
            .collect())
    }
}
