//! In-memory tf-idf scoring over a corpus of plain-text documents.
//!
//! Build a [`CorpusIndex`] by feeding it documents, then ask it which words
//! best distinguish one document from the rest of the corpus.

pub mod error;
pub mod index;
pub mod tokenizer;

pub use error::{Error, Result};
pub use index::{CorpusIndex, Limit, TermCounts, WordScore};
pub use tokenizer::tokenize;
