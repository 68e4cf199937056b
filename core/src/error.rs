use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The key was never added to the index.
    #[error("document not indexed: {0}")]
    DocumentNotFound(String),

    /// The document holds no tokens, so term frequencies are undefined.
    #[error("cannot score an empty document: {0}")]
    EmptyDocument(String),

    #[error("invalid word limit {0:?}: expected a non-negative number or \"all\"")]
    InvalidLimit(String),

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
