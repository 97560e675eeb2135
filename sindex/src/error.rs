use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The OS entropy source could not provide the requested bytes. Never
    /// retried silently: an index blinded with predictable bytes leaks the
    /// keyword count.
    #[error("secure random source unavailable: {0}")]
    RngUnavailable(#[source] rand::Error),

    #[error("malformed index data: {0}")]
    Codec(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("a cryptographic primitive failed: {0}")]
    Crypto(String),

    #[error("precondition violated: {0}")]
    Precondition(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
