use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors the index engine surfaces. Every variant is terminal for the call
/// that raised it; nothing is retried internally.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or ambiguous input source at construction/reload time.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unknown sort key requested.
    #[error("unsupported sort order: {0}")]
    UnsupportedOrder(String),

    /// Persisted form cannot be parsed back into an index.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// A source document failed to parse.
    #[error("malformed document {path}: {message}")]
    MalformedDocument { path: String, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::MalformedSnapshot(err.to_string())
    }
}
