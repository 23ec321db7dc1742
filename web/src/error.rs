use std::error::Error as StdError;
use std::fmt;
use std::io;

pub type Result<T> = core::result::Result<T, Error>;

/// Failures of the HTTP server itself. Errors on a single subscriber's stream
/// never surface here; they end that stream and nothing else.
#[derive(Debug)]
pub enum Error {
    /// The listen address could not be bound.
    Bind { address: String, source: io::Error },
    /// The accept loop stopped with an I/O error.
    Serve(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bind { address, source } => write!(f, "Failed to bind {address}: {source}"),
            Error::Serve(source) => write!(f, "Server error: {source}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Bind { source, .. } | Error::Serve(source) => Some(source),
        }
    }
}
