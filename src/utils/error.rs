use std::fmt;

/// Issue tracker URL surfaced in error messages, matching the project's support channel.
const ISSUE_TRACKER: &str = "https://github.com/cratehold/cratehold/issues";

/// Error taxonomy for the storage service and its logging engine.
///
/// Only constructors that can fail before any work has started (config loading,
/// metadata store initialization) return `Err` of this type; everything else in
/// the hot path returns `bool`/`Option` and logs the failure instead, per the
/// "losing bytes is preferred to killing the process" policy of the logging engine.
#[derive(Debug)]
pub enum Error {
    /// A required configuration field was missing, zero, or empty.
    Config(String),
    /// A filesystem operation failed (open, read, write, seek, rotate).
    Io(String),
    /// Compression or decompression failed.
    Compression(String),
    /// The metadata store failed to initialize or execute a statement.
    Persistence(String),
    /// A malformed or unsatisfiable request (bad range, unknown route, bad header).
    Protocol(String),
    /// An invariant was violated that indicates a bug rather than bad input.
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::Config(details) => format!("configuration error: {details}"),
            Error::Io(details) => format!("filesystem error: {details}"),
            Error::Compression(details) => format!("compression error: {details}"),
            Error::Persistence(details) => format!("metadata store error: {details}"),
            Error::Protocol(details) => format!("protocol error: {details}"),
            Error::Internal(details) => format!("internal error: {details}"),
        };
        write!(f, "{msg}\n\nif this looks like a bug, report it at {ISSUE_TRACKER}")
    }
}

impl std::error::Error for Error {}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Convenient result alias for fallible constructors in this crate.
pub type Result<T> = std::result::Result<T, Error>;
