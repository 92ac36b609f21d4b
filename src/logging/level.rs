//! Log levels for the embedded logging engine.
//!
//! `tracing::Level` has no `FATAL` variant and carries a `TRACE` level this
//! service has no use for, so the engine defines its own small enum instead.

use std::fmt;

/// Severity of a log record, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    /// Only `Error` and `Fatal` records are mirrored to the backup task pool.
    pub fn is_backed_up(self) -> bool {
        matches!(self, Level::Error | Level::Fatal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_severity_ascending() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn only_error_and_fatal_back_up() {
        assert!(!Level::Debug.is_backed_up());
        assert!(!Level::Info.is_backed_up());
        assert!(!Level::Warn.is_backed_up());
        assert!(Level::Error.is_backed_up());
        assert!(Level::Fatal.is_backed_up());
    }
}
