//! RFC 7233-style `Range`/`If-Range` parsing and resolution against a known
//! file size and ETag.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

fn range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^bytes=(\d+)-(\d*)$").unwrap())
}

/// Parses `bytes=<start>-<end?>`. Any other form is treated as absent
/// (non-ranged), matching the base spec's tolerant parsing rule.
pub fn parse_range(header: &str) -> Option<(u64, Option<u64>)> {
    let caps = range_regex().captures(header.trim())?;
    let start: u64 = caps[1].parse().ok()?;
    let end = if caps[2].is_empty() { None } else { caps[2].parse().ok() };
    Some((start, end))
}

pub enum RangeOutcome {
    /// No range requested, or `If-Range` didn't match: serve the whole file.
    Full,
    /// A satisfiable byte range.
    Partial(ByteRange),
    /// `start >= file_size`: reply 416.
    Unsatisfiable,
}

/// Resolves a possibly-absent `Range` header (with optional `If-Range`)
/// against `file_size` and the resource's current `etag`.
pub fn resolve_range(
    range_header: Option<&str>,
    if_range_header: Option<&str>,
    file_size: u64,
    etag: &str,
) -> RangeOutcome {
    let Some(header) = range_header else { return RangeOutcome::Full };

    if let Some(if_range) = if_range_header {
        if if_range != etag {
            return RangeOutcome::Full;
        }
    }

    let Some((start, end)) = parse_range(header) else { return RangeOutcome::Full };

    if start >= file_size {
        return RangeOutcome::Unsatisfiable;
    }

    let end = end.unwrap_or(file_size - 1).min(file_size - 1);
    RangeOutcome::Partial(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_open_ended_range() {
        assert_eq!(parse_range("bytes=6-"), Some((6, None)));
    }

    #[test]
    fn parses_closed_range() {
        assert_eq!(parse_range("bytes=0-4"), Some((0, Some(4))));
    }

    #[test]
    fn rejects_unsupported_forms() {
        assert_eq!(parse_range("bytes=-5"), None);
        assert_eq!(parse_range("nonsense"), None);
    }

    #[test]
    fn open_ended_range_clamped_to_eof() {
        match resolve_range(Some("bytes=6-"), None, 11, "a.bin-11-0") {
            RangeOutcome::Partial(r) => assert_eq!(r, ByteRange { start: 6, end: 10 }),
            _ => panic!("expected partial range"),
        }
    }

    #[test]
    fn start_beyond_eof_is_unsatisfiable() {
        assert!(matches!(
            resolve_range(Some("bytes=100-"), None, 11, "etag"),
            RangeOutcome::Unsatisfiable
        ));
    }

    #[test]
    fn stale_if_range_falls_back_to_full() {
        assert!(matches!(
            resolve_range(Some("bytes=0-4"), Some("stale-etag"), 11, "a.bin-11-0"),
            RangeOutcome::Full
        ));
    }

    #[test]
    fn missing_range_header_is_full() {
        assert!(matches!(resolve_range(None, None, 11, "etag"), RangeOutcome::Full));
    }
}
