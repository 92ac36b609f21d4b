//! A single formatted log record.

use super::level::Level;
use chrono::Local;

/// An immutable, fully-formatted log entry.
///
/// Records are rendered to their wire form once, at construction, and handed
/// to the worker as bytes — the ring buffer never needs to know about
/// [`Level`] or timestamps again.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: Level,
    pub logger_name: String,
    pub source_file: &'static str,
    pub source_line: u32,
    pub payload: String,
}

impl LogRecord {
    pub fn new(
        level: Level,
        logger_name: &str,
        source_file: &'static str,
        source_line: u32,
        payload: String,
    ) -> Self {
        LogRecord {
            level,
            logger_name: logger_name.to_string(),
            source_file,
            source_line,
            payload,
        }
    }

    /// Renders `[timestamp][tid][LEVEL][name][file:line]\tpayload\n`.
    pub fn serialize(&self) -> String {
        let tid = thread_id();
        format!(
            "[{}][{}][{}][{}][{}:{}]\t{}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            tid,
            self.level,
            self.logger_name,
            self.source_file,
            self.source_line,
            self.payload,
        )
    }
}

fn thread_id() -> String {
    format!("{:?}", std::thread::current().id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_contains_all_fields() {
        let rec = LogRecord::new(Level::Info, "main", "service.rs", 42, "hello".to_string());
        let line = rec.serialize();
        assert!(line.contains("[INFO]"));
        assert!(line.contains("[main]"));
        assert!(line.contains("service.rs:42"));
        assert!(line.contains("\thello"));
        assert!(line.ends_with('\n'));
    }
}
