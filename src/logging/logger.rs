//! `Logger`: fans a formatted record out to an [`AsyncWorker`] and, for
//! `ERROR`/`FATAL` records, to a backup [`TaskPool`] task.

use super::level::Level;
use super::record::LogRecord;
use super::ring_buffer::BufferConfig;
use super::sink::{FlushMode, Sink, StdoutSink};
use super::worker::{AsyncWorker, BufferPolicy};
use crate::task_pool::TaskPool;
use smallvec::SmallVec;
use std::io::Write;
use std::net::TcpStream;
use std::sync::Arc;

/// Most loggers register one or two sinks (a console sink plus a file
/// sink); inline storage avoids a heap allocation for that common case.
type SinkList = SmallVec<[Box<dyn Sink>; 2]>;

pub struct Logger {
    name: String,
    worker: AsyncWorker,
    backup_pool: Option<Arc<TaskPool>>,
    backup_addr: Option<String>,
}

impl Logger {
    fn log(&self, level: Level, source_file: &'static str, source_line: u32, payload: String) {
        let record = LogRecord::new(level, &self.name, source_file, source_line, payload);
        let bytes = record.serialize();
        self.worker.push(bytes.as_bytes());

        if level.is_backed_up() {
            if let (Some(pool), Some(addr)) = (&self.backup_pool, &self.backup_addr) {
                let addr = addr.clone();
                let bytes = bytes.into_bytes();
                pool.enqueue(move || {
                    if let Ok(mut stream) = TcpStream::connect(&addr) {
                        let _ = stream.write_all(&bytes);
                    }
                });
            }
        }
    }

    pub fn debug(&self, file: &'static str, line: u32, msg: impl Into<String>) {
        self.log(Level::Debug, file, line, msg.into());
    }
    pub fn info(&self, file: &'static str, line: u32, msg: impl Into<String>) {
        self.log(Level::Info, file, line, msg.into());
    }
    pub fn warn(&self, file: &'static str, line: u32, msg: impl Into<String>) {
        self.log(Level::Warn, file, line, msg.into());
    }
    pub fn error(&self, file: &'static str, line: u32, msg: impl Into<String>) {
        self.log(Level::Error, file, line, msg.into());
    }
    pub fn fatal(&self, file: &'static str, line: u32, msg: impl Into<String>) {
        self.log(Level::Fatal, file, line, msg.into());
    }
}

/// Convenience macro so call sites don't have to spell out `file!()`/`line!()`.
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(file!(), line!(), format!($($arg)*))
    };
}
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(file!(), line!(), format!($($arg)*))
    };
}
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.error(file!(), line!(), format!($($arg)*))
    };
}

pub struct LoggerBuilder {
    name: String,
    sinks: SinkList,
    buffer_config: BufferConfig,
    buffer_policy: BufferPolicy,
    backup_pool: Option<Arc<TaskPool>>,
    backup_addr: Option<String>,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        LoggerBuilder {
            name: name.into(),
            sinks: SinkList::new(),
            buffer_config: BufferConfig::default(),
            buffer_policy: BufferPolicy::Unlimited,
            backup_pool: None,
            backup_addr: None,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_buffer_config(mut self, config: BufferConfig) -> Self {
        self.buffer_config = config;
        self
    }

    pub fn with_buffer_policy(mut self, policy: BufferPolicy) -> Self {
        self.buffer_policy = policy;
        self
    }

    pub fn with_backup(mut self, pool: Arc<TaskPool>, addr: String) -> Self {
        self.backup_pool = Some(pool);
        self.backup_addr = Some(addr);
        self
    }

    pub fn build(mut self) -> Logger {
        if self.sinks.is_empty() {
            self.sinks.push(Box::new(StdoutSink));
        }
        let sinks: SinkList = self.sinks;
        let worker = AsyncWorker::new(self.buffer_config, self.buffer_policy, move |bytes| {
            for sink in &sinks {
                sink.flush(bytes);
            }
        });
        Logger {
            name: self.name,
            worker,
            backup_pool: self.backup_pool,
            backup_addr: self.backup_addr,
        }
    }
}

/// Flush-mode-from-config helper shared by sink construction call sites.
pub fn flush_mode_from_config(flush_log: u8) -> FlushMode {
    FlushMode::from_u8(flush_log)
}
