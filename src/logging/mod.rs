//! The asynchronous logging engine: a double-buffered producer/consumer
//! pipeline that fans formatted records out to pluggable sinks, plus a
//! process-wide registry of named loggers.

pub mod level;
pub mod logger;
pub mod manager;
pub mod record;
pub mod ring_buffer;
pub mod sink;
pub mod worker;

pub use level::Level;
pub use logger::{Logger, LoggerBuilder};
pub use manager::Manager;
pub use ring_buffer::BufferConfig;
pub use sink::{FileSink, FlushMode, RollingFileSink, Sink, StdoutSink};
pub use worker::BufferPolicy;
