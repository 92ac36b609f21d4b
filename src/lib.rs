//! # cratehold - Self-Hosted Object Storage with an Embedded Async Logger
//!
//! `cratehold` is a small object storage service: upload files to a "low"
//! (verbatim) or "deep" (compressed) tier, fetch them back with HTTP range
//! support, and browse them through a generated HTML listing. The service
//! is built on its own asynchronous logging engine rather than a bolted-on
//! operational logger — the same `Logger`/`Manager` the storage handlers
//! call into is the subject this crate exists to implement well.
//!
//! ## Architecture
//!
//! - `logging`: the double-buffered async log pipeline, sinks, and the
//!   process-wide logger registry
//! - `task_pool`: bounded FIFO worker pool used for off-thread error backup
//!   shipping
//! - `storage`: file operations, compression, and the embedded metadata
//!   store
//! - `http`: request routing and the upload/download/list handlers
//! - `config`: typed views over `Storage.conf` and `log_config.conf`
//! - `utils`: shared error type

pub mod config;
pub mod http;
pub mod logging;
pub mod storage;
pub mod task_pool;
pub mod utils;
