//! Storage core: file operations, the pluggable compression codec, the
//! metadata store, and the `StorageInfo` value type they all share.

pub mod compressor;
pub mod file_ops;
pub mod info;
pub mod metadata;

pub use compressor::{Compressor, GzipCompressor};
pub use file_ops::FileOps;
pub use info::{format_size, StorageInfo};
pub use metadata::MetadataStore;
