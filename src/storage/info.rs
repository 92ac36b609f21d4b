//! Metadata recorded for each stored file.

/// A stored file's metadata. The URL is derived once at creation as
/// `download_prefix ∥ basename(storage_path)` and never recomputed —
/// updates replace the row by primary key rather than mutate it in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageInfo {
    pub url: String,
    pub storage_path: String,
    pub atime: i64,
    pub mtime: i64,
    pub size: i64,
}

impl StorageInfo {
    pub fn new(storage_path: String, atime: i64, mtime: i64, size: i64, download_prefix: &str) -> Self {
        let basename = std::path::Path::new(&storage_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| storage_path.clone());
        let url = format!("{download_prefix}{basename}");
        StorageInfo { url, storage_path, atime, mtime, size }
    }

    pub fn basename(&self) -> String {
        std::path::Path::new(&self.storage_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.storage_path.clone())
    }

    /// `basename-size-mtime`, depends only on those three fields.
    pub fn etag(&self) -> String {
        format!("{}-{}-{}", self.basename(), self.size, self.mtime)
    }
}

/// Iteratively divides by 1024 while the value is >= 1024 and the unit
/// hasn't hit GB yet, rendering with exactly two decimal places.
pub fn format_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < 3 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etag_depends_only_on_basename_size_mtime() {
        let a = StorageInfo::new("deep/a.bin".into(), 1, 2, 11, "/download/");
        let b = StorageInfo::new("other/a.bin".into(), 999, 2, 11, "/download/");
        assert_eq!(a.etag(), b.etag());
        assert_eq!(a.etag(), "a.bin-11-2");
    }

    #[test]
    fn url_is_prefix_plus_basename() {
        let info = StorageInfo::new("low/dir/a.bin".into(), 0, 0, 0, "/download/");
        assert_eq!(info.url, "/download/a.bin");
    }

    #[test]
    fn format_size_caps_at_gb() {
        assert_eq!(format_size(512), "512.00 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024 * 1024), "5120.00 GB");
    }
}
