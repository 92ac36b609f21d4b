//! File-level operations bound to one path: metadata, positional reads,
//! whole-file writes, and compression, all returning `bool`/`Option` rather
//! than propagating errors — callers are HTTP handlers that convert a
//! failure straight into a status code.

use super::compressor::Compressor;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

pub struct FileOps {
    path: PathBuf,
}

impl FileOps {
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileOps { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn basename(&self) -> String {
        self.path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
    }

    /// `-1` on error, matching the original's `time_t`/`int64_t` convention.
    pub fn size(&self) -> i64 {
        fs::metadata(&self.path).map(|m| m.len() as i64).unwrap_or(-1)
    }

    pub fn mtime(&self) -> i64 {
        fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or(-1)
    }

    pub fn atime(&self) -> i64 {
        fs::metadata(&self.path)
            .and_then(|m| m.accessed())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or(-1)
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn create_dir(&self) -> bool {
        if self.path.is_file() {
            return false;
        }
        if self.exists() {
            return true;
        }
        fs::create_dir_all(&self.path).is_ok()
    }

    /// Immediate regular-file children only, matching `scanDirectory`'s
    /// skip of subdirectories.
    pub fn scan_dir(&self) -> Option<Vec<PathBuf>> {
        if self.path.is_file() {
            return None;
        }
        let mut out = Vec::new();
        for entry in fs::read_dir(&self.path).ok()? {
            let entry = entry.ok()?;
            if entry.path().is_dir() {
                continue;
            }
            out.push(entry.path());
        }
        Some(out)
    }

    pub fn read_all(&self) -> Option<Vec<u8>> {
        fs::read(&self.path).ok()
    }

    /// Clears stream error state before seeking — without this, a prior
    /// read that hit EOF would permanently wedge later positional reads on
    /// the same handle.
    pub fn read_at(file: &mut File, pos: u64, len: usize) -> Option<Vec<u8>> {
        if len == 0 {
            return None;
        }
        file.seek(SeekFrom::Start(pos)).ok()?;
        let mut buf = vec![0u8; len];
        let read = file.read(&mut buf).ok()?;
        if read == 0 {
            return None;
        }
        buf.truncate(read);
        Some(buf)
    }

    /// Truncating, whole-buffer write. Fails on empty data (matches the
    /// original's `data==nullptr||len==0` guard).
    pub fn write_all(&self, data: &[u8]) -> bool {
        if data.is_empty() {
            return false;
        }
        let result = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(data));
        result.is_ok()
    }

    pub fn compress(&self, content: &[u8], level: u32, codec: &dyn Compressor) -> bool {
        match codec.compress(content, level) {
            Some(packed) => self.write_all(&packed),
            None => false,
        }
    }

    pub fn decompress(&self, dest_path: impl AsRef<Path>, codec: &dyn Compressor) -> bool {
        let Some(content) = self.read_all() else { return false };
        let Some(unpacked) = codec.decompress(&content) else { return false };
        FileOps::new(dest_path).write_all(&unpacked)
    }
}
