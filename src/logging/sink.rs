//! Sink implementations: stdout, a single append-mode file, and a
//! byte-count-triggered rolling file.
//!
//! `flush_log` controls how aggressively a file-backed sink escalates past
//! the OS write buffer: `0` performs neither `flush` nor `fsync` (pure
//! buffered writeback), `1` flushes user-space buffers to the kernel, `2`
//! additionally fsyncs kernel buffers to disk.

use chrono::Local;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Escalation level applied after every successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushMode {
    None,
    Flush,
    FlushAndSync,
}

impl FlushMode {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => FlushMode::None,
            2 => FlushMode::FlushAndSync,
            _ => FlushMode::Flush,
        }
    }
}

/// A single log output destination. `flush` never panics and never
/// propagates errors; failures are reported to stderr, matching the
/// engine-wide policy that a sink failure must not crash the process.
pub trait Sink: Send {
    fn flush(&self, bytes: &[u8]);
}

pub struct StdoutSink;

impl Sink for StdoutSink {
    fn flush(&self, bytes: &[u8]) {
        let mut stdout = io::stdout().lock();
        if stdout.write_all(bytes).is_err() {
            return;
        }
        let _ = stdout.flush();
    }
}

fn write_escalating(file: &mut File, bytes: &[u8], mode: FlushMode) -> io::Result<()> {
    file.write_all(bytes)?;
    match mode {
        FlushMode::None => {}
        FlushMode::Flush => file.flush()?,
        FlushMode::FlushAndSync => {
            file.flush()?;
            file.sync_data()?;
        }
    }
    Ok(())
}

/// Appends to one file for the sink's lifetime.
pub struct FileSink {
    file: Mutex<File>,
    mode: FlushMode,
    path: PathBuf,
}

impl FileSink {
    pub fn open(path: impl AsRef<Path>, mode: FlushMode) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(FileSink { file: Mutex::new(file), mode, path })
    }
}

impl Sink for FileSink {
    fn flush(&self, bytes: &[u8]) {
        let mut file = self.file.lock();
        if let Err(err) = write_escalating(&mut file, bytes, self.mode) {
            eprintln!("log sink: write to {} failed: {err}", self.path.display());
        }
    }
}

/// Rotates to a new file once the running byte count exceeds
/// `max_bytes_per_file`. The first file is opened lazily on the first
/// `flush` call, so a rolling sink with zero log volume never touches disk.
pub struct RollingFileSink {
    dir: PathBuf,
    max_bytes_per_file: u64,
    mode: FlushMode,
    inner: Mutex<RollingState>,
}

struct RollingState {
    file: Option<File>,
    cur_bytes: u64,
    seq: u64,
}

impl RollingFileSink {
    pub fn new(dir: impl AsRef<Path>, max_bytes_per_file: u64, mode: FlushMode) -> Self {
        RollingFileSink {
            dir: dir.as_ref().to_path_buf(),
            max_bytes_per_file,
            mode,
            inner: Mutex::new(RollingState { file: None, cur_bytes: 0, seq: 0 }),
        }
    }

    fn next_name(&self, seq: u64) -> PathBuf {
        let stamp = Local::now().format("%Y-%m-%d_%H:%M%S");
        self.dir.join(format!("LOG_{stamp}-{seq}.log"))
    }

    fn rotate(&self, state: &mut RollingState) -> io::Result<()> {
        state.seq += 1;
        let name = self.next_name(state.seq);
        let file = OpenOptions::new().create(true).append(true).open(&name)?;
        state.file = Some(file);
        state.cur_bytes = 0;
        Ok(())
    }
}

impl Sink for RollingFileSink {
    fn flush(&self, bytes: &[u8]) {
        let mut state = self.inner.lock();
        if state.file.is_none() {
            if let Err(err) = self.rotate(&mut state) {
                eprintln!("log sink: failed to open first rolling file: {err}");
                return;
            }
        } else if state.cur_bytes > self.max_bytes_per_file {
            if let Err(err) = self.rotate(&mut state) {
                eprintln!("log sink: rotation failed, dropping record: {err}");
                return;
            }
        }

        let len = bytes.len() as u64;
        let result = {
            let file = state.file.as_mut().expect("rolling file opened above");
            write_escalating(file, bytes, self.mode)
        };
        match result {
            Ok(()) => state.cur_bytes += len,
            Err(err) => eprintln!("log sink: write failed: {err}"),
        }
    }
}
