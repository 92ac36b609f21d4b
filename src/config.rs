//! Typed views over the two JSON configuration documents.
//!
//! Loading fails closed: any required storage field that is zero or empty
//! is a constructor error, never a panic, matching the error taxonomy's
//! rule that configuration problems are fatal at startup.

use crate::utils::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub server_port: u16,
    pub server_ip: String,
    pub download_prefix: String,
    pub deep_storage_dir: String,
    pub low_storage_dir: String,
    pub storage_info: String,
}

impl StorageConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.as_ref().display())))?;
        let cfg: StorageConfig = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(Error::Config("server_port must be nonzero".into()));
        }
        for (name, value) in [
            ("server_ip", &self.server_ip),
            ("download_prefix", &self.download_prefix),
            ("deep_storage_dir", &self.deep_storage_dir),
            ("low_storage_dir", &self.low_storage_dir),
            ("storage_info", &self.storage_info),
        ] {
            if value.is_empty() {
                return Err(Error::Config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

fn default_buffer_size() -> u64 {
    4 * 1024 * 1024
}
fn default_threshold() -> u64 {
    1024
}
fn default_linear_growth() -> u64 {
    1024 * 1024
}
fn default_flush_log() -> u8 {
    1
}
fn default_backup_addr() -> String {
    "127.0.0.1".to_string()
}
fn default_backup_port() -> u16 {
    8080
}
fn default_thread_count() -> u64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_buffer_size")]
    pub buffer_size: u64,
    #[serde(default = "default_threshold")]
    pub threshold: u64,
    #[serde(default = "default_linear_growth")]
    pub linear_growth: u64,
    #[serde(default = "default_flush_log")]
    pub flush_log: u8,
    #[serde(default = "default_backup_addr")]
    pub backup_addr: String,
    #[serde(default = "default_backup_port")]
    pub backup_port: u16,
    #[serde(default = "default_thread_count")]
    pub thread_count: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            buffer_size: default_buffer_size(),
            threshold: default_threshold(),
            linear_growth: default_linear_growth(),
            flush_log: default_flush_log(),
            backup_addr: default_backup_addr(),
            backup_port: default_backup_port(),
            thread_count: default_thread_count(),
        }
    }
}

impl LogConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        match fs::read_to_string(path.as_ref()) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(_) => Ok(LogConfig::default()),
        }
    }

    pub fn backup_address(&self) -> String {
        format!("{}:{}", self.backup_addr, self.backup_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn storage_config_rejects_zero_port() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server_port":0,"server_ip":"0.0.0.0","download_prefix":"/d/","deep_storage_dir":"deep","low_storage_dir":"low","storage_info":"meta.db"}}"#
        )
        .unwrap();
        assert!(StorageConfig::load(file.path()).is_err());
    }

    #[test]
    fn storage_config_loads_valid_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server_port":9000,"server_ip":"0.0.0.0","download_prefix":"/download/","deep_storage_dir":"deep","low_storage_dir":"low","storage_info":"meta.db"}}"#
        )
        .unwrap();
        let cfg = StorageConfig::load(file.path()).unwrap();
        assert_eq!(cfg.server_port, 9000);
    }

    #[test]
    fn log_config_falls_back_to_defaults_when_missing() {
        let cfg = LogConfig::load("/nonexistent/log_config.conf").unwrap();
        assert_eq!(cfg.buffer_size, default_buffer_size());
        assert_eq!(cfg.flush_log, 1);
    }

    #[test]
    fn log_config_partial_document_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"flush_log": 2}}"#).unwrap();
        let cfg = LogConfig::load(file.path()).unwrap();
        assert_eq!(cfg.flush_log, 2);
        assert_eq!(cfg.thread_count, 1);
    }
}
