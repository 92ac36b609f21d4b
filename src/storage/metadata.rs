//! Embedded metadata store (SQLite via `rusqlite`, bundled).
//!
//! All operations take the store's single connection lock — `rusqlite::Connection`
//! is not `Sync`, so a shared lock can't give true concurrent readers here.
//! `insert`/`update` both upsert by primary key — a `StorageInfo` is always
//! replaced wholesale, never mutated field-by-field.

use super::info::StorageInfo;
use crate::utils::error::Result;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::path::Path;

pub struct MetadataStore {
    conn: Mutex<Connection>,
}

impl MetadataStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS tem_table (
                url          TEXT PRIMARY KEY,
                atime        INTEGER NOT NULL,
                mtime        INTEGER NOT NULL,
                storage_path TEXT NOT NULL UNIQUE,
                file_size    INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_storage_path ON tem_table(storage_path)",
            [],
        )?;
        Ok(MetadataStore { conn: Mutex::new(conn) })
    }

    pub fn in_memory() -> Result<Self> {
        MetadataStore::open(":memory:")
    }

    pub fn insert(&self, info: &StorageInfo) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO tem_table (url, atime, mtime, storage_path, file_size)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![info.url, info.atime, info.mtime, info.storage_path, info.size],
        )?;
        Ok(())
    }

    pub fn update(&self, info: &StorageInfo) -> Result<()> {
        self.insert(info)
    }

    pub fn get_by_url(&self, url: &str) -> Result<Option<StorageInfo>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT url, atime, mtime, storage_path, file_size FROM tem_table WHERE url = ?1",
        )?;
        let mut rows = stmt.query(params![url])?;
        match rows.next()? {
            Some(row) => Ok(Some(row_to_info(row)?)),
            None => Ok(None),
        }
    }

    pub fn get_by_storage_path(&self, storage_path: &str) -> Result<Option<StorageInfo>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT url, atime, mtime, storage_path, file_size FROM tem_table WHERE storage_path = ?1",
        )?;
        let mut rows = stmt.query(params![storage_path])?;
        match rows.next()? {
            Some(row) => Ok(Some(row_to_info(row)?)),
            None => Ok(None),
        }
    }

    pub fn get_all(&self) -> Result<Vec<StorageInfo>> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT url, atime, mtime, storage_path, file_size FROM tem_table")?;
        let rows = stmt.query_map([], row_to_info)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn delete_by_url(&self, url: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let affected = conn.execute("DELETE FROM tem_table WHERE url = ?1", params![url])?;
        Ok(affected > 0)
    }
}

fn row_to_info(row: &rusqlite::Row) -> rusqlite::Result<StorageInfo> {
    Ok(StorageInfo {
        url: row.get(0)?,
        atime: row.get(1)?,
        mtime: row.get(2)?,
        storage_path: row.get(3)?,
        size: row.get(4)?,
    })
}
