use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::Connection;
use sha2::{Digest, Sha256};

/// An access code as it sits in the store. The code itself is never kept,
/// only its digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCode {
    pub digest: String,
    pub label: String,
    pub created: String,
}

impl StoredCode {
    /// First eight hex characters of the digest, enough to tell codes apart.
    pub fn short_digest(&self) -> &str {
        &self.digest[..self.digest.len().min(8)]
    }
}

/// SHA-256 of a trimmed access code, hex encoded.
pub fn digest_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.trim().as_bytes()))
}

/// Access codes kept in SQLite.
///
/// Shares a database with [`Config`](crate::config::Config). Pass the same
/// path to both.
pub struct AccessCodeStore {
    conn: Mutex<Connection>,
}

impl AccessCodeStore {
    /// Open or create the access code table in the given database path.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open access code database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS access_codes (
                digest  TEXT PRIMARY KEY,
                label   TEXT NOT NULL,
                created TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .context("failed to create access_codes table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Store a code (upsert). Re-adding a code replaces its label.
    pub fn add(&self, code: &str, label: &str) -> Result<()> {
        let digest = digest_code(code);
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO access_codes (digest, label) VALUES (?1, ?2)
             ON CONFLICT(digest) DO UPDATE SET label = excluded.label",
            [digest.as_str(), label],
        )?;
        Ok(())
    }

    /// Remove a code. Returns whether anything was deleted.
    pub fn remove(&self, code: &str) -> Result<bool> {
        let digest = digest_code(code);
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute("DELETE FROM access_codes WHERE digest = ?1", [&digest])?;
        Ok(removed > 0)
    }

    pub fn contains(&self, code: &str) -> Result<bool> {
        let digest = digest_code(code);
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT 1 FROM access_codes WHERE digest = ?1")?;
        Ok(stmt.exists([&digest])?)
    }

    /// All stored codes, oldest first.
    pub fn list(&self) -> Result<Vec<StoredCode>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT digest, label, created FROM access_codes ORDER BY created ASC, rowid ASC",
        )?;
        let codes = stmt
            .query_map([], |row| {
                Ok(StoredCode {
                    digest: row.get(0)?,
                    label: row.get(1)?,
                    created: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(codes)
    }

    pub fn is_empty(&self) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM access_codes", [], |row| row.get(0))?;
        Ok(count == 0)
    }
}
