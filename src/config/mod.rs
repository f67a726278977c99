//! Persistent settings backed by SQLite.
//!
//! Shares a database with [`AccessCodeStore`](crate::gate::AccessCodeStore).
//! Pass the same path to both.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use rusqlite::Connection;

/// Settings that can be stored with `parley config set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    WebhookUrl,
    AnswerField,
    Greeting,
}

impl ConfigKey {
    pub const ALL: &'static [ConfigKey] = &[
        ConfigKey::WebhookUrl,
        ConfigKey::AnswerField,
        ConfigKey::Greeting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::WebhookUrl => "webhook_url",
            ConfigKey::AnswerField => "answer_field",
            ConfigKey::Greeting => "greeting",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match ConfigKey::ALL.iter().find(|k| k.as_str() == s) {
            Some(key) => Ok(*key),
            None => {
                let known: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.as_str()).collect();
                bail!("unknown config key: {s} (known: {})", known.join(", "))
            }
        }
    }
}

/// Persistent key-value configuration store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the config table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open config database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create config table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn get(&self, key: ConfigKey) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM config WHERE key = ?1")?;
        let mut rows = stmt.query([key.as_str()])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Set a config value (upsert).
    pub fn set(&self, key: ConfigKey, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key.as_str(), value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: ConfigKey) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM config WHERE key = ?1", [key.as_str()])?;
        Ok(())
    }

    /// Pick the effective value: an explicit (flag or env) value wins, then
    /// the stored one, then `default`.
    pub fn resolve(&self, key: ConfigKey, explicit: Option<&str>, default: &str) -> Result<String> {
        if let Some(value) = explicit.filter(|v| !v.trim().is_empty()) {
            return Ok(value.to_string());
        }
        Ok(self.get(key)?.unwrap_or_else(|| default.to_string()))
    }
}
