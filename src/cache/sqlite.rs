use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;

use crate::paths;
use crate::translation::TranslationRequest;

/// Persistent store of successful fragment translations, keyed per provider.
#[derive(Debug, Clone)]
pub struct CacheManager {
    db_path: PathBuf,
}

impl CacheManager {
    /// Opens the cache at `$XDG_CACHE_HOME/simplify/translations.db`.
    pub fn new() -> Result<Self> {
        let db_path = paths::cache_db();

        if let Some(cache_dir) = db_path.parent() {
            std::fs::create_dir_all(cache_dir).with_context(|| {
                format!("Failed to create cache directory: {}", cache_dir.display())
            })?;
        }

        Self::open(db_path)
    }

    pub fn open(db_path: PathBuf) -> Result<Self> {
        let manager = Self { db_path };
        manager.init_db()?;
        Ok(manager)
    }

    fn init_db(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS translations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                cache_key TEXT UNIQUE NOT NULL,
                source_text TEXT NOT NULL,
                translated_text TEXT NOT NULL,
                source_language TEXT NOT NULL,
                target_language TEXT NOT NULL,
                provider TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                accessed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )
        .context("Failed to create translations table")?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_cache_key ON translations(cache_key)",
            [],
        )
        .context("Failed to create index")?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .with_context(|| format!("Failed to open cache database: {}", self.db_path.display()))
    }

    pub fn get(&self, cache_key: &str) -> Result<Option<String>> {
        let conn = self.connect()?;

        let result: Option<String> = conn
            .query_row(
                "SELECT translated_text FROM translations WHERE cache_key = ?1",
                [cache_key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query translation cache")?;

        if result.is_some() {
            conn.execute(
                "UPDATE translations SET accessed_at = CURRENT_TIMESTAMP WHERE cache_key = ?1",
                [cache_key],
            )?;
        }

        Ok(result)
    }

    pub fn put(
        &self,
        cache_key: &str,
        request: &TranslationRequest,
        provider: &str,
        translated_text: &str,
    ) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "INSERT OR REPLACE INTO translations
             (cache_key, source_text, translated_text, source_language, target_language, provider)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            [
                cache_key,
                request.source_text.as_str(),
                translated_text,
                request.source_language.code(),
                request.target_language.code(),
                provider,
            ],
        )
        .context("Failed to insert translation into cache")?;

        Ok(())
    }
}
