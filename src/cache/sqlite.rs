use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use crate::paths;

/// Identifies one translation: the text, the language pair and the backend.
#[derive(Debug, Clone)]
pub struct TranslationKey<'a> {
    pub text: &'a str,
    pub source: &'a str,
    pub target: &'a str,
    pub backend: &'a str,
}

impl TranslationKey<'_> {
    /// SHA-256 over the canonical JSON of all key fields.
    pub fn cache_key(&self) -> String {
        let cache_input = json!({
            "text": self.text,
            "source": self.source,
            "target": self.target,
            "backend": self.backend,
        });

        let mut hasher = Sha256::new();
        hasher.update(cache_input.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

pub struct TranslationCache {
    db_path: PathBuf,
}

impl TranslationCache {
    /// Opens (creating if needed) the cache under the user cache directory.
    pub fn new() -> Result<Self> {
        let cache_dir = paths::cache_dir()?;

        std::fs::create_dir_all(&cache_dir).with_context(|| {
            format!("Failed to create cache directory: {}", cache_dir.display())
        })?;

        Self::open(cache_dir.join("translations.db"))
    }

    pub fn open(db_path: PathBuf) -> Result<Self> {
        let cache = Self { db_path };
        cache.init_db()?;
        Ok(cache)
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
                backend TEXT NOT NULL,
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

    pub fn get(&self, key: &TranslationKey<'_>) -> Result<Option<String>> {
        let cache_key = key.cache_key();
        let conn = self.connect()?;

        let result: Option<String> = conn
            .query_row(
                "SELECT translated_text FROM translations WHERE cache_key = ?1",
                [&cache_key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query translation cache")?;

        if result.is_some() {
            conn.execute(
                "UPDATE translations SET accessed_at = CURRENT_TIMESTAMP WHERE cache_key = ?1",
                [&cache_key],
            )?;
        }

        Ok(result)
    }

    pub fn put(&self, key: &TranslationKey<'_>, translated_text: &str) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(
            "INSERT OR REPLACE INTO translations
             (cache_key, source_text, translated_text, source_language, target_language, backend)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                key.cache_key(),
                key.text,
                translated_text,
                key.source,
                key.target,
                key.backend,
            ],
        )
        .context("Failed to insert translation into cache")?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_cache(temp_dir: &TempDir) -> TranslationCache {
        TranslationCache::open(temp_dir.path().join("translations.db")).unwrap()
    }

    fn key<'a>(text: &'a str, target: &'a str, backend: &'a str) -> TranslationKey<'a> {
        TranslationKey {
            text,
            source: "auto",
            target,
            backend,
        }
    }

    #[test]
    fn test_cache_miss() {
        let temp_dir = TempDir::new().unwrap();
        let cache = create_test_cache(&temp_dir);

        let result = cache.get(&key("हवामान", "en", "google")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_cache_hit() {
        let temp_dir = TempDir::new().unwrap();
        let cache = create_test_cache(&temp_dir);
        let k = key("हवामान कसे आहे?", "en", "google");

        cache.put(&k, "How is the weather?").unwrap();

        assert_eq!(cache.get(&k).unwrap(), Some("How is the weather?".to_string()));
    }

    #[test]
    fn test_cache_key_includes_target_and_backend() {
        let temp_dir = TempDir::new().unwrap();
        let cache = create_test_cache(&temp_dir);

        let to_marathi = key("Hello", "mr", "google");
        let to_hindi = key("Hello", "hi", "google");
        let other_backend = key("Hello", "mr", "provider:ollama");

        cache.put(&to_marathi, "नमस्कार").unwrap();
        cache.put(&to_hindi, "नमस्ते").unwrap();

        assert_eq!(cache.get(&to_marathi).unwrap(), Some("नमस्कार".to_string()));
        assert_eq!(cache.get(&to_hindi).unwrap(), Some("नमस्ते".to_string()));
        assert!(cache.get(&other_backend).unwrap().is_none());
    }

    #[test]
    fn test_put_replaces_existing_entry() {
        let temp_dir = TempDir::new().unwrap();
        let cache = create_test_cache(&temp_dir);
        let k = key("Soybean", "hi", "google");

        cache.put(&k, "सोयाबीन").unwrap();
        cache.put(&k, "सोयाबीन (नया)").unwrap();

        assert_eq!(cache.get(&k).unwrap(), Some("सोयाबीन (नया)".to_string()));
    }

    #[test]
    fn test_reopen_keeps_entries() {
        let temp_dir = TempDir::new().unwrap();
        let k = key("rain", "mr", "google");

        create_test_cache(&temp_dir).put(&k, "पाऊस").unwrap();

        assert_eq!(
            create_test_cache(&temp_dir).get(&k).unwrap(),
            Some("पाऊस".to_string())
        );
    }
}
