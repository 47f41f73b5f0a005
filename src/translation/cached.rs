use async_trait::async_trait;

use super::{Language, Translator, source_code};
use crate::cache::{TranslationCache, TranslationKey};
use crate::error::ServiceError;

/// Wraps a translator with the SQLite translation cache.
///
/// Cache failures are logged and otherwise ignored: the wrapped translator is
/// always the source of truth.
pub struct CachedTranslator {
    inner: Box<dyn Translator>,
    cache: TranslationCache,
}

impl CachedTranslator {
    pub fn new(inner: Box<dyn Translator>, cache: TranslationCache) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl Translator for CachedTranslator {
    async fn translate(
        &self,
        text: &str,
        source: Option<Language>,
        target: Language,
    ) -> Result<String, ServiceError> {
        let backend = self.inner.backend_id();
        let key = TranslationKey {
            text,
            source: source_code(source),
            target: target.code(),
            backend: &backend,
        };

        match self.cache.get(&key) {
            Ok(Some(cached)) => {
                tracing::debug!(to = target.code(), "translation cache hit");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("translation cache lookup failed: {e:#}"),
        }

        let translated = self.inner.translate(text, source, target).await?;

        if !translated.is_empty()
            && let Err(e) = self.cache.put(&key, &translated)
        {
            tracing::warn!("failed to store translation in cache: {e:#}");
        }

        Ok(translated)
    }

    fn backend_id(&self) -> String {
        self.inner.backend_id()
    }
}
