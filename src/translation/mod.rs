//! Translation backends.
//!
//! The router only sees the [`Translator`] trait; the concrete backend is
//! either the public Google endpoint or an OpenAI-compatible provider.

use async_trait::async_trait;

use crate::error::ServiceError;

mod cached;
mod google;
mod language;
mod llm;
mod prompt;
mod sse_parser;

pub use cached::CachedTranslator;
pub use google::{DEFAULT_GOOGLE_ENDPOINT, GoogleTranslator};
pub use language::{Language, SUPPORTED_LANGUAGES, print_languages};
pub use llm::LlmTranslator;

/// Translates text between session languages.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translates `text` into `target`. A `source` of `None` asks the backend
    /// to detect the source language.
    async fn translate(
        &self,
        text: &str,
        source: Option<Language>,
        target: Language,
    ) -> Result<String, ServiceError>;

    /// Stable identifier of the backend and its settings, used in cache keys.
    fn backend_id(&self) -> String;
}

/// Returns the code sent to backends for a possibly unknown source language.
pub fn source_code(source: Option<Language>) -> &'static str {
    source.map_or("auto", Language::code)
}
