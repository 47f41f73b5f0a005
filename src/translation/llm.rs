use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::borrow::Cow;

use super::prompt::{SYSTEM_PROMPT_TEMPLATE, build_system_prompt};
use super::sse_parser::sse_to_text_stream;
use super::{Language, Translator};
use crate::error::ServiceError;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

/// Translator backed by an OpenAI-compatible chat-completions provider.
pub struct LlmTranslator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl LlmTranslator {
    pub fn new(endpoint: String, model: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            model,
            api_key,
        }
    }

    /// Hash of the system prompt template, so cached entries expire when it changes.
    fn prompt_hash() -> String {
        let mut hasher = Sha256::new();
        hasher.update(SYSTEM_PROMPT_TEMPLATE.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(
        &self,
        text: &str,
        source: Option<Language>,
        target: Language,
    ) -> Result<String, ServiceError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/')
        );

        let chat_request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: Cow::Owned(build_system_prompt(source, target)),
                },
                Message {
                    role: "user",
                    content: Cow::Borrowed(text),
                },
            ],
            stream: true,
        };

        tracing::debug!(%url, model = %self.model, to = target.code(), "translating via provider");

        let mut http_request = self.client.post(&url).json(&chat_request);

        if let Some(api_key) = &self.api_key {
            http_request = http_request.bearer_auth(api_key);
        }

        let response = http_request.send().await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response("translation provider", response).await);
        }

        let mut stream = std::pin::pin!(sse_to_text_stream(response.bytes_stream()));
        let mut translated = String::new();

        while let Some(chunk) = stream.next().await {
            translated.push_str(&chunk?);
        }

        Ok(translated.trim().to_string())
    }

    fn backend_id(&self) -> String {
        format!(
            "provider:{}:{}:{}",
            self.endpoint,
            self.model,
            Self::prompt_hash()
        )
    }
}
