use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{Language, Translator, source_code};
use crate::error::ServiceError;

pub const DEFAULT_GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Client for the public Google translate endpoint (no API key).
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source: Option<Language>,
        target: Language,
    ) -> Result<String, ServiceError> {
        tracing::debug!(
            from = source_code(source),
            to = target.code(),
            "translating via google"
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source_code(source)),
                ("tl", target.code()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::from_response("translator", response).await);
        }

        let body: Value = response.json().await?;
        parse_translation(&body)
    }

    fn backend_id(&self) -> String {
        format!("google:{}", self.endpoint)
    }
}

/// Extracts the translated text from the nested-array response.
///
/// The body looks like `[[["Hello ","नमस्ते ",...],["world","जग",...]],null,"mr",...]`;
/// the first element of every segment is concatenated.
fn parse_translation(body: &Value) -> Result<String, ServiceError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ServiceError::Parse("missing translation segments".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    Ok(text)
}
