//! Parser for the newline-delimited JSON event stream of a chat conversation.

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;

use crate::error::ServiceError;

/// One event of a streamed answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChatEvent {
    /// A token of the answer as it is generated.
    Stream { token: String },
    /// The complete answer; ends the exchange.
    FinalAnswer { text: String },
    /// Status updates, titles, web-search progress and the like.
    #[serde(other)]
    Other,
}

/// Converts the raw response bytes into parsed events.
///
/// Lines that are not valid JSON events are skipped. A trailing line without
/// a newline is still parsed once the body ends.
pub fn ndjson_to_events(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<ChatEvent, ServiceError>> + Send {
    async_stream::stream! {
        let mut byte_stream = std::pin::pin!(byte_stream);
        // Only complete lines are decoded, so split characters survive.
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(ServiceError::Http(e));
                    return;
                }
            };

            buffer.extend_from_slice(&chunk);

            while let Some(line_end) = buffer.iter().position(|&b| b == b'\n') {
                let raw: Vec<u8> = buffer.drain(..=line_end).collect();
                if let Some(event) = parse_event_line(&String::from_utf8_lossy(&raw)) {
                    yield Ok(event);
                }
            }
        }

        if let Some(event) = parse_event_line(&String::from_utf8_lossy(&buffer)) {
            yield Ok(event);
        }
    }
}

fn parse_event_line(line: &str) -> Option<ChatEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match serde_json::from_str::<ChatEvent>(line) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!("skipping unparseable chat event: {e}");
            None
        }
    }
}

/// Drains an event stream into the answer text.
///
/// Prefers the final answer; falls back to the concatenated tokens if the
/// stream ends without one. NUL padding is stripped either way.
pub async fn collect_answer(
    events: impl Stream<Item = Result<ChatEvent, ServiceError>>,
) -> Result<String, ServiceError> {
    let mut events = std::pin::pin!(events);
    let mut tokens = String::new();

    while let Some(event) = events.next().await {
        match event? {
            ChatEvent::Stream { token } => tokens.push_str(&token),
            ChatEvent::FinalAnswer { text } => return Ok(clean(&text)),
            ChatEvent::Other => {}
        }
    }

    Ok(clean(&tokens))
}

fn clean(text: &str) -> String {
    text.replace('\0', "").trim().to_string()
}
