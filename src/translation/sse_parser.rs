//! Server-Sent Events (SSE) parser for OpenAI-compatible streaming responses.

use bytes::Bytes;
use futures_util::Stream;
use serde::Deserialize;

use crate::error::ServiceError;

#[derive(Debug, Deserialize)]
struct StreamResponse {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

/// Converts a raw SSE byte stream into a stream of text chunks.
///
/// Stops at the `data: [DONE]` marker. A transport error ends the stream after
/// being yielded, since the remaining bytes can no longer be trusted.
pub fn sse_to_text_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<String, ServiceError>> + Send {
    async_stream::stream! {
        use futures_util::StreamExt;

        let mut byte_stream = std::pin::pin!(byte_stream);
        // Bytes, not text: a chunk may end inside a multi-byte character.
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
                let line = String::from_utf8_lossy(&raw);

                if let Some(content) = parse_sse_line(line.trim()) {
                    yield Ok(content);
                } else if line.trim() == "data: [DONE]" {
                    return;
                }
            }
        }

        if let Some(content) = parse_sse_line(String::from_utf8_lossy(&buffer).trim()) {
            yield Ok(content);
        }
    }
}

/// Parses a single SSE line and extracts the text content.
///
/// Returns `None` for non-data lines, empty content, the done marker and
/// malformed JSON.
fn parse_sse_line(line: &str) -> Option<String> {
    let json_str = line.strip_prefix("data: ")?;

    let response = serde_json::from_str::<StreamResponse>(json_str).ok()?;

    let content: String = response
        .choices
        .into_iter()
        .filter_map(|c| c.delta.content)
        .filter(|c| !c.is_empty())
        .collect();

    if content.is_empty() {
        None
    } else {
        Some(content)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures_util::{StreamExt, stream};

    #[test]
    fn test_parse_sse_line_with_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#;
        assert_eq!(parse_sse_line(line), Some("Hello".to_string()));
    }

    #[test]
    fn test_parse_sse_line_with_null_content() {
        let line = r#"data: {"choices":[{"delta":{}}]}"#;
        assert_eq!(parse_sse_line(line), None);
    }

    #[test]
    fn test_parse_sse_line_multiple_choices() {
        let line =
            r#"data: {"choices":[{"delta":{"content":"नम"}},{"delta":{"content":"स्कार"}}]}"#;
        assert_eq!(parse_sse_line(line), Some("नमस्कार".to_string()));
    }

    #[test]
    fn test_parse_sse_line_done_and_comment() {
        assert_eq!(parse_sse_line("data: [DONE]"), None);
        assert_eq!(parse_sse_line(": keep-alive"), None);
        assert_eq!(parse_sse_line(""), None);
    }

    #[tokio::test]
    async fn test_stream_handles_split_chunks_and_done() {
        let chunks: Vec<reqwest::Result<Bytes>> = vec![
            Ok(Bytes::from("data: {\"choices\":[{\"delta\":{\"content\":\"Soy\"}}]}\n\ndata: {\"choi")),
            Ok(Bytes::from("ces\":[{\"delta\":{\"content\":\"bean\"}}]}\n")),
            Ok(Bytes::from("data: [DONE]\n")),
            Ok(Bytes::from("data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n")),
        ];

        let collected: Vec<String> = sse_to_text_stream(stream::iter(chunks))
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(collected, vec!["Soy".to_string(), "bean".to_string()]);
    }

    #[tokio::test]
    async fn test_stream_keeps_characters_split_across_chunks() {
        let line = "data: {\"choices\":[{\"delta\":{\"content\":\"हवामान\"}}]}\n".as_bytes();
        // Cut after the first byte of the first Devanagari letter
        let cut = line.iter().position(|&b| b >= 0x80).unwrap() + 1;
        let chunks: Vec<reqwest::Result<Bytes>> = vec![
            Ok(Bytes::copy_from_slice(&line[..cut])),
            Ok(Bytes::copy_from_slice(&line[cut..])),
        ];

        let collected: Vec<String> = sse_to_text_stream(stream::iter(chunks))
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(collected, vec!["हवामान".to_string()]);
    }

    #[tokio::test]
    async fn test_stream_keeps_split_character_in_trailing_line() {
        let line = "data: {\"choices\":[{\"delta\":{\"content\":\"₹5000\"}}]}".as_bytes();
        let cut = line.iter().position(|&b| b >= 0x80).unwrap() + 2;
        let chunks: Vec<reqwest::Result<Bytes>> = vec![
            Ok(Bytes::copy_from_slice(&line[..cut])),
            Ok(Bytes::copy_from_slice(&line[cut..])),
        ];

        let collected: Vec<String> = sse_to_text_stream(stream::iter(chunks))
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(collected, vec!["₹5000".to_string()]);
    }
}
