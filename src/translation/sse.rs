//! Server-Sent Events decoding for OpenAI-compatible streaming responses.

use bytes::Bytes;
use futures_util::Stream;
use serde::Deserialize;

use super::ProviderError;

#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<StreamError>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamError {
    message: String,
}

/// What a single SSE line carried.
#[derive(Debug, PartialEq, Eq)]
enum Event {
    Content(String),
    Error(String),
    Done,
}

/// Turns a raw SSE byte stream into a stream of text chunks.
///
/// Chunks may split lines, and characters, anywhere, so raw bytes are
/// buffered and only complete lines are decoded. The stream ends at
/// `data: [DONE]` or when the body ends.
pub fn text_chunks(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<String, ProviderError>> + Send {
    async_stream::stream! {
        use futures_util::StreamExt;

        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(ProviderError::Stream(e.to_string()));
                    return;
                }
            };

            buffer.extend_from_slice(&chunk);

            while let Some(line_end) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=line_end).collect();
                let line = match decode_line(line) {
                    Ok(line) => line,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                match parse_sse_line(line.trim()) {
                    Some(Event::Content(content)) => yield Ok(content),
                    Some(Event::Error(message)) => {
                        yield Err(ProviderError::Stream(message));
                        return;
                    }
                    Some(Event::Done) => return,
                    None => {}
                }
            }
        }

        match decode_line(buffer) {
            Ok(tail) => {
                if let Some(Event::Content(content)) = parse_sse_line(tail.trim()) {
                    yield Ok(content);
                }
            }
            Err(e) => yield Err(e),
        }
    }
}

fn decode_line(bytes: Vec<u8>) -> Result<String, ProviderError> {
    String::from_utf8(bytes)
        .map_err(|e| ProviderError::Stream(format!("Response is not valid UTF-8: {e}")))
}

/// Parses one trimmed SSE line. Comments, blank lines, empty deltas and
/// undecodable payloads yield `None`.
fn parse_sse_line(line: &str) -> Option<Event> {
    let payload = line.strip_prefix("data:")?.trim_start();

    if payload == "[DONE]" {
        return Some(Event::Done);
    }

    let response = serde_json::from_str::<StreamResponse>(payload).ok()?;

    if let Some(error) = response.error {
        return Some(Event::Error(error.message));
    }

    let content: String = response
        .choices
        .into_iter()
        .filter_map(|c| c.delta.content)
        .collect();

    (!content.is_empty()).then_some(Event::Content(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(text: &str) -> Option<Event> {
        Some(Event::Content(text.to_string()))
    }

    #[test]
    fn test_parse_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"你好"}}]}"#;
        assert_eq!(parse_sse_line(line), content("你好"));
    }

    #[test]
    fn test_parse_without_space_after_prefix() {
        let line = r#"data:{"choices":[{"delta":{"content":"世界"}}]}"#;
        assert_eq!(parse_sse_line(line), content("世界"));
    }

    #[test]
    fn test_parse_multiple_choices_are_joined() {
        let line =
            r#"data: {"choices":[{"delta":{"content":"你"}},{"delta":{"content":"好"}}]}"#;
        assert_eq!(parse_sse_line(line), content("你好"));
    }

    #[test]
    fn test_parse_empty_and_missing_content() {
        assert_eq!(parse_sse_line(r#"data: {"choices":[{"delta":{"content":""}}]}"#), None);
        assert_eq!(parse_sse_line(r#"data: {"choices":[{"delta":{}}]}"#), None);
    }

    #[test]
    fn test_parse_done_marker() {
        assert_eq!(parse_sse_line("data: [DONE]"), Some(Event::Done));
    }

    #[test]
    fn test_parse_error_payload() {
        let line = r#"data: {"error":{"message":"rate limited"}}"#;
        assert_eq!(
            parse_sse_line(line),
            Some(Event::Error("rate limited".to_string()))
        );
    }

    #[test]
    fn test_parse_ignores_non_data_lines() {
        assert_eq!(parse_sse_line(""), None);
        assert_eq!(parse_sse_line(": keep-alive"), None);
        assert_eq!(parse_sse_line("event: message"), None);
        assert_eq!(parse_sse_line("data: not json"), None);
    }

    #[tokio::test]
    async fn test_text_chunks_reassembles_split_lines() {
        use futures_util::StreamExt;

        let parts: Vec<reqwest::Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"data: {\"choices\":[{\"delta\":{\"con")),
            Ok(Bytes::from_static(b"tent\":\"\xe4\xbd\xa0\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"\xe5\xa5\xbd\"}}]}\n")),
            Ok(Bytes::from_static(b"data: [DONE]\n")),
            Ok(Bytes::from_static(b"data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n")),
        ];

        let chunks: Vec<String> = text_chunks(futures_util::stream::iter(parts))
            .filter_map(|r| async move { r.ok() })
            .collect()
            .await;

        assert_eq!(chunks, vec!["你".to_string(), "好".to_string()]);
    }

    #[tokio::test]
    async fn test_text_chunks_keeps_characters_split_across_chunks() {
        use futures_util::StreamExt;

        let parts: Vec<reqwest::Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"data: {\"choices\":[{\"delta\":{\"content\":\"\xe4\xbd")),
            Ok(Bytes::from_static(b"\xa0\xe5\xa5\xbd\"}}]}\n")),
        ];

        let chunks: Vec<String> = text_chunks(futures_util::stream::iter(parts))
            .filter_map(|r| async move { r.ok() })
            .collect()
            .await;

        assert_eq!(chunks, vec!["你好".to_string()]);
    }

    #[tokio::test]
    async fn test_text_chunks_rejects_invalid_utf8_line() {
        use futures_util::StreamExt;

        let parts: Vec<reqwest::Result<Bytes>> = vec![Ok(Bytes::from_static(
            b"data: {\"choices\":[{\"delta\":{\"content\":\"\xff\"}}]}\n",
        ))];

        let results: Vec<Result<String, ProviderError>> =
            text_chunks(futures_util::stream::iter(parts)).collect().await;

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(ProviderError::Stream(_))));
    }
}
