// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Newline-delimited JSON decoder for Ollama streaming responses.
//!
//! Buffers at most one partial line. Each complete line is decoded on its
//! own; undecodable lines are logged and dropped so the stream continues.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use hasko_core::{HaskoError, TextStream};
use tracing::{debug, warn};

use crate::types::GenerateChunk;

/// Turns a byte stream of NDJSON objects into a stream of text fragments.
///
/// A transport error is yielded once and ends the stream. An in-band
/// `{"error": ...}` object is yielded as an error without ending it.
pub fn decode_ndjson<S, E>(bytes: S) -> TextStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let state = (Box::pin(bytes), Vec::<u8>::new(), false);

    Box::pin(stream::unfold(state, |(mut bytes, mut buf, mut eof)| async move {
        loop {
            if let Some(pos) = buf.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buf.drain(..=pos).collect();
                if let Some(item) = decode_line(&line[..pos]) {
                    return Some((item, (bytes, buf, eof)));
                }
                continue;
            }

            if eof {
                // Flush a final line that lacks a trailing newline.
                let line = std::mem::take(&mut buf);
                return decode_line(&line).map(|item| (item, (bytes, buf, eof)));
            }

            match bytes.next().await {
                Some(Ok(chunk)) => buf.extend_from_slice(&chunk),
                Some(Err(e)) => {
                    buf.clear();
                    let err = HaskoError::Provider {
                        message: format!("inference stream interrupted: {e}"),
                        source: Some(Box::new(e)),
                    };
                    return Some((Err(err), (bytes, buf, true)));
                }
                None => eof = true,
            }
        }
    }))
}

/// Decodes one line. `None` means nothing to emit.
fn decode_line(line: &[u8]) -> Option<Result<String, HaskoError>> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }

    let chunk: GenerateChunk = match serde_json::from_slice(line) {
        Ok(chunk) => chunk,
        Err(e) => {
            warn!(
                error = %e,
                line = %String::from_utf8_lossy(line),
                "dropping undecodable stream line"
            );
            return None;
        }
    };

    if let Some(message) = chunk.error {
        return Some(Err(HaskoError::Provider {
            message,
            source: None,
        }));
    }

    if chunk.done {
        debug!("inference stream reported done");
    }

    chunk
        .response
        .filter(|text| !text.is_empty())
        .map(Ok)
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;
    use tracing_test::traced_test;

    use super::*;

    fn chunks(parts: &'static [&'static str]) -> impl Stream<Item = Result<Bytes, std::io::Error>> {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::from_static(p.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    async fn collect(parts: &'static [&'static str]) -> Vec<String> {
        decode_ndjson(chunks(parts)).try_collect().await.unwrap()
    }

    #[tokio::test]
    async fn three_lines_yield_three_fragments_in_order() {
        let out = collect(&[
            "{\"response\":\"Hel\"}\n{\"response\":\"lo\"}\n{\"response\":\"!\"}\n",
        ])
        .await;
        assert_eq!(out, vec!["Hel", "lo", "!"]);
    }

    #[tokio::test]
    async fn lines_split_across_chunks_are_reassembled() {
        let out = collect(&["{\"respo", "nse\":\"a\"}\n{\"response\"", ":\"b\"}\n"]).await;
        assert_eq!(out, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn final_line_without_newline_is_flushed() {
        let out = collect(&["{\"response\":\"x\"}\n{\"response\":\"y\",\"done\":true}"]).await;
        assert_eq!(out, vec!["x", "y"]);
    }

    #[tokio::test]
    #[traced_test]
    async fn malformed_line_is_dropped_and_logged() {
        let out = collect(&["{\"response\":\"a\"}\nnot json\n{\"response\":\"b\"}\n"]).await;
        assert_eq!(out, vec!["a", "b"]);
        assert!(logs_contain("dropping undecodable stream line"));
    }

    #[tokio::test]
    async fn empty_and_done_lines_emit_nothing() {
        let out = collect(&["\n\n{\"response\":\"\",\"done\":true}\n"]).await;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn in_band_error_is_surfaced() {
        let mut stream = decode_ndjson(chunks(&[
            "{\"response\":\"a\"}\n{\"error\":\"model crashed\"}\n",
        ]));
        assert_eq!(stream.next().await.unwrap().unwrap(), "a");
        let err = stream.next().await.unwrap().unwrap_err();
        assert!(err.to_string().contains("model crashed"));
    }

    #[tokio::test]
    async fn transport_error_ends_stream() {
        let parts: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"{\"response\":\"a\"}\n{\"resp")),
            Err(std::io::Error::other("connection reset")),
            Ok(Bytes::from_static(b"{\"response\":\"never\"}\n")),
        ];
        let mut stream = decode_ndjson(stream::iter(parts));

        assert_eq!(stream.next().await.unwrap().unwrap(), "a");
        assert!(stream.next().await.unwrap().unwrap_err().is_transport());
        assert!(stream.next().await.is_none());
    }
}
