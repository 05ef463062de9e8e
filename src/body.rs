//! Request body buffering.
//!
//! The dispatcher always drains the body before it answers, so every read
//! goes through [`read_to_string`]: it waits for the end of the stream,
//! concatenates the chunks in arrival order and decodes the result once.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use thiserror::Error;

/// Boxed error accepted from any body implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a request body could not be read.
#[derive(Debug, Error)]
pub enum BodyError {
    /// The stream produced more than the configured number of bytes.
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    /// The underlying stream failed before it ended.
    #[error("failed to read request body: {0}")]
    Stream(BoxError),
}

/// Reads the whole body and decodes it as UTF-8.
///
/// Invalid byte sequences are replaced with U+FFFD rather than rejected; the
/// payload is validated later by the service, which reports a readable
/// validation error. No partial body is ever returned: a stream error or an
/// oversized payload fails the whole read.
pub async fn read_to_string<B>(body: B, limit: usize) -> Result<String, BodyError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let collected = Limited::new(body, limit).collect().await.map_err(|e| {
        if e.downcast_ref::<LengthLimitError>().is_some() {
            BodyError::TooLarge { limit }
        } else {
            BodyError::Stream(e)
        }
    })?;

    let bytes = collected.to_bytes();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use bytes::Bytes;
    use http_body_util::{Empty, Full};
    use hyper::body::Frame;
    use tokio::sync::mpsc;
    use tokio::time::{Duration, timeout};

    use super::*;

    /// Yields a fixed list of chunks, or an error in place of one.
    struct Chunks(VecDeque<Result<&'static [u8], &'static str>>);

    impl Chunks {
        fn new(parts: Vec<Result<&'static [u8], &'static str>>) -> Self {
            Self(parts.into())
        }
    }

    impl Body for Chunks {
        type Data = Bytes;
        type Error = std::io::Error;

        fn poll_frame(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Bytes>, Self::Error>>> {
            let next = self.0.pop_front().map(|part| {
                part.map(|b| Frame::data(Bytes::from_static(b)))
                    .map_err(std::io::Error::other)
            });
            Poll::Ready(next)
        }
    }

    /// Yields chunks as a sender pushes them; ends when the sender drops.
    struct Channel(mpsc::Receiver<&'static [u8]>);

    impl Body for Channel {
        type Data = Bytes;
        type Error = std::io::Error;

        fn poll_frame(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Bytes>, Self::Error>>> {
            self.0
                .poll_recv(cx)
                .map(|chunk| chunk.map(|b| Ok(Frame::data(Bytes::from_static(b)))))
        }
    }

    #[tokio::test]
    async fn waits_for_chunks_that_arrive_later() {
        let (tx, rx) = mpsc::channel(4);
        let read = read_to_string(Channel(rx), 1024);
        tokio::pin!(read);

        tx.send(b"{\"username\":".as_slice()).await.unwrap();
        assert!(
            timeout(Duration::from_millis(20), &mut read).await.is_err(),
            "read finished before the stream ended"
        );

        let late = tokio::spawn(async move {
            tokio::task::yield_now().await;
            tx.send(b"\"ann\"}".as_slice()).await.unwrap();
        });

        assert_eq!(read.await.unwrap(), r#"{"username":"ann"}"#);
        late.await.unwrap();
    }

    #[tokio::test]
    async fn concatenates_chunks_in_arrival_order() {
        let body = Chunks::new(vec![Ok(b"{\"user"), Ok(b"name\":"), Ok(b"\"ann\"}")]);
        let text = read_to_string(body, 1024).await.unwrap();
        assert_eq!(text, r#"{"username":"ann"}"#);
    }

    #[tokio::test]
    async fn decodes_characters_split_across_chunks() {
        // "é" is 0xC3 0xA9; split it between two frames.
        let body = Chunks::new(vec![Ok(b"caf\xC3"), Ok(b"\xA9")]);
        assert_eq!(read_to_string(body, 1024).await.unwrap(), "café");
    }

    #[tokio::test]
    async fn empty_body_reads_as_empty_string() {
        let text = read_to_string(Empty::<Bytes>::new(), 1024).await.unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced_not_rejected() {
        let body = Full::new(Bytes::from_static(b"a\xFFb"));
        assert_eq!(read_to_string(body, 1024).await.unwrap(), "a\u{FFFD}b");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let body = Full::new(Bytes::from(vec![b'x'; 17]));
        let err = read_to_string(body, 16).await.unwrap_err();
        assert!(matches!(err, BodyError::TooLarge { limit: 16 }));
    }

    #[tokio::test]
    async fn stream_error_fails_the_whole_read() {
        let body = Chunks::new(vec![Ok(b"partial"), Err("connection reset")]);
        let err = read_to_string(body, 1024).await.unwrap_err();
        assert!(matches!(err, BodyError::Stream(_)));
        assert!(err.to_string().contains("connection reset"));
    }
}
