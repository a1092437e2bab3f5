//! Response bodies.
//!
//! A [`Body`] is either fully buffered or a stream of chunks still arriving
//! from the transport. Deserializers turn it into bytes with
//! [`Body::collect`], which honors a size limit and the caller's
//! cancellation token.
use bytes::{Bytes, BytesMut};
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use std::fmt;
use tokio_util::sync::CancellationToken;

pub type BodyStream = BoxStream<'static, Result<Bytes, BodyError>>;

#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("body exceeds the limit of {limit} bytes")]
    TooLarge { limit: usize },

    #[error("body read canceled")]
    Canceled,

    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

enum Inner {
    Full(Bytes),
    Stream(BodyStream),
}

pub struct Body {
    inner: Inner,
    /// Raw `Content-Type` value of the response, if any
    content_type: Option<String>,
}

impl Body {
    pub fn empty() -> Self {
        Self::from_bytes(Bytes::new())
    }

    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            inner: Inner::Full(bytes.into()),
            content_type: None,
        }
    }

    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, BodyError>> + Send + 'static,
    {
        Self {
            inner: Inner::Stream(stream.boxed()),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns true when the body is already in memory.
    pub fn is_buffered(&self) -> bool {
        matches!(self.inner, Inner::Full(_))
    }

    /// Buffers the whole body.
    ///
    /// Fails with [`BodyError::TooLarge`] once more than `limit` bytes are seen,
    /// and with [`BodyError::Canceled`] when `cancel` fires before the stream ends.
    pub async fn collect(self, limit: usize, cancel: &CancellationToken) -> Result<Bytes, BodyError> {
        if cancel.is_cancelled() {
            return Err(BodyError::Canceled);
        }

        let mut stream = match self.inner {
            Inner::Full(bytes) => {
                if bytes.len() > limit {
                    return Err(BodyError::TooLarge { limit });
                }
                return Ok(bytes);
            }
            Inner::Stream(stream) => stream,
        };

        let mut buf = BytesMut::new();
        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(BodyError::Canceled),
                chunk = stream.next() => chunk,
            };

            match chunk {
                Some(Ok(bytes)) => {
                    if buf.len() + bytes.len() > limit {
                        return Err(BodyError::TooLarge { limit });
                    }
                    buf.extend_from_slice(&bytes);
                }
                Some(Err(e)) => return Err(e),
                None => break,
            }
        }

        log::trace!("collected streamed body of {} bytes", buf.len());
        Ok(buf.freeze())
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Self::from_bytes(s)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Body");
        match &self.inner {
            Inner::Full(bytes) => d.field("len", &bytes.len()),
            Inner::Stream(_) => d.field("stream", &true),
        };
        d.field("content_type", &self.content_type).finish()
    }
}
