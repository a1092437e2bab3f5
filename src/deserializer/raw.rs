use crate::config::ClientConfig;
use crate::deserializer::{DeserializeError, Deserializer, DeserializerFactory};
use crate::net::Body;
use bytes::Bytes;
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Returns the body bytes untouched.
pub struct BytesDeserializer {
    limit: usize,
}

impl BytesDeserializer {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn factory(config: &ClientConfig) -> DeserializerFactory<Bytes> {
        let limit = config.max_body_size;
        Arc::new(move || Some(Box::new(Self::new(limit)) as Box<dyn Deserializer<Bytes>>))
    }
}

impl Deserializer<Bytes> for BytesDeserializer {
    fn deserialize(&self, body: Body, cancel: CancellationToken) -> BoxFuture<'_, Result<Bytes, DeserializeError>> {
        Box::pin(async move { Ok(body.collect(self.limit, &cancel).await?) })
    }
}

/// For outcomes that carry no payload (`204 No Content`, `304`, ...). The body
/// is dropped unread.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyDeserializer;

impl EmptyDeserializer {
    pub fn factory() -> DeserializerFactory<()> {
        Arc::new(|| Some(Box::new(EmptyDeserializer) as Box<dyn Deserializer<()>>))
    }
}

impl Deserializer<()> for EmptyDeserializer {
    fn deserialize(&self, _body: Body, _cancel: CancellationToken) -> BoxFuture<'_, Result<(), DeserializeError>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn bytes_are_passed_through() {
        let de = BytesDeserializer::new(16);
        let out = de.deserialize(Body::from(vec![1u8, 2, 3]), CancellationToken::new()).await.unwrap();
        assert_eq!(&out[..], &[1, 2, 3]);
    }

    #[tokio::test]
    async fn empty_ignores_the_body() {
        // A body that would never finish; EmptyDeserializer must not read it
        let body = Body::from_stream(stream::pending());
        EmptyDeserializer.deserialize(body, CancellationToken::new()).await.unwrap();
    }
}
