use crate::config::ClientConfig;
use crate::deserializer::{DeserializeError, Deserializer, DeserializerFactory};
use crate::net::Body;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Parses the body as JSON into any `DeserializeOwned` type.
pub struct JsonDeserializer<T> {
    limit: usize,
    empty_as_null: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDeserializer<T> {
    pub fn new(limit: usize, empty_as_null: bool) -> Self {
        Self {
            limit,
            empty_as_null,
            _marker: PhantomData,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_body_size, config.json_empty_as_null)
    }
}

impl<T: DeserializeOwned + 'static> JsonDeserializer<T> {
    /// Factory producing deserializers with the settings of `config`.
    pub fn factory(config: &ClientConfig) -> DeserializerFactory<T> {
        let (limit, empty_as_null) = (config.max_body_size, config.json_empty_as_null);
        Arc::new(move || Some(Box::new(Self::new(limit, empty_as_null)) as Box<dyn Deserializer<T>>))
    }
}

impl<T: DeserializeOwned + 'static> Deserializer<T> for JsonDeserializer<T> {
    fn deserialize(&self, body: Body, cancel: CancellationToken) -> BoxFuture<'_, Result<T, DeserializeError>> {
        Box::pin(async move {
            let bytes = body.collect(self.limit, &cancel).await?;

            if self.empty_as_null && bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(serde_json::from_slice(b"null")?);
            }

            Ok(serde_json::from_slice(&bytes)?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u32,
        name: String,
    }

    #[tokio::test]
    async fn parses_json_into_struct() {
        let de = JsonDeserializer::<User>::new(1024, false);
        let user = de
            .deserialize(Body::from(r#"{"id":7,"name":"ada"}"#), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(user, User { id: 7, name: "ada".into() });
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        let de = JsonDeserializer::<User>::new(1024, false);
        let res = de.deserialize(Body::from("{"), CancellationToken::new()).await;
        assert!(matches!(res, Err(DeserializeError::Json(_))));
    }

    #[tokio::test]
    async fn empty_body_as_null_when_enabled() {
        let de = JsonDeserializer::<Option<User>>::new(1024, true);
        let res = de.deserialize(Body::empty(), CancellationToken::new()).await.unwrap();
        assert_eq!(res, None);

        let strict = JsonDeserializer::<Option<User>>::new(1024, false);
        assert!(strict.deserialize(Body::empty(), CancellationToken::new()).await.is_err());
    }

    #[tokio::test]
    async fn factory_uses_config_limit() {
        let cfg = ClientConfig::builder().max_body_size(4).build().unwrap();
        let de = JsonDeserializer::<serde_json::Value>::factory(&cfg)().unwrap();
        let res = de.deserialize(Body::from(r#"{"a":1}"#), CancellationToken::new()).await;
        assert!(matches!(res, Err(DeserializeError::Body(_))));
    }
}
