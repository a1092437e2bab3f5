//! Deserializers: turning a response [`Body`] into a declared outcome type.
//!
//! A [`Deserializer<T>`] is obtained lazily through a zero-argument factory
//! supplied when the outcome is declared, so expensive setup only happens for
//! the outcome that actually matched. A factory may return `None` when it
//! can't produce a deserializer; dispatch reports that as a failure.
//!
//! This module exports four stock implementations:
//! - [`JsonDeserializer`]: any `serde::de::DeserializeOwned` type, via `serde_json`.
//! - [`TextDeserializer`]: a `String`, honoring the response charset.
//! - [`BytesDeserializer`]: the raw `bytes::Bytes`.
//! - [`EmptyDeserializer`]: `()`, without reading the body.
mod json;
mod raw;
mod text;

use crate::net::{Body, BodyError};
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub use json::JsonDeserializer;
pub use raw::{BytesDeserializer, EmptyDeserializer};
pub use text::TextDeserializer;

#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("no deserializer available")]
    MissingDeserializer,

    #[error("cannot read body: {0}")]
    Body(#[from] BodyError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Deserializes a response body into `T`.
///
/// Implementations that read the body should pass `cancel` on to
/// [`Body::collect`] so a canceled dispatch also stops the read.
pub trait Deserializer<T>: Send + Sync {
    fn deserialize(&self, body: Body, cancel: CancellationToken) -> BoxFuture<'_, Result<T, DeserializeError>>;
}

/// Shared, zero-argument constructor of deserializers for `T`.
pub type DeserializerFactory<T> = Arc<dyn Fn() -> Option<Box<dyn Deserializer<T>>> + Send + Sync>;

/// Wraps a constructor that always succeeds into a factory.
pub fn factory<T, D, F>(make: F) -> DeserializerFactory<T>
where
    T: 'static,
    D: Deserializer<T> + 'static,
    F: Fn() -> D + Send + Sync + 'static,
{
    Arc::new(move || Some(Box::new(make()) as Box<dyn Deserializer<T>>))
}

/// Deserializer built from an async-less closure over the buffered body.
///
/// Handy for small custom formats and tests.
pub struct FnDeserializer<F> {
    limit: usize,
    f: F,
}

impl<F> FnDeserializer<F> {
    pub fn new(limit: usize, f: F) -> Self {
        Self { limit, f }
    }
}

impl<T, F> Deserializer<T> for FnDeserializer<F>
where
    T: 'static,
    F: Fn(bytes::Bytes) -> Result<T, DeserializeError> + Send + Sync,
{
    fn deserialize(&self, body: Body, cancel: CancellationToken) -> BoxFuture<'_, Result<T, DeserializeError>> {
        Box::pin(async move {
            let bytes = body.collect(self.limit, &cancel).await?;
            (self.f)(bytes)
        })
    }
}
