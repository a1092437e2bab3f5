use crate::net::Response;
use bytes::Bytes;
use futures::future::BoxFuture;
use http::{HeaderMap, Method};
use tokio_util::sync::CancellationToken;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request canceled")]
    Canceled,

    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// An HTTP request as handed to a [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Sends requests on behalf of a [`TypedRequest`](crate::TypedRequest).
///
/// Implementations own connection handling and any retry policy. They should
/// return as soon as the response headers are in, leaving the body streaming,
/// and give up with [`TransportError::Canceled`] when `cancel` fires.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest, cancel: CancellationToken) -> BoxFuture<'_, Result<Response, TransportError>>;
}
