//! Requests with declared outcomes.
//!
//! A [`TypedRequest`] is a plain HTTP request plus the set of outcome types
//! its response may carry. Every outcome declaration returns a *new* request
//! value with its own copy of the registry, so a request handed out earlier
//! never changes underneath its holder.
//!
//! ```rust
//! use std::sync::Arc;
//! use gosub_outcomes::{ClientConfig, StatusCodeRange, TypedRequest};
//! # #[derive(serde::Deserialize)] struct User { id: u32 }
//! # #[derive(serde::Deserialize)] struct ApiError { message: String }
//! # fn main() -> Result<(), gosub_outcomes::OutcomeError> {
//! let config = Arc::new(ClientConfig::default());
//!
//! let req = TypedRequest::parse(http::Method::GET, "https://example.com/users/1", config)?
//!     .json_outcome::<User>([StatusCodeRange::success()])?
//!     .json_outcome::<ApiError>([StatusCodeRange::client_error(), StatusCodeRange::server_error()])?
//!     .empty_outcome(["304".parse::<StatusCodeRange>()?])?;
//!
//! assert_eq!(req.registry().len(), 3);
//! # Ok(()) }
//! ```
use crate::config::ClientConfig;
use crate::deserializer::{
    BytesDeserializer, DeserializerFactory, EmptyDeserializer, JsonDeserializer, TextDeserializer,
};
use crate::descriptor::ResponseTypeDescriptor;
use crate::errors::OutcomeError;
use crate::net::{HttpRequest, Transport, TransportError};
use crate::range::StatusCodeRange;
use crate::registry::DescriptorRegistry;
use crate::response::TypedResponse;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

#[derive(Debug, Clone)]
pub struct TypedRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
    config: Arc<ClientConfig>,
    registry: Arc<DescriptorRegistry>,
}

impl TypedRequest {
    pub fn new(method: Method, url: Url, config: Arc<ClientConfig>) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            config,
            registry: Arc::new(DescriptorRegistry::new()),
        }
    }

    /// Like [`new`](Self::new), parsing the URL first.
    pub fn parse(method: Method, url: &str, config: Arc<ClientConfig>) -> Result<Self, OutcomeError> {
        let url = Url::parse(url).map_err(|e| OutcomeError::invalid(format!("cannot parse URL {url:?}: {e}")))?;
        Ok(Self::new(method, url, config))
    }

    pub fn get(url: Url, config: Arc<ClientConfig>) -> Self { Self::new(Method::GET, url, config) }
    pub fn post(url: Url, config: Arc<ClientConfig>) -> Self { Self::new(Method::POST, url, config) }
    pub fn put(url: Url, config: Arc<ClientConfig>) -> Self { Self::new(Method::PUT, url, config) }
    pub fn delete(url: Url, config: Arc<ClientConfig>) -> Self { Self::new(Method::DELETE, url, config) }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[inline]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &DescriptorRegistry {
        &self.registry
    }

    /// Declares outcome `T` for `ranges`, returning the upgraded request.
    ///
    /// `self` is left as it was. Fails when the ranges conflict with an
    /// earlier declaration, when `ranges` is empty, or when the configured
    /// outcome limit is reached.
    pub fn outcome<T, I>(&self, ranges: I, factory: DeserializerFactory<T>) -> Result<Self, OutcomeError>
    where
        T: Send + 'static,
        I: IntoIterator<Item = StatusCodeRange>,
    {
        self.declare(ResponseTypeDescriptor::new(ranges, factory)?)
    }

    /// Declares an outcome from a prebuilt descriptor.
    pub fn declare(&self, descriptor: impl Into<Arc<ResponseTypeDescriptor>>) -> Result<Self, OutcomeError> {
        if self.registry.len() >= self.config.max_outcomes {
            return Err(OutcomeError::invalid(format!(
                "a request can declare at most {} outcomes",
                self.config.max_outcomes
            )));
        }

        let mut registry = DescriptorRegistry::clone(&self.registry);
        registry.insert(descriptor)?;

        Ok(Self {
            registry: Arc::new(registry),
            ..self.clone()
        })
    }

    /// Declares a JSON outcome using the request's config.
    pub fn json_outcome<T>(&self, ranges: impl IntoIterator<Item = StatusCodeRange>) -> Result<Self, OutcomeError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.outcome(ranges, JsonDeserializer::<T>::factory(&self.config))
    }

    pub fn text_outcome(&self, ranges: impl IntoIterator<Item = StatusCodeRange>) -> Result<Self, OutcomeError> {
        self.outcome(ranges, TextDeserializer::factory(&self.config))
    }

    pub fn bytes_outcome(&self, ranges: impl IntoIterator<Item = StatusCodeRange>) -> Result<Self, OutcomeError> {
        self.outcome(ranges, BytesDeserializer::factory(&self.config))
    }

    pub fn empty_outcome(&self, ranges: impl IntoIterator<Item = StatusCodeRange>) -> Result<Self, OutcomeError> {
        self.outcome(ranges, EmptyDeserializer::factory())
    }

    /// The wire-level request handed to a transport.
    pub fn to_http_request(&self) -> HttpRequest {
        HttpRequest {
            method: self.method.clone(),
            url: self.url.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }

    /// Sends the request. The response shares this request's registry.
    pub async fn send<T>(&self, transport: &T, cancel: &CancellationToken) -> Result<TypedResponse, OutcomeError>
    where
        T: Transport + ?Sized,
    {
        log::debug!(
            "sending {} {} with {} declared outcome(s)",
            self.method,
            self.url,
            self.registry.len()
        );

        let response = transport
            .send(self.to_http_request(), cancel.clone())
            .await
            .map_err(|e| match e {
                TransportError::Canceled => OutcomeError::Canceled,
                e => OutcomeError::Transport(e),
            })?;

        TypedResponse::new(response, self.registry.clone())
    }
}
