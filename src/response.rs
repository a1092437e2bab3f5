//! Responses that know their declared outcomes.
use crate::descriptor::ResponseTypeDescriptor;
use crate::errors::OutcomeError;
use crate::net::{reason_phrase, Response};
use crate::outcome::{dispatch, Outcome};
use crate::range::check_code;
use crate::registry::DescriptorRegistry;
use crate::resolve::{resolve, resolve_entry, Resolved};
use http::HeaderMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// An HTTP response paired with the registry of the request that produced it.
///
/// The status code is mutable. Resolution is never cached, so every call to
/// [`resolve`](Self::resolve) or [`into_outcome`](Self::into_outcome) sees the
/// current status.
#[derive(Debug)]
pub struct TypedResponse {
    inner: Response,
    registry: Arc<DescriptorRegistry>,
}

impl TypedResponse {
    /// Fails with [`OutcomeError::InvalidArgument`] when the status code lies
    /// outside 100..=599.
    pub fn new(inner: Response, registry: Arc<DescriptorRegistry>) -> Result<Self, OutcomeError> {
        check_code(inner.status)?;
        Ok(Self { inner, registry })
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.inner.status
    }

    /// Changes the status code. The reason phrase follows along.
    pub fn set_status_code(&mut self, code: u16) -> Result<(), OutcomeError> {
        check_code(code)?;
        if code != self.inner.status {
            log::debug!("status of {} changed from {} to {}", self.inner.url, self.inner.status, code);
        }
        self.inner.status = code;
        self.inner.status_text = reason_phrase(code).to_string();
        Ok(())
    }

    #[inline]
    pub fn status_text(&self) -> &str {
        &self.inner.status_text
    }

    #[inline]
    pub fn url(&self) -> &Url {
        &self.inner.url
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.inner.headers
    }

    #[inline]
    pub fn registry(&self) -> &DescriptorRegistry {
        &self.registry
    }

    /// Descriptor for the current status code, if any was declared.
    pub fn resolve(&self) -> Option<&ResponseTypeDescriptor> {
        resolve(&self.registry, self.inner.status)
    }

    pub fn resolve_entry(&self) -> Option<Resolved<'_>> {
        resolve_entry(&self.registry, self.inner.status)
    }

    /// Consumes the response and deserializes its body into the matching
    /// outcome slot.
    pub async fn into_outcome(self, cancel: &CancellationToken) -> Result<Outcome, OutcomeError> {
        let Self { inner, registry } = self;
        dispatch(resolve_entry(&registry, inner.status), inner.body, cancel).await
    }

    /// Hands back the raw response, dropping the outcome declarations.
    pub fn into_inner(self) -> Response {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::deserializer::{EmptyDeserializer, JsonDeserializer, TextDeserializer};
    use crate::net::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        name: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Problem {
        detail: String,
    }

    fn registry() -> Arc<DescriptorRegistry> {
        let cfg = ClientConfig::default();
        let mut reg = DescriptorRegistry::new();
        reg.insert(ResponseTypeDescriptor::from_literals(["2xx"], JsonDeserializer::<User>::factory(&cfg)).unwrap())
            .unwrap();
        reg.insert(ResponseTypeDescriptor::from_literals(["304"], EmptyDeserializer::factory()).unwrap())
            .unwrap();
        reg.insert(
            ResponseTypeDescriptor::from_literals(["4xx", "5xx"], JsonDeserializer::<Problem>::factory(&cfg)).unwrap(),
        )
        .unwrap();
        reg.insert(ResponseTypeDescriptor::from_literals(["418"], TextDeserializer::factory(&cfg)).unwrap())
            .unwrap();
        Arc::new(reg)
    }

    fn response(status: u16, body: &'static str) -> Response {
        let url = Url::parse("https://example.com/users/7").unwrap();
        Response::new(url, status, HeaderMap::new(), Body::from(body))
    }

    #[test]
    fn status_outside_the_domain_is_rejected() {
        let err = TypedResponse::new(response(600, ""), registry()).unwrap_err();
        assert!(matches!(err, OutcomeError::InvalidArgument(_)));

        let mut resp = TypedResponse::new(response(200, ""), registry()).unwrap();
        assert!(resp.set_status_code(99).is_err());
        assert_eq!(resp.status_code(), 200);
    }

    #[test]
    fn resolution_follows_status_changes() {
        let mut resp = TypedResponse::new(response(200, ""), registry()).unwrap();
        assert!(resp.resolve().unwrap().is::<User>());

        resp.set_status_code(418).unwrap();
        assert_eq!(resp.status_text(), "I'm a teapot");
        assert!(resp.resolve().unwrap().is::<String>());

        resp.set_status_code(404).unwrap();
        assert!(resp.resolve().unwrap().is::<Problem>());
        assert_eq!(resp.resolve_entry().unwrap().position(), 3);

        resp.set_status_code(302).unwrap();
        assert!(resp.resolve().is_none());
    }

    #[tokio::test]
    async fn into_outcome_uses_the_current_status() {
        let cancel = CancellationToken::new();

        let mut resp = TypedResponse::new(response(200, r#"{"detail":"gone"}"#), registry()).unwrap();
        resp.set_status_code(410).unwrap();
        let outcome = resp.into_outcome(&cancel).await.unwrap();
        assert_eq!(
            outcome.get::<Problem>(),
            Some(&Problem {
                detail: "gone".into()
            })
        );

        let resp = TypedResponse::new(response(304, "ignored"), registry()).unwrap();
        let outcome = resp.into_outcome(&cancel).await.unwrap();
        assert!(outcome.is::<()>());
        assert_eq!(outcome.position(), Some(2));

        let resp = TypedResponse::new(response(201, r#"{"name":"ada"}"#), registry()).unwrap();
        let user = resp.into_outcome(&cancel).await.unwrap().take::<User>().unwrap();
        assert_eq!(user.name, "ada");
    }

    #[tokio::test]
    async fn undeclared_status_is_empty() {
        let resp = TypedResponse::new(response(101, ""), registry()).unwrap();
        let outcome = resp.into_outcome(&CancellationToken::new()).await.unwrap();
        assert!(outcome.is_empty());
    }
}
