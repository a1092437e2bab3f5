use crate::config::ClientConfig;
use crate::net::{Body, BodyError, HttpRequest, Response, Transport, TransportError};
use futures::future::BoxFuture;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

/// [`Transport`] backed by a `reqwest::Client`.
///
/// The body is not buffered here: it is handed on as a stream, so the
/// deserializer that ends up reading it can be canceled mid-way.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport that identifies itself with the configured user agent.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().user_agent(config.user_agent.as_str()).build()?;
        Ok(Self { client })
    }

    /// Wraps an existing client, e.g. one shared with other parts of the application.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest, cancel: CancellationToken) -> BoxFuture<'_, Result<Response, TransportError>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(request.method.clone(), request.url.clone())
                .headers(request.headers);
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            log::debug!("{} {}", request.method, request.url);

            let res = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TransportError::Canceled),
                r = builder.send() => r?,
            };

            // Fetch results
            let final_url = res.url().clone();
            let status = res.status().as_u16();
            let headers = res.headers().clone();

            log::debug!("{} {} -> {}", request.method, final_url, status);

            // Body stays a stream; it's read when the outcome is dispatched
            let body = Body::from_stream(res.bytes_stream().map(|chunk| chunk.map_err(BodyError::from)));

            Ok(Response::new(final_url, status, headers, body))
        })
    }
}
