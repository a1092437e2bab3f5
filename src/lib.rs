//! Typed HTTP response outcomes.
//!
//! A request declares up front which body type to expect for which status
//! codes. Once the response arrives its status code is resolved against
//! those declarations, and the body is deserialized into the slot of the
//! most specific match. Undeclared status codes give an empty outcome.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gosub_outcomes::{ClientConfig, ReqwestTransport, StatusCodeRange, TypedRequest};
//! use tokio_util::sync::CancellationToken;
//!
//! #[derive(serde::Deserialize)]
//! struct User { name: String }
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Arc::new(ClientConfig::default());
//! let transport = ReqwestTransport::new(&config)?;
//! let cancel = CancellationToken::new();
//!
//! let outcome = TypedRequest::parse(http::Method::GET, "https://example.com/users/1", config)?
//!     .json_outcome::<User>([StatusCodeRange::success()])?
//!     .text_outcome([StatusCodeRange::client_error()])?
//!     .send(&transport, &cancel)
//!     .await?
//!     .into_outcome(&cancel)
//!     .await?;
//!
//! if let Some(user) = outcome.get::<User>() {
//!     println!("hello {}", user.name);
//! } else if let Some(text) = outcome.get::<String>() {
//!     println!("client error: {text}");
//! }
//! # Ok(()) }
//! ```
pub mod config;
pub mod descriptor;
pub mod deserializer;
pub mod errors;
pub mod net;
pub mod outcome;
pub mod range;
pub mod registry;
pub mod request;
pub mod resolve;
pub mod response;

pub use config::{ClientConfig, ClientConfigBuilder, ConfigError};
pub use descriptor::ResponseTypeDescriptor;
pub use deserializer::{DeserializeError, Deserializer, DeserializerFactory};
pub use errors::OutcomeError;
pub use net::{Body, BodyError, HttpRequest, ReqwestTransport, Response, Transport, TransportError};
pub use outcome::{dispatch, Outcome};
pub use range::StatusCodeRange;
pub use registry::DescriptorRegistry;
pub use request::TypedRequest;
pub use resolve::{resolve, resolve_entry, Resolved};
pub use response::TypedResponse;
