//! Network collaborators: the response model, bodies and transports.
//!
//! The outcome engine never opens connections itself. It talks to a
//! [`Transport`], which hands back a [`Response`] whose [`Body`] may still be
//! streaming. [`ReqwestTransport`] is the stock implementation.
mod body;
mod fetch;
mod response;
mod transport;

pub use body::{Body, BodyError, BodyStream};
pub use fetch::ReqwestTransport;
pub use response::Response;
pub(crate) use response::reason_phrase;
pub use transport::{HttpRequest, Transport, TransportError};
