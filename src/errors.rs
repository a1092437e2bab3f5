use crate::deserializer::DeserializeError;
use crate::net::TransportError;
use crate::range::StatusCodeRange;

#[derive(Debug, thiserror::Error)]
pub enum OutcomeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Conflicting status code ranges: {incoming} overlaps already declared {existing}")]
    ConflictingRanges {
        existing: StatusCodeRange,
        incoming: StatusCodeRange,
    },

    #[error("Cannot deserialize response body into {type_name}: {source}")]
    SerializationFailed {
        type_name: &'static str,
        #[source]
        source: DeserializeError,
    },

    #[error("Operation canceled")]
    Canceled,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl OutcomeError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        OutcomeError::InvalidArgument(msg.into())
    }
}
