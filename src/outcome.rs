//! The resolved outcome of a response.
//!
//! An [`Outcome`] is a tagged union over the outcome types declared on a
//! request, plus an explicit empty state for status codes nobody declared.
//! The tag is the 1-based declaration position of the matching outcome,
//! so the union has no fixed arity.
//!
//! ```rust
//! use gosub_outcomes::Outcome;
//!
//! let o = Outcome::empty();
//! assert!(o.is_empty());
//! assert!(o.get::<String>().is_none());
//! ```
use crate::descriptor::{ErasedValue, ResponseTypeDescriptor};
use crate::errors::OutcomeError;
use crate::net::Body;
use crate::resolve::Resolved;
use std::any::{Any, TypeId};
use std::fmt;
use tokio_util::sync::CancellationToken;

struct Slot {
    position: usize,
    type_id: TypeId,
    type_name: &'static str,
    value: ErasedValue,
}

#[derive(Default)]
pub struct Outcome {
    slot: Option<Slot>,
}

impl Outcome {
    /// No declared outcome matched the status code.
    pub fn empty() -> Self {
        Self { slot: None }
    }

    /// Builds a populated outcome for declaration `position` (1-based).
    pub fn new<T: Any + Send>(position: usize, value: T) -> Self {
        Self::from_erased(position, TypeId::of::<T>(), std::any::type_name::<T>(), Box::new(value))
    }

    fn from_erased(position: usize, type_id: TypeId, type_name: &'static str, value: ErasedValue) -> Self {
        Self {
            slot: Some(Slot {
                position,
                type_id,
                type_name,
                value,
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// 1-based position of the declared outcome, `None` when empty.
    pub fn position(&self) -> Option<usize> {
        self.slot.as_ref().map(|s| s.position)
    }

    pub fn type_name(&self) -> Option<&'static str> {
        self.slot.as_ref().map(|s| s.type_name)
    }

    /// Returns true when the outcome holds a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.slot.as_ref().is_some_and(|s| s.type_id == TypeId::of::<T>())
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        self.slot.as_ref().and_then(|s| s.value.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.slot.as_mut().and_then(|s| s.value.downcast_mut::<T>())
    }

    /// Takes the value out as `T`, handing the outcome back when it holds
    /// something else (or nothing).
    pub fn take<T: Any>(self) -> Result<T, Outcome> {
        match self.slot {
            Some(slot) if slot.type_id == TypeId::of::<T>() => match slot.value.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(value) => Err(Self::from_erased(slot.position, slot.type_id, slot.type_name, value)),
            },
            slot => Err(Self { slot }),
        }
    }

    /// Value at declaration `position`, if that is the populated slot.
    pub fn at<T: Any>(&self, position: usize) -> Option<&T> {
        match &self.slot {
            Some(s) if s.position == position => s.value.downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn into_inner(self) -> Option<Box<dyn Any + Send>> {
        self.slot.map(|s| s.value)
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            None => f.write_str("Outcome::Empty"),
            Some(s) => f
                .debug_struct("Outcome")
                .field("position", &s.position)
                .field("type_name", &s.type_name)
                .finish_non_exhaustive(),
        }
    }
}

/// Deserializes `body` into the slot of `resolved`.
///
/// `None` gives the empty outcome without touching the body. A missing or
/// failing deserializer is reported as [`OutcomeError::SerializationFailed`]
/// and never turned into an empty outcome. Fires of `cancel` during the
/// read abort with [`OutcomeError::Canceled`].
pub async fn dispatch(
    resolved: Option<Resolved<'_>>,
    body: Body,
    cancel: &CancellationToken,
) -> Result<Outcome, OutcomeError> {
    let Some(resolved) = resolved else {
        log::debug!("no declared outcome matched, returning empty outcome");
        return Ok(Outcome::empty());
    };

    // Plain reference: on the `Arc`, `type_id()` would resolve to `Any::type_id`
    let descriptor: &ResponseTypeDescriptor = resolved.descriptor;
    log::debug!(
        "dispatching body to outcome #{} ({})",
        resolved.position(),
        descriptor.type_name()
    );

    let value = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(OutcomeError::Canceled),
        r = descriptor.deserialize(body, cancel.clone()) => r,
    };

    match value {
        Ok(value) => Ok(Outcome::from_erased(
            resolved.position(),
            descriptor.type_id(),
            descriptor.type_name(),
            value,
        )),
        Err(source) => {
            log::warn!("cannot deserialize body into {}: {}", descriptor.type_name(), source);
            Err(OutcomeError::SerializationFailed {
                type_name: descriptor.type_name(),
                source,
            })
        }
    }
}
