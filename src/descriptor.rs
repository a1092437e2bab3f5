//! Response type descriptors.
//!
//! A [`ResponseTypeDescriptor`] declares that responses with a status code in
//! one of its ranges carry a body of type `T`, and how to obtain a
//! deserializer for it. The type parameter is erased so descriptors for
//! different types can live in one [`DescriptorRegistry`](crate::DescriptorRegistry).
use crate::deserializer::{DeserializeError, Deserializer, DeserializerFactory};
use crate::errors::OutcomeError;
use crate::net::Body;
use crate::range::algebra::more_specific;
use crate::range::{parse_ranges, StatusCodeRange};
use futures::future::BoxFuture;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub(crate) type ErasedValue = Box<dyn Any + Send>;

type ErasedDeserialize =
    Arc<dyn Fn(Body, CancellationToken) -> BoxFuture<'static, Result<ErasedValue, DeserializeError>> + Send + Sync>;

#[derive(Clone)]
pub struct ResponseTypeDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    /// Declared ranges, duplicates removed, in declaration order
    ranges: Vec<StatusCodeRange>,
    deserialize: ErasedDeserialize,
}

impl ResponseTypeDescriptor {
    /// Declares outcome type `T` for the given ranges.
    ///
    /// Fails with [`OutcomeError::InvalidArgument`] when `ranges` is empty.
    pub fn new<T, I>(ranges: I, factory: DeserializerFactory<T>) -> Result<Self, OutcomeError>
    where
        T: Send + 'static,
        I: IntoIterator<Item = StatusCodeRange>,
    {
        let mut unique: Vec<StatusCodeRange> = Vec::new();
        for r in ranges {
            if !unique.contains(&r) {
                unique.push(r);
            }
        }

        let type_name = std::any::type_name::<T>();
        if unique.is_empty() {
            return Err(OutcomeError::invalid(format!(
                "outcome {type_name} needs at least one status code range"
            )));
        }

        let deserialize: ErasedDeserialize = Arc::new(
            move |body: Body, cancel: CancellationToken| -> BoxFuture<'static, Result<ErasedValue, DeserializeError>> {
                // Factory runs eagerly; only the body read is deferred
                let made: Option<Box<dyn Deserializer<T>>> = factory();
                Box::pin(async move {
                    let de = made.ok_or(DeserializeError::MissingDeserializer)?;
                    let value = de.deserialize(body, cancel).await?;
                    Ok(Box::new(value) as ErasedValue)
                })
            },
        );

        Ok(Self {
            type_id: TypeId::of::<T>(),
            type_name,
            ranges: unique,
            deserialize,
        })
    }

    /// Same as [`new`](Self::new), with ranges given as literals like `"2xx"`.
    pub fn from_literals<T, I, S>(literals: I, factory: DeserializerFactory<T>) -> Result<Self, OutcomeError>
    where
        T: Send + 'static,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(parse_ranges(literals)?, factory)
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn ranges(&self) -> &[StatusCodeRange] {
        &self.ranges
    }

    /// Returns true when this descriptor declares type `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Most specific of this descriptor's ranges containing `code`.
    pub fn matching_range(&self, code: u16) -> Option<&StatusCodeRange> {
        self.ranges
            .iter()
            .filter(|r| r.contains(code))
            .fold(None, |best, r| match best {
                Some(b) if !more_specific(r, b) => Some(b),
                _ => Some(r),
            })
    }

    /// Runs the factory and deserializes `body` into this descriptor's type.
    pub(crate) fn deserialize(
        &self,
        body: Body,
        cancel: CancellationToken,
    ) -> BoxFuture<'static, Result<ErasedValue, DeserializeError>> {
        (self.deserialize)(body, cancel)
    }
}

impl fmt::Debug for ResponseTypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseTypeDescriptor")
            .field("type_name", &self.type_name)
            .field("ranges", &self.ranges)
            .finish_non_exhaustive()
    }
}
