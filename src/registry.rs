//! Conflict-checked collection of response type descriptors.
//!
//! A [`DescriptorRegistry`] belongs to exactly one request. Every insert and
//! replace is checked against the descriptors already present: if any range
//! of the incoming descriptor [conflicts](crate::range::algebra::conflicts)
//! with a range of a *different* descriptor the operation fails and the
//! registry is left untouched. As a result a lookup for a status code never
//! has to choose between two equally good candidates from different
//! descriptors.
//!
//! Descriptors are held behind `Arc`, so cloning a registry is a shallow copy.
//! Requests rely on that when a new outcome is declared: the new request gets
//! its own registry and the previous request value keeps its old one.
//!
//! The registry does no locking. It can be shared for reads across threads,
//! but mutating it from more than one place at a time needs external
//! synchronization.
use crate::descriptor::ResponseTypeDescriptor;
use crate::errors::OutcomeError;
use crate::range::algebra::conflicts;
use crate::range::StatusCodeRange;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    descriptors: Vec<Arc<ResponseTypeDescriptor>>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a descriptor and returns its index.
    ///
    /// Fails with [`OutcomeError::ConflictingRanges`] naming the first
    /// conflicting pair found.
    pub fn insert(&mut self, descriptor: impl Into<Arc<ResponseTypeDescriptor>>) -> Result<usize, OutcomeError> {
        let descriptor = descriptor.into();
        self.check(&descriptor, None)?;

        log::debug!(
            "registered outcome {} for {:?} at index {}",
            descriptor.type_name(),
            descriptor.ranges(),
            self.descriptors.len()
        );
        self.descriptors.push(descriptor);
        Ok(self.descriptors.len() - 1)
    }

    /// Replaces the descriptor at `index`, returning the old one.
    ///
    /// The incoming descriptor is allowed to conflict with the one it
    /// replaces, but not with any other.
    pub fn replace(
        &mut self,
        index: usize,
        descriptor: impl Into<Arc<ResponseTypeDescriptor>>,
    ) -> Result<Arc<ResponseTypeDescriptor>, OutcomeError> {
        if index >= self.descriptors.len() {
            return Err(OutcomeError::invalid(format!(
                "index {index} is out of bounds for a registry of {} outcome(s)",
                self.descriptors.len()
            )));
        }

        let descriptor = descriptor.into();
        self.check(&descriptor, Some(index))?;

        log::debug!("replaced outcome at index {index} with {}", descriptor.type_name());
        Ok(std::mem::replace(&mut self.descriptors[index], descriptor))
    }

    pub fn remove(&mut self, index: usize) -> Option<Arc<ResponseTypeDescriptor>> {
        (index < self.descriptors.len()).then(|| self.descriptors.remove(index))
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<ResponseTypeDescriptor>> {
        self.descriptors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ResponseTypeDescriptor>> {
        self.descriptors.iter()
    }

    /// Index of the first descriptor declaring type `T`.
    pub fn position_of<T: 'static>(&self) -> Option<usize> {
        self.descriptors.iter().position(|d| d.is::<T>())
    }

    /// First pair `(existing, incoming)` of conflicting ranges, skipping the
    /// descriptor at `skip`.
    pub fn find_conflict(
        &self,
        incoming: &ResponseTypeDescriptor,
        skip: Option<usize>,
    ) -> Option<(StatusCodeRange, StatusCodeRange)> {
        self.descriptors
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .flat_map(|(_, d)| d.ranges().iter())
            .find_map(|existing| {
                incoming
                    .ranges()
                    .iter()
                    .find(|r| conflicts(existing, r))
                    .map(|r| (*existing, *r))
            })
    }

    fn check(&self, incoming: &ResponseTypeDescriptor, skip: Option<usize>) -> Result<(), OutcomeError> {
        match self.find_conflict(incoming, skip) {
            None => Ok(()),
            Some((existing, incoming_range)) => {
                log::warn!(
                    "rejected outcome {}: {} conflicts with declared {}",
                    incoming.type_name(),
                    incoming_range,
                    existing
                );
                Err(OutcomeError::ConflictingRanges {
                    existing,
                    incoming: incoming_range,
                })
            }
        }
    }
}

impl<'a> IntoIterator for &'a DescriptorRegistry {
    type Item = &'a Arc<ResponseTypeDescriptor>;
    type IntoIter = std::slice::Iter<'a, Arc<ResponseTypeDescriptor>>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}
