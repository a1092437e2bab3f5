//! Picking the declared outcome for a concrete status code.
use crate::descriptor::ResponseTypeDescriptor;
use crate::range::algebra::more_specific;
use crate::range::StatusCodeRange;
use crate::registry::DescriptorRegistry;
use std::sync::Arc;

/// Result of a successful resolution.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    /// Index of the descriptor in its registry
    pub index: usize,
    /// The winning descriptor
    pub descriptor: &'a Arc<ResponseTypeDescriptor>,
    /// The range that matched
    pub range: &'a StatusCodeRange,
}

impl Resolved<'_> {
    /// 1-based declaration position, the slot of the outcome union.
    pub fn position(&self) -> usize {
        self.index + 1
    }
}

/// Returns the descriptor whose matching range is the most specific for `code`.
///
/// Ties go to the first registered descriptor. Nothing is cached, so calling
/// this again after a status code changed gives the updated answer.
pub fn resolve(registry: &DescriptorRegistry, code: u16) -> Option<&ResponseTypeDescriptor> {
    resolve_entry(registry, code).map(|r| r.descriptor.as_ref())
}

/// Like [`resolve`], but also reports where the winner sits and which range matched.
pub fn resolve_entry(registry: &DescriptorRegistry, code: u16) -> Option<Resolved<'_>> {
    let mut best: Option<Resolved<'_>> = None;

    for (index, descriptor) in registry.iter().enumerate() {
        let Some(range) = descriptor.matching_range(code) else {
            continue;
        };
        let better = match &best {
            None => true,
            Some(b) => more_specific(range, b.range),
        };
        if better {
            best = Some(Resolved { index, descriptor, range });
        }
    }

    match &best {
        Some(b) => log::trace!("status {code} resolved to {} via {}", b.descriptor.type_name(), b.range),
        None => log::trace!("status {code} matches no declared outcome"),
    }

    best
}
