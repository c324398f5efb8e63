//! Per-representer cache of ordered property sets.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use super::{ordered_properties, Property, TypeDescriptor};

/// Reads and orders a type's properties, caching the result per descriptor
/// identity. Two descriptors with the same name but different identity never
/// share an entry.
///
/// Entries live as long as the cache: a representer fed descriptors built at
/// runtime keeps one entry per descriptor until [`PropertyUtils::clear`] is
/// called.
#[derive(Debug, Default)]
pub struct PropertyUtils {
    cache: RefCell<HashMap<u64, Arc<[Property]>>>,
}

impl PropertyUtils {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered property set for a type.
    pub fn get_properties(&self, descriptor: &TypeDescriptor) -> Arc<[Property]> {
        if let Some(cached) = self.cache.borrow().get(&descriptor.id()) {
            return Arc::clone(cached);
        }

        let ordered: Arc<[Property]> = ordered_properties(descriptor.properties()).into();
        tracing::trace!(
            "ordered {} properties for {}",
            ordered.len(),
            descriptor.name()
        );
        self.cache
            .borrow_mut()
            .insert(descriptor.id(), Arc::clone(&ordered));
        ordered
    }

    /// Drop all cached property sets.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Number of cached types.
    pub fn cached_types(&self) -> usize {
        self.cache.borrow().len()
    }
}
