// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property registry.
//!
//! This module provides [`PropertyRegistry`] for registering properties and
//! looking them up by name or ID.

use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;

use crate::id::{PropertyId, StyledProperty};
use crate::metadata::PropertyMetadata;

/// A registration entry for a property, shared by every [`StyledProperty`]
/// handle to it.
pub(crate) struct PropertyRegistration {
    pub(crate) id: PropertyId,
    pub(crate) name: &'static str,
    pub(crate) metadata: PropertyMetadata,
}

/// A registry for styled properties.
///
/// Properties are registered once at startup, and the registry provides
/// lookup by name or ID.
///
/// # Example
///
/// ```rust
/// use understory_coerce::{PrimitiveType, TargetType};
/// use understory_property::{PropertyMetadataBuilder, PropertyRegistry};
///
/// let mut registry = PropertyRegistry::new();
///
/// let width = registry.register(
///     "Width",
///     PropertyMetadataBuilder::new(TargetType::primitive(PrimitiveType::F64), 0.0_f64).build(),
/// );
///
/// assert_eq!(registry.by_name("Width"), Some(&width));
/// assert_eq!(registry.get(width.id()).map(|p| p.name()), Some("Width"));
/// ```
#[derive(Default)]
pub struct PropertyRegistry {
    properties: Vec<StyledProperty>,
    by_name: HashMap<&'static str, PropertyId>,
}

impl PropertyRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new property with the given name and metadata.
    ///
    /// The property gets a process-unique [`PropertyId`].
    ///
    /// # Panics
    ///
    /// Panics if a property with the same name is already registered.
    pub fn register(&mut self, name: &'static str, metadata: PropertyMetadata) -> StyledProperty {
        assert!(
            !self.by_name.contains_key(name),
            "Property '{name}' is already registered"
        );

        let id = PropertyId::next();
        let property = StyledProperty::new(PropertyRegistration { id, name, metadata });
        self.properties.push(property.clone());
        self.by_name.insert(name, id);
        property
    }

    /// Returns the number of registered properties.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if no properties are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&StyledProperty> {
        self.by_name.get(name).and_then(|id| self.get(*id))
    }

    /// Looks up a property by ID.
    #[must_use]
    pub fn get(&self, id: PropertyId) -> Option<&StyledProperty> {
        // IDs increase with registration order.
        self.properties
            .binary_search_by_key(&id, StyledProperty::id)
            .ok()
            .map(|idx| &self.properties[idx])
    }

    /// Returns an iterator over all registered properties in registration
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = &StyledProperty> {
        self.properties.iter()
    }
}

impl fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("count", &self.properties.len())
            .field("properties", &self.by_name.keys().collect::<Vec<_>>())
            .finish()
    }
}
