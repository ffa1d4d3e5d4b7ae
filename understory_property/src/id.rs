// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property identification types.
//!
//! This module provides [`PropertyId`] for compact runtime identification and
//! [`StyledProperty`], the shared handle that carries a property's declared
//! type and metadata wherever the property is referenced.

use alloc::rc::Rc;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::sync::atomic::{AtomicU32, Ordering};

use understory_coerce::{TargetType, Value};

use crate::metadata::PropertyMetadata;
use crate::registry::PropertyRegistration;

/// A runtime property identifier.
///
/// This is a lightweight handle (u32) that identifies one registration.
/// IDs are allocated from a process-wide counter, so properties from
/// different [`PropertyRegistry`](crate::PropertyRegistry) instances never
/// share an ID and can be stored side by side on one element.
///
/// # Example
///
/// ```rust
/// use understory_property::PropertyId;
///
/// let id = PropertyId::new(42);
/// assert_eq!(id.get(), 42);
/// assert_ne!(PropertyId::next(), PropertyId::next());
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u32);

impl PropertyId {
    /// Allocates a process-unique ID.
    ///
    /// This is typically called by [`PropertyRegistry::register`](crate::PropertyRegistry::register)
    /// rather than directly.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw ID.
    #[must_use]
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw ID.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyId").field(&self.0).finish()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId({})", self.0)
    }
}

/// A registered property.
///
/// Cloning is cheap: all clones share one registration. The handle knows the
/// property's name, declared [`TargetType`] and default value, so setters and
/// bindings can validate and convert values without access to the registry.
///
/// # Example
///
/// ```rust
/// use understory_coerce::{PrimitiveType, TargetType, Value};
/// use understory_property::{PropertyMetadataBuilder, PropertyRegistry};
///
/// let mut registry = PropertyRegistry::new();
/// let opacity = registry.register(
///     "Opacity",
///     PropertyMetadataBuilder::new(TargetType::primitive(PrimitiveType::F64), 1.0_f64).build(),
/// );
///
/// assert_eq!(opacity.name(), "Opacity");
/// assert_eq!(opacity.default_value(), &Value::F64(1.0));
/// assert_eq!(opacity.property_type().to_string(), "f64");
/// ```
#[derive(Clone)]
pub struct StyledProperty {
    inner: Rc<PropertyRegistration>,
}

impl StyledProperty {
    pub(crate) fn new(registration: PropertyRegistration) -> Self {
        Self {
            inner: Rc::new(registration),
        }
    }

    /// Returns the property ID.
    #[must_use]
    #[inline]
    pub fn id(&self) -> PropertyId {
        self.inner.id
    }

    /// Returns the property name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Returns the declared value type.
    #[must_use]
    #[inline]
    pub fn property_type(&self) -> &TargetType {
        self.inner.metadata.property_type()
    }

    /// Returns the default value.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> &Value {
        self.inner.metadata.default_value()
    }

    /// Returns the property metadata.
    #[must_use]
    #[inline]
    pub fn metadata(&self) -> &PropertyMetadata {
        &self.inner.metadata
    }
}

impl PartialEq for StyledProperty {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for StyledProperty {}

impl Hash for StyledProperty {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for StyledProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyledProperty")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("type", &format_args!("{}", self.property_type()))
            .finish_non_exhaustive()
    }
}
