// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared style definitions.
//!
//! This module provides [`Style`], a shared list of [`Setter`]s that can be
//! applied to many elements.

use alloc::rc::Rc;
use alloc::vec::Vec;

use understory_property::{
    NameScope, StyleOrigin, StyleSource, StyleSourceId, StyledElement, StyledElementExt,
};

use crate::setter::{Setter, SetterError};

/// A shared, immutable list of property setters.
///
/// Every style has its own [`StyleSource`], so the values it applies can be
/// attributed to it and detached again. Styles are immutable after creation;
/// use [`StyleBuilder`] to construct them.
///
/// # Memory Layout
///
/// Internally, `Style` wraps an `Rc<StyleData>`, making cloning cheap (just
/// incrementing a reference count). A clone keeps the same source.
///
/// # Example
///
/// ```rust
/// use understory_coerce::{PrimitiveType, TargetType, Value};
/// use understory_property::{
///     PropertyMetadataBuilder, PropertyRegistry, PropertyStore, StyleOrigin, StyledElement,
///     StyledElementExt,
/// };
/// use understory_style::{Setter, SetterValue, StyleBuilder};
///
/// #[derive(Default)]
/// struct Button {
///     store: PropertyStore,
/// }
///
/// impl StyledElement for Button {
///     fn property_store(&self) -> &PropertyStore { &self.store }
///     fn property_store_mut(&mut self) -> &mut PropertyStore { &mut self.store }
/// }
///
/// let mut registry = PropertyRegistry::new();
/// let width = registry.register(
///     "Width",
///     PropertyMetadataBuilder::new(TargetType::primitive(PrimitiveType::F64), 0.0_f64).build(),
/// );
///
/// let style = StyleBuilder::new()
///     .origin(StyleOrigin::Sheet)
///     .setter(Setter::new(width.clone(), SetterValue::literal("100")).unwrap())
///     .build();
///
/// let mut button = Button::default();
/// style.apply(&mut button, None).unwrap();
/// assert_eq!(button.get_value(&width), &Value::F64(100.0));
///
/// style.detach(&mut button);
/// assert_eq!(button.get_value(&width), &Value::F64(0.0));
/// ```
#[derive(Clone, Debug)]
pub struct Style {
    inner: Rc<StyleData>,
}

#[derive(Debug)]
struct StyleData {
    source: StyleSource,
    setters: Vec<Setter>,
}

impl Style {
    /// Returns the source every value applied by this style is attributed to.
    #[must_use]
    #[inline]
    pub fn source(&self) -> StyleSource {
        self.inner.source
    }

    /// Returns `true` if this style has no setters.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.setters.is_empty()
    }

    /// Returns the number of setters in this style.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.setters.len()
    }

    /// Returns the setters in application order.
    #[must_use]
    pub fn setters(&self) -> &[Setter] {
        &self.inner.setters
    }

    /// Applies every setter to `target`, in order.
    ///
    /// # Errors
    ///
    /// Stops at, and returns, the first setter error. Setters before it stay
    /// applied.
    pub fn apply(
        &self,
        target: &mut dyn StyledElement,
        mut name_scope: Option<&mut NameScope>,
    ) -> Result<(), SetterError> {
        let source = self.source();
        for setter in &self.inner.setters {
            setter.apply(source, target, name_scope.as_deref_mut())?;
        }
        Ok(())
    }

    /// Removes every value and binding this style applied to `target`.
    ///
    /// Returns the number of properties affected.
    pub fn detach(&self, target: &mut dyn StyledElement) -> usize {
        target.detach_style(self.source().id())
    }
}

/// Builder for constructing [`Style`] instances.
#[derive(Debug, Default)]
pub struct StyleBuilder {
    origin: StyleOrigin,
    id: Option<StyleSourceId>,
    setters: Vec<Setter>,
}

impl StyleBuilder {
    /// Creates a new empty style builder with the [`StyleOrigin::Base`] origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the origin the style's values are stored with.
    #[must_use]
    pub fn origin(mut self, origin: StyleOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Uses a fixed source id instead of allocating one.
    #[must_use]
    pub fn id(mut self, id: StyleSourceId) -> Self {
        self.id = Some(id);
        self
    }

    /// Appends a setter.
    ///
    /// Setters are applied in the order they were added, so a later setter
    /// for the same property wins.
    #[must_use]
    pub fn setter(mut self, setter: Setter) -> Self {
        self.setters.push(setter);
        self
    }

    /// Builds the style.
    #[must_use]
    pub fn build(self) -> Style {
        let source = match self.id {
            Some(id) => StyleSource::with_id(id, self.origin),
            None => StyleSource::new(self.origin),
        };
        Style {
            inner: Rc::new(StyleData {
                source,
                setters: self.setters,
            }),
        }
    }
}
