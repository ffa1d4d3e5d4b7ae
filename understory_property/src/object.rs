// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Styled element traits and shared element handles.
//!
//! This module provides the [`StyledElement`] trait for elements that carry
//! styled properties, [`StyledElementExt`] for convenient property access, and
//! [`ElementRef`], the shared handle used when an element itself is a value
//! (for example a materialized template instance).

use alloc::rc::{Rc, Weak};
use core::any::TypeId;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;

use understory_coerce::{FromValue, ObjectRef, ObjectType, TargetType, TypeKind, Value};

use crate::binding::InstancedBinding;
use crate::id::StyledProperty;
use crate::name_scope::NameScope;
use crate::store::{PropertyStore, StyleSource, StyleSourceId};

/// An element that can have styled properties.
///
/// This trait is object safe; styles and setters operate on
/// `&mut dyn StyledElement`.
///
/// # Example
///
/// ```rust
/// use understory_property::{PropertyStore, StyledElement};
///
/// struct Button {
///     name: Option<String>,
///     store: PropertyStore,
/// }
///
/// impl StyledElement for Button {
///     fn name(&self) -> Option<&str> {
///         self.name.as_deref()
///     }
///
///     fn property_store(&self) -> &PropertyStore {
///         &self.store
///     }
///
///     fn property_store_mut(&mut self) -> &mut PropertyStore {
///         &mut self.store
///     }
/// }
/// ```
pub trait StyledElement {
    /// Returns the element's type name, used in diagnostics.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Returns the element's name, if it has one.
    ///
    /// Named elements are registered in name scopes when materialized.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Returns a reference to the element's property store.
    fn property_store(&self) -> &PropertyStore;

    /// Returns a mutable reference to the element's property store.
    fn property_store_mut(&mut self) -> &mut PropertyStore;
}

/// Extension methods for [`StyledElement`].
///
/// These methods delegate to the element's [`PropertyStore`].
pub trait StyledElementExt: StyledElement {
    /// Gets the effective value (Local → Style → default).
    fn get_value<'a>(&'a self, property: &'a StyledProperty) -> &'a Value {
        self.property_store().get_value(property)
    }

    /// Converts and sets the local value. Returns `false` if rejected.
    fn set_value(&mut self, property: &StyledProperty, value: impl Into<Value>) -> bool {
        self.property_store_mut().set_value(property, value)
    }

    /// Clears the local value.
    fn clear_value(&mut self, property: &StyledProperty) -> bool {
        self.property_store_mut().clear_value(property)
    }

    /// Converts and sets a one-time style value under `source`.
    fn set_style_value(
        &mut self,
        property: &StyledProperty,
        source: StyleSource,
        value: impl Into<Value>,
    ) -> bool {
        self.property_store_mut()
            .set_style_value(property, source, value)
    }

    /// Attaches a binding under `source`.
    fn bind(
        &mut self,
        property: &StyledProperty,
        source: StyleSource,
        binding: InstancedBinding,
    ) -> bool {
        self.property_store_mut().bind(property, source, binding)
    }

    /// Pulls pending values from every tracked binding.
    fn sync_bindings(&mut self) -> usize {
        self.property_store_mut().sync_bindings()
    }

    /// Returns `true` if the property is tracking a live binding.
    fn has_binding(&self, property: &StyledProperty) -> bool {
        self.property_store().has_binding(property)
    }

    /// Removes every style entry attributed to the style `id`.
    fn detach_style(&mut self, id: StyleSourceId) -> usize {
        self.property_store_mut().detach_style(id)
    }

    /// Returns the name scope rooted at this element, if any.
    fn name_scope(&self) -> Option<&NameScope> {
        self.property_store().name_scope()
    }

    /// Roots a name scope at this element, returning the previous one.
    fn set_name_scope(&mut self, scope: NameScope) -> Option<NameScope> {
        self.property_store_mut().set_name_scope(scope)
    }
}

// Blanket implementation for all StyledElement types, including trait objects
impl<T: StyledElement + ?Sized> StyledElementExt for T {}

/// A shared, mutable handle to an element.
///
/// Used wherever an element is passed around as a value. Equality is identity.
///
/// # Example
///
/// ```rust
/// use understory_property::{ElementRef, PropertyStore, StyledElement};
///
/// #[derive(Default)]
/// struct Panel {
///     store: PropertyStore,
/// }
///
/// impl StyledElement for Panel {
///     fn property_store(&self) -> &PropertyStore { &self.store }
///     fn property_store_mut(&mut self) -> &mut PropertyStore { &mut self.store }
/// }
///
/// let panel = ElementRef::new(Panel::default());
/// assert!(panel.is::<Panel>());
/// assert!(panel.ptr_eq(&panel.clone()));
/// assert!(!panel.ptr_eq(&ElementRef::new(Panel::default())));
/// ```
#[derive(Clone)]
pub struct ElementRef {
    inner: Rc<RefCell<dyn StyledElement>>,
    type_id: TypeId,
}

impl ElementRef {
    /// Wraps an element.
    #[must_use]
    pub fn new<E: StyledElement + 'static>(element: E) -> Self {
        let inner: Rc<RefCell<dyn StyledElement>> = Rc::new(RefCell::new(element));
        Self {
            inner,
            type_id: TypeId::of::<E>(),
        }
    }

    /// Immutably borrows the element.
    ///
    /// # Panics
    ///
    /// Panics if the element is currently mutably borrowed.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, dyn StyledElement> {
        self.inner.borrow()
    }

    /// Mutably borrows the element.
    ///
    /// # Panics
    ///
    /// Panics if the element is currently borrowed.
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, dyn StyledElement> {
        self.inner.borrow_mut()
    }

    /// Returns `true` if the element's concrete type is `E`.
    #[must_use]
    pub fn is<E: StyledElement + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<E>()
    }

    /// Returns `true` if both handles refer to the same element.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Creates a handle that does not keep the element alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakElementRef {
        WeakElementRef {
            inner: Rc::downgrade(&self.inner),
            type_id: self.type_id,
        }
    }

    /// Returns `true` if a slot of type `target` can hold an element.
    #[must_use]
    pub fn is_assignable_to(target: &TargetType) -> bool {
        matches!(
            target.kind(),
            TypeKind::Object(ty) if ty.is_any() || *ty == ObjectType::of::<Self>()
        )
    }
}

impl PartialEq for ElementRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ElementRef");
        match self.inner.try_borrow() {
            Ok(element) => debug
                .field("type", &element.type_name())
                .field("name", &element.name()),
            Err(_) => debug.field("type", &"<borrowed>"),
        };
        debug.finish_non_exhaustive()
    }
}

impl From<ElementRef> for Value {
    fn from(element: ElementRef) -> Self {
        Self::Object(ObjectRef::element(element))
    }
}

impl FromValue for ElementRef {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_object()?.downcast_ref::<Self>().cloned()
    }
}

/// A non-owning [`ElementRef`].
#[derive(Clone)]
pub struct WeakElementRef {
    inner: Weak<RefCell<dyn StyledElement>>,
    type_id: TypeId,
}

impl WeakElementRef {
    /// Returns the element if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<ElementRef> {
        Some(ElementRef {
            inner: self.inner.upgrade()?,
            type_id: self.type_id,
        })
    }
}

impl fmt::Debug for WeakElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakElementRef")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish_non_exhaustive()
    }
}
