// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Name scopes for materialized sub-trees.

use alloc::string::String;
use core::fmt;
use hashbrown::HashMap;
use thiserror::Error;

use understory_coerce::ObjectRef;

use crate::object::{ElementRef, WeakElementRef};

/// Errors reported by [`NameScope`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NameScopeError {
    /// Another object is already registered under this name.
    #[error("name '{name}' is already registered in this scope")]
    Duplicate {
        /// The conflicting name.
        name: String,
    },
}

/// A namespace mapping names to objects within one materialized sub-tree.
///
/// # Example
///
/// ```rust
/// use understory_coerce::ObjectRef;
/// use understory_property::{NameScope, NameScopeError};
///
/// let mut scope = NameScope::new();
/// scope.register("header", ObjectRef::new(1_u32)).unwrap();
///
/// assert!(scope.find("header").is_some());
/// assert!(matches!(
///     scope.register("header", ObjectRef::new(2_u32)),
///     Err(NameScopeError::Duplicate { .. })
/// ));
/// ```
#[derive(Clone, Default)]
pub struct NameScope {
    entries: HashMap<String, ObjectRef>,
}

impl NameScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `object` under `name`.
    ///
    /// Registering the same object under the same name twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`NameScopeError::Duplicate`] if a different object already
    /// uses `name`.
    pub fn register(&mut self, name: &str, object: ObjectRef) -> Result<(), NameScopeError> {
        match self.entries.get(name) {
            Some(existing) if existing.ptr_eq(&object) => Ok(()),
            Some(_) => Err(NameScopeError::Duplicate { name: name.into() }),
            None => {
                self.entries.insert(name.into(), object);
                Ok(())
            }
        }
    }

    /// Returns the object registered under `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ObjectRef> {
        self.entries.get(name)
    }

    /// Returns the element registered under `name`, if it is still alive.
    ///
    /// Elements may be registered either strongly ([`ElementRef`]) or weakly
    /// ([`WeakElementRef`]); both are resolved.
    #[must_use]
    pub fn find_element(&self, name: &str) -> Option<ElementRef> {
        let object = self.find(name)?;
        if let Some(element) = object.downcast_ref::<ElementRef>() {
            return Some(element.clone());
        }
        object.downcast_ref::<WeakElementRef>()?.upgrade()
    }

    /// Removes the registration for `name`, returning the object.
    pub fn unregister(&mut self, name: &str) -> Option<ObjectRef> {
        self.entries.remove(name)
    }

    /// Returns the number of registered names.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no names are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the registered names in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl fmt::Debug for NameScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    #[test]
    fn register_and_find() {
        let mut scope = NameScope::new();
        let object = ObjectRef::new("button");
        assert!(scope.is_empty());

        scope.register("ok", object.clone()).unwrap();
        assert_eq!(scope.len(), 1);
        assert!(scope.find("ok").is_some_and(|found| found.ptr_eq(&object)));
        assert!(scope.find("cancel").is_none());
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut scope = NameScope::new();
        scope.register("ok", ObjectRef::new(1_u8)).unwrap();

        let err = scope.register("ok", ObjectRef::new(2_u8)).unwrap_err();
        assert_eq!(err.to_string(), "name 'ok' is already registered in this scope");
    }

    #[test]
    fn reregistering_same_object_is_allowed() {
        let mut scope = NameScope::new();
        let object = ObjectRef::new(1_u8);
        scope.register("ok", object.clone()).unwrap();
        assert!(scope.register("ok", object).is_ok());
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn unregister_frees_the_name() {
        let mut scope = NameScope::new();
        scope.register("ok", ObjectRef::new(1_u8)).unwrap();
        assert!(scope.unregister("ok").is_some());
        assert!(scope.unregister("ok").is_none());
        assert!(scope.register("ok", ObjectRef::new(2_u8)).is_ok());
    }

    #[test]
    fn names_lists_registrations() {
        let mut scope = NameScope::new();
        scope.register("a", ObjectRef::new(1_u8)).unwrap();
        scope.register("b", ObjectRef::new(2_u8)).unwrap();
        let mut names: Vec<_> = scope.names().collect();
        names.sort_unstable();
        assert_eq!(names, ["a", "b"]);
    }
}
