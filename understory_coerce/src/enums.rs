// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enumerated types described by explicit metadata tables.
//!
//! An [`EnumType`] is registered once with its declared members and their
//! integer values. [`EnumValue`] pairs a type with a raw integer, which need
//! not correspond to a declared member.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

/// A named-integer type with a table of declared members.
///
/// Enum types are identified by their table: clones compare equal, while two
/// independently built tables never do, even with the same name. Build each
/// type once and share it.
///
/// # Example
///
/// ```rust
/// use understory_coerce::EnumType;
///
/// let orientation = EnumType::builder("Orientation")
///     .member("Horizontal", 0)
///     .member("Vertical", 1)
///     .build();
///
/// assert_eq!(orientation.member(1), Some("Vertical"));
/// assert_eq!(orientation.by_name("Horizontal").map(|v| v.raw()), Some(0));
///
/// // Raw integers are never validated.
/// let odd = orientation.value(7);
/// assert!(!odd.is_defined());
/// ```
#[derive(Clone)]
pub struct EnumType {
    inner: Rc<EnumTypeData>,
}

#[derive(Debug)]
struct EnumTypeData {
    name: &'static str,
    /// Declaration order.
    members: Vec<(&'static str, i32)>,
}

impl EnumType {
    /// Starts building an enum type with the given name.
    #[must_use]
    pub fn builder(name: &'static str) -> EnumTypeBuilder {
        EnumTypeBuilder {
            name,
            members: Vec::new(),
        }
    }

    /// Returns the type name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    /// Returns the declared members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.inner.members.iter().copied()
    }

    /// Returns the first declared member name for `raw`.
    #[must_use]
    pub fn member(&self, raw: i32) -> Option<&'static str> {
        self.inner
            .members
            .iter()
            .find(|(_, value)| *value == raw)
            .map(|(name, _)| *name)
    }

    /// Looks up a declared member by its exact name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<EnumValue> {
        self.inner
            .members
            .iter()
            .find(|(member, _)| *member == name)
            .map(|(_, raw)| self.value(*raw))
    }

    /// Returns `true` if some declared member has the value `raw`.
    #[must_use]
    pub fn is_defined(&self, raw: i32) -> bool {
        self.member(raw).is_some()
    }

    /// Produces the value of this type for `raw`.
    ///
    /// The integer is not checked against the declared members.
    #[must_use]
    pub fn value(&self, raw: i32) -> EnumValue {
        EnumValue {
            ty: self.clone(),
            raw,
        }
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for EnumType {}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumType")
            .field("name", &self.inner.name)
            .field("members", &self.inner.members.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`EnumType`].
#[derive(Debug)]
pub struct EnumTypeBuilder {
    name: &'static str,
    members: Vec<(&'static str, i32)>,
}

impl EnumTypeBuilder {
    /// Declares a member.
    ///
    /// Several members may share a value; the first one declared is used
    /// when naming a raw integer.
    ///
    /// # Panics
    ///
    /// Panics if a member with the same name was already declared.
    #[must_use]
    pub fn member(mut self, name: &'static str, raw: i32) -> Self {
        assert!(
            self.members.iter().all(|(member, _)| *member != name),
            "Enum member '{}::{name}' is already declared",
            self.name
        );
        self.members.push((name, raw));
        self
    }

    /// Builds the enum type.
    #[must_use]
    pub fn build(self) -> EnumType {
        EnumType {
            inner: Rc::new(EnumTypeData {
                name: self.name,
                members: self.members,
            }),
        }
    }
}

/// A value of an [`EnumType`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    ty: EnumType,
    raw: i32,
}

impl EnumValue {
    /// Returns the enum type.
    #[must_use]
    #[inline]
    pub fn ty(&self) -> &EnumType {
        &self.ty
    }

    /// Returns the underlying integer.
    #[must_use]
    #[inline]
    pub fn raw(&self) -> i32 {
        self.raw
    }

    /// Returns the declared member name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        self.ty.member(self.raw)
    }

    /// Returns `true` if the integer corresponds to a declared member.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.ty.is_defined(self.raw)
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.raw),
        }
    }
}
