// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic values.
//!
//! This module provides [`Value`], the untyped value produced by data sources
//! and consumed by converters, and [`ObjectRef`], a shared handle used for
//! values that are not part of the closed primitive set.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use chrono::NaiveDate;

use crate::enums::EnumValue;
use crate::types::PrimitiveType;

/// An untyped value flowing from a data source towards a target property.
///
/// `Null` is a real value (the absence of an object), not a failure marker.
///
/// # Example
///
/// ```rust
/// use understory_coerce::Value;
///
/// let value = Value::from("42");
/// assert_eq!(value.as_str(), Some("42"));
/// assert_eq!(Value::Null.to_string(), "(null)");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// No object.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A single character.
    Char(char),
    /// An 8-bit signed integer.
    I8(i8),
    /// A 16-bit signed integer.
    I16(i16),
    /// A 32-bit signed integer.
    I32(i32),
    /// A 64-bit signed integer.
    I64(i64),
    /// An 8-bit unsigned integer.
    U8(u8),
    /// A 16-bit unsigned integer.
    U16(u16),
    /// A 32-bit unsigned integer.
    U32(u32),
    /// A 64-bit unsigned integer.
    U64(u64),
    /// A single-precision float.
    F32(f32),
    /// A double-precision float.
    F64(f64),
    /// A calendar date.
    Date(NaiveDate),
    /// A string.
    String(String),
    /// A member (declared or not) of an enumerated type.
    Enum(EnumValue),
    /// An ordered sequence of values.
    Sequence(Vec<Value>),
    /// Any other object, held by reference.
    Object(ObjectRef),
}

/// The shape of a [`Value`], resolved once per conversion.
///
/// Conversion rules match on this tag in priority order instead of probing
/// the value repeatedly.
#[derive(Copy, Clone, Debug)]
pub enum ValueKind<'a> {
    /// The value is [`Value::Null`].
    Null,
    /// A primitive (numeric, boolean, character or date) value.
    Primitive(PrimitiveType),
    /// A string.
    Text(&'a str),
    /// An enum member.
    Enum(&'a EnumValue),
    /// An ordered sequence.
    Sequence(&'a [Value]),
    /// An object reference.
    Reference(&'a ObjectRef),
}

impl Value {
    /// Classifies this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind<'_> {
        if let Some(ty) = self.primitive_type() {
            return ValueKind::Primitive(ty);
        }
        match self {
            Self::String(s) => ValueKind::Text(s),
            Self::Enum(e) => ValueKind::Enum(e),
            Self::Sequence(items) => ValueKind::Sequence(items),
            Self::Object(object) => ValueKind::Reference(object),
            _ => ValueKind::Null,
        }
    }

    /// Returns the primitive type of this value, if it is a primitive.
    #[must_use]
    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        Some(match self {
            Self::Bool(_) => PrimitiveType::Bool,
            Self::Char(_) => PrimitiveType::Char,
            Self::I8(_) => PrimitiveType::I8,
            Self::I16(_) => PrimitiveType::I16,
            Self::I32(_) => PrimitiveType::I32,
            Self::I64(_) => PrimitiveType::I64,
            Self::U8(_) => PrimitiveType::U8,
            Self::U16(_) => PrimitiveType::U16,
            Self::U32(_) => PrimitiveType::U32,
            Self::U64(_) => PrimitiveType::U64,
            Self::F32(_) => PrimitiveType::F32,
            Self::F64(_) => PrimitiveType::F64,
            Self::Date(_) => PrimitiveType::Date,
            Self::Null
            | Self::String(_)
            | Self::Enum(_)
            | Self::Sequence(_)
            | Self::Object(_) => return None,
        })
    }

    /// Returns `true` if this is [`Value::Null`].
    #[must_use]
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string slice if this is a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the enum member if this is a [`Value::Enum`].
    #[must_use]
    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the object reference if this is a [`Value::Object`].
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the items if this is a [`Value::Sequence`].
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("(null)"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Enum(v) => write!(f, "{v}"),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(object) => f.write_str(object.short_type_name()),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    NaiveDate => Date,
    String => String,
    EnumValue => Enum,
    ObjectRef => Object,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::Sequence(items)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A shared reference to an arbitrary object.
///
/// Cloning an `ObjectRef` shares the object; it never copies it. Two handles
/// are equal when they point at the same object.
///
/// # Example
///
/// ```rust
/// use understory_coerce::ObjectRef;
///
/// #[derive(Debug)]
/// struct Brush(u32);
///
/// let brush = ObjectRef::new(Brush(0xff0000));
/// let shared = brush.clone();
///
/// assert!(brush.is::<Brush>());
/// assert!(brush.ptr_eq(&shared));
/// assert_eq!(brush.downcast_ref::<Brush>().map(|b| b.0), Some(0xff0000));
/// ```
#[derive(Clone)]
pub struct ObjectRef {
    inner: Rc<dyn Any>,
    type_id: TypeId,
    type_name: &'static str,
    element: bool,
}

impl ObjectRef {
    /// Wraps `value` in a new shared object.
    #[must_use]
    pub fn new<T: 'static>(value: T) -> Self {
        Self::from_rc(Rc::new(value))
    }

    /// Wraps an already shared object.
    #[must_use]
    pub fn from_rc<T: 'static>(value: Rc<T>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
            inner: value,
            element: false,
        }
    }

    /// Wraps a handle to a UI element.
    ///
    /// Element objects are tagged so that places that must not receive an
    /// element, such as setter literals, can refuse them.
    #[must_use]
    pub fn element<T: 'static>(value: T) -> Self {
        Self {
            element: true,
            ..Self::new(value)
        }
    }

    /// Returns `true` if this object was created by [`ObjectRef::element`].
    #[must_use]
    #[inline]
    pub fn is_element(&self) -> bool {
        self.element
    }

    /// Returns the [`TypeId`] of the referenced object.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the full type name of the referenced object.
    #[must_use]
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the type name without its module path.
    #[must_use]
    pub fn short_type_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }

    /// Returns `true` if the referenced object is a `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Borrows the referenced object as a `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    /// Returns a shared handle to the referenced object as a `T`.
    #[must_use]
    pub fn downcast<T: 'static>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.inner).downcast().ok()
    }

    /// Returns `true` if both handles reference the same object.
    #[must_use]
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("type_name", &self.type_name)
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}

/// Strips the module path from a type name, leaving generic arguments alone.
pub(crate) fn short_type_name(name: &'static str) -> &'static str {
    let base = name.split('<').next().unwrap_or(name);
    match base.rfind("::") {
        Some(idx) if base.len() == name.len() => &name[idx + 2..],
        _ => name,
    }
}
