// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target type descriptors.
//!
//! A [`TargetType`] is the declared type of the property a value is being
//! converted for. It decides which conversion rules apply and whether `Null`
//! is an acceptable result.

use core::any::TypeId;
use core::fmt;

use crate::enums::EnumType;
use crate::value::{ObjectRef, short_type_name};

/// Primitive value types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// A calendar date.
    Date,
}

impl PrimitiveType {
    /// Returns `true` for integer and floating point types.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Returns `true` for integer types.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
        )
    }

    /// Returns `true` for floating point types.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Returns the type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Date => "Date",
        }
    }
}

/// A reference type: either a specific Rust type or any object at all.
#[derive(Copy, Clone, Debug)]
pub struct ObjectType {
    name: &'static str,
    type_id: Option<TypeId>,
}

impl ObjectType {
    /// The universal reference type: every non-null value is assignable to it.
    pub const ANY: Self = Self {
        name: "Object",
        type_id: None,
    };

    /// The reference type of `T`, named after `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self::named::<T>(short_type_name(core::any::type_name::<T>()))
    }

    /// The reference type of `T` with an explicit display name.
    #[must_use]
    pub fn named<T: 'static>(name: &'static str) -> Self {
        Self {
            name,
            type_id: Some(TypeId::of::<T>()),
        }
    }

    /// Returns the display name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` for [`ObjectType::ANY`].
    #[must_use]
    #[inline]
    pub fn is_any(&self) -> bool {
        self.type_id.is_none()
    }

    /// Returns `true` if `object` may be stored in a slot of this type.
    #[must_use]
    pub fn accepts(&self, object: &ObjectRef) -> bool {
        self.type_id.is_none_or(|id| id == object.type_id())
    }
}

impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

/// The category of a [`TargetType`].
#[derive(Clone, Debug, PartialEq)]
pub enum TypeKind {
    /// A primitive value type.
    Primitive(PrimitiveType),
    /// A string.
    String,
    /// An enumerated type.
    Enum(EnumType),
    /// An ordered sequence of values.
    Sequence,
    /// A reference type.
    Object(ObjectType),
}

/// The declared type of a conversion target.
///
/// # Example
///
/// ```rust
/// use understory_coerce::{PrimitiveType, TargetType};
///
/// let count = TargetType::primitive(PrimitiveType::I32);
/// assert_eq!(count.to_string(), "i32");
/// assert_eq!(count.nullable().to_string(), "Option<i32>");
/// assert_eq!(TargetType::string().to_string(), "String");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TargetType {
    kind: TypeKind,
    nullable: bool,
}

impl TargetType {
    /// A non-nullable primitive type.
    #[must_use]
    pub const fn primitive(ty: PrimitiveType) -> Self {
        Self {
            kind: TypeKind::Primitive(ty),
            nullable: false,
        }
    }

    /// The string type.
    #[must_use]
    pub const fn string() -> Self {
        Self {
            kind: TypeKind::String,
            nullable: true,
        }
    }

    /// The sequence type.
    #[must_use]
    pub const fn sequence() -> Self {
        Self {
            kind: TypeKind::Sequence,
            nullable: true,
        }
    }

    /// A reference type.
    #[must_use]
    pub const fn object(ty: ObjectType) -> Self {
        Self {
            kind: TypeKind::Object(ty),
            nullable: true,
        }
    }

    /// The universal reference type.
    #[must_use]
    pub const fn any() -> Self {
        Self::object(ObjectType::ANY)
    }

    /// A non-nullable enumerated type.
    #[must_use]
    pub fn enumeration(ty: &EnumType) -> Self {
        Self {
            kind: TypeKind::Enum(ty.clone()),
            nullable: false,
        }
    }

    /// Marks a value type as accepting `Null`.
    ///
    /// Reference types always accept `Null`.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Returns the category of this type.
    #[must_use]
    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Returns the nullable flag.
    #[must_use]
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the enum type if this is an enumerated type.
    #[must_use]
    pub fn as_enum(&self) -> Option<&EnumType> {
        match &self.kind {
            TypeKind::Enum(ty) => Some(ty),
            _ => None,
        }
    }

    /// Returns `true` for enumerated types, nullable or not.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.as_enum().is_some()
    }

    /// Returns `true` for every type except sequences.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self.kind, TypeKind::Sequence)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match &self.kind {
            TypeKind::Primitive(ty) => ty.name(),
            TypeKind::String => return f.write_str("String"),
            TypeKind::Enum(ty) => ty.name(),
            TypeKind::Sequence => return f.write_str("Sequence"),
            TypeKind::Object(ty) => return f.write_str(ty.name()),
        };
        if self.nullable {
            write!(f, "Option<{name}>")
        } else {
            f.write_str(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    struct Brush;

    #[test]
    fn primitive_categories() {
        assert!(PrimitiveType::U16.is_integer());
        assert!(PrimitiveType::F32.is_float());
        assert!(PrimitiveType::F64.is_numeric());
        assert!(!PrimitiveType::Bool.is_numeric());
        assert!(!PrimitiveType::Date.is_numeric());
    }

    #[test]
    fn display_names() {
        let dock = EnumType::builder("Dock").member("Left", 0).build();
        assert_eq!(TargetType::primitive(PrimitiveType::F64).to_string(), "f64");
        assert_eq!(TargetType::enumeration(&dock).to_string(), "Dock");
        assert_eq!(
            TargetType::enumeration(&dock).nullable().to_string(),
            "Option<Dock>"
        );
        assert_eq!(TargetType::sequence().to_string(), "Sequence");
        assert_eq!(TargetType::any().to_string(), "Object");
        assert_eq!(
            TargetType::object(ObjectType::of::<Brush>()).to_string(),
            "Brush"
        );
    }

    #[test]
    fn object_type_acceptance() {
        let brush = ObjectRef::new(Brush);
        assert!(ObjectType::ANY.accepts(&brush));
        assert!(ObjectType::of::<Brush>().accepts(&brush));
        assert!(!ObjectType::of::<u32>().accepts(&brush));
    }

    #[test]
    fn scalar_and_enum_queries() {
        let dock = EnumType::builder("Dock").build();
        assert!(TargetType::string().is_scalar());
        assert!(!TargetType::sequence().is_scalar());
        assert!(TargetType::enumeration(&dock).nullable().is_enum());
        assert!(!TargetType::any().is_enum());
    }
}
