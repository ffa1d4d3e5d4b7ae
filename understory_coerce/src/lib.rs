// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Coerce: value coercion and conversion notifications.
//!
//! This crate converts untyped values produced by data sources into the type a
//! target property requires. Conversion never panics and never returns an
//! error across the source/target boundary; instead every outcome is reported
//! as a [`ConversionNotification`]:
//!
//! - **Value** - the converted value (possibly [`Value::Null`])
//! - **Error** - the conversion was attempted and failed, with the cause
//! - **Unset** - the converter does not apply, so the caller should fall back
//!
//! ## Building Blocks
//!
//! - [`coerce`] - the non-failing coercion rules ([`coerce::try_convert`],
//!   [`coerce::try_cast`], [`coerce::try_convert_enum`])
//! - [`TargetType`] - the declared type of a conversion target
//! - [`EnumType`] - explicit metadata for named-integer types
//! - [`Culture`] - number and date formatting conventions used when parsing
//! - [`ValueConverter`] - the converter seam, with [`DefaultValueConverter`]
//!   and the function-backed [`FuncValueConverter`]
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_coerce::{
//!     ConversionError, Culture, DefaultValueConverter, EnumType, PrimitiveType, TargetType,
//!     Value, ValueConverter,
//! };
//!
//! let culture = Culture::INVARIANT;
//! let converter = DefaultValueConverter;
//!
//! // Strings parse into numbers.
//! let width = TargetType::primitive(PrimitiveType::F64);
//! let result = converter.convert(&Value::from("12.5"), &width, None, &culture);
//! assert_eq!(result.value(), Some(&Value::F64(12.5)));
//!
//! // Integers bridge into enums, declared or not.
//! let dock = EnumType::builder("Dock").member("Left", 0).member("Top", 1).build();
//! let target = TargetType::enumeration(&dock);
//! let result = converter.convert(&Value::I32(1), &target, None, &culture);
//! assert_eq!(result.value().map(ToString::to_string).as_deref(), Some("Top"));
//!
//! // Failures are reported, not raised.
//! let result = converter.convert(&Value::from("wide"), &width, None, &culture);
//! assert!(matches!(result.error(), Some(ConversionError::InvalidCast { .. })));
//! ```
//!
//! ## Logging
//!
//! Diagnostic events are emitted through `tracing`. The crate never installs a
//! subscriber.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

pub mod coerce;
mod converter;
mod culture;
mod enums;
mod notification;
mod types;
mod value;

pub use converter::{
    DefaultValueConverter, FromValue, FuncValueConverter, IntoValue, ValueConverter,
};
pub use culture::Culture;
pub use enums::{EnumType, EnumTypeBuilder, EnumValue};
pub use notification::{
    ConversionError, ConversionNotification, ErrorSeverity, UnsupportedOperation,
};
pub use types::{ObjectType, PrimitiveType, TargetType, TypeKind};
pub use value::{ObjectRef, Value, ValueKind};
