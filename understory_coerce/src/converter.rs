// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value converters.
//!
//! A [`ValueConverter`] sits between a value source and a target property.
//! Converters never fail across that boundary: every outcome, including a
//! failed conversion, is reported as a [`ConversionNotification`].

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::type_name;
use core::error::Error as StdError;
use core::fmt;

use chrono::NaiveDate;

use crate::coerce;
use crate::culture::Culture;
use crate::enums::EnumValue;
use crate::notification::{
    ConversionError, ConversionNotification, ErrorSeverity, UnsupportedOperation,
};
use crate::types::TargetType;
use crate::value::{ObjectRef, Value};

/// Converts values on their way to (and optionally from) a target property.
pub trait ValueConverter {
    /// Converts `value` for a property of type `target`.
    ///
    /// `parameter` is an optional converter-specific argument supplied by the
    /// binding definition.
    fn convert(
        &self,
        value: &Value,
        target: &TargetType,
        parameter: Option<&Value>,
        culture: &Culture,
    ) -> ConversionNotification;

    /// Converts a target value back towards its source.
    ///
    /// Returns `Err` if the converter is one-directional.
    fn convert_back(
        &self,
        value: &Value,
        target: &TargetType,
        parameter: Option<&Value>,
        culture: &Culture,
    ) -> Result<ConversionNotification, UnsupportedOperation>;
}

/// The converter used when a binding does not name one.
///
/// Tries [`coerce::try_convert`] and then [`coerce::try_convert_enum`]. `Null`
/// passes through to targets that accept it; everything else that fails
/// becomes an [`ConversionError::InvalidCast`] notification.
///
/// # Example
///
/// ```rust
/// use understory_coerce::{
///     Culture, DefaultValueConverter, PrimitiveType, TargetType, Value, ValueConverter,
/// };
///
/// let converter = DefaultValueConverter;
/// let target = TargetType::primitive(PrimitiveType::I32);
///
/// let ok = converter.convert(&Value::from("42"), &target, None, &Culture::INVARIANT);
/// assert_eq!(ok.value(), Some(&Value::I32(42)));
///
/// let failed = converter.convert(&Value::from("foo"), &target, None, &Culture::INVARIANT);
/// assert_eq!(
///     failed.error().map(|e| e.to_string()).as_deref(),
///     Some("Could not convert 'foo' to 'i32'"),
/// );
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultValueConverter;

impl ValueConverter for DefaultValueConverter {
    fn convert(
        &self,
        value: &Value,
        target: &TargetType,
        _parameter: Option<&Value>,
        culture: &Culture,
    ) -> ConversionNotification {
        if !value.is_null() {
            let converted = coerce::try_convert(target, value, culture)
                .or_else(|| coerce::try_convert_enum(value, target, culture));
            if let Some(converted) = converted {
                return ConversionNotification::Value(converted);
            }
        }

        if !value.is_null() || !coerce::accepts_null(target) {
            return ConversionNotification::from_error(
                ConversionError::invalid_cast(value, target),
                ErrorSeverity::Error,
            );
        }

        ConversionNotification::null()
    }

    fn convert_back(
        &self,
        value: &Value,
        target: &TargetType,
        parameter: Option<&Value>,
        culture: &Culture,
    ) -> Result<ConversionNotification, UnsupportedOperation> {
        Ok(self.convert(value, target, parameter, culture))
    }
}

/// Exact extraction of a Rust value from a [`Value`].
///
/// No coercion is performed: an `i32` is extracted only from
/// [`Value::I32`]. `Option<T>` and [`Value`] itself also accept `Null`.
pub trait FromValue: Sized {
    /// Extracts `Self`, or returns `None` if `value` has a different type.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(inner) => Some(Self::clone(inner)),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_value! {
    Bool => bool,
    Char => char,
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    F32 => f32,
    F64 => f64,
    Date => NaiveDate,
    String => String,
    Enum => EnumValue,
    Sequence => Vec<Value>,
    Object => ObjectRef,
}

impl FromValue for Value {
    fn from_value(value: &Self) -> Option<Self> {
        Some(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            Some(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl<T: 'static> FromValue for Rc<T> {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_object()?.downcast::<T>()
    }
}

/// Conversion of a transform result into a [`Value`].
pub trait IntoValue {
    /// Wraps `self` as a [`Value`].
    fn into_value(self) -> Value;
}

impl<T: Into<Value>> IntoValue for T {
    fn into_value(self) -> Value {
        self.into()
    }
}

type Transform<TIn, TOut> = dyn Fn(TIn) -> Result<TOut, ConversionError>;

/// A one-directional converter backed by a function.
///
/// The function runs only when the input has exactly the type `TIn`; any
/// other input yields [`ConversionNotification::Unset`] so that the caller can
/// fall back. Errors returned by the function become error notifications
/// that keep the original error.
///
/// # Example
///
/// ```rust
/// use understory_coerce::{Culture, FuncValueConverter, TargetType, Value, ValueConverter};
///
/// let double = FuncValueConverter::infallible(|x: i32| x * 2);
/// let target = TargetType::any();
///
/// let doubled = double.convert(&Value::I32(21), &target, None, &Culture::INVARIANT);
/// assert_eq!(doubled.value(), Some(&Value::I32(42)));
///
/// let skipped = double.convert(&Value::from("21"), &target, None, &Culture::INVARIANT);
/// assert!(skipped.is_unset());
/// ```
pub struct FuncValueConverter<TIn, TOut> {
    transform: Box<Transform<TIn, TOut>>,
}

impl<TIn, TOut> FuncValueConverter<TIn, TOut>
where
    TIn: FromValue + 'static,
    TOut: IntoValue + 'static,
{
    /// Creates a converter from a fallible function.
    pub fn new<E, F>(transform: F) -> Self
    where
        E: StdError + Send + Sync + 'static,
        F: Fn(TIn) -> Result<TOut, E> + 'static,
    {
        Self {
            transform: Box::new(move |input| transform(input).map_err(ConversionError::transform)),
        }
    }

    /// Creates a converter from a function that cannot fail.
    pub fn infallible<F>(transform: F) -> Self
    where
        F: Fn(TIn) -> TOut + 'static,
    {
        Self {
            transform: Box::new(move |input| Ok(transform(input))),
        }
    }
}

impl<TIn, TOut> ValueConverter for FuncValueConverter<TIn, TOut>
where
    TIn: FromValue,
    TOut: IntoValue,
{
    fn convert(
        &self,
        value: &Value,
        _target: &TargetType,
        _parameter: Option<&Value>,
        _culture: &Culture,
    ) -> ConversionNotification {
        let Some(input) = TIn::from_value(value) else {
            return ConversionNotification::Unset;
        };
        (self.transform)(input).map(IntoValue::into_value).into()
    }

    fn convert_back(
        &self,
        _value: &Value,
        _target: &TargetType,
        _parameter: Option<&Value>,
        _culture: &Culture,
    ) -> Result<ConversionNotification, UnsupportedOperation> {
        Err(UnsupportedOperation {
            converter: "FuncValueConverter",
            operation: "convert_back",
        })
    }
}

impl<TIn, TOut> fmt::Debug for FuncValueConverter<TIn, TOut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncValueConverter")
            .field("input", &type_name::<TIn>())
            .field("output", &type_name::<TOut>())
            .finish_non_exhaustive()
    }
}
