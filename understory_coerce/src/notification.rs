// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The conversion result envelope and the errors it carries.

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use core::error::Error as StdError;

use thiserror::Error;

use crate::types::TargetType;
use crate::value::Value;

/// How serious a conversion failure is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// The value could not be produced.
    #[default]
    Error,
    /// The value was produced but failed validation.
    DataValidationError,
}

/// Why a conversion failed.
#[derive(Clone, Debug, Error)]
pub enum ConversionError {
    /// No conversion rule turns the value into the target type.
    #[error("Could not convert '{value}' to '{target}'")]
    InvalidCast {
        /// Source representation of the value.
        value: String,
        /// Name of the target type.
        target: String,
    },
    /// A conversion function failed; the original error is kept as the source.
    #[error(transparent)]
    Transform(Arc<dyn StdError + Send + Sync>),
    /// A failure reported by a value source.
    #[error("{0}")]
    Message(String),
}

impl ConversionError {
    /// Describes a value that could not be converted to `target`.
    #[must_use]
    pub fn invalid_cast(value: &Value, target: &TargetType) -> Self {
        Self::InvalidCast {
            value: format!("{value}"),
            target: format!("{target}"),
        }
    }

    /// Wraps an error raised by a conversion function.
    #[must_use]
    pub fn transform<E: StdError + Send + Sync + 'static>(error: E) -> Self {
        Self::Transform(Arc::new(error))
    }
}

/// The only way conversion stages talk to each other.
///
/// Exactly one state is active. A successful conversion to `Null` is
/// `Value(Value::Null)`, never `Unset` or `Error`.
///
/// # Example
///
/// ```rust
/// use understory_coerce::{ConversionNotification, Value};
///
/// let ok = ConversionNotification::from(Value::I32(3));
/// assert_eq!(ok.value(), Some(&Value::I32(3)));
///
/// assert!(ConversionNotification::null().is_null());
/// assert!(ConversionNotification::Unset.is_unset());
/// ```
#[derive(Clone, Debug)]
pub enum ConversionNotification {
    /// The conversion produced a value.
    Value(Value),
    /// The conversion was attempted and failed.
    Error {
        /// The cause.
        error: ConversionError,
        /// How serious the failure is.
        severity: ErrorSeverity,
    },
    /// The converter does not apply to this input.
    Unset,
}

impl ConversionNotification {
    /// A successful conversion to `Null`.
    #[must_use]
    pub const fn null() -> Self {
        Self::Value(Value::Null)
    }

    /// A failed conversion.
    #[must_use]
    pub fn from_error(error: ConversionError, severity: ErrorSeverity) -> Self {
        Self::Error { error, severity }
    }

    /// Returns `true` if a value was produced.
    #[must_use]
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Returns `true` if the produced value is `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    /// Returns `true` if the conversion failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Returns `true` if the converter did not apply.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns the produced value.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the failure cause.
    #[must_use]
    pub fn error(&self) -> Option<&ConversionError> {
        match self {
            Self::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Returns the failure severity.
    #[must_use]
    pub fn severity(&self) -> Option<ErrorSeverity> {
        match self {
            Self::Error { severity, .. } => Some(*severity),
            _ => None,
        }
    }

    /// Consumes the notification, returning the produced value.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Converts into a `Result`; `Unset` becomes `Ok(None)`.
    pub fn into_result(self) -> Result<Option<Value>, ConversionError> {
        match self {
            Self::Value(value) => Ok(Some(value)),
            Self::Error { error, .. } => Err(error),
            Self::Unset => Ok(None),
        }
    }
}

impl From<Value> for ConversionNotification {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Result<Value, ConversionError>> for ConversionNotification {
    fn from(result: Result<Value, ConversionError>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(error) => Self::from_error(error, ErrorSeverity::Error),
        }
    }
}

/// A converter was asked for an operation it does not implement.
///
/// This signals a defect in the binding definition, not a data condition.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{operation} is not supported by {converter}")]
pub struct UnsupportedOperation {
    /// Name of the converter.
    pub converter: &'static str,
    /// Name of the operation.
    pub operation: &'static str,
}
