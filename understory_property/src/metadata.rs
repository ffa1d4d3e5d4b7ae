// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property metadata definitions.
//!
//! This module provides [`PropertyMetadata`] for storing property configuration
//! and [`PropertyMetadataBuilder`] for ergonomic construction.

use alloc::boxed::Box;
use core::fmt;

use understory_coerce::{TargetType, Value, coerce};

/// Callback invoked when a property's effective value changes.
///
/// The callback receives the old and the new effective value.
pub type PropertyChangedCallback = Box<dyn Fn(&Value, &Value)>;

/// Callback for coercing a converted value before it's stored.
///
/// This can be used to clamp values, validate ranges, etc.
/// The callback receives the proposed value and returns the coerced value.
pub type CoerceValueCallback = Box<dyn Fn(Value) -> Value>;

/// Metadata for a styled property.
///
/// This contains the declared value type, the default value, and optional
/// callbacks.
///
/// # Example
///
/// ```rust
/// use understory_coerce::{PrimitiveType, TargetType, Value};
/// use understory_property::PropertyMetadataBuilder;
///
/// let metadata = PropertyMetadataBuilder::new(TargetType::primitive(PrimitiveType::F64), 100.0_f64)
///     .coerce(|v| match v {
///         Value::F64(x) => Value::F64(x.max(0.0)),
///         other => other,
///     })
///     .build();
///
/// assert_eq!(metadata.default_value(), &Value::F64(100.0));
/// assert_eq!(metadata.coerce(Value::F64(-5.0)), Value::F64(0.0));
/// ```
pub struct PropertyMetadata {
    property_type: TargetType,
    default_value: Value,
    changed_callback: Option<PropertyChangedCallback>,
    coerce_callback: Option<CoerceValueCallback>,
}

impl PropertyMetadata {
    /// Creates new property metadata with the given type and default value.
    ///
    /// # Panics
    ///
    /// Panics if `default_value` cannot be stored in a `property_type` slot.
    #[must_use]
    pub fn new(property_type: TargetType, default_value: impl Into<Value>) -> Self {
        PropertyMetadataBuilder::new(property_type, default_value).build()
    }

    /// Returns the declared value type.
    #[must_use]
    #[inline]
    pub fn property_type(&self) -> &TargetType {
        &self.property_type
    }

    /// Returns a reference to the default value.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> &Value {
        &self.default_value
    }

    /// Invokes the changed callback if one is set.
    #[inline]
    pub fn on_changed(&self, old_value: &Value, new_value: &Value) {
        if let Some(callback) = &self.changed_callback {
            callback(old_value, new_value);
        }
    }

    /// Coerces a value using the coerce callback if one is set.
    #[inline]
    pub fn coerce(&self, value: Value) -> Value {
        if let Some(callback) = &self.coerce_callback {
            callback(value)
        } else {
            value
        }
    }

    /// Returns whether a changed callback is set.
    #[must_use]
    #[inline]
    pub fn has_changed_callback(&self) -> bool {
        self.changed_callback.is_some()
    }

    /// Returns whether a coerce callback is set.
    #[must_use]
    #[inline]
    pub fn has_coerce_callback(&self) -> bool {
        self.coerce_callback.is_some()
    }
}

// Manual Debug impl since callbacks aren't Debug
impl fmt::Debug for PropertyMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMetadata")
            .field("property_type", &self.property_type)
            .field("default_value", &self.default_value)
            .field("has_changed_callback", &self.changed_callback.is_some())
            .field("has_coerce_callback", &self.coerce_callback.is_some())
            .finish()
    }
}

/// Builder for [`PropertyMetadata`].
pub struct PropertyMetadataBuilder {
    property_type: TargetType,
    default_value: Value,
    changed_callback: Option<PropertyChangedCallback>,
    coerce_callback: Option<CoerceValueCallback>,
}

impl fmt::Debug for PropertyMetadataBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMetadataBuilder")
            .field("property_type", &self.property_type)
            .field("default_value", &self.default_value)
            .field("has_changed_callback", &self.changed_callback.is_some())
            .field("has_coerce_callback", &self.coerce_callback.is_some())
            .finish()
    }
}

impl PropertyMetadataBuilder {
    /// Creates a new builder with the given type and default value.
    #[must_use]
    pub fn new(property_type: TargetType, default_value: impl Into<Value>) -> Self {
        Self {
            property_type,
            default_value: default_value.into(),
            changed_callback: None,
            coerce_callback: None,
        }
    }

    /// Sets a callback to be invoked when the effective value changes.
    #[must_use]
    pub fn on_changed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Value, &Value) + 'static,
    {
        self.changed_callback = Some(Box::new(callback));
        self
    }

    /// Sets a callback to coerce values after conversion and before they are
    /// stored.
    #[must_use]
    pub fn coerce<F>(mut self, callback: F) -> Self
    where
        F: Fn(Value) -> Value + 'static,
    {
        self.coerce_callback = Some(Box::new(callback));
        self
    }

    /// Builds the [`PropertyMetadata`].
    ///
    /// # Panics
    ///
    /// Panics if the default value cannot be stored in a slot of the declared
    /// type.
    #[must_use]
    pub fn build(self) -> PropertyMetadata {
        assert!(
            coerce::is_assignable(&self.property_type, &self.default_value),
            "Default value '{}' is not assignable to '{}'",
            self.default_value,
            self.property_type
        );
        PropertyMetadata {
            property_type: self.property_type,
            default_value: self.default_value,
            changed_callback: self.changed_callback,
            coerce_callback: self.coerce_callback,
        }
    }
}
