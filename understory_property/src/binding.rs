// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bindings: live value flows attached to properties.
//!
//! A [`Binding`] is a declarative description. Initiating it against an
//! element and property yields an [`InstancedBinding`], which the property
//! store tracks. Values are pulled: the store compares the flow's
//! [`version`](ValueFlow::version) with the last one it applied whenever
//! [`PropertyStore::sync_bindings`](crate::PropertyStore::sync_bindings) runs.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use understory_coerce::{
    ConversionError, ConversionNotification, Culture, DefaultValueConverter, TargetType, Value,
    ValueConverter, coerce,
};

use crate::id::StyledProperty;
use crate::object::StyledElement;

/// A source of values that changes over time.
pub trait ValueFlow {
    /// Returns a counter that increases every time a new value or error is
    /// published.
    fn version(&self) -> u64;

    /// Returns the most recently published value or error, if any.
    fn latest(&self) -> Option<Result<Value, ConversionError>>;

    /// Returns `true` once the flow will publish nothing further.
    fn is_completed(&self) -> bool;
}

/// A value flow that remembers its latest value.
///
/// Clones share state, so one clone can be handed to a binding while another
/// publishes.
///
/// # Example
///
/// ```rust
/// use understory_coerce::Value;
/// use understory_property::{ValueFlow, ValueSubject};
///
/// let subject = ValueSubject::with_value(1_i32);
/// let observer = subject.clone();
///
/// subject.next(2_i32);
/// assert_eq!(observer.latest().and_then(Result::ok), Some(Value::I32(2)));
/// assert_eq!(observer.version(), 2);
///
/// subject.complete();
/// subject.next(3_i32);
/// assert_eq!(observer.version(), 2);
/// ```
#[derive(Clone, Default)]
pub struct ValueSubject {
    state: Rc<RefCell<SubjectState>>,
}

#[derive(Default)]
struct SubjectState {
    version: u64,
    latest: Option<Result<Value, ConversionError>>,
    completed: bool,
}

impl ValueSubject {
    /// Creates a subject with no value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a subject holding an initial value.
    #[must_use]
    pub fn with_value(value: impl Into<Value>) -> Self {
        let subject = Self::new();
        subject.next(value);
        subject
    }

    /// Publishes a value. Ignored after [`complete`](Self::complete).
    pub fn next(&self, value: impl Into<Value>) {
        self.publish(Ok(value.into()));
    }

    /// Publishes an error. Ignored after [`complete`](Self::complete).
    pub fn error(&self, error: ConversionError) {
        self.publish(Err(error));
    }

    /// Marks the flow as finished.
    pub fn complete(&self) {
        self.state.borrow_mut().completed = true;
    }

    fn publish(&self, item: Result<Value, ConversionError>) {
        let mut state = self.state.borrow_mut();
        if state.completed {
            return;
        }
        state.version += 1;
        state.latest = Some(item);
    }
}

impl ValueFlow for ValueSubject {
    fn version(&self) -> u64 {
        self.state.borrow().version
    }

    fn latest(&self) -> Option<Result<Value, ConversionError>> {
        self.state.borrow().latest.clone()
    }

    fn is_completed(&self) -> bool {
        self.state.borrow().completed
    }
}

impl fmt::Debug for ValueSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ValueSubject")
            .field("version", &state.version)
            .field("latest", &state.latest)
            .field("completed", &state.completed)
            .finish()
    }
}

/// How long a binding keeps tracking its flow.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BindingMode {
    /// Every published value is applied until the flow completes.
    #[default]
    OneWay,
    /// Only the first successfully applied value is used.
    OneTime,
}

/// A binding that has been initiated against a target property.
#[derive(Clone)]
pub struct InstancedBinding {
    flow: Rc<dyn ValueFlow>,
    mode: BindingMode,
    converter: Option<Rc<dyn ValueConverter>>,
    parameter: Option<Value>,
    culture: Culture,
}

impl InstancedBinding {
    /// Creates a one-way binding over `flow` with no converter.
    #[must_use]
    pub fn new(flow: Rc<dyn ValueFlow>) -> Self {
        Self {
            flow,
            mode: BindingMode::default(),
            converter: None,
            parameter: None,
            culture: Culture::INVARIANT,
        }
    }

    /// Sets the binding mode.
    #[must_use]
    pub fn with_mode(mut self, mode: BindingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the converter applied to each value.
    #[must_use]
    pub fn with_converter(mut self, converter: Option<Rc<dyn ValueConverter>>) -> Self {
        self.converter = converter;
        self
    }

    /// Sets the converter parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Option<Value>) -> Self {
        self.parameter = parameter;
        self
    }

    /// Sets the culture used for conversion.
    #[must_use]
    pub fn with_culture(mut self, culture: Culture) -> Self {
        self.culture = culture;
        self
    }

    /// Returns the value flow.
    #[must_use]
    pub fn flow(&self) -> &dyn ValueFlow {
        &*self.flow
    }

    /// Returns the binding mode.
    #[must_use]
    pub fn mode(&self) -> BindingMode {
        self.mode
    }

    /// Returns `true` if a custom converter is attached.
    #[must_use]
    pub fn has_converter(&self) -> bool {
        self.converter.is_some()
    }

    /// Returns the converter parameter.
    #[must_use]
    pub fn parameter(&self) -> Option<&Value> {
        self.parameter.as_ref()
    }

    /// Returns the conversion culture.
    #[must_use]
    pub fn culture(&self) -> &Culture {
        &self.culture
    }

    /// Converts a published value for a property of type `target`.
    ///
    /// The custom converter runs first, if any. Its output is then passed
    /// through [`DefaultValueConverter`] unless it already fits `target`, so
    /// an applied value always has the property's type.
    #[must_use]
    pub fn convert(&self, value: &Value, target: &TargetType) -> ConversionNotification {
        let parameter = self.parameter.as_ref();
        let Some(converter) = &self.converter else {
            return DefaultValueConverter.convert(value, target, parameter, &self.culture);
        };
        match converter.convert(value, target, parameter, &self.culture) {
            ConversionNotification::Value(converted)
                if !coerce::is_assignable(target, &converted) =>
            {
                DefaultValueConverter.convert(&converted, target, parameter, &self.culture)
            }
            other => other,
        }
    }
}

impl fmt::Debug for InstancedBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstancedBinding")
            .field("mode", &self.mode)
            .field("version", &self.flow.version())
            .field("has_converter", &self.converter.is_some())
            .field("parameter", &self.parameter)
            .field("culture", &self.culture.name())
            .finish_non_exhaustive()
    }
}

/// A declarative binding that can be attached to many elements.
pub trait Binding {
    /// Prepares the binding for `property` on `target`.
    ///
    /// `converter` overrides the binding's own converter when given. Returns
    /// `None` if the binding cannot produce values for this target.
    fn initiate(
        &self,
        target: &dyn StyledElement,
        property: &StyledProperty,
        converter: Option<Rc<dyn ValueConverter>>,
    ) -> Option<InstancedBinding>;
}

/// A [`Binding`] over a [`ValueSubject`].
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use understory_coerce::FuncValueConverter;
/// use understory_property::{BindingMode, ObservableBinding, ValueSubject};
///
/// let source = ValueSubject::with_value(3_i32);
/// let binding = ObservableBinding::new(source)
///     .with_mode(BindingMode::OneTime)
///     .with_converter(Rc::new(FuncValueConverter::infallible(|x: i32| f64::from(x) * 1.5)));
/// # let _ = binding;
/// ```
#[derive(Clone)]
pub struct ObservableBinding {
    source: ValueSubject,
    mode: BindingMode,
    converter: Option<Rc<dyn ValueConverter>>,
    parameter: Option<Value>,
    culture: Culture,
}

impl ObservableBinding {
    /// Creates a one-way binding over `source`.
    #[must_use]
    pub fn new(source: ValueSubject) -> Self {
        Self {
            source,
            mode: BindingMode::default(),
            converter: None,
            parameter: None,
            culture: Culture::INVARIANT,
        }
    }

    /// Sets the binding mode.
    #[must_use]
    pub fn with_mode(mut self, mode: BindingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the converter.
    #[must_use]
    pub fn with_converter(mut self, converter: Rc<dyn ValueConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Sets the converter parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: impl Into<Value>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    /// Sets the culture used for conversion.
    #[must_use]
    pub fn with_culture(mut self, culture: Culture) -> Self {
        self.culture = culture;
        self
    }

    /// Returns the source subject.
    #[must_use]
    pub fn source(&self) -> &ValueSubject {
        &self.source
    }
}

impl Binding for ObservableBinding {
    /// Returns `None` if the source completed without publishing anything.
    fn initiate(
        &self,
        _target: &dyn StyledElement,
        _property: &StyledProperty,
        converter: Option<Rc<dyn ValueConverter>>,
    ) -> Option<InstancedBinding> {
        if self.source.is_completed() && self.source.latest().is_none() {
            return None;
        }
        Some(
            InstancedBinding::new(Rc::new(self.source.clone()))
                .with_mode(self.mode)
                .with_converter(converter.or_else(|| self.converter.clone()))
                .with_parameter(self.parameter.clone())
                .with_culture(self.culture),
        )
    }
}

impl fmt::Debug for ObservableBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableBinding")
            .field("source", &self.source)
            .field("mode", &self.mode)
            .field("has_converter", &self.converter.is_some())
            .field("parameter", &self.parameter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use understory_coerce::{FuncValueConverter, PrimitiveType};

    fn f64_type() -> TargetType {
        TargetType::primitive(PrimitiveType::F64)
    }

    #[test]
    fn subject_versions_every_publication() {
        let subject = ValueSubject::new();
        assert_eq!(subject.version(), 0);
        assert!(subject.latest().is_none());

        subject.next(1_i32);
        subject.error(ConversionError::Message("offline".into()));
        assert_eq!(subject.version(), 2);
        assert!(subject.latest().is_some_and(|latest| latest.is_err()));
    }

    #[test]
    fn completed_subject_ignores_values() {
        let subject = ValueSubject::with_value("a");
        subject.complete();
        subject.next("b");
        assert!(subject.is_completed());
        assert_eq!(subject.latest().and_then(Result::ok), Some(Value::from("a")));
    }

    #[test]
    fn default_conversion() {
        let binding = InstancedBinding::new(Rc::new(ValueSubject::new()));
        let result = binding.convert(&Value::from("2.5"), &f64_type());
        assert_eq!(result.value(), Some(&Value::F64(2.5)));
    }

    #[test]
    fn converter_output_is_coerced_to_target() {
        let converter: Rc<dyn ValueConverter> =
            Rc::new(FuncValueConverter::infallible(|s: String| s.len() as u64));
        let binding =
            InstancedBinding::new(Rc::new(ValueSubject::new())).with_converter(Some(converter));
        let result = binding.convert(&Value::from("abc"), &f64_type());
        assert_eq!(result.value(), Some(&Value::F64(3.0)));
    }

    #[test]
    fn converter_unset_passes_through() {
        let converter: Rc<dyn ValueConverter> =
            Rc::new(FuncValueConverter::infallible(|x: i32| x));
        let binding =
            InstancedBinding::new(Rc::new(ValueSubject::new())).with_converter(Some(converter));
        assert!(binding.convert(&Value::from("abc"), &f64_type()).is_unset());
    }
}
