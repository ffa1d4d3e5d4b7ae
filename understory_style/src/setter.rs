// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property setters.
//!
//! A [`Setter`] assigns one configured value to one property. The configured
//! value is a literal, a [`Template`] materialized on every application, or a
//! [`Binding`] the property tracks for as long as the style stays attached.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use thiserror::Error;
use tracing::{debug, warn};
use understory_coerce::{
    ConversionError, Culture, DefaultValueConverter, ObjectRef, Value, ValueConverter,
};
use understory_property::{
    Binding, ElementRef, NameScope, StyleSource, StyledElement, StyledElementExt, StyledProperty,
    WeakElementRef,
};

use crate::template::Template;

/// Errors raised while configuring or applying a [`Setter`].
#[derive(Clone, Debug, Error)]
pub enum SetterError {
    /// The setter was applied before a property was assigned.
    #[error("setter has no target property")]
    MissingProperty,
    /// The target property can only be assigned once.
    #[error("setter already targets '{property}'")]
    PropertyAlreadySet {
        /// Name of the property already assigned.
        property: &'static str,
    },
    /// An element was supplied as a literal value.
    #[error("an element cannot be used as a literal setter value; use a template")]
    ElementValue,
    /// The literal cannot be converted to the property type.
    #[error("invalid value for property '{property}'")]
    IncompatibleValue {
        /// Name of the target property.
        property: &'static str,
        /// Why the conversion failed.
        #[source]
        error: ConversionError,
    },
    /// The property cannot hold a template instance.
    #[error("property '{property}' of type '{target}' cannot hold a template instance")]
    TemplateTarget {
        /// Name of the target property.
        property: &'static str,
        /// The property type.
        target: String,
    },
}

/// The configured value of a [`Setter`].
#[derive(Clone)]
pub enum SetterValue {
    /// Assigned as-is, once.
    Literal(Value),
    /// Materialized on every application; the instance is assigned once.
    Template(Rc<dyn Template>),
    /// Initiated on every application; the property tracks it.
    Binding(Rc<dyn Binding>),
}

impl SetterValue {
    /// A literal value.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// A template.
    pub fn template(template: impl Template + 'static) -> Self {
        Self::Template(Rc::new(template))
    }

    /// A binding.
    pub fn binding(binding: impl Binding + 'static) -> Self {
        Self::Binding(Rc::new(binding))
    }
}

impl Default for SetterValue {
    fn default() -> Self {
        Self::Literal(Value::Null)
    }
}

impl From<Value> for SetterValue {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl fmt::Debug for SetterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Template(_) => f.write_str("Template(..)"),
            Self::Binding(_) => f.write_str("Binding(..)"),
        }
    }
}

/// Assigns a configured value to a property on the elements a style applies
/// to.
///
/// Configuration is validated as soon as both halves are known; [`apply`]
/// never changes the setter, so one setter can be applied to any number of
/// elements.
///
/// [`apply`]: Setter::apply
///
/// # Example
///
/// ```rust
/// use understory_coerce::{TargetType, Value};
/// use understory_property::{
///     PropertyMetadataBuilder, PropertyRegistry, PropertyStore, StyleOrigin, StyleSource,
///     StyledElement, StyledElementExt,
/// };
/// use understory_style::{Setter, SetterValue};
///
/// #[derive(Default)]
/// struct Label {
///     store: PropertyStore,
/// }
///
/// impl StyledElement for Label {
///     fn property_store(&self) -> &PropertyStore { &self.store }
///     fn property_store_mut(&mut self) -> &mut PropertyStore { &mut self.store }
/// }
///
/// let mut registry = PropertyRegistry::new();
/// let text = registry.register(
///     "Text",
///     PropertyMetadataBuilder::new(TargetType::string(), Value::Null).build(),
/// );
///
/// let setter = Setter::new(text.clone(), SetterValue::literal("foo")).unwrap();
/// let mut label = Label::default();
/// setter
///     .apply(StyleSource::new(StyleOrigin::Sheet), &mut label, None)
///     .unwrap();
/// assert_eq!(label.get_value(&text), &Value::from("foo"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Setter {
    property: Option<StyledProperty>,
    value: SetterValue,
}

impl Setter {
    /// Creates a setter for `property`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not valid for `property`.
    pub fn new(property: StyledProperty, value: SetterValue) -> Result<Self, SetterError> {
        let mut setter = Self::default();
        setter.set_value(value)?;
        setter.set_property(property)?;
        Ok(setter)
    }

    /// Returns the target property, if assigned.
    #[must_use]
    pub fn property(&self) -> Option<&StyledProperty> {
        self.property.as_ref()
    }

    /// Returns the configured value.
    #[must_use]
    pub fn value(&self) -> &SetterValue {
        &self.value
    }

    /// Assigns the target property.
    ///
    /// # Errors
    ///
    /// Returns [`SetterError::PropertyAlreadySet`] if a property was assigned
    /// before, or a validation error if the configured value does not suit
    /// `property`.
    pub fn set_property(&mut self, property: StyledProperty) -> Result<(), SetterError> {
        if let Some(existing) = &self.property {
            return Err(SetterError::PropertyAlreadySet {
                property: existing.name(),
            });
        }
        validate(&property, &self.value)?;
        self.property = Some(property);
        Ok(())
    }

    /// Replaces the configured value.
    ///
    /// A `Null` literal is not checked here; it is converted when applied.
    ///
    /// # Errors
    ///
    /// Returns [`SetterError::ElementValue`] if `value` is a literal element
    /// or a sequence holding one, or a validation error if it does not suit the assigned property. The
    /// previous value is kept on error.
    pub fn set_value(&mut self, value: SetterValue) -> Result<(), SetterError> {
        if let SetterValue::Literal(literal) = &value
            && contains_element(literal)
        {
            return Err(SetterError::ElementValue);
        }
        if let Some(property) = &self.property {
            validate(property, &value)?;
        }
        self.value = value;
        Ok(())
    }

    /// Applies the configured value to `target`, attributed to `source`.
    ///
    /// A template instance that has a name is registered in its own fresh
    /// scope and in `name_scope`, when given. Conversion failures are
    /// reported by the property store and do not fail the application.
    ///
    /// # Errors
    ///
    /// Returns [`SetterError::MissingProperty`] if no property was assigned.
    pub fn apply(
        &self,
        source: StyleSource,
        target: &mut dyn StyledElement,
        name_scope: Option<&mut NameScope>,
    ) -> Result<(), SetterError> {
        let property = self.property.as_ref().ok_or(SetterError::MissingProperty)?;
        match &self.value {
            SetterValue::Binding(binding) => {
                debug!(property = property.name(), "applying binding setter");
                match binding.initiate(&*target, property, None) {
                    Some(instanced) => {
                        target.bind(property, source, instanced);
                    }
                    None => warn!(
                        property = property.name(),
                        element = target.type_name(),
                        "binding could not be initiated"
                    ),
                }
            }
            SetterValue::Template(template) => {
                debug!(property = property.name(), "applying template setter");
                let instance = materialize(template.as_ref(), name_scope);
                target.set_style_value(property, source, instance);
            }
            SetterValue::Literal(value) => {
                debug!(property = property.name(), "applying literal setter");
                target.set_style_value(property, source, value.clone());
            }
        }
        Ok(())
    }
}

/// Returns `true` if `value` is, or holds, an element handle.
fn contains_element(value: &Value) -> bool {
    match value {
        Value::Object(object) => {
            object.is_element() || object.is::<ElementRef>() || object.is::<WeakElementRef>()
        }
        Value::Sequence(items) => items.iter().any(contains_element),
        _ => false,
    }
}

fn validate(property: &StyledProperty, value: &SetterValue) -> Result<(), SetterError> {
    match value {
        SetterValue::Literal(Value::Null) | SetterValue::Binding(_) => Ok(()),
        SetterValue::Literal(literal) => DefaultValueConverter
            .convert(literal, property.property_type(), None, &Culture::INVARIANT)
            .into_result()
            .map(|_| ())
            .map_err(|error| SetterError::IncompatibleValue {
                property: property.name(),
                error,
            }),
        SetterValue::Template(_) => {
            if ElementRef::is_assignable_to(property.property_type()) {
                Ok(())
            } else {
                Err(SetterError::TemplateTarget {
                    property: property.name(),
                    target: format!("{}", property.property_type()),
                })
            }
        }
    }
}

/// Builds one instance and gives it a fresh name scope.
fn materialize(template: &dyn Template, outer: Option<&mut NameScope>) -> ElementRef {
    let instance = template.build();
    let mut scope = NameScope::new();
    let name = instance.borrow().name().map(String::from);
    if let Some(name) = &name {
        register(&mut scope, name, &instance);
        if let Some(outer) = outer {
            register(outer, name, &instance);
        }
    }
    instance.borrow_mut().set_name_scope(scope);
    instance
}

fn register(scope: &mut NameScope, name: &str, instance: &ElementRef) {
    if let Err(error) = scope.register(name, ObjectRef::new(instance.downgrade())) {
        warn!(%error, "template instance not registered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::FuncTemplate;
    use alloc::string::ToString;
    use alloc::vec;
    use understory_coerce::{FromValue, ObjectType, PrimitiveType, TargetType};
    use understory_property::{
        ObservableBinding, PropertyMetadataBuilder, PropertyRegistry, PropertyStore, StyleOrigin,
        ValueSubject,
    };

    #[derive(Default)]
    struct Control {
        name: Option<String>,
        store: PropertyStore,
    }

    impl Control {
        fn named(name: &str) -> Self {
            Self {
                name: Some(name.to_string()),
                ..Self::default()
            }
        }
    }

    impl StyledElement for Control {
        fn name(&self) -> Option<&str> {
            self.name.as_deref()
        }

        fn property_store(&self) -> &PropertyStore {
            &self.store
        }

        fn property_store_mut(&mut self) -> &mut PropertyStore {
            &mut self.store
        }
    }

    struct Fixture {
        text: StyledProperty,
        count: StyledProperty,
        content: StyledProperty,
    }

    fn fixture() -> Fixture {
        let mut registry = PropertyRegistry::new();
        let text = registry.register(
            "Text",
            PropertyMetadataBuilder::new(TargetType::string(), Value::Null).build(),
        );
        let count = registry.register(
            "Count",
            PropertyMetadataBuilder::new(TargetType::primitive(PrimitiveType::I32), 0_i32).build(),
        );
        let content = registry.register(
            "Content",
            PropertyMetadataBuilder::new(TargetType::object(ObjectType::ANY), Value::Null).build(),
        );
        Fixture {
            text,
            count,
            content,
        }
    }

    fn sheet() -> StyleSource {
        StyleSource::new(StyleOrigin::Sheet)
    }

    #[test]
    fn literal_path_assigns_value() {
        let f = fixture();
        let setter = Setter::new(f.text.clone(), SetterValue::literal("foo")).unwrap();
        let mut control = Control::default();

        setter.apply(sheet(), &mut control, None).unwrap();

        assert_eq!(control.get_value(&f.text), &Value::from("foo"));
        assert!(!control.has_binding(&f.text));
    }

    #[test]
    fn literal_is_converted_to_property_type() {
        let f = fixture();
        let setter = Setter::new(f.count.clone(), SetterValue::literal("42")).unwrap();
        let mut control = Control::default();

        setter.apply(sheet(), &mut control, None).unwrap();

        assert_eq!(control.get_value(&f.count), &Value::I32(42));
    }

    #[test]
    fn incompatible_literal_is_rejected() {
        let f = fixture();
        let error = Setter::new(f.count.clone(), SetterValue::literal("foo")).unwrap_err();

        match error {
            SetterError::IncompatibleValue { property, error } => {
                assert_eq!(property, "Count");
                assert_eq!(error.to_string(), "Could not convert 'foo' to 'i32'");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn element_literal_is_rejected_before_apply() {
        let f = fixture();
        let element = Value::from(ElementRef::new(Control::default()));

        assert!(matches!(
            Setter::new(f.content.clone(), SetterValue::Literal(element.clone())),
            Err(SetterError::ElementValue)
        ));

        let mut setter = Setter::default();
        assert!(matches!(
            setter.set_value(SetterValue::Literal(element)),
            Err(SetterError::ElementValue)
        ));
        assert!(matches!(setter.value(), SetterValue::Literal(Value::Null)));
    }

    #[test]
    fn nested_element_literal_is_rejected() {
        let f = fixture();
        let element = ElementRef::new(Control::default());
        let nested = Value::from(vec![Value::I32(1), Value::from(element.clone())]);

        assert!(matches!(
            Setter::new(f.content.clone(), SetterValue::Literal(nested)),
            Err(SetterError::ElementValue)
        ));
        let deeper = Value::from(vec![Value::from(vec![Value::from(element)])]);
        assert!(matches!(
            Setter::new(f.content.clone(), SetterValue::Literal(deeper)),
            Err(SetterError::ElementValue)
        ));
    }

    #[test]
    fn wrapped_element_literal_is_rejected() {
        let f = fixture();
        let element = ElementRef::new(Control::default());

        for literal in [
            Value::from(ObjectRef::element(Control::default())),
            Value::from(ObjectRef::new(element.clone())),
            Value::from(ObjectRef::new(element.downgrade())),
        ] {
            assert!(matches!(
                Setter::new(f.content.clone(), SetterValue::Literal(literal)),
                Err(SetterError::ElementValue)
            ));
        }

        let brush = Value::from(ObjectRef::new(7_u32));
        assert!(Setter::new(f.content.clone(), SetterValue::Literal(brush)).is_ok());
    }

    #[test]
    fn property_can_only_be_set_once() {
        let f = fixture();
        let mut setter = Setter::default();
        setter.set_property(f.text.clone()).unwrap();

        assert!(matches!(
            setter.set_property(f.count.clone()),
            Err(SetterError::PropertyAlreadySet { property: "Text" })
        ));
        assert_eq!(setter.property(), Some(&f.text));
    }

    #[test]
    fn value_is_validated_when_property_arrives() {
        let f = fixture();
        let mut setter = Setter::default();
        setter.set_value(SetterValue::literal("foo")).unwrap();

        assert!(matches!(
            setter.set_property(f.count.clone()),
            Err(SetterError::IncompatibleValue { .. })
        ));
        assert!(setter.property().is_none());
    }

    #[test]
    fn apply_without_property_fails() {
        let setter = Setter::default();
        let mut control = Control::default();

        assert!(matches!(
            setter.apply(sheet(), &mut control, None),
            Err(SetterError::MissingProperty)
        ));
    }

    #[test]
    fn template_requires_element_target() {
        let f = fixture();
        let template = SetterValue::template(FuncTemplate::new(Control::default));

        assert!(matches!(
            Setter::new(f.count.clone(), template),
            Err(SetterError::TemplateTarget { property: "Count", .. })
        ));
    }

    #[test]
    fn template_path_assigns_distinct_instances() {
        let f = fixture();
        let setter = Setter::new(
            f.content.clone(),
            SetterValue::template(FuncTemplate::new(Control::default)),
        )
        .unwrap();
        let mut first = Control::default();
        let mut second = Control::default();

        setter.apply(sheet(), &mut first, None).unwrap();
        setter.apply(sheet(), &mut second, None).unwrap();

        let a = ElementRef::from_value(first.get_value(&f.content)).unwrap();
        let b = ElementRef::from_value(second.get_value(&f.content)).unwrap();
        assert!(a.is::<Control>());
        assert!(!a.ptr_eq(&b));
        assert!(a.borrow().name_scope().is_some());
        assert!(!first.has_binding(&f.content));
    }

    #[test]
    fn template_instance_is_registered_in_its_own_scope() {
        let f = fixture();
        let setter = Setter::new(
            f.content.clone(),
            SetterValue::template(FuncTemplate::new(|| Control::named("PART_Presenter"))),
        )
        .unwrap();
        let mut control = Control::default();
        let mut outer = NameScope::new();

        setter.apply(sheet(), &mut control, Some(&mut outer)).unwrap();

        let instance = ElementRef::from_value(control.get_value(&f.content)).unwrap();
        let own = instance
            .borrow()
            .name_scope()
            .and_then(|scope| scope.find_element("PART_Presenter"));
        assert!(own.is_some_and(|found| found.ptr_eq(&instance)));
        assert!(
            outer
                .find_element("PART_Presenter")
                .is_some_and(|found| found.ptr_eq(&instance))
        );
    }

    #[test]
    fn duplicate_outer_name_is_not_a_fault() {
        let f = fixture();
        let setter = Setter::new(
            f.content.clone(),
            SetterValue::template(FuncTemplate::new(|| Control::named("PART_Presenter"))),
        )
        .unwrap();
        let mut outer = NameScope::new();
        let mut first = Control::default();
        let mut second = Control::default();

        setter.apply(sheet(), &mut first, Some(&mut outer)).unwrap();
        setter.apply(sheet(), &mut second, Some(&mut outer)).unwrap();

        let registered = outer.find_element("PART_Presenter").unwrap();
        let first_instance = ElementRef::from_value(first.get_value(&f.content)).unwrap();
        assert!(registered.ptr_eq(&first_instance));
        assert!(ElementRef::from_value(second.get_value(&f.content)).is_some());
    }

    #[test]
    fn binding_path_tracks_source() {
        let f = fixture();
        let subject = ValueSubject::with_value("foo");
        let setter = Setter::new(
            f.text.clone(),
            SetterValue::binding(ObservableBinding::new(subject.clone())),
        )
        .unwrap();
        let mut control = Control::default();

        setter.apply(sheet(), &mut control, None).unwrap();
        assert_eq!(control.get_value(&f.text), &Value::from("foo"));
        assert!(control.has_binding(&f.text));

        subject.next("bar");
        assert_eq!(control.sync_bindings(), 1);
        assert_eq!(control.get_value(&f.text), &Value::from("bar"));
    }

    #[test]
    fn binding_conversion_error_does_not_fail_apply() {
        let f = fixture();
        let setter = Setter::new(
            f.count.clone(),
            SetterValue::binding(ObservableBinding::new(ValueSubject::with_value("foo"))),
        )
        .unwrap();
        let mut control = Control::default();

        setter.apply(sheet(), &mut control, None).unwrap();

        assert_eq!(control.get_value(&f.count), &Value::I32(0));
    }

    #[test]
    fn binding_that_cannot_initiate_is_skipped() {
        let f = fixture();
        let subject = ValueSubject::new();
        subject.complete();
        let setter = Setter::new(
            f.text.clone(),
            SetterValue::binding(ObservableBinding::new(subject)),
        )
        .unwrap();
        let mut control = Control::default();

        setter.apply(sheet(), &mut control, None).unwrap();

        assert!(!control.has_binding(&f.text));
        assert_eq!(control.get_value(&f.text), &Value::Null);
    }

    #[test]
    fn apply_leaves_setter_unchanged() {
        let f = fixture();
        let setter = Setter::new(f.count.clone(), SetterValue::literal(7_i32)).unwrap();
        let mut first = Control::default();
        let mut second = Control::default();

        setter.apply(sheet(), &mut first, None).unwrap();
        setter.apply(sheet(), &mut second, None).unwrap();

        assert_eq!(first.get_value(&f.count), &Value::I32(7));
        assert_eq!(second.get_value(&f.count), &Value::I32(7));
        assert!(matches!(setter.value(), SetterValue::Literal(Value::I32(7))));
    }
}
