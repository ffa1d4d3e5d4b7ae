// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Style: setters and styles for styled properties.
//!
//! This crate extends `understory_property` with declarative styling. A
//! [`Setter`] assigns one configured value to one property; a [`Style`] is a
//! shared, ordered list of setters applied under a single
//! [`StyleSource`](understory_property::StyleSource).
//!
//! ## Core Concepts
//!
//! ### Setter paths
//!
//! The shape of a setter's [`SetterValue`] decides how it is applied:
//!
//! - **Literal** - converted to the property type and assigned once
//! - **Template** - one instance is built per application, given its own
//!   [`NameScope`](understory_property::NameScope), and assigned once
//! - **Binding** - initiated against the target and tracked until the flow
//!   completes or the style is detached
//!
//! Misconfiguration is reported by [`SetterError`] as soon as it can be
//! detected, before the setter is ever applied. Conversion failures at apply
//! time are not errors: the property keeps its previous value and the failure
//! is logged.
//!
//! ### Styles
//!
//! ```rust
//! use understory_coerce::{PrimitiveType, TargetType, Value};
//! use understory_property::{
//!     ObservableBinding, PropertyMetadataBuilder, PropertyRegistry, PropertyStore, StyleOrigin,
//!     StyledElement, StyledElementExt, ValueSubject,
//! };
//! use understory_style::{Setter, SetterValue, StyleBuilder};
//!
//! #[derive(Default)]
//! struct Slider {
//!     store: PropertyStore,
//! }
//!
//! impl StyledElement for Slider {
//!     fn property_store(&self) -> &PropertyStore { &self.store }
//!     fn property_store_mut(&mut self) -> &mut PropertyStore { &mut self.store }
//! }
//!
//! let mut registry = PropertyRegistry::new();
//! let minimum = registry.register(
//!     "Minimum",
//!     PropertyMetadataBuilder::new(TargetType::primitive(PrimitiveType::F64), 0.0_f64).build(),
//! );
//! let value = registry.register(
//!     "Value",
//!     PropertyMetadataBuilder::new(TargetType::primitive(PrimitiveType::F64), 0.0_f64).build(),
//! );
//!
//! let position = ValueSubject::with_value(5_i32);
//! let style = StyleBuilder::new()
//!     .origin(StyleOrigin::Sheet)
//!     .setter(Setter::new(minimum.clone(), SetterValue::literal(1_i32)).unwrap())
//!     .setter(
//!         Setter::new(
//!             value.clone(),
//!             SetterValue::binding(ObservableBinding::new(position.clone())),
//!         )
//!         .unwrap(),
//!     )
//!     .build();
//!
//! let mut slider = Slider::default();
//! style.apply(&mut slider, None).unwrap();
//! assert_eq!(slider.get_value(&minimum), &Value::F64(1.0));
//! assert_eq!(slider.get_value(&value), &Value::F64(5.0));
//!
//! position.next("7.5");
//! slider.sync_bindings();
//! assert_eq!(slider.get_value(&value), &Value::F64(7.5));
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod setter;
mod style;
mod template;

pub use setter::{Setter, SetterError, SetterValue};
pub use style::{Style, StyleBuilder};
pub use template::{FuncTemplate, Template};
