// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Property: styled property storage with value conversion.
//!
//! This crate provides the property side of a styling and data-binding
//! system: property registration, per-element layered storage, live bindings
//! and name scopes. Every value assigned to a property, whether set locally,
//! by a style, or by a binding, is converted to the property's declared type
//! through `understory_coerce` first.
//!
//! ## Core Concepts
//!
//! ### Property Storage
//!
//! [`PropertyStore`] holds Local and Style values per element:
//!
//! - **Local** - explicitly set values (highest precedence)
//! - **Style** - values and bindings attributed to a [`StyleSource`]; an
//!   entry from a higher [`StyleOrigin`] is never replaced by a lower one
//!
//! The effective value resolves Local → Style → property default.
//!
//! ### Conversion
//!
//! A value that converts is coerced by the property's metadata and stored.
//! A value that fails to convert is logged and the previous value is kept.
//! A converter reporting that it does not apply clears the binding's value,
//! so the property falls back.
//!
//! ### Bindings
//!
//! A [`Binding`] is initiated against an element and property, producing an
//! [`InstancedBinding`] over a [`ValueFlow`]. Bindings are pulled:
//! [`PropertyStore::sync_bindings`] applies everything published since the
//! last call.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use understory_coerce::{PrimitiveType, TargetType, Value};
//! use understory_property::{
//!     InstancedBinding, PropertyMetadataBuilder, PropertyRegistry, PropertyStore,
//!     StyleOrigin, StyleSource, ValueSubject,
//! };
//!
//! let mut registry = PropertyRegistry::new();
//! let opacity = registry.register(
//!     "Opacity",
//!     PropertyMetadataBuilder::new(TargetType::primitive(PrimitiveType::F64), 1.0_f64).build(),
//! );
//!
//! let mut store = PropertyStore::new();
//! let source = ValueSubject::with_value("0.5");
//! store.bind(
//!     &opacity,
//!     StyleSource::new(StyleOrigin::Sheet),
//!     InstancedBinding::new(Rc::new(source.clone())),
//! );
//! assert_eq!(store.get_value(&opacity), &Value::F64(0.5));
//!
//! // A value that cannot be converted keeps the previous one.
//! source.next("opaque");
//! store.sync_bindings();
//! assert_eq!(store.get_value(&opacity), &Value::F64(0.5));
//!
//! source.next(0.25_f64);
//! store.sync_bindings();
//! assert_eq!(store.get_value(&opacity), &Value::F64(0.25));
//! ```
//!
//! ## Memory Optimizations
//!
//! | Optimization | Description |
//! |--------------|-------------|
//! | **Sparse storage** | `PropertyStore` only allocates for non-default properties |
//! | **Shared defaults** | Default values live in the shared registration, not per element |
//! | **Inline storage** | `SmallVec` for small local property counts |
//! | **`PropertyId` as u32** | Compact, process-unique property identification |
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod binding;
mod id;
mod metadata;
mod name_scope;
mod object;
mod registry;
mod store;

pub use binding::{
    Binding, BindingMode, InstancedBinding, ObservableBinding, ValueFlow, ValueSubject,
};
pub use id::{PropertyId, StyledProperty};
pub use metadata::{
    CoerceValueCallback, PropertyChangedCallback, PropertyMetadata, PropertyMetadataBuilder,
};
pub use name_scope::{NameScope, NameScopeError};
pub use object::{ElementRef, StyledElement, StyledElementExt, WeakElementRef};
pub use registry::PropertyRegistry;
pub use store::{PropertyStore, StyleOrigin, StyleSource, StyleSourceId};
