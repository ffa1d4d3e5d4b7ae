// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred element factories.

use alloc::boxed::Box;
use core::fmt;

use understory_property::{ElementRef, StyledElement};

/// Produces a fresh element each time it is built.
pub trait Template {
    /// Materializes one instance.
    fn build(&self) -> ElementRef;
}

/// A [`Template`] backed by a closure.
///
/// # Example
///
/// ```rust
/// use understory_property::{PropertyStore, StyledElement};
/// use understory_style::{FuncTemplate, Template};
///
/// #[derive(Default)]
/// struct Border {
///     store: PropertyStore,
/// }
///
/// impl StyledElement for Border {
///     fn property_store(&self) -> &PropertyStore { &self.store }
///     fn property_store_mut(&mut self) -> &mut PropertyStore { &mut self.store }
/// }
///
/// let template = FuncTemplate::new(Border::default);
/// let first = template.build();
/// let second = template.build();
/// assert!(first.is::<Border>());
/// assert!(!first.ptr_eq(&second));
/// ```
pub struct FuncTemplate {
    build: Box<dyn Fn() -> ElementRef>,
}

impl FuncTemplate {
    /// Creates a template that wraps each value returned by `build`.
    pub fn new<E, F>(build: F) -> Self
    where
        E: StyledElement + 'static,
        F: Fn() -> E + 'static,
    {
        Self {
            build: Box::new(move || ElementRef::new(build())),
        }
    }
}

impl Template for FuncTemplate {
    fn build(&self) -> ElementRef {
        (self.build)()
    }
}

impl fmt::Debug for FuncTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncTemplate").finish_non_exhaustive()
    }
}
