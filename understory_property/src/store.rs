// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element sparse property storage.
//!
//! This module provides [`PropertyStore`] for storing property values on
//! elements, using sparse storage to minimize memory for elements with few
//! properties set.
//!
//! # Implementation
//!
//! Following the `WinUI` approach, we use sorted vectors with binary search
//! rather than a hash map. This provides:
//!
//! - Better cache locality (contiguous memory)
//! - Lower memory overhead (no hash buckets)
//! - O(log n) lookup, which is fast for typical property counts (5-20)
//! - Inline storage for small local property sets via `SmallVec`
//!
//! # Layers
//!
//! - **Local** - values set by application code (highest precedence)
//! - **Style** - values and bindings applied by styles, one entry per
//!   property, attributed to a [`StyleSource`]
//! - **Default** - the property's registered default
//!
//! Every value entering the store is converted to the property's declared
//! type first. A failed conversion never replaces a stored value.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use understory_coerce::{
    ConversionNotification, Culture, DefaultValueConverter, ErrorSeverity, Value, ValueConverter,
};

use crate::binding::{BindingMode, InstancedBinding};
use crate::id::{PropertyId, StyledProperty};
use crate::name_scope::NameScope;

/// Default inline capacity for local entries.
///
/// Most UI elements have fewer than 8 locally set properties,
/// so this avoids heap allocation in the common case.
const INLINE_CAPACITY: usize = 8;

/// Identifies the style that produced a style-layer entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleSourceId(u32);

impl StyleSourceId {
    /// Allocates a process-unique ID.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw ID.
    #[must_use]
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw ID.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Where a style comes from. Later variants take precedence.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleOrigin {
    /// Built-in control styles.
    #[default]
    Base,
    /// Application style sheets.
    Sheet,
    /// Styles applied directly to an element.
    Override,
}

/// The style context a value is assigned under.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StyleSource {
    id: StyleSourceId,
    origin: StyleOrigin,
}

impl StyleSource {
    /// Creates a source with a freshly allocated ID.
    #[must_use]
    pub fn new(origin: StyleOrigin) -> Self {
        Self::with_id(StyleSourceId::next(), origin)
    }

    /// Creates a source with an explicit ID.
    #[must_use]
    pub const fn with_id(id: StyleSourceId, origin: StyleOrigin) -> Self {
        Self { id, origin }
    }

    /// Returns the source ID.
    #[must_use]
    #[inline]
    pub const fn id(&self) -> StyleSourceId {
        self.id
    }

    /// Returns the origin.
    #[must_use]
    #[inline]
    pub const fn origin(&self) -> StyleOrigin {
        self.origin
    }
}

#[derive(Clone, Debug)]
struct StyleEntry {
    source: StyleSource,
    value: StyleValue,
}

#[derive(Clone, Debug)]
enum StyleValue {
    /// Assigned once.
    Value(Value),
    Binding(BindingState),
}

#[derive(Clone, Debug)]
struct BindingState {
    binding: InstancedBinding,
    /// Flow version of the last processed publication.
    observed: u64,
    /// Last successfully applied value; `None` falls back to the default.
    current: Option<Value>,
    tracking: bool,
}

impl StyleEntry {
    fn current(&self) -> Option<&Value> {
        match &self.value {
            StyleValue::Value(value) => Some(value),
            StyleValue::Binding(state) => state.current.as_ref(),
        }
    }
}

/// What an incoming conversion result does to the entry it targets.
enum Outcome {
    Apply(Value),
    Retain,
    Clear,
}

fn outcome(property: &StyledProperty, notification: ConversionNotification) -> Outcome {
    match notification {
        ConversionNotification::Value(value) => Outcome::Apply(property.metadata().coerce(value)),
        ConversionNotification::Error { error, severity } => {
            warn!(
                property = property.name(),
                ?severity,
                %error,
                "value rejected, keeping previous value"
            );
            Outcome::Retain
        }
        ConversionNotification::Unset => Outcome::Clear,
    }
}

/// Per-element sparse storage for property values.
///
/// # Example
///
/// ```rust
/// use understory_coerce::{PrimitiveType, TargetType, Value};
/// use understory_property::{
///     PropertyMetadataBuilder, PropertyRegistry, PropertyStore, StyleOrigin, StyleSource,
/// };
///
/// let mut registry = PropertyRegistry::new();
/// let width = registry.register(
///     "Width",
///     PropertyMetadataBuilder::new(TargetType::primitive(PrimitiveType::F64), 0.0_f64).build(),
/// );
///
/// let mut store = PropertyStore::new();
/// assert_eq!(store.get_value(&width), &Value::F64(0.0));
///
/// // Style values are converted to the property type.
/// let style = StyleSource::new(StyleOrigin::Sheet);
/// assert!(store.set_style_value(&width, style, "120"));
/// assert_eq!(store.get_value(&width), &Value::F64(120.0));
///
/// // Local values win over style values.
/// store.set_value(&width, 100_i32);
/// assert_eq!(store.get_value(&width), &Value::F64(100.0));
///
/// // Unconvertible values are rejected and the previous value is kept.
/// assert!(!store.set_value(&width, "wide"));
/// assert_eq!(store.get_value(&width), &Value::F64(100.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PropertyStore {
    /// Local values, sorted by [`PropertyId`] for binary search lookup.
    local_entries: SmallVec<[(PropertyId, Value); INLINE_CAPACITY]>,
    /// Style entries, sorted by [`PropertyId`] for binary search lookup.
    style_entries: Vec<(StyledProperty, StyleEntry)>,
    name_scope: Option<NameScope>,
}

impl PropertyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no properties have explicit values or bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.local_entries.is_empty() && self.style_entries.is_empty()
    }

    /// Returns the number of properties with explicit values or bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.property_ids().count()
    }

    /// Returns the property IDs that have values or bindings, in ID order.
    pub fn property_ids(&self) -> impl Iterator<Item = PropertyId> + '_ {
        PropertyIds {
            local: self.local_entries.as_slice(),
            style: self.style_entries.as_slice(),
            local_i: 0,
            style_i: 0,
        }
    }

    #[inline]
    fn find_local_entry(&self, id: PropertyId) -> Result<usize, usize> {
        self.local_entries
            .binary_search_by_key(&id, |(pid, _)| *pid)
    }

    #[inline]
    fn find_style_entry(&self, id: PropertyId) -> Result<usize, usize> {
        self.style_entries
            .binary_search_by_key(&id, |(property, _)| property.id())
    }

    fn style_entry(&self, property: &StyledProperty) -> Option<&StyleEntry> {
        self.find_style_entry(property.id())
            .ok()
            .map(|idx| &self.style_entries[idx].1)
    }

    /// Clones the effective value if a changed callback will need it.
    fn snapshot(&self, property: &StyledProperty) -> Option<Value> {
        property
            .metadata()
            .has_changed_callback()
            .then(|| self.get_value(property).clone())
    }

    fn notify(&self, property: &StyledProperty, old_value: Option<Value>) {
        if let Some(old_value) = old_value {
            let new_value = self.get_value(property);
            if *new_value != old_value {
                property.metadata().on_changed(&old_value, new_value);
            }
        }
    }

    // =========================================================================
    // Effective value resolution
    // =========================================================================

    /// Gets the effective value (Local → Style → default).
    #[must_use]
    pub fn get_value<'a>(&'a self, property: &'a StyledProperty) -> &'a Value {
        if let Some(value) = self.get_local(property) {
            return value;
        }
        if let Some(value) = self.get_style(property) {
            return value;
        }
        property.default_value()
    }

    /// Returns `true` if the property has a local value or a style value.
    #[must_use]
    pub fn has_value(&self, property: &StyledProperty) -> bool {
        self.get_local(property).is_some() || self.get_style(property).is_some()
    }

    // =========================================================================
    // Local layer
    // =========================================================================

    /// Gets the local value, if set.
    #[must_use]
    #[inline]
    pub fn get_local(&self, property: &StyledProperty) -> Option<&Value> {
        self.find_local_entry(property.id())
            .ok()
            .map(|idx| &self.local_entries[idx].1)
    }

    /// Returns `true` if the property has a local value.
    #[must_use]
    #[inline]
    pub fn has_local(&self, property: &StyledProperty) -> bool {
        self.find_local_entry(property.id()).is_ok()
    }

    /// Converts `value` to the property type and stores it as the local value.
    ///
    /// Returns `false` if the value could not be converted; the previous
    /// value is kept.
    pub fn set_value(&mut self, property: &StyledProperty, value: impl Into<Value>) -> bool {
        let notification = DefaultValueConverter.convert(
            &value.into(),
            property.property_type(),
            None,
            &Culture::INVARIANT,
        );
        match outcome(property, notification) {
            Outcome::Apply(value) => {
                let old_value = self.snapshot(property);
                let id = property.id();
                match self.find_local_entry(id) {
                    Ok(idx) => self.local_entries[idx].1 = value,
                    Err(idx) => self.local_entries.insert(idx, (id, value)),
                }
                self.notify(property, old_value);
                true
            }
            Outcome::Retain => false,
            Outcome::Clear => {
                self.clear_value(property);
                true
            }
        }
    }

    /// Clears the local value.
    ///
    /// Returns `true` if a value was removed.
    pub fn clear_value(&mut self, property: &StyledProperty) -> bool {
        let Ok(idx) = self.find_local_entry(property.id()) else {
            return false;
        };
        let old_value = self.snapshot(property);
        self.local_entries.remove(idx);
        self.notify(property, old_value);
        true
    }

    // =========================================================================
    // Style layer
    // =========================================================================

    /// Gets the current style value, if any.
    ///
    /// A binding that has not yet produced a value has no style value.
    #[must_use]
    pub fn get_style(&self, property: &StyledProperty) -> Option<&Value> {
        self.style_entry(property).and_then(StyleEntry::current)
    }

    /// Returns the source of the property's style entry.
    #[must_use]
    pub fn style_source(&self, property: &StyledProperty) -> Option<StyleSource> {
        self.style_entry(property).map(|entry| entry.source)
    }

    /// Returns `true` if the property is tracking a live binding.
    ///
    /// One-time bindings stop tracking after their first value, and every
    /// binding stops when its flow completes.
    #[must_use]
    pub fn has_binding(&self, property: &StyledProperty) -> bool {
        self.style_entry(property)
            .is_some_and(|entry| matches!(&entry.value, StyleValue::Binding(state) if state.tracking))
    }

    /// Returns `false` and logs if an entry from a higher origin is present.
    fn may_replace(&self, property: &StyledProperty, source: StyleSource) -> bool {
        match self.style_source(property) {
            Some(existing) if existing.origin > source.origin => {
                debug!(
                    property = property.name(),
                    existing = ?existing.origin,
                    incoming = ?source.origin,
                    "style entry shadowed by a higher origin"
                );
                false
            }
            _ => true,
        }
    }

    fn insert_style(&mut self, property: &StyledProperty, entry: StyleEntry) {
        match self.find_style_entry(property.id()) {
            Ok(idx) => self.style_entries[idx].1 = entry,
            Err(idx) => self.style_entries.insert(idx, (property.clone(), entry)),
        }
    }

    /// Converts `value` to the property type and stores it as a one-time
    /// style value attributed to `source`.
    ///
    /// An existing style entry is replaced only if `source` has the same or
    /// a higher origin. Returns `false` if the value was not stored.
    pub fn set_style_value(
        &mut self,
        property: &StyledProperty,
        source: StyleSource,
        value: impl Into<Value>,
    ) -> bool {
        if !self.may_replace(property, source) {
            return false;
        }
        let notification = DefaultValueConverter.convert(
            &value.into(),
            property.property_type(),
            None,
            &Culture::INVARIANT,
        );
        let old_value = self.snapshot(property);
        match outcome(property, notification) {
            Outcome::Apply(value) => {
                self.insert_style(
                    property,
                    StyleEntry {
                        source,
                        value: StyleValue::Value(value),
                    },
                );
            }
            Outcome::Retain => return false,
            Outcome::Clear => {
                if let Ok(idx) = self.find_style_entry(property.id()) {
                    self.style_entries.remove(idx);
                }
            }
        }
        self.notify(property, old_value);
        true
    }

    /// Attaches a binding to the property, attributed to `source`, and
    /// applies its latest value.
    ///
    /// An existing style entry is replaced only if `source` has the same or
    /// a higher origin. Returns `false` if the binding was not attached.
    pub fn bind(
        &mut self,
        property: &StyledProperty,
        source: StyleSource,
        binding: InstancedBinding,
    ) -> bool {
        if !self.may_replace(property, source) {
            return false;
        }
        let old_value = self.snapshot(property);
        self.insert_style(
            property,
            StyleEntry {
                source,
                value: StyleValue::Binding(BindingState {
                    binding,
                    observed: 0,
                    current: None,
                    tracking: true,
                }),
            },
        );
        if let Ok(idx) = self.find_style_entry(property.id()) {
            self.sync_entry(idx);
        }
        // The replaced entry may have differed even if the binding has no value yet.
        self.notify(property, old_value);
        true
    }

    /// Pulls pending values from every tracked binding.
    ///
    /// Returns the number of properties whose style value was updated.
    pub fn sync_bindings(&mut self) -> usize {
        let mut updated = 0;
        for idx in 0..self.style_entries.len() {
            let property = self.style_entries[idx].0.clone();
            let old_value = self.snapshot(&property);
            if self.sync_entry(idx) {
                updated += 1;
                self.notify(&property, old_value);
            }
        }
        updated
    }

    /// Processes the binding at `idx` if its flow has moved on.
    ///
    /// Returns `true` if the entry's current value changed state.
    fn sync_entry(&mut self, idx: usize) -> bool {
        let (property, entry) = &self.style_entries[idx];
        let StyleValue::Binding(state) = &entry.value else {
            return false;
        };
        if !state.tracking {
            return false;
        }
        let flow = state.binding.flow();
        let version = flow.version();
        let completed = flow.is_completed();
        let notification = if version == state.observed {
            None
        } else {
            flow.latest().map(|latest| match latest {
                Ok(value) => state.binding.convert(&value, property.property_type()),
                Err(error) => ConversionNotification::from_error(error, ErrorSeverity::Error),
            })
        };
        let result = notification.map(|notification| outcome(property, notification));

        let (property, entry) = &mut self.style_entries[idx];
        let StyleValue::Binding(state) = &mut entry.value else {
            return false;
        };
        state.observed = version;
        let updated = match result {
            Some(Outcome::Apply(value)) => {
                trace!(property = property.name(), %value, "binding value applied");
                state.current = Some(value);
                if state.binding.mode() == BindingMode::OneTime {
                    state.tracking = false;
                }
                true
            }
            Some(Outcome::Clear) => {
                trace!(property = property.name(), "binding unset, falling back");
                state.current = None;
                true
            }
            Some(Outcome::Retain) | None => false,
        };
        if completed {
            debug!(property = property.name(), "binding flow completed");
            state.tracking = false;
        }
        updated
    }

    /// Removes the property's style entry, value or binding.
    ///
    /// Returns `true` if an entry was removed.
    pub fn clear_style(&mut self, property: &StyledProperty) -> bool {
        let Ok(idx) = self.find_style_entry(property.id()) else {
            return false;
        };
        let old_value = self.snapshot(property);
        self.style_entries.remove(idx);
        self.notify(property, old_value);
        true
    }

    /// Removes every style entry attributed to the style `id`.
    ///
    /// Returns the number of entries removed.
    pub fn detach_style(&mut self, id: StyleSourceId) -> usize {
        let properties: Vec<_> = self
            .style_entries
            .iter()
            .filter(|(_, entry)| entry.source.id == id)
            .map(|(property, _)| property.clone())
            .collect();
        for property in &properties {
            self.clear_style(property);
        }
        properties.len()
    }

    // =========================================================================
    // Name scope
    // =========================================================================

    /// Returns the name scope rooted at this element, if any.
    #[must_use]
    pub fn name_scope(&self) -> Option<&NameScope> {
        self.name_scope.as_ref()
    }

    /// Returns the name scope rooted at this element mutably, if any.
    pub fn name_scope_mut(&mut self) -> Option<&mut NameScope> {
        self.name_scope.as_mut()
    }

    /// Roots a name scope at this element, returning the previous one.
    pub fn set_name_scope(&mut self, scope: NameScope) -> Option<NameScope> {
        self.name_scope.replace(scope)
    }
}

struct PropertyIds<'a> {
    local: &'a [(PropertyId, Value)],
    style: &'a [(StyledProperty, StyleEntry)],
    local_i: usize,
    style_i: usize,
}

impl Iterator for PropertyIds<'_> {
    type Item = PropertyId;

    fn next(&mut self) -> Option<Self::Item> {
        let local = self.local.get(self.local_i).map(|(id, _)| *id);
        let style = self.style.get(self.style_i).map(|(property, _)| property.id());

        match (local, style) {
            (None, None) => None,
            (Some(id), None) => {
                self.local_i += 1;
                Some(id)
            }
            (None, Some(id)) => {
                self.style_i += 1;
                Some(id)
            }
            (Some(local_id), Some(style_id)) => {
                if local_id < style_id {
                    self.local_i += 1;
                    Some(local_id)
                } else if style_id < local_id {
                    self.style_i += 1;
                    Some(style_id)
                } else {
                    self.local_i += 1;
                    self.style_i += 1;
                    Some(local_id)
                }
            }
        }
    }
}
