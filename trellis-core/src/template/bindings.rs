//! Binding identifiers and the member table.

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::reactive::{Computed, Signal};

/// Allocator for binding identifiers.
///
/// One allocator is shared by every tree mounted under the same
/// application context, so identifiers are unique across the application
/// but not contiguous per component. Property and event bindings draw
/// from the same sequence, starting at 1. Independent applications hold
/// independent allocators.
#[derive(Debug, Clone)]
pub struct BindingIds(Arc<AtomicU64>);

impl BindingIds {
    pub fn new() -> Self {
        Self(Arc::new(AtomicU64::new(1)))
    }

    /// Allocate the next identifier.
    pub(crate) fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for BindingIds {
    fn default() -> Self {
        Self::new()
    }
}

/// How a property member produces its current text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A plain value, re-read on demand. Not change-tracked.
    Value,

    /// Backed by a live signal. Reading it inside a tracking scope
    /// registers the reader.
    Signal,
}

/// A readable property member.
#[derive(Clone)]
pub struct PropertySource {
    kind: SourceKind,
    read: Arc<dyn Fn() -> String + Send + Sync>,
}

impl PropertySource {
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Read the member's current text.
    ///
    /// Signal-backed sources dereference the signal; inside a tracking
    /// scope this registers the reader as a dependent.
    pub fn read(&self) -> String {
        (self.read)()
    }

    pub fn is_signal_backed(&self) -> bool {
        self.kind == SourceKind::Signal
    }
}

impl std::fmt::Debug for PropertySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertySource")
            .field("kind", &self.kind)
            .finish()
    }
}

/// A zero-argument event handler member.
pub type EventHandler = Arc<dyn Fn() + Send + Sync>;

/// The members a component exposes to its template.
///
/// Instead of looking template names up on the component by reflection,
/// a component declares every template-reachable property and handler
/// here, and extraction validates template references against the table.
/// Entries keep declaration order.
#[derive(Default)]
pub struct MemberTable {
    properties: IndexMap<String, PropertySource>,
    handlers: IndexMap<String, EventHandler>,
}

impl MemberTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a plain value property, re-read through the closure each
    /// time the binding is checked.
    pub fn value<F>(&mut self, name: &str, read: F) -> &mut Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.properties.insert(
            name.to_owned(),
            PropertySource {
                kind: SourceKind::Value,
                read: Arc::new(read),
            },
        );
        self
    }

    /// Declare a signal-backed property.
    pub fn signal<T>(&mut self, name: &str, signal: &Signal<T>) -> &mut Self
    where
        T: Clone + Display + Send + Sync + 'static,
    {
        let signal = signal.clone();
        self.properties.insert(
            name.to_owned(),
            PropertySource {
                kind: SourceKind::Signal,
                read: Arc::new(move || signal.get().to_string()),
            },
        );
        self
    }

    /// Declare a property backed by a derived value.
    pub fn computed<T>(&mut self, name: &str, computed: &Computed<T>) -> &mut Self
    where
        T: Clone + Display + Send + Sync + 'static,
    {
        let computed = computed.clone();
        self.properties.insert(
            name.to_owned(),
            PropertySource {
                kind: SourceKind::Signal,
                read: Arc::new(move || computed.get().to_string()),
            },
        );
        self
    }

    /// Declare a zero-argument event handler.
    pub fn handler<F>(&mut self, name: &str, invoke: F) -> &mut Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.handlers.insert(name.to_owned(), Arc::new(invoke));
        self
    }

    /// Look up a declared property.
    pub fn property(&self, name: &str) -> Option<&PropertySource> {
        self.properties.get(name)
    }

    /// Look up a declared event handler.
    pub fn event_handler(&self, name: &str) -> Option<&EventHandler> {
        self.handlers.get(name)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}
