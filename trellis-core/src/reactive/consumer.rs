//! Consumer types for the reactive system.
//!
//! A Consumer is anything that can be registered against a signal and
//! receive change notifications: derived values, effects, and the
//! per-binding sync closures installed by the component tree.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

/// Unique identifier for a consumer.
///
/// Each consumer gets a unique ID when created. Signals use the ID to keep
/// registration idempotent: reading the same signal twice within one
/// evaluation registers the consumer once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConsumerId(u64);

impl ConsumerId {
    /// Generate a new unique consumer ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConsumerId {
    fn default() -> Self {
        Self::new()
    }
}

/// The consumers registered against one signal.
///
/// Entries keep registration order; notification iterates in that order.
pub(crate) struct ConsumerSet {
    entries: Vec<(ConsumerId, Arc<Consumer>)>,
}

impl ConsumerSet {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a consumer. Returns false if it was already present.
    pub(crate) fn register(&mut self, consumer: &Arc<Consumer>) -> bool {
        let id = consumer.id();
        if self.entries.iter().any(|(existing, _)| *existing == id) {
            return false;
        }
        self.entries.push((id, Arc::clone(consumer)));
        true
    }

    /// Remove a consumer by ID.
    pub(crate) fn remove(&mut self, id: ConsumerId) {
        self.entries.retain(|(existing, _)| *existing != id);
    }

    /// Snapshot the registered consumers in registration order.
    pub(crate) fn snapshot(&self) -> Vec<Arc<Consumer>> {
        self.entries.iter().map(|(_, c)| Arc::clone(c)).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A registered receiver of change notifications.
///
/// The notification callback is stored as a boxed trait object so
/// different consumer kinds (derived values, effects, binding syncs) can
/// carry different behavior.
pub struct Consumer {
    id: ConsumerId,
    notify: Box<dyn Fn() + Send + Sync>,
    disposed: AtomicBool,
    /// Consumer sets this consumer has been registered into, kept so
    /// `dispose` can unregister it everywhere.
    registrations: RwLock<Vec<Weak<RwLock<ConsumerSet>>>>,
}

impl Consumer {
    /// Create a new consumer with the given notification callback.
    pub fn new<F>(notify: F) -> Arc<Self>
    where
        F: Fn() + Send + Sync + 'static,
    {
        Arc::new(Self::from_callback(Box::new(notify)))
    }

    /// Build a consumer from a boxed callback.
    ///
    /// Exposed for `Arc::new_cyclic` construction, where the callback
    /// needs a weak handle to the consumer it belongs to.
    pub(crate) fn from_callback(notify: Box<dyn Fn() + Send + Sync>) -> Self {
        Self {
            id: ConsumerId::new(),
            notify,
            disposed: AtomicBool::new(false),
            registrations: RwLock::new(Vec::new()),
        }
    }

    /// Get the consumer's unique ID.
    pub fn id(&self) -> ConsumerId {
        self.id
    }

    /// Invoke the notification callback.
    ///
    /// A disposed consumer ignores notifications.
    pub fn notify(&self) {
        if !self.disposed.load(Ordering::SeqCst) {
            (self.notify)();
        }
    }

    /// Permanently silence this consumer and unregister it from every
    /// signal it was registered with.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        let registrations = std::mem::take(
            &mut *self
                .registrations
                .write()
                .expect("registrations lock poisoned"),
        );
        for weak in registrations {
            if let Some(set) = weak.upgrade() {
                set.write().expect("consumer set lock poisoned").remove(self.id);
            }
        }
    }

    /// Check if the consumer has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Record a consumer set this consumer was registered into.
    pub(crate) fn attached(&self, set: Weak<RwLock<ConsumerSet>>) {
        self.registrations
            .write()
            .expect("registrations lock poisoned")
            .push(set);
    }
}

impl std::fmt::Debug for Consumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Consumer")
            .field("id", &self.id)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
