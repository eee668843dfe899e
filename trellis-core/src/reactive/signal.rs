//! Signal implementation.
//!
//! A Signal is the fundamental reactive primitive. It holds a value and
//! tracks which computations depend on it.
//!
//! # How Signals Work
//!
//! 1. When a signal is read while a consumer is active (inside a computed
//!    value or an effect), the signal registers that consumer as a
//!    dependent. Registration is idempotent.
//!
//! 2. When a signal's value is replaced, every registered consumer is
//!    notified synchronously, in registration order.
//!
//! 3. There is no equality check and no batching: setting a value equal
//!    to the old one still notifies, and the whole downstream chain runs
//!    as one synchronous call stack.
//!
//! # Reentrancy
//!
//! A consumer that writes a signal it also reads recurses synchronously
//! with no guard. The propagation path is deliberately unprotected; see
//! the module documentation in `reactive`.
//!
//! # Thread Safety
//!
//! The value is protected by a `RwLock`, and the consumer set is
//! snapshotted before notification so callbacks may freely read (and
//! re-register on) the signal being written.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::consumer::ConsumerSet;
use super::scope::TrackingScope;

/// Counter for generating unique signal IDs.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique signal ID.
fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A reactive signal holding a value of type T.
///
/// # Example
///
/// ```rust,ignore
/// let count = Signal::new(0);
///
/// // Read the value
/// let value = count.get();
///
/// // Replace the value (notifies consumers)
/// count.set(5);
/// ```
pub struct Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Unique identifier for this signal.
    id: u64,

    /// The current value.
    value: Arc<RwLock<T>>,

    /// Consumers registered by tracked reads, in registration order.
    consumers: Arc<RwLock<ConsumerSet>>,
}

impl<T> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            id: next_signal_id(),
            value: Arc::new(RwLock::new(value)),
            consumers: Arc::new(RwLock::new(ConsumerSet::new())),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the current value.
    ///
    /// If a consumer is active on this thread, it is registered as a
    /// dependent of this signal. Reading the same signal twice within one
    /// evaluation registers the consumer once.
    pub fn get(&self) -> T {
        if let Some(consumer) = TrackingScope::current() {
            let newly_registered = self
                .consumers
                .write()
                .expect("consumer set lock poisoned")
                .register(&consumer);
            if newly_registered {
                consumer.attached(Arc::downgrade(&self.consumers));
            }
        }

        self.value.read().expect("value lock poisoned").clone()
    }

    /// Get the current value without registering a dependency.
    pub fn get_untracked(&self) -> T {
        self.value.read().expect("value lock poisoned").clone()
    }

    /// Replace the value and notify every registered consumer.
    ///
    /// The replacement is unconditional: a value equal to the old one
    /// still notifies. Notification runs synchronously in registration
    /// order, against a snapshot of the consumer set taken before the
    /// first callback fires.
    pub fn set(&self, value: T) {
        {
            let mut guard = self.value.write().expect("value lock poisoned");
            *guard = value;
        }

        let consumers = self
            .consumers
            .read()
            .expect("consumer set lock poisoned")
            .snapshot();
        for consumer in consumers {
            consumer.notify();
        }
    }

    /// Update the value using a function of the current value.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let new_value = {
            let guard = self.value.read().expect("value lock poisoned");
            f(&*guard)
        };
        self.set(new_value);
    }

    /// Get the number of registered consumers.
    pub fn consumer_count(&self) -> usize {
        self.consumers
            .read()
            .expect("consumer set lock poisoned")
            .len()
    }
}

impl<T> Clone for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Arc::clone(&self.value),
            consumers: Arc::clone(&self.consumers),
        }
    }
}

impl<T> Debug for Signal<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &self.get_untracked())
            .field("consumer_count", &self.consumer_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Consumer;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn signal_get_and_set() {
        let signal = Signal::new(0);
        assert_eq!(signal.get(), 0);

        signal.set(42);
        assert_eq!(signal.get(), 42);
    }

    #[test]
    fn signal_update() {
        let signal = Signal::new(10);
        signal.update(|v| v + 5);
        assert_eq!(signal.get(), 15);
    }

    #[test]
    fn untracked_read_registers_nothing() {
        let signal = Signal::new(0);

        // No consumer is active, so neither read registers anything
        signal.get();
        signal.get_untracked();

        assert_eq!(signal.consumer_count(), 0);
    }

    #[test]
    fn tracked_read_registers_active_consumer() {
        let signal = Signal::new(0);
        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();

        let consumer = Consumer::new(move || {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        {
            let _scope = TrackingScope::enter(Arc::clone(&consumer));
            signal.get();
        }
        assert_eq!(signal.consumer_count(), 1);

        signal.set(1);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);

        signal.set(2);
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn double_read_registers_once() {
        let signal = Signal::new(0);
        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();

        let consumer = Consumer::new(move || {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        {
            let _scope = TrackingScope::enter(Arc::clone(&consumer));
            signal.get();
            signal.get();
        }
        assert_eq!(signal.consumer_count(), 1);

        // One notification per set, not one per read
        signal.set(1);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn notification_runs_in_registration_order() {
        let signal = Signal::new(0);
        let order = Arc::new(RwLock::new(Vec::new()));

        let first = {
            let order = order.clone();
            Consumer::new(move || order.write().unwrap().push("first"))
        };
        let second = {
            let order = order.clone();
            Consumer::new(move || order.write().unwrap().push("second"))
        };

        {
            let _scope = TrackingScope::enter(Arc::clone(&first));
            signal.get();
        }
        {
            let _scope = TrackingScope::enter(Arc::clone(&second));
            signal.get();
        }

        signal.set(1);
        assert_eq!(*order.read().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn set_notifies_even_when_value_is_equal() {
        let signal = Signal::new(7);
        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();

        let consumer = Consumer::new(move || {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        {
            let _scope = TrackingScope::enter(Arc::clone(&consumer));
            signal.get();
        }

        signal.set(7);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disposed_consumer_stops_receiving() {
        let signal = Signal::new(0);
        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();

        let consumer = Consumer::new(move || {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        {
            let _scope = TrackingScope::enter(Arc::clone(&consumer));
            signal.get();
        }

        signal.set(1);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);

        consumer.dispose();
        assert_eq!(signal.consumer_count(), 0);

        signal.set(2);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn signal_clone_shares_state() {
        let signal1 = Signal::new(0);
        let signal2 = signal1.clone();

        signal1.set(42);
        assert_eq!(signal2.get(), 42);

        signal2.set(100);
        assert_eq!(signal1.get(), 100);
    }

    #[test]
    fn signal_ids_are_unique() {
        let s1 = Signal::new(0);
        let s2 = Signal::new(0);
        let s3 = Signal::new(0);

        assert_ne!(s1.id(), s2.id());
        assert_ne!(s2.id(), s3.id());
        assert_ne!(s1.id(), s3.id());
    }
}
