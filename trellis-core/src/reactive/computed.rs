//! Derived values.
//!
//! A Computed re-evaluates a closure whenever any signal it read changes,
//! and republishes the result through an internally owned signal.
//!
//! # How Computed Values Work
//!
//! 1. Construction evaluates the closure once under the computed's own
//!    consumer, registering it against every signal the closure reads.
//!
//! 2. The result seeds an internal signal. Reading the computed value
//!    reads that signal, so outer consumers register exactly as they
//!    would on a plain signal.
//!
//! 3. When a dependency changes, the closure re-runs outside any tracking
//!    scope and the result is written to the internal signal, which
//!    notifies everything depending on the computed value in turn.
//!
//! The internal signal is never handed out; only the computed's own
//! notification handler (and its constructor) write it.
//!
//! # Differences from Effect
//!
//! - Computed values produce a value; effects do not.
//! - Computed dependency sets are fixed by the construction-time
//!   evaluation; effects re-track on every run.

use std::sync::{Arc, OnceLock};

use super::consumer::Consumer;
use super::scope::TrackingScope;
use super::signal::Signal;

/// A derived value that recomputes when its dependencies change.
///
/// # Example
///
/// ```rust,ignore
/// let count = Signal::new(2);
///
/// let count_for_double = count.clone();
/// let doubled = Computed::new(move || count_for_double.get() * 2);
///
/// assert_eq!(doubled.get(), 4);
/// count.set(5);
/// assert_eq!(doubled.get(), 10);
/// ```
pub struct Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// The internally owned signal the derivation republishes through.
    inner: Signal<T>,

    /// The consumer registered against the derivation's dependencies.
    consumer: Arc<Consumer>,
}

impl<T> Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new computed value from the given closure.
    ///
    /// The closure runs once immediately to produce the initial value and
    /// register the dependencies.
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let compute = Arc::new(compute);
        let inner_slot: Arc<OnceLock<Signal<T>>> = Arc::new(OnceLock::new());

        // Recomputation runs outside any tracking scope; the dependency
        // set is the one captured by the construction-time evaluation.
        let consumer = Consumer::new({
            let compute = Arc::clone(&compute);
            let inner_slot = Arc::clone(&inner_slot);
            move || {
                let next = compute();
                if let Some(inner) = inner_slot.get() {
                    inner.set(next);
                }
            }
        });

        // First evaluation runs under this consumer so every signal read
        // registers it.
        let initial = {
            let _scope = TrackingScope::enter(Arc::clone(&consumer));
            compute()
        };

        let inner = Signal::new(initial);
        let _ = inner_slot.set(inner.clone());

        Self { inner, consumer }
    }

    /// Get the computed value's unique ID (the internal signal's ID).
    pub fn id(&self) -> u64 {
        self.inner.id()
    }

    /// Read the current value.
    ///
    /// Behaves exactly like a plain signal read: an active outer consumer
    /// is registered against the internal signal.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Read the current value without registering a dependency.
    pub fn get_untracked(&self) -> T {
        self.inner.get_untracked()
    }

    /// Get the number of consumers registered on the computed value.
    pub fn consumer_count(&self) -> usize {
        self.inner.consumer_count()
    }
}

impl<T> Clone for Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            consumer: Arc::clone(&self.consumer),
        }
    }
}

impl<T> std::fmt::Debug for Computed<T>
where
    T: Clone + Send + Sync + std::fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Computed")
            .field("id", &self.id())
            .field("value", &self.get_untracked())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
