//! Effect implementation.
//!
//! An Effect is a side-effecting computation that re-runs whenever any
//! signal it read changes.
//!
//! # How Effects Work
//!
//! 1. When created, the effect runs its closure immediately under its own
//!    consumer, registering it against every signal the closure reads.
//!
//! 2. When any of those signals changes, the closure re-runs in full. No
//!    value is produced and nothing is passed to the closure.
//!
//! 3. Each re-run enters the effect's scope again, so signals read only
//!    on some runs still end up registered. Registration idempotence
//!    keeps re-run counts exact.
//!
//! # Use Cases
//!
//! Effects synchronize reactive state with the outside world: writing a
//! binding's text into the DOM, logging, anything the value graph cannot
//! express.
//!
//! # Disposal
//!
//! `dispose` permanently stops the effect and unregisters its consumer
//! from every signal it touched. Without disposal the signals keep the
//! consumer alive, so an effect belonging to a discarded tree keeps
//! running until the signals themselves are dropped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use super::consumer::Consumer;
use super::scope::TrackingScope;

/// A side-effecting computation that re-runs when dependencies change.
///
/// # Example
///
/// ```rust,ignore
/// let count = Signal::new(0);
///
/// let count_for_effect = count.clone();
/// let effect = Effect::new(move || {
///     println!("Count is: {}", count_for_effect.get());
/// });
///
/// count.set(5); // Prints: "Count is: 5"
/// ```
pub struct Effect {
    consumer: Arc<Consumer>,
    run_count: Arc<AtomicUsize>,
}

impl Effect {
    /// Install an effect.
    ///
    /// The closure runs once immediately, registering the effect against
    /// every signal it reads.
    pub fn new<F>(run: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let run = Arc::new(run);
        let run_count = Arc::new(AtomicUsize::new(0));

        let consumer = {
            let run = Arc::clone(&run);
            let run_count = Arc::clone(&run_count);
            Arc::new_cyclic(|weak: &Weak<Consumer>| {
                let weak = Weak::clone(weak);
                Consumer::from_callback(Box::new(move || {
                    if let Some(me) = weak.upgrade() {
                        let _scope = TrackingScope::enter(me);
                        run();
                        run_count.fetch_add(1, Ordering::SeqCst);
                    }
                }))
            })
        };

        // Initial run establishes the dependencies
        consumer.notify();

        Self { consumer, run_count }
    }

    /// Stop the effect permanently and unregister it from every signal it
    /// read.
    pub fn dispose(&self) {
        self.consumer.dispose();
    }

    /// Check if the effect has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.consumer.is_disposed()
    }

    /// Number of completed runs, including the installation run.
    pub fn run_count(&self) -> usize {
        self.run_count.load(Ordering::SeqCst)
    }
}

impl Clone for Effect {
    fn clone(&self) -> Self {
        Self {
            consumer: Arc::clone(&self.consumer),
            run_count: Arc::clone(&self.run_count),
        }
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("run_count", &self.run_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Signal;
    use std::sync::atomic::AtomicI32;

    #[test]
    fn effect_runs_on_creation() {
        let run_count = Arc::new(AtomicI32::new(0));
        let run_count_clone = run_count.clone();

        let _effect = Effect::new(move || {
            run_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(run_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn effect_reruns_once_per_set() {
        let signal = Signal::new(0);
        let run_count = Arc::new(AtomicI32::new(0));

        let signal_clone = signal.clone();
        let run_count_clone = run_count.clone();
        let effect = Effect::new(move || {
            signal_clone.get();
            run_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(run_count.load(Ordering::SeqCst), 1);
        assert_eq!(effect.run_count(), 1);

        signal.set(1);
        assert_eq!(run_count.load(Ordering::SeqCst), 2);

        signal.set(2);
        assert_eq!(run_count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn effect_sees_new_value_on_rerun() {
        let signal = Signal::new(0);
        let observed = Arc::new(AtomicI32::new(-1));

        let signal_clone = signal.clone();
        let observed_clone = observed.clone();
        let _effect = Effect::new(move || {
            observed_clone.store(signal_clone.get(), Ordering::SeqCst);
        });

        assert_eq!(observed.load(Ordering::SeqCst), 0);

        signal.set(42);
        assert_eq!(observed.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn effect_tracks_conditional_dependencies() {
        let gate = Signal::new(true);
        let behind_gate = Signal::new(0);
        let run_count = Arc::new(AtomicI32::new(0));

        let gate_clone = gate.clone();
        let behind_clone = behind_gate.clone();
        let run_count_clone = run_count.clone();
        let _effect = Effect::new(move || {
            run_count_clone.fetch_add(1, Ordering::SeqCst);
            if !gate_clone.get() {
                behind_clone.get();
            }
        });

        assert_eq!(run_count.load(Ordering::SeqCst), 1);

        // Not read yet, so no registration and no run
        behind_gate.set(1);
        assert_eq!(run_count.load(Ordering::SeqCst), 1);

        // Flipping the gate re-runs the effect, which now reads (and
        // registers on) the gated signal
        gate.set(false);
        assert_eq!(run_count.load(Ordering::SeqCst), 2);

        behind_gate.set(2);
        assert_eq!(run_count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn disposed_effect_does_not_run() {
        let signal = Signal::new(0);
        let run_count = Arc::new(AtomicI32::new(0));

        let signal_clone = signal.clone();
        let run_count_clone = run_count.clone();
        let effect = Effect::new(move || {
            signal_clone.get();
            run_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(run_count.load(Ordering::SeqCst), 1);

        effect.dispose();
        assert!(effect.is_disposed());
        assert_eq!(signal.consumer_count(), 0);

        signal.set(1);
        assert_eq!(run_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn effect_clone_shares_state() {
        let effect1 = Effect::new(|| {});
        let effect2 = effect1.clone();

        assert_eq!(effect1.run_count(), 1);
        assert_eq!(effect2.run_count(), 1);

        effect1.dispose();
        assert!(effect2.is_disposed());
    }
}
