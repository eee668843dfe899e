//! Tracking scope.
//!
//! The tracking scope records which consumer is currently evaluating.
//! When a signal is read, it checks the scope and registers the current
//! consumer as a dependent. A signal read outside any scope registers
//! nothing.
//!
//! # Implementation
//!
//! Each thread keeps a stack of active consumers. Entering a scope pushes
//! a consumer; the guard pops it on drop. The stack (rather than a single
//! slot) keeps nested evaluations safe: a derived value that reads another
//! derived value restores the outer consumer when the inner evaluation
//! finishes.

use std::cell::RefCell;
use std::sync::Arc;

use super::consumer::{Consumer, ConsumerId};

thread_local! {
    static ACTIVE: RefCell<Vec<Arc<Consumer>>> = RefCell::new(Vec::new());
}

/// Guard marking a consumer as the active one for the current thread.
///
/// Dropping the guard restores the previously active consumer, even when
/// the evaluation panics.
pub struct TrackingScope {
    id: ConsumerId,
}

impl TrackingScope {
    /// Push `consumer` as the active consumer.
    ///
    /// While the returned guard is alive, any signal that is read
    /// registers `consumer` as a dependent.
    pub fn enter(consumer: Arc<Consumer>) -> Self {
        let id = consumer.id();
        ACTIVE.with(|stack| {
            stack.borrow_mut().push(consumer);
        });
        Self { id }
    }

    /// Whether any consumer is currently active on this thread.
    pub fn is_active() -> bool {
        ACTIVE.with(|stack| !stack.borrow().is_empty())
    }

    /// The currently active consumer, if any.
    pub fn current() -> Option<Arc<Consumer>> {
        ACTIVE.with(|stack| stack.borrow().last().cloned())
    }
}

impl Drop for TrackingScope {
    fn drop(&mut self) {
        ACTIVE.with(|stack| {
            let popped = stack.borrow_mut().pop();

            // Verify we're popping the right consumer. This helps catch
            // bugs where scopes are mismatched.
            if let Some(consumer) = popped {
                debug_assert_eq!(
                    consumer.id(),
                    self.id,
                    "TrackingScope mismatch: expected {:?}, got {:?}",
                    self.id,
                    consumer.id()
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_tracks_active_consumer() {
        let consumer = Consumer::new(|| {});

        assert!(!TrackingScope::is_active());
        assert!(TrackingScope::current().is_none());

        {
            let _scope = TrackingScope::enter(Arc::clone(&consumer));

            assert!(TrackingScope::is_active());
            assert_eq!(
                TrackingScope::current().map(|c| c.id()),
                Some(consumer.id())
            );
        }

        // Scope should be cleaned up after drop
        assert!(!TrackingScope::is_active());
        assert!(TrackingScope::current().is_none());
    }

    #[test]
    fn nested_scopes_restore_outer_consumer() {
        let outer = Consumer::new(|| {});
        let inner = Consumer::new(|| {});

        {
            let _outer_scope = TrackingScope::enter(Arc::clone(&outer));
            assert_eq!(TrackingScope::current().map(|c| c.id()), Some(outer.id()));

            {
                let _inner_scope = TrackingScope::enter(Arc::clone(&inner));
                assert_eq!(TrackingScope::current().map(|c| c.id()), Some(inner.id()));
            }

            // After the inner scope drops, the outer consumer is current
            assert_eq!(TrackingScope::current().map(|c| c.id()), Some(outer.id()));
        }

        assert!(TrackingScope::current().is_none());
    }
}
