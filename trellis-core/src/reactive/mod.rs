//! Reactive primitives.
//!
//! This module implements the dependency-tracking graph: signals, derived
//! values, and effects.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a container for mutable state. When a signal is read while
//! a consumer is evaluating, the signal registers that consumer as a
//! dependent. When the signal's value is replaced, every dependent is
//! notified synchronously.
//!
//! ## Computed Values
//!
//! A Computed derives a value from other signals and republishes it
//! through its own internal signal, so further consumers can depend on
//! the derivation like on any other signal.
//!
//! ## Effects
//!
//! An Effect re-runs a side-effecting closure whenever any signal it read
//! changes. Effects connect the value graph to external systems, such as
//! writing text into the DOM.
//!
//! # Implementation Notes
//!
//! Dependency detection is transparent: a thread-local stack of active
//! consumers is consulted on every signal read. The same approach is used
//! by SolidJS, Vue 3, and Leptos.
//!
//! Propagation is synchronous and unbatched. There is no cycle guard: a
//! consumer that writes a signal it also reads recurses until the stack
//! runs out. The component runtime never creates such cycles; user code
//! that does is on its own.

mod computed;
mod consumer;
mod effect;
mod scope;
mod signal;

pub use computed::Computed;
pub use consumer::{Consumer, ConsumerId};
pub use effect::Effect;
pub use scope::TrackingScope;
pub use signal::Signal;
