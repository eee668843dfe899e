//! Trellis Core
//!
//! This crate provides the core runtime for the Trellis component UI
//! framework. It implements:
//!
//! - Reactive primitives (signals, computed values, effects)
//! - Template binding extraction and markup rewriting
//! - Component tree mounting
//! - Pull-based and push-based change detection
//!
//! The DOM itself is an external collaborator behind the `dom::Dom`
//! trait; an in-memory reference host ships with the crate so the
//! runtime runs headless.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: dependency tracking and synchronous change propagation
//! - `template`: binding syntax scanning and markup rewriting
//! - `tree`: the component trait, the tree builder, and change detection
//! - `dom`: the rendering-surface boundary and the in-memory host
//! - `error`: the mount-time error taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use trellis_core::dom::MemoryDom;
//! use trellis_core::reactive::Signal;
//! use trellis_core::template::MemberTable;
//! use trellis_core::tree::{Component, Mounter, Shared, SyncMode};
//!
//! struct Clock {
//!     time: Signal<String>,
//! }
//!
//! impl Component for Clock {
//!     const SELECTOR: &'static str = "clock";
//!
//!     fn create() -> Self {
//!         Clock { time: Signal::new("10:00:00".to_owned()) }
//!     }
//!
//!     fn template(&self) -> String {
//!         "<p>{{time()}}</p>".to_owned()
//!     }
//!
//!     fn members(this: &Shared<Self>) -> MemberTable {
//!         let mut members = MemberTable::new();
//!         members.signal("time", &this.read().unwrap().time);
//!         members
//!     }
//! }
//!
//! let dom = Arc::new(MemoryDom::new());
//! let mounter = Mounter::new(Arc::clone(&dom), SyncMode::Push);
//! let tree = mounter.mount::<Clock>(&dom.body()).unwrap();
//!
//! // The mounted element tracks the signal with no further calls
//! let clock = tree.instance::<Clock>().unwrap();
//! clock.read().unwrap().time.set("10:00:05".to_owned());
//! ```

pub mod dom;
pub mod error;
pub mod reactive;
pub mod template;
pub mod tree;

pub use error::MountError;
