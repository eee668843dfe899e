//! DOM collaborator boundary.
//!
//! The runtime never parses markup or creates elements itself. A host
//! environment provides those operations through the [`Dom`] trait; the
//! runtime holds element handles only to look up binding sites, attach
//! listeners, and write text.
//!
//! [`MemoryDom`] is the in-memory reference host used to drive the
//! runtime headless.

mod memory;

pub use memory::{ElementHandle, MemoryDom};

/// Name of the interaction event the runtime listens for.
pub const CLICK: &str = "click";

/// A DOM-like rendering surface.
///
/// Elements are cheap cloneable handles owned by the collaborator; the
/// runtime never constructs elements, it only addresses them.
pub trait Dom: Send + Sync + 'static {
    type Element: Clone + Send + Sync + 'static;

    /// Parse `markup` into a live element tree attached under `anchor`,
    /// returning the root of the new subtree.
    fn materialize(&self, anchor: &Self::Element, markup: &str) -> Self::Element;

    /// Look an element up by its `id` attribute, anywhere in the
    /// document.
    fn find_by_id(&self, id: &str) -> Option<Self::Element>;

    /// All elements with the given tag inside `root`'s subtree, in
    /// document order.
    fn find_by_tag(&self, root: &Self::Element, tag: &str) -> Vec<Self::Element>;

    /// Attach an interaction listener.
    fn listen(&self, target: &Self::Element, event: &str, handler: Box<dyn Fn() + Send + Sync>);

    /// Detach every listener attached to `target` for `event`.
    fn unlisten(&self, target: &Self::Element, event: &str);

    /// Replace the element's text content.
    fn set_text(&self, target: &Self::Element, text: &str);
}
