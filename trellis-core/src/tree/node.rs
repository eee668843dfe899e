//! Mounted tree nodes and pull-based change detection.

use std::any::Any;
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use crate::dom::Dom;
use crate::reactive::Effect;
use crate::template::PropertySource;

/// One mounted property binding: a component member tied to a DOM
/// location.
///
/// A binding moves between two states after mount: synced (the element
/// text equals the member's current text) and stale (the member changed,
/// the element not yet rewritten). Pull mode leaves the transition to
/// [`TreeNode::detect`]; push mode performs it the moment the underlying
/// signal changes.
pub struct MountedBinding<D: Dom> {
    id: u64,
    element: D::Element,
    source: PropertySource,
    invoked: bool,
    last: Arc<RwLock<String>>,
}

impl<D: Dom> MountedBinding<D> {
    pub(crate) fn new(
        id: u64,
        element: D::Element,
        source: PropertySource,
        invoked: bool,
        last: Arc<RwLock<String>>,
    ) -> Self {
        Self {
            id,
            element,
            source,
            invoked,
            last,
        }
    }

    /// The binding's application-unique identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The materialized element this binding writes into.
    pub fn element(&self) -> &D::Element {
        &self.element
    }

    /// Whether the template used the invocation form for this binding.
    pub fn invoked(&self) -> bool {
        self.invoked
    }

    /// The text most recently written for this binding.
    pub fn last_value(&self) -> String {
        self.last
            .read()
            .expect("binding value lock poisoned")
            .clone()
    }
}

/// A mounted component: its instance, its bindings, and its mounted
/// children.
///
/// The node owns its bindings map, its children, and the effects and
/// listeners installed for it; the component instance is shared with the
/// closures declared in its member table. Element handles are borrowed
/// from the DOM collaborator.
pub struct TreeNode<D: Dom> {
    dom: Arc<D>,
    component: Arc<dyn Any + Send + Sync>,
    component_type: &'static str,
    bindings: IndexMap<String, MountedBinding<D>>,
    children: Vec<TreeNode<D>>,
    effects: Vec<Effect>,
    listeners: Vec<(D::Element, String)>,
}

impl<D: Dom> TreeNode<D> {
    pub(crate) fn new<C: 'static>(
        dom: Arc<D>,
        instance: Arc<RwLock<C>>,
        component_type: &'static str,
        bindings: IndexMap<String, MountedBinding<D>>,
        children: Vec<TreeNode<D>>,
        effects: Vec<Effect>,
        listeners: Vec<(D::Element, String)>,
    ) -> Self
    where
        C: Send + Sync,
    {
        Self {
            dom,
            component: instance,
            component_type,
            bindings,
            children,
            effects,
            listeners,
        }
    }

    /// Short type name of the mounted component.
    pub fn component_type(&self) -> &'static str {
        self.component_type
    }

    /// Downcast the shared component instance.
    pub fn instance<C: Send + Sync + 'static>(&self) -> Option<Arc<RwLock<C>>> {
        Arc::clone(&self.component).downcast::<RwLock<C>>().ok()
    }

    /// This node's own property bindings, keyed by member name.
    pub fn bindings(&self) -> &IndexMap<String, MountedBinding<D>> {
        &self.bindings
    }

    /// Mounted child nodes, in template order.
    pub fn children(&self) -> &[TreeNode<D>] {
        &self.children
    }

    /// Full-tree pull synchronization.
    ///
    /// Re-reads every binding's live value; on mismatch with the
    /// last-observed text, writes the element and updates the record.
    /// Children are re-checked unconditionally, whether or not this node
    /// had any mismatches. Returns the number of DOM text writes
    /// performed, so a second call with no intervening mutation returns
    /// zero.
    pub fn detect(&self) -> usize {
        let mut writes = 0;

        for (name, binding) in &self.bindings {
            let live = binding.source.read();
            let mut last = binding.last.write().expect("binding value lock poisoned");
            if *last != live {
                self.dom.set_text(&binding.element, &live);
                tracing::trace!(
                    component = self.component_type,
                    member = name.as_str(),
                    value = live.as_str(),
                    "change detected"
                );
                *last = live;
                writes += 1;
            }
        }

        for child in &self.children {
            writes += child.detect();
        }

        writes
    }

    /// Dispose the subtree.
    ///
    /// Stops every per-binding effect (unregistering its consumer from
    /// the signals it read) and detaches every listener this mount
    /// attached, recursively. The tree can still be inspected afterwards
    /// but no longer reacts.
    pub fn dispose(&self) {
        for effect in &self.effects {
            effect.dispose();
        }
        for (element, event) in &self.listeners {
            self.dom.unlisten(element, event);
        }
        for child in &self.children {
            child.dispose();
        }
    }
}

impl<D: Dom> std::fmt::Debug for TreeNode<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeNode")
            .field("component_type", &self.component_type)
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .field("children", &self.children)
            .finish()
    }
}
