//! The component tree builder.

use std::any::type_name;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use crate::dom::{Dom, CLICK};
use crate::error::MountError;
use crate::reactive::Effect;
use crate::template::{
    element_id, extract_events, extract_properties, BindingIds, PropertySource,
};

use super::node::{MountedBinding, TreeNode};
use super::{Component, Shared};

/// How mounted bindings are kept in sync with component state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Bindings hold plain last-observed values; nothing re-checks them
    /// until [`TreeNode::detect`] is invoked.
    Pull,

    /// Every signal-backed binding gets a dedicated effect that rewrites
    /// its element as soon as the underlying signal changes.
    Push,
}

/// Builds component trees against a DOM collaborator.
///
/// One mounter models one running application: it owns the binding id
/// allocator, so every binding mounted through it gets an
/// application-unique identifier and independent mounters never
/// cross-talk.
pub struct Mounter<D: Dom> {
    dom: Arc<D>,
    ids: BindingIds,
    mode: SyncMode,
}

impl<D: Dom> Mounter<D> {
    pub fn new(dom: Arc<D>, mode: SyncMode) -> Self {
        Self {
            dom,
            ids: BindingIds::new(),
            mode,
        }
    }

    /// The DOM collaborator this mounter builds against.
    pub fn dom(&self) -> &Arc<D> {
        &self.dom
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Instantiate `C`, extract and rewrite its template, materialize the
    /// markup under `anchor`, wire events and bindings, and recursively
    /// mount declared children.
    ///
    /// Extraction failures abort the mount; nothing is materialized for a
    /// component whose template does not validate.
    pub fn mount<C: Component>(&self, anchor: &D::Element) -> Result<TreeNode<D>, MountError> {
        let component_type = short_type_name::<C>();
        let instance: Shared<C> = Arc::new(RwLock::new(C::create()));
        let members = C::members(&instance);
        let template = instance
            .read()
            .expect("component lock poisoned")
            .template();

        // Event extraction runs on the property-rewritten markup, so a
        // handler attribute inside interpolated text is unreachable.
        let (properties, html) =
            extract_properties(component_type, &members, &template, &self.ids)?;
        let (events, html) = extract_events(component_type, &members, &html, &self.ids)?;

        let root = self.dom.materialize(anchor, &html);

        let mut listeners = Vec::new();
        for event in &events {
            let element = self
                .dom
                .find_by_id(&element_id(event.id))
                .expect("event binding element missing after materialization");
            let handler = Arc::clone(
                members
                    .event_handler(&event.method)
                    .expect("event binding validated during extraction"),
            );
            self.dom.listen(&element, CLICK, Box::new(move || handler()));
            listeners.push((element, CLICK.to_owned()));
        }

        let mut bindings = IndexMap::new();
        let mut effects = Vec::new();
        for property in properties {
            let element = self
                .dom
                .find_by_id(&element_id(property.id))
                .expect("property binding element missing after materialization");
            let source = members
                .property(&property.name)
                .expect("property binding validated during extraction")
                .clone();
            let last = Arc::new(RwLock::new(property.value.clone()));

            if self.mode == SyncMode::Push && property.invoked {
                effects.push(self.sync_effect(
                    element.clone(),
                    source.clone(),
                    Arc::clone(&last),
                ));
            }

            bindings.insert(
                property.name.clone(),
                MountedBinding::new(property.id, element, source, property.invoked, last),
            );
        }

        let mut children = Vec::new();
        for import in C::imports::<D>() {
            let matches = self.dom.find_by_tag(&root, import.selector());
            // Only the first matching tag is wired; later duplicates of
            // the same child type stay inert.
            if let Some(first) = matches.first() {
                children.push(import.mount(self, first)?);
            }
        }

        tracing::debug!(
            component = component_type,
            properties = bindings.len(),
            events = events.len(),
            children = children.len(),
            mode = ?self.mode,
            "mounted component"
        );

        Ok(TreeNode::new(
            Arc::clone(&self.dom),
            instance,
            component_type,
            bindings,
            children,
            effects,
            listeners,
        ))
    }

    /// Install the localized per-binding sync effect.
    ///
    /// The first run only establishes the signal dependency; the binding
    /// was already initialized with the signal's value at extraction
    /// time. Every later run rewrites only this binding's element.
    fn sync_effect(
        &self,
        element: D::Element,
        source: PropertySource,
        last: Arc<RwLock<String>>,
    ) -> Effect {
        let dom = Arc::clone(&self.dom);
        let primed = Arc::new(AtomicBool::new(false));
        Effect::new(move || {
            let live = source.read();
            if !primed.swap(true, Ordering::SeqCst) {
                return;
            }
            let mut last = last.write().expect("binding value lock poisoned");
            if *last != live {
                dom.set_text(&element, &live);
                *last = live;
            }
        })
    }
}

/// Type name without its module path.
fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;
    use crate::reactive::Signal;
    use crate::template::MemberTable;

    struct Badge {
        label: Signal<String>,
    }

    impl Component for Badge {
        const SELECTOR: &'static str = "badge";

        fn create() -> Self {
            Self {
                label: Signal::new("new".to_owned()),
            }
        }

        fn template(&self) -> String {
            "<span class=\"badge\">{{label()}}</span>".to_owned()
        }

        fn members(this: &Shared<Self>) -> MemberTable {
            let mut members = MemberTable::new();
            members.signal("label", &this.read().expect("badge lock poisoned").label);
            members
        }
    }

    #[test]
    fn short_type_name_drops_the_module_path() {
        assert_eq!(short_type_name::<Badge>(), "Badge");
        assert_eq!(short_type_name::<String>(), "String");
    }

    #[test]
    fn mount_materializes_the_rewritten_template() {
        let dom = Arc::new(MemoryDom::new());
        let mounter = Mounter::new(Arc::clone(&dom), SyncMode::Pull);

        let tree = mounter.mount::<Badge>(&dom.body()).unwrap();

        assert_eq!(tree.component_type(), "Badge");
        assert_eq!(tree.bindings().len(), 1);

        let binding = &tree.bindings()["label"];
        assert_eq!(dom.text(binding.element()), "new");
        assert_eq!(binding.last_value(), "new");
    }

    #[test]
    fn mount_in_pull_mode_installs_no_effects() {
        let dom = Arc::new(MemoryDom::new());
        let mounter = Mounter::new(Arc::clone(&dom), SyncMode::Pull);

        let tree = mounter.mount::<Badge>(&dom.body()).unwrap();

        let badge = tree.instance::<Badge>().unwrap();
        let label = badge.read().unwrap().label.clone();
        assert_eq!(label.consumer_count(), 0);
    }

    #[test]
    fn mount_in_push_mode_subscribes_each_invoked_binding() {
        let dom = Arc::new(MemoryDom::new());
        let mounter = Mounter::new(Arc::clone(&dom), SyncMode::Push);

        let tree = mounter.mount::<Badge>(&dom.body()).unwrap();

        let badge = tree.instance::<Badge>().unwrap();
        let label = badge.read().unwrap().label.clone();
        assert_eq!(label.consumer_count(), 1);
    }

    #[test]
    fn sequential_mounts_share_the_id_sequence() {
        let dom = Arc::new(MemoryDom::new());
        let mounter = Mounter::new(Arc::clone(&dom), SyncMode::Pull);

        let first = mounter.mount::<Badge>(&dom.body()).unwrap();
        let second = mounter.mount::<Badge>(&dom.body()).unwrap();

        assert_eq!(first.bindings()["label"].id(), 1);
        assert_eq!(second.bindings()["label"].id(), 2);
    }
}
