//! Component tree.
//!
//! A component pairs a declarative template with explicitly declared
//! members. The [`Mounter`] instantiates a component, extracts and
//! rewrites its template, materializes the markup through the DOM
//! collaborator, wires event listeners and property bindings, and
//! recursively mounts imported child components, producing a
//! [`TreeNode`] per component.
//!
//! Two synchronization strategies keep mounted bindings current:
//!
//! - Pull: nothing updates until [`TreeNode::detect`] walks the tree.
//! - Push: every signal-backed binding gets its own effect and rewrites
//!   its element the moment the signal changes.

mod mount;
mod node;

pub use mount::{Mounter, SyncMode};
pub use node::{MountedBinding, TreeNode};

use std::sync::{Arc, RwLock};

use crate::dom::Dom;
use crate::error::MountError;
use crate::template::MemberTable;

/// A component instance shared between its tree node, its event
/// handlers, and its property accessors.
pub type Shared<C> = Arc<RwLock<C>>;

/// A declarative UI component.
///
/// # Example
///
/// ```rust,ignore
/// struct Clock {
///     time: Signal<String>,
/// }
///
/// impl Component for Clock {
///     const SELECTOR: &'static str = "clock";
///
///     fn create() -> Self {
///         Clock { time: Signal::new("10:00:00".to_owned()) }
///     }
///
///     fn template(&self) -> String {
///         "<p>{{time()}}</p>".to_owned()
///     }
///
///     fn members(this: &Shared<Self>) -> MemberTable {
///         let mut members = MemberTable::new();
///         members.signal("time", &this.read().unwrap().time);
///         members
///     }
/// }
/// ```
pub trait Component: Send + Sync + Sized + 'static {
    /// Tag selector matched when this component is placed as a child.
    const SELECTOR: &'static str;

    /// Construct a fresh instance.
    fn create() -> Self;

    /// The declarative template markup.
    fn template(&self) -> String;

    /// Declare the members the template may reference.
    ///
    /// Property closures run whenever the binding is checked; handler
    /// closures run on every matching interaction event. Both typically
    /// capture a clone of `this` or of a signal owned by the instance.
    fn members(this: &Shared<Self>) -> MemberTable;

    /// Child component types this component may place by selector tag.
    fn imports<D: Dom>() -> Vec<ChildImport<D>> {
        Vec::new()
    }
}

/// A mountable child declaration: the child's selector plus an erased
/// mount entry point.
pub struct ChildImport<D: Dom> {
    selector: &'static str,
    mount: Box<dyn Fn(&Mounter<D>, &D::Element) -> Result<TreeNode<D>, MountError> + Send + Sync>,
}

impl<D: Dom> ChildImport<D> {
    /// Declare `C` as an importable child.
    pub fn of<C: Component>() -> Self {
        Self {
            selector: C::SELECTOR,
            mount: Box::new(|mounter, element| mounter.mount::<C>(element)),
        }
    }

    /// The child's declared tag selector.
    pub fn selector(&self) -> &'static str {
        self.selector
    }

    pub(crate) fn mount(
        &self,
        mounter: &Mounter<D>,
        element: &D::Element,
    ) -> Result<TreeNode<D>, MountError> {
        (self.mount)(mounter, element)
    }
}
