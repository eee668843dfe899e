//! In-memory reference host.
//!
//! A headless implementation of the [`Dom`] trait: a small element tree
//! fed by a tolerant markup scanner. It exists so the runtime can be
//! driven end to end without a browser. Tests fire interaction events
//! and read text content through it.
//!
//! The scanner handles exactly what rewritten templates contain: nested
//! tags, double-quoted attributes, and text runs. It is not a general
//! HTML parser.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use regex::Regex;

use super::Dom;

/// Tags that never hold children.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

static ATTR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)="([^"]*)""#).expect("attribute pattern"));

/// Handle to an element owned by a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHandle(usize);

struct ElementData {
    tag: String,
    id: Option<String>,
    text: String,
    children: Vec<usize>,
    listeners: Vec<(String, Arc<dyn Fn() + Send + Sync>)>,
}

impl ElementData {
    fn new(tag: String, id: Option<String>) -> Self {
        Self {
            tag,
            id,
            text: String::new(),
            children: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

/// An in-memory element tree implementing the [`Dom`] collaborator.
///
/// Cloning shares the element store, like handles to one document.
#[derive(Clone)]
pub struct MemoryDom {
    elements: Arc<RwLock<Vec<ElementData>>>,
    text_writes: Arc<AtomicUsize>,
}

impl MemoryDom {
    /// Create a document holding a single empty `body` root.
    pub fn new() -> Self {
        Self {
            elements: Arc::new(RwLock::new(vec![ElementData::new("body".to_owned(), None)])),
            text_writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The document root.
    pub fn body(&self) -> ElementHandle {
        ElementHandle(0)
    }

    /// Current text content of an element, descendants included.
    pub fn text(&self, handle: &ElementHandle) -> String {
        let elements = self.elements.read().expect("element store lock poisoned");
        collect_text(&elements, handle.0)
    }

    /// Tag name of an element.
    pub fn tag(&self, handle: &ElementHandle) -> String {
        let elements = self.elements.read().expect("element store lock poisoned");
        elements[handle.0].tag.clone()
    }

    /// Fire an interaction event on an element.
    ///
    /// Handlers are snapshotted before they run, so a handler may freely
    /// mutate the document.
    pub fn fire(&self, handle: &ElementHandle, event: &str) {
        let handlers: Vec<_> = {
            let elements = self.elements.read().expect("element store lock poisoned");
            elements[handle.0]
                .listeners
                .iter()
                .filter(|(name, _)| name == event)
                .map(|(_, handler)| Arc::clone(handler))
                .collect()
        };
        for handler in handlers {
            handler();
        }
    }

    /// Number of listeners attached to an element for `event`.
    pub fn listener_count(&self, handle: &ElementHandle, event: &str) -> usize {
        let elements = self.elements.read().expect("element store lock poisoned");
        elements[handle.0]
            .listeners
            .iter()
            .filter(|(name, _)| name == event)
            .count()
    }

    /// Total number of text writes performed so far.
    pub fn text_write_count(&self) -> usize {
        self.text_writes.load(Ordering::SeqCst)
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for MemoryDom {
    type Element = ElementHandle;

    fn materialize(&self, anchor: &ElementHandle, markup: &str) -> ElementHandle {
        let mut elements = self.elements.write().expect("element store lock poisoned");
        let first = parse_into(&mut elements, anchor.0, markup);
        ElementHandle(first.unwrap_or(anchor.0))
    }

    fn find_by_id(&self, id: &str) -> Option<ElementHandle> {
        let elements = self.elements.read().expect("element store lock poisoned");
        elements
            .iter()
            .position(|element| element.id.as_deref() == Some(id))
            .map(ElementHandle)
    }

    fn find_by_tag(&self, root: &ElementHandle, tag: &str) -> Vec<ElementHandle> {
        let elements = self.elements.read().expect("element store lock poisoned");
        let mut found = Vec::new();
        collect_by_tag(&elements, root.0, tag, &mut found);
        found.into_iter().map(ElementHandle).collect()
    }

    fn listen(&self, target: &ElementHandle, event: &str, handler: Box<dyn Fn() + Send + Sync>) {
        self.elements.write().expect("element store lock poisoned")[target.0]
            .listeners
            .push((event.to_owned(), Arc::from(handler)));
    }

    fn unlisten(&self, target: &ElementHandle, event: &str) {
        self.elements.write().expect("element store lock poisoned")[target.0]
            .listeners
            .retain(|(name, _)| name != event);
    }

    fn set_text(&self, target: &ElementHandle, text: &str) {
        {
            let mut elements = self.elements.write().expect("element store lock poisoned");
            let element = &mut elements[target.0];
            element.text = text.to_owned();
            element.children.clear();
        }
        self.text_writes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Parse `markup` and attach the parsed top-level elements under
/// `parent`. Returns the first element created, if any.
fn parse_into(elements: &mut Vec<ElementData>, parent: usize, markup: &str) -> Option<usize> {
    let mut stack = vec![parent];
    let mut first_created = None;
    let mut rest = markup;

    while let Some(open) = rest.find('<') {
        let (text, after) = rest.split_at(open);
        push_text(elements, *stack.last().expect("open element stack empty"), text);

        let close = after.find('>').expect("unterminated tag in markup");
        let tag_body = &after[1..close];
        rest = &after[close + 1..];

        if tag_body.starts_with('/') {
            // Closing tag: pop back to the enclosing element
            if stack.len() > 1 {
                stack.pop();
            }
            continue;
        }

        let self_closing = tag_body.ends_with('/');
        let tag_body = tag_body.trim_end_matches('/');
        let mut parts = tag_body.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let attrs = parts.next().unwrap_or_default();
        let id = ATTR_PATTERN
            .captures_iter(attrs)
            .find(|captures| &captures[1] == "id")
            .map(|captures| captures[2].to_owned());

        let index = elements.len();
        elements.push(ElementData::new(name.clone(), id));
        let current = *stack.last().expect("open element stack empty");
        elements[current].children.push(index);
        if first_created.is_none() {
            first_created = Some(index);
        }

        if !self_closing && !VOID_TAGS.contains(&name.as_str()) {
            stack.push(index);
        }
    }
    push_text(elements, *stack.last().expect("open element stack empty"), rest);

    first_created
}

fn push_text(elements: &mut [ElementData], target: usize, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        elements[target].text.push_str(trimmed);
    }
}

fn collect_text(elements: &[ElementData], index: usize) -> String {
    let mut out = elements[index].text.clone();
    for &child in &elements[index].children {
        out.push_str(&collect_text(elements, child));
    }
    out
}

fn collect_by_tag(elements: &[ElementData], index: usize, tag: &str, found: &mut Vec<usize>) {
    if elements[index].tag == tag {
        found.push(index);
    }
    for &child in &elements[index].children {
        collect_by_tag(elements, child, tag, found);
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
