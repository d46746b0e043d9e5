//! Components, their DOM representation, and the factory that builds them.

use std::cell::{Cell, Ref, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::events::EventId;
use crate::handlers::{EventHandlers, Handler};

static NEXT_UID: AtomicU64 = AtomicU64::new(1);

/// Process-unique component identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Uid(u64);

impl Uid {
    fn next() -> Self {
        Self(NEXT_UID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uid_{}", self.0)
    }
}

/// DOM representation of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dom {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub styles: BTreeMap<String, String>,
    pub text: Option<String>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::tag("div")
    }
}

impl Dom {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            text: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn style(&self, key: &str) -> Option<&str> {
        self.styles.get(key).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Description of a component tree, turned into live components by
/// [`GuiFactory::build`].
#[derive(Debug, Clone, Default)]
pub struct ComponentSpec {
    pub dom: Dom,
    pub events: EventHandlers,
    pub components: Vec<ComponentSpec>,
}

impl ComponentSpec {
    /// A plain container with the given DOM and no handlers.
    pub fn container(dom: Dom) -> Self {
        Self {
            dom,
            ..Default::default()
        }
    }

    pub fn with_events(mut self, events: EventHandlers) -> Self {
        self.events = events;
        self
    }

    pub fn with_components(mut self, components: Vec<ComponentSpec>) -> Self {
        self.components = components;
        self
    }
}

/// A node in a UI tree.
///
/// The handler table is fixed at construction. The DOM is mutable through
/// the setter methods. Children are owned by their parent.
pub struct Component {
    uid: Uid,
    dom: RefCell<Dom>,
    handlers: EventHandlers,
    children: RefCell<Vec<Rc<Component>>>,
    parent: RefCell<Weak<Component>>,
    mounted: Cell<bool>,
}

impl Component {
    pub(crate) fn new(dom: Dom, handlers: EventHandlers) -> Rc<Self> {
        Rc::new(Self {
            uid: Uid::next(),
            dom: RefCell::new(dom),
            handlers,
            children: RefCell::new(Vec::new()),
            parent: RefCell::new(Weak::new()),
            mounted: Cell::new(false),
        })
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    /// Name from the `data-name` attribute, falling back to the uid.
    pub fn name(&self) -> String {
        self.dom
            .borrow()
            .attr("data-name")
            .map_or_else(|| self.uid.to_string(), str::to_string)
    }

    pub fn dom(&self) -> Ref<'_, Dom> {
        self.dom.borrow()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.dom.borrow_mut().text = Some(text.into());
    }

    pub fn set_attr(&self, key: impl Into<String>, value: impl Into<String>) {
        self.dom.borrow_mut().attributes.insert(key.into(), value.into());
    }

    pub fn set_style(&self, key: impl Into<String>, value: impl Into<String>) {
        self.dom.borrow_mut().styles.insert(key.into(), value.into());
    }

    pub fn add_class(&self, class: impl Into<String>) {
        let class = class.into();
        let mut dom = self.dom.borrow_mut();
        if !dom.has_class(&class) {
            dom.classes.push(class);
        }
    }

    pub fn handlers(&self) -> &EventHandlers {
        &self.handlers
    }

    pub fn handler_for(&self, id: &EventId) -> Option<&Handler> {
        self.handlers.get(id)
    }

    pub fn has_handler_for(&self, id: &EventId) -> bool {
        self.handlers.contains(id)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub(crate) fn set_mounted(&self, mounted: bool) {
        self.mounted.set(mounted);
    }

    pub fn parent(&self) -> Option<Rc<Component>> {
        self.parent.borrow().upgrade()
    }

    /// Current children, in mount order.
    pub fn children(&self) -> Vec<Rc<Component>> {
        self.children.borrow().clone()
    }

    /// Append `child`, detaching it from any previous parent first.
    pub(crate) fn push_child(self: &Rc<Self>, child: Rc<Component>) {
        if let Some(old) = child.parent() {
            old.remove_child(child.uid);
        }
        *child.parent.borrow_mut() = Rc::downgrade(self);
        self.children.borrow_mut().push(child);
    }

    pub(crate) fn remove_child(&self, uid: Uid) -> Option<Rc<Component>> {
        let mut children = self.children.borrow_mut();
        let idx = children.iter().position(|c| c.uid == uid)?;
        let child = children.remove(idx);
        *child.parent.borrow_mut() = Weak::new();
        Some(child)
    }

    pub(crate) fn clear_children(&self) {
        for child in self.children.borrow_mut().drain(..) {
            *child.parent.borrow_mut() = Weak::new();
        }
    }

    /// This component and all of its descendants, depth-first pre-order.
    pub fn descendants(self: &Rc<Self>) -> Vec<Rc<Component>> {
        let mut out = Vec::new();
        let mut stack = vec![Rc::clone(self)];
        while let Some(node) = stack.pop() {
            stack.extend(node.children.borrow().iter().rev().cloned());
            out.push(node);
        }
        out
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("uid", &self.uid)
            .field("dom", &self.dom.borrow())
            .field("handlers", &self.handlers)
            .field("children", &self.children.borrow().len())
            .field("mounted", &self.mounted.get())
            .finish()
    }
}

/// Builds live component trees from specs.
pub struct GuiFactory;

impl GuiFactory {
    /// Build a component and its children. The result is not mounted.
    pub fn build(spec: ComponentSpec) -> Rc<Component> {
        let component = Component::new(spec.dom, spec.events);
        for child in spec.components {
            component.push_child(Self::build(child));
        }
        component
    }
}
